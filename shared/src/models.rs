use serde::{Serialize, Deserialize};
use crate::tally::{CandidateTally, Tally};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A candidate that passed validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCandidate {
    name: String,
    description: String,
}

impl NewCandidate {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Assigns the next sequential id given the candidates already stored.
    pub fn into_candidate(self, existing: &[Candidate]) -> Candidate {
        Candidate {
            id: next_candidate_id(existing),
            name: self.name,
            description: self.description,
        }
    }

    pub(crate) fn new_unchecked(name: String, description: String) -> Self {
        Self { name, description }
    }
}

/// Ids are the stringified count of existing candidates plus one.
/// Stable only while candidates are never removed.
pub fn next_candidate_id(existing: &[Candidate]) -> String {
    (existing.len() + 1).to_string()
}

impl Candidate {
    pub fn matches(&self, id: &str) -> bool {
        self.id == id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultsResponse {
    pub results: Vec<CandidateTally>,
    pub total_votes: u64,
}

impl From<Tally> for ResultsResponse {
    fn from(tally: Tally) -> Self {
        let total_votes = tally.total_votes();
        Self {
            results: tally.into_entries(),
            total_votes,
        }
    }
}
