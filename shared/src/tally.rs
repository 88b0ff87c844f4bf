use std::collections::HashMap;
use serde::{Serialize, Deserialize};
use crate::models::Candidate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTally {
    pub id: String,
    pub name: String,
    pub votes: u64,
}

/// Per-candidate vote counts, in candidate-store order.
///
/// A tally is seeded from the current candidates, every one starting at
/// zero, and then fed vote-log lines one at a time. Lines naming an id that
/// is not among the seeded candidates are skipped and only counted in
/// [`Tally::ignored`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    entries: Vec<CandidateTally>,
    index: HashMap<String, usize>,
    ignored: u64,
}

impl Tally {
    pub fn seed(candidates: &[Candidate]) -> Self {
        let mut tally = Tally::default();
        for candidate in candidates {
            if tally.index.contains_key(&candidate.id) {
                continue;
            }
            tally.index.insert(candidate.id.clone(), tally.entries.len());
            tally.entries.push(CandidateTally {
                id: candidate.id.clone(),
                name: candidate.name.clone(),
                votes: 0,
            });
        }
        tally
    }

    /// Counts one line of the vote log. Returns whether it matched a candidate.
    pub fn record(&mut self, line: &str) -> bool {
        match self.index.get(line.trim()) {
            Some(&pos) => {
                self.entries[pos].votes += 1;
                true
            }
            None => {
                self.ignored += 1;
                false
            }
        }
    }

    pub fn from_votes<I, S>(candidates: &[Candidate], votes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tally = Self::seed(candidates);
        votes.into_iter().for_each(|line| { tally.record(line.as_ref()); });
        tally
    }

    pub fn get(&self, id: &str) -> Option<&CandidateTally> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    pub fn entries(&self) -> &[CandidateTally] { &self.entries }

    pub fn into_entries(self) -> Vec<CandidateTally> { self.entries }

    pub fn total_votes(&self) -> u64 {
        self.entries.iter().map(|entry| entry.votes).sum()
    }

    pub fn ignored(&self) -> u64 { self.ignored }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
