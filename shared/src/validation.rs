use crate::models::{Candidate, NewCandidate};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Candidate name is required")]
    EmptyName,
    #[error("Invalid candidate selected")]
    InvalidCandidate,
}

impl NewCandidate {
    pub fn parse(name: &str, description: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(NewCandidate::new_unchecked(name.to_string(), description.trim().to_string()))
    }
}

/// Checks a submitted ballot choice against the current candidate list.
/// A missing or blank id is rejected the same way as an unknown one.
pub fn validate_choice<'a>(
    candidate_id: Option<&str>,
    candidates: &'a [Candidate],
) -> Result<&'a Candidate, ValidationError> {
    let id = candidate_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(ValidationError::InvalidCandidate)?;

    candidates
        .iter()
        .find(|candidate| candidate.matches(id))
        .ok_or(ValidationError::InvalidCandidate)
}
