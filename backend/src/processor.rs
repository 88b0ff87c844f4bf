use futures::TryStreamExt;
use shared::{validate_choice, Candidate, NewCandidate, Poll, Tally};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::store::{CandidateStore, QuickPoll, StoreError, VoteLog};

pub struct PollProcessor;

impl PollProcessor {
    pub async fn add_candidate(
        store: &dyn CandidateStore,
        name: &str,
        description: &str,
    ) -> Result<Candidate, ApiError> {
        let candidate = NewCandidate::parse(name, description)?;
        let candidate = store.add(candidate).await?;
        info!("Added candidate {} ({})", candidate.name, candidate.id);
        Ok(candidate)
    }

    /// Records one vote after checking the id against the candidates as
    /// they are right now. Nothing is written for a rejected id.
    pub async fn cast_vote(
        candidates: &dyn CandidateStore,
        votes: &dyn VoteLog,
        candidate_id: Option<&str>,
    ) -> Result<Candidate, ApiError> {
        let current = candidates.load().await?;
        let candidate = match validate_choice(candidate_id, &current) {
            Ok(candidate) => candidate.clone(),
            Err(e) => {
                warn!("Rejected vote for {:?}: {}", candidate_id, e);
                return Err(e.into());
            }
        };

        votes.append(&candidate.id).await?;
        debug!("Recorded vote for candidate {}", candidate.id);
        Ok(candidate)
    }

    pub async fn tally(
        candidates: &dyn CandidateStore,
        votes: &dyn VoteLog,
    ) -> Result<Tally, StoreError> {
        let mut tally = Tally::seed(&candidates.load().await?);
        let mut lines = votes.all().await?;
        while let Some(line) = lines.try_next().await? {
            tally.record(&line);
        }

        if tally.ignored() > 0 {
            debug!("Skipped {} vote lines without a current candidate", tally.ignored());
        }
        Ok(tally)
    }

    pub fn reset_poll(poll: &QuickPoll, candidates: &str) -> Result<Poll, ApiError> {
        let mut poll = poll.lock().map_err(|_| ApiError::LockFailed)?;
        poll.reset(candidates);
        info!("Started a new poll with {} candidates", poll.entries().len());
        Ok(poll.clone())
    }

    /// Counts a vote in the in-memory poll and returns the updated standings.
    /// Unknown names leave the counts untouched.
    pub fn record_poll_vote(poll: &QuickPoll, name: Option<&str>) -> Result<Poll, ApiError> {
        let mut poll = poll.lock().map_err(|_| ApiError::LockFailed)?;
        let recorded = name.is_some_and(|name| poll.record_vote(name));
        if recorded {
            debug!("Recorded poll vote for {:?}", name);
        } else {
            warn!("Ignored poll vote for {:?}", name);
        }
        Ok(poll.clone())
    }

    pub fn snapshot(poll: &QuickPoll) -> Result<Poll, ApiError> {
        poll.lock().map(|poll| poll.clone()).map_err(|_| ApiError::LockFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryCandidateStore, MemoryVoteLog};
    use shared::ValidationError;

    async fn seeded(names: &[&str]) -> MemoryCandidateStore {
        let store = MemoryCandidateStore::default();
        for name in names {
            PollProcessor::add_candidate(&store, name, "").await.unwrap();
        }
        store
    }

    #[rocket::async_test]
    async fn add_candidate_rejects_blank_names() {
        let store = seeded(&["Alice"]).await;
        let result = PollProcessor::add_candidate(&store, "  ", "ignored").await;
        assert!(matches!(result, Err(ApiError::Validation(ValidationError::EmptyName))));
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[rocket::async_test]
    async fn added_candidate_round_trips() {
        let store = seeded(&[]).await;
        let added = PollProcessor::add_candidate(&store, "Alice", "likes cats").await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, vec![added.clone()]);
        assert_eq!((added.name.as_str(), added.description.as_str()), ("Alice", "likes cats"));
    }

    #[rocket::async_test]
    async fn votes_are_counted_per_candidate() {
        let candidates = seeded(&["Alice", "Bob"]).await;
        let votes = MemoryVoteLog::default();
        for id in ["1", "2", "1"] {
            PollProcessor::cast_vote(&candidates, &votes, Some(id)).await.unwrap();
        }

        let tally = PollProcessor::tally(&candidates, &votes).await.unwrap();
        assert_eq!(tally.get("1").map(|t| (t.name.as_str(), t.votes)), Some(("Alice", 2)));
        assert_eq!(tally.get("2").map(|t| (t.name.as_str(), t.votes)), Some(("Bob", 1)));
        assert_eq!(tally, PollProcessor::tally(&candidates, &votes).await.unwrap());
    }

    #[rocket::async_test]
    async fn rejected_votes_are_never_recorded() {
        let candidates = seeded(&["Alice"]).await;
        let votes = MemoryVoteLog::default();

        for id in [Some("2"), Some(""), None] {
            let result = PollProcessor::cast_vote(&candidates, &votes, id).await;
            assert!(matches!(result, Err(ApiError::Validation(ValidationError::InvalidCandidate))));
        }

        let tally = PollProcessor::tally(&candidates, &votes).await.unwrap();
        assert_eq!(tally.get("1").unwrap().votes, 0);
        assert_eq!(tally.get("2"), None);
        assert_eq!(tally.total_votes(), 0);
    }

    #[rocket::async_test]
    async fn empty_candidate_store_rejects_everything() {
        let candidates = seeded(&[]).await;
        let votes = MemoryVoteLog::default();
        let result = PollProcessor::cast_vote(&candidates, &votes, Some("1")).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(PollProcessor::tally(&candidates, &votes).await.unwrap().is_empty());
    }

    #[test]
    fn quick_poll_reset_discards_votes() {
        let poll = QuickPoll::default();
        PollProcessor::reset_poll(&poll, "Alice, Bob").unwrap();
        let after_vote = PollProcessor::record_poll_vote(&poll, Some("Bob")).unwrap();
        assert_eq!(after_vote.votes_for("Bob"), Some(1));

        let ignored = PollProcessor::record_poll_vote(&poll, Some("Mallory")).unwrap();
        assert_eq!(ignored, after_vote);

        let fresh = PollProcessor::reset_poll(&poll, "Bob, Carol").unwrap();
        assert_eq!(fresh.votes_for("Bob"), Some(0));
        assert_eq!(PollProcessor::snapshot(&poll).unwrap(), fresh);
    }
}
