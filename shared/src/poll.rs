use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollEntry {
    pub name: String,
    pub votes: u64,
}

/// An ephemeral poll keyed by candidate name.
///
/// Names are the only identity: a repeated name collapses onto the entry
/// created by its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    entries: Vec<PollEntry>,
}

impl Poll {
    /// Builds a fresh poll from a comma-separated list of names. Tokens are
    /// trimmed and empty tokens dropped; every candidate starts at zero.
    pub fn from_names(input: &str) -> Self {
        let mut poll = Poll::default();
        for name in input.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            if poll.position(name).is_none() {
                poll.entries.push(PollEntry { name: name.to_string(), votes: 0 });
            }
        }
        poll
    }

    /// Replaces the whole poll, discarding every accumulated vote.
    pub fn reset(&mut self, input: &str) {
        *self = Poll::from_names(input);
    }

    /// Adds one vote for `name`. Unknown names are ignored.
    pub fn record_vote(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(pos) => {
                self.entries[pos].votes += 1;
                true
            }
            None => false,
        }
    }

    pub fn votes_for(&self, name: &str) -> Option<u64> {
        self.position(name).map(|pos| self.entries[pos].votes)
    }

    pub fn entries(&self) -> &[PollEntry] { &self.entries }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }
}
