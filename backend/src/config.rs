use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollMode {
    /// Candidates in a JSON file, votes in an append-only log.
    #[default]
    File,
    /// A single poll held in process memory.
    Memory,
}

/// Application settings, read from the same figment as Rocket's own
/// config (`Rocket.toml`, then `ROCKET_*` environment variables).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: PollMode,
    pub data_dir: PathBuf,
    pub candidates_file: String,
    pub votes_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: PollMode::File,
            data_dir: PathBuf::from("data"),
            candidates_file: "candidates.json".into(),
            votes_file: "votes.txt".into(),
        }
    }
}

impl AppConfig {
    pub fn candidates_path(&self) -> PathBuf {
        self.data_dir.join(&self.candidates_file)
    }

    pub fn votes_path(&self) -> PathBuf {
        self.data_dir.join(&self.votes_file)
    }
}
