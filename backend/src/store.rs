use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use futures::stream::{self, BoxStream, StreamExt};
use shared::models::*;
use shared::Poll;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

/// The in-memory poll served in `memory` mode.
pub type QuickPoll = Mutex<Poll>;

pub type VoteLines = BoxStream<'static, Result<String, StoreError>>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Corrupt candidate file: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("Failed to acquire store lock")]
    LockFailed,
}

#[rocket::async_trait]
pub trait CandidateStore: Send + Sync {
    async fn load(&self) -> Result<Vec<Candidate>, StoreError>;

    async fn save(&self, candidates: &[Candidate]) -> Result<(), StoreError>;

    /// Appends a candidate under the next sequential id.
    async fn add(&self, candidate: NewCandidate) -> Result<Candidate, StoreError>;
}

#[rocket::async_trait]
pub trait VoteLog: Send + Sync {
    async fn append(&self, candidate_id: &str) -> Result<(), StoreError>;

    /// Every recorded candidate id in append order. Each call starts over
    /// from the beginning of the log.
    async fn all(&self) -> Result<VoteLines, StoreError>;
}

pub struct JsonCandidateStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonCandidateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[rocket::async_trait]
impl CandidateStore for JsonCandidateStore {
    async fn load(&self) -> Result<Vec<Candidate>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, candidates: &[Candidate]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(candidates)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn add(&self, candidate: NewCandidate) -> Result<Candidate, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut candidates = self.load().await?;
        let candidate = candidate.into_candidate(&candidates);
        candidates.push(candidate.clone());
        self.save(&candidates).await?;
        debug!("Stored candidate {} in {}", candidate.id, self.path.display());
        Ok(candidate)
    }
}

pub struct FileVoteLog {
    path: PathBuf,
}

impl FileVoteLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[rocket::async_trait]
impl VoteLog for FileVoteLog {
    async fn append(&self, candidate_id: &str) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{candidate_id}\n").as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn all(&self) -> Result<VoteLines, StoreError> {
        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(stream::empty().boxed()),
            Err(e) => return Err(e.into()),
        };

        let lines = BufReader::new(file).lines();
        Ok(stream::try_unfold(lines, |mut lines| async move {
            let next = lines.next_line().await?;
            Ok::<_, StoreError>(next.map(|line| (line, lines)))
        })
        .boxed())
    }
}

#[derive(Default)]
pub struct MemoryCandidateStore {
    candidates: Mutex<Vec<Candidate>>,
}

#[rocket::async_trait]
impl CandidateStore for MemoryCandidateStore {
    async fn load(&self) -> Result<Vec<Candidate>, StoreError> {
        let candidates = self.candidates.lock().map_err(|_| StoreError::LockFailed)?;
        Ok(candidates.clone())
    }

    async fn save(&self, candidates: &[Candidate]) -> Result<(), StoreError> {
        let mut stored = self.candidates.lock().map_err(|_| StoreError::LockFailed)?;
        *stored = candidates.to_vec();
        Ok(())
    }

    async fn add(&self, candidate: NewCandidate) -> Result<Candidate, StoreError> {
        let mut stored = self.candidates.lock().map_err(|_| StoreError::LockFailed)?;
        let candidate = candidate.into_candidate(&stored);
        stored.push(candidate.clone());
        Ok(candidate)
    }
}

#[derive(Default)]
pub struct MemoryVoteLog {
    lines: Mutex<Vec<String>>,
}

#[rocket::async_trait]
impl VoteLog for MemoryVoteLog {
    async fn append(&self, candidate_id: &str) -> Result<(), StoreError> {
        self.lines
            .lock()
            .map_err(|_| StoreError::LockFailed)?
            .push(candidate_id.to_string());
        Ok(())
    }

    async fn all(&self) -> Result<VoteLines, StoreError> {
        let lines = self.lines.lock().map_err(|_| StoreError::LockFailed)?.clone();
        Ok(stream::iter(lines.into_iter().map(Ok)).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use uuid::Uuid;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("poll_store_{}", Uuid::new_v4()));
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    async fn collect(log: &dyn VoteLog) -> Vec<String> {
        log.all().await.unwrap().try_collect().await.unwrap()
    }

    #[rocket::async_test]
    async fn missing_files_read_as_empty() {
        let dir = TempDir::new();
        let candidates = JsonCandidateStore::new(dir.0.join("candidates.json"));
        let votes = FileVoteLog::new(dir.0.join("votes.txt"));

        assert!(candidates.load().await.unwrap().is_empty());
        assert!(collect(&votes).await.is_empty());
    }

    #[rocket::async_test]
    async fn blank_candidate_file_reads_as_empty() {
        let dir = TempDir::new();
        let path = dir.0.join("candidates.json");
        std::fs::write(&path, "\n").unwrap();
        assert!(JsonCandidateStore::new(path).load().await.unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn corrupt_candidate_file_is_an_error() {
        let dir = TempDir::new();
        let path = dir.0.join("candidates.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonCandidateStore::new(path);
        assert!(matches!(store.load().await, Err(StoreError::Corrupt(_))));
    }

    #[rocket::async_test]
    async fn json_store_assigns_sequential_ids() {
        let dir = TempDir::new();
        let store = JsonCandidateStore::new(dir.0.join("candidates.json"));

        let alice = store.add(NewCandidate::parse("Alice", "first").unwrap()).await.unwrap();
        let bob = store.add(NewCandidate::parse("Bob", "").unwrap()).await.unwrap();
        assert_eq!((alice.id.as_str(), bob.id.as_str()), ("1", "2"));

        let reopened = JsonCandidateStore::new(store.path().to_path_buf());
        let loaded = reopened.load().await.unwrap();
        assert_eq!(loaded, vec![alice, bob]);
        assert_eq!(loaded[0].description, "first");
    }

    #[rocket::async_test]
    async fn concurrent_adds_get_distinct_ids() {
        let dir = TempDir::new();
        let store = std::sync::Arc::new(JsonCandidateStore::new(dir.0.join("candidates.json")));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.add(NewCandidate::parse(&format!("C{i}"), "").unwrap()).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut ids: Vec<_> = store.load().await.unwrap().into_iter().map(|c| c.id).collect();
        ids.sort_by_key(|id| id.parse::<u32>().unwrap());
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7", "8"]);
    }

    #[rocket::async_test]
    async fn vote_log_replays_in_append_order() {
        let dir = TempDir::new();
        let log = FileVoteLog::new(dir.0.join("votes.txt"));
        for id in ["1", "2", "1"] {
            log.append(id).await.unwrap();
        }

        assert_eq!(collect(&log).await, ["1", "2", "1"]);
        assert_eq!(collect(&log).await, ["1", "2", "1"]);
        assert_eq!(std::fs::read_to_string(log.path()).unwrap(), "1\n2\n1\n");
    }

    #[rocket::async_test]
    async fn memory_stores_behave_like_files() {
        let candidates = MemoryCandidateStore::default();
        let votes = MemoryVoteLog::default();

        let alice = candidates.add(NewCandidate::parse("Alice", "").unwrap()).await.unwrap();
        assert_eq!(alice.id, "1");
        votes.append("1").await.unwrap();
        votes.append("9").await.unwrap();

        assert_eq!(candidates.load().await.unwrap(), vec![alice]);
        assert_eq!(collect(&votes).await, ["1", "9"]);

        candidates.save(&[]).await.unwrap();
        assert!(candidates.load().await.unwrap().is_empty());
    }
}
