use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::core::types::{PhotoRef, SubmitterId};

/// Short opaque id carried in callback payloads instead of the photo's
/// `file_id`, which does not fit Telegram's 64-byte callback_data limit.
///
/// 16 lowercase hex characters from a random 64-bit value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionToken(String);

impl SubmissionToken {
    /// Length of generated tokens
    pub const LEN: usize = 16;

    /// Longest token accepted back from a callback payload
    pub const MAX_ACCEPTED_LEN: usize = 64;

    /// Fresh random token. Uniqueness is enforced by [`Registry::register`].
    pub fn generate() -> Self {
        Self(format!("{:016x}", rand::random::<u64>()))
    }

    /// Wraps a token read back from a payload.
    ///
    /// Only shape is checked (non-empty, bounded, no whitespace); whether
    /// it is pending is the registry's business.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.len() > Self::MAX_ACCEPTED_LEN || raw.chars().any(char::is_whitespace) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A photo waiting for the moderator. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub token: SubmissionToken,
    pub photo_ref: PhotoRef,
    pub submitter: SubmitterId,
    pub submitted_at: Instant,
}

/// In-memory store of pending submissions, keyed by token.
///
/// Clones share the same map. Every operation takes the lock for a single
/// map access, so callers never hold it across Telegram requests. There is
/// no size cap; see `prune_older_than` for the optional TTL.
#[derive(Clone, Default)]
pub struct Registry {
    entries: Arc<Mutex<HashMap<SubmissionToken, SubmissionRecord>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record under a token that is not currently pending and
    /// stores it. Generation and insert happen under one lock, so two
    /// concurrent submissions can never share a token.
    pub async fn register(&self, photo_ref: PhotoRef, submitter: SubmitterId) -> SubmissionRecord {
        let mut entries = self.entries.lock().await;
        let token = loop {
            let candidate = SubmissionToken::generate();
            if !entries.contains_key(&candidate) {
                break candidate;
            }
            log::warn!("Submission token collision on {}, regenerating", candidate);
        };

        let record = SubmissionRecord {
            token: token.clone(),
            photo_ref,
            submitter,
            submitted_at: Instant::now(),
        };
        entries.insert(token, record.clone());
        record
    }

    /// Stores a record under its own token, replacing any previous one.
    pub async fn put(&self, record: SubmissionRecord) {
        let mut entries = self.entries.lock().await;
        entries.insert(record.token.clone(), record);
    }

    pub async fn get(&self, token: &SubmissionToken) -> Option<SubmissionRecord> {
        let entries = self.entries.lock().await;
        entries.get(token).cloned()
    }

    /// Removes a record. Removing an absent token is a no-op.
    pub async fn remove(&self, token: &SubmissionToken) -> Option<SubmissionRecord> {
        let mut entries = self.entries.lock().await;
        entries.remove(token)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Drops submissions older than `max_age`. Returns how many were dropped.
    pub async fn prune_older_than(&self, max_age: Duration) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        let now = Instant::now();
        entries.retain(|_, record| now.duration_since(record.submitted_at) < max_age);
        let removed = before - entries.len();
        if removed > 0 {
            log::info!("Expired {} pending submission(s)", removed);
        }
        removed
    }

    /// Runs `prune_older_than(ttl)` every `interval` until the runtime
    /// shuts down.
    pub fn spawn_expiry_task(self, ttl: Duration, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.prune_older_than(ttl).await;
                crate::core::metrics::PENDING_SUBMISSIONS.set(self.len().await as f64);
            }
        })
    }
}
