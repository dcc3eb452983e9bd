//! Blocklist manager
//!
//! Process-wide set of lowercase-normalized email addresses. Uniqueness is
//! the only invariant; nothing is persisted, the set dies with the process.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::utils::email::{normalize_email, validate_email};

/// Shared, lock-guarded blocklist. Cloning is cheap and all clones see the
/// same underlying set.
#[derive(Clone, Default)]
pub struct BlocklistManager {
    entries: Arc<RwLock<HashSet<String>>>,
}

impl BlocklistManager {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Add an address to the blocklist.
    ///
    /// The address is validated and lowercased first. Idempotent: returns
    /// `false` when the normalized form was already present.
    pub async fn add(&self, email: &str) -> Result<bool> {
        validate_email(email)?;
        let normalized = normalize_email(email);
        Ok(self.entries.write().await.insert(normalized))
    }

    /// Remove an address from the blocklist.
    ///
    /// Idempotent: removing an absent entry is not an error, it just
    /// returns `false`.
    pub async fn remove(&self, email: &str) -> bool {
        self.entries.write().await.remove(&normalize_email(email))
    }

    /// All entries, in normalized form, sorted for stable output.
    pub async fn list(&self) -> Vec<String> {
        let mut entries: Vec<String> =
            self.entries.read().await.iter().cloned().collect();
        entries.sort();
        entries
    }

    /// Check membership for a (case-insensitive) address.
    pub async fn contains(&self, email: &str) -> bool {
        self.entries.read().await.contains(&normalize_email(email))
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
