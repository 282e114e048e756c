//! In-memory identity directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::cqcode::domain::UserId;
use crate::cqcode::ports::IdentityDirectory;

/// Thread-safe display-name table.
///
/// Unknown users are shown by their numeric id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityDirectory {
    names: Arc<RwLock<HashMap<UserId, String>>>,
}

impl InMemoryIdentityDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a name, returning the directory for chaining.
    #[must_use]
    pub fn with_name(self, user_id: UserId, name: impl Into<String>) -> Self {
        self.insert(user_id, name);
        self
    }

    /// Records or replaces the name for `user_id`.
    pub fn insert(&self, user_id: UserId, name: impl Into<String>) {
        match self.names.write() {
            Ok(mut names) => {
                names.insert(user_id, name.into());
            }
            Err(error) => {
                tracing::warn!(%user_id, %error, "identity table lock poisoned; name not stored");
            }
        }
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryIdentityDirectory {
    async fn display_name(&self, user_id: UserId) -> String {
        self.names
            .read()
            .ok()
            .and_then(|names| names.get(&user_id).cloned())
            .unwrap_or_else(|| user_id.to_string())
    }
}
