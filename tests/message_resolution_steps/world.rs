//! Shared world state for message resolution BDD scenarios.

use std::sync::Arc;

use cqtext::cqcode::{
    adapters::memory::{InMemoryIdentityDirectory, StaticContentResolver},
    config::{ResolverConfig, SelfIdentity},
    domain::{ReplyContext, ResolvedMessage},
    services::TagResolver,
};
use rstest::fixture;

/// Scenario world for message resolution behaviour tests.
pub struct ResolutionWorld {
    pub content: StaticContentResolver,
    pub identity: InMemoryIdentityDirectory,
    pub self_identity: SelfIdentity,
    pub reply: Option<ReplyContext>,
    pub resolved: Option<ResolvedMessage>,
}

impl ResolutionWorld {
    /// Creates a world with no scripted collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self {
            content: StaticContentResolver::new(),
            identity: InMemoryIdentityDirectory::new(),
            self_identity: SelfIdentity::default(),
            reply: None,
            resolved: None,
        }
    }

    /// Builds a resolver over the world's collaborators.
    #[must_use]
    pub fn resolver(&self) -> TagResolver {
        TagResolver::new(
            Arc::new(self.content.clone()),
            Arc::new(self.identity.clone()),
            ResolverConfig::for_identity(self.self_identity.clone()),
        )
    }

    /// Returns the plain text of the last resolved message.
    ///
    /// # Errors
    ///
    /// Returns an error when no message has been resolved yet.
    pub fn plain_text(&self) -> Result<String, eyre::Report> {
        self.resolved
            .as_ref()
            .map(ResolvedMessage::plain_text)
            .ok_or_else(|| eyre::eyre!("no message resolved in scenario world"))
    }
}

impl Default for ResolutionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ResolutionWorld {
    ResolutionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
