//! Shared test helpers for in-memory resolution integration tests.

use cqtext::cqcode::{
    adapters::memory::{InMemoryIdentityDirectory, StaticContentResolver},
    config::{ResolverConfig, SelfIdentity},
    domain::UserId,
    services::TagResolver,
};
use rstest::fixture;
use std::sync::Arc;

/// Id the bot answers to in these tests.
pub const BOT_ID: i64 = 10_001;

/// Photo URL with a scripted description.
pub const PHOTO_URL: &str = "https://multimedia.example/cat.jpg";

/// Provides a content resolver with one scripted photo.
#[fixture]
pub fn content() -> StaticContentResolver {
    StaticContentResolver::new().with_description(PHOTO_URL, "a cat on a keyboard")
}

/// Provides a directory that knows two users.
#[fixture]
pub fn identity() -> InMemoryIdentityDirectory {
    InMemoryIdentityDirectory::new()
        .with_name(UserId::new(42), "alice")
        .with_name(UserId::new(43), "bob")
}

/// Provides a resolver over the default collaborators.
#[fixture]
pub fn resolver(
    content: StaticContentResolver,
    identity: InMemoryIdentityDirectory,
) -> TagResolver {
    resolver_over(content, identity)
}

/// Builds a resolver for the test bot over the given collaborators.
#[must_use]
pub fn resolver_over(
    content: StaticContentResolver,
    identity: InMemoryIdentityDirectory,
) -> TagResolver {
    TagResolver::new(
        Arc::new(content),
        Arc::new(identity),
        ResolverConfig::for_identity(SelfIdentity::new(UserId::new(BOT_ID), "Mai")),
    )
}
