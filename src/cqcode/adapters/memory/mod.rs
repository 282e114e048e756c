//! In-memory adapters for tests and offline use.

mod content;
mod identity;

pub use content::StaticContentResolver;
pub use identity::InMemoryIdentityDirectory;
