//! Port trait definitions for tagged-code resolution.
//!
//! Ports define the collaborators the resolver needs without tying it to a
//! transport: image retrieval, image description, and name lookup. Adapters
//! implement them over HTTP or in memory.

pub mod content;
pub mod identity;

pub use content::{
    ContentResolver, DescribeError, DescribeResult, ExternalResolutionError,
    ExternalResolutionResult, FetchError, FetchResult, FetchedImage, ImageDescriber, ImageFetcher,
};
pub use identity::IdentityDirectory;
