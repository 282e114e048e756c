//! cqtext: plain-text translation of tagged chat messages.
//!
//! Chat transports embed rich content (images, mentions, replies, forwarded
//! bundles) in message text as bracketed tagged codes such as
//! `[CQ:image,url=...]`. This crate parses those codes and resolves each
//! one into a human-readable surrogate suitable for a text-only consumer.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: escaping, parsing, and message types with no I/O
//! - **Ports**: traits for image retrieval, image description, and name
//!   lookup
//! - **Adapters**: HTTP and in-memory implementations of those ports
//! - **Services**: the tag resolver, composed image description, and the
//!   per-message pipeline
//!
//! # Modules
//!
//! - [`cqcode`]: tagged-code decoding and resolution

pub mod cqcode;
