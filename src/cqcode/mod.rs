//! Tagged-code decoding and resolution.
//!
//! A message is split into text runs and `[CQ:kind,key=value,...]` tags,
//! each tag is dispatched to the handler for its kind, and the rendered
//! fragments are joined into plain text. Replies and forwarded bundles
//! resolve their nested messages recursively under a depth limit. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Settings in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
