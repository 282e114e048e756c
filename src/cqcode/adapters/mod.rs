//! Adapter implementations of the content and identity ports.

pub mod http;
pub mod memory;
