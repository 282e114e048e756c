//! Step definitions for message resolution scenarios.

mod given;
mod then;
mod when;
pub mod world;
