//! Unit tests for tagged-code decoding and resolution.
//!
//! Tests are organised by concept: the escaping codec, the tag grammar,
//! message segmentation, forward bundles, per-kind resolution, composed
//! image description, configuration, and the per-message pipeline.

mod resolver_tests;
