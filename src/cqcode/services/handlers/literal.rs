//! Handlers whose output does not depend on collaborators.

use async_trait::async_trait;

use crate::cqcode::domain::CqTag;

use super::{FACE_PLACEHOLDER, KindHandler, ResolveScope};

/// Passes text through verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextHandler;

#[async_trait]
impl KindHandler for TextHandler {
    async fn resolve(&self, tag: &CqTag, _scope: &ResolveScope<'_>) -> String {
        tag.parameter("text").unwrap_or_default().to_owned()
    }
}

/// Renders built-in faces as a fixed placeholder; the face id is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceHandler;

#[async_trait]
impl KindHandler for FaceHandler {
    async fn resolve(&self, _tag: &CqTag, _scope: &ResolveScope<'_>) -> String {
        FACE_PLACEHOLDER.to_owned()
    }
}
