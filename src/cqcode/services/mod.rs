//! Application services for tagged-code resolution.
//!
//! [`TagResolver`] turns tags and messages into text through its handler
//! registry, [`ExternalContentService`] implements image description on top
//! of the fetch and describe ports, and [`MessagePipeline`] runs one
//! resolution task per incoming message.

mod external;
pub mod handlers;
mod pipeline;
mod resolver;

pub use external::ExternalContentService;
pub use handlers::{
    EMPTY_MESSAGE_PLACEHOLDER, FACE_PLACEHOLDER, FORWARD_PLACEHOLDER, KindHandler,
    REPLY_PLACEHOLDER, ResolveScope,
};
pub use pipeline::{MessagePipeline, PipelineError};
pub use resolver::TagResolver;
