//! Application use cases / business logic

pub mod compose;
pub mod pipeline;
pub mod resolve;

pub use compose::{ComposeConfig, Composition, FACEBOOK_MAX_CHARS, TextComposer};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, RunError};
pub use resolve::{
    ContentResolver, ImageQueryConfig, ImageResolver, NoContentAvailable, ResolvedContent,
    ResolvedImage,
};
