//! pagecast adapters crate
//!
//! Infrastructure adapters implementing the domain ports:
//! - `content`: NewsAPI, TheSportsDB, The Odds API and an offline evergreen source
//! - `text`: OpenAI and Hugging Face text generation
//! - `images`: Unsplash and Pexels photo search
//! - `facebook`: Graph API publisher
//! - `records`: JSONL and in-memory run record stores

mod http;
mod records_jsonl;
mod records_memory;

pub mod content;
pub mod facebook;
pub mod images;
pub mod text;

pub use http::DEFAULT_TIMEOUT_SECS;

/// Re-exports for run record stores
pub mod records {
    pub use crate::records_jsonl::JsonlRunRecordStore;
    pub use crate::records_memory::InMemoryRunRecordStore;
}
