//! Stock photo search adapters

mod pexels;
mod unsplash;

pub use pexels::PexelsImages;
pub use unsplash::UnsplashImages;
