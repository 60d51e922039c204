// Application layer - Use case interactors

pub mod container;
pub mod field_cache;
pub mod image_interactor;
pub mod inspect_interactor;
pub mod raw_output;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use field_cache::{CacheField, CacheKey, FieldCache};
pub use image_interactor::ImageMedia;
pub use inspect_interactor::MediaParser;
pub use raw_output::{RawCapture, RawOutputProvider};
