// Adapters - External system implementations

pub mod cache_fs;
pub mod cache_memory;
pub mod exec_ffmpeg;
pub mod mime_infer;
pub mod mock;
pub mod toml_config;

// Re-export adapters
pub use cache_fs::FsCacheStore;
pub use cache_memory::{MemoryCacheStore, TieredCacheStore};
pub use exec_ffmpeg::FfmpegAnalyzerAdapter;
pub use mime_infer::InferMimeAdapter;
pub use mock::{MockAnalyzerAdapter, StaticMimeAdapter};
pub use toml_config::{CacheBackend, ProbeConfig, TomlConfigAdapter};
