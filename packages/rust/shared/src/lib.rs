//! Shared types, error model, and configuration for CatalogBridge.
//!
//! This crate is the foundation depended on by all other CatalogBridge crates.
//! It provides:
//! - [`BridgeError`] — the unified error type
//! - Domain types ([`LocationSpec`], [`RawContent`], [`Entity`], [`ProcessingResult`])
//! - Configuration ([`AppConfig`], [`ReaderOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ParserConfig, ReaderConfig, ReaderOptions, config_dir, config_file_path,
    init_config, load_config, load_config_from, validate_config,
};
pub use error::{BridgeError, Result};
pub use types::{Entity, EntityMeta, LocationSpec, ProcessingResult, RawContent};
