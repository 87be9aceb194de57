//! Shared types, error model, and configuration for Pure Extracts.
//!
//! This crate is the foundation depended on by all other Pure Extracts crates.
//! It provides:
//! - [`PureExtractsError`]: the unified error type
//! - Domain types ([`Product`], [`ProductDraft`], [`ProductId`], [`ProductStatus`],
//!   [`ContactForm`])
//! - Configuration ([`AppConfig`], [`WebhookEndpoints`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CatalogConfig, StorageConfig, WebhookConfig, WebhookEndpoints, config_dir,
    config_file_path, expand_home, init_config, load_config, load_config_from,
};
pub use error::{PureExtractsError, Result};
pub use types::{
    CATEGORY_LABELS, ContactForm, ContactRecord, DEFAULT_SLOT_KEY, PLACEHOLDER_IMAGE, Product, ProductDraft, ProductId,
    ProductStatus, seed_products,
};
