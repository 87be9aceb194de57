//! Product catalog store for Pure Extracts.
//!
//! This crate provides:
//! - [`ProductStore`]: the ordered product list, written through to a slot
//! - [`ProductForm`] and [`ProductEdit`]: admin-form input parsing
//! - Id allocation that never hands out the same id twice

mod form;
mod ids;
mod store;

pub use form::{ProductEdit, ProductForm, is_known_category, split_applications};
pub use ids::{Clock, system_clock};
pub use store::{
    CorruptDataPolicy, EmptyWritePolicy, LoadSource, ProductStore, StoreOptions, WriteOutcome,
    parse_products, validate_draft,
};
