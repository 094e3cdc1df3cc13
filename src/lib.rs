//! Cityguide - search, filtering and tag aggregation for curated city guides.
//!
//! A guide lists places to eat, see and do in a city. This crate holds the
//! logic behind its search page: a relevance-scored free-text search combined
//! with category, tag and must-visit filters, kept in sync with the page URL
//! so results can be shared and bookmarked.

pub mod aggregate;
pub mod city;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod filter;
pub mod query_string;
pub mod rules;
pub mod scorer;
pub mod session;
pub mod store;
pub mod tags;
pub mod types;
pub mod url_sync;

pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::aggregate::*;
    pub use crate::city::*;
    pub use crate::config::*;
    pub use crate::debounce::*;
    pub use crate::engine::*;
    pub use crate::error::GuideError;
    pub use crate::filter::*;
    pub use crate::query_string::*;
    pub use crate::rules::*;
    pub use crate::scorer::*;
    pub use crate::session::*;
    pub use crate::store::*;
    pub use crate::tags::TagId;
    pub use crate::types::*;
    pub use crate::url_sync::*;
}
