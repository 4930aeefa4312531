//! Online course recommendations from a CSV catalog.
//!
//! Two strategies share one immutable [`services::RecommendationEngine`]: TF-IDF content
//! similarity over course text, and expansion of a course's skill tags through association
//! rules mined offline.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod sources;
