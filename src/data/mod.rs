//! Data layer module
//!
//! Handles all data persistence:
//! - Document models and projections
//! - Repository trait consumed by services
//! - SQLite-backed document store

mod database;
mod models;
mod repository;

pub use database::Database;
pub use models::*;
pub use repository::{Document, Repository};
