//! Document repository trait
//!
//! Services only see this interface. `Database` implements it for every
//! [`Document`] type.

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::models::{Tweet, User};
use crate::error::AppError;

/// A record stored as one document in a named collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection the document lives in
    const COLLECTION: &'static str;

    /// Unique key within the collection
    fn key(&self) -> &str;
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn key(&self) -> &str {
        &self.username
    }
}

impl Document for Tweet {
    const COLLECTION: &'static str = "tweets";

    fn key(&self) -> &str {
        &self.tweet_id
    }
}

/// Repository trait for document persistence.
///
/// Writes replace whole documents; there is no compare-and-swap, so two
/// concurrent read-modify-write cycles on one key resolve as last write wins.
/// Uses native async fn in traits (no async_trait macro).
pub trait Repository<T: Document>: Send + Sync {
    /// Get a document by key.
    fn get(&self, id: &str) -> impl Future<Output = Result<Option<T>, AppError>> + Send;

    /// Insert a new document. Fails with `AppError::Conflict` if the key is taken.
    fn insert(&self, record: &T) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Insert or replace a document.
    fn put(&self, record: &T) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Delete by key. Returns whether a document was removed.
    fn delete(&self, id: &str) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Check whether a key is present.
    fn exists(&self, id: &str) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// All documents whose top-level `field` equals `value`, in insertion order.
    fn find_by_field(
        &self,
        field: &str,
        value: &str,
    ) -> impl Future<Output = Result<Vec<T>, AppError>> + Send;

    /// All documents whose top-level `field` contains `fragment`
    /// (ASCII case-insensitive), in insertion order.
    fn search_by_field(
        &self,
        field: &str,
        fragment: &str,
    ) -> impl Future<Output = Result<Vec<T>, AppError>> + Send;

    /// Every document in the collection, in insertion order.
    fn all(&self) -> impl Future<Output = Result<Vec<T>, AppError>> + Send;
}
