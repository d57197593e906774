//! Local persistence
//!
//! A small string-keyed store standing in for the browser's local storage.

use std::io;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the guest cart snapshot, a JSON array of cart lines.
pub const GUEST_CART_KEY: &str = "guest_cart";

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the signed-in user's profile as JSON.
pub const USER_KEY: &str = "user";

/// Errors raised by a [`LocalStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage io error")]
    Io(#[from] io::Error),

    /// The backing file or a stored value is not valid JSON.
    #[error("malformed storage contents")]
    Malformed(#[from] serde_json::Error),
}

/// String-keyed local store.
#[automock]
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Read a value.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
