//! crates/class_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete store behind them.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Class, ClassWithItems, Item, ItemFilter, NewClass, NewItem};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the underlying store.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Store Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ClassStore: Send + Sync {
    /// All classes with their items, oldest first.
    async fn list_classes(&self) -> PortResult<Vec<ClassWithItems>>;

    /// Inserts a class. Fails with `Conflict` if the sanitized name is taken.
    async fn create_class(&self, new_class: NewClass) -> PortResult<Class>;

    /// Deletes a class and every item it owns.
    async fn delete_class(&self, class_id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list_items(&self, filter: ItemFilter) -> PortResult<Vec<Item>>;

    /// Inserts an item. Fails with `NotFound` if the owning class does not exist.
    async fn create_item(&self, new_item: NewItem) -> PortResult<Item>;

    /// Overwrites the completion flag and returns the updated item.
    async fn set_item_completed(&self, item_id: Uuid, completed: bool) -> PortResult<Item>;

    async fn delete_item(&self, item_id: Uuid) -> PortResult<()>;
}
