//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use class_tracker_core::ports::{ClassStore, ItemStore};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub classes: Arc<dyn ClassStore>,
    pub items: Arc<dyn ItemStore>,
}

impl AppState {
    /// Wires both ports to the same backing store.
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: ClassStore + ItemStore + 'static,
    {
        Self {
            classes: store.clone(),
            items: store,
        }
    }
}
