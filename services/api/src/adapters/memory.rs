//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the store ports. It mirrors the database
//! adapter's semantics (unique class names, cascading deletes, not-found on
//! missing rows) and is selected with `DATABASE_URL=memory://`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use class_tracker_core::domain::{Class, ClassWithItems, Item, ItemFilter, NewClass, NewItem};
use class_tracker_core::ports::{ClassStore, ItemStore, PortError, PortResult};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    classes: Vec<Class>,
    items: Vec<Item>,
}

/// Both tables behind one lock, so each operation is atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClassStore for MemoryStore {
    async fn list_classes(&self) -> PortResult<Vec<ClassWithItems>> {
        let tables = self.tables.read().await;
        Ok(tables
            .classes
            .iter()
            .map(|class| ClassWithItems {
                class: class.clone(),
                items: tables
                    .items
                    .iter()
                    .filter(|item| item.class_id == class.id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn create_class(&self, new_class: NewClass) -> PortResult<Class> {
        let mut tables = self.tables.write().await;
        if tables.classes.iter().any(|c| c.name == new_class.name()) {
            return Err(PortError::Conflict(format!(
                "A class with the name '{}' already exists",
                new_class.name()
            )));
        }

        let class = Class {
            id: Uuid::new_v4(),
            name: new_class.name().to_string(),
            created_at: Utc::now(),
        };
        tables.classes.push(class.clone());
        Ok(class)
    }

    async fn delete_class(&self, class_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.classes.len();
        tables.classes.retain(|c| c.id != class_id);
        if tables.classes.len() == before {
            return Err(PortError::NotFound(format!("Class {} not found", class_id)));
        }
        tables.items.retain(|item| item.class_id != class_id);
        Ok(())
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn list_items(&self, filter: ItemFilter) -> PortResult<Vec<Item>> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect())
    }

    async fn create_item(&self, new_item: NewItem) -> PortResult<Item> {
        let mut tables = self.tables.write().await;
        if !tables.classes.iter().any(|c| c.id == new_item.class_id()) {
            return Err(PortError::NotFound(format!(
                "Class {} not found",
                new_item.class_id()
            )));
        }

        let item = Item {
            id: Uuid::new_v4(),
            class_id: new_item.class_id(),
            name: new_item.name().to_string(),
            tag: new_item.tag(),
            due_date: new_item.due_date(),
            completed: false,
            created_at: Utc::now(),
        };
        tables.items.push(item.clone());
        Ok(item)
    }

    async fn set_item_completed(&self, item_id: Uuid, completed: bool) -> PortResult<Item> {
        let mut tables = self.tables.write().await;
        let item = tables
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| PortError::NotFound(format!("Item {} not found", item_id)))?;
        item.completed = completed;
        Ok(item.clone())
    }

    async fn delete_item(&self, item_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.items.len();
        tables.items.retain(|item| item.id != item_id);
        if tables.items.len() == before {
            return Err(PortError::NotFound(format!("Item {} not found", item_id)));
        }
        Ok(())
    }
}
