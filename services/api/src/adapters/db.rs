//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ClassStore` and `ItemStore` ports from the `core` crate. It handles all
//! interactions with the PostgreSQL database using `sqlx`.
//!
//! Every write runs in its own READ COMMITTED transaction. Class-name uniqueness
//! is enforced by the `classes_name_key` constraint, not by a prior SELECT.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use class_tracker_core::domain::{Class, ClassWithItems, Item, ItemFilter, NewClass, NewItem};
use class_tracker_core::ports::{ClassStore, ItemStore, PortError, PortResult};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

const ITEM_COLUMNS: &str = "id, class_id, name, tag, due_date, completed, created_at";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements both store ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn begin(&self) -> PortResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED")
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        Ok(tx)
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ClassRecord {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}
impl ClassRecord {
    fn to_domain(self) -> Class {
        Class {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ItemRecord {
    id: Uuid,
    class_id: Uuid,
    name: String,
    tag: String,
    due_date: NaiveDate,
    completed: bool,
    created_at: DateTime<Utc>,
}
impl ItemRecord {
    fn to_domain(self) -> PortResult<Item> {
        let tag = self.tag.parse().map_err(|_| {
            PortError::Unexpected(format!("Item {} has unknown tag '{}'", self.id, self.tag))
        })?;
        Ok(Item {
            id: self.id,
            class_id: self.class_id,
            name: self.name,
            tag,
            due_date: self.due_date,
            completed: self.completed,
            created_at: self.created_at,
        })
    }
}

//=========================================================================================
// `ClassStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ClassStore for DbAdapter {
    async fn list_classes(&self) -> PortResult<Vec<ClassWithItems>> {
        let classes = sqlx::query_as::<_, ClassRecord>(
            "SELECT id, name, created_at FROM classes ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let items = sqlx::query_as::<_, ItemRecord>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut items_by_class: HashMap<Uuid, Vec<Item>> = HashMap::new();
        for record in items {
            let item = record.to_domain()?;
            items_by_class.entry(item.class_id).or_default().push(item);
        }

        Ok(classes
            .into_iter()
            .map(|record| {
                let class = record.to_domain();
                let items = items_by_class.remove(&class.id).unwrap_or_default();
                ClassWithItems { class, items }
            })
            .collect())
    }

    async fn create_class(&self, new_class: NewClass) -> PortResult<Class> {
        let mut tx = self.begin().await?;

        let record = sqlx::query_as::<_, ClassRecord>(
            "INSERT INTO classes (id, name) VALUES ($1, $2) \
             ON CONFLICT (name) DO NOTHING \
             RETURNING id, name, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(new_class.name())
        .fetch_optional(&mut *tx)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| {
            PortError::Conflict(format!(
                "A class with the name '{}' already exists",
                new_class.name()
            ))
        })?;

        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn delete_class(&self, class_id: Uuid) -> PortResult<()> {
        let mut tx = self.begin().await?;

        // Items go with it via ON DELETE CASCADE.
        let deleted: Option<(Uuid,)> =
            sqlx::query_as("DELETE FROM classes WHERE id = $1 RETURNING id")
                .bind(class_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(unexpected)?;

        if deleted.is_none() {
            return Err(PortError::NotFound(format!("Class {} not found", class_id)));
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }
}

//=========================================================================================
// `ItemStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ItemStore for DbAdapter {
    async fn list_items(&self, filter: ItemFilter) -> PortResult<Vec<Item>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE class_id = "
        ));
        builder.push_bind(filter.class_id);
        if let Some(tag) = filter.tag {
            builder.push(" AND tag = ");
            builder.push_bind(tag.as_str());
        }
        if let Some(completed) = filter.completed {
            builder.push(" AND completed = ");
            builder.push_bind(completed);
        }
        if let Some(due_date) = filter.due_date {
            builder.push(" AND due_date = ");
            builder.push_bind(due_date);
        }
        builder.push(" ORDER BY created_at ASC, id ASC");

        let records: Vec<ItemRecord> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        records.into_iter().map(ItemRecord::to_domain).collect()
    }

    async fn create_item(&self, new_item: NewItem) -> PortResult<Item> {
        let mut tx = self.begin().await?;

        let record = sqlx::query_as::<_, ItemRecord>(&format!(
            "INSERT INTO items (id, class_id, name, tag, due_date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {ITEM_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new_item.class_id())
        .bind(new_item.name())
        .bind(new_item.tag().as_str())
        .bind(new_item.due_date())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                PortError::NotFound(format!("Class {} not found", new_item.class_id()))
            }
            _ => unexpected(e),
        })?;

        tx.commit().await.map_err(unexpected)?;
        record.to_domain()
    }

    async fn set_item_completed(&self, item_id: Uuid, completed: bool) -> PortResult<Item> {
        let mut tx = self.begin().await?;

        let record = sqlx::query_as::<_, ItemRecord>(&format!(
            "UPDATE items SET completed = $1 WHERE id = $2 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(completed)
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Item {} not found", item_id)))?;

        tx.commit().await.map_err(unexpected)?;
        record.to_domain()
    }

    async fn delete_item(&self, item_id: Uuid) -> PortResult<()> {
        let mut tx = self.begin().await?;

        let deleted: Option<(Uuid,)> = sqlx::query_as("DELETE FROM items WHERE id = $1 RETURNING id")
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?;

        if deleted.is_none() {
            return Err(PortError::NotFound(format!("Item {} not found", item_id)));
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }
}
