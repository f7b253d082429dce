//! crates/class_tracker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::validation::{sanitize_name, ValidationError};

/// The kind of work an item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Assignment,
    Midterm,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Assignment => "assignment",
            Tag::Midterm => "midterm",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assignment" => Ok(Tag::Assignment),
            "midterm" => Ok(Tag::Midterm),
            other => Err(ValidationError::InvalidTag(other.to_string())),
        }
    }
}

/// A named grouping (e.g. a course) that owns zero or more items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A class together with its items, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassWithItems {
    pub class: Class,
    pub items: Vec<Item>,
}

/// A dated unit of work belonging to exactly one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: Uuid,
    pub class_id: Uuid,
    pub name: String,
    pub tag: Tag,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A validated request to create a class. The name is already sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClass {
    name: String,
}

impl NewClass {
    pub fn new(raw_name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: sanitize_name(raw_name)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A validated request to create an item. The name is already sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    name: String,
    tag: Tag,
    due_date: NaiveDate,
    class_id: Uuid,
}

impl NewItem {
    /// Sanitizes the name; the tag and date arrive already parsed.
    pub fn new(
        raw_name: &str,
        tag: Tag,
        due_date: NaiveDate,
        class_id: Uuid,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: sanitize_name(raw_name)?,
            tag,
            due_date,
            class_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn class_id(&self) -> Uuid {
        self.class_id
    }
}

/// Conjunctive filter for listing the items of one class.
///
/// `None` on any optional field means "do not filter on it".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFilter {
    pub class_id: Uuid,
    pub tag: Option<Tag>,
    pub completed: Option<bool>,
    pub due_date: Option<NaiveDate>,
}

impl ItemFilter {
    pub fn for_class(class_id: Uuid) -> Self {
        Self {
            class_id,
            tag: None,
            completed: None,
            due_date: None,
        }
    }

    /// Whether `item` satisfies every filter that is set.
    pub fn matches(&self, item: &Item) -> bool {
        item.class_id == self.class_id
            && self.tag.map_or(true, |tag| item.tag == tag)
            && self.completed.map_or(true, |done| item.completed == done)
            && self.due_date.map_or(true, |day| item.due_date == day)
    }
}
