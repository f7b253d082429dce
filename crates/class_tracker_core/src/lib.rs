pub mod domain;
pub mod ports;
pub mod validation;

pub use domain::{Class, ClassWithItems, Item, ItemFilter, NewClass, NewItem, Tag};
pub use ports::{ClassStore, ItemStore, PortError, PortResult};
pub use validation::{parse_due_date, sanitize_name, ValidationError};
