//! # tabula-core
//!
//! Core data structures shared by the tabula dataset readers.
//!
//! This crate provides the fundamental types used throughout tabula:
//! - [`Value`] - A decoded field (text, number, date, time, or null)
//! - [`ColumnType`] and [`ColumnDescriptor`] - Column metadata as discovered in a file
//! - [`Schema`] - The ordered set of columns of one table
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{ColumnDescriptor, ColumnType, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     ColumnDescriptor::new(0, "id", ColumnType::Character).with_length(5),
//!     ColumnDescriptor::new(1, "mois", ColumnType::Numeric).with_length(8),
//! ]);
//!
//! assert_eq!(schema.index_of("mois"), Some(1));
//! assert_eq!(Value::from(21.43).as_number(), Some(21.43));
//! ```

pub mod column;
pub mod error;
pub mod schema;
pub mod value;

pub use column::{ColumnDescriptor, ColumnType};
pub use error::{Error, Result};
pub use schema::Schema;
pub use value::Value;
