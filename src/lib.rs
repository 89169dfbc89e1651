//! # scanrow - Zero-Copy Scan Batch Rows
//!
//! scanrow interprets the packed byte buffers a table scan decodes into,
//! exposing each row as a cheap, schema-validated view. The byte layout
//! arrives from a remote, lower-level component, so every read is guarded:
//! type identity and nullability are checked before a single cell byte is
//! touched, and variable-length payloads are resolved against the batch's
//! indirect pool with bounds and UTF-8 validation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use scanrow::{Batch, ColumnDef, DataType, Schema};
//! use std::sync::Arc;
//!
//! let schema = Arc::new(Schema::new(vec![
//!     ColumnDef::new("id", DataType::Int32),
//!     ColumnDef::new("name", DataType::Text).nullable(),
//! ])?);
//!
//! let batch = Batch::new(schema, direct_bytes, indirect_bytes)?;
//! for row in &batch {
//!     let id = row.get_int32("id")?;
//!     if !row.is_null("name") {
//!         println!("{}: {}", id, row.get_text("name")?);
//!     }
//! }
//! ```
//!
//! ## Record Binary Layout
//!
//! ```text
//! +---------------------------+--------------------+
//! | Fixed-width cells         | Null bitmap        |
//! | [u8; record_byte_size]    | [u8; (N+7)/8]      |
//! +---------------------------+--------------------+
//! ```
//!
//! | Component | Description |
//! |-----------|-------------|
//! | **Fixed-width cells** | One cell per column at its schema offset |
//! | **Null bitmap** | 1 bit per column, `1` = NULL; present only when the schema has nullable columns |
//! | **Indirect pool** | Batch-level buffer holding string/binary payloads referenced by 16-byte in-record descriptors |
//!
//! ## Module Overview
//!
//! - [`types`]: `DataType` tags and `ColumnDef` metadata
//! - [`schema`]: projection schema with pre-computed cell offsets
//! - [`view`]: `RowView` typed accessors and null handling
//! - [`cell`]: the sealed typed-cell protocol behind the getters
//! - [`batch`]: the buffer-owning scan batch container
//! - [`builder`]: batch construction for tests and batch producers
//! - [`render`]: debug text and CSV serialization
//! - [`redact`]: ambient log-redaction policy and its scoped disable
//!
//! ## Thread Safety
//!
//! Row views are immutable and reentrant; reading the same batch from
//! many threads is safe because nothing here mutates. The one piece of
//! shared mutable state is the redaction flag; see [`redact`].

mod bitmap;

pub mod batch;
pub mod builder;
pub mod cell;
pub mod error;
pub mod redact;
pub mod render;
pub mod schema;
pub mod types;
pub mod view;

pub use batch::{Batch, Rows};
pub use builder::{BatchBuilder, RowBuilder};
pub use error::{Result, RowError};
pub use redact::{REDACTED_TOKEN, ScopedDisableRedaction, redaction_enabled, set_redaction};
pub use render::NULL_TOKEN;
pub use schema::Schema;
pub use types::{ColumnDef, DataType, DecimalAttributes};
pub use view::{ColumnRef, RowCell, RowView};
