//! # Projection Schema
//!
//! The schema is the ordered, name-indexed collection of column
//! definitions that gives packed record bytes their meaning. Offsets are
//! pre-computed at construction so every cell lookup is O(1).
//!
//! ## Schema Internals
//!
//! - `columns`: ordered column definitions
//! - `by_name`: name → index map for `find_column`
//! - `offsets`: pre-computed byte offset of each cell in the record
//! - `record_size`: total size of the fixed-width cell region
//!
//! ## Record Layout
//!
//! ```text
//! +---------------------------+--------------------+
//! | Fixed-width cells         | Null bitmap        |
//! | [u8; record_byte_size]    | [u8; (N+7)/8]      |
//! +---------------------------+--------------------+
//! ```
//!
//! The null bitmap carries one bit per column (`1` = NULL) and is
//! present only when at least one column is nullable. `row_stride` is the
//! full per-row span including the bitmap.
//!
//! A schema is immutable once built and must outlive every `RowView`
//! derived from it; batches share it behind an `Arc`.

use eyre::Result;
use hashbrown::HashMap;

use crate::types::ColumnDef;

#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<ColumnDef>,
    by_name: HashMap<String, usize>,
    offsets: Vec<usize>,
    record_size: usize,
    has_nullable: bool,
    first_is_deleted: Option<usize>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self> {
        eyre::ensure!(!columns.is_empty(), "schema requires at least one column");

        let mut by_name = HashMap::with_capacity(columns.len());
        let mut offsets = Vec::with_capacity(columns.len());
        let mut offset = 0;

        for (idx, col) in columns.iter().enumerate() {
            eyre::ensure!(!col.name().is_empty(), "column {} has an empty name", idx);
            if by_name.insert(col.name().to_string(), idx).is_some() {
                eyre::bail!("duplicate column name '{}'", col.name());
            }
            offsets.push(offset);
            offset += col.data_type().fixed_width();
        }

        let has_nullable = columns.iter().any(|c| c.is_nullable());
        let first_is_deleted = columns.iter().position(|c| c.is_delete_marker());

        Ok(Self {
            columns,
            by_name,
            offsets,
            record_size: offset,
            has_nullable,
            first_is_deleted,
        })
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, idx: usize) -> Option<&ColumnDef> {
        self.columns.get(idx)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Resolves a column name to its index.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Byte offset of the column's cell within the fixed-width region.
    ///
    /// `idx` must be a valid column index.
    pub fn column_offset(&self, idx: usize) -> usize {
        self.offsets[idx]
    }

    /// Size of the fixed-width cell region, excluding the null bitmap.
    pub fn record_byte_size(&self) -> usize {
        self.record_size
    }

    /// Size of the trailing null bitmap: one bit per column when any
    /// column is nullable, zero bytes otherwise.
    pub fn null_bitmap_size(&self) -> usize {
        if self.has_nullable {
            self.columns.len().div_ceil(8)
        } else {
            0
        }
    }

    pub fn has_nullable(&self) -> bool {
        self.has_nullable
    }

    /// Full per-row span: fixed-width cells plus the null bitmap.
    pub fn row_stride(&self) -> usize {
        self.record_size + self.null_bitmap_size()
    }

    /// Index of the first virtual is-deleted column, if the projection
    /// carries one.
    pub fn first_is_deleted_column(&self) -> Option<usize> {
        self.first_is_deleted
    }
}
