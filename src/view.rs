//! # RowView - Zero-Copy Row Access
//!
//! `RowView` pairs one packed record span with its projection schema and
//! decodes cells on demand. All getters borrow from the underlying
//! buffers; nothing is copied beyond the cell value itself.
//!
//! Every typed getter runs the same guarded sequence:
//!
//! 1. resolve the column reference (name or index) against the schema
//! 2. compare the column's declared tag with the requested tag; on a
//!    mismatch, fail before any cell byte is read
//! 3. for nullable columns, test the null bitmap; a set bit fails the
//!    read instead of returning garbage
//! 4. slice exactly the cell's fixed width at the schema offset and decode
//!
//! ## Usage
//!
//! ```ignore
//! let row = batch.row(0)?;
//! let id = row.get_int32("id")?;          // by name
//! let name = row.get_text(1)?;            // by index, zero-copy
//! if row.is_null("note") { /* ... */ }
//! ```
//!
//! ## Thread Safety
//!
//! `RowView` is `Copy` and purely read-only. Views may be used from
//! multiple threads concurrently as long as the owning batch outlives
//! them, which the borrow checker enforces.

use crate::bitmap;
use crate::cell::{self, CellType};
use crate::error::{Result, RowError};
use crate::schema::Schema;
use crate::types::DataType;

/// A column reference: either a resolved index (`usize`) or a name
/// (`&str`) resolved against the schema at access time.
pub trait ColumnRef {
    fn resolve(&self, schema: &Schema) -> Result<usize>;
}

impl ColumnRef for usize {
    fn resolve(&self, schema: &Schema) -> Result<usize> {
        if *self < schema.column_count() {
            Ok(*self)
        } else {
            Err(RowError::column_not_found(self.to_string()))
        }
    }
}

impl ColumnRef for &str {
    fn resolve(&self, schema: &Schema) -> Result<usize> {
        schema
            .find_column(self)
            .ok_or_else(|| RowError::column_not_found(*self))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    row_data: &'a [u8],
    indirect: &'a [u8],
    schema: &'a Schema,
}

impl<'a> RowView<'a> {
    /// Creates a view over one packed record.
    ///
    /// `row_data` must span exactly `schema.row_stride()` bytes (the
    /// fixed-width cells plus the trailing null bitmap). The caller
    /// guarantees both spans stay valid for the view's lifetime; the view
    /// itself owns nothing.
    pub fn new(row_data: &'a [u8], indirect: &'a [u8], schema: &'a Schema) -> eyre::Result<Self> {
        eyre::ensure!(
            row_data.len() == schema.row_stride(),
            "row data is {} bytes but the schema row stride is {}",
            row_data.len(),
            schema.row_stride()
        );
        Ok(Self {
            row_data,
            indirect,
            schema,
        })
    }

    /// Internal constructor for spans whose length the batch has already
    /// validated.
    pub(crate) fn from_parts(row_data: &'a [u8], indirect: &'a [u8], schema: &'a Schema) -> Self {
        debug_assert_eq!(row_data.len(), schema.row_stride());
        Self {
            row_data,
            indirect,
            schema,
        }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn row_data(&self) -> &'a [u8] {
        self.row_data
    }

    pub fn indirect_data(&self) -> &'a [u8] {
        self.indirect
    }

    /// Tests whether a column's value is NULL.
    ///
    /// Side-effect-free and never fails: non-nullable columns report
    /// `false` without consulting the bitmap, and an unresolvable column
    /// reference reports `false` as well.
    pub fn is_null<C: ColumnRef>(&self, col: C) -> bool {
        match col.resolve(self.schema) {
            Ok(idx) => self.is_null_at(idx),
            Err(_) => false,
        }
    }

    pub(crate) fn is_null_at(&self, idx: usize) -> bool {
        let Some(col) = self.schema.column(idx) else {
            return false;
        };
        if !col.is_nullable() {
            return false;
        }
        bitmap::bit_test(&self.row_data[self.schema.record_byte_size()..], idx)
    }

    /// Generic typed getter; the concrete `get_*` methods are thin
    /// instantiations of this one algorithm.
    pub fn get<T: CellType, C: ColumnRef>(&self, col: C) -> Result<T::Value<'a>> {
        self.get_cell::<T>(col.resolve(self.schema)?)
    }

    fn get_cell<T: CellType>(&self, idx: usize) -> Result<T::Value<'a>> {
        let col = self
            .schema
            .column(idx)
            .ok_or_else(|| RowError::column_not_found(idx.to_string()))?;

        if col.data_type() != T::DATA_TYPE {
            return Err(RowError::TypeMismatch {
                requested: T::NAME,
                column: col.name().to_string(),
                expected: col.data_type().name(),
            });
        }

        if col.is_nullable() && self.is_null_at(idx) {
            return Err(RowError::ValueIsNull {
                column: col.name().to_string(),
            });
        }

        T::decode(self.raw_cell(idx), self.indirect, col.name())
    }

    /// Raw bytes of one cell inside the fixed-width region.
    ///
    /// `idx` must be a valid column index.
    pub(crate) fn raw_cell(&self, idx: usize) -> &'a [u8] {
        let offset = self.schema.column_offset(idx);
        let width = self.schema.columns()[idx].data_type().fixed_width();
        &self.row_data[offset..offset + width]
    }

    /// Read-only cell adapter consumed by the per-column debug
    /// formatters.
    ///
    /// `idx` must be a valid column index; cell reads panic otherwise.
    pub fn cell(&self, idx: usize) -> RowCell<'a> {
        RowCell { row: *self, idx }
    }

    /// Reads the virtual is-deleted marker.
    ///
    /// Fails with `NoIsDeletedColumn` when the projection carries no such
    /// column.
    pub fn is_deleted(&self) -> Result<bool> {
        let idx = self
            .schema
            .first_is_deleted_column()
            .ok_or(RowError::NoIsDeletedColumn)?;
        self.get_cell::<cell::IsDeleted>(idx)
    }

    /// Reads any decimal column as its unscaled `i128` value, widening
    /// the narrow physical representations with sign extension.
    ///
    /// Each arm goes through the generic accessor, so the type and null
    /// checks are not duplicated here.
    pub fn get_unscaled_decimal<C: ColumnRef>(&self, col: C) -> Result<i128> {
        let idx = col.resolve(self.schema)?;
        let col_def = self
            .schema
            .column(idx)
            .ok_or_else(|| RowError::column_not_found(idx.to_string()))?;

        match col_def.data_type() {
            DataType::Decimal32 => Ok(i128::from(self.get_cell::<cell::Decimal32>(idx)?)),
            DataType::Decimal64 => Ok(i128::from(self.get_cell::<cell::Decimal64>(idx)?)),
            DataType::Decimal128 => self.get_cell::<cell::Decimal128>(idx),
            other => Err(RowError::TypeMismatch {
                requested: other.name(),
                column: col_def.name().to_string(),
                expected: "decimal",
            }),
        }
    }
}

/// Generates the concrete typed getters as thin instantiations of the
/// generic accessor, so the validate → null-check → copy sequence lives
/// in exactly one place.
macro_rules! typed_getters {
    ($($(#[$meta:meta])* $name:ident => $tag:ident -> $value:ty;)+) => {
        $(
            $(#[$meta])*
            pub fn $name<C: ColumnRef>(&self, col: C) -> Result<$value> {
                self.get::<cell::$tag, C>(col)
            }
        )+
    };
}

impl<'a> RowView<'a> {
    typed_getters! {
        get_bool => Bool -> bool;
        get_int8 => Int8 -> i8;
        get_int16 => Int16 -> i16;
        get_int32 => Int32 -> i32;
        get_int64 => Int64 -> i64;
        get_float => Float -> f32;
        get_double => Double -> f64;
        /// Microseconds since the Unix epoch.
        get_timestamp_micros => TimestampMicros -> i64;
        /// Days since the Unix epoch.
        get_date => Date -> i32;
        /// Zero-copy string reference into the indirect pool.
        get_text => Text -> &'a str;
        get_varchar => Varchar -> &'a str;
        get_binary => Binary -> &'a [u8];
    }
}

/// Just enough of a cell to drive the per-column debug formatters:
/// null state and raw cell bytes, read-only.
#[derive(Debug, Clone, Copy)]
pub struct RowCell<'a> {
    row: RowView<'a>,
    idx: usize,
}

impl<'a> RowCell<'a> {
    pub fn is_null(&self) -> bool {
        self.row.is_null_at(self.idx)
    }

    /// Raw fixed-width cell bytes (for variable-length columns, the
    /// indirect descriptor).
    pub fn raw(&self) -> &'a [u8] {
        self.row.raw_cell(self.idx)
    }

    pub(crate) fn indirect(&self) -> &'a [u8] {
        self.row.indirect
    }
}
