//! # Batch Construction
//!
//! `BatchBuilder` assembles the packed buffers a `Batch` serves views
//! over: records are laid out cell by cell at the schema's offsets,
//! variable-length payloads are appended to the shared indirect pool, and
//! the trailing null bitmap is maintained automatically.
//!
//! ## Usage
//!
//! ```ignore
//! let mut batch = BatchBuilder::new(schema);
//! let mut row = batch.row();
//! row.set_int32(0, 42)?;
//! row.set_text(1, "hello")?;
//! row.finish()?;
//! let batch = batch.build()?;
//! ```
//!
//! Nullable columns start out NULL in every new row; setting a value
//! clears the bit again. `finish` rejects rows that leave a non-nullable
//! column unset.

use std::sync::Arc;

use eyre::Result;
use zerocopy::IntoBytes;
use zerocopy::little_endian::U64;

use crate::batch::Batch;
use crate::bitmap;
use crate::cell::CellSlice;
use crate::schema::Schema;
use crate::types::{ColumnDef, DataType};

pub struct BatchBuilder {
    schema: Arc<Schema>,
    direct: Vec<u8>,
    indirect: Vec<u8>,
}

impl BatchBuilder {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            direct: Vec::new(),
            indirect: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Starts a new row. Nullable columns begin NULL; everything else is
    /// zeroed until set.
    pub fn row(&mut self) -> RowBuilder<'_> {
        let mut record = vec![0u8; self.schema.row_stride()];
        let record_size = self.schema.record_byte_size();
        for (idx, col) in self.schema.columns().iter().enumerate() {
            if col.is_nullable() {
                bitmap::bit_set(&mut record[record_size..], idx);
            }
        }
        let column_count = self.schema.column_count();
        RowBuilder {
            builder: self,
            record,
            set: vec![false; column_count],
        }
    }

    /// Finalizes the accumulated rows into a batch.
    pub fn build(self) -> Result<Batch> {
        Batch::new(self.schema, self.direct, self.indirect)
    }
}

pub struct RowBuilder<'b> {
    builder: &'b mut BatchBuilder,
    record: Vec<u8>,
    set: Vec<bool>,
}

impl RowBuilder<'_> {
    fn column(&self, idx: usize) -> Result<&ColumnDef> {
        self.builder
            .schema
            .column(idx)
            .ok_or_else(|| eyre::eyre!("column index {} out of range", idx))
    }

    /// Type-checks the target column, clears its null bit, and returns
    /// the mutable cell span to write into.
    fn fixed_cell_mut(&mut self, idx: usize, expected: DataType) -> Result<&mut [u8]> {
        let col = self.column(idx)?;
        eyre::ensure!(
            col.data_type() == expected,
            "cannot write {} into column '{}' of type {}",
            expected.name(),
            col.name(),
            col.data_type().name()
        );

        let offset = self.builder.schema.column_offset(idx);
        let width = expected.fixed_width();
        let record_size = self.builder.schema.record_byte_size();
        if self.builder.schema.null_bitmap_size() > 0 {
            bitmap::bit_clear(&mut self.record[record_size..], idx);
        }
        self.set[idx] = true;
        Ok(&mut self.record[offset..offset + width])
    }

    pub fn set_bool(&mut self, idx: usize, value: bool) -> Result<()> {
        self.fixed_cell_mut(idx, DataType::Bool)?[0] = value as u8;
        Ok(())
    }

    /// Writes the virtual is-deleted marker cell.
    pub fn set_is_deleted(&mut self, idx: usize, value: bool) -> Result<()> {
        self.fixed_cell_mut(idx, DataType::IsDeleted)?[0] = value as u8;
        Ok(())
    }

    pub fn set_int8(&mut self, idx: usize, value: i8) -> Result<()> {
        self.fixed_cell_mut(idx, DataType::Int8)?
            .copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn set_int16(&mut self, idx: usize, value: i16) -> Result<()> {
        self.fixed_cell_mut(idx, DataType::Int16)?
            .copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn set_int32(&mut self, idx: usize, value: i32) -> Result<()> {
        self.fixed_cell_mut(idx, DataType::Int32)?
            .copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn set_int64(&mut self, idx: usize, value: i64) -> Result<()> {
        self.fixed_cell_mut(idx, DataType::Int64)?
            .copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn set_float(&mut self, idx: usize, value: f32) -> Result<()> {
        self.fixed_cell_mut(idx, DataType::Float32)?
            .copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn set_double(&mut self, idx: usize, value: f64) -> Result<()> {
        self.fixed_cell_mut(idx, DataType::Float64)?
            .copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn set_timestamp_micros(&mut self, idx: usize, value: i64) -> Result<()> {
        self.fixed_cell_mut(idx, DataType::TimestampMicros)?
            .copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn set_date(&mut self, idx: usize, value: i32) -> Result<()> {
        self.fixed_cell_mut(idx, DataType::Date)?
            .copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Writes an unscaled decimal value into whichever physical width the
    /// column declares, rejecting values the narrow widths cannot hold.
    pub fn set_unscaled_decimal(&mut self, idx: usize, value: i128) -> Result<()> {
        let data_type = self.column(idx)?.data_type();
        match data_type {
            DataType::Decimal32 => {
                let narrow = i32::try_from(value).map_err(|_| {
                    eyre::eyre!("value {} out of range for a decimal32 cell", value)
                })?;
                self.fixed_cell_mut(idx, DataType::Decimal32)?
                    .copy_from_slice(&narrow.to_le_bytes());
            }
            DataType::Decimal64 => {
                let narrow = i64::try_from(value).map_err(|_| {
                    eyre::eyre!("value {} out of range for a decimal64 cell", value)
                })?;
                self.fixed_cell_mut(idx, DataType::Decimal64)?
                    .copy_from_slice(&narrow.to_le_bytes());
            }
            DataType::Decimal128 => {
                self.fixed_cell_mut(idx, DataType::Decimal128)?
                    .copy_from_slice(&value.to_le_bytes());
            }
            other => {
                let name = self.column(idx)?.name().to_string();
                eyre::bail!(
                    "cannot write a decimal into column '{}' of type {}",
                    name,
                    other.name()
                );
            }
        }
        Ok(())
    }

    pub fn set_text(&mut self, idx: usize, value: &str) -> Result<()> {
        let data_type = self.column(idx)?.data_type();
        eyre::ensure!(
            matches!(data_type, DataType::Text | DataType::Varchar),
            "cannot write a string into column '{}' of type {}",
            self.column(idx)?.name(),
            data_type.name()
        );
        self.append_var_cell(idx, data_type, value.as_bytes())
    }

    pub fn set_varchar(&mut self, idx: usize, value: &str) -> Result<()> {
        let data_type = self.column(idx)?.data_type();
        eyre::ensure!(
            data_type == DataType::Varchar,
            "cannot write a varchar into column '{}' of type {}",
            self.column(idx)?.name(),
            data_type.name()
        );
        self.append_var_cell(idx, data_type, value.as_bytes())
    }

    pub fn set_binary(&mut self, idx: usize, value: &[u8]) -> Result<()> {
        self.append_var_cell(idx, DataType::Binary, value)
    }

    fn append_var_cell(&mut self, idx: usize, expected: DataType, payload: &[u8]) -> Result<()> {
        let offset = self.builder.indirect.len() as u64;
        self.builder.indirect.extend_from_slice(payload);
        let descriptor = CellSlice {
            offset: U64::new(offset),
            len: U64::new(payload.len() as u64),
        };
        self.fixed_cell_mut(idx, expected)?
            .copy_from_slice(descriptor.as_bytes());
        Ok(())
    }

    /// Marks a nullable column NULL.
    pub fn set_null(&mut self, idx: usize) -> Result<()> {
        let col = self.column(idx)?;
        eyre::ensure!(
            col.is_nullable(),
            "column '{}' is not nullable",
            col.name()
        );
        let record_size = self.builder.schema.record_byte_size();
        bitmap::bit_set(&mut self.record[record_size..], idx);
        self.set[idx] = true;
        Ok(())
    }

    /// Appends the record to the batch, verifying every non-nullable
    /// column was set.
    pub fn finish(self) -> Result<()> {
        for (idx, col) in self.builder.schema.columns().iter().enumerate() {
            eyre::ensure!(
                self.set[idx] || col.is_nullable(),
                "non-nullable column '{}' was not set",
                col.name()
            );
        }
        self.builder.direct.extend_from_slice(&self.record);
        Ok(())
    }
}
