//! # Scan Result Batch
//!
//! `Batch` owns the two byte buffers one scan response decodes into (the
//! packed fixed-width records and the indirect pool for variable-length
//! payloads) plus a shared reference to the projection schema. Rows are
//! exposed as cheap, stateless `RowView`s constructed per access.
//!
//! Populating the buffers (transport, pagination, decoding a wire
//! response) happens upstream; this container only validates the geometry
//! it is handed and serves views into it.

use std::sync::Arc;

use eyre::Result;

use crate::error::RowError;
use crate::schema::Schema;
use crate::view::RowView;

#[derive(Debug)]
pub struct Batch {
    schema: Arc<Schema>,
    direct: Vec<u8>,
    indirect: Vec<u8>,
    num_rows: usize,
}

impl Batch {
    /// Wraps decoded scan buffers.
    ///
    /// `direct` must be an exact multiple of the schema's row stride; the
    /// row count is derived from it.
    pub fn new(schema: Arc<Schema>, direct: Vec<u8>, indirect: Vec<u8>) -> Result<Self> {
        let stride = schema.row_stride();
        eyre::ensure!(
            direct.len().is_multiple_of(stride),
            "direct buffer of {} bytes is not a multiple of the row stride {}",
            direct.len(),
            stride
        );

        let num_rows = direct.len() / stride;
        tracing::debug!(
            num_rows,
            direct_len = direct.len(),
            indirect_len = indirect.len(),
            "assembled scan batch"
        );

        Ok(Self {
            schema,
            direct,
            indirect,
            num_rows,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Returns a view over one row.
    pub fn row(&self, index: usize) -> crate::error::Result<RowView<'_>> {
        if index >= self.num_rows {
            return Err(RowError::IndexOutOfRange {
                index,
                num_rows: self.num_rows,
            });
        }
        let stride = self.schema.row_stride();
        let start = index * stride;
        Ok(RowView::from_parts(
            &self.direct[start..start + stride],
            &self.indirect,
            &self.schema,
        ))
    }

    /// Iterates the batch's rows in order.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            batch: self,
            next: 0,
        }
    }

    pub fn projection_schema(&self) -> &Schema {
        &self.schema
    }

    /// The packed fixed-width record buffer.
    pub fn direct_data(&self) -> &[u8] {
        &self.direct
    }

    /// The variable-length payload pool.
    pub fn indirect_data(&self) -> &[u8] {
        &self.indirect
    }
}

/// Iterator over the rows of a batch.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    batch: &'a Batch,
    next: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = RowView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.batch.row(self.next).ok()?;
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.batch.num_rows.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

impl<'a> IntoIterator for &'a Batch {
    type Item = RowView<'a>;
    type IntoIter = Rows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}
