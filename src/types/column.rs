//! # Column Definitions
//!
//! `ColumnDef` describes one column of a projection schema: name, logical
//! type tag, nullability, and decimal precision/scale where applicable.
//! Type metadata lives here rather than in the `DataType` enum so the tag
//! stays a single byte.
//!
//! Decimal columns pick their physical storage width from the declared
//! precision: up to 9 digits fit a 4-byte cell, up to 18 an 8-byte cell,
//! and up to 38 a 16-byte cell.

use eyre::Result;

use crate::types::DataType;

/// Largest decimal precision representable in a 4-byte cell.
pub const MAX_DECIMAL32_PRECISION: u8 = 9;
/// Largest decimal precision representable in an 8-byte cell.
pub const MAX_DECIMAL64_PRECISION: u8 = 18;
/// Largest supported decimal precision (16-byte cell).
pub const MAX_DECIMAL128_PRECISION: u8 = 38;

/// Precision and scale of a decimal column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalAttributes {
    pub precision: u8,
    pub scale: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    name: String,
    data_type: DataType,
    nullable: bool,
    decimal: Option<DecimalAttributes>,
}

impl ColumnDef {
    /// Creates a non-nullable column of the given type.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            decimal: None,
        }
    }

    /// Marks the column nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Creates a non-nullable decimal column, choosing the physical
    /// storage width from the precision.
    pub fn decimal(name: impl Into<String>, precision: u8, scale: u8) -> Result<Self> {
        eyre::ensure!(
            (1..=MAX_DECIMAL128_PRECISION).contains(&precision),
            "decimal precision must be between 1 and {}, got {}",
            MAX_DECIMAL128_PRECISION,
            precision
        );
        eyre::ensure!(
            scale <= precision,
            "decimal scale {} exceeds precision {}",
            scale,
            precision
        );

        let data_type = if precision <= MAX_DECIMAL32_PRECISION {
            DataType::Decimal32
        } else if precision <= MAX_DECIMAL64_PRECISION {
            DataType::Decimal64
        } else {
            DataType::Decimal128
        };

        Ok(Self {
            name: name.into(),
            data_type,
            nullable: false,
            decimal: Some(DecimalAttributes { precision, scale }),
        })
    }

    /// Creates the virtual is-deleted marker column.
    pub fn is_deleted_marker(name: impl Into<String>) -> Self {
        Self::new(name, DataType::IsDeleted)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn decimal_attributes(&self) -> Option<DecimalAttributes> {
        self.decimal
    }

    /// Scale used when rendering decimal cells; zero for non-decimal
    /// columns or decimals declared without attributes.
    pub fn scale(&self) -> u8 {
        self.decimal.map(|d| d.scale).unwrap_or(0)
    }

    /// Returns true if this is the virtual is-deleted marker.
    pub fn is_delete_marker(&self) -> bool {
        self.data_type == DataType::IsDeleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_def_simple() {
        let col = ColumnDef::new("id", DataType::Int64);
        assert_eq!(col.name(), "id");
        assert_eq!(col.data_type(), DataType::Int64);
        assert!(!col.is_nullable());
        assert!(col.decimal_attributes().is_none());
    }

    #[test]
    fn column_def_nullable() {
        let col = ColumnDef::new("note", DataType::Text).nullable();
        assert!(col.is_nullable());
    }

    #[test]
    fn decimal_precision_picks_storage_width() {
        assert_eq!(
            ColumnDef::decimal("a", 9, 2).unwrap().data_type(),
            DataType::Decimal32
        );
        assert_eq!(
            ColumnDef::decimal("b", 10, 2).unwrap().data_type(),
            DataType::Decimal64
        );
        assert_eq!(
            ColumnDef::decimal("c", 18, 0).unwrap().data_type(),
            DataType::Decimal64
        );
        assert_eq!(
            ColumnDef::decimal("d", 38, 10).unwrap().data_type(),
            DataType::Decimal128
        );
    }

    #[test]
    fn decimal_rejects_bad_attributes() {
        assert!(ColumnDef::decimal("a", 0, 0).is_err());
        assert!(ColumnDef::decimal("b", 39, 0).is_err());
        assert!(ColumnDef::decimal("c", 5, 6).is_err());
    }

    #[test]
    fn is_deleted_marker_column() {
        let col = ColumnDef::is_deleted_marker("$is_deleted");
        assert!(col.is_delete_marker());
        assert_eq!(col.data_type(), DataType::IsDeleted);
        assert!(!col.is_nullable());
    }
}
