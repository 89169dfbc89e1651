//! # Typed Cell Protocol
//!
//! One decode algorithm, many monomorphic entry points: `CellType` is a
//! sealed marker trait with one implementation per logical type tag. The
//! generic accessor in `view.rs` performs the validate → null-check →
//! copy sequence exactly once; markers only say which tag they require
//! and how the fixed-width cell bytes decode.
//!
//! Variable-length tags (`Text`, `Varchar`, `Binary`) decode a 16-byte
//! `CellSlice` descriptor and resolve it against the batch's indirect
//! pool, returning a borrow into that pool. The record itself never holds
//! variable-length payloads.
//!
//! ## Usage
//!
//! ```ignore
//! use scanrow::cell;
//!
//! let id: i32 = row.get::<cell::Int32, _>("id")?;
//! let name: &str = row.get::<cell::Text, _>("name")?;
//! ```

use zerocopy::little_endian::U64;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::error::{Result, RowError};
use crate::types::DataType;

/// In-record descriptor for a variable-length cell: where its payload
/// lives in the indirect pool.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub(crate) struct CellSlice {
    pub(crate) offset: U64,
    pub(crate) len: U64,
}

pub(crate) const CELL_SLICE_WIDTH: usize = size_of::<CellSlice>();

mod sealed {
    pub trait Sealed {}
}

/// A logical type tag usable with `RowView::get`.
///
/// Sealed: the set of cell types is fixed by the schema's type system.
pub trait CellType: sealed::Sealed {
    /// Tag the column must carry for this getter.
    const DATA_TYPE: DataType;

    /// Requested-type name reported in `TypeMismatch` diagnostics.
    const NAME: &'static str = Self::DATA_TYPE.name();

    /// Decoded value; borrows the batch for variable-length cells.
    type Value<'a>;

    /// Decodes one cell. `raw` is exactly `DATA_TYPE.fixed_width()` bytes
    /// sliced from the record; `indirect` is the batch's variable-length
    /// pool; `column` is the column name, for diagnostics only.
    fn decode<'a>(raw: &'a [u8], indirect: &'a [u8], column: &str) -> Result<Self::Value<'a>>;
}

fn decode_byte(raw: &[u8], column: &str) -> Result<u8> {
    raw.first()
        .copied()
        .ok_or_else(|| RowError::corrupted(column, "empty cell"))
}

/// Resolves a variable-length cell descriptor against the indirect pool.
fn resolve_slice<'a>(raw: &'a [u8], indirect: &'a [u8], column: &str) -> Result<&'a [u8]> {
    let slice = CellSlice::ref_from_bytes(raw)
        .map_err(|_| RowError::corrupted(column, "truncated cell descriptor"))?;
    let offset = usize::try_from(slice.offset.get())
        .map_err(|_| RowError::corrupted(column, "descriptor offset overflows usize"))?;
    let len = usize::try_from(slice.len.get())
        .map_err(|_| RowError::corrupted(column, "descriptor length overflows usize"))?;
    let end = offset
        .checked_add(len)
        .ok_or_else(|| RowError::corrupted(column, "descriptor range overflows usize"))?;
    if end > indirect.len() {
        return Err(RowError::corrupted(
            column,
            format!(
                "descriptor [{}, {}) outside indirect pool of {} bytes",
                offset,
                end,
                indirect.len()
            ),
        ));
    }
    Ok(&indirect[offset..end])
}

macro_rules! fixed_cell {
    ($(#[$meta:meta])* $marker:ident, $tag:ident, $value:ty, $width:literal) => {
        $(#[$meta])*
        pub struct $marker;

        impl sealed::Sealed for $marker {}

        impl CellType for $marker {
            const DATA_TYPE: DataType = DataType::$tag;
            type Value<'a> = $value;

            fn decode<'a>(raw: &'a [u8], _indirect: &'a [u8], column: &str) -> Result<$value> {
                let bytes: [u8; $width] = raw.try_into().map_err(|_| {
                    RowError::corrupted(
                        column,
                        format!("expected {} cell bytes, got {}", $width, raw.len()),
                    )
                })?;
                Ok(<$value>::from_le_bytes(bytes))
            }
        }
    };
}

macro_rules! bool_cell {
    ($(#[$meta:meta])* $marker:ident, $tag:ident) => {
        $(#[$meta])*
        pub struct $marker;

        impl sealed::Sealed for $marker {}

        impl CellType for $marker {
            const DATA_TYPE: DataType = DataType::$tag;
            type Value<'a> = bool;

            fn decode<'a>(raw: &'a [u8], _indirect: &'a [u8], column: &str) -> Result<bool> {
                Ok(decode_byte(raw, column)? != 0)
            }
        }
    };
}

bool_cell!(Bool, Bool);
bool_cell!(
    /// Virtual marker column reporting whether the row is a deleted ghost.
    IsDeleted,
    IsDeleted
);

fixed_cell!(Int8, Int8, i8, 1);
fixed_cell!(Int16, Int16, i16, 2);
fixed_cell!(Int32, Int32, i32, 4);
fixed_cell!(Int64, Int64, i64, 8);
fixed_cell!(Float, Float32, f32, 4);
fixed_cell!(Double, Float64, f64, 8);
fixed_cell!(
    /// Microseconds since the Unix epoch.
    TimestampMicros,
    TimestampMicros,
    i64,
    8
);
fixed_cell!(
    /// Days since the Unix epoch.
    Date,
    Date,
    i32,
    4
);
fixed_cell!(Decimal32, Decimal32, i32, 4);
fixed_cell!(Decimal64, Decimal64, i64, 8);
fixed_cell!(Decimal128, Decimal128, i128, 16);

macro_rules! var_cell {
    ($(#[$meta:meta])* $marker:ident, $tag:ident, str) => {
        $(#[$meta])*
        pub struct $marker;

        impl sealed::Sealed for $marker {}

        impl CellType for $marker {
            const DATA_TYPE: DataType = DataType::$tag;
            type Value<'a> = &'a str;

            fn decode<'a>(raw: &'a [u8], indirect: &'a [u8], column: &str) -> Result<&'a str> {
                let bytes = resolve_slice(raw, indirect, column)?;
                std::str::from_utf8(bytes)
                    .map_err(|e| RowError::corrupted(column, format!("invalid UTF-8: {}", e)))
            }
        }
    };
}

var_cell!(Text, Text, str);
var_cell!(Varchar, Varchar, str);

pub struct Binary;

impl sealed::Sealed for Binary {}

impl CellType for Binary {
    const DATA_TYPE: DataType = DataType::Binary;
    type Value<'a> = &'a [u8];

    fn decode<'a>(raw: &'a [u8], indirect: &'a [u8], column: &str) -> Result<&'a [u8]> {
        resolve_slice(raw, indirect, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zerocopy::IntoBytes as _;

    #[test]
    fn cell_slice_is_sixteen_bytes_little_endian() {
        let slice = CellSlice {
            offset: U64::new(3),
            len: U64::new(5),
        };
        let bytes = slice.as_bytes();
        assert_eq!(bytes.len(), CELL_SLICE_WIDTH);
        assert_eq!(&bytes[..8], &3u64.to_le_bytes());
        assert_eq!(&bytes[8..], &5u64.to_le_bytes());
    }

    #[test]
    fn resolve_slice_rejects_out_of_pool_descriptor() {
        let slice = CellSlice {
            offset: U64::new(2),
            len: U64::new(10),
        };
        let err = resolve_slice(slice.as_bytes(), b"short", "col").unwrap_err();
        assert!(matches!(err, RowError::Corrupted { .. }));
    }

    #[test]
    fn text_decode_rejects_invalid_utf8() {
        let slice = CellSlice {
            offset: U64::new(0),
            len: U64::new(2),
        };
        let pool = [0xff, 0xfe];
        let err = Text::decode(slice.as_bytes(), &pool, "name").unwrap_err();
        assert!(matches!(err, RowError::Corrupted { .. }));
    }
}
