//! Precision narrowing for numeric containers.
//!
//! Large user/item matrices are kept within memory budgets by storing them at
//! 16-bit width before any arithmetic happens:
//!
//! - every signed integer kind narrows to [`NumericKind::Int16`]
//! - every floating point kind narrows to [`NumericKind::Float16`]
//! - anything else is rejected with [`SimilarityError::UnsupportedDtype`]
//!
//! Narrowing never validates the value range. Integers outside `i16` wrap
//! (two's-complement truncation) and floats beyond the `f16` range become
//! infinite, so callers must only narrow data that already fits.
//!
//! # Example
//!
//! ```
//! use simrec::precision::{normalize, NumericKind, Values};
//!
//! let counts = Values::from(vec![3_i64, 0, 7]);
//! let narrowed = normalize(&counts).unwrap();
//! assert_eq!(narrowed.kind(), NumericKind::Int16);
//!
//! // The input is untouched and narrowing again is a no-op.
//! assert_eq!(counts.kind(), NumericKind::Int64);
//! assert_eq!(normalize(&narrowed).unwrap(), narrowed);
//! ```

mod arithmetic;
mod values;

use std::fmt;

use half::f16;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SimilarityError};

pub use arithmetic::Arithmetic;
pub(crate) use values::with_slice;
pub use values::{Element, Values};

/// The numeric family a kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericFamily {
    /// Signed integers, narrowed to `i16`.
    SignedInteger,
    /// Floating point numbers, narrowed to `f16`.
    Float,
}

/// The element type of a numeric container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    /// `i8`
    Int8,
    /// `i16`, the canonical integer kind.
    Int16,
    /// `i32`
    Int32,
    /// `i64`
    Int64,
    /// `u8`
    UInt8,
    /// `u16`
    UInt16,
    /// `u32`
    UInt32,
    /// `u64`
    UInt64,
    /// `f16`, the canonical float kind.
    Float16,
    /// `f32`
    Float32,
    /// `f64`
    Float64,
    /// `bool`
    Bool,
}

impl NumericKind {
    /// The family this kind belongs to, if it can be narrowed at all.
    ///
    /// Unsigned integers and booleans have no family.
    #[must_use]
    pub const fn family(self) -> Option<NumericFamily> {
        match self {
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => {
                Some(NumericFamily::SignedInteger)
            }
            Self::Float16 | Self::Float32 | Self::Float64 => Some(NumericFamily::Float),
            Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64 | Self::Bool => None,
        }
    }

    /// The kind produced by narrowing this kind.
    #[must_use]
    pub const fn narrowed(self) -> Option<Self> {
        match self.family() {
            Some(NumericFamily::SignedInteger) => Some(Self::Int16),
            Some(NumericFamily::Float) => Some(Self::Float16),
            None => None,
        }
    }

    /// Whether this kind is already at canonical width.
    #[must_use]
    pub const fn is_canonical(self) -> bool {
        matches!(self, Self::Int16 | Self::Float16)
    }

    /// Whether this kind belongs to the float family.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self.family(), Some(NumericFamily::Float))
    }

    /// Size of one element in bytes.
    #[must_use]
    pub const fn size_bytes(self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 | Self::Bool => 1,
            Self::Int16 | Self::UInt16 | Self::Float16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Lowercase name, e.g. `int16` or `float32`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float16 => "float16",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrow a value buffer to its canonical 16-bit kind.
///
/// Always returns a fresh buffer; the input is never modified. Buffers that are
/// already canonical come back as an equal copy, so the operation is idempotent.
///
/// # Errors
///
/// Returns [`SimilarityError::UnsupportedDtype`] for unsigned integers and booleans.
#[allow(clippy::cast_possible_truncation)] // wrapping is the documented narrowing behavior
pub fn normalize(values: &Values) -> Result<Values> {
    let narrowed = match values {
        Values::Int16(v) => Values::Int16(v.clone()),
        Values::Float16(v) => Values::Float16(v.clone()),
        Values::Int8(v) => Values::Int16(v.iter().map(|&x| i16::from(x)).collect()),
        Values::Int32(v) => Values::Int16(v.iter().map(|&x| x as i16).collect()),
        Values::Int64(v) => Values::Int16(v.iter().map(|&x| x as i16).collect()),
        Values::Float32(v) => Values::Float16(v.iter().map(|&x| f16::from_f32(x)).collect()),
        Values::Float64(v) => Values::Float16(v.iter().map(|&x| f16::from_f64(x)).collect()),
        other => return Err(SimilarityError::UnsupportedDtype { kind: other.kind() }),
    };

    if !values.kind().is_canonical() {
        debug!(from = %values.kind(), to = %narrowed.kind(), len = values.len(), "narrowed values");
    }

    Ok(narrowed)
}
