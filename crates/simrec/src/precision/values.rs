//! Typed numeric buffers.

use std::ops::Range;

use half::f16;

use super::NumericKind;

/// A scalar that can be stored in a [`Values`] buffer.
pub trait Element: Copy + Send + Sync + 'static {
    /// The kind tag for this element type.
    const KIND: NumericKind;

    /// The additive identity.
    const ZERO: Self;

    /// Widen to `f64` for accumulation.
    fn to_f64(self) -> f64;

    /// Wrap a vector of this element type into a [`Values`] buffer.
    fn wrap(values: Vec<Self>) -> Values;

    /// Whether this element is zero.
    #[inline]
    fn is_zero(self) -> bool {
        self.to_f64() == 0.0
    }
}

macro_rules! impl_element {
    ($($ty:ty => $variant:ident, $zero:expr;)*) => {
        $(
            impl Element for $ty {
                const KIND: NumericKind = NumericKind::$variant;
                const ZERO: Self = $zero;

                #[inline]
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn wrap(values: Vec<Self>) -> Values {
                    Values::$variant(values)
                }
            }

            impl From<Vec<$ty>> for Values {
                fn from(values: Vec<$ty>) -> Self {
                    Values::$variant(values)
                }
            }
        )*
    };
}

impl_element! {
    i8 => Int8, 0;
    i16 => Int16, 0;
    i32 => Int32, 0;
    i64 => Int64, 0;
    u8 => UInt8, 0;
    u16 => UInt16, 0;
    u32 => UInt32, 0;
    u64 => UInt64, 0;
    f32 => Float32, 0.0;
    f64 => Float64, 0.0;
}

impl Element for f16 {
    const KIND: NumericKind = NumericKind::Float16;
    const ZERO: Self = f16::ZERO;

    #[inline]
    fn to_f64(self) -> f64 {
        f16::to_f64(self)
    }

    fn wrap(values: Vec<Self>) -> Values {
        Values::Float16(values)
    }
}

impl From<Vec<f16>> for Values {
    fn from(values: Vec<f16>) -> Self {
        Values::Float16(values)
    }
}

impl Element for bool {
    const KIND: NumericKind = NumericKind::Bool;
    const ZERO: Self = false;

    #[inline]
    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }

    fn wrap(values: Vec<Self>) -> Values {
        Values::Bool(values)
    }
}

impl From<Vec<bool>> for Values {
    fn from(values: Vec<bool>) -> Self {
        Values::Bool(values)
    }
}

/// A contiguous buffer of numbers tagged with their [`NumericKind`].
///
/// Matrices and vectors store their entries in a `Values` buffer so that the
/// element width is chosen once, at construction or narrowing time, instead of
/// being inferred on every call.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    /// `i8` elements.
    Int8(Vec<i8>),
    /// `i16` elements.
    Int16(Vec<i16>),
    /// `i32` elements.
    Int32(Vec<i32>),
    /// `i64` elements.
    Int64(Vec<i64>),
    /// `u8` elements.
    UInt8(Vec<u8>),
    /// `u16` elements.
    UInt16(Vec<u16>),
    /// `u32` elements.
    UInt32(Vec<u32>),
    /// `u64` elements.
    UInt64(Vec<u64>),
    /// `f16` elements.
    Float16(Vec<f16>),
    /// `f32` elements.
    Float32(Vec<f32>),
    /// `f64` elements.
    Float64(Vec<f64>),
    /// `bool` elements.
    Bool(Vec<bool>),
}

/// Run `$body` with `$slice` bound to the typed vector inside a [`Values`].
///
/// The body is monomorphized once per element type, so it should call generic
/// helpers bounded by [`Element`].
macro_rules! with_slice {
    ($values:expr, |$slice:ident| $body:expr) => {
        match $values {
            $crate::precision::Values::Int8($slice) => $body,
            $crate::precision::Values::Int16($slice) => $body,
            $crate::precision::Values::Int32($slice) => $body,
            $crate::precision::Values::Int64($slice) => $body,
            $crate::precision::Values::UInt8($slice) => $body,
            $crate::precision::Values::UInt16($slice) => $body,
            $crate::precision::Values::UInt32($slice) => $body,
            $crate::precision::Values::UInt64($slice) => $body,
            $crate::precision::Values::Float16($slice) => $body,
            $crate::precision::Values::Float32($slice) => $body,
            $crate::precision::Values::Float64($slice) => $body,
            $crate::precision::Values::Bool($slice) => $body,
        }
    };
}

pub(crate) use with_slice;

impl Values {
    /// The element kind of this buffer.
    #[must_use]
    pub fn kind(&self) -> NumericKind {
        with_slice!(self, |v| kind_of(v.as_slice()))
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        with_slice!(self, |v| v.len())
    }

    /// Whether the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get one element widened to `f64`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        with_slice!(self, |v| v.get(index).map(|x| x.to_f64()))
    }

    /// Widen every element to `f64`.
    #[must_use]
    pub fn to_f64_vec(&self) -> Vec<f64> {
        with_slice!(self, |v| v.iter().map(|x| x.to_f64()).collect())
    }

    /// Heap footprint of the elements in bytes.
    #[must_use]
    pub fn memory_bytes(&self) -> usize {
        self.len() * self.kind().size_bytes()
    }

    /// Copy a contiguous range into a new buffer of the same kind.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        with_slice!(self, |v| Element::wrap(v[range].to_vec()))
    }

    /// Copy the elements at `positions`, in order, into a new buffer of the same kind.
    ///
    /// # Panics
    ///
    /// Panics if a position is out of bounds.
    #[must_use]
    pub fn gather(&self, positions: &[usize]) -> Self {
        with_slice!(self, |v| Element::wrap(positions.iter().map(|&p| v[p]).collect()))
    }

    /// Positions of the non-zero elements.
    #[must_use]
    pub fn non_zero_positions(&self) -> Vec<usize> {
        with_slice!(self, |v| {
            v.iter().enumerate().filter(|(_, x)| !x.is_zero()).map(|(i, _)| i).collect()
        })
    }

    /// An all-zero buffer of the given kind.
    #[must_use]
    pub fn zeros(kind: NumericKind, len: usize) -> Self {
        match kind {
            NumericKind::Int8 => Self::Int8(vec![0; len]),
            NumericKind::Int16 => Self::Int16(vec![0; len]),
            NumericKind::Int32 => Self::Int32(vec![0; len]),
            NumericKind::Int64 => Self::Int64(vec![0; len]),
            NumericKind::UInt8 => Self::UInt8(vec![0; len]),
            NumericKind::UInt16 => Self::UInt16(vec![0; len]),
            NumericKind::UInt32 => Self::UInt32(vec![0; len]),
            NumericKind::UInt64 => Self::UInt64(vec![0; len]),
            NumericKind::Float16 => Self::Float16(vec![f16::ZERO; len]),
            NumericKind::Float32 => Self::Float32(vec![0.0; len]),
            NumericKind::Float64 => Self::Float64(vec![0.0; len]),
            NumericKind::Bool => Self::Bool(vec![false; len]),
        }
    }

    /// Scatter `source` into `self` at `positions`.
    ///
    /// Both buffers must be of the same kind; returns `false` otherwise.
    pub(crate) fn scatter(&mut self, positions: &[usize], source: &Self) -> bool {
        fn put<T: Element>(target: &mut [T], positions: &[usize], source: &[T]) {
            for (&p, &x) in positions.iter().zip(source) {
                target[p] = x;
            }
        }

        match (self, source) {
            (Self::Int8(t), Self::Int8(s)) => put(t, positions, s),
            (Self::Int16(t), Self::Int16(s)) => put(t, positions, s),
            (Self::Int32(t), Self::Int32(s)) => put(t, positions, s),
            (Self::Int64(t), Self::Int64(s)) => put(t, positions, s),
            (Self::UInt8(t), Self::UInt8(s)) => put(t, positions, s),
            (Self::UInt16(t), Self::UInt16(s)) => put(t, positions, s),
            (Self::UInt32(t), Self::UInt32(s)) => put(t, positions, s),
            (Self::UInt64(t), Self::UInt64(s)) => put(t, positions, s),
            (Self::Float16(t), Self::Float16(s)) => put(t, positions, s),
            (Self::Float32(t), Self::Float32(s)) => put(t, positions, s),
            (Self::Float64(t), Self::Float64(s)) => put(t, positions, s),
            (Self::Bool(t), Self::Bool(s)) => put(t, positions, s),
            _ => return false,
        }
        true
    }
}

fn kind_of<T: Element>(_: &[T]) -> NumericKind {
    T::KIND
}
