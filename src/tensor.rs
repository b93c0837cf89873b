//! Dense three-dimensional tensors.
//!
//! Layers exchange `Tensor3` values addressed by `(c, h, w)`. Storage is a single
//! contiguous buffer in channel-major, row-major order, so element `(c, h, w)` lives at
//! offset `c * H * W + h * W + w`. Nested `Vec<Vec<Vec<f32>>>` data can be converted in
//! and out at the API boundary.

use std::fmt;

use crate::{Error, Result};

/// Extents of a `Tensor3`: `(channels, height, width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shape3 {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl Shape3 {
    #[inline]
    pub const fn new(channels: usize, height: usize, width: usize) -> Self {
        Self {
            channels,
            height,
            width,
        }
    }

    /// Total number of scalars, saturating at `usize::MAX`.
    ///
    /// Every `Tensor3` has a shape whose product fits; use [`Shape3::checked_len`] for
    /// shapes that did not come from a tensor.
    #[inline]
    pub const fn len(&self) -> usize {
        self.channels
            .saturating_mul(self.height)
            .saturating_mul(self.width)
    }

    /// Total number of scalars, or `None` if the product overflows `usize`.
    #[inline]
    pub const fn checked_len(&self) -> Option<usize> {
        match self.channels.checked_mul(self.height) {
            Some(ch) => ch.checked_mul(self.width),
            None => None,
        }
    }

    fn checked_len_or_err(&self) -> Result<usize> {
        self.checked_len()
            .ok_or_else(|| Error::InvalidInput(format!("shape {self} overflows usize")))
    }

    /// Returns true if any extent is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.channels == 0 || self.height == 0 || self.width == 0
    }

    /// Flat offset of `(c, h, w)`. Does not bounds-check.
    #[inline]
    pub const fn index(&self, c: usize, h: usize, w: usize) -> usize {
        (c * self.height + h) * self.width + w
    }

    #[inline]
    pub const fn as_array(&self) -> [usize; 3] {
        [self.channels, self.height, self.width]
    }
}

impl From<(usize, usize, usize)> for Shape3 {
    fn from((c, h, w): (usize, usize, usize)) -> Self {
        Self::new(c, h, w)
    }
}

impl fmt::Display for Shape3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.channels, self.height, self.width)
    }
}

/// A dense, rectangular `(C, H, W)` tensor of `f32`.
///
/// Zero extents are representable so that consumers can reject them with a proper error;
/// ragged data is not.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tensor3 {
    shape: Shape3,
    data: Vec<f32>,
}

impl Tensor3 {
    /// A tensor of the given shape filled with zeros.
    pub fn zeros(shape: impl Into<Shape3>) -> Result<Self> {
        let shape = shape.into();
        let len = shape.checked_len_or_err()?;
        Ok(Self {
            shape,
            data: vec![0.0; len],
        })
    }

    /// Build a tensor from a flat channel-major, row-major buffer.
    pub fn from_flat(shape: impl Into<Shape3>, data: Vec<f32>) -> Result<Self> {
        let shape = shape.into();
        let len = shape.checked_len_or_err()?;
        if data.len() != len {
            return Err(Error::InvalidInput(format!(
                "buffer has {} elements, shape {shape} needs {len}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// Build a tensor from nested `[c][h][w]` rows.
    ///
    /// Extents are taken from the first channel and its first row. Any channel or row that
    /// disagrees is rejected. An empty outer container yields shape `(0, 0, 0)`; an empty
    /// first channel yields `(C, 0, 0)`.
    pub fn from_nested(nested: &[Vec<Vec<f32>>]) -> Result<Self> {
        let channels = nested.len();
        let height = nested.first().map_or(0, Vec::len);
        let width = nested
            .first()
            .and_then(|ch| ch.first())
            .map_or(0, Vec::len);
        let shape = Shape3::new(channels, height, width);

        let mut data = Vec::with_capacity(shape.checked_len_or_err()?);
        for (c, channel) in nested.iter().enumerate() {
            if channel.len() != height {
                return Err(Error::InvalidInput(format!(
                    "channel {c} has {} rows, expected {height}",
                    channel.len()
                )));
            }
            for (h, row) in channel.iter().enumerate() {
                if row.len() != width {
                    return Err(Error::InvalidInput(format!(
                        "row ({c}, {h}) has {} values, expected {width}",
                        row.len()
                    )));
                }
                data.extend_from_slice(row);
            }
        }

        Ok(Self { shape, data })
    }

    /// Copy out as nested `[c][h][w]` rows.
    pub fn to_nested(&self) -> Vec<Vec<Vec<f32>>> {
        (0..self.shape.channels)
            .map(|c| {
                (0..self.shape.height)
                    .map(|h| self.row(c, h).to_vec())
                    .collect()
            })
            .collect()
    }

    #[inline]
    pub fn shape(&self) -> Shape3 {
        self.shape
    }

    #[inline]
    /// Returns the total number of scalars.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    /// Returns true if any extent is zero.
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Returns the value at `(c, h, w)`, or `None` when out of range.
    pub fn get(&self, c: usize, h: usize, w: usize) -> Option<f32> {
        let s = self.shape;
        if c < s.channels && h < s.height && w < s.width {
            Some(self.data[s.index(c, h, w)])
        } else {
            None
        }
    }

    #[inline]
    /// Returns row `(c, h)` (shape: `(width,)`).
    ///
    /// Panics if `c >= channels` or `h >= height`.
    pub fn row(&self, c: usize, h: usize) -> &[f32] {
        assert!(
            c < self.shape.channels && h < self.shape.height,
            "row ({c}, {h}) out of range for shape {}",
            self.shape
        );
        let start = self.shape.index(c, h, 0);
        &self.data[start..start + self.shape.width]
    }
}
