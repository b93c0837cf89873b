//! Tensor serialization/deserialization (feature: `serde`).
//!
//! Tensors are written through `SerializedTensor3` rather than by deriving on `Tensor3`, so
//! both directions go through the same validation: format version, element count against
//! the shape, and finiteness of every value. JSON has no encoding for NaN or infinity, so a
//! tensor holding one is refused on save instead of producing a file that cannot be loaded.

use serde::{Deserialize, Serialize};

use std::path::Path;

use crate::{Error, Result, Shape3, Tensor3};

pub const TENSOR_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedTensor3 {
    pub format_version: u32,
    /// `[channels, height, width]`.
    pub shape: [usize; 3],
    /// Channel-major, row-major.
    pub data: Vec<f32>,
}

impl SerializedTensor3 {
    pub fn validate(&self) -> Result<()> {
        if self.format_version != TENSOR_FORMAT_VERSION {
            return Err(Error::InvalidData(format!(
                "unsupported tensor format_version {}; expected {}",
                self.format_version, TENSOR_FORMAT_VERSION
            )));
        }

        let [c, h, w] = self.shape;
        let expected = Shape3::new(c, h, w)
            .checked_len()
            .ok_or_else(|| Error::InvalidData(format!("tensor shape {:?} overflows", self.shape)))?;
        if self.data.len() != expected {
            return Err(Error::InvalidData(format!(
                "data length {} does not match shape {:?}",
                self.data.len(),
                self.shape
            )));
        }

        if let Some(idx) = self.data.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidData(format!(
                "tensor data must contain only finite values, got {} at index {idx}",
                self.data[idx]
            )));
        }

        Ok(())
    }
}

impl From<&Tensor3> for SerializedTensor3 {
    fn from(tensor: &Tensor3) -> Self {
        Self {
            format_version: TENSOR_FORMAT_VERSION,
            shape: tensor.shape().as_array(),
            data: tensor.as_slice().to_vec(),
        }
    }
}

impl TryFrom<SerializedTensor3> for Tensor3 {
    type Error = Error;

    fn try_from(value: SerializedTensor3) -> std::result::Result<Self, Self::Error> {
        value.validate()?;
        let [c, h, w] = value.shape;
        Tensor3::from_flat(Shape3::new(c, h, w), value.data)
            .map_err(|e| Error::InvalidData(format!("tensor invalid: {e}")))
    }
}

impl Tensor3 {
    /// Snapshot in the on-disk layout. Not validated; see [`SerializedTensor3::validate`].
    pub fn to_serialized(&self) -> SerializedTensor3 {
        SerializedTensor3::from(self)
    }

    /// Rebuild from the on-disk layout, validating it first.
    pub fn from_serialized(value: SerializedTensor3) -> Result<Self> {
        value.try_into()
    }

    fn to_validated(&self) -> Result<SerializedTensor3> {
        let ser = self.to_serialized();
        ser.validate()
            .map_err(|e| Error::InvalidData(format!("cannot serialize tensor {}: {e}", self.shape())))?;
        Ok(ser)
    }

    /// Serialize to a pretty-printed JSON string.
    ///
    /// Fails with `InvalidData` if any value is NaN or infinite.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_validated()?)
            .map_err(|e| Error::InvalidData(format!("failed to serialize tensor: {e}")))
    }

    /// Serialize to a compact JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(&self.to_validated()?)
            .map_err(|e| Error::InvalidData(format!("failed to serialize tensor: {e}")))
    }

    /// Parse a tensor from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let ser: SerializedTensor3 = serde_json::from_str(s)
            .map_err(|e| Error::InvalidData(format!("failed to parse tensor json: {e}")))?;
        Self::from_serialized(ser)
    }

    /// Save to a JSON file (pretty-printed). Nothing is written if validation fails.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = self.to_json_string_pretty()?;
        let p = path.as_ref();
        std::fs::write(p, s)
            .map_err(|e| Error::InvalidData(format!("failed to write {}: {e}", p.display())))
    }

    /// Load from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let s = std::fs::read_to_string(p)
            .map_err(|e| Error::InvalidData(format!("failed to read {}: {e}", p.display())))?;
        Self::from_json_str(&s)
    }
}
