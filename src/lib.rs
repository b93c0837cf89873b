//! Flatten stage for a small CNN pipeline.
//!
//! `cnn-flatten` provides the parameter-free layer that sits between convolutional/pooling
//! stages and dense stages: it collapses a `(C, H, W)` tensor into `(1, 1, C * H * W)` on the
//! forward pass and restores the original shape on the backward pass.
//!
//! # Data layout and shapes
//!
//! - Scalars are `f32`.
//! - [`Tensor3`] stores values contiguously in channel-major, row-major order:
//!   element `(c, h, w)` lives at `c * H * W + h * W + w`.
//! - Flattening uses the same order, so `forward` followed by `backward` is the identity.
//!
//! # Errors
//!
//! Every layer operation that can fail returns [`Result`]. Misuse is reported, never
//! papered over:
//!
//! - [`Error::InvalidInput`]: a zero extent on forward, or a gradient whose element count
//!   differs from the recorded shape on backward.
//! - [`Error::State`]: backward called before any successful forward.
//!
//! # Quick start
//!
//! ```rust
//! use cnn_flatten::{Flatten, Layer, Shape3, Tensor3};
//!
//! # fn main() -> cnn_flatten::Result<()> {
//! let x = Tensor3::from_nested(&[
//!     vec![vec![1.0, 2.0], vec![3.0, 4.0]],
//!     vec![vec![5.0, 6.0], vec![7.0, 8.0]],
//! ])?;
//!
//! let mut flatten = Flatten::new();
//! let y = flatten.forward(&x)?;
//! assert_eq!(y.shape(), Shape3::new(1, 1, 8));
//! assert_eq!(y.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
//!
//! let dx = flatten.backward(&y, 0.1)?;
//! assert_eq!(dx, x);
//! # Ok(())
//! # }
//! ```
//!
//! # Driving several layers
//!
//! [`Sequential`] runs any stack of [`Layer`]s forward in order and backward in reverse:
//!
//! ```rust
//! use cnn_flatten::{Flatten, Sequential, Shape3, Tensor3};
//!
//! # fn main() -> cnn_flatten::Result<()> {
//! let mut net = Sequential::new().with(Flatten::new());
//! let y = net.forward(&Tensor3::zeros((3, 4, 4))?)?;
//! let dx = net.backward(&y, 0.01)?;
//! assert_eq!(dx.shape(), Shape3::new(3, 4, 4));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod flatten;
pub mod layer;
pub mod sequential;
pub mod tensor;

#[cfg(feature = "serde")]
pub mod serde_tensor;

pub use error::{Error, Result};
pub use flatten::Flatten;
pub use layer::Layer;
pub use sequential::Sequential;
pub use tensor::{Shape3, Tensor3};

#[cfg(feature = "serde")]
pub use serde_tensor::{SerializedTensor3, TENSOR_FORMAT_VERSION};
