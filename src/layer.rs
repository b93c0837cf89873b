//! The layer interface driven by the network pipeline.
//!
//! A network calls `forward` on each layer in order, `backward` on each layer in reverse
//! order during training, and `update_weights` afterwards. Layers without parameters still
//! implement every method so that the driver can treat all layers uniformly.

use crate::{Result, Tensor3};

pub trait Layer: Send {
    /// Short human-readable layer kind, used in logs.
    fn name(&self) -> &'static str;

    /// Inference-direction transform.
    fn forward(&mut self, input: &Tensor3) -> Result<Tensor3>;

    /// Gradient-direction transform.
    ///
    /// `upstream` is dL/d(output); the return value is dL/d(input).
    fn backward(&mut self, upstream: &Tensor3, learning_rate: f32) -> Result<Tensor3>;

    /// Apply any accumulated parameter updates.
    fn update_weights(&mut self, learning_rate: f32);

    /// All trainable parameters, flattened in a layer-defined order.
    fn all_weights(&self) -> Vec<f32>;

    /// This layer's contribution to the L2 penalty for the given factor.
    fn l2_regularization(&self, factor: f32) -> f32;
}
