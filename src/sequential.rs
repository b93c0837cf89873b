//! Minimal network driver.
//!
//! `Sequential` owns a stack of boxed layers and drives them the way a training loop
//! does: `forward` front to back, `backward` back to front, then `update_weights`.

use tracing::trace;

use crate::{Layer, Result, Tensor3};

#[derive(Default)]
pub struct Sequential {
    layers: Vec<Box<dyn Layer>>,
}

impl Sequential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer (builder style).
    pub fn with(mut self, layer: impl Layer + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn push(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    /// Run every layer's forward pass in order.
    ///
    /// With no layers this returns a copy of `input`.
    pub fn forward(&mut self, input: &Tensor3) -> Result<Tensor3> {
        let mut x = input.clone();
        for (idx, layer) in self.layers.iter_mut().enumerate() {
            trace!(idx, layer = layer.name(), shape = %x.shape(), "forward");
            x = layer.forward(&x)?;
        }
        Ok(x)
    }

    /// Run every layer's backward pass in reverse order.
    ///
    /// `grad` is dL/d(output of the last layer). Returns dL/d(input).
    pub fn backward(&mut self, grad: &Tensor3, learning_rate: f32) -> Result<Tensor3> {
        let mut g = grad.clone();
        for (idx, layer) in self.layers.iter_mut().enumerate().rev() {
            trace!(idx, layer = layer.name(), shape = %g.shape(), "backward");
            g = layer.backward(&g, learning_rate)?;
        }
        Ok(g)
    }

    pub fn update_weights(&mut self, learning_rate: f32) {
        for layer in &mut self.layers {
            layer.update_weights(learning_rate);
        }
    }

    /// Every layer's weights, concatenated in layer order.
    pub fn all_weights(&self) -> Vec<f32> {
        self.layers.iter().flat_map(|l| l.all_weights()).collect()
    }

    /// Sum of every layer's L2 contribution.
    pub fn l2_regularization(&self, factor: f32) -> f32 {
        self.layers.iter().map(|l| l.l2_regularization(factor)).sum()
    }
}

impl std::fmt::Debug for Sequential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequential")
            .field("layers", &self.layer_names())
            .finish()
    }
}
