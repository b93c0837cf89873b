//! Flatten stage.
//!
//! Collapses a `(C, H, W)` tensor into a `(1, 1, C * H * W)` tensor on the way forward and
//! restores the recorded `(C, H, W)` shape on the way back. Element `(c, h, w)` maps to
//! position `c * H * W + h * W + w`; backward uses the same mapping, so the stage is a pure
//! permutation of scalars.
//!
//! The stage has no parameters. `update_weights`, `all_weights` and `l2_regularization`
//! exist only to satisfy [`Layer`].

use tracing::debug;

use crate::{Error, Layer, Result, Shape3, Tensor3};

/// How an upstream gradient was laid out when it reached `backward`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GradientLayout {
    /// `(1, 1, N)`, the shape `forward` produces.
    Canonical,
    /// Any other shape, read in `(outer, middle, inner)` order.
    Reshaped,
}

/// Parameter-free layer that flattens `(C, H, W)` into `(1, 1, C * H * W)`.
///
/// The shape seen by the most recent successful `forward` is recorded and required by
/// `backward`. Each instance tracks one forward/backward pair at a time; use one instance
/// per network replica.
///
/// ```rust
/// use cnn_flatten::{Flatten, Layer, Tensor3};
///
/// # fn main() -> cnn_flatten::Result<()> {
/// let mut flatten = Flatten::new();
/// let x = Tensor3::from_nested(&[vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]])?;
///
/// let y = flatten.forward(&x)?;
/// assert_eq!(y.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
///
/// let dx = flatten.backward(&y, 0.1)?;
/// assert_eq!(dx, x);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Flatten {
    stored_shape: Option<Shape3>,
}

impl Flatten {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shape recorded by the last successful `forward`, if any.
    #[inline]
    pub fn stored_shape(&self) -> Option<Shape3> {
        self.stored_shape
    }

    /// Shape `forward` produced for the recorded input, if any.
    #[inline]
    pub fn output_shape(&self) -> Option<Shape3> {
        self.stored_shape.map(|s| Shape3::new(1, 1, s.len()))
    }

    fn flat_gradient(upstream: &Tensor3) -> (&[f32], GradientLayout) {
        let s = upstream.shape();
        if s.channels == 1 && s.height == 1 {
            (upstream.row(0, 0), GradientLayout::Canonical)
        } else {
            // Contiguous storage already holds the rows in (outer, middle, inner) order.
            (upstream.as_slice(), GradientLayout::Reshaped)
        }
    }
}

impl Layer for Flatten {
    fn name(&self) -> &'static str {
        "flatten"
    }

    fn forward(&mut self, input: &Tensor3) -> Result<Tensor3> {
        let shape = input.shape();
        if shape.is_empty() {
            debug!(%shape, "flatten forward rejected empty input");
            return Err(Error::InvalidInput(format!(
                "flatten forward: input shape {shape} has an empty dimension"
            )));
        }

        let n = shape.checked_len().ok_or_else(|| {
            Error::InvalidInput(format!("flatten forward: input shape {shape} overflows usize"))
        })?;
        let output = Tensor3::from_flat((1, 1, n), input.as_slice().to_vec())?;
        self.stored_shape = Some(shape);
        debug!(%shape, elements = n, "flatten forward");
        Ok(output)
    }

    fn backward(&mut self, upstream: &Tensor3, _learning_rate: f32) -> Result<Tensor3> {
        let Some(stored) = self.stored_shape else {
            debug!("flatten backward called before forward");
            return Err(Error::State(
                "flatten backward: no shape recorded, call forward first".to_owned(),
            ));
        };

        let (flat, layout) = Self::flat_gradient(upstream);
        let expected = stored.len();
        if flat.len() != expected {
            debug!(
                gradient = %upstream.shape(),
                %stored,
                "flatten backward rejected gradient size"
            );
            return Err(Error::InvalidInput(format!(
                "flatten backward: gradient {} has {} elements, expected {expected} for stored shape {stored}",
                upstream.shape(),
                flat.len()
            )));
        }

        debug!(gradient = %upstream.shape(), ?layout, %stored, "flatten backward");
        Tensor3::from_flat(stored, flat.to_vec())
    }

    fn update_weights(&mut self, _learning_rate: f32) {}

    fn all_weights(&self) -> Vec<f32> {
        Vec::new()
    }

    fn l2_regularization(&self, _factor: f32) -> f32 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Tensor3 {
        Tensor3::from_nested(&[
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![vec![5.0, 6.0], vec![7.0, 8.0]],
        ])
        .unwrap()
    }

    #[test]
    fn new_stage_has_no_shape() {
        let f = Flatten::new();
        assert_eq!(f.stored_shape(), None);
        assert_eq!(f.output_shape(), None);
    }

    #[test]
    fn forward_flattens_cube_and_records_shape() {
        let mut f = Flatten::new();
        let y = f.forward(&cube()).unwrap();
        assert_eq!(y.shape(), Shape3::new(1, 1, 8));
        assert_eq!(y.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(f.stored_shape(), Some(Shape3::new(2, 2, 2)));
        assert_eq!(f.output_shape(), Some(Shape3::new(1, 1, 8)));
    }

    #[test]
    fn forward_rejects_each_empty_extent() {
        for shape in [
            Shape3::new(0, 2, 2),
            Shape3::new(2, 0, 2),
            Shape3::new(2, 2, 0),
        ] {
            let mut f = Flatten::new();
            let err = f.forward(&Tensor3::zeros(shape).unwrap()).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "{shape}");
            assert_eq!(f.stored_shape(), None);
        }
    }

    #[test]
    fn failed_forward_keeps_previous_shape() {
        let mut f = Flatten::new();
        f.forward(&cube()).unwrap();
        assert!(f.forward(&Tensor3::zeros((1, 0, 3)).unwrap()).is_err());
        assert_eq!(f.stored_shape(), Some(Shape3::new(2, 2, 2)));
    }

    #[test]
    fn forward_overwrites_shape() {
        let mut f = Flatten::new();
        f.forward(&cube()).unwrap();
        f.forward(&Tensor3::zeros((3, 1, 4)).unwrap()).unwrap();
        assert_eq!(f.stored_shape(), Some(Shape3::new(3, 1, 4)));
    }

    #[test]
    fn backward_before_forward_is_state_error() {
        let mut f = Flatten::new();
        let err = f.backward(&Tensor3::zeros((1, 1, 4)).unwrap(), 0.1).unwrap_err();
        assert!(matches!(err, Error::State(_)));
    }

    #[test]
    fn backward_restores_stored_shape() {
        let mut f = Flatten::new();
        f.forward(&Tensor3::zeros((2, 1, 2)).unwrap()).unwrap();

        let g = Tensor3::from_flat((1, 1, 4), vec![10.0, 20.0, 30.0, 40.0]).unwrap();
        let dx = f.backward(&g, 0.1).unwrap();
        assert_eq!(
            dx.to_nested(),
            vec![vec![vec![10.0, 20.0]], vec![vec![30.0, 40.0]]]
        );
    }

    #[test]
    fn backward_accepts_non_canonical_gradient() {
        let mut f = Flatten::new();
        f.forward(&Tensor3::zeros((2, 1, 2)).unwrap()).unwrap();

        let g = Tensor3::from_flat((2, 2, 1), vec![10.0, 20.0, 30.0, 40.0]).unwrap();
        let dx = f.backward(&g, 0.0).unwrap();
        assert_eq!(dx.shape(), Shape3::new(2, 1, 2));
        assert_eq!(dx.as_slice(), &[10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn backward_size_mismatch_keeps_shape() {
        let mut f = Flatten::new();
        f.forward(&cube()).unwrap();

        let err = f.backward(&Tensor3::zeros((1, 1, 7)).unwrap(), 0.1).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(f.stored_shape(), Some(Shape3::new(2, 2, 2)));

        // Caller can retry with a correctly sized gradient.
        let dx = f.backward(&Tensor3::zeros((1, 1, 8)).unwrap(), 0.1).unwrap();
        assert_eq!(dx.shape(), Shape3::new(2, 2, 2));
    }

    #[test]
    fn parameter_free_operations() {
        let mut f = Flatten::new();
        f.update_weights(0.5);
        assert!(f.all_weights().is_empty());
        assert_eq!(f.l2_regularization(0.01), 0.0);
        assert_eq!(f.l2_regularization(1e6), 0.0);
        assert_eq!(f.stored_shape(), None);
    }
}
