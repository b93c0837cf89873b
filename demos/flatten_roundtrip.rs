use cnn_flatten::{Flatten, Layer, Tensor3};

fn main() -> cnn_flatten::Result<()> {
    // Two 2x3 feature maps, as a conv stage would hand them over.
    let x = Tensor3::from_nested(&[
        vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        vec![vec![7.0, 8.0, 9.0], vec![10.0, 11.0, 12.0]],
    ])?;

    let mut flatten = Flatten::new();
    let y = flatten.forward(&x)?;
    println!("forward {} -> {}: {:?}", x.shape(), y.shape(), y.as_slice());

    // Pretend the dense stage sent back a gradient of ones.
    let grad = Tensor3::from_flat(y.shape(), vec![1.0; y.len()])?;
    let dx = flatten.backward(&grad, 0.01)?;
    println!("backward {} -> {}: {:?}", grad.shape(), dx.shape(), dx.to_nested());

    // A mis-sized gradient is rejected and the recorded shape survives.
    let bad = Tensor3::zeros((1, 1, y.len() - 1))?;
    if let Err(e) = flatten.backward(&bad, 0.01) {
        println!("rejected: {e}");
    }
    println!("stored shape still {:?}", flatten.stored_shape());

    Ok(())
}
