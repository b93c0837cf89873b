#[cfg(not(feature = "serde"))]
fn main() {
    println!("enable the `serde` feature: cargo run --example save_load_json --features serde");
}

#[cfg(feature = "serde")]
fn main() -> cnn_flatten::Result<()> {
    use cnn_flatten::{Flatten, Layer, Tensor3};

    let x = Tensor3::from_nested(&[vec![vec![0.5, -1.0], vec![2.25, 8.0]]])?;
    let y = Flatten::new().forward(&x)?;

    let path = "target/tmp_flattened.json";
    y.save_json(path)?;

    let loaded = Tensor3::load_json(path)?;
    assert_eq!(loaded, y);
    println!("saved and loaded tensor {}: {path}", loaded.shape());
    Ok(())
}
