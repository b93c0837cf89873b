use criterion::{Criterion, black_box, criterion_group, criterion_main};

use cnn_flatten::{Flatten, Layer, Tensor3};

fn flatten_forward_bench(c: &mut Criterion) {
    let mut flatten = Flatten::new();
    let input = Tensor3::from_flat((64, 28, 28), vec![0.1_f32; 64 * 28 * 28]).unwrap();

    c.bench_function("flatten_forward_64x28x28", |b| {
        b.iter(|| {
            let out = flatten.forward(black_box(&input)).unwrap();
            black_box(out);
        })
    });
}

fn flatten_backward_bench(c: &mut Criterion) {
    let mut flatten = Flatten::new();
    let input = Tensor3::zeros((64, 28, 28)).unwrap();
    let grad = flatten.forward(&input).unwrap();

    c.bench_function("flatten_backward_64x28x28", |b| {
        b.iter(|| {
            let d_input = flatten.backward(black_box(&grad), 0.01).unwrap();
            black_box(d_input);
        })
    });
}

criterion_group!(benches, flatten_forward_bench, flatten_backward_bench);
criterion_main!(benches);
