//! Kernel behaviour across the CPU providers.
//!
//! The multicore provider is built with `parallel_threshold = 1` so that
//! every kernel takes its rayon path, and is checked against the naive one.

use std::sync::Arc;

use approx::assert_relative_eq;
use ndcompute::backend::{
    BackendProvider, GpuSparseBackend, MulticoreCpuBackend, NaiveCpuBackend, Provider,
};
use ndcompute::{ComputeConfig, DenseTensor, TensorError, c64};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn eager_multicore() -> MulticoreCpuBackend {
    let config = ComputeConfig {
        parallel_threshold: 1,
        num_threads: 3,
        ..ComputeConfig::default()
    };
    MulticoreCpuBackend::with_config(&config).unwrap()
}

fn cpu_providers() -> Vec<Arc<dyn BackendProvider<f64>>> {
    vec![
        Arc::new(NaiveCpuBackend::new()),
        Arc::new(MulticoreCpuBackend::new().unwrap()),
        Arc::new(eager_multicore()),
    ]
}

fn assert_tensors_close(a: &DenseTensor<f64>, b: &DenseTensor<f64>) {
    assert_eq!(a.shape(), b.shape());
    for (x, y) in a.data().iter().zip(b.data()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-10, max_relative = 1e-10);
    }
}

#[test]
fn test_reference_examples() {
    for provider in cpu_providers() {
        let a = provider.create(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        let b = provider.create(vec![4.0, 5.0, 6.0], &[3]).unwrap();
        assert_eq!(provider.dot(&a, &b).unwrap(), 32.0);

        let sum = provider
            .add(&provider.zeros(&[3]).unwrap(), &provider.ones(&[3]).unwrap())
            .unwrap();
        assert_eq!(sum.data(), &[1.0, 1.0, 1.0]);

        let eye = provider.create(vec![1.0, 0.0, 0.0, 1.0], &[2, 2]).unwrap();
        assert_eq!(provider.determinant(&eye).unwrap(), 1.0);
        assert_eq!(provider.active_contexts(), 0, "{}", provider.name());
    }
}

#[test]
fn test_create_reads_back_row_major() {
    let data: Vec<f64> = (0..24).map(|i| i as f64 * 0.5).collect();
    for provider in cpu_providers() {
        let t = provider.create(data.clone(), &[2, 3, 4]).unwrap();
        assert_eq!(t.data(), data.as_slice());
        assert_eq!(t.get(&[1, 2, 3]), Some(&11.5));
        assert_eq!(t.get(&[0, 1, 0]), Some(&2.0));

        assert!(matches!(
            provider.create(vec![0.0; 5], &[2, 3]),
            Err(TensorError::ShapeMismatch { expected: 6, actual: 5 })
        ));
        assert_eq!(provider.active_contexts(), 0);
    }
}

#[test]
fn test_overflowing_shapes_are_errors() {
    let huge = [1usize << 32, 1 << 32];
    for provider in cpu_providers() {
        assert!(matches!(
            provider.create(vec![], &huge),
            Err(TensorError::ShapeMismatch { expected: usize::MAX, actual: 0 })
        ));
        assert!(matches!(provider.zeros(&huge), Err(TensorError::ShapeMismatch { .. })));
        assert!(matches!(provider.ones(&huge), Err(TensorError::ShapeMismatch { .. })));
        assert!(provider.zeros(&[1 << 40, 0]).unwrap().is_empty());
        assert_eq!(provider.active_contexts(), 0);
    }
}

#[test]
fn test_naive_and_multicore_agree() {
    let naive = NaiveCpuBackend::new();
    let multicore = eager_multicore();
    let mut rng = StdRng::seed_from_u64(17);

    let a: DenseTensor<f64> = DenseTensor::randn_with_rng(&[5, 7], &mut rng);
    let b: DenseTensor<f64> = DenseTensor::randn_with_rng(&[5, 7], &mut rng);
    let c: DenseTensor<f64> = DenseTensor::randn_with_rng(&[7, 4], &mut rng);
    let v: DenseTensor<f64> = DenseTensor::randn_with_rng(&[7], &mut rng);
    let w: DenseTensor<f64> = DenseTensor::randn_with_rng(&[7], &mut rng);
    let m: DenseTensor<f64> = DenseTensor::random_invertible_with_rng(6, &mut rng);

    assert_eq!(naive.add(&a, &b).unwrap(), multicore.add(&a, &b).unwrap());
    assert_eq!(naive.subtract(&a, &b).unwrap(), multicore.subtract(&a, &b).unwrap());
    assert_eq!(naive.scale(&a, -2.5).unwrap(), multicore.scale(&a, -2.5).unwrap());
    assert_eq!(naive.transpose(&a).unwrap(), multicore.transpose(&a).unwrap());
    // Rank-1 operands multiply elementwise.
    assert_eq!(naive.multiply(&v, &w).unwrap(), multicore.multiply(&v, &w).unwrap());

    assert_tensors_close(&naive.multiply(&a, &c).unwrap(), &multicore.multiply(&a, &c).unwrap());
    assert_tensors_close(&naive.multiply(&a, &v).unwrap(), &multicore.multiply(&a, &v).unwrap());
    assert_relative_eq!(naive.dot(&v, &w).unwrap(), multicore.dot(&v, &w).unwrap(), epsilon = 1e-12);
    assert_relative_eq!(naive.norm(&a).unwrap(), multicore.norm(&a).unwrap(), epsilon = 1e-12);
    assert_tensors_close(&naive.inverse(&m).unwrap(), &multicore.inverse(&m).unwrap());
    assert_relative_eq!(
        naive.determinant(&m).unwrap(),
        multicore.determinant(&m).unwrap(),
        max_relative = 1e-12
    );

    assert_eq!(naive.active_contexts(), 0);
    assert_eq!(multicore.active_contexts(), 0);
}

#[test]
fn test_multiply_dispatch_by_rank() {
    for provider in cpu_providers() {
        let m = provider.create(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let v = provider.create(vec![1.0, 1.0], &[2]).unwrap();

        let mm = provider.multiply(&m, &m).unwrap();
        assert_eq!(mm.data(), &[7.0, 10.0, 15.0, 22.0]);

        let mv = provider.multiply(&m, &v).unwrap();
        assert_eq!(mv.shape(), &[2]);
        assert_eq!(mv.data(), &[3.0, 7.0]);

        let ew = provider.multiply(&v, &v).unwrap();
        assert_eq!(ew.data(), &[1.0, 1.0]);

        let bad = provider.create(vec![0.0; 3], &[3]).unwrap();
        assert!(provider.multiply(&m, &bad).is_err());
    }
}

#[test]
fn test_shape_and_rank_errors() {
    for provider in cpu_providers() {
        let v3 = provider.zeros(&[3]).unwrap();
        let v4 = provider.zeros(&[4]).unwrap();
        let rect = provider.zeros(&[2, 3]).unwrap();

        assert!(matches!(provider.add(&v3, &v4), Err(TensorError::ShapeMismatch { .. })));
        assert!(provider.dot(&v3, &v4).is_err());
        assert!(matches!(
            provider.dot(&rect, &rect),
            Err(TensorError::RankMismatch { expected: 1, actual: 2 })
        ));
        assert!(matches!(
            provider.inverse(&rect),
            Err(TensorError::NotSquare { rows: 2, cols: 3 })
        ));
        assert!(matches!(
            provider.determinant(&v3),
            Err(TensorError::RankMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(provider.transpose(&v3), Err(TensorError::RankMismatch { .. })));
        assert_eq!(provider.active_contexts(), 0);
    }
}

#[test]
fn test_complex_kernels() {
    let naive = NaiveCpuBackend::new();
    let multicore = eager_multicore();
    let i = c64::new(0.0, 1.0);
    let m = DenseTensor::from_vec(vec![c64::new(1.0, 0.0), i, -i, c64::new(2.0, 0.0)], &[2, 2]).unwrap();

    // det = 1*2 - (i)(-i) = 2 - 1
    let det = BackendProvider::<c64>::determinant(&naive, &m).unwrap();
    assert_relative_eq!(det.re, 1.0, epsilon = 1e-12);
    assert_relative_eq!(det.im, 0.0, epsilon = 1e-12);

    let inv_naive = BackendProvider::<c64>::inverse(&naive, &m).unwrap();
    let inv_multi = BackendProvider::<c64>::inverse(&multicore, &m).unwrap();
    let product = BackendProvider::<c64>::multiply(&multicore, &inv_multi, &m).unwrap();
    for r in 0..2 {
        for c in 0..2 {
            let expected = if r == c { 1.0 } else { 0.0 };
            let p = product.get(&[r, c]).unwrap();
            assert_relative_eq!(p.re, expected, epsilon = 1e-12);
            assert_relative_eq!(p.im, 0.0, epsilon = 1e-12);
            let (x, y) = (inv_naive.get(&[r, c]).unwrap(), inv_multi.get(&[r, c]).unwrap());
            assert_relative_eq!(x.re, y.re, epsilon = 1e-12);
            assert_relative_eq!(x.im, y.im, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_gpu_provider_surface() {
    let absent = GpuSparseBackend::new();
    assert!(!absent.is_available());
    assert!(absent.supports_gpu());
    let err = BackendProvider::<f64>::ones(&absent, &[2]).unwrap_err();
    assert!(err.is_availability_error());

    let present = GpuSparseBackend::with_probe(0, Arc::new(|| true));
    let t = BackendProvider::<f64>::create(&present, vec![1.0, 2.0], &[2]).unwrap();
    assert!(matches!(
        present.add(&t, &t),
        Err(TensorError::UnsupportedOperation { operation: "add", .. })
    ));
    assert_eq!(present.active_contexts(), 0);
}

#[test]
fn test_config_from_json_drives_providers() {
    let config = ComputeConfig::from_json_str(
        r#"{ "singular_epsilon": 0.9, "parallel_threshold": 1, "num_threads": 2 }"#,
    )
    .unwrap();
    let naive = NaiveCpuBackend::with_config(&config).unwrap();
    let multicore = MulticoreCpuBackend::with_config(&config).unwrap();
    assert_eq!(multicore.num_threads(), 2);
    assert_eq!(multicore.parallel_threshold(), 1);

    // Both pivots are 1, within 0.9 * n * max|m_ij| = 1.8.
    let m = DenseTensor::from_vec(vec![1.0, 1.0, 0.0, 1.0], &[2, 2]).unwrap();
    assert!(matches!(naive.inverse(&m), Err(TensorError::Singular { .. })));
    assert!(matches!(multicore.inverse(&m), Err(TensorError::Singular { .. })));
    assert!(NaiveCpuBackend::new().inverse(&m).is_ok());
}
