//! Property-based integration tests for the moment engines.
//!
//! Covers zero-horizon identities, mean reversion, covariance symmetry,
//! long-run-one equivalence, and serial vs Rayon determinism.

use approx::assert_relative_eq;
use proptest::prelude::*;
use pricer_vasicek::math::decay_integral;
use pricer_vasicek::parallel::{ParallelConfig, RayonExecutor, SerialExecutor};
use pricer_vasicek::{MomentConfig, VasicekEngine, VasicekMgf};

fn serial() -> VasicekEngine<SerialExecutor> {
    VasicekEngine::serial(MomentConfig::default())
}

fn rayon() -> VasicekEngine<RayonExecutor> {
    // Threshold of one forces the parallel path even for tiny inputs.
    VasicekEngine::with_executor(
        RayonExecutor::new(ParallelConfig::new(1)),
        MomentConfig::default(),
    )
}

/// Equicorrelated matrix with unit diagonal.
fn equicorrelation(n: usize, r: f64) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { r }).collect())
        .collect()
}

/// Factor inputs of a common length.
fn factors_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>, f64)> {
    (1usize..12).prop_flat_map(|n| {
        (
            prop::collection::vec(-2.0..3.0_f64, n),
            prop::collection::vec(0.05..5.0_f64, n),
            prop::collection::vec(0.1..2.0_f64, n),
            prop::collection::vec(0.01..0.8_f64, n),
            -0.2..0.9_f64,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_expectation_at_zero_horizon_is_initial_state(
        (y0, alpha, beta, _sigma, _r) in factors_strategy(),
    ) {
        let n = y0.len();
        let e = serial().compute_expectation(&y0, &alpha, &beta, n, 0.0).unwrap();
        for i in 0..n {
            prop_assert!((e[i] - y0[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_expectation_converges_to_long_run_mean(
        (y0, alpha, beta, _sigma, _r) in factors_strategy(),
    ) {
        let n = y0.len();
        let e = serial().compute_expectation(&y0, &alpha, &beta, n, 2_000.0).unwrap();
        for i in 0..n {
            prop_assert!((e[i] - beta[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_covariance_symmetric(
        (_y0, alpha, _beta, sigma, r) in factors_strategy(),
        tau in 0.0..20.0_f64,
    ) {
        let n = alpha.len();
        let rho = equicorrelation(n, r);
        let var = serial().compute_integral_variance(&alpha, &sigma, &rho, n, tau).unwrap();
        for i in 0..n {
            for j in 0..n {
                prop_assert_eq!(var[i][j], var[j][i]);
            }
        }
    }

    #[test]
    fn test_covariance_diagonal_nonnegative_across_speed_scales(
        exponents in prop::collection::vec(-14.0..0.7_f64, 1..6),
        tau in 0.0..10.0_f64,
    ) {
        let alpha: Vec<f64> = exponents.iter().map(|e| 10f64.powf(*e)).collect();
        let n = alpha.len();
        let sigma = vec![0.3; n];
        let rho = equicorrelation(n, 0.4);
        let var = serial().compute_integral_variance(&alpha, &sigma, &rho, n, tau).unwrap();
        for i in 0..n {
            prop_assert!(var[i][i] >= 0.0);
            // Bounded above by the Brownian integral variance.
            prop_assert!(var[i][i] <= 0.09 * tau * tau * tau / 3.0 * (1.0 + 1e-12));
        }
    }

    #[test]
    fn test_long_run_one_equals_unit_beta(
        (y0, alpha, _beta, _sigma, _r) in factors_strategy(),
        tau in 0.0..30.0_f64,
    ) {
        let n = y0.len();
        let ones = vec![1.0; n];
        let engine = serial();
        prop_assert_eq!(
            engine.compute_expectation(&y0, &alpha, &ones, n, tau).unwrap(),
            engine.compute_expectation_long_run_one(&y0, &alpha, n, tau).unwrap()
        );
        prop_assert_eq!(
            engine.compute_integral_expectation(&y0, &alpha, &ones, n, tau).unwrap(),
            engine.compute_integral_expectation_long_run_one(&y0, &alpha, n, tau).unwrap()
        );
    }

    #[test]
    fn test_serial_and_rayon_bit_identical(
        (y0, alpha, beta, sigma, r) in factors_strategy(),
        tau in 0.0..10.0_f64,
    ) {
        let n = y0.len();
        let rho = equicorrelation(n, r);
        let (s, p) = (serial(), rayon());

        prop_assert_eq!(
            s.compute_expectation(&y0, &alpha, &beta, n, tau).unwrap(),
            p.compute_expectation(&y0, &alpha, &beta, n, tau).unwrap()
        );
        prop_assert_eq!(
            s.compute_integral_expectation(&y0, &alpha, &beta, n, tau).unwrap(),
            p.compute_integral_expectation(&y0, &alpha, &beta, n, tau).unwrap()
        );
        let vs = s.compute_integral_variance(&alpha, &sigma, &rho, n, tau).unwrap();
        let vp = p.compute_integral_variance(&alpha, &sigma, &rho, n, tau).unwrap();
        prop_assert_eq!(&vs, &vp);

        let es = s.compute_integral_expectation(&y0, &alpha, &beta, n, tau).unwrap();
        let u: Vec<f64> = (0..n).map(|i| 0.1 * (i as f64 + 1.0)).collect();
        let ms = s.mgf(es.clone(), vs).unwrap().eval(&u).unwrap();
        let mp = p.mgf(es, vp).unwrap().eval(&u).unwrap();
        prop_assert_eq!(ms.to_bits(), mp.to_bits());
    }
}

#[test]
fn test_decay_integral_small_alpha_limit() {
    for tau in [0.1, 1.0, 7.5] {
        assert_relative_eq!(decay_integral(1e-6_f64, tau), tau, max_relative = 1e-5);
    }
}

#[test]
fn test_single_factor_variance_reference_value() {
    let var = serial()
        .compute_integral_variance(&[1.0], &[1.0], &[vec![1.0]], 1, 1.0)
        .unwrap();
    assert_relative_eq!(decay_integral(1.0_f64, 1.0), 0.63212, epsilon = 1e-5);
    assert_relative_eq!(decay_integral(2.0_f64, 1.0), 0.43233, epsilon = 1e-5);
    assert_relative_eq!(var[0][0], 0.16809, epsilon = 1e-5);
}

#[test]
fn test_mgf_unit_at_origin_with_zero_covariance() {
    let mgf = VasicekMgf::new(vec![1.0, -2.0], vec![vec![0.0; 2]; 2]).unwrap();
    assert_eq!(mgf.eval(&[0.0_f64, 0.0]).unwrap(), 1.0);
}

#[test]
fn test_integral_mgf_matches_lognormal_moment() {
    // Zero-coupon style E[exp(-∫Z)] for a single factor equals exp(-E + Var/2).
    let engine = serial();
    let (y0, alpha, beta, sigma, tau) = ([0.02_f64], [0.3], [0.05], [0.01], 5.0);
    let e = engine
        .compute_integral_expectation(&y0, &alpha, &beta, 1, tau)
        .unwrap();
    let v = engine
        .compute_integral_variance(&alpha, &sigma, &[vec![1.0]], 1, tau)
        .unwrap();
    let expected = (-e[0] + 0.5 * v[0][0]).exp();
    let mgf = engine.mgf(e, v).unwrap();
    assert_relative_eq!(mgf.eval(&[-1.0_f64]).unwrap(), expected, max_relative = 1e-14);
}
