//! Scalar identities shared by the expectation and covariance engines.
//!
//! All functions use generic type parameter `T: num_traits::Float`.

use num_traits::Float;

/// Accumulated exponential decay over `[0, tau]`.
///
/// # Mathematical Definition
/// ```text
/// decay_integral(α, τ) = (1 - exp(-α·τ)) / α
/// ```
///
/// Evaluated through `exp_m1` so that small `α·τ` keeps full precision.
/// The formula is not special-cased: `α = 0` yields NaN. Use
/// [`decay_integral_limit`] for the limit-aware variant.
///
/// # Examples
/// ```
/// use pricer_vasicek::math::moments::decay_integral;
///
/// let a = decay_integral(1.0_f64, 1.0);
/// assert!((a - 0.6321205588).abs() < 1e-9);
/// ```
#[inline]
pub fn decay_integral<T: Float>(alpha: T, tau: T) -> T {
    -(-alpha * tau).exp_m1() / alpha
}

/// [`decay_integral`] with the `α → 0` limit (`τ`) applied at zero.
#[inline]
pub fn decay_integral_limit<T: Float>(alpha: T, tau: T) -> T {
    if alpha == T::zero() {
        tau
    } else {
        decay_integral(alpha, tau)
    }
}

/// Pairwise coupling coefficient `ρ·σ₁·σ₂ / (α₁·α₂)`.
///
/// Symmetric under swapping the two factors.
#[inline]
pub fn cross_multiply<T: Float>(rho: T, sigma1: T, sigma2: T, alpha1: T, alpha2: T) -> T {
    (rho * sigma1 * sigma2) / (alpha1 * alpha2)
}

/// Cap on Taylor coefficients of `B(x)`; `|α·τ| < 1/4` needs about twelve.
const MAX_DECAY_TERMS: usize = 24;

/// Cap on terms of the incomplete-gamma style series in [`moment_integral`].
const MAX_MOMENT_TERMS: usize = 256;

/// `∫₀^τ B₁(x)·B₂(x) dx` where `B(x) = decay_integral(α, x)`, and `B(x) = x`
/// for a zero speed.
///
/// # Mathematical Definition
/// ```text
/// cross_integral(α₁, α₂, τ) = (τ - A(α₁) - A(α₂) + A(α₁ + α₂)) / (α₁·α₂)
/// α₁ = α₂ = 0 : τ³ / 3
/// α₁ = 0, α₂ = a : (τ²/2 - (1 - exp(-aτ)(1 + aτ)) / a²) / a
/// ```
///
/// The closed form cancels catastrophically as `α·τ → 0`, so any speed with
/// `|α·τ| < 1/4` is expanded as a power series in `α·τ` instead. Zero speeds
/// are the first term of that series, which keeps the result continuous in
/// both speeds and finite when `α₁·α₂` underflows.
///
/// # Examples
/// ```
/// use pricer_vasicek::math::moments::cross_integral;
///
/// let brownian = cross_integral(0.0_f64, 0.0, 1.0);
/// let tiny = cross_integral(1e-12_f64, 1e-12, 1.0);
/// assert!((brownian - 1.0 / 3.0).abs() < 1e-15);
/// assert!((tiny - brownian).abs() < 1e-12);
/// ```
pub fn cross_integral<T: Float>(alpha1: T, alpha2: T, tau: T) -> T {
    let (u, v) = (alpha1 * tau, alpha2 * tau);
    let cutoff = (T::one() + T::one()).powi(-2);
    let cube = tau * tau * tau;
    match (u.abs() < cutoff, v.abs() < cutoff) {
        (true, true) => cube * double_series(u, v),
        (true, false) => cube * mixed_series(u, v),
        (false, true) => cube * mixed_series(v, u),
        (false, false) => {
            (tau - decay_integral(alpha1, tau) - decay_integral(alpha2, tau)
                + decay_integral_limit(alpha1 + alpha2, tau))
                / (alpha1 * alpha2)
        }
    }
}

/// 1, 2, 3, ... built by repeated addition, exact for any `Float`.
fn counting<T: Float>() -> impl Iterator<Item = T> {
    std::iter::successors(Some(T::one()), |k| Some(*k + T::one()))
}

/// Coefficients `c_k = (-u)^(k-1) / k!` of `B(x) = τ Σ c_k (x/τ)^k`, truncated
/// once they drop below machine epsilon.
fn decay_coefficients<T: Float>(u: T) -> Vec<T> {
    let mut coefficients = Vec::with_capacity(MAX_DECAY_TERMS);
    let mut c = T::one();
    for k in counting::<T>().take(MAX_DECAY_TERMS) {
        if k > T::one() {
            c = -c * u / k;
            if c.abs() <= T::epsilon() {
                break;
            }
        }
        coefficients.push(c);
    }
    coefficients
}

/// `Σ_k Σ_l c_k(u)·c_l(v) / (k + l + 1)`, both speeds small.
fn double_series<T: Float>(u: T, v: T) -> T {
    let (c, d) = (decay_coefficients(u), decay_coefficients(v));
    let three = T::one() + T::one() + T::one();
    let mut total = T::zero();
    let mut row_start = three;
    for &ck in &c {
        let mut denominator = row_start;
        for &dl in &d {
            total = total + ck * dl / denominator;
            denominator = denominator + T::one();
        }
        row_start = row_start + T::one();
    }
    total
}

/// `Σ_k c_k(u)·(1/(k+1) - g_k(v)) / v` with `g_k(v) = ∫₀¹ t^k e^(-v·t) dt`,
/// `u` small and `|v| ≥ 1/4`.
fn mixed_series<T: Float>(u: T, v: T) -> T {
    let c = decay_coefficients(u);
    let g = moment_integrals(v, c.len());
    let mut total = T::zero();
    for ((&ck, &gk), k) in c.iter().zip(&g).zip(counting::<T>()) {
        total = total + ck * ((k + T::one()).recip() - gk) / v;
    }
    total
}

/// `g_k(v) = ∫₀¹ t^k e^(-v·t) dt` for `k = 1..=count`.
///
/// Upward recurrence is stable once `|v|` exceeds the highest order; below
/// that each order is summed from a positive-term series.
fn moment_integrals<T: Float>(v: T, count: usize) -> Vec<T> {
    let orders: Vec<T> = counting::<T>().take(count).collect();
    let beyond = orders.last().map_or(true, |&k| v.abs() > k);
    if beyond {
        let decay = (-v).exp();
        let mut g = -(-v).exp_m1() / v;
        orders
            .iter()
            .map(|&k| {
                g = (k * g - decay) / v;
                g
            })
            .collect()
    } else {
        orders.iter().map(|&k| moment_integral(v, k)).collect()
    }
}

fn moment_integral<T: Float>(v: T, k: T) -> T {
    let one = T::one();
    let mut m = T::zero();
    let mut total = T::zero();
    if v > T::zero() {
        // e^(-v) Σ_m v^m / ((k+1)(k+2)...(k+1+m))
        let mut term = (k + one).recip();
        for _ in 0..MAX_MOMENT_TERMS {
            total = total + term;
            m = m + one;
            term = term * v / (k + one + m);
            if term <= T::epsilon() * total {
                break;
            }
        }
        total * (-v).exp()
    } else {
        // Σ_m w^m / (m! (k+1+m)) with w = -v
        let w = -v;
        let mut power = one;
        for _ in 0..MAX_MOMENT_TERMS {
            let term = power / (k + one + m);
            total = total + term;
            if term <= T::epsilon() * total {
                break;
            }
            m = m + one;
            power = power * w / m;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_decay_integral_unit() {
        assert_relative_eq!(
            decay_integral(1.0_f64, 1.0),
            1.0 - (-1.0_f64).exp(),
            epsilon = 1e-14
        );
        assert_relative_eq!(decay_integral(2.0_f64, 1.0), 0.432332358, epsilon = 1e-8);
    }

    #[test]
    fn test_decay_integral_zero_horizon() {
        assert_eq!(decay_integral(0.7_f64, 0.0), 0.0);
    }

    #[test]
    fn test_decay_integral_small_alpha_tends_to_tau() {
        for tau in [0.5_f64, 1.0, 5.0] {
            assert_relative_eq!(decay_integral(1e-6_f64, tau), tau, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_decay_integral_raw_zero_alpha_is_nan() {
        assert!(decay_integral(0.0_f64, 1.0).is_nan());
    }

    #[test]
    fn test_decay_integral_limit() {
        assert_eq!(decay_integral_limit(0.0_f64, 2.5), 2.5);
        assert_eq!(
            decay_integral_limit(0.3_f64, 2.5),
            decay_integral(0.3_f64, 2.5)
        );
    }

    #[test]
    fn test_cross_multiply_symmetric() {
        let ab = cross_multiply(0.4_f64, 0.2, 0.3, 0.5, 1.5);
        let ba = cross_multiply(0.4_f64, 0.3, 0.2, 1.5, 0.5);
        assert_eq!(ab, ba);
        assert_relative_eq!(ab, 0.4 * 0.2 * 0.3 / 0.75, epsilon = 1e-15);
    }

    /// Composite Simpson reference for `∫₀^τ B₁·B₂ dx`.
    fn simpson(alpha1: f64, alpha2: f64, tau: f64) -> f64 {
        let n = 4000;
        let h = tau / n as f64;
        let f = |x: f64| decay_integral_limit(alpha1, x) * decay_integral_limit(alpha2, x);
        let mut total = f(0.0) + f(tau);
        for i in 1..n {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            total += weight * f(i as f64 * h);
        }
        total * h / 3.0
    }

    #[test]
    fn test_cross_integral_both_zero() {
        assert_relative_eq!(cross_integral(0.0_f64, 0.0, 3.0), 9.0, max_relative = 1e-15);
        assert_eq!(cross_integral(0.0_f64, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_cross_integral_one_zero_closed_form() {
        let (a, tau) = (0.8_f64, 2.0);
        let expected =
            (tau * tau / 2.0 - (1.0 - (-a * tau).exp() * (1.0 + a * tau)) / (a * a)) / a;
        assert_relative_eq!(cross_integral(0.0, a, tau), expected, max_relative = 1e-13);
        assert_relative_eq!(cross_integral(a, 0.0, tau), expected, max_relative = 1e-13);
    }

    #[test]
    fn test_cross_integral_large_speeds_use_closed_form() {
        let a = decay_integral(1.0_f64, 1.0);
        let a2 = decay_integral(2.0_f64, 1.0);
        assert_relative_eq!(
            cross_integral(1.0_f64, 1.0, 1.0),
            1.0 - 2.0 * a + a2,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_cross_integral_small_speeds_tend_to_brownian() {
        for alpha in [1e-6_f64, 1e-8, 1e-9, 1e-12, 1e-200] {
            let value = cross_integral(alpha, alpha, 1.0);
            assert!(value > 0.0);
            assert_relative_eq!(value, 1.0 / 3.0, max_relative = 1e-5);
        }
        assert_relative_eq!(
            cross_integral(1e-9_f64, 0.8, 2.0),
            cross_integral(0.0_f64, 0.8, 2.0),
            max_relative = 1e-8
        );
    }

    #[test]
    fn test_cross_integral_matches_quadrature() {
        let speeds = [
            -2.0_f64, -0.3, -1e-7, 0.0, 1e-10, 0.05, 0.2, 0.3, 1.0, 5.0, 40.0,
        ];
        let tau = 2.0;
        for &a in &speeds {
            for &b in &speeds {
                assert_relative_eq!(
                    cross_integral(a, b, tau),
                    simpson(a, b, tau),
                    max_relative = 1e-8
                );
            }
        }
    }

    #[test]
    fn test_cross_integral_continuous_across_series_cutoff() {
        let (below, above) = (0.25_f64 - 1e-12, 0.25_f64 + 1e-12);
        for other in [0.1_f64, 0.7, 30.0, -3.0, -30.0] {
            assert_relative_eq!(
                cross_integral(below, other, 1.0),
                cross_integral(above, other, 1.0),
                max_relative = 1e-8
            );
        }
    }
}
