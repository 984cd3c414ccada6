//! Integral covariance across correlated Vasicek factors.
//!
//! ```text
//! Cov[∫₀^τ Z_i, ∫₀^τ Z_j] = ρ_ij σ_i σ_j / (α_i α_j) · (τ - A_i - A_j + A(α_i + α_j, τ))
//! ```
//! with `A_i = A(α_i, τ)` the decay-integral weight. At `τ = 0` every cell is zero.
//!
//! Except under `DegeneratePolicy::Propagate`, cells are evaluated through
//! [`cross_integral`], which stays accurate for small and zero speeds.

use num_traits::Float;

use super::validation::{
    check_correlation, check_horizon, check_len, find_cancelling_pair, find_zero,
    reject_zero_pair_speed,
};
use super::{as_f64, VasicekEngine};
use crate::config::DegeneratePolicy;
use crate::math::moments::{cross_integral, cross_multiply, decay_integral};
use crate::parallel::Executor;
use crate::types::MomentError;

impl<X: Executor> VasicekEngine<X> {
    /// Covariance matrix of the factor time integrals over `[0, tau]`.
    ///
    /// # Errors
    ///
    /// - `MomentError::DimensionMismatch` if `alpha`, `sigma` or `rho` do not have `n` entries
    /// - `MomentError::InvalidCorrelation` if `rho` is ragged, asymmetric or out of `[-1, 1]`
    /// - `MomentError::InvalidHorizon` if `tau` is negative or not finite
    /// - `MomentError::DegenerateParameter` under `DegeneratePolicy::Reject`
    ///
    /// Only the upper triangle of `rho` is read, so the result is exactly
    /// symmetric even when `rho` is symmetric only within tolerance.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_vasicek::models::VasicekEngine;
    ///
    /// let engine: VasicekEngine = VasicekEngine::default();
    /// let var = engine
    ///     .compute_integral_variance(&[1.0_f64], &[1.0], &[vec![1.0]], 1, 1.0)
    ///     .unwrap();
    /// assert!((var[0][0] - 0.16809).abs() < 1e-5);
    /// ```
    pub fn compute_integral_variance<T, R>(
        &self,
        alpha: &[T],
        sigma: &[T],
        rho: &[R],
        n: usize,
        tau: T,
    ) -> Result<Vec<Vec<T>>, MomentError>
    where
        T: Float + Send + Sync,
        R: AsRef<[T]> + Sync,
    {
        self.compute_integral_variance_with(alpha, sigma, rho, n, tau, |x: &T| *x)
    }

    /// [`compute_integral_variance`](Self::compute_integral_variance) over
    /// composite elements, projected to scalars by `get`.
    pub fn compute_integral_variance_with<E, R, T, G>(
        &self,
        alpha: &[E],
        sigma: &[E],
        rho: &[R],
        n: usize,
        tau: T,
        get: G,
    ) -> Result<Vec<Vec<T>>, MomentError>
    where
        E: Sync,
        R: AsRef<[E]> + Sync,
        T: Float + Send + Sync,
        G: Fn(&E) -> T + Sync,
    {
        check_len("alpha", alpha.len(), n)?;
        check_len("sigma", sigma.len(), n)?;
        check_correlation(
            rho,
            n,
            self.config.correlation_tolerance(),
            self.config.validate_correlation(),
            &get,
        )?;
        check_horizon(tau)?;

        let policy = self.config.degenerate_policy();
        match policy {
            DegeneratePolicy::Reject => reject_zero_pair_speed(alpha, &get)?,
            DegeneratePolicy::Limit => {
                if let Some(index) = find_zero(alpha, &get) {
                    tracing::warn!(index, "zero mean reversion, using integrated limit");
                } else if let Some((i, j)) = find_cancelling_pair(alpha, &get) {
                    tracing::warn!(i, j, "mean reversion speeds cancel, using integrated limit");
                }
            }
            DegeneratePolicy::Propagate => {}
        }
        tracing::debug!(n, tau = as_f64(tau), "computing Vasicek integral covariance");

        let cell = |i: usize, j: usize| {
            // Canonical order keeps the matrix exactly symmetric.
            let (p, q) = if i <= j { (i, j) } else { (j, i) };
            let r = get(&rho[p].as_ref()[q]);
            let (ap, aq) = (get(&alpha[p]), get(&alpha[q]));
            let (sp, sq) = (get(&sigma[p]), get(&sigma[q]));

            match policy {
                DegeneratePolicy::Propagate => {
                    cross_multiply(r, sp, sq, ap, aq)
                        * (tau - decay_integral(ap, tau) - decay_integral(aq, tau)
                            + decay_integral(ap + aq, tau))
                }
                DegeneratePolicy::Limit | DegeneratePolicy::Reject => {
                    r * sp * sq * cross_integral(ap, aq, tau)
                }
            }
        };

        Ok(self
            .executor
            .map(0..n, |i| self.executor.map(0..n, |j| cell(i, j))))
    }
}
