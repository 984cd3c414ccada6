//! Per-factor expectation and time-integral expectation.
//!
//! ```text
//! E[Z_i(τ)]          = (y0_i - β_i) exp(-α_i τ) + β_i
//! E[∫₀^τ Z_i(s) ds]  = (y0_i - β_i) A(α_i, τ) + β_i τ,   A(α, τ) = (1 - exp(-α τ)) / α
//! ```
//!
//! The `long_run_one` variants fix `β_i = 1`, the normalisation used for
//! default-intensity style systemic factors. Each output index depends only
//! on the same-index inputs.

use num_traits::Float;

use super::validation::{check_horizon, check_len, find_zero, reject_zero_speed};
use super::{as_f64, VasicekEngine};
use crate::config::DegeneratePolicy;
use crate::parallel::Executor;
use crate::types::MomentError;

impl<X: Executor> VasicekEngine<X> {
    /// Conditional expectation of each factor at horizon `tau`.
    ///
    /// # Errors
    ///
    /// - `MomentError::DimensionMismatch` if any input does not have `n` elements
    /// - `MomentError::InvalidHorizon` if `tau` is negative or not finite
    pub fn compute_expectation<T>(
        &self,
        y0: &[T],
        alpha: &[T],
        beta: &[T],
        n: usize,
        tau: T,
    ) -> Result<Vec<T>, MomentError>
    where
        T: Float + Send + Sync,
    {
        self.compute_expectation_with(y0, alpha, beta, n, tau, |x: &T| *x)
    }

    /// [`compute_expectation`](Self::compute_expectation) over composite
    /// elements, projected to scalars by `get`.
    pub fn compute_expectation_with<E, T, G>(
        &self,
        y0: &[E],
        alpha: &[E],
        beta: &[E],
        n: usize,
        tau: T,
        get: G,
    ) -> Result<Vec<T>, MomentError>
    where
        E: Sync,
        T: Float + Send + Sync,
        G: Fn(&E) -> T + Sync,
    {
        check_len("beta", beta.len(), n)?;
        self.expectation_kernel(y0, alpha, n, tau, &get, |i| get(&beta[i]))
    }

    /// Conditional expectation with every long-run mean fixed to one.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compute_expectation`](Self::compute_expectation).
    pub fn compute_expectation_long_run_one<T>(
        &self,
        y0: &[T],
        alpha: &[T],
        n: usize,
        tau: T,
    ) -> Result<Vec<T>, MomentError>
    where
        T: Float + Send + Sync,
    {
        self.compute_expectation_long_run_one_with(y0, alpha, n, tau, |x: &T| *x)
    }

    /// [`compute_expectation_long_run_one`](Self::compute_expectation_long_run_one)
    /// over composite elements.
    pub fn compute_expectation_long_run_one_with<E, T, G>(
        &self,
        y0: &[E],
        alpha: &[E],
        n: usize,
        tau: T,
        get: G,
    ) -> Result<Vec<T>, MomentError>
    where
        E: Sync,
        T: Float + Send + Sync,
        G: Fn(&E) -> T + Sync,
    {
        self.expectation_kernel(y0, alpha, n, tau, &get, |_| T::one())
    }

    /// Expectation of the time integral `∫₀^τ Z_i(s) ds` of each factor.
    ///
    /// # Errors
    ///
    /// - `MomentError::DimensionMismatch` if any input does not have `n` elements
    /// - `MomentError::InvalidHorizon` if `tau` is negative or not finite
    /// - `MomentError::DegenerateParameter` if some `α_i = 0` under `DegeneratePolicy::Reject`
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_vasicek::models::VasicekEngine;
    ///
    /// let engine: VasicekEngine = VasicekEngine::default();
    /// let e = engine
    ///     .compute_integral_expectation(&[0.0_f64], &[1.0], &[0.0], 1, 1.0)
    ///     .unwrap();
    /// assert_eq!(e, vec![0.0]);
    /// ```
    pub fn compute_integral_expectation<T>(
        &self,
        y0: &[T],
        alpha: &[T],
        beta: &[T],
        n: usize,
        tau: T,
    ) -> Result<Vec<T>, MomentError>
    where
        T: Float + Send + Sync,
    {
        self.compute_integral_expectation_with(y0, alpha, beta, n, tau, |x: &T| *x)
    }

    /// [`compute_integral_expectation`](Self::compute_integral_expectation)
    /// over composite elements.
    pub fn compute_integral_expectation_with<E, T, G>(
        &self,
        y0: &[E],
        alpha: &[E],
        beta: &[E],
        n: usize,
        tau: T,
        get: G,
    ) -> Result<Vec<T>, MomentError>
    where
        E: Sync,
        T: Float + Send + Sync,
        G: Fn(&E) -> T + Sync,
    {
        check_len("beta", beta.len(), n)?;
        self.integral_expectation_kernel(y0, alpha, n, tau, &get, |i| get(&beta[i]))
    }

    /// Integral expectation with every long-run mean fixed to one.
    ///
    /// # Errors
    ///
    /// Same conditions as
    /// [`compute_integral_expectation`](Self::compute_integral_expectation).
    pub fn compute_integral_expectation_long_run_one<T>(
        &self,
        y0: &[T],
        alpha: &[T],
        n: usize,
        tau: T,
    ) -> Result<Vec<T>, MomentError>
    where
        T: Float + Send + Sync,
    {
        self.compute_integral_expectation_long_run_one_with(y0, alpha, n, tau, |x: &T| *x)
    }

    /// [`compute_integral_expectation_long_run_one`](Self::compute_integral_expectation_long_run_one)
    /// over composite elements.
    pub fn compute_integral_expectation_long_run_one_with<E, T, G>(
        &self,
        y0: &[E],
        alpha: &[E],
        n: usize,
        tau: T,
        get: G,
    ) -> Result<Vec<T>, MomentError>
    where
        E: Sync,
        T: Float + Send + Sync,
        G: Fn(&E) -> T + Sync,
    {
        self.integral_expectation_kernel(y0, alpha, n, tau, &get, |_| T::one())
    }

    fn expectation_kernel<E, T, G, B>(
        &self,
        y0: &[E],
        alpha: &[E],
        n: usize,
        tau: T,
        get: &G,
        beta: B,
    ) -> Result<Vec<T>, MomentError>
    where
        E: Sync,
        T: Float + Send + Sync,
        G: Fn(&E) -> T + Sync,
        B: Fn(usize) -> T + Sync + Send,
    {
        check_len("y0", y0.len(), n)?;
        check_len("alpha", alpha.len(), n)?;
        check_horizon(tau)?;
        tracing::debug!(n, tau = as_f64(tau), "computing Vasicek expectation");

        Ok(self.executor.map(0..n, |i| {
            let b = beta(i);
            (get(&y0[i]) - b) * (-get(&alpha[i]) * tau).exp() + b
        }))
    }

    fn integral_expectation_kernel<E, T, G, B>(
        &self,
        y0: &[E],
        alpha: &[E],
        n: usize,
        tau: T,
        get: &G,
        beta: B,
    ) -> Result<Vec<T>, MomentError>
    where
        E: Sync,
        T: Float + Send + Sync,
        G: Fn(&E) -> T + Sync,
        B: Fn(usize) -> T + Sync + Send,
    {
        check_len("y0", y0.len(), n)?;
        check_len("alpha", alpha.len(), n)?;
        check_horizon(tau)?;
        match self.config.degenerate_policy() {
            DegeneratePolicy::Reject => reject_zero_speed(alpha, get)?,
            DegeneratePolicy::Limit => {
                if let Some(index) = find_zero(alpha, get) {
                    tracing::warn!(index, "zero mean reversion, using tau as decay weight");
                }
            }
            DegeneratePolicy::Propagate => {}
        }
        tracing::debug!(n, tau = as_f64(tau), "computing Vasicek integral expectation");

        Ok(self.executor.map(0..n, |i| {
            let b = beta(i);
            (get(&y0[i]) - b) * self.decay_weight(get(&alpha[i]), tau) + b * tau
        }))
    }
}
