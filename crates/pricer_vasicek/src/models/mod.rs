//! Closed-form moment engines for the multivariate Vasicek process.
//!
//! Each factor follows
//! ```text
//! dZ_i(t) = α_i (β_i - Z_i(t)) dt + σ_i dW_i(t),   d<W_i, W_j> = ρ_ij dt
//! ```
//!
//! ## Components
//!
//! - `expectation`: `E[Z_i(τ)]` and `E[∫₀^τ Z_i(s) ds]`, with long-run-one variants
//! - `covariance`: `Cov[∫₀^τ Z_i, ∫₀^τ Z_j]` across all factor pairs
//! - `factors`: Validated factor bundle producing integral moments
//!
//! Every operation takes its inputs by reference, evaluates each output cell
//! independently through the engine's [`Executor`], and returns the complete
//! result or an error.

use num_traits::Float;

use crate::config::{DegeneratePolicy, MomentConfig};
use crate::math::moments::{decay_integral, decay_integral_limit};
use crate::mgf::VasicekMgf;
use crate::parallel::{Executor, RayonExecutor, SerialExecutor};
use crate::types::MomentError;

pub mod covariance;
pub mod expectation;
pub mod factors;
mod validation;

pub use factors::{FactorSet, IntegralMoments};

/// Moment engine bundling an executor with its configuration.
///
/// # Examples
///
/// ```
/// use pricer_vasicek::models::VasicekEngine;
///
/// let engine: VasicekEngine = VasicekEngine::default();
/// let e = engine
///     .compute_expectation(&[0.5_f64], &[1.0], &[1.0], 1, 0.0)
///     .unwrap();
/// assert_eq!(e, vec![0.5]);
/// ```
#[derive(Clone, Debug)]
pub struct VasicekEngine<X: Executor = RayonExecutor> {
    executor: X,
    config: MomentConfig,
}

impl Default for VasicekEngine<RayonExecutor> {
    fn default() -> Self {
        Self::new(MomentConfig::default())
    }
}

impl VasicekEngine<RayonExecutor> {
    /// Creates a Rayon-backed engine using the configured parallel settings.
    pub fn new(config: MomentConfig) -> Self {
        Self {
            executor: RayonExecutor::new(config.parallel()),
            config,
        }
    }
}

impl VasicekEngine<SerialExecutor> {
    /// Creates a single-threaded engine.
    pub fn serial(config: MomentConfig) -> Self {
        Self::with_executor(SerialExecutor, config)
    }
}

impl<X: Executor> VasicekEngine<X> {
    /// Creates an engine on a caller-supplied executor.
    pub fn with_executor(executor: X, config: MomentConfig) -> Self {
        Self { executor, config }
    }

    /// Returns the executor.
    #[inline]
    pub fn executor(&self) -> &X {
        &self.executor
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &MomentConfig {
        &self.config
    }

    /// Decay-integral weight under the configured [`DegeneratePolicy`].
    ///
    /// `Limit` maps `α = 0` to `τ`; the other policies evaluate the raw
    /// formula (`Reject` has already screened zeros during validation).
    #[inline]
    pub fn decay_weight<T: Float>(&self, alpha: T, tau: T) -> T {
        match self.config.degenerate_policy() {
            DegeneratePolicy::Limit => decay_integral_limit(alpha, tau),
            DegeneratePolicy::Reject | DegeneratePolicy::Propagate => decay_integral(alpha, tau),
        }
    }

    /// Builds a generating-function evaluator that sums on this engine's executor.
    ///
    /// # Errors
    ///
    /// Returns `MomentError::DimensionMismatch` if `variance` is not
    /// `expectation.len()` square.
    pub fn mgf<T>(
        &self,
        expectation: Vec<T>,
        variance: Vec<Vec<T>>,
    ) -> Result<VasicekMgf<T, X>, MomentError>
    where
        T: Float + Send + Sync,
        X: Clone,
    {
        VasicekMgf::with_executor(expectation, variance, self.executor.clone())
    }
}

#[inline]
pub(crate) fn as_f64<T: Float>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}
