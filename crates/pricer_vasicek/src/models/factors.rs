//! Validated bundle of multivariate Vasicek factor parameters.
//!
//! A [`FactorSet`] owns `y0`, `alpha`, optional `beta`, `sigma` and `rho` for
//! `n` factors. Without `beta` the factors revert to one, the normalisation
//! used for systemic default-intensity factors in credit portfolios.

use num_traits::Float;

use super::validation::check_len;
use super::VasicekEngine;
use crate::mgf::VasicekMgf;
use crate::parallel::Executor;
use crate::types::MomentError;

/// Multivariate Vasicek factor parameters.
///
/// # Examples
///
/// ```
/// use pricer_vasicek::models::{FactorSet, VasicekEngine};
///
/// let factors = FactorSet::new(
///     vec![1.0_f64, 1.0],
///     vec![0.5, 0.8],
///     None,
///     vec![0.3, 0.2],
///     vec![vec![1.0, 0.4], vec![0.4, 1.0]],
/// )
/// .unwrap();
///
/// let engine: VasicekEngine = VasicekEngine::default();
/// let moments = factors.integral_moments(&engine, 1.0).unwrap();
/// // Starting at the long-run mean of one, the integral expectation is tau.
/// assert!((moments.expectation[0] - 1.0).abs() < 1e-12);
///
/// let mgf = moments.into_mgf().unwrap();
/// assert_eq!(mgf.dimension(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FactorSet<T> {
    y0: Vec<T>,
    alpha: Vec<T>,
    beta: Option<Vec<T>>,
    sigma: Vec<T>,
    rho: Vec<Vec<T>>,
}

impl<T: Float + Send + Sync> FactorSet<T> {
    /// Creates a factor set, checking every input against `y0.len()`.
    ///
    /// Correlation values are validated by the engine at computation time.
    ///
    /// # Errors
    ///
    /// Returns `MomentError::DimensionMismatch` for inconsistent lengths.
    pub fn new(
        y0: Vec<T>,
        alpha: Vec<T>,
        beta: Option<Vec<T>>,
        sigma: Vec<T>,
        rho: Vec<Vec<T>>,
    ) -> Result<Self, MomentError> {
        let n = y0.len();
        check_len("alpha", alpha.len(), n)?;
        if let Some(beta) = &beta {
            check_len("beta", beta.len(), n)?;
        }
        check_len("sigma", sigma.len(), n)?;
        check_len("rho", rho.len(), n)?;
        for row in &rho {
            check_len("rho row", row.len(), n)?;
        }
        Ok(Self {
            y0,
            alpha,
            beta,
            sigma,
            rho,
        })
    }

    /// Number of factors.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.y0.len()
    }

    /// Initial state.
    #[inline]
    pub fn y0(&self) -> &[T] {
        &self.y0
    }

    /// Mean reversion speeds.
    #[inline]
    pub fn alpha(&self) -> &[T] {
        &self.alpha
    }

    /// Long-run means, `None` when every factor reverts to one.
    #[inline]
    pub fn beta(&self) -> Option<&[T]> {
        self.beta.as_deref()
    }

    /// Volatilities.
    #[inline]
    pub fn sigma(&self) -> &[T] {
        &self.sigma
    }

    /// Correlation matrix.
    #[inline]
    pub fn rho(&self) -> &[Vec<T>] {
        &self.rho
    }

    /// Conditional expectation of each factor at `tau`.
    pub fn expectation<X: Executor>(
        &self,
        engine: &VasicekEngine<X>,
        tau: T,
    ) -> Result<Vec<T>, MomentError> {
        let n = self.dimension();
        match &self.beta {
            Some(beta) => engine.compute_expectation(&self.y0, &self.alpha, beta, n, tau),
            None => engine.compute_expectation_long_run_one(&self.y0, &self.alpha, n, tau),
        }
    }

    /// Expectation and covariance of the factor time integrals over `[0, tau]`.
    pub fn integral_moments<X: Executor>(
        &self,
        engine: &VasicekEngine<X>,
        tau: T,
    ) -> Result<IntegralMoments<T>, MomentError> {
        let n = self.dimension();
        let expectation = match &self.beta {
            Some(beta) => engine.compute_integral_expectation(&self.y0, &self.alpha, beta, n, tau)?,
            None => {
                engine.compute_integral_expectation_long_run_one(&self.y0, &self.alpha, n, tau)?
            }
        };
        let covariance =
            engine.compute_integral_variance(&self.alpha, &self.sigma, &self.rho, n, tau)?;
        Ok(IntegralMoments {
            expectation,
            covariance,
        })
    }
}

/// First and second moments of the factor time integrals.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegralMoments<T> {
    /// `E[∫₀^τ Z_i(s) ds]`
    pub expectation: Vec<T>,
    /// `Cov[∫₀^τ Z_i, ∫₀^τ Z_j]`
    pub covariance: Vec<Vec<T>>,
}

impl<T: Float + Send + Sync> IntegralMoments<T> {
    /// Converts the moments into a generating-function evaluator.
    pub fn into_mgf(self) -> Result<VasicekMgf<T>, MomentError> {
        VasicekMgf::new(self.expectation, self.covariance)
    }
}
