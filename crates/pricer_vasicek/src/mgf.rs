//! Joint moment / characteristic generating function of Gaussian integrals.
//!
//! Given the expectation vector `E` and covariance matrix `V` of the factor
//! time integrals, the generating function is
//! ```text
//! φ(v) = exp( Σ_i v_i E_i + ½ Σ_i Σ_j v_i v_j V_ij )
//! ```
//! Real `v` gives the moment generating function; complex `v` gives the
//! characteristic function used in Fourier inversion.
//!
//! # Examples
//!
//! ```
//! use num_complex::Complex;
//! use pricer_vasicek::mgf::VasicekMgf;
//!
//! let mgf = VasicekMgf::new(vec![0.5_f64], vec![vec![0.2]]).unwrap();
//!
//! let real = mgf.eval(&[1.0_f64]).unwrap();
//! assert!((real - (0.5_f64 + 0.1).exp()).abs() < 1e-12);
//!
//! let cf = mgf.eval(&[Complex::new(0.0, 1.0)]).unwrap();
//! assert!((cf.norm() - (-0.1_f64).exp()).abs() < 1e-12);
//! ```

use std::iter::Sum;
use std::ops::{Add, Mul};

use num_complex::Complex;
use num_traits::Float;

use crate::parallel::{Executor, SerialExecutor};
use crate::types::MomentError;

/// Field in which the generating function is evaluated.
///
/// Implemented for real `T` (moment generating function) and `Complex<T>`
/// (characteristic function). `T` is the scalar type of the moments.
pub trait MgfScalar<T>:
    Copy + Add<Output = Self> + Mul<Output = Self> + Mul<T, Output = Self> + Sum + Send + Sync
{
    /// Exponential in this field.
    fn exp(self) -> Self;
}

impl<T: Float + Send + Sync + Sum> MgfScalar<T> for T {
    #[inline]
    fn exp(self) -> Self {
        Float::exp(self)
    }
}

impl<T: Float + Send + Sync> MgfScalar<T> for Complex<T> {
    #[inline]
    fn exp(self) -> Self {
        Complex::exp(self)
    }
}

/// Reusable generating-function evaluator.
///
/// Owns its expectation vector and covariance matrix; evaluation never
/// mutates them and costs `O(m²)` per call.
#[derive(Clone, Debug)]
pub struct VasicekMgf<T, X = SerialExecutor> {
    expectation: Vec<T>,
    variance: Vec<Vec<T>>,
    executor: X,
}

impl<T: Float + Send + Sync> VasicekMgf<T> {
    /// Creates an evaluator that sums serially.
    ///
    /// # Errors
    ///
    /// Returns `MomentError::DimensionMismatch` if `variance` is not
    /// `expectation.len()` square.
    pub fn new(expectation: Vec<T>, variance: Vec<Vec<T>>) -> Result<Self, MomentError> {
        Self::with_executor(expectation, variance, SerialExecutor)
    }
}

impl<T, X> VasicekMgf<T, X>
where
    T: Float + Send + Sync,
    X: Executor,
{
    /// Creates an evaluator summing on `executor`.
    ///
    /// # Errors
    ///
    /// Returns `MomentError::DimensionMismatch` if `variance` is not
    /// `expectation.len()` square.
    pub fn with_executor(
        expectation: Vec<T>,
        variance: Vec<Vec<T>>,
        executor: X,
    ) -> Result<Self, MomentError> {
        let m = expectation.len();
        if variance.len() != m {
            return Err(MomentError::DimensionMismatch {
                name: "variance",
                expected: m,
                actual: variance.len(),
            });
        }
        if let Some(row) = variance.iter().find(|row| row.len() != m) {
            return Err(MomentError::DimensionMismatch {
                name: "variance row",
                expected: m,
                actual: row.len(),
            });
        }
        Ok(Self {
            expectation,
            variance,
            executor,
        })
    }

    /// Number of factors `m`.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.expectation.len()
    }

    /// Expectation vector.
    #[inline]
    pub fn expectation(&self) -> &[T] {
        &self.expectation
    }

    /// Covariance matrix.
    #[inline]
    pub fn variance(&self) -> &[Vec<T>] {
        &self.variance
    }

    /// Evaluates the generating function at `v`.
    ///
    /// # Errors
    ///
    /// Returns `MomentError::DimensionMismatch` if `v.len() != m`.
    pub fn eval<V>(&self, v: &[V]) -> Result<V, MomentError>
    where
        V: MgfScalar<T>,
    {
        let m = self.dimension();
        if v.len() != m {
            return Err(MomentError::DimensionMismatch {
                name: "v",
                expected: m,
                actual: v.len(),
            });
        }

        let linear: V = self.executor.sum(0..m, |i| v[i] * self.expectation[i]);
        let quadratic: V = self.executor.sum(0..m, |i| {
            self.executor
                .sum(0..m, |j| v[i] * v[j] * self.variance[i][j])
        });
        let half = T::from(0.5).unwrap_or_else(|| T::one() / (T::one() + T::one()));

        Ok((linear + quadratic * half).exp())
    }
}
