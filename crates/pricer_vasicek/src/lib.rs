//! # pricer_vasicek: Closed-Form Moments for Multivariate Vasicek Factors
//!
//! Analytic replacements for Monte Carlo estimates of a correlated
//! Ornstein-Uhlenbeck (Vasicek) factor model, as used in credit-risk pricing:
//!
//! - Scalar identities: decay-integral weight, pairwise coupling (`math::moments`)
//! - Conditional and time-integral expectations (`models::expectation`)
//! - Integral covariance matrix (`models::covariance`)
//! - Joint moment / characteristic generating function (`mgf`)
//!
//! All operations are pure. Each output cell is computed independently on an
//! index-range [`parallel::Executor`], and results are bit-identical whether
//! the executor is serial or Rayon-backed.
//!
//! ## Usage Examples
//!
//! ```rust
//! use num_complex::Complex;
//! use pricer_vasicek::models::VasicekEngine;
//!
//! let engine: VasicekEngine = VasicekEngine::default();
//! let (y0, alpha, sigma) = ([1.2_f64, 0.8], [0.5, 1.5], [0.3, 0.2]);
//! let rho = [[1.0, 0.25], [0.25, 1.0]];
//! let tau = 1.0;
//!
//! let expectation = engine
//!     .compute_integral_expectation_long_run_one(&y0, &alpha, 2, tau)
//!     .unwrap();
//! let variance = engine
//!     .compute_integral_variance(&alpha, &sigma, &rho, 2, tau)
//!     .unwrap();
//!
//! let cf = engine.mgf(expectation, variance).unwrap();
//! let value = cf.eval(&[Complex::new(0.0, 1.0), Complex::new(0.0, -0.5)]).unwrap();
//! assert!(value.norm() <= 1.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `MomentConfig`, `DegeneratePolicy` and `ParallelConfig`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod math;
pub mod mgf;
pub mod models;
pub mod parallel;
pub mod types;

pub use config::{DegeneratePolicy, MomentConfig};
pub use mgf::{MgfScalar, VasicekMgf};
pub use models::{FactorSet, IntegralMoments, VasicekEngine};
pub use types::MomentError;
