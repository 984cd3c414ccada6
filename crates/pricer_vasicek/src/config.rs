//! Moment engine configuration.
//!
//! This module provides configuration types and builders controlling how the
//! moment engines validate inputs, treat zero mean reversion, and schedule
//! parallel work.

use crate::parallel::ParallelConfig;
use crate::types::MomentError;

/// Default tolerance for correlation symmetry and bound checks.
pub const DEFAULT_CORRELATION_TOLERANCE: f64 = 1e-10;

/// Treatment of zero mean reversion in decay-weighted formulas.
///
/// Applies to `α_i = 0` in integral expectations and to `α_i = 0` or
/// `α_i + α_j = 0` in the integral covariance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DegeneratePolicy {
    /// Substitute the analytic `α → 0` limit.
    #[default]
    Limit,

    /// Fail with [`MomentError::DegenerateParameter`].
    Reject,

    /// Evaluate the raw formula and let NaN/Inf propagate.
    Propagate,
}

/// Moment engine configuration.
///
/// Immutable configuration; use [`MomentConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_vasicek::config::{DegeneratePolicy, MomentConfig};
///
/// let config = MomentConfig::builder()
///     .degenerate_policy(DegeneratePolicy::Reject)
///     .correlation_tolerance(1e-8)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.degenerate_policy(), DegeneratePolicy::Reject);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MomentConfig {
    degenerate_policy: DegeneratePolicy,
    correlation_tolerance: f64,
    validate_correlation: bool,
    parallel: ParallelConfig,
}

impl Default for MomentConfig {
    fn default() -> Self {
        Self {
            degenerate_policy: DegeneratePolicy::default(),
            correlation_tolerance: DEFAULT_CORRELATION_TOLERANCE,
            validate_correlation: true,
            parallel: ParallelConfig::default(),
        }
    }
}

impl MomentConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> MomentConfigBuilder {
        MomentConfigBuilder::default()
    }

    /// Returns the zero mean reversion policy.
    #[inline]
    pub fn degenerate_policy(&self) -> DegeneratePolicy {
        self.degenerate_policy
    }

    /// Returns the tolerance used by correlation checks.
    #[inline]
    pub fn correlation_tolerance(&self) -> f64 {
        self.correlation_tolerance
    }

    /// Returns whether correlation matrices are validated before use.
    #[inline]
    pub fn validate_correlation(&self) -> bool {
        self.validate_correlation
    }

    /// Returns the parallel execution settings.
    #[inline]
    pub fn parallel(&self) -> ParallelConfig {
        self.parallel
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `MomentError::InvalidConfig` if the correlation tolerance is
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), MomentError> {
        if !self.correlation_tolerance.is_finite() || self.correlation_tolerance < 0.0 {
            return Err(MomentError::InvalidConfig {
                message: format!(
                    "correlation_tolerance must be finite and non-negative, got {}",
                    self.correlation_tolerance
                ),
            });
        }
        Ok(())
    }
}

/// Builder for [`MomentConfig`].
#[derive(Clone, Debug, Default)]
pub struct MomentConfigBuilder {
    degenerate_policy: Option<DegeneratePolicy>,
    correlation_tolerance: Option<f64>,
    validate_correlation: Option<bool>,
    parallel: Option<ParallelConfig>,
}

impl MomentConfigBuilder {
    /// Sets the zero mean reversion policy.
    #[inline]
    pub fn degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = Some(policy);
        self
    }

    /// Sets the correlation symmetry and bound tolerance.
    #[inline]
    pub fn correlation_tolerance(mut self, tolerance: f64) -> Self {
        self.correlation_tolerance = Some(tolerance);
        self
    }

    /// Enables or disables correlation validation.
    #[inline]
    pub fn validate_correlation(mut self, enabled: bool) -> Self {
        self.validate_correlation = Some(enabled);
        self
    }

    /// Sets the parallel execution settings.
    #[inline]
    pub fn parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `MomentError::InvalidConfig` if validation fails.
    pub fn build(self) -> Result<MomentConfig, MomentError> {
        let defaults = MomentConfig::default();
        let config = MomentConfig {
            degenerate_policy: self.degenerate_policy.unwrap_or(defaults.degenerate_policy),
            correlation_tolerance: self
                .correlation_tolerance
                .unwrap_or(defaults.correlation_tolerance),
            validate_correlation: self
                .validate_correlation
                .unwrap_or(defaults.validate_correlation),
            parallel: self.parallel.unwrap_or(defaults.parallel),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MomentConfig::default();
        assert_eq!(config.degenerate_policy(), DegeneratePolicy::Limit);
        assert_eq!(config.correlation_tolerance(), DEFAULT_CORRELATION_TOLERANCE);
        assert!(config.validate_correlation());
        assert_eq!(config.parallel(), ParallelConfig::default());
    }

    #[test]
    fn test_builder_overrides() {
        let config = MomentConfig::builder()
            .degenerate_policy(DegeneratePolicy::Propagate)
            .validate_correlation(false)
            .parallel(ParallelConfig::new(8))
            .build()
            .unwrap();
        assert_eq!(config.degenerate_policy(), DegeneratePolicy::Propagate);
        assert!(!config.validate_correlation());
        assert_eq!(config.parallel().parallel_threshold, 8);
    }

    #[test]
    fn test_builder_rejects_negative_tolerance() {
        let result = MomentConfig::builder().correlation_tolerance(-1.0).build();
        assert!(matches!(result, Err(MomentError::InvalidConfig { .. })));
    }

    #[test]
    fn test_builder_rejects_nan_tolerance() {
        let result = MomentConfig::builder()
            .correlation_tolerance(f64::NAN)
            .build();
        assert!(result.is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialise_from_toml() {
        let config: MomentConfig = toml::from_str(
            r#"
            degenerate_policy = "reject"
            correlation_tolerance = 1e-6

            [parallel]
            parallel_threshold = 16
            "#,
        )
        .unwrap();
        assert_eq!(config.degenerate_policy(), DegeneratePolicy::Reject);
        assert_eq!(config.correlation_tolerance(), 1e-6);
        assert!(config.validate_correlation());
        assert_eq!(config.parallel().parallel_threshold, 16);
    }
}
