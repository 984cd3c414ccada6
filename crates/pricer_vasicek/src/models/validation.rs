//! Input screening shared by the moment engines.

use num_traits::Float;

use super::as_f64;
use crate::types::MomentError;

pub(crate) fn check_horizon<T: Float>(tau: T) -> Result<(), MomentError> {
    if !tau.is_finite() || tau < T::zero() {
        return Err(MomentError::InvalidHorizon { tau: as_f64(tau) });
    }
    Ok(())
}

pub(crate) fn check_len(name: &'static str, actual: usize, n: usize) -> Result<(), MomentError> {
    if actual != n {
        return Err(MomentError::DimensionMismatch {
            name,
            expected: n,
            actual,
        });
    }
    Ok(())
}

/// First index whose projected speed is exactly zero.
pub(crate) fn find_zero<E, T, G>(alpha: &[E], get: &G) -> Option<usize>
where
    T: Float,
    G: Fn(&E) -> T,
{
    alpha.iter().position(|a| get(a) == T::zero())
}

pub(crate) fn reject_zero_speed<E, T, G>(alpha: &[E], get: &G) -> Result<(), MomentError>
where
    T: Float,
    G: Fn(&E) -> T,
{
    match find_zero(alpha, get) {
        Some(index) => Err(MomentError::DegenerateParameter {
            name: "alpha",
            index,
            value: as_f64(get(&alpha[index])),
        }),
        None => Ok(()),
    }
}

/// First pair `(i, j)` with `alpha_i + alpha_j == 0`.
pub(crate) fn find_cancelling_pair<E, T, G>(alpha: &[E], get: &G) -> Option<(usize, usize)>
where
    T: Float,
    G: Fn(&E) -> T,
{
    alpha.iter().enumerate().find_map(|(i, ai)| {
        let ai = get(ai);
        alpha
            .iter()
            .position(|aj| ai + get(aj) == T::zero())
            .map(|j| (i, j))
    })
}

/// Rejects zero speeds and pairs whose speeds cancel.
pub(crate) fn reject_zero_pair_speed<E, T, G>(alpha: &[E], get: &G) -> Result<(), MomentError>
where
    T: Float,
    G: Fn(&E) -> T,
{
    reject_zero_speed(alpha, get)?;
    match find_cancelling_pair(alpha, get) {
        Some((i, j)) => Err(MomentError::DegenerateParameter {
            name: "alpha_i + alpha_j",
            index: i.min(j),
            value: 0.0,
        }),
        None => Ok(()),
    }
}

/// Checks that `rho` is `n × n`, symmetric, and bounded by one in magnitude.
pub(crate) fn check_correlation<E, R, T, G>(
    rho: &[R],
    n: usize,
    tolerance: f64,
    validate_values: bool,
    get: &G,
) -> Result<(), MomentError>
where
    R: AsRef<[E]>,
    T: Float,
    G: Fn(&E) -> T,
{
    check_len("rho", rho.len(), n)?;
    for (i, row) in rho.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != n {
            return Err(MomentError::InvalidCorrelation {
                message: format!("row {} has {} entries, expected {}", i, row.len(), n),
            });
        }
    }
    if !validate_values {
        return Ok(());
    }

    for i in 0..n {
        for j in 0..n {
            let v = as_f64(get(&rho[i].as_ref()[j]));
            if !(v.abs() <= 1.0 + tolerance) {
                return Err(MomentError::InvalidCorrelation {
                    message: format!("rho[{}][{}] = {} is outside [-1, 1]", i, j, v),
                });
            }
            if j > i {
                let w = as_f64(get(&rho[j].as_ref()[i]));
                if (v - w).abs() > tolerance {
                    return Err(MomentError::InvalidCorrelation {
                        message: format!(
                            "not symmetric: rho[{}][{}] = {}, rho[{}][{}] = {}",
                            i, j, v, j, i, w
                        ),
                    });
                }
            }
        }
    }
    Ok(())
}
