//! Least-squares polynomial regression.
//!
//! Coefficients are solved from the normal equations with a Cholesky
//! decomposition.

use crate::error::{EstimatorError, Result};

/// Fitted polynomial `c0 + c1 x + ... + cd x^d` (without `c0` when fitted
/// without intercept).
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    /// Coefficients in increasing power order.
    coefficients: Vec<f64>,
    intercept: bool,
}

impl Polynomial {
    /// Coefficients in increasing power order, starting at the constant term
    /// when fitted with an intercept and at the linear term otherwise.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Coefficient of `x`.
    pub fn slope(&self) -> f64 {
        let i = usize::from(self.intercept);
        self.coefficients.get(i).copied().unwrap_or(0.0)
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let first_power = if self.intercept { 0 } else { 1 };
        self.coefficients
            .iter()
            .enumerate()
            .map(|(i, c)| c * x.powi((i + first_power) as i32))
            .sum()
    }
}

/// Least-squares fit of a polynomial of `degree` to the points `(x, y)`.
pub fn polyfit(x: &[f64], y: &[f64], degree: usize, intercept: bool) -> Result<Polynomial> {
    if x.len() != y.len() {
        return Err(EstimatorError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    let first_power = if intercept { 0 } else { 1 };
    let k = degree + 1 - first_power;
    if k == 0 {
        return Err(EstimatorError::InvalidParameter(
            "a polynomial without intercept needs degree >= 1".to_string(),
        ));
    }
    if y.len() < k {
        return Err(EstimatorError::InsufficientData {
            needed: k,
            got: y.len(),
        });
    }

    let design: Vec<Vec<f64>> = (0..k)
        .map(|p| x.iter().map(|v| v.powi((p + first_power) as i32)).collect())
        .collect();

    let mut xtx = vec![vec![0.0; k]; k];
    for i in 0..k {
        for j in 0..=i {
            let s: f64 = design[i].iter().zip(&design[j]).map(|(a, b)| a * b).sum();
            xtx[i][j] = s;
            xtx[j][i] = s;
        }
    }
    let xty: Vec<f64> = design
        .iter()
        .map(|col| col.iter().zip(y).map(|(a, b)| a * b).sum())
        .collect();

    let coefficients = solve_symmetric(&xtx, &xty).ok_or_else(|| {
        EstimatorError::ComputationError(
            "polynomial design matrix is not positive definite".to_string(),
        )
    })?;
    Ok(Polynomial {
        coefficients,
        intercept,
    })
}

/// Relative size below which a Cholesky pivot counts as zero.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Solve `A x = b` for symmetric positive definite `A`.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= PIVOT_TOLERANCE * a[i][i].abs() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    let mut z = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * z[j];
        }
        z[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = z[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }
    Some(x)
}
