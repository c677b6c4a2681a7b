//! Ordinary least squares with an intercept.
//!
//! The normal equations are formed on centered, unit-norm columns and solved
//! through a Jacobi eigendecomposition. Eigenvalues below a relative
//! tolerance are dropped, which yields the minimum-norm solution in the
//! standardized column space for rank-deficient designs (a constant `year`
//! column inside a short window, exactly collinear prices). Coefficients are
//! mapped back to raw feature units. Full-rank fits are plain OLS on unscaled
//! inputs; for collinear columns the weight split is minimum-norm in
//! standardized units, not in raw units.

use crate::error::ForecastError;
use crate::features::{design_matrix, FeatureRow, FEATURE_NAMES};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

const MAX_SWEEPS: usize = 64;

/// Eigenvalues below `RANK_TOLERANCE * max_eigenvalue` are treated as zero.
const RANK_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    intercept: f64,
    coefficients: Array1<f64>,
    r_squared: f64,
}

impl LinearRegression {
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self, ForecastError> {
        let (n, p) = x.dim();
        if n != y.len() {
            return Err(ForecastError::ShapeMismatch {
                context: "fit targets",
                expected: n,
                found: y.len(),
            });
        }
        if n == 0 {
            return Err(ForecastError::InsufficientData {
                rows: 0,
                required: 1,
            });
        }

        let nf = n as f64;
        let x_mean = x.sum_axis(Axis(0)) / nf;
        let y_mean = y.sum() / nf;

        let mut z = x - &x_mean;
        let mut scale = Array1::<f64>::zeros(p);
        for (j, mut col) in z.axis_iter_mut(Axis(1)).enumerate() {
            let norm = col.dot(&col).sqrt();
            // Constant column: centering leaves only rounding noise.
            let floor = 1e-12 * x_mean[j].abs().max(1.0) * nf.sqrt();
            if norm > floor {
                col /= norm;
                scale[j] = norm;
            } else {
                col.fill(0.0);
            }
        }

        let yc = y - y_mean;
        let gram = z.t().dot(&z);
        let moment = z.t().dot(&yc);
        let beta_scaled = pseudo_inverse_solve(gram, &moment);

        let coefficients = Array1::from_shape_fn(p, |j| {
            if scale[j] > 0.0 {
                beta_scaled[j] / scale[j]
            } else {
                0.0
            }
        });
        let intercept = y_mean - coefficients.dot(&x_mean);

        let mut model = Self {
            intercept,
            coefficients,
            r_squared: 0.0,
        };
        let fitted = model.predict(x)?;
        model.r_squared = r_squared(y, &fitted);
        Ok(model)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ForecastError> {
        if x.ncols() != self.coefficients.len() {
            return Err(ForecastError::ShapeMismatch {
                context: "predict features",
                expected: self.coefficients.len(),
                found: x.ncols(),
            });
        }
        Ok(x.dot(&self.coefficients) + self.intercept)
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    /// In-sample coefficient of determination.
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }
}

/// Solve `A b = m` for symmetric positive semi-definite `A` via its
/// eigendecomposition, discarding near-zero eigenvalues.
fn pseudo_inverse_solve(a: Array2<f64>, m: &Array1<f64>) -> Array1<f64> {
    let (eigenvalues, eigenvectors) = jacobi_eigen(a);
    let lambda_max = eigenvalues.iter().fold(0.0_f64, |acc, l| acc.max(*l));
    let mut beta = Array1::<f64>::zeros(m.len());
    if lambda_max <= 0.0 {
        return beta;
    }
    let cutoff = lambda_max * RANK_TOLERANCE;
    for (k, lambda) in eigenvalues.iter().enumerate() {
        if *lambda > cutoff {
            let v = eigenvectors.column(k);
            let weight = v.dot(m) / lambda;
            beta.scaled_add(weight, &v);
        }
    }
    beta
}

/// Cyclic Jacobi rotations. Returns eigenvalues and eigenvectors (as columns).
fn jacobi_eigen(mut a: Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = a.nrows();
    let mut v = Array2::<f64>::eye(n);
    let total: f64 = a.iter().map(|x| x * x).sum();

    for _ in 0..MAX_SWEEPS {
        let mut off = 0.0;
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    off += a[[i, j]] * a[[i, j]];
                }
            }
        }
        if off <= total * 1e-30 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq == 0.0 {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let (akp, akq) = (a[[k, p]], a[[k, q]]);
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let (apk, aqk) = (a[[p, k]], a[[q, k]]);
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let (vkp, vkq) = (v[[k, p]], v[[k, q]]);
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    (a.diag().to_owned(), v)
}

fn r_squared(y: &Array1<f64>, fitted: &Array1<f64>) -> f64 {
    let mean = y.sum() / y.len() as f64;
    let ss_tot: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let ss_res: f64 = y
        .iter()
        .zip(fitted.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum();
    if ss_tot == 0.0 {
        // Constant target: perfect if reproduced exactly, otherwise no skill.
        return if ss_res <= f64::EPSILON { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Mean of squared differences. Empty input is 0.
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64, ForecastError> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::ShapeMismatch {
            context: "mean squared error",
            expected: actual.len(),
            found: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Ok(0.0);
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    Ok(sum / actual.len() as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub feature: String,
    pub value: f64,
}

/// Fitted model parameters and test-partition error, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    pub intercept: f64,
    pub coefficients: Vec<Coefficient>,
    pub r_squared: f64,
    pub mean_squared_error: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Linear close-price model over [`FeatureRow`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricePredictor;

impl PricePredictor {
    pub fn fit(
        &self,
        features: &[FeatureRow],
        targets: &[f64],
    ) -> Result<LinearRegression, ForecastError> {
        if features.len() != targets.len() {
            return Err(ForecastError::ShapeMismatch {
                context: "fit targets",
                expected: features.len(),
                found: targets.len(),
            });
        }
        LinearRegression::fit(&design_matrix(features), &Array1::from(targets.to_vec()))
    }

    /// One prediction per row, in row order.
    pub fn predict(
        &self,
        model: &LinearRegression,
        features: &[FeatureRow],
    ) -> Result<Vec<f64>, ForecastError> {
        Ok(model.predict(&design_matrix(features))?.to_vec())
    }

    pub fn evaluate(&self, actual: &[f64], predicted: &[f64]) -> Result<f64, ForecastError> {
        mean_squared_error(actual, predicted)
    }

    pub fn report(
        &self,
        model: &LinearRegression,
        mse: f64,
        train_rows: usize,
        test_rows: usize,
    ) -> ModelReport {
        ModelReport {
            intercept: model.intercept(),
            coefficients: FEATURE_NAMES
                .iter()
                .zip(model.coefficients().iter())
                .map(|(name, value)| Coefficient {
                    feature: (*name).to_string(),
                    value: *value,
                })
                .collect(),
            r_squared: model.r_squared(),
            mean_squared_error: mse,
            train_rows,
            test_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "{a} != {b}");
    }

    #[test]
    fn recovers_exact_linear_relation() {
        let x = array![
            [1.0, 4.0],
            [2.0, 1.0],
            [3.0, 7.0],
            [4.0, 2.0],
            [5.0, 9.0],
            [6.0, 3.0]
        ];
        let y = x.column(0).mapv(|a| 2.0 * a) - &x.column(1) + 3.0;
        let model = LinearRegression::fit(&x, &y).unwrap();
        assert_close(model.intercept(), 3.0, 1e-9);
        assert_close(model.coefficients()[0], 2.0, 1e-9);
        assert_close(model.coefficients()[1], -1.0, 1e-9);
        assert_close(model.r_squared(), 1.0, 1e-12);
    }

    #[test]
    fn collinear_and_constant_columns_are_solved() {
        // col1 = 2 * col0, col2 constant
        let x = array![
            [1.0, 2.0, 2024.0],
            [2.0, 4.0, 2024.0],
            [3.0, 6.0, 2024.0],
            [4.0, 8.0, 2024.0]
        ];
        let y = x.column(0).mapv(|a| 5.0 * a + 1.0);
        let model = LinearRegression::fit(&x, &y).unwrap();
        assert_eq!(model.coefficients()[2], 0.0);
        let fitted = model.predict(&x).unwrap();
        for (f, t) in fitted.iter().zip(y.iter()) {
            assert_close(*f, *t, 1e-8);
        }
        let c = model.coefficients();
        assert_close(c[0] + 2.0 * c[1], 5.0, 1e-9);
    }

    #[test]
    fn single_row_predicts_its_target() {
        let x = array![[10.0, 11.0]];
        let y = array![42.0];
        let model = LinearRegression::fit(&x, &y).unwrap();
        assert_close(model.predict(&x).unwrap()[0], 42.0, 1e-12);
    }

    #[test]
    fn shape_errors() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0];
        assert!(matches!(
            LinearRegression::fit(&x, &y),
            Err(ForecastError::ShapeMismatch { .. })
        ));
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(matches!(
            LinearRegression::fit(&empty, &Array1::zeros(0)),
            Err(ForecastError::InsufficientData { .. })
        ));
        let model = LinearRegression::fit(&x, &array![1.0, 2.0]).unwrap();
        assert!(model.predict(&array![[1.0, 2.0]]).is_err());
    }

    #[test]
    fn mse() {
        assert_close(
            mean_squared_error(&[1.0, 2.0, 3.0], &[1.0, 2.0, 5.0]).unwrap(),
            4.0 / 3.0,
            1e-12,
        );
        assert_eq!(mean_squared_error(&[], &[]).unwrap(), 0.0);
        assert!(mean_squared_error(&[1.0], &[]).is_err());
    }

    #[test]
    fn jacobi_diagonalizes() {
        let a = array![[4.0, 1.0, 0.5], [1.0, 3.0, 0.2], [0.5, 0.2, 1.0]];
        let (values, vectors) = jacobi_eigen(a.clone());
        let rebuilt = vectors.dot(&Array2::from_diag(&values)).dot(&vectors.t());
        for (x, y) in rebuilt.iter().zip(a.iter()) {
            assert_close(*x, *y, 1e-10);
        }
    }
}
