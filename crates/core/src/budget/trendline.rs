//! Least-squares trendline fitting in decimal arithmetic.
//!
//! Linear and polynomial trendlines regress `y` on powers of `x`; logarithmic
//! trendlines regress `y` on `ln x`. The normal equations are solved with
//! Gaussian elimination and partial pivoting.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use super::error::BudgetError;
use super::types::TrendlineType;

/// Polynomial order used when none is configured.
pub const DEFAULT_POLYNOMIAL_ORDER: u32 = 2;

/// Minimum number of points needed for any fit.
pub const MIN_TRENDLINE_POINTS: usize = 2;

/// A fitted trendline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trendline {
    /// Model type.
    pub kind: TrendlineType,
    /// Coefficients `c0..cn` of `c0 + c1 t + ... + cn t^n`, where `t` is `x`
    /// (linear, polynomial) or `ln x` (logarithmic).
    pub coefficients: Vec<Decimal>,
}

impl Trendline {
    /// Fits a trendline through `(x, y)` points. `x` values must be positive.
    ///
    /// The polynomial order is clamped to `[1, points - 1]`.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InsufficientHistory` with fewer than two points and
    /// `BudgetError::SingularTrendline` when the system has no unique solution.
    pub fn fit(
        kind: TrendlineType,
        polynomial_order: Option<u32>,
        points: &[(Decimal, Decimal)],
    ) -> Result<Self, BudgetError> {
        if points.len() < MIN_TRENDLINE_POINTS {
            return Err(BudgetError::InsufficientHistory {
                points: points.len(),
            });
        }

        let degree = match kind {
            TrendlineType::Linear | TrendlineType::Logarithmic => 1,
            TrendlineType::Polynomial => {
                let max_degree = points.len() - 1;
                let requested = polynomial_order.unwrap_or(DEFAULT_POLYNOMIAL_ORDER);
                usize::try_from(requested).unwrap_or(max_degree).clamp(1, max_degree)
            }
        };

        let transformed: Vec<(Decimal, Decimal)> = points
            .iter()
            .map(|&(x, y)| (transform(kind, x), y))
            .collect();

        let coefficients = least_squares(&transformed, degree)?;
        Ok(Self { kind, coefficients })
    }

    /// Evaluates the trendline at `x`.
    #[must_use]
    pub fn evaluate(&self, x: Decimal) -> Decimal {
        let t = transform(self.kind, x);
        // Horner's scheme from the highest power down.
        self.coefficients
            .iter()
            .rev()
            .fold(Decimal::ZERO, |acc, c| acc * t + c)
    }
}

fn transform(kind: TrendlineType, x: Decimal) -> Decimal {
    match kind {
        TrendlineType::Logarithmic => x.ln(),
        TrendlineType::Linear | TrendlineType::Polynomial => x,
    }
}

fn power(base: Decimal, exponent: usize) -> Decimal {
    (0..exponent).fold(Decimal::ONE, |acc, _| acc * base)
}

fn least_squares(points: &[(Decimal, Decimal)], degree: usize) -> Result<Vec<Decimal>, BudgetError> {
    let size = degree + 1;
    let mut matrix = vec![vec![Decimal::ZERO; size + 1]; size];

    for (row, cells) in matrix.iter_mut().enumerate() {
        for (col, cell) in cells.iter_mut().take(size).enumerate() {
            *cell = points.iter().map(|&(t, _)| power(t, row + col)).sum();
        }
        cells[size] = points.iter().map(|&(t, y)| y * power(t, row)).sum();
    }

    solve(matrix)
}

/// Solves an augmented `n x (n + 1)` system.
fn solve(mut matrix: Vec<Vec<Decimal>>) -> Result<Vec<Decimal>, BudgetError> {
    let n = matrix.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&a, &b| matrix[a][col].abs().cmp(&matrix[b][col].abs()))
            .ok_or(BudgetError::SingularTrendline)?;
        if matrix[pivot][col].is_zero() {
            return Err(BudgetError::SingularTrendline);
        }
        matrix.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = matrix[row][col] / matrix[col][col];
            if factor.is_zero() {
                continue;
            }
            for k in col..=n {
                let delta = factor * matrix[col][k];
                matrix[row][k] -= delta;
            }
        }
    }

    let mut solution = vec![Decimal::ZERO; n];
    for row in (0..n).rev() {
        let known: Decimal = ((row + 1)..n)
            .map(|k| matrix[row][k] * solution[k])
            .sum();
        solution[row] = (matrix[row][n] - known) / matrix[row][row];
    }

    Ok(solution)
}
