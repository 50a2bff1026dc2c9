use super::{DegeneracyReason, MIN_CORRELATION_POINTS, Statistic, StatisticsError};
use std::cmp::Ordering;

fn check_pairs(x: &[f64], y: &[f64]) -> Result<usize, StatisticsError> {
    if x.len() != y.len() {
        return Err(StatisticsError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.is_empty() {
        return Err(StatisticsError::EmptySample);
    }
    Ok(x.len())
}

fn check_correlation_pairs(
    x: &[f64],
    y: &[f64],
    statistic: Statistic,
) -> Result<usize, StatisticsError> {
    let n = check_pairs(x, y)?;
    if n < MIN_CORRELATION_POINTS {
        return Err(StatisticsError::Degenerate {
            statistic,
            reason: DegeneracyReason::InsufficientPoints {
                found: n,
                required: MIN_CORRELATION_POINTS,
            },
        });
    }
    Ok(n)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Root-mean-square of `y - x`.
pub fn rmse(x: &[f64], y: &[f64]) -> Result<f64, StatisticsError> {
    let n = check_pairs(x, y)?;
    let sum_sq: f64 = x.iter().zip(y).map(|(a, b)| (b - a).powi(2)).sum();
    Ok((sum_sq / n as f64).sqrt())
}

/// Mean of `|y - x|`.
pub fn mue(x: &[f64], y: &[f64]) -> Result<f64, StatisticsError> {
    let n = check_pairs(x, y)?;
    let sum_abs: f64 = x.iter().zip(y).map(|(a, b)| (b - a).abs()).sum();
    Ok(sum_abs / n as f64)
}

fn pearson(x: &[f64], y: &[f64], statistic: Statistic) -> Result<f64, StatisticsError> {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= f64::EPSILON * n || syy <= f64::EPSILON * n {
        return Err(StatisticsError::Degenerate {
            statistic,
            reason: DegeneracyReason::ZeroVariance,
        });
    }
    Ok((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Squared Pearson correlation coefficient.
pub fn r_squared(x: &[f64], y: &[f64]) -> Result<f64, StatisticsError> {
    check_correlation_pairs(x, y, Statistic::R2)?;
    pearson(x, y, Statistic::R2).map(|r| r * r)
}

/// 1-based ranks with ties assigned their average rank.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end share the mean of ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = rank;
        }
        start = end;
    }
    ranks
}

/// Spearman rank correlation coefficient.
pub fn spearman_rho(x: &[f64], y: &[f64]) -> Result<f64, StatisticsError> {
    check_correlation_pairs(x, y, Statistic::Rho)?;
    pearson(&average_ranks(x), &average_ranks(y), Statistic::Rho)
}

/// Kendall rank correlation coefficient, tau-b variant (tie corrected).
pub fn kendall_tau(x: &[f64], y: &[f64]) -> Result<f64, StatisticsError> {
    let n = check_correlation_pairs(x, y, Statistic::Ktau)?;

    let mut concordant = 0i64;
    let mut discordant = 0i64;
    let mut ties_x = 0i64;
    let mut ties_y = 0i64;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            if dx == 0.0 {
                ties_x += 1;
            }
            if dy == 0.0 {
                ties_y += 1;
            }
            let product = dx * dy;
            if product > 0.0 {
                concordant += 1;
            } else if product < 0.0 {
                discordant += 1;
            }
        }
    }

    let pairs = (n * (n - 1) / 2) as i64;
    let denominator = (((pairs - ties_x) * (pairs - ties_y)) as f64).sqrt();
    if denominator == 0.0 {
        return Err(StatisticsError::Degenerate {
            statistic: Statistic::Ktau,
            reason: DegeneracyReason::ZeroVariance,
        });
    }
    Ok((concordant - discordant) as f64 / denominator)
}
