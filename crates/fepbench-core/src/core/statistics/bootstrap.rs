use super::{Statistic, StatisticsError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapConfig {
    /// Number of resamples; zero disables confidence intervals.
    pub samples: usize,
    /// Width of the reported interval, e.g. `0.95`.
    pub confidence: f64,
    pub seed: u64,
}

/// A statistic evaluated on the full sample, with its bootstrap confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticSummary {
    pub statistic: Statistic,
    pub value: f64,
    pub interval: Option<(f64, f64)>,
}

impl StatisticSummary {
    /// Formats the summary as a plot annotation, e.g. `RMSE: 0.52 [95%: 0.31, 0.74]`.
    pub fn annotation(&self, confidence: f64) -> String {
        match self.interval {
            Some((low, high)) => format!(
                "{}: {:.2} [{:.0}%: {:.2}, {:.2}]",
                self.statistic,
                self.value,
                confidence * 100.0,
                low,
                high
            ),
            None => format!("{}: {:.2}", self.statistic, self.value),
        }
    }
}

fn percentile(sorted: &[f64], q: f64) -> f64 {
    let position = (sorted.len() as f64 - 1.0) * q.clamp(0.0, 1.0);
    sorted[position.round() as usize]
}

/// Computes a statistic on `x`/`y` and a percentile bootstrap interval around it.
///
/// The full-sample value must be defined; otherwise its error is returned unchanged.
/// Resamples on which the statistic is undefined (for example, a resample that picked
/// the same point every time) are skipped.
pub fn summarize(
    statistic: Statistic,
    x: &[f64],
    y: &[f64],
    config: &BootstrapConfig,
    rng: &mut StdRng,
) -> Result<StatisticSummary, StatisticsError> {
    let value = statistic.compute(x, y)?;
    if config.samples == 0 {
        return Ok(StatisticSummary {
            statistic,
            value,
            interval: None,
        });
    }

    let n = x.len();
    let mut resampled_x = vec![0.0; n];
    let mut resampled_y = vec![0.0; n];
    let mut values = Vec::with_capacity(config.samples);
    for _ in 0..config.samples {
        for slot in 0..n {
            let pick = rng.gen_range(0..n);
            resampled_x[slot] = x[pick];
            resampled_y[slot] = y[pick];
        }
        if let Ok(v) = statistic.compute(&resampled_x, &resampled_y) {
            values.push(v);
        }
    }

    let interval = if values.is_empty() {
        None
    } else {
        values.sort_by(|a, b| a.total_cmp(b));
        let tail = (1.0 - config.confidence) / 2.0;
        Some((percentile(&values, tail), percentile(&values, 1.0 - tail)))
    };

    Ok(StatisticSummary {
        statistic,
        value,
        interval,
    })
}

/// Creates the deterministic generator used for a batch of summaries.
pub fn seeded_rng(config: &BootstrapConfig) -> StdRng {
    StdRng::seed_from_u64(config.seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(samples: usize) -> BootstrapConfig {
        BootstrapConfig {
            samples,
            confidence: 0.95,
            seed: 7,
        }
    }

    #[test]
    fn zero_samples_skips_interval() {
        let cfg = config(0);
        let mut rng = seeded_rng(&cfg);
        let summary = summarize(Statistic::Rmse, &[1.0, 2.0], &[1.5, 2.5], &cfg, &mut rng).unwrap();
        assert_eq!(summary.value, 0.5);
        assert_eq!(summary.interval, None);
    }

    #[test]
    fn interval_brackets_constant_error() {
        let cfg = config(200);
        let mut rng = seeded_rng(&cfg);
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.5, 2.5, 3.5, 4.5];
        let summary = summarize(Statistic::Mue, &x, &y, &cfg, &mut rng).unwrap();
        let (low, high) = summary.interval.unwrap();
        assert!((low - 0.5).abs() < 1e-12);
        assert!((high - 0.5).abs() < 1e-12);
    }

    #[test]
    fn interval_is_ordered() {
        let cfg = config(500);
        let mut rng = seeded_rng(&cfg);
        let x = [-10.0, -9.0, -8.5, -7.0, -6.0, -11.0];
        let y = [-9.5, -9.2, -8.0, -7.5, -5.0, -10.0];
        let summary = summarize(Statistic::Rmse, &x, &y, &cfg, &mut rng).unwrap();
        let (low, high) = summary.interval.unwrap();
        assert!(low <= high);
        assert!(low >= 0.0);
    }

    #[test]
    fn same_seed_gives_same_interval() {
        let cfg = config(100);
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.2, 1.9, 3.4, 3.8, 5.5];
        let a = summarize(Statistic::R2, &x, &y, &cfg, &mut seeded_rng(&cfg)).unwrap();
        let b = summarize(Statistic::R2, &x, &y, &cfg, &mut seeded_rng(&cfg)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn undefined_full_sample_value_is_an_error() {
        let cfg = config(10);
        let mut rng = seeded_rng(&cfg);
        let result = summarize(Statistic::Rho, &[1.0, 2.0], &[2.0, 1.0], &cfg, &mut rng);
        assert!(result.unwrap_err().is_degenerate());
    }

    #[test]
    fn annotation_includes_interval_when_present() {
        let summary = StatisticSummary {
            statistic: Statistic::Rmse,
            value: 0.523,
            interval: Some((0.311, 0.744)),
        };
        assert_eq!(summary.annotation(0.95), "RMSE: 0.52 [95%: 0.31, 0.74]");
        let bare = StatisticSummary {
            interval: None,
            ..summary
        };
        assert_eq!(bare.annotation(0.95), "RMSE: 0.52");
    }
}
