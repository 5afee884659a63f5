use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use statrs::statistics::Statistics;

use crate::models::{CategoryBand, CategoryLabel, CurvePoint, DistributionStats};

// Checked top-down; anything below the last cutoff is Poor.
pub const PERCENTILE_CUTOFFS: [(f64, CategoryLabel); 4] = [
    (0.90, CategoryLabel::Outstanding),
    (0.75, CategoryLabel::VeryGood),
    (0.25, CategoryLabel::Good),
    (0.10, CategoryLabel::Fair),
];

// Relative to the mean; below this the spread is treated as zero.
const DEGENERATE_SPREAD: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveConfig {
    pub points: usize,
    pub span_sd: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            points: 1000,
            span_sd: 4.0,
        }
    }
}

pub fn fit(scores: &[f64]) -> DistributionStats {
    let count = scores.len();
    if count == 0 {
        return DistributionStats {
            count,
            mean: 0.0,
            std: None,
            skewness: None,
        };
    }

    let mean = scores.iter().mean();
    let std = if count >= 2 {
        Some(scores.iter().std_dev()).filter(|value| value.is_finite())
    } else {
        None
    };

    DistributionStats {
        count,
        mean,
        std,
        skewness: adjusted_skewness(scores, mean),
    }
}

/// Adjusted Fisher-Pearson coefficient G1 = g1 * sqrt(n(n-1)) / (n-2).
fn adjusted_skewness(scores: &[f64], mean: f64) -> Option<f64> {
    let n = scores.len();
    if n < 3 {
        return None;
    }
    let n_f = n as f64;
    let (m2, m3) = scores.iter().fold((0.0, 0.0), |(m2, m3), value| {
        let d = value - mean;
        (m2 + d * d, m3 + d * d * d)
    });
    let m2 = m2 / n_f;
    let m3 = m3 / n_f;
    if is_degenerate(m2.sqrt(), mean) {
        return None;
    }
    let g1 = m3 / m2.powf(1.5);
    Some(g1 * (n_f * (n_f - 1.0)).sqrt() / (n_f - 2.0))
}

fn is_degenerate(spread: f64, mean: f64) -> bool {
    !spread.is_finite() || spread <= DEGENERATE_SPREAD * mean.abs().max(1.0)
}

impl DistributionStats {
    pub fn normal(&self) -> Option<Normal> {
        let std = self.std?;
        if is_degenerate(std, self.mean) {
            return None;
        }
        Normal::new(self.mean, std).ok()
    }

    pub fn is_fitted(&self) -> bool {
        self.normal().is_some()
    }

    pub fn percentile(&self, score: f64) -> Option<f64> {
        self.normal().map(|normal| normal.cdf(score))
    }

    pub fn categorize(&self, score: f64) -> Option<CategoryLabel> {
        self.percentile(score).map(category_for_percentile)
    }
}

pub fn category_for_percentile(p: f64) -> CategoryLabel {
    for (cutoff, label) in PERCENTILE_CUTOFFS {
        if p >= cutoff {
            return label;
        }
    }
    CategoryLabel::Poor
}

pub fn categorize(score: f64, stats: &DistributionStats) -> Option<CategoryLabel> {
    stats.categorize(score)
}

fn curve_range(stats: &DistributionStats, config: &CurveConfig) -> (f64, f64) {
    let half = config.span_sd * stats.std.unwrap_or(0.0);
    (stats.mean - half, stats.mean + half)
}

pub fn density_curve(stats: &DistributionStats, config: &CurveConfig) -> Option<Vec<CurvePoint>> {
    let normal = stats.normal()?;
    let (lo, hi) = curve_range(stats, config);
    let points = config.points.max(2);
    let step = (hi - lo) / (points - 1) as f64;

    Some(
        (0..points)
            .map(|i| {
                let score = lo + step * i as f64;
                CurvePoint {
                    score,
                    density: normal.pdf(score),
                }
            })
            .collect(),
    )
}

pub fn category_bands(stats: &DistributionStats, config: &CurveConfig) -> Option<Vec<CategoryBand>> {
    let normal = stats.normal()?;
    let (lo, hi) = curve_range(stats, config);

    let mut upper = hi;
    let mut bands = Vec::with_capacity(CategoryLabel::ALL.len());
    for (cutoff, label) in PERCENTILE_CUTOFFS {
        let lower = normal.inverse_cdf(cutoff).max(lo).min(upper);
        bands.push(CategoryBand {
            label,
            lower,
            upper,
        });
        upper = lower;
    }
    bands.push(CategoryBand {
        label: CategoryLabel::Poor,
        lower: lo.min(upper),
        upper,
    });
    Some(bands)
}
