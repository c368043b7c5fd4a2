use anyhow::{ensure, Context, Result};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Synthetic room-count sample
// ---------------------------------------------------------------------------

/// Parameters of the normal distribution the room-count sample is drawn from.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoomSampleParams {
    pub mean: f64,
    pub std_dev: f64,
    pub size: usize,
}

impl Default for RoomSampleParams {
    fn default() -> Self {
        Self {
            mean: 6.2,
            std_dev: 0.7,
            size: 100,
        }
    }
}

/// One histogram bin: `[left, right)` plus how many samples fell in it.
/// The last bin is closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub left: f64,
    pub right: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// A drawn sample together with everything the histogram panel renders.
#[derive(Debug, Clone)]
pub struct RoomSample {
    pub values: Vec<f64>,
    pub bins: Vec<HistogramBin>,
    /// Density estimate scaled to bin counts, as `[x, y]` points.
    pub kde: Vec<[f64; 2]>,
}

impl RoomSample {
    /// Draw a fresh sample and derive its histogram and density curve.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, params: &RoomSampleParams) -> Result<Self> {
        ensure!(
            params.std_dev.is_finite() && params.std_dev >= 0.0,
            "room sample std_dev must be non-negative, got {}",
            params.std_dev
        );
        let normal = Normal::new(params.mean, params.std_dev)
            .context("invalid room sample distribution")?;
        let values: Vec<f64> = (0..params.size).map(|_| normal.sample(rng)).collect();
        Ok(Self::from_values(values))
    }

    pub fn from_values(values: Vec<f64>) -> Self {
        let bins = histogram(&values, auto_bin_count(&values));
        let bin_width = bins.first().map(HistogramBin::width).unwrap_or(1.0);
        let kde = kde_curve(&values, bin_width, 200);
        Self { values, bins, kde }
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Bin count from the "auto" rule: the larger of Sturges and
/// Freedman–Diaconis, falling back to Sturges when the IQR is zero.
pub fn auto_bin_count(values: &[f64]) -> usize {
    let n = values.len();
    if n < 2 {
        return 1;
    }
    let sturges = (n as f64).log2().ceil() as usize + 1;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let range = sorted[n - 1] - sorted[0];
    let iqr = quantile(&sorted, 0.75) - quantile(&sorted, 0.25);
    if range <= 0.0 || iqr <= 0.0 {
        return sturges;
    }

    let fd_width = 2.0 * iqr / (n as f64).cbrt();
    let fd = (range / fd_width).ceil() as usize;
    sturges.max(fd).max(1)
}

/// Linear-interpolated quantile of already sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Equal-width bins spanning the data range.
pub fn histogram(values: &[f64], n_bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || n_bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (min, max) = if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (max - min) / n_bins as f64;

    let mut bins: Vec<HistogramBin> = (0..n_bins)
        .map(|i| HistogramBin {
            left: min + i as f64 * width,
            right: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - min) / width) as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}

// ---------------------------------------------------------------------------
// Kernel density estimate
// ---------------------------------------------------------------------------

/// Gaussian KDE with Scott's bandwidth, evaluated on `points` positions over
/// the data range and scaled so its area matches the histogram counts.
pub fn kde_curve(values: &[f64], bin_width: f64, points: usize) -> Vec<[f64; 2]> {
    let n = values.len();
    if n < 2 || points < 2 {
        return Vec::new();
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let bandwidth = var.sqrt() * (n as f64).powf(-0.2);
    if bandwidth <= 0.0 || !bandwidth.is_finite() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / (points - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let scale = n as f64 * bin_width;

    (0..points)
        .map(|i| {
            let x = min + i as f64 * step;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            [x, density * scale]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn draw_uses_requested_size() {
        let mut rng = StdRng::seed_from_u64(7);
        let sample = RoomSample::draw(&mut rng, &RoomSampleParams::default()).unwrap();
        assert_eq!(sample.values.len(), 100);
        let total: usize = sample.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 100);
        assert!(!sample.kde.is_empty());
    }

    #[test]
    fn draw_is_reproducible_with_same_seed() {
        let params = RoomSampleParams::default();
        let a = RoomSample::draw(&mut StdRng::seed_from_u64(1), &params).unwrap();
        let b = RoomSample::draw(&mut StdRng::seed_from_u64(1), &params).unwrap();
        assert_eq!(a.values, b.values);
    }

    #[test]
    fn draw_rejects_negative_std_dev() {
        let params = RoomSampleParams {
            std_dev: -1.0,
            ..RoomSampleParams::default()
        };
        assert!(RoomSample::draw(&mut StdRng::seed_from_u64(1), &params).is_err());
    }

    #[test]
    fn histogram_places_max_in_last_bin() {
        let bins = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].left, 0.0);
        assert_eq!(bins[3].right, 4.0);
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 2]);
    }

    #[test]
    fn histogram_of_constant_data_has_nonzero_width() {
        let bins = histogram(&[5.0, 5.0, 5.0], 3);
        assert!(bins.iter().all(|b| b.width() > 0.0));
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn auto_bins_fall_back_to_sturges() {
        // Zero IQR.
        assert_eq!(auto_bin_count(&[1.0; 16]), 5);
        assert_eq!(auto_bin_count(&[3.0]), 1);
    }

    #[test]
    fn kde_area_tracks_histogram_area() {
        let mut rng = StdRng::seed_from_u64(99);
        let params = RoomSampleParams {
            size: 2000,
            ..RoomSampleParams::default()
        };
        let sample = RoomSample::draw(&mut rng, &params).unwrap();
        let width = sample.bins[0].width();
        let hist_area: f64 = sample.bins.iter().map(|b| b.count as f64 * width).sum();
        let kde_area: f64 = sample
            .kde
            .windows(2)
            .map(|w| (w[1][0] - w[0][0]) * (w[0][1] + w[1][1]) / 2.0)
            .sum();
        // The curve is evaluated over the data range only, so it misses the tails.
        assert!(kde_area > 0.8 * hist_area && kde_area < 1.05 * hist_area);
    }
}
