//! Statistics primitives
//!
//! Pure numeric kernels shared by the insight analyzers. All functions are
//! total: degenerate inputs (empty slices, mismatched lengths, zero
//! variance) return 0.0 rather than panicking or erroring.

/// Arithmetic mean. Empty input returns 0.0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median. Even-length input averages the two middle values.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population standard deviation. Empty input returns 0.0.
pub fn stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Pearson correlation coefficient.
///
/// Returns 0.0 when the inputs are empty, their lengths differ, or either
/// series has zero variance. Otherwise the result lies in [-1, 1].
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.is_empty() || xs.len() != ys.len() {
        return 0.0;
    }

    let mean_x = mean(xs);
    let mean_y = mean(ys);

    let mut covariance = 0.0;
    let mut ss_x = 0.0;
    let mut ss_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        ss_x += dx * dx;
        ss_y += dy * dy;
    }

    let denominator = (ss_x * ss_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    (covariance / denominator).clamp(-1.0, 1.0)
}

/// Pooled-variance two-sample t-statistic.
///
/// Used as an approximate significance gate only, never for formal
/// p-values. Returns 0.0 when either sample is empty or the degrees of
/// freedom are non-positive. Perfectly separated zero-variance samples
/// yield a signed infinity; callers compare the magnitude against a gate or
/// clamp derived proxies, so non-finite values never reach an output
/// record.
pub fn t_statistic(sample_a: &[f64], sample_b: &[f64]) -> f64 {
    if sample_a.is_empty() || sample_b.is_empty() {
        return 0.0;
    }

    let n_a = sample_a.len() as f64;
    let n_b = sample_b.len() as f64;
    let degrees = n_a + n_b - 2.0;
    if degrees <= 0.0 {
        return 0.0;
    }

    let mean_a = mean(sample_a);
    let mean_b = mean(sample_b);
    let ss_a = sample_a.iter().map(|v| (v - mean_a).powi(2)).sum::<f64>();
    let ss_b = sample_b.iter().map(|v| (v - mean_b).powi(2)).sum::<f64>();

    let difference = mean_a - mean_b;
    let pooled_variance = (ss_a + ss_b) / degrees;
    if pooled_variance == 0.0 {
        if difference == 0.0 {
            return 0.0;
        }
        return difference.signum() * f64::INFINITY;
    }

    difference / (pooled_variance * (1.0 / n_a + 1.0 / n_b)).sqrt()
}
