//! Ratio and Score Helpers
//!
//! Every ratio the engine computes (volume/liquidity, buy/total volume,
//! gain/loss, 5m/1h volume) goes through [`safe_ratio`] so a zero or
//! non-finite denominator never leaks NaN or infinity into a score.

/// Divide `numerator` by `denominator`, returning `default` when the
/// denominator is zero/negative or either side is not finite.
pub fn safe_ratio(numerator: f64, denominator: f64, default: f64) -> f64 {
    if !numerator.is_finite() || !denominator.is_finite() || denominator <= 0.0 {
        return default;
    }
    numerator / denominator
}

/// Clamp a floating score into `[0, 100]`. NaN maps to 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Clamp an integer accumulation into a `[0, 100]` sub-score.
pub fn clamp_points(points: u32) -> u8 {
    points.min(100) as u8
}

/// Replace non-finite values with zero. Used when normalizing raw input.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
