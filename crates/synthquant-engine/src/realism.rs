//! Summary realism score for finished datasets.
//!
//! The score is a heuristic over the pooled observed prices of every asset:
//! per-step return volatility near 2%, few outsized jumps, and a strictly
//! positive path all earn points. It is a dashboard number, not a
//! statistical test.

/// Score the pooled observed prices of a dataset. Returns 0.0 when there is
/// nothing to score, otherwise a value clamped to [70.0, 99.9] and rounded
/// to one decimal place.
pub fn realism_score(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = prices
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let volatility = (returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n).sqrt();

    let vol_score = (100.0 - (volatility - 0.02).abs() * 1000.0).clamp(0.0, 100.0);

    let outliers = returns
        .iter()
        .filter(|r| r.abs() > 3.0 * volatility)
        .count() as f64;
    let jump_score = (100.0 - outliers / n * 500.0).max(0.0);

    let continuity_score = if prices.iter().all(|price| *price > 0.0) {
        100.0
    } else {
        50.0
    };

    let final_score = vol_score * 0.3 + jump_score * 0.3 + continuity_score * 0.2 + 15.0;

    (final_score.clamp(70.0, 99.9) * 10.0).round() / 10.0
}
