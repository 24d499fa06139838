/// Arithmetic mean, truncated. Zero for an empty series.
pub fn mean(values: &[u16]) -> u16 {
    if values.is_empty() {
        return 0;
    }
    let sum: u64 = values.iter().map(|&v| u64::from(v)).sum();
    (sum / values.len() as u64) as u16
}

/// Sample standard deviation (n - 1 denominator) around the truncated
/// mean, truncated. Zero for fewer than two values.
pub fn sample_std_dev(values: &[u16]) -> u16 {
    if values.len() < 2 {
        return 0;
    }
    let mean = f64::from(mean(values));
    let squares: f64 = values
        .iter()
        .map(|&v| {
            let diff = f64::from(v) - mean;
            diff * diff
        })
        .sum();
    let variance = squares / (values.len() - 1) as f64;
    variance.sqrt() as u16
}
