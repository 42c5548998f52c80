use crate::summary::ProgressSummary;

/// Bars of learned-word completion per level, in whole percent
pub fn completion_bars(summary: &ProgressSummary) -> Vec<(String, u64)> {
    summary
        .levels
        .iter()
        .map(|l| (l.level.to_string().to_uppercase(), l.completion.round() as u64))
        .collect()
}

/// Fraction in `0.0..=1.0` for a gauge
pub fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (f64::from(part) / f64::from(whole)).clamp(0.0, 1.0)
    }
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}
