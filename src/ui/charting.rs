/// X (seconds) and Y (wpm) upper bounds for the results chart.
///
/// The x axis spans the whole test even when sampling stopped early.
pub fn compute_chart_params(wpm_coords: &[(f64, f64)], test_secs: f64) -> (f64, f64) {
    let highest_wpm = wpm_coords
        .iter()
        .map(|&(_, wpm)| wpm)
        .fold(0.0_f64, f64::max);

    let last_sample = wpm_coords.last().map(|&(t, _)| t).unwrap_or(0.0);
    let overall_duration = last_sample.max(test_secs).max(1.0);

    (overall_duration, highest_wpm.round().max(1.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
