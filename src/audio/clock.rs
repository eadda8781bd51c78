use std::time::Duration;

/// `M:SS`, floored to whole seconds. Minutes are not wrapped into hours.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let secs = seconds.floor() as u64;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Same as `format_clock`, with `None` (unknown length) rendered as `0:00`.
pub fn format_duration(d: Option<Duration>) -> String {
    d.map_or_else(|| format_clock(f64::NAN), |d| format_clock(d.as_secs_f64()))
}
