/// `"12.3m"` below one kilometer, `"1.23km"` from there on.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.1}m", meters)
    } else {
        format!("{:.2}km", meters / 1000.0)
    }
}

/// Elapsed seconds as `MM:SS`; minutes are not wrapped into hours.
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn progress_percent(actual: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (actual / total * 100.0).min(100.0)
}

pub fn interpolate(start: f64, end: f64, progress: f64) -> f64 {
    start + (end - start) * progress
}
