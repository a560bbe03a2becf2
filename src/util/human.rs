const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count that may be unknown; `None` renders as "N/A".
pub fn fmt_opt_bytes(bytes: Option<u64>, decimals: usize) -> String {
    match bytes {
        Some(b) => fmt_size(b as f64, decimals),
        None    => "N/A".to_string(),
    }
}

/// Scale `size` by 1024 through B..PB. PB is the last unit even past 1024 PB.
///
/// Zero is always "0 B" (no decimals); negative or NaN input means "size
/// unknown" and renders as "N/A".
pub fn fmt_size(size: f64, decimals: usize) -> String {
    if size.is_nan() || size < 0.0 { return "N/A".to_string(); }
    if size == 0.0 { return "0 B".to_string(); }

    let mut value = size;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.*} {}", decimals, value, UNITS[unit])
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 { return 0.0; }
    part as f64 / whole as f64 * 100.0
}

/// Round to two decimals, matching how usage percentages are reported.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Format a percentage with two decimals: "84.50%"
pub fn fmt_pct(pct: f64) -> String {
    format!("{:.2}%", pct)
}
