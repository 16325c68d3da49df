/// Calculate `(part / whole) * 100`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use keystats_core::formatting::percentage;
///
/// assert!((percentage(50, 200) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0, 0), 0.0);
/// assert_eq!(percentage(7, 0), 0.0);
/// ```
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64) * 100.0
}

/// Render a percentage with two decimal places, without the `%` sign.
///
/// # Examples
///
/// ```
/// use keystats_core::formatting::format_percent;
///
/// assert_eq!(format_percent(25.0), "25.00");
/// assert_eq!(format_percent(100.0 / 3.0), "33.33");
/// assert_eq!(format_percent(0.0), "0.00");
/// ```
pub fn format_percent(value: f64) -> String {
    format!("{:.2}", value)
}

/// Shorthand for `format_percent(percentage(part, whole))`.
pub fn share(part: u64, whole: u64) -> String {
    format_percent(percentage(part, whole))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
