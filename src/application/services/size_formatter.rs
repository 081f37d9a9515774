//! Human-readable byte sizes.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Formats a byte count with two decimals in the largest fitting unit.
///
/// `None`, zero and negative values render as `0B`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(size: Option<i64>) -> String {
    let Some(size) = size.filter(|s| *s > 0) else {
        return "0B".to_string();
    };

    let mut unit_index = 0;
    let mut threshold: i64 = 1024;
    while unit_index < UNITS.len() - 1 && size >= threshold {
        unit_index += 1;
        threshold = threshold.saturating_mul(1024);
    }

    let divisor = 1024_f64.powi(i32::try_from(unit_index).unwrap_or(0));
    format!("{:.2} {}", size as f64 / divisor, UNITS[unit_index])
}
