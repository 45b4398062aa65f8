/// Format a byte count as a human readable string with two decimals.
///
/// Thresholds are strict greater-than, so exactly 1000 bytes still renders
/// as bytes. The web UI formats this way and the tests pin it.
pub fn format_bytes(bytes: f64) -> String {
    if bytes > 1_000_000_000.0 {
        format!("{:.2} GB", bytes / 1_000_000_000.0)
    } else if bytes > 1_000_000.0 {
        format!("{:.2} MB", bytes / 1_000_000.0)
    } else if bytes > 1_000.0 {
        format!("{:.2} KB", bytes / 1_000.0)
    } else {
        format!("{:.2} B", bytes)
    }
}
