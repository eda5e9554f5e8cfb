mod detail;
mod report;

pub use detail::detail_page;
pub use report::report_page;

/// Renders a raw value usable in a table cell, `-` when absent.
fn cell<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// `2024-01-15T10:30:00Z` style values become a readable timestamp; values
/// chrono cannot parse are shown verbatim.
fn format_display_date(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return "-".to_string();
    };
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(datetime) => datetime.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}
