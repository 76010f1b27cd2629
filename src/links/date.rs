use regex::Regex;
use std::sync::OnceLock;

fn year_month_segment() -> &'static Regex {
    static SEGMENT: OnceLock<Regex> = OnceLock::new();
    SEGMENT.get_or_init(|| Regex::new(r"/(\d{4})/(\d{2})/").expect("static regex is valid"))
}

/// Infers a `YYYY-MM` date from the first `/YYYY/MM/` path segment of a URL
///
/// # Examples
///
/// ```
/// use reg_watch::links::infer_year_month;
///
/// let url = "https://unece.org/transport/documents/2023/07/standards/r155";
/// assert_eq!(infer_year_month(url), Some("2023-07".to_string()));
/// assert_eq!(infer_year_month("https://unece.org/r155"), None);
/// ```
pub fn infer_year_month(url: &str) -> Option<String> {
    year_month_segment()
        .captures(url)
        .map(|caps| format!("{}-{}", &caps[1], &caps[2]))
}
