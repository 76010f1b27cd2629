//! Plain-text tables for check results and tracked sources

use crate::config::WatchConfig;
use crate::output::status_label;
use crate::state::CheckResult;

const RESULT_HEADERS: [&str; 6] = ["Name", "Version", "Date", "URL", "Status", "Checked at"];

/// Shown for versions without a known year-month
pub const UNKNOWN_DATE: &str = "unknown";

/// Formats check results as an aligned text table, one row per result
pub fn format_results_table(results: &[CheckResult]) -> String {
    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                r.label.clone(),
                r.date.clone().unwrap_or_else(|| UNKNOWN_DATE.to_string()),
                r.url.clone(),
                status_label(r.status).to_string(),
                r.timestamp(),
            ]
        })
        .collect();

    render(&RESULT_HEADERS, &rows)
}

/// Lists every source with its tracked versions, for `--list`
pub fn format_sources(config: &WatchConfig) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Sources ({}), {} versions tracked:\n",
        config.sources.len(),
        config.version_count()
    ));

    for source in &config.sources {
        out.push_str(&format!(
            "\n{} [{:?}] {}\n",
            source.name, source.kind, source.base_url
        ));
        if let Some(selector) = &source.selector {
            out.push_str(&format!("  selector: {}\n", selector));
        }
        for version in &source.versions {
            let state = if version.is_unchecked() {
                "unchecked"
            } else {
                "baseline recorded"
            };
            out.push_str(&format!(
                "  - {} ({}) {} [{}]\n",
                version.label,
                version.date.as_deref().unwrap_or(UNKNOWN_DATE),
                version.url,
                state
            ));
        }
    }

    out
}

fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_cells, &widths);

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);

    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}
