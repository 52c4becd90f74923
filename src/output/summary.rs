//! Terminal rendering of heap reports.

use super::report::HeapReport;
use colored::*;

/// Render a human-readable summary of a report for the terminal
pub fn render_terminal_summary(report: &HeapReport, top: usize) -> String {
    let mut out = String::new();

    out.push_str(&render_header(report));
    out.push_str(&render_types(report));
    out.push_str(&render_prototypes(report, top));

    out
}

fn render_header(report: &HeapReport) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&"Heap Graph Summary".bold().to_string());
    out.push_str("\n---------------------------------------------------\n");
    out.push_str(&format!("Source:        {}\n", report.source));
    out.push_str(&format!("Nodes:         {}\n", report.node_count));
    out.push_str(&format!("Edges:         {}\n", report.edge_count));
    out.push_str(&format!(
        "Shallow total: {}\n",
        format_bytes(report.total_shallow_size)
    ));
    out.push_str(&format!("Retainer units: {}\n", report.retainer_units));
    out.push_str("---------------------------------------------------\n");
    out
}

fn render_types(report: &HeapReport) -> String {
    let mut out = String::new();
    if report.types.is_empty() {
        return out;
    }

    out.push_str(&format!("\n{}\n", "By type:".bold()));
    for bucket in &report.types {
        out.push_str(&format!(
            "  {:<22} {:>12} {:>6.1}%  ({} objects)\n",
            bucket.name.cyan(),
            format_bytes(bucket.shallow_size),
            percent(bucket.shallow_size, report.total_shallow_size),
            bucket.object_count
        ));
    }
    out
}

fn render_prototypes(report: &HeapReport, top: usize) -> String {
    let mut out = String::new();
    if report.prototypes.is_empty() {
        return out;
    }

    out.push_str(&format!("\n{}\n", "Top prototypes:".bold()));
    for bucket in report.prototypes.iter().take(top) {
        out.push_str(&format!(
            "  {:<32} shallow {:>12}  retained {:>12}  ({} objects)\n",
            bucket.name.yellow(),
            format_bytes(bucket.shallow_size),
            format_bytes(bucket.retained_size),
            bucket.object_count
        ));
    }
    out
}

fn percent(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Human-readable byte count (binary units)
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
