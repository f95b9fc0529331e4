use comfy_table::{modifiers, presets, Attribute, Cell, CellAlignment, Color, Table};
use watchlog_core::{BatchSummary, HistoryStats};
use watchlog_models::HistoryRecord;

const FILENAME_WIDTH: usize = 47;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

fn header(text: &str) -> Cell {
    Cell::new(text).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

pub fn stats_table(stats: &HistoryStats) -> Table {
    let mut table = styled_table();
    table.set_header(vec![header("Download Statistics"), header("")]);
    table.add_row(vec![
        Cell::new("Total downloads"),
        Cell::new(stats.total_downloads).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Total size"),
        Cell::new(format!("{:.2} GB ({} bytes)", stats.total_size_gb(), stats.total_bytes))
            .set_alignment(CellAlignment::Right),
    ]);
    for (status, count) in &stats.status_counts {
        table.add_row(vec![
            Cell::new(format!("Status: {}", status)),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn downloads_table(records: &[HistoryRecord], limit: usize) -> Table {
    let mut table = styled_table();
    table.set_header(vec![
        header("ID"),
        header("Filename"),
        header("Size (MB)"),
        header("Status"),
    ]);
    for record in records.iter().take(limit) {
        table.add_row(vec![
            Cell::new(&record.id),
            Cell::new(truncate_filename(&record.filename, FILENAME_WIDTH)),
            Cell::new(format_size_mb(record.size_bytes())).set_alignment(CellAlignment::Right),
            Cell::new(record.status_or_unknown()),
        ]);
    }
    table
}

pub fn summary_table(summary: &BatchSummary) -> Table {
    let mut table = styled_table();
    table.set_header(vec![header("Import Summary"), header("")]);
    table.add_row(vec![Cell::new("Records"), Cell::new(summary.total)]);
    table.add_row(vec![
        Cell::new("Resolved").fg(Color::Green),
        Cell::new(summary.resolved),
    ]);
    table.add_row(vec![Cell::new("Skipped"), Cell::new(summary.skipped)]);
    for (reason, count) in &summary.skip_reasons {
        table.add_row(vec![Cell::new(format!("  {}", reason)), Cell::new(count)]);
    }
    table.add_row(vec![
        Cell::new("Elapsed"),
        Cell::new(format!("{:.1}s", summary.elapsed().as_secs_f64())),
    ]);
    table
}

/// Cuts names longer than `width` characters to `width - 3` plus `...`.
pub fn truncate_filename(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }
    let kept: String = name.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / BYTES_PER_MB)
}
