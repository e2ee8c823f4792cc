use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use apipack_model::{IssueSeverity, SpecReport};
use apipack_normalize::NormalizeSummary;
use apipack_validate::ValidationOutcome;

use apipack_cli::lifecycle::GoalStatus;
use apipack_cli::types::{BuildResult, NormalizeResult};

pub fn print_summary(result: &BuildResult) {
    println!("Project: {} ({})", result.coordinates, result.classifier);
    println!("Build directory: {}", result.build_dir.display());
    for default in &result.applied {
        println!("Applied: {default}");
    }
    if let Some(full_api) = &result.full_api {
        println!(
            "Full API: {} ({} source files, {} modules)",
            full_api.full_api_dir.display(),
            full_api.source_files,
            full_api.modules.archive_count()
        );
    }
    match &result.validation {
        Some(ValidationOutcome::Conformed {
            dialect, documents, ..
        }) => println!("Validation: {} ({documents} documents)", dialect.profile_name()),
        Some(ValidationOutcome::Skipped) => println!("Validation: skipped"),
        Some(ValidationOutcome::NotApplicable(classifier)) => {
            println!("Validation: not applicable to {classifier}");
        }
        None => {}
    }
    if let Some(path) = &result.report_path {
        println!("Validation report: {}", path.display());
    }
    if let Some(package) = &result.package {
        println!(
            "Package: {} ({} files)",
            package.package_dir.display(),
            package.files
        );
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Phase"),
        header_cell("Execution"),
        header_cell("Goal"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for goal in &result.goals {
        table.add_row(vec![
            Cell::new(goal.phase).fg(Color::Blue),
            Cell::new(&goal.execution_id),
            Cell::new(&goal.goal),
            status_cell(goal.status),
        ]);
    }
    println!("{table}");

    if let Some(ValidationOutcome::Conformed { report, .. }) = &result.validation {
        print_issue_table(report);
    }
}

pub fn print_normalize_summary(result: &NormalizeResult) {
    println!("Source: {}", result.source.display());
    println!("Destination: {}", result.dest.display());
    print_archive_table(&result.summary, &result.dest);
}

fn print_archive_table(summary: &NormalizeSummary, dest: &Path) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Archive"),
        header_cell("Target"),
        header_cell("Entries"),
        header_cell("Repaired"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    let mut total_entries = 0usize;
    for archive in &summary.archives {
        total_entries += archive.entries;
        let target = archive
            .target_dir
            .strip_prefix(dest)
            .unwrap_or(&archive.target_dir);
        table.add_row(vec![
            Cell::new(archive.source.display()),
            Cell::new(target.display()),
            count_cell(archive.entries, Color::Reset),
            if archive.repaired {
                Cell::new("✓").fg(Color::Yellow).add_attribute(Attribute::Bold)
            } else {
                dim_cell("-")
            },
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} archives", summary.archive_count()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_entries).add_attribute(Attribute::Bold),
        count_cell(summary.repaired_count(), Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

/// Print findings of a report, violations first.
pub fn print_issue_table(report: &SpecReport) {
    if report.issues.is_empty() {
        return;
    }
    let mut issues: Vec<_> = report.issues.iter().collect();
    issues.sort_by_key(|issue| std::cmp::Reverse(severity_rank(issue.severity)));
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Location"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for issue in issues {
        table.add_row(vec![
            severity_cell(issue.severity),
            issue
                .location
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Issues ({}):", report.profile);
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: GoalStatus) -> Cell {
    match status {
        GoalStatus::Completed => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        GoalStatus::Skipped => dim_cell("skipped"),
        GoalStatus::Delegated => Cell::new("delegated").fg(Color::Yellow),
    }
}

fn severity_cell(severity: IssueSeverity) -> Cell {
    match severity {
        IssueSeverity::Violation => Cell::new("VIOLATION")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        IssueSeverity::Warning => Cell::new("WARN").fg(Color::Yellow),
        IssueSeverity::Info => dim_cell("INFO"),
    }
}

fn severity_rank(severity: IssueSeverity) -> u8 {
    match severity {
        IssueSeverity::Violation => 3,
        IssueSeverity::Warning => 2,
        IssueSeverity::Info => 1,
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
