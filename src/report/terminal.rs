use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{LicenseData, LicenseMap, Status};

/// Render a colored terminal report.
pub fn render(results: &LicenseMap, input: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let total = results.len();
    let approved_count = count(results, Status::Approved);
    let restricted_count = count(results, Status::Restricted);
    let unresolved_count = count(results, Status::Unresolved);

    if quiet {
        println!(
            "Total: {}  Approved: {}  Restricted: {}  Unresolved: {}",
            total,
            approved_count.to_string().green(),
            restricted_count.to_string().red(),
            unresolved_count.to_string().yellow(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "license-resolver".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Input: {}\n", input.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total components   : {}", total));
    println!(
        " │  {:<48} │",
        format!(
            "{}  Approved        : {:>4}  {}",
            "✓".green(),
            approved_count,
            summarize_licenses(results, Status::Approved)
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Restricted      : {:>4}  {}",
            "✗".red(),
            restricted_count,
            summarize_licenses(results, Status::Restricted)
        )
    );
    println!(
        " │  {:<48} │",
        format!("{}  Unresolved      : {:>4}", "?".yellow(), unresolved_count)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if restricted_count > 0 {
        println!(" {} Restricted content:\n", "[RESTRICTED]".red().bold());
        render_table(results, Status::Restricted);
        println!();
    }

    if unresolved_count > 0 {
        println!(" {} No license data found:\n", "[UNRESOLVED]".yellow().bold());
        render_table(results, Status::Unresolved);
        println!();
    }

    if verbose && approved_count > 0 {
        println!(" {} Approved content:\n", "[APPROVED]".green().bold());
        render_table(results, Status::Approved);
        println!();
    }

    Ok(())
}

fn count(results: &LicenseMap, status: Status) -> usize {
    results.values().filter(|d| d.status() == status).count()
}

fn render_table(results: &LicenseMap, status_filter: Status) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Content").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Authority").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for data in results.values().filter(|d| d.status() == status_filter) {
        let (status_str, status_color) = match data.status() {
            Status::Approved => ("✓ approved", Color::Green),
            Status::Restricted => ("✗ restricted", Color::Red),
            Status::Unresolved => ("? unresolved", Color::Yellow),
        };

        table.add_row(vec![
            Cell::new(data.id().to_string()),
            Cell::new(license_label(data)),
            Cell::new(data.authority().unwrap_or("-")),
            Cell::new(status_str)
                .fg(status_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

fn license_label(data: &LicenseData) -> &str {
    match data.license() {
        Some(license) if !license.is_empty() => license,
        _ => "unknown",
    }
}

/// The three most frequent licenses for a status, e.g. `[MIT (12), EPL-2.0 (3)]`.
fn summarize_licenses(results: &LicenseMap, status: Status) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for data in results.values().filter(|d| d.status() == status) {
        *counts.entry(license_label(data)).or_insert(0) += 1;
    }

    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(lic, cnt)| format!("{} ({})", lic, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentData, ContentId, ContentStatus};

    fn entry(name: &str, license: Option<(&str, ContentStatus)>) -> (ContentId, LicenseData) {
        let id = ContentId::new("npm", "npmjs", None, name, "1.0.0");
        let mut data = LicenseData::new(id.clone());
        if let Some((license, status)) = license {
            data.add_content_data(ContentData::new(id.clone(), license, 100, status, "test"));
        }
        (id, data)
    }

    #[test]
    fn test_summarize_licenses() {
        let results: LicenseMap = [
            entry("a", Some(("MIT", ContentStatus::Approved))),
            entry("b", Some(("MIT", ContentStatus::Approved))),
            entry("c", Some(("EPL-2.0", ContentStatus::Approved))),
            entry("d", Some(("", ContentStatus::Restricted))),
            entry("e", None),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            summarize_licenses(&results, Status::Approved),
            "[MIT (2), EPL-2.0 (1)]"
        );
        assert_eq!(
            summarize_licenses(&results, Status::Restricted),
            "[unknown (1)]"
        );
        assert_eq!(count(&results, Status::Unresolved), 1);
    }
}
