//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use lopdns::Record;
use serde::{Deserialize, Serialize};

use crate::mutator::{Change, ChangeKind};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// YAML output
    Yaml,
}

/// The records of one zone, as listed by get-records
#[derive(Debug, Clone, Serialize)]
pub struct ZoneRecords {
    pub zone: String,
    pub records: Vec<Record>,
}

#[derive(Serialize)]
struct ZoneRow<'a> {
    zone: &'a str,
}

#[derive(Serialize)]
struct RecordRow<'a> {
    zone: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    record_type: &'a str,
    content: &'a str,
    ttl: u32,
    priority: u16,
}

#[derive(Serialize)]
struct ChangeRow<'a> {
    zone: &'a str,
    action: ChangeKind,
    dry_run: bool,
    name: &'a str,
    #[serde(rename = "type")]
    record_type: &'a str,
    old_content: &'a str,
    new_content: &'a str,
    ttl: u32,
    priority: u16,
}

/// Print zone names
pub fn print_zones(zones: &[String], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(zones)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(zones)?),
        OutputFormat::Csv => {
            write_csv(zones.iter().map(|zone| ZoneRow { zone }))?;
        }
        OutputFormat::Pretty => {
            println!("{}", "Zones:".bold().underline());
            for zone in zones {
                println!("  {}", zone.cyan());
            }
        }
    }
    Ok(())
}

/// Print the records of one or more zones
pub fn print_records(listing: &[ZoneRecords], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(listing)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(listing)?),
        OutputFormat::Csv => {
            write_csv(listing.iter().flat_map(|zr| {
                zr.records.iter().map(|r| RecordRow {
                    zone: &zr.zone,
                    name: &r.name,
                    record_type: &r.record_type,
                    content: &r.content,
                    ttl: r.ttl,
                    priority: r.priority,
                })
            }))?;
        }
        OutputFormat::Pretty => {
            for zr in listing {
                println!("{} {}", "Records in zone".bold(), zr.zone.cyan());
                for record in &zr.records {
                    println!(
                        "  {:24} {:6} {:40} ttl {:6} priority {}",
                        record.name,
                        record.record_type.yellow(),
                        record.content,
                        record.ttl,
                        record.priority
                    );
                }
                println!();
            }
        }
    }
    Ok(())
}

/// Print what a mutating action did (or would do, in dry-run mode)
pub fn print_changes(changes: &[Change], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(changes)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(changes)?),
        OutputFormat::Csv => {
            write_csv(changes.iter().map(|change| {
                let shown = change.after.as_ref().or(change.before.as_ref());
                ChangeRow {
                    zone: &change.zone,
                    action: change.action,
                    dry_run: change.dry_run,
                    name: shown.map_or("", |r| r.name.as_str()),
                    record_type: shown.map_or("", |r| r.record_type.as_str()),
                    old_content: change.before.as_ref().map_or("", |r| r.content.as_str()),
                    new_content: change.after.as_ref().map_or("", |r| r.content.as_str()),
                    ttl: shown.map_or(0, |r| r.ttl),
                    priority: shown.map_or(0, |r| r.priority),
                }
            }))?;
        }
        OutputFormat::Pretty => {
            for change in changes {
                print_change(change);
            }
            println!();
            println!("{}", summary(changes).bold());
        }
    }
    Ok(())
}

fn print_change(change: &Change) {
    let prefix = if change.dry_run {
        "[dry run] ".dimmed().to_string()
    } else {
        String::new()
    };
    let label = match change.action {
        ChangeKind::Created => "Created".green(),
        ChangeKind::Updated => "Updated".green(),
        ChangeKind::Deleted => "Deleted".red(),
        ChangeKind::Skipped => "Up to date".dimmed(),
    };

    println!("{prefix}{} {} {}", label.bold(), "in zone".bold(), change.zone.cyan());
    match (&change.before, &change.after) {
        (Some(before), Some(after)) if change.action == ChangeKind::Updated => {
            println!("  was: {before}");
            println!("  now: {after}");
        }
        (_, Some(record)) | (Some(record), None) => println!("  {record}"),
        (None, None) => {}
    }
}

/// One-line count of what happened, e.g. `2 updated, 1 skipped`
#[must_use]
pub fn summary(changes: &[Change]) -> String {
    let count = |kind: ChangeKind| changes.iter().filter(|c| c.action == kind).count();
    let mut parts = Vec::new();
    for (kind, label) in [
        (ChangeKind::Created, "created"),
        (ChangeKind::Updated, "updated"),
        (ChangeKind::Deleted, "deleted"),
        (ChangeKind::Skipped, "skipped"),
    ] {
        let n = count(kind);
        if n > 0 {
            parts.push(format!("{n} {label}"));
        }
    }
    if parts.is_empty() {
        return "No changes".to_string();
    }

    let text = parts.join(", ");
    if changes.iter().any(|c| c.dry_run) {
        format!("{text} (dry run, nothing was sent)")
    } else {
        text
    }
}

fn write_csv<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut writer = csv::Writer::from_writer(stdout.lock());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content: &str) -> Record {
        Record {
            name: "www".into(),
            record_type: "A".into(),
            content: content.into(),
            ttl: 3600,
            priority: 0,
        }
    }

    fn change(action: ChangeKind, dry_run: bool) -> Change {
        Change {
            zone: "example.se".into(),
            action,
            dry_run,
            before: Some(record("1.2.3.4")),
            after: Some(record("5.6.7.8")),
        }
    }

    #[test]
    fn test_summary() {
        assert_eq!(summary(&[]), "No changes");
        assert_eq!(
            summary(&[
                change(ChangeKind::Updated, false),
                change(ChangeKind::Updated, false),
                change(ChangeKind::Skipped, false),
            ]),
            "2 updated, 1 skipped"
        );
        assert_eq!(
            summary(&[change(ChangeKind::Deleted, true)]),
            "1 deleted (dry run, nothing was sent)"
        );
    }

    #[test]
    fn test_change_serializes_lowercase_action() {
        let value = serde_json::to_value(change(ChangeKind::Updated, true)).unwrap();
        assert_eq!(value["action"], "updated");
        assert_eq!(value["dry_run"], true);
        assert_eq!(value["after"]["content"], "5.6.7.8");
    }
}
