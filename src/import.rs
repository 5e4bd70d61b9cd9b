//! Appliance spec-sheet import
//!
//! Scans a directory of plain-text manufacturer sheets and loads the
//! appliances they describe into the catalog. A sheet looks like:
//!
//! ```text
//! Name: Hammer Mill HM-40
//! Category: Milling
//! Power: 4 kW
//! Capacity: 200 kg/h
//! Price: USD 1,200
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use rusqlite::Connection;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::db;
use crate::models::{ApplianceSpec, CatalogEntry};

/// Compiled field patterns, built once per import run
struct SheetPatterns {
    name: Regex,
    category: Regex,
    power: Regex,
    speed: Regex,
    price: Regex,
}

impl SheetPatterns {
    fn new() -> Result<Self> {
        Ok(Self {
            name: Regex::new(r"(?mi)^\s*(?:name|model)\s*:\s*(.+?)\s*$")?,
            category: Regex::new(r"(?mi)^\s*category\s*:\s*(.+?)\s*$")?,
            // Power: 2.2 kW / Rated power: 750 W
            power: Regex::new(r"(?mi)^\s*(?:rated\s+)?power\s*:\s*([\d.]+)\s*(kw|w)\b")?,
            // Capacity: 100 kg/h / Throughput: 80 kg/hr
            speed: Regex::new(
                r"(?mi)^\s*(?:speed|capacity|throughput)\s*:\s*([\d.]+)\s*kg\s*/\s*h(?:r|our)?\b",
            )?,
            // Price: USD 1,200 / Price: $600 / Price: 600
            price: Regex::new(r"(?mi)^\s*price\s*:\s*(?:usd\s*|\$\s*)?([\d,]+(?:\.\d+)?)")?,
        })
    }
}

/// Sheets found under a directory, plus entries the walk could not read
#[derive(Debug, Default)]
pub struct SheetScan {
    pub sheets: Vec<PathBuf>,
    pub walk_errors: usize,
}

/// Find all spec sheets (*.txt, *.spec) under a directory
pub fn find_sheet_files(sheet_dir: &Path) -> SheetScan {
    let mut scan = SheetScan::default();

    for entry in WalkDir::new(sheet_dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                scan.walk_errors += 1;
                continue;
            }
        };

        let path = entry.path();
        let is_sheet = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("spec"));
        if entry.file_type().is_file() && is_sheet {
            scan.sheets.push(path.to_path_buf());
        }
    }

    scan.sheets.sort();
    scan
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

/// Parse one sheet. `None` means the sheet lacks a name, power or speed.
fn parse_sheet(content: &str, patterns: &SheetPatterns) -> Option<(ApplianceSpec, Option<String>)> {
    let name = patterns.name.captures(content)?[1].to_string();

    let power_cap = patterns.power.captures(content)?;
    let mut power_kw = parse_number(&power_cap[1])?;
    if power_cap[2].eq_ignore_ascii_case("w") {
        power_kw /= 1000.0;
    }

    let speed = parse_number(&patterns.speed.captures(content)?[1])?;

    // No price listed means the appliance is priced separately
    let price_usd = patterns
        .price
        .captures(content)
        .and_then(|cap| parse_number(&cap[1]))
        .unwrap_or(0.0);

    let category = patterns.category.captures(content).map(|cap| cap[1].to_string());

    Some((
        ApplianceSpec {
            name,
            power_kw,
            processing_speed_kg_per_hr: speed,
            price_usd,
        },
        category,
    ))
}

/// Import every sheet under `sheet_dir` into the catalog
pub fn import_to_database(conn: &Connection, sheet_dir: &Path) -> Result<ImportStats> {
    let mut stats = ImportStats::default();
    let patterns = SheetPatterns::new()?;

    info!(dir = %sheet_dir.display(), "scanning for appliance sheets");
    let SheetScan { sheets, walk_errors } = find_sheet_files(sheet_dir);
    info!(count = sheets.len(), walk_errors, "found candidate sheets");
    stats.errors += walk_errors;

    for path in &sheets {
        let content = match fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
        {
            Ok(content) => content,
            Err(e) => {
                warn!("{:#}", e);
                stats.errors += 1;
                continue;
            }
        };

        match parse_sheet(&content, &patterns) {
            Some((spec, _)) if spec.validate().is_err() => {
                warn!(sheet = %path.display(), name = %spec.name, "sheet has non-positive power or speed, skipping");
                stats.skipped += 1;
            }
            Some((spec, category)) => {
                info!(
                    name = %spec.name,
                    power_kw = spec.power_kw,
                    speed = spec.processing_speed_kg_per_hr,
                    price = spec.price_usd,
                    "parsed sheet"
                );
                db::upsert_appliance(
                    conn,
                    &CatalogEntry {
                        spec,
                        category,
                        source: Some(path.display().to_string()),
                    },
                )?;
                stats.imported += 1;
            }
            None => stats.skipped += 1,
        }
    }

    Ok(stats)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub imported: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl std::fmt::Display for ImportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported {} appliances. Skipped: {}, Errors: {}",
            self.imported, self.skipped, self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_sheet_with_watts_and_commas() {
        let patterns = SheetPatterns::new().unwrap();
        let sheet = "Model: Rice Huller RH-1\nCategory: Hulling\nRated power: 750 W\nThroughput: 60 kg/hr\nPrice: USD 1,250.50\n";

        let (spec, category) = parse_sheet(sheet, &patterns).unwrap();
        assert_eq!(spec.name, "Rice Huller RH-1");
        assert!((spec.power_kw - 0.75).abs() < 1e-12);
        assert_eq!(spec.processing_speed_kg_per_hr, 60.0);
        assert_eq!(spec.price_usd, 1250.5);
        assert_eq!(category.as_deref(), Some("Hulling"));
    }

    #[test]
    fn test_parse_sheet_requires_power_and_speed() {
        let patterns = SheetPatterns::new().unwrap();
        assert!(parse_sheet("Name: Mystery Box\nPrice: 10\n", &patterns).is_none());
        assert!(parse_sheet("Name: Half Sheet\nPower: 2 kW\n", &patterns).is_none());
    }

    #[test]
    fn test_import_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("hammer.txt"),
            "Name: Hammer Mill HM-40\nPower: 4 kW\nCapacity: 200 kg/h\nPrice: $1200\n",
        )
        .unwrap();
        fs::create_dir(dir.path().join("presses")).unwrap();
        fs::write(
            dir.path().join("presses").join("oil.spec"),
            "Name: Oil Press\nPower: 1.5 kW\nSpeed: 40 kg/h\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "Call supplier on Monday\n").unwrap();
        fs::write(dir.path().join("photo.jpg"), "not a sheet").unwrap();

        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();

        let stats = import_to_database(&conn, dir.path()).unwrap();
        assert_eq!(
            stats,
            ImportStats {
                imported: 2,
                skipped: 1,
                errors: 0
            }
        );

        let press = db::get_appliance(&conn, "Oil Press").unwrap().unwrap();
        assert_eq!(press.spec.price_usd, 0.0);
        assert!(press.source.unwrap().ends_with("oil.spec"));
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_link_counts_as_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("hammer.txt"),
            "Name: Hammer Mill HM-40\nPower: 4 kW\nCapacity: 200 kg/h\n",
        )
        .unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling.txt")).unwrap();

        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();

        let stats = import_to_database(&conn, dir.path()).unwrap();
        assert_eq!(stats.imported, 1);
        assert_eq!(stats.errors, 1);
    }
}
