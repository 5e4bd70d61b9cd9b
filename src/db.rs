//! Database schema and operations for the appliance catalog

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::info;

use crate::catalog::{ApplianceCatalog, BuiltinCatalog, CatalogError};
use crate::models::{ApplianceSpec, CatalogEntry};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS appliances (
            name TEXT PRIMARY KEY COLLATE NOCASE,
            power_kw REAL NOT NULL,
            processing_speed_kg_per_hr REAL NOT NULL,
            price_usd REAL NOT NULL,
            category TEXT,
            source TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_appliances_category ON appliances(category);
        "#,
    )?;
    Ok(())
}

/// Insert or replace an appliance
pub fn upsert_appliance(conn: &Connection, entry: &CatalogEntry) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO appliances (name, power_kw, processing_speed_kg_per_hr, price_usd, category, source)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            &entry.spec.name,
            entry.spec.power_kw,
            entry.spec.processing_speed_kg_per_hr,
            entry.spec.price_usd,
            &entry.category,
            &entry.source,
        ),
    )?;
    Ok(())
}

/// Remove every appliance (for re-import)
pub fn clear_appliances(conn: &Connection) -> Result<()> {
    conn.execute_batch("DELETE FROM appliances;")?;
    Ok(())
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<CatalogEntry> {
    Ok(CatalogEntry {
        spec: ApplianceSpec {
            name: row.get(0)?,
            power_kw: row.get(1)?,
            processing_speed_kg_per_hr: row.get(2)?,
            price_usd: row.get(3)?,
        },
        category: row.get(4)?,
        source: row.get(5)?,
    })
}

/// Fetch a single appliance by name (case-insensitive)
pub fn get_appliance(conn: &Connection, name: &str) -> rusqlite::Result<Option<CatalogEntry>> {
    conn.query_row(
        "SELECT name, power_kw, processing_speed_kg_per_hr, price_usd, category, source
         FROM appliances
         WHERE name = ?1",
        [name],
        entry_from_row,
    )
    .optional()
}

/// List all appliances in the catalog
pub fn list_appliances(conn: &Connection) -> Result<Vec<CatalogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT name, power_kw, processing_speed_kg_per_hr, price_usd, category, source
         FROM appliances ORDER BY name",
    )?;

    let rows = stmt.query_map([], entry_from_row)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Load the built-in appliances, replacing any rows with the same name
pub fn seed_builtin(conn: &Connection) -> Result<usize> {
    let entries = BuiltinCatalog.entries();
    for entry in &entries {
        upsert_appliance(conn, entry)?;
    }
    info!(count = entries.len(), "seeded built-in appliances");
    Ok(entries.len())
}

impl ApplianceCatalog for Connection {
    fn lookup(&self, name: &str) -> Result<Option<ApplianceSpec>, CatalogError> {
        Ok(get_appliance(self, name)?.map(|e| e.spec))
    }
}
