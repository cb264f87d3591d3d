//! Batch driver
//!
//! Walks the row source in file order: header validation up front, then per
//! row search -> match resolution -> payload -> patch. Row-level problems
//! (empty search value, no match, unusable id, empty payload, remote errors
//! from search/update) are logged and never abort the batch; only the header
//! checks and the initial field metadata fetch are fatal.

use anyhow::Result;
use colored::Colorize;
use log::{info, warn};
use serde_json::Value;

use crate::api::{CrmApi, entity_id};
use crate::error::ImportError;
use crate::payload::{Row, build_update_payload};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub entity: String,
    /// Lookup field; defaults to the first header column when unset
    pub search_field: Option<String>,
    pub dry_run: bool,
}

/// Per-run counters reported at the end of the batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Rows patched (or, in dry-run mode, rows that would have been)
    pub updated: usize,
    /// Rows skipped for row-local reasons
    pub skipped: usize,
    /// Rows whose search or update call failed
    pub failed: usize,
}

/// Run the update batch over all rows of the input.
pub async fn run_batch(
    api: &impl CrmApi,
    mut rows: impl Iterator<Item = Result<Vec<String>>>,
    options: &BatchOptions,
) -> Result<BatchSummary> {
    let headers = match rows.next() {
        Some(row) => row?,
        None => return Err(ImportError::Config("File is empty.".to_string()).into()),
    };
    if headers.iter().all(|cell| cell.is_empty()) {
        return Err(ImportError::Config("Header row is empty.".to_string()).into());
    }

    let search_field = match &options.search_field {
        Some(field) => field.clone(),
        None => headers[0].clone(),
    };
    if !headers.iter().any(|header| header == &search_field) {
        return Err(ImportError::Config(format!(
            "Search field '{}' not found in header row.",
            search_field
        ))
        .into());
    }

    // Fetched exactly once; a failure here aborts the run
    let fields = api.fetch_fields(&options.entity).await?;
    info!(
        "Loaded {} field definitions for '{}'",
        fields.len(),
        options.entity
    );

    let mut summary = BatchSummary::default();

    // Spreadsheet line numbers: header is line 1, data starts at 2
    for (offset, row_values) in rows.enumerate() {
        let index = offset + 2;
        let row_values = row_values?;
        if row_values.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        // Pad short rows so every header column has a value
        let row: Row = headers
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, header)| (header, row_values.get(i).cloned().unwrap_or_default()))
            .collect();

        let search_value = row
            .iter()
            .find(|(id, _)| id == &search_field)
            .map(|(_, value)| value.clone())
            .unwrap_or_default();
        if search_value.is_empty() {
            warn!("Row {}: empty search value, skipping.", index);
            summary.skipped += 1;
            continue;
        }

        let matches = match api
            .search_entities(&options.entity, &search_field, &search_value)
            .await
        {
            Ok(matches) => matches,
            Err(e) => {
                warn!(
                    "Row {}: lookup failed for {}={}: {:#}",
                    index, search_field, search_value, e
                );
                summary.failed += 1;
                continue;
            }
        };
        if matches.is_empty() {
            warn!("Row {}: no match for {}={}", index, search_field, search_value);
            summary.skipped += 1;
            continue;
        }
        if matches.len() > 1 {
            warn!(
                "Row {}: multiple matches for {}={}, using first.",
                index, search_field, search_value
            );
        }
        let Some(id) = entity_id(&matches[0]) else {
            warn!(
                "Row {}: missing entity id for {}={}",
                index, search_field, search_value
            );
            summary.skipped += 1;
            continue;
        };

        let payload = build_update_payload(&row, &search_field, &fields);
        if payload.is_empty() {
            info!(
                "Row {}: nothing to update for {}={}",
                index, search_field, search_value
            );
            summary.skipped += 1;
            continue;
        }

        if options.dry_run {
            println!(
                "{} Row {}: PATCH {} -> {}",
                "DRY-RUN".yellow().bold(),
                index,
                id,
                Value::Object(payload)
            );
            summary.updated += 1;
            continue;
        }

        match api.patch_entity(&options.entity, &id, &payload).await {
            Ok(()) => {
                println!("{} Row {}: updated {}", "✓".green(), index, id);
                summary.updated += 1;
            }
            Err(e) => {
                warn!("Row {}: update of {} failed: {:#}", index, id, e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
