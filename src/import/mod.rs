//! Bulk expense entry from a CSV ledger.
//!
//! Expected columns: `date,category,amount,description`, one row per expense,
//! all rows belonging to a single project. A header row is skipped when the
//! first field does not parse as a date.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use crate::models::Expense;

pub(crate) fn read_expenses_csv(path: &Path, project_id: i64) -> Result<Vec<Expense>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .context("Failed to open CSV file")?;

    let mut expenses = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.context("Failed to read CSV record")?;
        let fields: Vec<String> = record.iter().map(|s| s.trim().to_string()).collect();

        if fields.iter().all(String::is_empty) {
            continue;
        }
        if i == 0 && looks_like_header(&fields) {
            continue;
        }

        let row = i + 1;
        expenses.push(parse_row(&fields, project_id).with_context(|| format!("Row {row}"))?);
    }
    Ok(expenses)
}

fn parse_row(fields: &[String], project_id: i64) -> Result<Expense> {
    let date_str = fields.first().map(String::as_str).unwrap_or_default();
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{date_str}' (expected YYYY-MM-DD)"))?;

    let category = fields.get(1).map(String::as_str).unwrap_or_default();
    if category.is_empty() {
        anyhow::bail!("Missing category");
    }

    let amount_str = fields.get(2).map(String::as_str).unwrap_or_default();
    let amount = parse_amount(amount_str)
        .with_context(|| format!("Invalid amount '{amount_str}'"))?;

    let description = fields.get(3).map(String::as_str).unwrap_or_default();
    if description.is_empty() {
        anyhow::bail!("Missing description");
    }

    Ok(Expense::new(
        project_id,
        category.to_string(),
        amount,
        date.format("%Y-%m-%d").to_string(),
        description.to_string(),
    ))
}

/// Accepts plain integers and thousands separators ("1,000,000" or
/// "1000000원"). Negative amounts are rejected.
fn parse_amount(raw: &str) -> Result<i64> {
    let cleaned = raw.replace(',', "").replace('원', "");
    let amount: i64 = cleaned.trim().parse()?;
    if amount < 0 {
        anyhow::bail!("Amount must be non-negative");
    }
    Ok(amount)
}

fn looks_like_header(fields: &[String]) -> bool {
    fields
        .first()
        .is_some_and(|f| NaiveDate::parse_from_str(f, "%Y-%m-%d").is_err())
}

#[cfg(test)]
mod tests;
