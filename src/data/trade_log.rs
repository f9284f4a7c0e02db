//! Trade log
//!
//! In-memory during the session, flushed to CSV on clean or interrupted
//! shutdown. The CSV is the only durable record of session activity, so a
//! failed flush is surfaced loudly even though it never blocks exit.

use crate::edge::Direction;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// One admitted trade, created once and never mutated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeRecord {
    pub time: DateTime<Utc>,
    pub direction: Direction,
    pub confidence: Decimal,
    pub reference_price: Decimal,
    pub oracle_price: Decimal,
    pub gap_pct: Decimal,
    pub oracle_staleness_secs: i64,
    pub remaining_secs: i64,
}

const HEADER: &str =
    "time,direction,confidence,reference_price,oracle_price,gap_pct,oracle_staleness_secs,remaining_secs";

/// Append-only in-memory log of admitted trades
#[derive(Debug, Default)]
pub struct TradeLog {
    records: Vec<TradeRecord>,
}

impl TradeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TradeRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    /// Write all records as CSV, creating parent directories as needed
    pub fn write_csv(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = String::with_capacity(64 * (self.records.len() + 1));
        out.push_str(HEADER);
        out.push('\n');
        for record in &self.records {
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                record.time.to_rfc3339_opts(SecondsFormat::Micros, true),
                record.direction,
                record.confidence,
                record.reference_price,
                record.oracle_price,
                record.gap_pct,
                record.oracle_staleness_secs,
                record.remaining_secs,
            ));
        }

        fs::write(path, out)?;
        Ok(())
    }

    /// Read a previously written CSV back into records
    pub fn read_csv(path: &Path) -> anyhow::Result<Vec<TradeRecord>> {
        let content = fs::read_to_string(path)?;
        let mut lines = content.lines();

        match lines.next() {
            Some(header) if header == HEADER => {}
            other => anyhow::bail!("unexpected trade log header: {:?}", other),
        }

        lines
            .filter(|line| !line.is_empty())
            .map(parse_row)
            .collect()
    }
}

fn parse_row(line: &str) -> anyhow::Result<TradeRecord> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 8 {
        anyhow::bail!("expected 8 fields, got {}: {:?}", fields.len(), line);
    }

    Ok(TradeRecord {
        time: DateTime::parse_from_rfc3339(fields[0])?.with_timezone(&Utc),
        direction: fields[1]
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?,
        confidence: Decimal::from_str(fields[2])?,
        reference_price: Decimal::from_str(fields[3])?,
        oracle_price: Decimal::from_str(fields[4])?,
        gap_pct: Decimal::from_str(fields[5])?,
        oracle_staleness_secs: fields[6].parse()?,
        remaining_secs: fields[7].parse()?,
    })
}
