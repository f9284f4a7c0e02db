//! Prediction log
//!
//! Paper record of predictor signals that cleared the confidence floor.

use crate::edge::Direction;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

/// One predictor signal worth keeping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRecord {
    pub time: DateTime<Utc>,
    pub direction: Direction,
    pub confidence: Decimal,
    pub price: Decimal,
}

const HEADER: &str = "time,direction,confidence,price";

/// Append-only in-memory log of predictor signals
#[derive(Debug, Default)]
pub struct PredictionLog {
    records: Vec<PredictionRecord>,
}

impl PredictionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PredictionRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write all records as CSV, creating parent directories as needed
    pub fn write_csv(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = String::with_capacity(48 * (self.records.len() + 1));
        out.push_str(HEADER);
        out.push('\n');
        for record in &self.records {
            out.push_str(&format!(
                "{},{},{},{}\n",
                record.time.to_rfc3339_opts(SecondsFormat::Micros, true),
                record.direction,
                record.confidence,
                record.price,
            ));
        }

        fs::write(path, out)?;
        Ok(())
    }
}
