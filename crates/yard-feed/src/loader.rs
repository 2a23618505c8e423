//! CSV arrival-feed loader.
//!
//! # CSV format
//!
//! One row per item, in arrival order.  `processing_time` is optional.
//!
//! ```csv
//! item_id,x,y,length,width,start_time,exit_time,time_remain,processing_time
//! B001,0,114,11,8,2017/9/1,2017/9/22,0,13
//! B003,8,114,11,8,2017/9/2,2017/9/22,0,13
//! ```
//!
//! Dates are `YYYY/M/D` (or ISO `YYYY-MM-DD`).  Numeric fields that fail to
//! parse, non-positive extents, negative anchors, values past
//! [`MAX_EXTENT`], and exit dates before start dates reject the whole feed
//! with the offending line number.

use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use yard_core::{parse_date, Rect, MAX_EXTENT};

use crate::{ArrivalRecord, FeedError, FeedResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ArrivalRow {
    item_id:         String,
    x:               i32,
    y:               i32,
    length:          i32,
    width:           i32,
    start_time:      String,
    exit_time:       String,
    time_remain:     u32,
    #[serde(default)]
    processing_time: u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load arrival records from a CSV file.
pub fn load_arrivals_csv(path: &Path) -> FeedResult<Vec<ArrivalRecord>> {
    let file = std::fs::File::open(path).map_err(FeedError::Io)?;
    load_arrivals_reader(file)
}

/// Like [`load_arrivals_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded feeds.
pub fn load_arrivals_reader<R: Read>(reader: R) -> FeedResult<Vec<ArrivalRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| FeedError::Parse { line: 1, msg: e.to_string() })?
        .clone();

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let raw = result.map_err(|e| FeedError::Parse {
            line: e.position().map_or(0, |p| p.line()),
            msg:  e.to_string(),
        })?;
        let line = raw.position().map_or(0, |p| p.line());
        let row: ArrivalRow = raw
            .deserialize(Some(&headers))
            .map_err(|e| FeedError::Parse { line, msg: e.to_string() })?;
        records.push(validate(row, line)?);
    }

    debug!("loaded {} arrival records", records.len());
    Ok(records)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn validate(row: ArrivalRow, line: u64) -> FeedResult<ArrivalRecord> {
    let parse_err = |msg: String| FeedError::Parse { line, msg };

    if row.item_id.is_empty() {
        return Err(parse_err("empty item_id".into()));
    }
    if row.length <= 0 || row.width <= 0 {
        return Err(parse_err(format!(
            "item {} has non-positive extent {}x{}",
            row.item_id, row.width, row.length
        )));
    }
    if row.x < 0 || row.y < 0 || row.x > MAX_EXTENT || row.y > MAX_EXTENT {
        return Err(parse_err(format!(
            "item {} has anchor ({}, {}) outside 0..={MAX_EXTENT}",
            row.item_id, row.x, row.y
        )));
    }
    if row.length > MAX_EXTENT || row.width > MAX_EXTENT {
        return Err(parse_err(format!(
            "item {} extent {}x{} exceeds {MAX_EXTENT}",
            row.item_id, row.width, row.length
        )));
    }
    let start_time = parse_date(&row.start_time).map_err(|e| parse_err(e.to_string()))?;
    let exit_time = parse_date(&row.exit_time).map_err(|e| parse_err(e.to_string()))?;
    if exit_time < start_time {
        return Err(parse_err(format!(
            "item {} exits ({exit_time}) before it starts ({start_time})",
            row.item_id
        )));
    }

    Ok(ArrivalRecord {
        label: row.item_id,
        rect: Rect::new(row.x, row.y, row.length, row.width),
        start_time,
        exit_time,
        time_remain: row.time_remain,
        processing_time: row.processing_time,
    })
}
