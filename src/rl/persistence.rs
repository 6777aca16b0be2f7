//! Saving and loading the value table
//!
//! The table is written as pretty-printed JSON:
//!
//! ```json
//! {
//!   "metadata": { "version": "0.1.0", "sessions_trained": 100, ... },
//!   "q_table": {
//!     "1,0,0,0,0,0,0,1,0,0,0,0": { "UP": -812.4, "DOWN": 0.0, "LEFT": -3.1, "RIGHT": 41.7 }
//!   }
//! }
//! ```
//!
//! Loading is lenient: an unreadable file yields an empty table, and records
//! that do not describe a 12-bit state with numeric per-action values are
//! dropped one by one instead of failing the whole load.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use super::agent::QAgent;
use super::perception::{STATE_LEN, State};
use super::q_table::{ActionValues, QTable};
use crate::game::Direction;

/// Metadata saved with the table
///
/// Informational only; loading does not depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Crate version that wrote the file
    pub version: String,

    /// Sessions the agent had played when saved
    pub sessions_trained: usize,

    /// Exploration rate at save time
    pub exploration_rate: f64,

    /// Number of states in the table
    pub states: usize,
}

impl ModelMetadata {
    pub fn new(sessions_trained: usize, exploration_rate: f64, states: usize) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            sessions_trained,
            exploration_rate,
            states,
        }
    }
}

/// Outcome of a lenient load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Records turned into table rows
    pub loaded: usize,
    /// Records dropped as malformed
    pub discarded: usize,
    /// Metadata, if the file carried any that parsed
    pub metadata: Option<ModelMetadata>,
    /// Set when the file as a whole could not be used
    pub unreadable: bool,
}

/// Encode a state as comma-separated `0`/`1` digits
pub fn encode_key(state: &State) -> String {
    state
        .bits()
        .iter()
        .map(|b| if *b { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode a key written by [`encode_key`]; also accepts `true`/`false`
pub fn decode_key(key: &str) -> Option<State> {
    let parts: Vec<&str> = key
        .trim_matches(|c| c == '(' || c == ')')
        .split(',')
        .map(str::trim)
        .collect();
    if parts.len() != STATE_LEN {
        return None;
    }

    let mut bits = [false; STATE_LEN];
    for (bit, part) in bits.iter_mut().zip(parts) {
        *bit = match part {
            "1" | "true" | "True" => true,
            "0" | "false" | "False" => false,
            _ => return None,
        };
    }
    Some(State::new(bits))
}

fn decode_row(value: &Value) -> Option<ActionValues> {
    let object = value.as_object()?;
    let mut row = ActionValues::default();
    for (name, value) in object {
        let direction: Direction = name.parse().ok()?;
        let number = value.as_f64().filter(|v| v.is_finite())?;
        row[direction] = number;
    }
    Some(row)
}

fn encode_row(row: &ActionValues) -> Value {
    let mut object = Map::new();
    for (direction, value) in row.iter() {
        object.insert(direction.name().to_string(), Value::from(value));
    }
    Value::Object(object)
}

/// Save an agent's value table to a file
///
/// Creates parent directories if they don't exist.
pub fn save_q_table(agent: &QAgent, path: &Path, sessions_trained: usize) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let table = agent.q_table();
    let rows: Map<String, Value> = table
        .iter()
        .map(|(state, row)| (encode_key(state), encode_row(row)))
        .collect();

    let metadata = ModelMetadata::new(sessions_trained, agent.exploration_rate(), table.len());
    let document = serde_json::json!({
        "metadata": serde_json::to_value(&metadata).context("Failed to serialize metadata")?,
        "q_table": Value::Object(rows),
    });

    let json = serde_json::to_string_pretty(&document).context("Failed to serialize value table")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write value table to {:?}", path))?;

    tracing::info!(path = %path.display(), states = table.len(), "saved value table");
    Ok(())
}

/// Load a value table, dropping whatever does not validate
pub fn load_q_table(path: &Path) -> (QTable, LoadReport) {
    let mut report = LoadReport::default();

    let document = match read_document(path) {
        Ok(document) => document,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %format!("{err:#}"), "starting with an empty value table");
            report.unreadable = true;
            return (QTable::new(), report);
        }
    };

    let Value::Object(mut root) = document else {
        tracing::warn!(path = %path.display(), "value table file is not a JSON object");
        report.unreadable = true;
        return (QTable::new(), report);
    };

    report.metadata = root
        .remove("metadata")
        .and_then(|m| serde_json::from_value(m).ok());
    let records = match root.remove("q_table") {
        Some(Value::Object(records)) => records,
        Some(_) => {
            tracing::warn!(path = %path.display(), "\"q_table\" is not an object");
            report.unreadable = true;
            return (QTable::new(), report);
        }
        // No wrapper: the whole document is the table
        None => root,
    };

    let mut table = QTable::new();
    for (key, value) in &records {
        match (decode_key(key), decode_row(value)) {
            (Some(state), Some(row)) => {
                table.insert(state, row);
                report.loaded += 1;
            }
            _ => {
                tracing::debug!(key = %key, "discarding malformed value table record");
                report.discarded += 1;
            }
        }
    }

    tracing::info!(
        path = %path.display(),
        loaded = report.loaded,
        discarded = report.discarded,
        "loaded value table"
    );
    (table, report)
}

fn read_document(path: &Path) -> Result<Value> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read value table from {:?}", path))?;
    serde_json::from_str(&json).context("Failed to parse value table")
}
