//! Loader for the serialized opcode table.
//!
//! The table is a JSON array of exactly [`TABLE_SIZE`] objects, one per slot of
//! the two-stage opcode space: 0x000..=0x0ff are the single-byte opcodes and
//! 0x100..=0x1ff the second byte of the `CB`-prefixed family. Only the shape is
//! checked here; field contents are validated by the normalizer and formatter.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{GenError, Result};

pub const TABLE_SIZE: usize = 512;

/// One record as authored. Unlisted keys (flag columns etc.) are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawEntry {
    pub opname: Option<String>,
    pub operand: Option<String>,
    pub time: Option<Literal>,
    pub len: Option<Literal>,
}

/// A literal column that tables author either as a string or a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Text(String),
    Int(u64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Text(s) => f.write_str(s),
            Literal::Int(n) => write!(f, "{n}"),
        }
    }
}

pub fn parse_table(text: &str) -> Result<Vec<RawEntry>> {
    let records: Vec<Map<String, Value>> =
        serde_json::from_str(text).map_err(|e| GenError::MalformedTable {
            reason: e.to_string(),
        })?;
    if records.len() != TABLE_SIZE {
        return Err(GenError::MalformedTable {
            reason: format!("expected {TABLE_SIZE} records, found {}", records.len()),
        });
    }
    records
        .into_iter()
        .enumerate()
        .map(|(i, rec)| {
            serde_json::from_value(Value::Object(rec)).map_err(|e| GenError::MalformedTable {
                reason: format!("record {i:#x}: {e}"),
            })
        })
        .collect()
}

pub fn load_table(path: &Path) -> Result<Vec<RawEntry>> {
    let text = std::fs::read_to_string(path).map_err(GenError::io(path))?;
    let table = parse_table(&text)?;
    debug!(path = %path.display(), records = table.len(), "loaded opcode table");
    Ok(table)
}

#[cfg(test)]
pub(crate) fn table_from(entries: &[(usize, RawEntry)]) -> Vec<RawEntry> {
    let mut table = vec![RawEntry::default(); TABLE_SIZE];
    for (i, e) in entries {
        table[*i] = e.clone();
    }
    table
}

#[cfg(test)]
pub(crate) fn entry(opname: &str, operand: &str, time: &str, len: &str) -> RawEntry {
    RawEntry {
        opname: Some(opname.to_string()),
        operand: Some(operand.to_string()),
        time: Some(Literal::Text(time.to_string())),
        len: Some(Literal::Text(len.to_string())),
    }
}
