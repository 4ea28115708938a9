//! Text blocks for the three template anchors. Each emitter returns the lines
//! of its block without indentation; the splicer indents them.

use tracing::trace;

use crate::error::Result;
use crate::format::{statements, OpcodeSet};
use crate::normalize::{Instr, PREFIX_BASE, UNDEF};

pub const LENGTHS_PER_LINE: usize = 16;

fn with_separators(mut rows: Vec<String>) -> Vec<String> {
    let last = rows.len().saturating_sub(1);
    for row in &mut rows[..last] {
        row.push(',');
    }
    rows
}

/// Byte length of each single-byte opcode, UNDEF as `0`.
pub fn length_table(set: &[Instr]) -> Vec<String> {
    let values: Vec<&str> = set
        .iter()
        .take(PREFIX_BASE as usize)
        .map(|i| if i.is_undef() { "0" } else { i.len.as_str() })
        .collect();
    with_separators(
        values
            .chunks(LENGTHS_PER_LINE)
            .map(|row| row.join(", "))
            .collect(),
    )
}

fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// One quoted label per opcode across both opcode spaces.
pub fn disas_table(set: &[Instr]) -> Vec<String> {
    with_separators(set.iter().map(|i| quoted(&i.label())).collect())
}

/// The `case` for one opcode, or `None` when the template owns it.
pub fn case_block(i: &Instr, excluded: &OpcodeSet) -> Result<Option<Vec<String>>> {
    if excluded.contains(i.opcode) {
        trace!(opcode = format_args!("{:#x}", i.opcode), "hand-written, skipped");
        return Ok(None);
    }
    if i.is_undef() {
        return Ok(Some(vec![
            format!("// case {:#x}: // {UNDEF}", i.opcode),
            String::new(),
        ]));
    }
    let mut lines = vec![format!("case {:#x}: // {}", i.opcode, i.label().trim_end())];
    lines.extend(statements(i)?);
    lines.push("break;".to_string());
    lines.push(String::new());
    Ok(Some(lines))
}

pub fn case_table(set: &[Instr], excluded: &OpcodeSet) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for i in set {
        if let Some(block) = case_block(i, excluded)? {
            lines.extend(block);
        }
    }
    Ok(lines)
}
