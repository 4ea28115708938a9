use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{GenError, Result};
use crate::table::{RawEntry, TABLE_SIZE};

/// Mnemonic given to slots the table leaves unassigned.
pub const UNDEF: &str = "UNDEF";
/// Index of the first `CB`-prefixed opcode in the combined space.
pub const PREFIX_BASE: u16 = 0x100;

const ACC_ROTATES: [&str; 4] = ["RLCA", "RRCA", "RLA", "RRA"];
const IMPLICIT_ACC: [&str; 5] = ["SUB", "CP", "OR", "AND", "XOR"];

/// A normalized opcode descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instr {
    pub opcode: u16,
    pub opname: String,
    pub operand: String,
    pub oprnum: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opr1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opr2: Option<String>,
    pub time: String,
    pub len: String,
}

impl Instr {
    fn undef(opcode: u16) -> Self {
        Self {
            opcode,
            opname: UNDEF.to_string(),
            operand: String::new(),
            oprnum: 0,
            opr1: None,
            opr2: None,
            time: String::new(),
            len: String::new(),
        }
    }

    pub fn is_undef(&self) -> bool {
        self.opname == UNDEF
    }

    pub fn is_prefixed(&self) -> bool {
        self.opcode >= PREFIX_BASE
    }

    /// Disassembly text: `UNDEF`, or mnemonic, one space, operand verbatim.
    pub fn label(&self) -> String {
        if self.is_undef() {
            UNDEF.to_string()
        } else {
            format!("{} {}", self.opname, self.operand)
        }
    }
}

/// Assign opcodes, mark UNDEF slots and split operands.
pub fn parse(raw: Vec<RawEntry>) -> Result<Vec<Instr>> {
    if raw.len() != TABLE_SIZE {
        return Err(GenError::MalformedTable {
            reason: format!("expected {TABLE_SIZE} records, found {}", raw.len()),
        });
    }
    raw.into_iter()
        .enumerate()
        .map(|(i, e)| parse_entry(i as u16, e))
        .collect()
}

fn parse_entry(opcode: u16, e: RawEntry) -> Result<Instr> {
    let Some(opname) = e.opname else {
        return Ok(Instr::undef(opcode));
    };
    if opname.is_empty() || opname == UNDEF {
        return Err(GenError::Invariant {
            opcode,
            reason: format!("`{opname}` is not a usable mnemonic"),
        });
    }
    let operand = e.operand.ok_or(GenError::MissingField { opcode, field: "operand" })?;
    let time = e.time.ok_or(GenError::MissingField { opcode, field: "time" })?;
    let len = e.len.ok_or(GenError::MissingField { opcode, field: "len" })?;

    let (oprnum, opr1, opr2) = match operand.split_once(',') {
        Some((a, b)) => (2, Some(a.to_string()), Some(b.to_string())),
        None if operand.is_empty() => (0, None, None),
        None => (1, None, None),
    };
    Ok(Instr {
        opcode,
        opname,
        operand,
        oprnum,
        opr1,
        opr2,
        time: time.to_string(),
        len: len.to_string(),
    })
}

/// Make the implicit accumulator explicit.
///
/// Must run exactly once: the `SUB`/`CP`/`OR`/`AND`/`XOR` rewrite requires a
/// one-operand entry, so a second pass over expanded data fails.
pub fn expand(set: &mut [Instr]) -> Result<()> {
    let mut rewritten = 0usize;
    for i in set.iter_mut().filter(|i| !i.is_undef()) {
        let opcode = i.opcode;
        match i.opname.as_str() {
            "CPL" | "DAA" => {
                i.oprnum = 1;
                i.operand = "A".to_string();
            }
            name if name.ends_with('A') && !i.is_prefixed() => {
                if !ACC_ROTATES.contains(&name) {
                    return Err(GenError::Invariant {
                        opcode,
                        reason: format!("`{name}` ends in A but is not an accumulator rotate"),
                    });
                }
                i.opname.pop();
                i.oprnum = 1;
                i.operand = "A".to_string();
            }
            name if IMPLICIT_ACC.contains(&name) => {
                if i.oprnum != 1 {
                    return Err(GenError::Invariant {
                        opcode,
                        reason: format!("`{name}` expects one operand, has {}", i.oprnum),
                    });
                }
                i.oprnum = 2;
                i.opr1 = Some("A".to_string());
                i.opr2 = Some(i.operand.clone());
            }
            _ => continue,
        }
        trace!(opcode = format_args!("{opcode:#x}"), label = %i.label(), "expanded");
        rewritten += 1;
    }
    debug!(rewritten, "expanded implicit accumulator operands");
    Ok(())
}

pub fn normalize(raw: Vec<RawEntry>) -> Result<Vec<Instr>> {
    let mut set = parse(raw)?;
    expand(&mut set)?;
    Ok(set)
}
