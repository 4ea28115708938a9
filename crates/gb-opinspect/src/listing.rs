use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use gb_instrgen::emit::case_block;
use gb_instrgen::table::TABLE_SIZE;
use gb_instrgen::{Category, Instr, OpcodeSet};

/// Accepts `0x1cb`, `0X1CB` or decimal.
pub fn parse_opcode(s: &str) -> Result<u16> {
    let s = s.trim();
    let v = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)?
    } else {
        s.parse::<u16>()?
    };
    anyhow::ensure!((v as usize) < TABLE_SIZE, "opcode {v:#x} is outside the table");
    Ok(v)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub by_category: BTreeMap<String, usize>,
    pub undefined: usize,
    pub excluded: usize,
}

pub fn summarize(set: &[Instr]) -> Summary {
    let excl = OpcodeSet::excluded();
    let mut s = Summary::default();
    for i in set {
        if excl.contains(i.opcode) {
            s.excluded += 1;
        }
        if i.is_undef() {
            s.undefined += 1;
            continue;
        }
        let key = match Category::of(&i.opname) {
            Some(c) => format!("{c:?}"),
            None => format!("other({})", i.opname),
        };
        *s.by_category.entry(key).or_default() += 1;
    }
    s
}

pub fn text_listing(set: &[Instr]) -> Vec<String> {
    set.iter()
        .map(|i| {
            if i.is_undef() {
                format!("{:#05x}  {}", i.opcode, i.opname)
            } else {
                format!(
                    "{:#05x}  {:<5} {:<10} n={} opr1={:<4} opr2={:<6} time={:<5} len={}",
                    i.opcode,
                    i.opname,
                    i.operand,
                    i.oprnum,
                    i.opr1.as_deref().unwrap_or("-"),
                    i.opr2.as_deref().unwrap_or("-"),
                    i.time,
                    i.len
                )
            }
        })
        .collect()
}

/// The generated case for `opcode`, or a note when the template owns it.
pub fn describe_case(set: &[Instr], opcode: u16) -> Result<Vec<String>> {
    let i = set
        .get(opcode as usize)
        .ok_or_else(|| anyhow::anyhow!("opcode {opcode:#x} is outside the table"))?;
    Ok(match case_block(i, &OpcodeSet::excluded())? {
        Some(lines) => lines,
        None => vec![format!(
            "// {:#x} ({}) is hand-written in the template",
            opcode,
            i.label().trim_end()
        )],
    })
}
