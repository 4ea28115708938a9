//! Statement formatter: turns one normalized descriptor into the statements of
//! its `case` body, ending with the cycle cost charged.

use std::fmt;

use bitvec::prelude::*;

use crate::error::{GenError, Result};
use crate::normalize::Instr;
use crate::operand;
use crate::table::TABLE_SIZE;

/// Opcodes whose case bodies are hand-written in the template.
pub const EXCLUDED: [u16; 5] = [0x08, 0xcb, 0xd9, 0xe8, 0xf8];

/// Membership set over the whole 512-slot opcode space.
#[derive(Clone, PartialEq, Eq)]
pub struct OpcodeSet(BitArr!(for TABLE_SIZE, in u64, Lsb0));

impl OpcodeSet {
    pub fn new() -> Self {
        Self(BitArray::ZERO)
    }

    pub fn insert(&mut self, opcode: u16) {
        if let Some(mut bit) = self.0.get_mut(opcode as usize) {
            *bit = true;
        }
    }

    pub fn contains(&self, opcode: u16) -> bool {
        self.0.get(opcode as usize).map_or(false, |b| *b)
    }

    pub fn len(&self) -> usize {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0.not_any()
    }

    /// The fixed hand-written set.
    pub fn excluded() -> Self {
        EXCLUDED.iter().copied().collect()
    }
}

impl Default for OpcodeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<u16> for OpcodeSet {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        let mut set = Self::new();
        for op in iter {
            set.insert(op);
        }
        set
    }
}

impl fmt::Debug for OpcodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.0.iter_ones().map(|i| format!("{i:#x}")))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Load,
    Arith,
    Unary,
    BitMutate,
    BitTest,
    Control,
    Jump,
    Return,
    Stack,
    Restart,
    Compare,
}

impl Category {
    pub fn of(opname: &str) -> Option<Self> {
        let c = match opname {
            "LD" | "LDH" => Category::Load,
            "ADD" | "ADC" | "SUB" | "SBC" | "AND" | "OR" | "XOR" => Category::Arith,
            "INC" | "DEC" | "RL" | "RR" | "RRC" | "RLC" | "SWAP" | "SLA" | "SRL" | "SRA"
            | "CPL" | "DAA" => Category::Unary,
            "RES" | "SET" => Category::BitMutate,
            "BIT" => Category::BitTest,
            "NOP" | "STOP" | "HALT" | "EI" | "DI" | "SCF" | "CCF" => Category::Control,
            "JP" | "CALL" | "JR" => Category::Jump,
            "RET" => Category::Return,
            "PUSH" | "POP" => Category::Stack,
            "RST" => Category::Restart,
            "CP" => Category::Compare,
            _ => return None,
        };
        Some(c)
    }
}

/// Cycle cost of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    Fixed(u32),
    /// `taken/not_taken`, selected by the condition predicate.
    Branch { taken: u32, not_taken: u32 },
}

impl Timing {
    pub fn parse(opcode: u16, time: &str) -> Result<Self> {
        let bad = |reason: &'static str| GenError::Timing {
            opcode,
            time: time.to_string(),
            reason,
        };
        let num = |s: &str| s.trim().parse::<u32>().map_err(|_| bad("not an integer"));
        match time.split_once('/') {
            Some((t, n)) => Ok(Timing::Branch {
                taken: num(t)?,
                not_taken: num(n)?,
            }),
            None => Ok(Timing::Fixed(num(time)?)),
        }
    }
}

fn first(i: &Instr) -> Result<&str> {
    i.opr1.as_deref().ok_or(GenError::MissingField {
        opcode: i.opcode,
        field: "opr1",
    })
}

fn second(i: &Instr) -> Result<&str> {
    i.opr2.as_deref().ok_or(GenError::MissingField {
        opcode: i.opcode,
        field: "opr2",
    })
}

fn sole(i: &Instr) -> Result<&str> {
    if i.oprnum != 1 {
        return Err(GenError::MissingField {
            opcode: i.opcode,
            field: "operand",
        });
    }
    Ok(&i.operand)
}

fn bit_index(i: &Instr) -> Result<&str> {
    let bit = first(i)?;
    match bit.parse::<u8>() {
        Ok(n) if n < 8 => Ok(bit),
        _ => Err(GenError::Literal {
            opcode: i.opcode,
            literal: bit.to_string(),
        }),
    }
}

/// `38H` -> `0x38`
fn restart_target(i: &Instr) -> Result<String> {
    let dst = sole(i)?;
    match dst.strip_suffix(['H', 'h']) {
        Some(hex) if !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
            Ok(format!("0x{hex}"))
        }
        _ => Err(GenError::Literal {
            opcode: i.opcode,
            literal: dst.to_string(),
        }),
    }
}

/// Statements for a defined, non-excluded opcode.
pub fn statements(i: &Instr) -> Result<Vec<String>> {
    let opcode = i.opcode;
    let op = i.opname.as_str();
    let x = |token: &str| operand::translate(opcode, token);
    let category = Category::of(op).ok_or_else(|| GenError::UnknownCategory {
        opcode,
        opname: i.opname.clone(),
    })?;

    let mut cond = None;
    let line = match category {
        Category::Load => format!("{} = {};", x(first(i)?)?, x(second(i)?)?),
        Category::Arith => {
            let dst = x(first(i)?)?;
            format!("{dst} = {op}({dst}, {});", x(second(i)?)?)
        }
        Category::Unary => {
            let v = x(sole(i)?)?;
            format!("{v} = {op}({v});")
        }
        Category::BitMutate => {
            let v = x(second(i)?)?;
            format!("{v} = {op}({}, {v});", bit_index(i)?)
        }
        Category::BitTest => format!("{op}({}, {});", bit_index(i)?, x(second(i)?)?),
        Category::Control => format!("{op}();"),
        Category::Jump => {
            if i.oprnum == 2 {
                cond = Some(first(i)?);
                format!("{op}({});", x(second(i)?)?)
            } else {
                format!("{op}({});", x(sole(i)?)?)
            }
        }
        Category::Return => {
            if !i.operand.is_empty() {
                cond = Some(i.operand.as_str());
            }
            format!("{op}();")
        }
        Category::Stack => format!("{op}({});", x(sole(i)?)?),
        Category::Restart => format!("{op}({});", restart_target(i)?),
        Category::Compare => format!("{op}({}, {});", x(first(i)?)?, x(second(i)?)?),
    };

    let timing_err = |reason: &'static str| GenError::Timing {
        opcode,
        time: i.time.clone(),
        reason,
    };
    match (cond, Timing::parse(opcode, &i.time)?) {
        (None, Timing::Fixed(n)) => Ok(vec![line, format!("clocks = {n};")]),
        (Some(c), Timing::Branch { taken, not_taken }) => {
            let pred = operand::condition(opcode, c)?;
            Ok(vec![
                format!("if ({pred})"),
                "{".to_string(),
                format!("  {line}"),
                format!("  clocks = {taken};"),
                "}".to_string(),
                "else".to_string(),
                format!("  clocks = {not_taken};"),
            ])
        }
        (Some(_), Timing::Fixed(_)) => {
            Err(timing_err("conditional transfer needs a taken/not-taken cost"))
        }
        (None, Timing::Branch { .. }) => {
            Err(timing_err("split cost on an unconditional instruction"))
        }
    }
}
