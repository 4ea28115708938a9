//! Operand and condition symbol tables.
//!
//! Both tables are closed: a token missing here means the opcode table grew
//! an addressing form the generator does not know, so lookups fail hard.

use crate::error::{GenError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Reg8,
    Reg16,
    Imm8,
    Imm16,
    Mem,
}

#[derive(Debug, Clone, Copy)]
pub struct OperandDesc {
    pub token: &'static str,
    pub expr: &'static str,
    pub kind: OperandKind,
}

const fn op(token: &'static str, expr: &'static str, kind: OperandKind) -> OperandDesc {
    OperandDesc { token, expr, kind }
}

pub const OPERANDS: &[OperandDesc] = &[
    op("A", "reg.a()", OperandKind::Reg8),
    op("F", "reg.f()", OperandKind::Reg8),
    op("B", "reg.b()", OperandKind::Reg8),
    op("C", "reg.c()", OperandKind::Reg8),
    op("D", "reg.d()", OperandKind::Reg8),
    op("E", "reg.e()", OperandKind::Reg8),
    op("H", "reg.h()", OperandKind::Reg8),
    op("L", "reg.l()", OperandKind::Reg8),
    op("AF", "reg.af()", OperandKind::Reg16),
    op("BC", "reg.bc()", OperandKind::Reg16),
    op("DE", "reg.de()", OperandKind::Reg16),
    op("HL", "reg.hl()", OperandKind::Reg16),
    op("SP", "reg.sp()", OperandKind::Reg16),
    op("PC", "reg.pc()", OperandKind::Reg16),
    op("d8", "opr8", OperandKind::Imm8),
    op("r8", "opr8", OperandKind::Imm8),
    op("d16", "opr16", OperandKind::Imm16),
    op("a16", "opr16", OperandKind::Imm16),
    op("(HL)", "mem_ref(reg.hl())", OperandKind::Mem),
    // post-increment/decrement happens once, inside the reference
    op("(HL+)", "mem_ref(reg.hl()++)", OperandKind::Mem),
    op("(HL-)", "mem_ref(reg.hl()--)", OperandKind::Mem),
    op("(BC)", "mem_ref(reg.bc())", OperandKind::Mem),
    op("(DE)", "mem_ref(reg.de())", OperandKind::Mem),
    op("(a16)", "mem_ref(opr16)", OperandKind::Mem),
    op("(a8)", "mem_ref(0xff00 + opr8)", OperandKind::Mem),
    op("(C)", "mem_ref(0xff00 + reg.c())", OperandKind::Mem),
];

/// Flag predicates guarding conditional jumps, calls and returns.
pub const CONDITIONS: &[(&str, &str)] = &[
    ("NZ", "NZ()"),
    ("Z", "Z()"),
    ("NC", "NC()"),
    ("C", "C()"),
];

pub fn lookup(token: &str) -> Option<&'static OperandDesc> {
    OPERANDS.iter().find(|d| d.token == token)
}

/// Target expression for an operand token of `opcode`.
pub fn translate(opcode: u16, token: &str) -> Result<&'static str> {
    lookup(token).map(|d| d.expr).ok_or_else(|| GenError::UnknownOperand {
        opcode,
        token: token.to_string(),
    })
}

pub fn condition(opcode: u16, token: &str) -> Result<&'static str> {
    CONDITIONS
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, pred)| *pred)
        .ok_or_else(|| GenError::UnknownCondition {
            opcode,
            token: token.to_string(),
        })
}
