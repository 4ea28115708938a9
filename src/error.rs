use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(thiserror::Error, Debug)]
pub enum GenError {
    #[error("Malformed instruction table: {reason}")]
    MalformedTable { reason: String },
    #[error("Table inconsistent at opcode {opcode:#x}: {reason}")]
    Invariant { opcode: u16, reason: String },
    #[error("Opcode {opcode:#x} is missing field `{field}`")]
    MissingField { opcode: u16, field: &'static str },
    #[error("Unknown operand `{token}` at opcode {opcode:#x}")]
    UnknownOperand { opcode: u16, token: String },
    #[error("Unknown condition `{token}` at opcode {opcode:#x}")]
    UnknownCondition { opcode: u16, token: String },
    #[error("Unknown mnemonic category `{opname}` at opcode {opcode:#x}")]
    UnknownCategory { opcode: u16, opname: String },
    #[error("Bad timing `{time}` at opcode {opcode:#x}: {reason}")]
    Timing {
        opcode: u16,
        time: String,
        reason: &'static str,
    },
    #[error("Bad literal `{literal}` at opcode {opcode:#x}")]
    Literal { opcode: u16, literal: String },
    #[error("Anchor `{anchor}` not found in template")]
    AnchorNotFound { anchor: String },
    #[error("Anchor `{anchor}` appears more than once in template")]
    DuplicateAnchor { anchor: String },
    #[error("Config error: {0}")]
    Config(String),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> GenError {
        let path = path.into();
        move |source| GenError::Io { path, source }
    }
}
