pub mod config;
pub mod driver;
pub mod emit;
pub mod error;
pub mod format;
pub mod normalize;
pub mod operand;
pub mod splice;
pub mod table;

pub use config::{Anchors, GenConfig};
pub use driver::{render, run, Report};
pub use error::{GenError, Result};
pub use format::{Category, OpcodeSet, Timing};
pub use normalize::{Instr, UNDEF};
