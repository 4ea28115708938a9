use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

/// Marker comments the template carries, one per generated block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Anchors {
    pub lengths: String,
    pub disas: String,
    pub cases: String,
}

impl Default for Anchors {
    fn default() -> Self {
        Self {
            lengths: "/*--- The data will go here ---*/".to_string(),
            disas: "/*--- The disas will go here ---*/".to_string(),
            cases: "/*--- More cases will go here ---*/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    pub table: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
    pub anchors: Anchors,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            table: PathBuf::from("instruction-data.json"),
            template: PathBuf::from("instruction-set-draft.cpp"),
            output: PathBuf::from("instruction-set.cpp"),
            anchors: Anchors::default(),
        }
    }
}

impl GenConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(GenError::io(path))?;
        let cfg: Self = serde_json::from_str(&text)
            .map_err(|e| GenError::Config(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Anchors must be non-empty and pairwise distinct.
    pub fn validate(&self) -> Result<()> {
        let a = &self.anchors;
        let all = [&a.lengths, &a.disas, &a.cases];
        if all.iter().any(|m| m.is_empty()) {
            return Err(GenError::Config("empty anchor marker".to_string()));
        }
        if a.lengths == a.disas || a.lengths == a.cases || a.disas == a.cases {
            return Err(GenError::Config("anchor markers must be distinct".to_string()));
        }
        Ok(())
    }
}
