//! Pipeline: load -> normalize -> generate the three blocks -> splice them into
//! one read of the pristine template -> commit the result atomically.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Anchors, GenConfig};
use crate::emit::{case_table, disas_table, length_table};
use crate::error::{GenError, Result};
use crate::format::OpcodeSet;
use crate::normalize::{normalize, Instr};
use crate::splice::splice_all;
use crate::table::load_table;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub defined: usize,
    pub undefined: usize,
    pub excluded: usize,
    pub cases: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocks {
    pub lengths: Vec<String>,
    pub disas: Vec<String>,
    pub cases: Vec<String>,
}

pub fn load_normalized(path: &Path) -> Result<Vec<Instr>> {
    normalize(load_table(path)?)
}

/// Generate all three blocks; no block depends on another.
pub fn generate(set: &[Instr], excluded: &OpcodeSet) -> Result<(Blocks, Report)> {
    let lengths = length_table(set);
    let disas = disas_table(set);
    let cases = case_table(set, excluded)?;

    let undefined = set.iter().filter(|i| i.is_undef()).count();
    let skipped = set.iter().filter(|i| excluded.contains(i.opcode)).count();
    let report = Report {
        defined: set.len() - undefined,
        undefined,
        excluded: skipped,
        cases: cases.iter().filter(|l| l.starts_with("case ")).count(),
    };
    debug!(?report, "generated blocks");
    Ok((
        Blocks {
            lengths,
            disas,
            cases,
        },
        report,
    ))
}

pub fn render(template: &str, set: &[Instr], anchors: &Anchors) -> Result<(String, Report)> {
    let (blocks, report) = generate(set, &OpcodeSet::excluded())?;
    let doc = splice_all(
        template,
        &[
            (anchors.lengths.as_str(), blocks.lengths),
            (anchors.disas.as_str(), blocks.disas),
            (anchors.cases.as_str(), blocks.cases),
        ],
    )?;
    Ok((doc, report))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write to a sibling file and rename it over `path`.
pub fn commit(path: &Path, contents: &str) -> Result<()> {
    let staged = staging_path(path);
    if let Err(source) = fs::write(&staged, contents) {
        let _ = fs::remove_file(&staged);
        return Err(GenError::Io { path: staged, source });
    }
    fs::rename(&staged, path).map_err(|source| {
        warn!(staged = %staged.display(), "rename failed, removing staged output");
        let _ = fs::remove_file(&staged);
        GenError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

pub fn run(cfg: &GenConfig) -> Result<Report> {
    cfg.validate()?;
    let set = load_normalized(&cfg.table)?;
    let template = fs::read_to_string(&cfg.template).map_err(GenError::io(&cfg.template))?;
    let (doc, report) = render(&template, &set, &cfg.anchors)?;
    commit(&cfg.output, &doc)?;
    info!(
        output = %cfg.output.display(),
        defined = report.defined,
        undefined = report.undefined,
        excluded = report.excluded,
        cases = report.cases,
        "wrote dispatch source"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_is_a_sibling() {
        let p = staging_path(Path::new("/tmp/x/instruction-set.cpp"));
        assert_eq!(p, Path::new("/tmp/x/instruction-set.cpp.tmp"));
    }

    #[test]
    fn commit_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.cpp");
        fs::write(&out, "old").unwrap();
        commit(&out, "new").unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "new");
        assert!(!staging_path(&out).exists());
    }

    #[test]
    fn commit_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nope").join("out.cpp");
        assert!(matches!(commit(&out, "x"), Err(GenError::Io { .. })));
    }
}
