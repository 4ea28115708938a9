//! Template splicing.
//!
//! An anchor is a marker comment on a line of its own. Splicing replaces that
//! whole line with the generated block, each line indented like the marker.

use tracing::debug;

use crate::error::{GenError, Result};

/// A template split around one anchor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor<'a> {
    /// Everything before the anchor line, without its final line break.
    pub before: &'a str,
    /// Everything after the anchor line's line break.
    pub after: &'a str,
    pub indent: &'a str,
}

pub fn find_anchor<'a>(doc: &'a str, marker: &str) -> Result<Anchor<'a>> {
    let begin = doc.find(marker).ok_or_else(|| GenError::AnchorNotFound {
        anchor: marker.to_string(),
    })?;
    if doc[begin + marker.len()..].contains(marker) {
        return Err(GenError::DuplicateAnchor {
            anchor: marker.to_string(),
        });
    }
    let line_start = doc[..begin].rfind('\n').map_or(0, |p| p + 1);
    let after = match doc[begin..].find('\n') {
        Some(p) => &doc[begin + p + 1..],
        None => "",
    };
    Ok(Anchor {
        before: &doc[..line_start.saturating_sub(1)],
        after,
        indent: &doc[line_start..begin],
    })
}

/// Replace the line holding `marker` with `lines`.
pub fn splice<S: AsRef<str>>(doc: &str, marker: &str, lines: &[S]) -> Result<String> {
    let Anchor {
        before,
        after,
        indent,
    } = find_anchor(doc, marker)?;
    let mut out = String::with_capacity(doc.len() + lines.len() * (indent.len() + 32));
    out.push_str(before);
    for line in lines {
        let line = line.as_ref();
        out.push('\n');
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
    }
    out.push('\n');
    out.push_str(after);
    debug!(anchor = marker, lines = lines.len(), "spliced");
    Ok(out)
}

/// Splice every `(marker, block)` pair into one copy of `template`.
///
/// All markers are located in the pristine template first, so a missing or
/// repeated anchor fails before anything is substituted.
pub fn splice_all(template: &str, blocks: &[(&str, Vec<String>)]) -> Result<String> {
    for (marker, _) in blocks {
        find_anchor(template, marker)?;
    }
    let mut doc = template.to_string();
    for (marker, lines) in blocks {
        doc = splice(&doc, marker, lines)?;
    }
    Ok(doc)
}
