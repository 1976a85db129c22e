//! Symbol names, include guards and output paths.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::Dialect;
use crate::error::EncodeError;

/// Suffix of the per-layer logic array symbol.
pub const LOGIC_SUFFIX: &str = "_logic";

/// Drop everything that is not an ASCII letter or digit.
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// `MAP_<BASE>_H` for the given output base name.
pub fn include_guard(base: &str) -> String {
    format!("MAP_{}_H", sanitize(base).to_uppercase())
}

/// C symbol for a layer name.
pub fn symbol(raw: &str) -> Result<String, EncodeError> {
    let name = sanitize(raw);
    match name.chars().next() {
        Some(c) if !c.is_ascii_digit() => Ok(name),
        _ => Err(EncodeError::InvalidSymbol {
            raw: raw.to_string(),
        }),
    }
}

/// Tracks every emitted symbol so two arrays never share a name.
#[derive(Debug, Default)]
pub struct SymbolTable {
    seen: HashSet<String>,
}

impl SymbolTable {
    pub fn claim(&mut self, symbol: String) -> Result<String, EncodeError> {
        if !self.seen.insert(symbol.clone()) {
            return Err(EncodeError::DuplicateSymbol { symbol });
        }
        Ok(symbol)
    }
}

/// Data file and header paths for an output base path.
///
/// The dialect's extension is appended unless the base already ends with it.
pub fn output_files(base: &Path, dialect: Dialect) -> (PathBuf, PathBuf) {
    let ext = dialect.extension();
    let has_ext = base
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext));

    let data = if has_ext {
        base.to_path_buf()
    } else {
        let mut s = base.as_os_str().to_owned();
        s.push(".");
        s.push(ext);
        PathBuf::from(s)
    };
    let header = data.with_extension("h");
    (data, header)
}

/// File name up to its first dot; feeds the include guard.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or_default()
        .to_string()
}
