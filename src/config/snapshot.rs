//! Local override file loaded once per process.
//!
//! The override file is a convenience for local runs: `KEY=value` lines,
//! `#` comments, optional double quotes around values. Anything the parser
//! does not understand is skipped, and a missing or unreadable file produces
//! an empty snapshot rather than an error.

use std::collections::BTreeMap;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

/// Default override file name, resolved against the current directory.
pub const DEFAULT_OVERRIDE_FILE: &str = ".env";

/// Immutable key/value pairs read from the override file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    entries: BTreeMap<String, String>,
}

impl EnvironmentSnapshot {
    /// Returns a snapshot with no entries.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Loads `.env` from the current directory.
    #[must_use]
    pub fn load_default() -> Self {
        Self::load(Utf8Path::new(DEFAULT_OVERRIDE_FILE))
    }

    /// Loads the override file at `path`.
    ///
    /// Never fails: an absent, unreadable, or non-UTF-8 file yields an empty
    /// snapshot.
    #[must_use]
    pub fn load(path: &Utf8Path) -> Self {
        match read_override_file(path) {
            Ok(contents) => {
                let snapshot = Self::parse(&contents);
                tracing::debug!(
                    "loaded {} override entries from '{path}'",
                    snapshot.len()
                );
                snapshot
            }
            Err(error) => {
                tracing::debug!("override file '{path}' not loaded: {error}");
                Self::empty()
            }
        }
    }

    /// Parses override file contents.
    #[must_use]
    pub fn parse(contents: &str) -> Self {
        let entries = contents.lines().filter_map(parse_line).collect();
        Self { entries }
    }

    /// Returns the raw value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EnvironmentSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self { entries }
    }
}

fn read_override_file(path: &Utf8Path) -> std::io::Result<String> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("override path '{path}' has no file name"),
        )
    })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(file_name)
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (raw_key, raw_value) = trimmed.split_once('=')?;
    let key = raw_key.trim();
    if key.is_empty() {
        return None;
    }

    let value = raw_value.trim();
    let unquoted = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(value);

    Some((key.to_owned(), unquoted.to_owned()))
}
