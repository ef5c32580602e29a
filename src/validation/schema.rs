use std::collections::BTreeSet;

use crate::errors::*;

/// Marker for a user defined file name directly below a fixed directory.
pub const WILDCARD: &str = "*";

/// One expected path of an artifact header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaEntry {
    pub pattern: &'static str,
    pub is_dir: bool,
    pub required: bool,
}

impl SchemaEntry {
    pub const fn dir(pattern: &'static str, required: bool) -> SchemaEntry {
        return SchemaEntry { pattern, is_dir: true, required };
    }

    pub const fn file(pattern: &'static str, required: bool) -> SchemaEntry {
        return SchemaEntry { pattern, is_dir: false, required };
    }

    pub fn is_wildcard(&self) -> bool {
        self.pattern == WILDCARD || self.pattern.ends_with("/*")
    }
}

// the root directory is reported by the walk as `.`
const STANDARD_ENTRIES: &[SchemaEntry] = &[
    SchemaEntry::dir(".", false),
    SchemaEntry::file("files", false),
    SchemaEntry::file("meta-data", true),
    SchemaEntry::file("type-info", true),
    SchemaEntry::dir("checksums", false),
    SchemaEntry::file("checksums/*", false),
    SchemaEntry::dir("signatures", true),
    SchemaEntry::file("signatures/*", true),
    SchemaEntry::dir("scripts", false),
    SchemaEntry::dir("scripts/pre", false),
    SchemaEntry::file("scripts/pre/*", false),
    SchemaEntry::dir("scripts/post", false),
    SchemaEntry::file("scripts/post/*", false),
    SchemaEntry::dir("scripts/check", false),
    SchemaEntry::file("scripts/check/*", false),
];

static STANDARD: HeaderSchema = HeaderSchema { entries: STANDARD_ENTRIES };

/// Immutable table of the paths an unpacked artifact header may contain.
///
/// Patterns are normalized, root relative and `/` separated. A pattern ending
/// in `*` accepts any single file name directly under its parent; wildcards
/// never nest, so user defined names are allowed on exactly one level.
#[derive(Debug, Clone, Copy)]
pub struct HeaderSchema {
    entries: &'static [SchemaEntry],
}

impl HeaderSchema {
    /// The canonical artifact header layout.
    pub fn standard() -> &'static HeaderSchema {
        return &STANDARD;
    }

    /// Builds a schema from a custom table after checking its patterns.
    pub fn new(entries: &'static [SchemaEntry]) -> Result<HeaderSchema> {
        let mut seen = BTreeSet::new();
        for entry in entries {
            check_pattern(entry.pattern)?;
            if !seen.insert(entry.pattern) {
                bail!(ErrorKind::InvalidSchema(format!("duplicate pattern {:?}", entry.pattern)));
            }
        }
        return Ok(HeaderSchema { entries });
    }

    pub fn get(&self, pattern: &str) -> Option<&'static SchemaEntry> {
        let entries: &'static [SchemaEntry] = self.entries;
        return entries.iter().find(|entry| entry.pattern == pattern);
    }

    pub fn entries(&self) -> &'static [SchemaEntry] {
        return self.entries;
    }

    pub fn required(&self) -> impl Iterator<Item = &'static SchemaEntry> {
        let entries: &'static [SchemaEntry] = self.entries;
        return entries.iter().filter(|entry| entry.required);
    }
}

impl Default for HeaderSchema {
    fn default() -> HeaderSchema {
        return STANDARD;
    }
}

fn check_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        bail!(ErrorKind::InvalidSchema(String::from("empty pattern")));
    }
    if pattern == "." {
        return Ok(());
    }
    let segments: Vec<&str> = pattern.split('/').collect();
    let last = segments.len() - 1;
    for (index, segment) in segments.iter().enumerate() {
        match *segment {
            "" | "." | ".." => {
                bail!(ErrorKind::InvalidSchema(format!("pattern {:?} is not a normalized relative path", pattern)));
            }
            WILDCARD if index != last => {
                bail!(ErrorKind::InvalidSchema(format!("pattern {:?} nests a wildcard below another one", pattern)));
            }
            _ => {}
        }
    }
    return Ok(());
}
