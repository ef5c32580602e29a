use std::collections::BTreeMap;

use crate::errors::*;
use super::schema::{HeaderSchema, SchemaEntry, WILDCARD};

/// Satisfaction state of the required schema entries during one pass.
#[derive(Debug)]
pub struct RequiredTracker {
    satisfied: BTreeMap<&'static str, bool>,
}

impl RequiredTracker {
    pub fn new(schema: &HeaderSchema) -> RequiredTracker {
        let satisfied = schema.required()
            .map(|entry| (entry.pattern, false))
            .collect();
        return RequiredTracker { satisfied };
    }

    pub fn mark(&mut self, pattern: &'static str) {
        self.satisfied.insert(pattern, true);
    }

    pub fn is_satisfied(&self, pattern: &str) -> bool {
        return self.satisfied.get(pattern).copied().unwrap_or(false);
    }

    /// First required pattern (in lexical order) that has not been seen yet.
    pub fn first_missing(&self) -> Option<&'static str> {
        return self.satisfied.iter()
            .find(|(_, satisfied)| !**satisfied)
            .map(|(pattern, _)| *pattern);
    }
}

/// Resolves observed header entries against a [`HeaderSchema`].
#[derive(Debug, Clone, Copy)]
pub struct EntryMatcher<'s> {
    schema: &'s HeaderSchema,
}

impl<'s> EntryMatcher<'s> {
    pub fn new(schema: &'s HeaderSchema) -> EntryMatcher<'s> {
        return EntryMatcher { schema };
    }

    pub fn schema(&self) -> &'s HeaderSchema {
        return self.schema;
    }

    /// Matches `relative_path` either directly or, failing that, through the
    /// wildcard of its parent directory. Only file names are user defined,
    /// so a single fallback is all that is ever attempted.
    pub fn resolve(&self, relative_path: &str, is_dir: bool, required: &mut RequiredTracker) -> Result<()> {
        let entry = self.lookup(relative_path)
            .ok_or_else(|| ErrorKind::UnsupportedElement(relative_path.to_string(), is_dir))?;

        if entry.is_dir != is_dir {
            bail!(ErrorKind::InvalidElementKind(relative_path.to_string(), entry.is_dir));
        }

        if entry.required {
            required.mark(entry.pattern);
        }
        return Ok(());
    }

    fn lookup(&self, relative_path: &str) -> Option<&'static SchemaEntry> {
        let mut candidate = relative_path.to_string();
        loop {
            if let Some(entry) = self.schema.get(&candidate) {
                return Some(entry);
            }
            candidate = match split_path(&candidate) {
                (_, WILDCARD) => return None,
                (None, _) => WILDCARD.to_string(),
                (Some(parent), _) => format!("{}/{}", parent, WILDCARD),
            };
        }
    }
}

fn split_path(path: &str) -> (Option<&str>, &str) {
    return match path.rfind('/') {
        Some(index) => (Some(&path[..index]), &path[index + 1..]),
        None => (None, path),
    };
}
