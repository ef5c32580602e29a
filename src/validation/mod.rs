mod matcher;
mod schema;
mod structure;

use std::path::Path;

use crate::errors::*;

pub use matcher::{EntryMatcher, RequiredTracker};
pub use schema::{HeaderSchema, SchemaEntry, WILDCARD};
pub use structure::HeaderStructureValidator;

/// Checks an unpacked header directory against the standard header layout.
pub fn check_header_structure<P: AsRef<Path>>(header_dir: P) -> Result<()> {
    return HeaderStructureValidator::new().check_header_structure(header_dir);
}
