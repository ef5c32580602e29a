//! Validation of unpacked software update artifact headers.
//!
//! An artifact header is checked in two independent steps: its directory
//! layout against a fixed [`HeaderSchema`](validation::HeaderSchema), and
//! its descriptor records against their field presence rules.

#[macro_use]
extern crate error_chain;

pub mod errors;
pub mod descriptor;
pub mod validation;
mod header;

pub use descriptor::{Files, HeaderInfo, Info, Metadata, TypeInfo, Validate};
pub use header::{check_header, HeaderDescriptors};
pub use validation::{check_header_structure, HeaderSchema, HeaderStructureValidator, SchemaEntry};
