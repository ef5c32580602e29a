use std::path::{Component, Path};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::*;
use walkdir::WalkDir;

use crate::errors::*;
use super::matcher::{EntryMatcher, RequiredTracker};
use super::schema::HeaderSchema;

/// Walks an unpacked artifact header and checks it against a schema.
///
/// Every call is an independent pass with its own [`RequiredTracker`], so one
/// validator may be shared between threads.
pub struct HeaderStructureValidator<'s> {
    matcher: EntryMatcher<'s>,
    cancelled: Option<Arc<AtomicBool>>,
}

impl HeaderStructureValidator<'static> {
    pub fn new() -> HeaderStructureValidator<'static> {
        return HeaderStructureValidator::with_schema(HeaderSchema::standard());
    }
}

impl Default for HeaderStructureValidator<'static> {
    fn default() -> Self {
        return HeaderStructureValidator::new();
    }
}

impl<'s> HeaderStructureValidator<'s> {
    pub fn with_schema(schema: &'s HeaderSchema) -> HeaderStructureValidator<'s> {
        return HeaderStructureValidator {
            matcher: EntryMatcher::new(schema),
            cancelled: None,
        };
    }

    /// Stops any running walk before its next entry once `flag` is set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> HeaderStructureValidator<'s> {
        self.cancelled = Some(flag);
        return self;
    }

    pub fn check_header_structure<P: AsRef<Path>>(&self, header_dir: P) -> Result<()> {
        let root = header_dir.as_ref();
        let mut required = RequiredTracker::new(self.matcher.schema());

        debug!("Checking header structure of {:?}", root);
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()));

        for entry in walker {
            if self.is_cancelled() {
                bail!(ErrorKind::Cancelled);
            }
            let entry = entry
                .chain_err(|| ErrorKind::TraversalFailure(format!("Could not read entry below {:?}", root)))?;
            let is_dir = entry.file_type().is_dir();

            let result = relative_pattern(root, entry.path(), is_dir)
                .and_then(|path| self.matcher.resolve(&path, is_dir, &mut required));
            if let Err(e) = result {
                error!("unsupported element in artifact header: {:?} (is dir: {})", entry.path(), is_dir);
                return Err(e);
            }
            debug!("Accepted {:?} (is dir: {})", entry.path(), is_dir);
        }

        if let Some(pattern) = required.first_missing() {
            error!("missing element in artifact header: {}", pattern);
            bail!(ErrorKind::MissingRequiredElement(pattern.to_string()));
        }

        debug!("Header structure of {:?} is valid", root);
        return Ok(());
    }

    fn is_cancelled(&self) -> bool {
        return match &self.cancelled {
            Some(flag) => flag.load(Ordering::SeqCst),
            None => false,
        };
    }
}

/// Turns a walked path into the `/` separated form used by schema patterns.
/// The root itself becomes `.`; names that are not valid UTF-8 are never
/// accepted.
fn relative_pattern(root: &Path, path: &Path, is_dir: bool) -> Result<String> {
    let unsupported = || ErrorKind::UnsupportedElement(path.to_string_lossy().into_owned(), is_dir);

    let relative = path.strip_prefix(root)
        .chain_err(|| ErrorKind::TraversalFailure(format!("{:?} is outside of {:?}", path, root)))?;

    let mut segments: Vec<&str> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_str().ok_or_else(unsupported)?),
            _ => bail!(unsupported()),
        }
    }

    if segments.is_empty() {
        return Ok(String::from("."));
    }
    return Ok(segments.join("/"));
}
