use std::path::Path;

use log::*;

use crate::descriptor::{self, Files, Metadata, TypeInfo, Validate};
use crate::errors::*;
use crate::validation::HeaderStructureValidator;

const FILES_FILE_NAME: &str = "files";
const TYPE_INFO_FILE_NAME: &str = "type-info";
const META_DATA_FILE_NAME: &str = "meta-data";

/// Descriptor records stored inside an unpacked header.
#[derive(Debug, Clone)]
pub struct HeaderDescriptors {
    pub files: Option<Files>,
    pub type_info: TypeInfo,
    pub metadata: Metadata,
}

impl HeaderDescriptors {
    /// Reads the descriptors of `header_dir`; `files` is optional.
    pub fn load<P: AsRef<Path>>(header_dir: P) -> Result<HeaderDescriptors> {
        let header_dir = header_dir.as_ref();

        let files_path = header_dir.join(FILES_FILE_NAME);
        let files = if files_path.is_file() {
            Some(descriptor::load(&files_path)?)
        } else {
            None
        };

        return Ok(HeaderDescriptors {
            files,
            type_info: descriptor::load(header_dir.join(TYPE_INFO_FILE_NAME))?,
            metadata: descriptor::load(header_dir.join(META_DATA_FILE_NAME))?,
        });
    }
}

impl Validate for HeaderDescriptors {
    fn validate(&self) -> Result<()> {
        if let Some(files) = &self.files {
            files.validate()?;
        }
        self.type_info.validate()?;
        self.metadata.validate()?;
        return Ok(());
    }
}

/// Checks the layout of `header_dir` and then the descriptors inside it.
pub fn check_header<P: AsRef<Path>>(validator: &HeaderStructureValidator, header_dir: P) -> Result<HeaderDescriptors> {
    let header_dir = header_dir.as_ref();
    validator.check_header_structure(header_dir)?;

    let descriptors = HeaderDescriptors::load(header_dir)?;
    descriptors.validate()?;

    info!("Artifact header {:?} is valid (rootfs: {}, device type: {})",
          header_dir,
          descriptors.type_info.rootfs,
          descriptors.metadata.device_type().unwrap_or("-"));
    return Ok(descriptors);
}
