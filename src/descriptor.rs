use std::fs;
use std::path::Path;

use log::*;
use serde::de::DeserializeOwned;
use serde_derive::*;
use serde_json::{Map, Value};

use crate::errors::*;

/// Field presence check of a parsed descriptor record.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn parse<T: DeserializeOwned>(content: &str) -> Result<T> {
    return serde_json::from_str(content).map_err(|e| {
        error!("JSON is invalid:\n{}", content);
        ErrorKind::InvalidJSON(e.to_string()).into()
    });
}

pub fn load<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    debug!("Reading descriptor {:?}", path);
    let content = fs::read_to_string(path)
        .chain_err(|| ErrorKind::ReadError(format!("Could not read descriptor {:?}", path)))?;
    return parse(&content);
}

// a missing or null field is left empty for `validate` to report
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
    where D: serde::Deserializer<'de>,
          T: serde::Deserialize<'de> + Default {
    return <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Option::unwrap_or_default);
}

fn invalid(descriptor: &'static str, msg: &str) -> Error {
    return ErrorKind::InvalidDescriptor(descriptor, msg.to_string()).into();
}

/// Artifact format and version.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Info {
    #[serde(default, deserialize_with = "null_as_default")]
    pub format: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: i64,
}

impl Validate for Info {
    fn validate(&self) -> Result<()> {
        if self.format.is_empty() {
            return Err(invalid("info", "format is missing"));
        }
        if self.version == 0 {
            return Err(invalid("info", "version is missing"));
        }
        return Ok(());
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateType {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub update_type: String,
}

/// Update types carried by the artifact.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub updates: Vec<UpdateType>,
}

impl Validate for HeaderInfo {
    fn validate(&self) -> Result<()> {
        if self.updates.is_empty() {
            return Err(invalid("header-info", "no updates listed"));
        }
        if self.updates.iter().any(|update| update.update_type.is_empty()) {
            return Err(invalid("header-info", "update without type"));
        }
        return Ok(());
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rootfs: String,
}

impl Validate for TypeInfo {
    fn validate(&self) -> Result<()> {
        if self.rootfs.is_empty() {
            return Err(invalid("type-info", "rootfs type is missing"));
        }
        return Ok(());
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateFile {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Names of the update files shipped with the artifact.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Files {
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<UpdateFile>,
}

impl Validate for Files {
    fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(invalid("files", "no files listed"));
        }
        if self.files.iter().any(|file| file.name.is_empty()) {
            return Err(invalid("files", "file without name"));
        }
        return Ok(());
    }
}

pub const DEVICE_TYPE: &str = "DeviceType";
pub const IMAGE_ID: &str = "ImageID";

/// Device specific key/value metadata.
///
/// Any keys and value types are accepted as long as `DeviceType` and
/// `ImageID` are present and no top level value is `null`. A JSON `null`
/// document leaves the metadata uninitialized.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Metadata {
    data: Option<Map<String, Value>>,
}

impl Metadata {
    pub fn new(data: Map<String, Value>) -> Metadata {
        return Metadata { data: Some(data) };
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        return self.data.as_ref().and_then(|data| data.get(key));
    }

    pub fn device_type(&self) -> Option<&str> {
        return self.get(DEVICE_TYPE).and_then(Value::as_str);
    }

    pub fn image_id(&self) -> Option<&str> {
        return self.get(IMAGE_ID).and_then(Value::as_str);
    }
}

impl Validate for Metadata {
    fn validate(&self) -> Result<()> {
        let data = match &self.data {
            Some(data) => data,
            None => return Err(invalid("meta-data", "metadata is empty")),
        };
        if let Some((key, _)) = data.iter().find(|(_, value)| value.is_null()) {
            return Err(ErrorKind::InvalidDescriptor("meta-data", format!("{} is null", key)).into());
        }
        for key in &[DEVICE_TYPE, IMAGE_ID] {
            if !data.contains_key(*key) {
                return Err(ErrorKind::InvalidDescriptor("meta-data", format!("{} is missing", key)).into());
            }
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::{load, parse, Files, HeaderInfo, Info, Metadata, TypeInfo, UpdateType, Validate};
    use crate::errors::ErrorKind;

    #[test]
    fn test_info() {
        let missing_format = Info { format: String::from(""), version: 1 };
        let missing_version = Info { format: String::from("mender"), version: 0 };
        let valid = Info { format: String::from("mender"), version: 1 };

        assert_eq!(false, missing_format.validate().is_ok());
        assert_eq!(false, missing_version.validate().is_ok());
        assert_eq!(true, valid.validate().is_ok());
    }

    #[test]
    fn test_header_info() {
        let empty = HeaderInfo { updates: vec![] };
        let untyped = HeaderInfo { updates: vec![UpdateType::default()] };
        let valid: HeaderInfo = parse(r#"{"updates": [{"type": "rootfs-image"}]}"#).unwrap();

        assert_eq!(false, empty.validate().is_ok());
        assert_eq!(false, untyped.validate().is_ok());
        assert_eq!(true, valid.validate().is_ok());
        assert_eq!("rootfs-image", valid.updates[0].update_type);
    }

    #[test]
    fn test_type_info() {
        let empty = TypeInfo { rootfs: String::new() };
        let valid: TypeInfo = parse(r#"{"rootfs": "ext4"}"#).unwrap();

        assert_eq!(false, empty.validate().is_ok());
        assert_eq!(true, valid.validate().is_ok());
    }

    #[test]
    fn test_files() {
        let empty: Files = parse(r#"{"files": []}"#).unwrap();
        let unnamed: Files = parse(r#"{"files": [{"type": "rootfs.ext4"}, {"type": ""}]}"#).unwrap();
        let valid: Files = parse(r#"{"files": [{"type": "rootfs.ext4"}]}"#).unwrap();

        assert_eq!(false, empty.validate().is_ok());
        assert_eq!(false, unnamed.validate().is_ok());
        assert_eq!(true, valid.validate().is_ok());
    }

    #[test]
    fn test_metadata() {
        let valid: Metadata = parse(r#"{"DeviceType": "beaglebone", "ImageID": "release-1", "Extra": [1, 2]}"#).unwrap();
        let no_image: Metadata = parse(r#"{"DeviceType": "beaglebone"}"#).unwrap();
        let no_device: Metadata = parse(r#"{"ImageID": "release-1"}"#).unwrap();
        let null_image: Metadata = parse(r#"{"DeviceType": "beaglebone", "ImageID": null}"#).unwrap();
        let null_extra: Metadata = parse(r#"{"DeviceType": "beaglebone", "ImageID": "release-1", "Extra": null}"#).unwrap();

        assert_eq!(true, valid.validate().is_ok());
        assert_eq!(Some("beaglebone"), valid.device_type());
        assert_eq!(Some("release-1"), valid.image_id());
        assert_eq!(false, no_image.validate().is_ok());
        assert_eq!(false, no_device.validate().is_ok());
        assert_eq!(false, null_image.validate().is_ok());
        assert_eq!(false, null_extra.validate().is_ok());
    }

    #[test]
    fn test_metadata_value_types_are_free() {
        let mut data = serde_json::Map::new();
        data.insert(String::from("DeviceType"), json!(42));
        data.insert(String::from("ImageID"), json!({"build": 7}));

        assert_eq!(true, Metadata::new(data).validate().is_ok());
    }

    #[test]
    fn test_metadata_uninitialized() {
        let null: Metadata = parse("null").unwrap();

        assert_eq!(Metadata::default(), null);
        match null.validate().unwrap_err().kind() {
            ErrorKind::InvalidDescriptor(descriptor, _) => assert_eq!("meta-data", *descriptor),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_are_invalid_descriptors() {
        let no_format: Info = parse(r#"{"version": 1}"#).unwrap();
        let null_version: Info = parse(r#"{"format": "mender", "version": null}"#).unwrap();
        let no_rootfs: TypeInfo = parse("{}").unwrap();
        let null_rootfs: TypeInfo = parse(r#"{"rootfs": null}"#).unwrap();
        let null_updates: HeaderInfo = parse(r#"{"updates": null}"#).unwrap();
        let untyped_update: HeaderInfo = parse(r#"{"updates": [{}]}"#).unwrap();
        let no_files: Files = parse("{}").unwrap();
        let null_file: Files = parse(r#"{"files": [{"type": null}]}"#).unwrap();

        assert_eq!(0, null_version.version);
        assert_eq!(String::new(), no_rootfs.rootfs);

        let results = vec![
            ("info", no_format.validate()),
            ("info", null_version.validate()),
            ("type-info", no_rootfs.validate()),
            ("type-info", null_rootfs.validate()),
            ("header-info", null_updates.validate()),
            ("header-info", untyped_update.validate()),
            ("files", no_files.validate()),
            ("files", null_file.validate()),
        ];
        for (expected, result) in results {
            match result.unwrap_err().kind() {
                ErrorKind::InvalidDescriptor(descriptor, _) => assert_eq!(expected, *descriptor),
                other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_negative_version() {
        let info: Info = parse(r#"{"format": "mender", "version": -1}"#).unwrap();

        assert_eq!(true, info.validate().is_ok());
    }

    #[test]
    fn test_invalid_json() {
        match parse::<Info>(r#"{"format": "mender""#).unwrap_err().kind() {
            ErrorKind::InvalidJSON(_) => (),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(true, parse::<Metadata>("[1, 2]").is_err());
    }

    #[test]
    fn test_load() {
        let temporary_dir = tempfile::tempdir().unwrap();
        let path = temporary_dir.path().join("info");
        fs::write(&path, r#"{"format": "mender", "version": 1}"#).unwrap();

        let info: Info = load(&path).unwrap();
        assert_eq!(Info { format: String::from("mender"), version: 1 }, info);

        match load::<Info, _>(temporary_dir.path().join("missing")).unwrap_err().kind() {
            ErrorKind::ReadError(_) => (),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
