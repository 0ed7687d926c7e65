use serde::{Deserialize, Serialize};

use crate::domain::errors::ConfigError;

/// Storage class of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FileType {
    #[default]
    Standard,
    InfrequentAccess,
    Archive,
    DeepArchive,
}

impl From<FileType> for u8 {
    fn from(value: FileType) -> Self {
        match value {
            FileType::Standard => 0,
            FileType::InfrequentAccess => 1,
            FileType::Archive => 2,
            FileType::DeepArchive => 3,
        }
    }
}

impl TryFrom<u8> for FileType {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FileType::Standard),
            1 => Ok(FileType::InfrequentAccess),
            2 => Ok(FileType::Archive),
            3 => Ok(FileType::DeepArchive),
            other => Err(ConfigError::InvalidValue {
                field: "file type",
                value: other.to_string(),
            }),
        }
    }
}

/// Whether an object may be served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FileStatus {
    #[default]
    Enabled,
    Disabled,
}

impl From<FileStatus> for u8 {
    fn from(value: FileStatus) -> Self {
        match value {
            FileStatus::Enabled => 0,
            FileStatus::Disabled => 1,
        }
    }
}

impl TryFrom<u8> for FileStatus {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FileStatus::Enabled),
            1 => Ok(FileStatus::Disabled),
            other => Err(ConfigError::InvalidValue {
                field: "file status",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_wire_values() {
        assert_eq!(serde_json::to_string(&FileType::Archive).unwrap(), "2");
        let parsed: FileType = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, FileType::InfrequentAccess);
        assert!(serde_json::from_str::<FileType>("9").is_err());
    }

    #[test]
    fn test_file_status_wire_values() {
        assert_eq!(u8::from(FileStatus::Disabled), 1);
        assert_eq!(FileStatus::try_from(0).unwrap(), FileStatus::Enabled);
        assert!(FileStatus::try_from(2).is_err());
    }
}
