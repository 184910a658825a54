//! Mount definitions decoded from the YAML input
//!
//! Input format:
//! ```yaml
//! fstab:
//!   192.168.4.6:
//!     mount: /home
//!     export: /var/nfs/home
//!     type: nfs
//!     options: [noexec, nosuid]
//!   /dev/sda1:
//!     mount: /boot
//!     type: xfs
//! ```
//!
//! Each key under `fstab` is the mount source; its record is decoded into a
//! [`MountConfig`]. Decoding is strict about types and fails on the first
//! malformed record.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::device::resolve_device;

/// Top-level key holding the mount definitions
pub const FSTAB_SECTION: &str = "fstab";

/// Option column value used when no options are given
pub const DEFAULT_OPTIONS: &str = "defaults";

/// The whole input document. Unknown top-level keys are ignored.
#[derive(Debug, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub fstab: Option<Value>,
}

impl Document {
    /// Decode every definition in the `fstab` section, in document order
    pub fn configs(&self) -> Result<Vec<MountConfig>, ConfigError> {
        let section = self
            .fstab
            .as_ref()
            .and_then(Value::as_mapping)
            .ok_or(ConfigError::MissingSection(FSTAB_SECTION))?;
        configs_from_mapping(section)
    }
}

/// One mount definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountConfig {
    /// Host, IP address, or local device (the key in the input mapping)
    source: String,
    /// Mount point path
    mount: String,
    /// Filesystem type
    fs_type: String,
    /// Remote export path for network sources
    export: String,
    /// Mount options, in input order
    options: Vec<String>,
    backup_operation: i32,
    fs_check_order: i32,
}

impl MountConfig {
    pub fn new(
        source: impl Into<String>,
        mount: impl Into<String>,
        fs_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            mount: mount.into(),
            fs_type: fs_type.into(),
            export: String::new(),
            options: Vec::new(),
            backup_operation: 0,
            fs_check_order: 0,
        }
    }

    pub fn with_export(mut self, export: impl Into<String>) -> Self {
        self.export = export.into();
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn with_backup_operation(mut self, value: i32) -> Self {
        self.backup_operation = value;
        self
    }

    pub fn with_fs_check_order(mut self, value: i32) -> Self {
        self.fs_check_order = value;
        self
    }

    pub fn add_option(&mut self, option: impl Into<String>) {
        self.options.push(option.into());
    }

    pub fn add_options<I, S>(&mut self, options: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.extend(options.into_iter().map(Into::into));
    }

    /// Decode one raw record keyed by `source`
    ///
    /// Only `mount`, `type`, `export` and `options` are read; the dump and
    /// pass columns stay at 0. Null values count as absent.
    pub fn from_value(source: &str, value: &Value) -> Result<Self, ConfigError> {
        let record = value.as_mapping().ok_or_else(|| ConfigError::TypeMismatch {
            field: source.to_string(),
            expected: "mapping",
        })?;

        let mount = required_string(record, "mount")?;
        let export = optional_string(record, "export")?.unwrap_or_default();
        let fs_type = required_string(record, "type")?;
        let options = optional_string_list(record, "options")?.unwrap_or_default();

        Ok(Self::new(source, mount, fs_type)
            .with_export(export)
            .with_options(options))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn mount_point(&self) -> &str {
        &self.mount
    }

    pub fn fs_type(&self) -> &str {
        &self.fs_type
    }

    pub fn export(&self) -> &str {
        &self.export
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn backup_operation(&self) -> i32 {
        self.backup_operation
    }

    pub fn fs_check_order(&self) -> i32 {
        self.fs_check_order
    }

    /// Options joined with commas, or `defaults` when there are none
    pub fn options_string(&self) -> String {
        if self.options.is_empty() {
            DEFAULT_OPTIONS.to_string()
        } else {
            self.options.join(",")
        }
    }

    /// Device column for this definition (see [`resolve_device`])
    pub fn mount_device(&self) -> String {
        resolve_device(&self.source, &self.export)
    }

    /// Mount point and type are both set
    pub fn is_valid(&self) -> bool {
        !self.mount.is_empty() && !self.fs_type.is_empty()
    }
}

/// Decode a source -> record mapping, stopping at the first bad record
pub fn configs_from_mapping(mapping: &Mapping) -> Result<Vec<MountConfig>, ConfigError> {
    mapping
        .iter()
        .map(|(key, value)| {
            let source = key.as_str().ok_or_else(|| ConfigError::TypeMismatch {
                field: "source".to_string(),
                expected: "string",
            })?;
            MountConfig::from_value(source, value)
        })
        .collect()
}

fn field<'a>(record: &'a Mapping, name: &str) -> Option<&'a Value> {
    record.get(name).filter(|v| !v.is_null())
}

fn required_string(record: &Mapping, name: &'static str) -> Result<String, ConfigError> {
    optional_string(record, name)?.ok_or(ConfigError::MissingField(name))
}

fn optional_string(record: &Mapping, name: &'static str) -> Result<Option<String>, ConfigError> {
    let Some(value) = field(record, name) else {
        return Ok(None);
    };
    value
        .as_str()
        .map(|s| Some(s.to_string()))
        .ok_or_else(|| ConfigError::TypeMismatch {
            field: name.to_string(),
            expected: "string",
        })
}

fn optional_string_list(
    record: &Mapping,
    name: &'static str,
) -> Result<Option<Vec<String>>, ConfigError> {
    let Some(value) = field(record, name) else {
        return Ok(None);
    };
    let mismatch = || ConfigError::TypeMismatch {
        field: name.to_string(),
        expected: "list of strings",
    };

    let items = value.as_sequence().ok_or_else(mismatch)?;
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(mismatch))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid format for '{field}': expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("Section '{0}' not found or not a mapping")]
    MissingSection(&'static str),
}
