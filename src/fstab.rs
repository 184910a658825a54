//! Fstab entries - the lines written to /etc/fstab
//!
//! Fstab format:
//! ```text
//! # <file system>             <mount point>  <type>  <options>       <dump>  <pass>
//! 192.168.4.6:/var/nfs/home   /home          nfs     noexec,nosuid   0       0
//! /dev/sda1                   /boot          xfs     defaults        0       0
//! ```
//!
//! Fields are joined with a single space and are not escaped, so none of
//! them may contain whitespace.

use std::fmt;

use crate::config::MountConfig;
use crate::validate;

/// A single fstab line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FstabLine {
    /// Device path, UUID=, LABEL=, or host:export
    pub device: String,
    /// Mount point path (or `swap`)
    pub mount_point: String,
    /// Filesystem type (ext4, nfs, swap, etc.)
    pub fs_type: String,
    /// Mount options (comma-separated)
    pub options: String,
    /// Dump frequency (0 = no backup, 1 = backup)
    pub backup_operation: i32,
    /// Fsck pass number (0 = skip, 1 = root, 2 = other)
    pub fs_check_order: i32,
}

impl FstabLine {
    pub fn new(
        device: impl Into<String>,
        mount_point: impl Into<String>,
        fs_type: impl Into<String>,
        options: impl Into<String>,
        backup_operation: i32,
        fs_check_order: i32,
    ) -> Self {
        Self {
            device: device.into(),
            mount_point: mount_point.into(),
            fs_type: fs_type.into(),
            options: options.into(),
            backup_operation,
            fs_check_order,
        }
    }

    /// Build the line for a mount definition. Nothing is validated here.
    pub fn from_config(config: &MountConfig) -> Self {
        Self {
            device: config.mount_device(),
            mount_point: config.mount_point().to_string(),
            fs_type: config.fs_type().to_string(),
            options: config.options_string(),
            backup_operation: config.backup_operation(),
            fs_check_order: config.fs_check_order(),
        }
    }

    pub fn is_mount_point_valid(&self) -> bool {
        validate::is_mount_point_valid(&self.mount_point)
    }

    pub fn is_fs_type_valid(&self) -> bool {
        validate::is_file_system_type_valid(&self.fs_type)
    }

    pub fn is_backup_operation_valid(&self) -> bool {
        validate::is_backup_operation_valid(self.backup_operation)
    }

    pub fn is_fs_check_order_valid(&self) -> bool {
        validate::is_fs_check_order_valid(self.fs_check_order)
    }

    /// All columns pass their checks
    pub fn is_valid(&self) -> bool {
        self.is_backup_operation_valid()
            && self.is_fs_check_order_valid()
            && self.is_fs_type_valid()
            && self.is_mount_point_valid()
    }

    /// Render as a single fstab line (no trailing newline)
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FstabLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.device,
            self.mount_point,
            self.fs_type,
            self.options,
            self.backup_operation,
            self.fs_check_order
        )
    }
}

/// Render entries as a table, one newline-terminated line each
pub fn render_table(entries: &[FstabLine]) -> String {
    entries.iter().map(|e| format!("{}\n", e)).collect()
}
