//! Field validators for fstab entries
//!
//! All checks are plain predicates: an invalid value yields `false`,
//! never an error.

use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;

/// Filesystem types accepted in the third fstab column
pub const FILE_SYSTEM_TYPES: &[&str] = &[
    "ext", "ext2", "ext3", "ext4", "jfs", "reiserfs", "xfs", "btrfs", "swap", "iso9660", "nfs",
    "nfs4", "udf", "vfat", "devpts",
];

/// Dot-separated alphanumeric/hyphen labels. The last label may not be a
/// single digit, so bare numbers like "1" are not hosts.
static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(([a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9\-]*[a-zA-Z0-9])\.)*([A-Za-z]|[A-Za-z0-9][A-Za-z0-9\-]*[A-Za-z0-9])$",
    )
    .expect("hostname pattern is valid")
});

/// Check if `fs_type` is one of the supported filesystem types
pub fn is_file_system_type_valid(fs_type: &str) -> bool {
    !fs_type.is_empty() && FILE_SYSTEM_TYPES.contains(&fs_type)
}

/// Check if `path` is usable as a mount point: absolute, or the literal `swap`
pub fn is_mount_point_valid(path: &str) -> bool {
    path == "swap" || path.starts_with('/')
}

/// Dump flag: 0 = no backup, 1 = backup
pub fn is_backup_operation_valid(value: i32) -> bool {
    (0..=1).contains(&value)
}

/// Fsck pass: 0 = skip, 1 = root, 2 = other
pub fn is_fs_check_order_valid(value: i32) -> bool {
    (0..=2).contains(&value)
}

/// Check if `host` looks like a DNS hostname (surrounding spaces ignored)
pub fn is_hostname(host: &str) -> bool {
    HOSTNAME_RE.is_match(host.trim_matches(' '))
}

/// Check if `addr` is a literal IPv4 or IPv6 address
pub fn is_ip_address(addr: &str) -> bool {
    addr.parse::<IpAddr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_system_type_valid() {
        assert!(is_file_system_type_valid("nfs"));
        assert!(is_file_system_type_valid("ext4"));
        assert!(is_file_system_type_valid("devpts"));
    }

    #[test]
    fn test_file_system_type_invalid() {
        assert!(!is_file_system_type_valid(""));
        assert!(!is_file_system_type_valid("ffff"));
        assert!(!is_file_system_type_valid("ext5"));
        assert!(!is_file_system_type_valid("hdfs"));
        assert!(!is_file_system_type_valid("EXT4"));
    }

    #[test]
    fn test_mount_point_valid() {
        for mp in ["swap", "/", "/dev", "/var", "/home/hello", "/dafadf545435"] {
            assert!(is_mount_point_valid(mp), "{} should be valid", mp);
        }
    }

    #[test]
    fn test_mount_point_invalid() {
        for mp in ["", "swap1", "swing", "var", "faldshfjkha", " /var"] {
            assert!(!is_mount_point_valid(mp), "{} should be invalid", mp);
        }
    }

    #[test]
    fn test_numeric_ranges() {
        assert!(is_backup_operation_valid(0));
        assert!(is_backup_operation_valid(1));
        assert!(!is_backup_operation_valid(-1));
        assert!(!is_backup_operation_valid(2));

        assert!(is_fs_check_order_valid(0));
        assert!(is_fs_check_order_valid(2));
        assert!(!is_fs_check_order_valid(-1));
        assert!(!is_fs_check_order_valid(3));
    }

    #[test]
    fn test_ip_address() {
        for ip in ["172.16.0.1", "127.0.0.1", "255.255.255.255", "0.0.0.0", "::1", "fe80::1"] {
            assert!(is_ip_address(ip), "{} should parse", ip);
        }
        for ip in [
            "127.0.0.a",
            "127.%.0.1",
            "255.255.255.256",
            "255.255.255.-1",
            "255.255.255",
            "255",
            "1",
            "-1.-1.-1.2",
        ] {
            assert!(!is_ip_address(ip), "{} should not parse", ip);
        }
    }

    #[test]
    fn test_hostname() {
        for host in [
            "international.com",
            "www.international.io",
            "www.9gag.io",
            "9gag.io",
            "localhost",
            " padded.example ",
        ] {
            assert!(is_hostname(host), "{} should be a host", host);
        }
        for host in ["9gag\\com", "9gag_com", "1", "/dev/sda", "UUID=abcd", "-lead.com", ""] {
            assert!(!is_hostname(host), "{} should not be a host", host);
        }
    }
}
