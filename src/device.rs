//! Device column resolution
//!
//! Network sources (hostname or IP) become `host:export`, anything else
//! (device path, UUID=, LABEL=) is used as-is.

use crate::validate::{is_hostname, is_ip_address};

/// Resolve the fstab device string for a mount source
///
/// An empty export always yields the bare source, whatever it looks like.
pub fn resolve_device(source: &str, export: &str) -> String {
    if export.is_empty() {
        return source.to_string();
    }

    if is_hostname(source) || is_ip_address(source) {
        format!("{}:{}", source, export)
    } else {
        source.to_string()
    }
}
