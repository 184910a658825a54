//! yml2fstab - generate /etc/fstab from YAML
//!
//! Reads mount definitions keyed by source (device, hostname or IP),
//! turns each into an fstab line and replaces the target fstab.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    pipeline                      │
//! ├─────────────────────────────────────────────────┤
//! │    config     │      fstab       │    persist    │
//! ├─────────────────────────────────────────────────┤
//! │           device        │       validate         │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod device;
pub mod fstab;
pub mod persist;
pub mod pipeline;
pub mod validate;

pub use config::{ConfigError, Document, MountConfig};
pub use device::resolve_device;
pub use fstab::{render_table, FstabLine};
pub use persist::PersistError;
pub use pipeline::{run, ConvertError, RunOptions, RunOutcome};
