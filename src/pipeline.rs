//! YAML -> fstab conversion
//!
//! ```text
//! input.yml ──▶ Document ──▶ [MountConfig] ──▶ [FstabLine] ──▶ tmp file ──▶ /etc/fstab
//! ```
//!
//! Any failure aborts the run before the destination is touched.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::{ConfigError, Document, MountConfig};
use crate::fstab::{render_table, FstabLine};
use crate::persist::{self, PersistError};

pub const DEFAULT_INPUT: &str = "input.yml";
pub const DEFAULT_OUTPUT: &str = "/etc/fstab";
pub const DEFAULT_TMP_FILE: &str = "/tmp/fstab.temp";

/// Settings for a single conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// YAML definition file
    pub input: PathBuf,
    /// Final fstab location
    pub output: PathBuf,
    /// Staging file written before the copy
    pub tmp_file: PathBuf,
    /// Abort if any entry fails validation
    pub strict: bool,
    /// Print the table instead of writing it
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            tmp_file: PathBuf::from(DEFAULT_TMP_FILE),
            strict: false,
            dry_run: false,
        }
    }
}

/// What a run produced
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Table written to the destination
    Written { entries: usize, bytes: u64 },
    /// Dry run: the rendered table, nothing written
    Rendered(String),
}

/// Parse a YAML document and decode its `fstab` section
pub fn parse_configs(content: &str) -> Result<Vec<MountConfig>, ConvertError> {
    let doc: Document = serde_yaml::from_str(content).map_err(ConvertError::Parse)?;
    Ok(doc.configs()?)
}

/// Read and decode the definition file at `path`
pub fn load_configs(path: &Path) -> Result<Vec<MountConfig>, ConvertError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_configs(&content)
}

/// Turn definitions into fstab lines, in order
///
/// Invalid lines are kept (with a warning) unless `strict` is set, in which
/// case the first one is returned as an error.
pub fn build_entries(configs: &[MountConfig], strict: bool) -> Result<Vec<FstabLine>, ConvertError> {
    let mut entries = Vec::with_capacity(configs.len());

    for config in configs {
        let entry = FstabLine::from_config(config);
        debug!("{} -> {}", config.source(), entry);

        if !entry.is_valid() {
            if strict {
                let line = entry.to_line();
                return Err(ConvertError::InvalidEntry {
                    device: entry.device,
                    line,
                });
            }
            warn!("Entry for {} does not validate: {}", config.source(), entry);
        }
        entries.push(entry);
    }

    Ok(entries)
}

/// Convert a YAML document straight to fstab text
pub fn convert_str(content: &str, strict: bool) -> Result<String, ConvertError> {
    let configs = parse_configs(content)?;
    let entries = build_entries(&configs, strict)?;
    Ok(render_table(&entries))
}

/// Run the full conversion described by `opts`
pub fn run(opts: &RunOptions) -> Result<RunOutcome, ConvertError> {
    let configs = load_configs(&opts.input)?;
    info!(
        "Loaded {} mount definitions from {}",
        configs.len(),
        opts.input.display()
    );

    let entries = build_entries(&configs, opts.strict)?;

    if opts.dry_run {
        return Ok(RunOutcome::Rendered(render_table(&entries)));
    }

    persist::ensure_distinct(&opts.tmp_file, &opts.output)?;
    persist::write_entries(&entries, &opts.tmp_file)?;
    let bytes = persist::copy_file(&opts.tmp_file, &opts.output)?;
    info!(
        "Wrote {} entries to {}",
        entries.len(),
        opts.output.display()
    );

    Ok(RunOutcome::Written {
        entries: entries.len(),
        bytes,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parser error: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("Invalid entry for {device}: {line}")]
    InvalidEntry { device: String, line: String },
}
