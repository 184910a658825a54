use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use yml2fstab::pipeline::{self, RunOptions, RunOutcome};

#[derive(Parser)]
#[command(name = "yml2fstab")]
#[command(version)]
#[command(about = "Generate /etc/fstab from a YAML mount definition file")]
struct Args {
    /// Path to the YAML definition file
    #[arg(long = "in", value_name = "PATH", default_value = pipeline::DEFAULT_INPUT)]
    input: PathBuf,

    /// Path of the fstab file to replace
    #[arg(long = "out", value_name = "PATH", default_value = pipeline::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Staging file written before copying to --out
    #[arg(long, value_name = "PATH", default_value = pipeline::DEFAULT_TMP_FILE)]
    tmp_file: PathBuf,

    /// Fail if any generated entry does not validate
    #[arg(long)]
    strict: bool,

    /// Print the generated table instead of writing it
    #[arg(long, short = 'n')]
    dry_run: bool,
}

impl From<Args> for RunOptions {
    fn from(args: Args) -> Self {
        Self {
            input: args.input,
            output: args.output,
            tmp_file: args.tmp_file,
            strict: args.strict,
            dry_run: args.dry_run,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = RunOptions::from(Args::parse());

    match pipeline::run(&opts) {
        Ok(RunOutcome::Rendered(table)) => {
            if let Err(e) = std::io::stdout().write_all(table.as_bytes()) {
                log::error!("Failed to write to stdout: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Written { .. }) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
