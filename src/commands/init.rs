use crate::commands::Host;
use crate::config::Config;
use anyhow::{Result, bail};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the configuration
    #[arg(default_value = "git-recap.yaml")]
    pub output: PathBuf,

    /// Replace the file if it already exists
    #[arg(long)]
    pub force: bool,
}

pub fn init_config<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!("'{}' already exists, pass --force to replace it", args.output.display());
    }

    Config::save_default(&args.output)?;
    let _ = writeln!(host.output(), "Wrote default configuration to '{}'", args.output.display());
    Ok(())
}
