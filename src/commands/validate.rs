use crate::commands::Host;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration file to check
    pub config: PathBuf,
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    let _ = Config::load(Some(args.config.as_path()))?;
    let _ = writeln!(host.output(), "'{}' is valid", args.config.display());
    Ok(())
}
