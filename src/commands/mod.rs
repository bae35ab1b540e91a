mod init;
mod report;
mod validate;

pub use init::{InitArgs, init_config};
pub use report::{ReportArgs, generate_report};
pub use validate::{ValidateArgs, validate_config};

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::io::Write;

/// Where a command writes its results and how it ends the process.
///
/// The binary talks to the real terminal; tests capture everything in memory.
pub trait Host {
    fn output(&mut self) -> impl Write;
    fn error(&mut self) -> impl Write;
    fn exit(&mut self, code: i32);
}

#[derive(Parser, Debug)]
#[command(name = "git-recap", version, about = "Builds a year-in-review report of your GitHub activity")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log progress details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a user's activity and print the report context as JSON
    Report(ReportArgs),

    /// Write the default configuration to a file
    Init(InitArgs),

    /// Check a configuration file for errors
    Validate(ValidateArgs),
}

/// Parses `args` and runs the selected command.
///
/// Failures are written to the host's error stream and end with exit code 1; usage errors end with 2.
pub async fn run<H, I, T>(host: &mut H, args: I)
where
    H: Host,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            if e.use_stderr() {
                let _ = write!(host.error(), "{e}");
                host.exit(2);
            } else {
                let _ = write!(host.output(), "{e}");
                host.exit(0);
            }
            return;
        }
    };

    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Report(args) => generate_report(host, args).await,
        Command::Init(args) => init_config(host, args),
        Command::Validate(args) => validate_config(host, args),
    };

    if let Err(e) = result {
        let _ = writeln!(host.error(), "Error: {e:#}");
        host.exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn };

    // a second initialization in the same process keeps the first logger
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
