use crate::commands::Host;
use crate::config::Config;
use crate::facts::Snapshot;
use crate::facts::hosting::Identity;
use crate::misc::ReportTimezone;
use crate::reports::Report;
use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::Args;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

const LOG_TARGET: &str = "commands";

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// GitHub login to build the report for
    #[arg(long, short, required_unless_present = "from_snapshot")]
    pub user: Option<String>,

    /// Calendar year to report on [default: the current year]
    #[arg(long, short)]
    pub year: Option<i32>,

    /// Timezone for bucketing activity: an IANA name such as `Asia/Shanghai`, or an offset such as `+8`
    #[arg(long, short, default_value = "UTC")]
    pub timezone: ReportTimezone,

    /// Personal access token used to authenticate
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Configuration file [default: built-in settings]
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Write the JSON here instead of to stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Also emit the projected aggregates the context is derived from
    #[arg(long)]
    pub with_aggregates: bool,

    /// Never draw a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Also save the fetched activity to this file
    #[arg(long, value_name = "FILE", conflicts_with = "from_snapshot")]
    pub save_snapshot: Option<PathBuf>,

    /// Build the report from a saved snapshot instead of fetching
    #[arg(long, value_name = "FILE")]
    pub from_snapshot: Option<PathBuf>,
}

pub async fn generate_report<H: Host>(host: &mut H, args: &ReportArgs) -> Result<()> {
    let year = args.year.unwrap_or_else(|| Utc::now().year());

    let snapshot = match &args.from_snapshot {
        Some(path) => Snapshot::load(path)?,
        None => fetch_snapshot(args, year).await?,
    };
    let username = snapshot.account_info.username.clone();

    if let Some(path) = &args.save_snapshot {
        snapshot.save(path)?;
    }

    let report = Report::from_snapshot(snapshot, year, Utc::now())?;

    let json = if args.with_aggregates {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string_pretty(&report.context)
    }
    .context("serializing the report")?;

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing the report to '{}'", path.display()))?;
            log::info!(target: LOG_TARGET, "Wrote the {year} report for '{username}' to '{}'", path.display());
        }
        None => {
            let _ = writeln!(host.output(), "{json}");
        }
    }

    Ok(())
}

async fn fetch_snapshot(args: &ReportArgs, year: i32) -> Result<Snapshot> {
    let config = Config::load(args.config.as_deref())?;
    let username = args.user.clone().context("a user is needed to fetch activity")?;

    let token = args.token.clone().unwrap_or_default();
    if token.is_empty() {
        log::warn!(target: LOG_TARGET, "No token given, requests are unauthenticated and private activity is not visible");
    }

    let identity = Identity {
        username,
        token,
        timezone: args.timezone,
    };

    Report::fetch_snapshot(&config, identity, year, !args.no_progress).await
}
