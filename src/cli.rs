use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use reqwest::Url;

use crate::{
    api::SourceKind,
    core::{FieldPolicy, IdField, TimeField},
    prelude::*,
    quantity::{rate::CubicMeterRate, volume::CubicMeters},
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[clap(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser)]
pub struct ConnectionArgs {
    /// Metering cloud base URL.
    #[clap(
        long,
        env = "METERING_BASE_URL",
        default_value = "https://metering.beeline.kz:4443"
    )]
    pub base_url: Url,

    /// Where the session (bearer token) lives between runs.
    #[clap(long, env = "SESSION_PATH", default_value = "session.toml")]
    pub session_file: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and persist the session.
    Login(LoginArgs),

    /// Forget the stored session.
    Logout,

    /// Register a new company account.
    Signup(SignupArgs),

    /// Request a password-reset e-mail.
    ResetPassword(ResetPasswordArgs),

    /// Fetch the readings and show per-meter usage and cost.
    Readings(ReadingsArgs),

    /// Daily consumption chart over a period.
    Chart(ChartArgs),

    /// List the company users.
    Users,

    /// Export aggregated readings as CSV.
    Export(ExportArgs),

    /// Compose a repair-request e-mail for a meter.
    Repair(RepairArgs),
}

#[derive(Parser)]
pub struct LoginArgs {
    #[clap(long, env = "METERING_EMAIL")]
    pub email: String,

    #[clap(long, env = "METERING_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Parser)]
pub struct SignupArgs {
    #[clap(long)]
    pub email: String,

    #[clap(long)]
    pub password: String,

    /// Your display name.
    #[clap(long)]
    pub name: String,

    #[clap(long)]
    pub company_name: String,
}

#[derive(Parser)]
pub struct ResetPasswordArgs {
    #[clap(long)]
    pub email: String,
}

/// Arguments shared by every command that runs the aggregation pipeline.
#[derive(Parser)]
pub struct PipelineArgs {
    #[clap(flatten)]
    pub period: PeriodArgs,

    /// Fetch strategy.
    #[clap(long, value_enum, default_value_t)]
    pub source: SourceKind,

    /// Which raw field carries the meter identity.
    #[clap(long, value_enum, default_value_t)]
    pub id_field: IdField,

    /// Which raw field carries the timestamp.
    #[clap(long, value_enum, default_value_t)]
    pub time_field: TimeField,

    /// Tariff in tenge per cubic meter.
    #[clap(long, env = "TARIFF", default_value = "120")]
    pub tariff: CubicMeterRate,
}

impl PipelineArgs {
    #[must_use]
    pub const fn policy(&self) -> FieldPolicy {
        FieldPolicy { id_field: self.id_field, time_field: self.time_field }
    }
}

#[derive(Parser)]
pub struct PeriodArgs {
    /// First calendar day of the period (inclusive). Defaults to today.
    #[clap(long)]
    pub start_date: Option<NaiveDate>,

    /// Last calendar day of the period (inclusive). Defaults to today.
    #[clap(long)]
    pub end_date: Option<NaiveDate>,
}

impl PeriodArgs {
    pub fn resolve(&self) -> Result<(NaiveDate, NaiveDate)> {
        let today = Local::now().date_naive();
        let start = self.start_date.unwrap_or(today);
        let end = self.end_date.unwrap_or(today);
        ensure!(start <= end, "the end date ({end}) is before the start date ({start})");
        Ok((start, end))
    }
}

#[derive(Parser)]
pub struct ReadingsArgs {
    #[clap(flatten)]
    pub pipeline: PipelineArgs,

    /// Deltas above this are highlighted.
    #[clap(long, default_value = "1")]
    pub highlight_threshold: CubicMeters,
}

#[derive(Parser)]
pub struct ChartArgs {
    #[clap(flatten)]
    pub pipeline: PipelineArgs,

    /// Roll the chart up per calendar month instead of per day.
    #[clap(long)]
    pub monthly: bool,
}

#[derive(Parser)]
pub struct ExportArgs {
    #[clap(flatten)]
    pub pipeline: PipelineArgs,

    /// Write the CSV here instead of stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct RepairArgs {
    #[clap(flatten)]
    pub pipeline: PipelineArgs,

    /// Meter serial number. Omit to list the available meters.
    #[clap(long)]
    pub meter: Option<String>,

    /// Problem description.
    #[clap(long, default_value = "")]
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_period_defaults_to_today() {
        let period = PeriodArgs { start_date: None, end_date: None };
        let (start, end) = period.resolve().unwrap();
        assert_eq!(start, end);
    }

    #[test]
    fn test_inverted_period_rejected() {
        let period =
            PeriodArgs { start_date: Some(date(2024, 5, 18)), end_date: Some(date(2024, 5, 17)) };
        assert!(period.resolve().is_err());
    }
}
