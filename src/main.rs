mod api;
mod cli;
mod core;
mod export;
mod prelude;
mod quantity;
mod repair;
mod session;
mod tables;

use clap::{Parser, crate_version};
use itertools::Itertools;

use crate::{
    api::{Api, Batch, SignupRequest},
    cli::{Args, Command, ConnectionArgs, PipelineArgs},
    core::{
        Reading, aggregate, bucket_by_day, bucket_by_month, daily_average, normalize_all,
        range_filter, sequence,
    },
    prelude::*,
    session::Session,
    tables::{
        build_daily_chart_table, build_meter_groups_table, build_monthly_chart_table,
        build_users_table,
    },
};

#[tokio::main]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let connection = &args.connection;

    match args.command {
        Command::Login(login_args) => {
            let api = Api::try_new_anonymous(connection.base_url.clone())?;
            let access_token = api.login(&login_args.email, &login_args.password).await?;
            Session::new(login_args.email, access_token).save(&connection.session_file)?;
            info!("logged in");
        }

        Command::Logout => {
            Session::delete(&connection.session_file)?;
            info!("logged out");
        }

        Command::Signup(signup_args) => {
            let api = Api::try_new_anonymous(connection.base_url.clone())?;
            api.signup(&SignupRequest {
                email: &signup_args.email,
                password: &signup_args.password,
                password_confirmation: &signup_args.password,
                name: &signup_args.name,
                company_name: &signup_args.company_name,
                user_time_zone: 0,
                company_type_id: 0,
            })
            .await?;
            info!("signed up, you can log in now");
        }

        Command::ResetPassword(reset_args) => {
            let api = Api::try_new_anonymous(connection.base_url.clone())?;
            api.request_password_reset(&reset_args.email).await?;
            info!("if the e-mail is registered, a reset link is on its way");
        }

        Command::Readings(readings_args) => {
            let (batch, readings) = fetch_readings(connection, &readings_args.pipeline).await?;
            let records = sequence(readings);
            let groups = aggregate(&records, readings_args.pipeline.tariff);
            info!(n_meters = groups.len(), "aggregated");
            println!(
                "{}",
                build_meter_groups_table(&groups, &batch, readings_args.highlight_threshold)
            );
        }

        Command::Chart(chart_args) => {
            let (_, readings) = fetch_readings(connection, &chart_args.pipeline).await?;
            if chart_args.monthly {
                println!("{}", build_monthly_chart_table(&bucket_by_month(&readings)));
            } else {
                let buckets = bucket_by_day(&readings);
                if let Some(average) = daily_average(&buckets) {
                    info!(average = %average, n_days = buckets.len(), "bucketed");
                }
                println!("{}", build_daily_chart_table(&buckets));
            }
        }

        Command::Users => {
            let session = Session::load(&connection.session_file)?;
            let api = Api::try_new(connection.base_url.clone(), &session.access_token)?;
            let users = api.get_company_users().await?;
            info!(email = %session.email, "logged in as");
            println!("{}", build_users_table(&users));
        }

        Command::Export(export_args) => {
            let (batch, readings) = fetch_readings(connection, &export_args.pipeline).await?;
            let records = sequence(readings);
            let groups = aggregate(&records, export_args.pipeline.tariff);
            let csv = export::to_csv(&groups, &batch);
            match export_args.output {
                Some(path) => {
                    std::fs::write(&path, csv)
                        .with_context(|| format!("failed to write `{}`", path.display()))?;
                    info!(path = %path.display(), "exported");
                }
                None => print!("{csv}"),
            }
        }

        Command::Repair(repair_args) => {
            let session = Session::load(&connection.session_file)?;
            let api = Api::try_new(connection.base_url.clone(), &session.access_token)?;
            // No period: any meter that ever reported is repairable.
            let batch = repair_args.pipeline.source.into_source(api).fetch(None).await?;
            let readings = normalize_all(&batch.messages, repair_args.pipeline.policy());
            let meters: Vec<String> =
                readings.into_iter().map(|reading| reading.meter_id).unique().sorted().collect();
            match repair_args.meter {
                Some(meter) => {
                    ensure!(
                        meters.iter().any(|known| *known == meter),
                        "unknown meter `{meter}`, known: {meters:?}",
                    );
                    let url = repair::build_mailto(&meter, &repair_args.comment, &session.email)?;
                    println!("{url}");
                }
                None => {
                    for meter in meters {
                        println!("{meter}");
                    }
                }
            }
        }
    }

    Ok(())
}

/// One fetch cycle: pull the raw batch, normalize it and scope it to the
/// requested period. The period is applied before sequencing so that
/// cross-boundary meters keep their first in-range delta.
async fn fetch_readings(
    connection: &ConnectionArgs,
    pipeline: &PipelineArgs,
) -> Result<(Batch, Vec<Reading>)> {
    let session = Session::load(&connection.session_file)?;
    let api = Api::try_new(connection.base_url.clone(), &session.access_token)?;
    let (start, end) = pipeline.period.resolve()?;
    let batch = pipeline.source.into_source(api).fetch(Some((start, end))).await?;
    let n_raw = batch.messages.len();
    let readings = range_filter(normalize_all(&batch.messages, pipeline.policy()), start, end);
    info!(n_raw, n_valid = readings.len(), "normalized");
    Ok((batch, readings))
}
