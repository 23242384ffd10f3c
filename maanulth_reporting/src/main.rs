// @file: maanulth_reporting/src/main.rs
// @description: Entry point: connect to BCGW, run the annual report, close the connection.
// @author: LAS.

use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use maanulth_reporting::connectors::bcgw::{BcgwWarehouse, Credentials};
use maanulth_reporting::connectors::first_nations::FirstNationLayer;
use maanulth_reporting::core::engine::{OutputSettings, ReportEngine};
use maanulth_reporting::core::errors::ReportResult;
use maanulth_reporting::core::models::ReportingPeriod;
use maanulth_reporting::utils::cli::Cli;
use maanulth_reporting::utils::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Environment first, so .env can supply credentials to clap
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // 2. Logger, RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str())).init();

    info!(">>> Maa'Nulth FRPA Annual Reporting <<<");

    match run(cli, config).await {
        Ok(()) => {
            info!("Processing completed!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: AppConfig) -> ReportResult<()> {
    let period = ReportingPeriod::new(cli.year)?;
    let outputs = OutputSettings::from_config(&config)?;

    // 3. First Nation areas
    let layer_path = cli.fn_layer.unwrap_or_else(|| PathBuf::from(&config.first_nations_layer));
    let layer = FirstNationLayer::load(&layer_path, &config.first_nations_name_field)?;

    // 4. Warehouse
    info!("Connecting to BCGW...");
    let credentials = Credentials { username: cli.username, password: cli.password };
    let warehouse = BcgwWarehouse::connect(credentials, &config.bcgw_connect_string).await?;

    // 5. Report
    let result = ReportEngine::new(&warehouse, &layer, outputs)
        .run(&period, &cli.workspace)
        .await;

    warehouse.close().await?;

    let summary = result?;
    for (dataset, rows) in &summary.rows {
        info!("{}: {} authorization(s)", dataset, rows);
    }
    if let Some(path) = &summary.workbook {
        info!("Workbook: {}", path.display());
    }
    Ok(())
}
