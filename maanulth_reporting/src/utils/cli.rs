// @file: maanulth_reporting/src/utils/cli.rs
// @description: Command-line arguments for the annual report run.
// @author: LAS.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "maanulth-report",
    version,
    about = "Maa'Nulth FRPA annual reporting: new and amended authorizations from BCGW"
)]
pub struct Cli {
    #[arg(long, env = "BCGW_USER", help = "BCGW username")]
    pub username: String,

    #[arg(long, env = "BCGW_PWD", hide_env_values = true, help = "BCGW password")]
    pub password: String,

    #[arg(long, env = "REPORT_YEAR", help = "Reporting year, e.g. 2024 covers 2023-09-01 to 2024-08-31")]
    pub year: i32,

    #[arg(long, env = "REPORT_WORKSPACE", help = "Folder where outputs are written")]
    pub workspace: PathBuf,

    #[arg(long, help = "First Nation areas layer (.shp or .geojson); overrides config")]
    pub fn_layer: Option<PathBuf>,
}
