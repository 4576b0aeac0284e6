use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::error;

use mstabload::db::mssql::MssqlClient;
use mstabload::loader;
use mstabload::models::connections::ConnectParams;

/// Bulk-loads JSON and CSV files from a directory into SQL Server tables.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Db data source, as host or host,port
    #[arg(short = 's', long = "data-source", default_value = "localhost,1433")]
    data_source: String,
    /// Initial catalog
    #[arg(short = 'c', long = "catalog", default_value = "master")]
    catalog: String,
    /// User id
    #[arg(short = 'u', long = "user", default_value = "test")]
    user: String,
    /// User password
    #[arg(short = 'p', long = "password", default_value = "test")]
    password: String,
    /// Path to dir with data to upload
    #[arg(short = 'd', long = "dir", default_value = "test_data")]
    dir: PathBuf,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let params = ConnectParams::new(&args.data_source, &args.catalog, &args.user, &args.password);

    let result = match MssqlClient::connect(&params).await {
        Ok(client) => loader::run(&client, &args.dir).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(e.exit_code());
    }
}
