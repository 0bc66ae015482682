use std::process::ExitCode;

use clap::Parser;
use snapshot_common::TimePoint;
use snapshot_pipeline::{Boundary, FixedDelay, Pipeline};
use snapshot_utils::{
    config::Config, covalent::CovalentClient, disk_storage::DiskStorageInterface,
    rpc::RpcBlockSource,
};
use tracing::info;

mod cli;
mod panic_hook;
mod report;
mod settings;

use cli::Cli;
use report::{ErrorReport, Printer};
use settings::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    panic_hook::set();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    snapshot_utils::log::init(cli.verbose);

    // reject a bad date before touching the config or the network
    if let Err(err) = TimePoint::parse(&cli.date) {
        println!("{}", report::input_message(&err));
        return ExitCode::SUCCESS;
    }

    let boundary = if cli.at_or_after {
        Boundary::AtOrAfter
    } else {
        Boundary::AtOrBefore
    };

    let settings = match Config::load().and_then(|file| {
        Settings::resolve(file.overridden_by(cli.to_config()), boundary)
    }) {
        Ok(settings) => settings,
        Err(err) => {
            ErrorReport::from_setup(&err).print();
            return ExitCode::FAILURE;
        }
    };
    info!(network = %settings.network, contract = %settings.contract, "settings resolved");

    let blocks = match RpcBlockSource::from_url(&settings.rpc_url) {
        Ok(blocks) => blocks,
        Err(err) => {
            ErrorReport::from_setup(&err).print();
            return ExitCode::FAILURE;
        }
    };
    let assets = CovalentClient::new(
        &settings.covalent_api_key,
        &settings.network.covalent_chain_name,
    );
    let pipeline = Pipeline::new(
        blocks,
        assets,
        FixedDelay::new(settings.delay),
        settings.pipeline_config(),
    );

    let decimals = settings.network.native_decimals;
    let printer = Printer::new(&settings.network.native_ticker, decimals);

    match pipeline
        .run_with_progress(&cli.date, |progress| {
            println!("{}", printer.format_progress(&progress))
        })
        .await
    {
        Ok(result) => {
            println!("{}", printer.format_total(&result));
            ExitCode::SUCCESS
        }
        Err(err) => {
            ErrorReport::from_pipeline(&err, decimals).print();
            ExitCode::FAILURE
        }
    }
}
