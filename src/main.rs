use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use procwatch::application::config::AppConfig;
use procwatch::infrastructure::notifications::create_notifier;
use procwatch::infrastructure::os::process_table::OsProcessTable;
use procwatch::infrastructure::os::signal_probe::SignalProbe;
use procwatch::presentation::cli::app::Cli;
use procwatch::presentation::cli::commands::watch::run_watch;

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let mut config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path)?
    } else {
        AppConfig::load()?
    };
    config.apply_overrides(cli.interval, cli.token.clone(), cli.user.clone());
    config.validate()?;

    let target = cli.target().context("Either --pid or --name is required")?;

    // Concrete adapters are only named here
    let table = OsProcessTable::new();
    let probe = SignalProbe::new();
    let notifier = create_notifier(&config.notifications)?;

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();

    run_watch(
        &table,
        &probe,
        &notifier,
        &target,
        config.general.interval(),
        &mut input,
        &mut output,
    )
    .await?;

    Ok(())
}
