use clap::Parser;
use log::{info, warn};

use prsnap::{PrsnapError, Settings, SnapshotArgs, config, run};

#[tokio::main]
async fn main() -> Result<(), PrsnapError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // clap handles `--help`, `--version` and usage errors before any
    // configuration source is read.
    SnapshotArgs::parse();
    let args = config::load_from_iter(std::env::args_os())?;
    let settings = Settings::from_args(&args)?;
    let summary = run(&settings).await?;
    if summary.written {
        info!(
            "done: {} pulls from {} pages",
            summary.pulls, summary.pages_requested
        );
    } else {
        warn!("done, but the snapshot was not written");
    }
    Ok(())
}
