// superstore binary.
// Loads the cached dataset (building it on first run) and prints its shape.

use std::process::ExitCode;

use superstore::{Config, Superstore};

#[tokio::main]
async fn main() -> ExitCode {
    superstore::logging::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> superstore::Result<()> {
    let config = Config::load_or_default()?;
    let mut superstore = Superstore::from_config(config)?;
    let table = superstore.get_dataset().await?;

    println!(
        "{} rows x {} columns ({})",
        table.len(),
        table.width(),
        superstore.cache_path().display()
    );
    println!("{}", table.columns().join(", "));
    Ok(())
}
