use anyhow::Result;
use clockcard::cli::run_cli;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if let Err(e) = run_cli().await {
        error!("Error running cli {e:?}");
        match e.downcast::<clap::Error>() {
            Ok(usage) => usage.exit(),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
