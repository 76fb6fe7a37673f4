use {
    anyhow::{Context, Result},
    base::log,
    clap::Parser,
    com::Broker,
    std::path::PathBuf,
};

/// Topic broker for the hand-gesture stream.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// address to listen on
    #[arg(long, env = "HANDCAST_BIND", default_value = "0.0.0.0:1883")]
    bind: String,

    /// write logs to date-named files in this directory instead of stdout
    #[arg(long, env = "HANDCAST_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.log_dir {
        Some(dir) => base::init_file_logger(dir)?,
        None => base::init_stdout_logger(),
    }

    let broker = Broker::bind(cli.bind.as_str())
        .await
        .with_context(|| format!("binding {}", cli.bind))?;
    log::info!("broker listening on {}", broker.local_addr());

    tokio::signal::ctrl_c().await?;
    log::info!(
        "broker shutting down with {} sessions",
        broker.session_count().await
    );
    Ok(())
}
