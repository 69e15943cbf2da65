//! nanoclaw-host - IPC processor daemon

use tracing::{error, info};

use nanoclaw_host::{
    ConfigLoader, IpcProcessor, IpcScanner, IpcWatcher, LogSink, TaskStore, ThingsExecutor,
};
use nanoclaw_utils::{init_logging_with_config, LogConfig, LogOutput, Result};

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse_args();

    let mut log_config = LogConfig::host();
    if args.log_file {
        log_config.output = LogOutput::Both;
    }
    init_logging_with_config(log_config)?;

    if let Err(e) = run(args).await {
        error!("nanoclaw-host error: {}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(args: cli::Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_path(path)?,
        None => ConfigLoader::load()?,
    };
    args.apply(&mut config);
    ConfigLoader::validate(&config)?;

    info!(
        ipc_base = %config.ipc.base_dir.display(),
        main_group = %config.ipc.main_group_folder,
        things = %config.things.binary.display(),
        "nanoclaw-host starting"
    );

    let store = TaskStore::open(&config.store.tasks_path)?;
    let mut processor = IpcProcessor::new(
        &config.ipc.base_dir,
        config.ipc.main_group_folder.clone(),
        store,
        LogSink,
    );
    if let Some(jid) = &config.ipc.main_group_jid {
        processor.seed_main_group(jid)?;
    }
    processor.write_snapshots()?;

    let scanner = IpcScanner::new(processor, ThingsExecutor::from_config(&config.things));
    let watcher = IpcWatcher::new(scanner, config.ipc.poll_interval())?;

    watcher
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
        })
        .await;

    info!("nanoclaw-host stopped");
    Ok(())
}
