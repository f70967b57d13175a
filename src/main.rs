mod api;
mod cli;
mod error;
mod operations;
mod storage;
mod weather;

use std::io;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};

/// 初始化日志：RUST_LOG 优先，默认 taskflow=info,tower_http=info
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskflow=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> io::Result<()> {
    // .env 可提供 WEATHER_API_KEY / PORT / HOST / TASKFLOW_DATA_DIR
    dotenvy::dotenv().ok();
    init_tracing();

    // 解析命令行参数，无子命令时默认启动服务
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(Commands::default_serve);

    // 统一调度
    match command {
        Commands::Serve {
            port,
            host,
            data_dir,
            static_dir,
            open,
        } => {
            tokio::runtime::Runtime::new()?.block_on(async {
                cli::serve::execute(port, host, data_dir, static_dir, open).await;
            });
        }
        Commands::Init { data_dir, force } => {
            cli::init::execute(&cli::resolve_data_dir(data_dir), force);
        }
        Commands::Stats { data_dir } => {
            cli::stats::execute(&cli::resolve_data_dir(data_dir));
        }
    }

    Ok(())
}
