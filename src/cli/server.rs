use anyhow::Result;
use clap::Parser;
use log::info;
use tokio::net::TcpListener;

use crate::cli::SubCommandExtend;
use crate::config::Opts;
use crate::server::{self, AppState};
use crate::store::{MemoryStore, SqliteStore};

#[derive(Parser, Debug, Clone)]
pub struct ServerCommand {
    /// 监听地址
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub addr: String,
    /// 账号不落盘，只保存在内存里
    #[arg(long)]
    pub no_persist: bool,
}

impl SubCommandExtend for ServerCommand {
    async fn run(&self, opts: &Opts) -> Result<()> {
        tokio::fs::create_dir_all(opts.data_dir.uploads()).await?;

        // 创建应用
        let app = if self.no_persist {
            info!("--no-persist 模式，账号只保存在内存里");
            let state = AppState::new(MemoryStore::new(), opts.data_dir.uploads());
            server::create_app(state)
        } else {
            let store = SqliteStore::open(opts.data_dir.database()).await?;
            let state = AppState::new(store, opts.data_dir.uploads());
            server::create_app(state)
        };

        // 启动服务器
        info!("服务器启动：http://{}", &self.addr);
        let listener = TcpListener::bind(&self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
