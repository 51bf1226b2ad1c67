mod memory;
mod sqlite;

use anyhow::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// 账号记录，注册时写入一次
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    /// 参考照片落盘路径
    pub image_path: String,
}

/// 账号存储抽象
///
/// 登录校验和 HTTP 层只依赖这三个操作，测试时可以注入
/// [`MemoryStore`] 代替 SQLite，不需要任何进程级共享状态。
pub trait AccountStore: Send + Sync {
    /// 按用户名查询账号
    fn get(&self, username: &str) -> impl std::future::Future<Output = Result<Option<Account>>> + Send;
    /// 写入账号，已存在则覆盖
    fn put(&self, account: Account) -> impl std::future::Future<Output = Result<()>> + Send;
    /// 用户名是否已注册
    fn exists(&self, username: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
}
