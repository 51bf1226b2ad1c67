use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::RwLock;

use super::{Account, AccountStore};

/// 内存账号存储，进程退出即丢失
///
/// `--no-persist` 模式和测试使用。
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for MemoryStore {
    async fn get(&self, username: &str) -> Result<Option<Account>> {
        Ok(self.accounts.read().await.get(username).cloned())
    }

    async fn put(&self, account: Account) -> Result<()> {
        self.accounts.write().await.insert(account.username.clone(), account);
        Ok(())
    }

    async fn exists(&self, username: &str) -> Result<bool> {
        Ok(self.accounts.read().await.contains_key(username))
    }
}
