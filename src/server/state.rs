use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::store::AccountStore;

/// 应用状态
pub struct AppState<S> {
    /// 账号存储
    pub store: S,
    /// 会话 token 到用户名的映射
    pub sessions: RwLock<HashMap<String, String>>,
    /// 参考照片目录
    pub uploads: PathBuf,
}

impl<S: AccountStore> AppState<S> {
    /// 创建新的应用状态
    pub fn new(store: S, uploads: PathBuf) -> Arc<Self> {
        Arc::new(AppState { store, sessions: RwLock::new(HashMap::new()), uploads })
    }
}
