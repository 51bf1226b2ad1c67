use std::path::Path;

use anyhow::Result;
use log::info;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};

use super::{Account, AccountStore};

/// SQLite 账号存储
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// 打开账号数据库，不存在则创建并跑迁移
    pub async fn open(filename: impl AsRef<Path>) -> Result<Self> {
        let filename = filename.as_ref();
        info!("初始化数据库连接: {}", filename.display());

        let options = SqliteConnectOptions::new()
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .filename(filename)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await?;

        info!("检查数据库迁移");
        sqlx::migrate!().run(&pool).await?;

        Ok(Self { pool })
    }
}

impl AccountStore for SqliteStore {
    async fn get(&self, username: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT username, password_hash, email, image_path
            FROM account WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn put(&self, account: Account) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO account (username, password_hash, email, image_path)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(username) DO UPDATE SET
                password_hash = excluded.password_hash,
                email = excluded.email,
                image_path = excluded.image_path
            "#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.email)
        .bind(&account.image_path)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn exists(&self, username: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM account WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(username: &str) -> Account {
        Account {
            username: username.to_string(),
            password_hash: "blake3$salt$hash".to_string(),
            email: "a@b.io".to_string(),
            image_path: "/tmp/a.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_basic_operations() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("test.db")).await.unwrap();

        assert!(!store.exists("bob").await.unwrap());
        store.put(account("bob")).await.unwrap();
        assert!(store.exists("bob").await.unwrap());

        let got = store.get("bob").await.unwrap().unwrap();
        assert_eq!(got.password_hash, "blake3$salt$hash");
        assert_eq!(got.image_path, "/tmp/a.jpg");
    }

    #[tokio::test]
    async fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let store = SqliteStore::open(&path).await.unwrap();
            store.put(account("carol")).await.unwrap();
        }

        // 重新打开后数据仍在
        let store = SqliteStore::open(&path).await.unwrap();
        assert!(store.exists("carol").await.unwrap());
    }
}
