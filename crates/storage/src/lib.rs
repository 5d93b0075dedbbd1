use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePoolOptions},
    ConnectOptions, Pool, Sqlite,
};
use std::{fs, path::Path, str::FromStr, sync::Arc};
use tokio::sync::Mutex;
mod kv;
mod memory;
mod repo;
mod solutions;

pub use kv::KvStore;
pub use memory::MemoryKv;
pub use solutions::SolutionStore;

#[derive(Clone)]
pub struct Db {
    pub(crate) pool: Pool<Sqlite>,
    // 内存库在最后一个连接关闭时就没了，额外持有一个连接保活
    _keeper: Option<Arc<Mutex<SqliteConnection>>>,
}
impl Db {
    pub async fn new(db_url: &str) -> anyhow::Result<Self> {
        let in_memory = db_url.contains(":memory:");
        if db_url.starts_with("sqlite://") && !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://");
            let path = Path::new(path_str);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
        }
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            Sqlite::create_database(db_url).await?;
        }
        let options = SqliteConnectOptions::from_str(db_url)?;
        let (pool, keeper) = if in_memory {
            // 同一个 options 指向同一个共享缓存内存库
            let keeper = options.clone().connect().await?;
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?;
            (pool, Some(Arc::new(Mutex::new(keeper))))
        } else {
            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?;
            (pool, None)
        };
        if !in_memory {
            sqlx::query("PRAGMA journal_mode = WAL;")
                .execute(&pool)
                .await?;
            sqlx::query("PRAGMA synchronous = NORMAL;")
                .execute(&pool)
                .await?;
        }
        sqlx::migrate!("../../migrations").run(&pool).await?;
        Ok(Self {
            pool,
            _keeper: keeper,
        })
    }
}
