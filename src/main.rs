//! Novelist - 连载小说发布后端
//!
//! - Domain: novel/, ordering (Bounded Context + 排序引擎)
//! - Application: commands, queries, ports
//! - Infrastructure: http, auth, persistence, adapters

use std::sync::Arc;

use novelist::config::{load_config, print_config, AppConfig};
use novelist::infrastructure::adapters::FileImageStorage;
use novelist::infrastructure::auth::TokenService;
use novelist::infrastructure::http::{AppState, HttpServer, ServerConfig, UPLOADS_ROUTE};
use novelist::infrastructure::persistence::sqlite::{
    self, create_pool, run_migrations, SqliteChapterRepository, SqliteNovelRepository,
    SqlitePartRepository,
};
use tracing_subscriber::EnvFilter;

/// multipart 编码与其他表单字段的额外空间
const BODY_LIMIT_HEADROOM: usize = 1024 * 1024;

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},novelist={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Novelist - serialized novel backend");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config =
        sqlite::DatabaseConfig::new(&config.database.path, config.database.max_connections);
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let novel_repo = Arc::new(SqliteNovelRepository::new(pool.clone()));
    let chapter_repo = Arc::new(SqliteChapterRepository::new(pool.clone()));
    let part_repo = Arc::new(SqlitePartRepository::new(pool.clone()));

    // 创建图片存储
    let image_storage = Arc::new(
        FileImageStorage::new(
            &config.storage.uploads_dir,
            UPLOADS_ROUTE,
            config.storage.max_upload_size,
        )
        .await?,
    );

    let token_service = Arc::new(TokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs,
    ));

    let state = AppState::new(
        novel_repo,
        chapter_repo,
        part_repo,
        image_storage,
        token_service,
    );

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        uploads_dir: config.storage.uploads_dir.clone(),
        body_limit: usize::try_from(config.storage.max_upload_size)
            .unwrap_or(usize::MAX)
            .saturating_add(BODY_LIMIT_HEADROOM),
    };

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}
