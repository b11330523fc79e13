//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 上传文件的对外访问前缀
pub const UPLOADS_ROUTE: &str = "/uploads";

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 静态文件目录（挂载到 `/uploads`）
    pub uploads_dir: PathBuf,
    /// 请求体大小上限（字节）
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            uploads_dir: PathBuf::from("./uploads"),
            body_limit: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    pub fn build_router(&self) -> Router {
        build_router(&self.config, self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        info!(addr = %addr, "Starting HTTP server (with graceful shutdown)");

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

/// 组装路由与中间件
pub fn build_router(config: &ServerConfig, state: Arc<AppState>) -> Router {
    // CORS 配置 - 允许所有来源的跨域请求
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    // 上传的图片经由 multipart 进入，请求体上限来自配置
    create_routes(state.clone())
        .nest_service(UPLOADS_ROUTE, ServeDir::new(&config.uploads_dir))
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(middleware::from_fn(error_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::infrastructure::adapters::FileImageStorage;
    use crate::infrastructure::auth::{Role, TokenService};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteChapterRepository,
        SqliteNovelRepository, SqlitePartRepository,
    };

    const SECRET: &str = "router-test-secret";

    struct TestApp {
        router: Router,
        admin: String,
        reader: String,
        _uploads: TempDir,
    }

    impl TestApp {
        async fn new() -> Self {
            let uploads = TempDir::new().unwrap();
            let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
            run_migrations(&pool).await.unwrap();

            let storage = FileImageStorage::new(uploads.path(), UPLOADS_ROUTE, 1024)
                .await
                .unwrap();
            let tokens = Arc::new(TokenService::new(SECRET, 3600));
            let admin = tokens.issue("editor", Role::Admin).unwrap();
            let reader = tokens.issue("reader", Role::User).unwrap();

            let state = AppState::new(
                Arc::new(SqliteNovelRepository::new(pool.clone())),
                Arc::new(SqliteChapterRepository::new(pool.clone())),
                Arc::new(SqlitePartRepository::new(pool)),
                Arc::new(storage),
                tokens,
            );
            let config = ServerConfig {
                uploads_dir: uploads.path().to_path_buf(),
                body_limit: 64 * 1024,
                ..ServerConfig::default()
            };

            Self {
                router: build_router(&config, Arc::new(state)),
                admin,
                reader,
                _uploads: uploads,
            }
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, body)
        }

        async fn get(&self, uri: &str) -> (StatusCode, Value) {
            self.send(Request::get(uri).body(Body::empty()).unwrap()).await
        }

        async fn write(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", self.admin))
                .body(Body::from(body.to_string()))
                .unwrap();
            self.send(request).await
        }

        async fn delete(&self, uri: &str) -> (StatusCode, Value) {
            let request = Request::delete(uri)
                .header("authorization", format!("Bearer {}", self.admin))
                .body(Body::empty())
                .unwrap();
            self.send(request).await
        }

        async fn novel(&self, title: &str) -> String {
            let (status, body) = self
                .write(Method::POST, "/api/novels", json!({ "title": title }))
                .await;
            assert_eq!(status, StatusCode::CREATED);
            body["id"].as_str().unwrap().to_string()
        }

        async fn chapter(&self, novel_id: &str, kind: &str, order: u32) -> String {
            let (status, body) = self
                .write(
                    Method::POST,
                    "/api/chapters",
                    json!({
                        "novelId": novel_id,
                        "title": format!("{} {}", kind, order),
                        "type": kind,
                        "order": order,
                    }),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{}", body);
            body["id"].as_str().unwrap().to_string()
        }

        async fn part(&self, chapter_id: &str, title: &str) -> String {
            let (status, body) = self
                .write(
                    Method::POST,
                    "/api/parts",
                    json!({ "chapterId": chapter_id, "title": title, "content": "<p>one two three</p>" }),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{}", body);
            body["id"].as_str().unwrap().to_string()
        }

        async fn part_titles(&self, chapter_id: &str) -> Vec<(String, u64)> {
            let (status, body) = self.get(&format!("/api/parts/chapter/{}", chapter_id)).await;
            assert_eq!(status, StatusCode::OK);
            body.as_array()
                .unwrap()
                .iter()
                .map(|p| {
                    (
                        p["title"].as_str().unwrap().to_string(),
                        p["order"].as_u64().unwrap(),
                    )
                })
                .collect()
        }
    }

    #[tokio::test]
    async fn test_ping_is_public() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/api/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_writes_require_admin_token() {
        let app = TestApp::new().await;
        let payload = json!({ "title": "Gated" }).to_string();

        let anonymous = Request::post("/api/novels")
            .header("content-type", "application/json")
            .body(Body::from(payload.clone()))
            .unwrap();
        let (status, body) = app.send(anonymous).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["message"].is_string());

        let reader = Request::post("/api/novels")
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", app.reader))
            .body(Body::from(payload))
            .unwrap();
        let (status, _) = app.send(reader).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app.get("/api/novels").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_novel_lifecycle() {
        let app = TestApp::new().await;
        let novel_id = app.novel("Harbor Lights").await;

        let (status, body) = app
            .write(
                Method::PUT,
                &format!("/api/novels/{}", novel_id),
                json!({ "description": "A coastal saga" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Harbor Lights");
        assert_eq!(body["description"], "A coastal saga");

        let (status, _) = app
            .write(Method::POST, "/api/novels", json!({ "title": "  " }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app.get("/api/novels/not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_novel_detail_groups_chapters_by_type() {
        let app = TestApp::new().await;
        let novel_id = app.novel("Harbor Lights").await;
        let second = app.chapter(&novel_id, "main", 2).await;
        let first = app.chapter(&novel_id, "main", 1).await;
        let side = app.chapter(&novel_id, "side", 1).await;
        app.part(&first, "Opening").await;

        let (status, body) = app.get(&format!("/api/novels/{}", novel_id)).await;
        assert_eq!(status, StatusCode::OK);

        let chapters = body["chapters"].as_array().unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0]["id"], first.as_str());
        assert_eq!(chapters[1]["id"], second.as_str());
        assert_eq!(chapters[0]["parts"].as_array().unwrap().len(), 1);
        assert_eq!(body["sideStories"][0]["id"], side.as_str());
    }

    #[tokio::test]
    async fn test_duplicate_chapter_position_rejected() {
        let app = TestApp::new().await;
        let novel_id = app.novel("Harbor Lights").await;
        app.chapter(&novel_id, "main", 2).await;

        let (status, _) = app
            .write(
                Method::POST,
                "/api/chapters",
                json!({ "novelId": novel_id, "title": "Again", "type": "main", "order": 2 }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .write(
                Method::POST,
                "/api/chapters",
                json!({ "novelId": novel_id, "title": "No order", "type": "main" }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Order is required");

        let (status, body) = app
            .write(
                Method::POST,
                "/api/chapters",
                json!({ "novelId": novel_id, "title": "No type", "order": 3 }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Type is required");

        let (status, _) = app
            .write(
                Method::POST,
                "/api/chapters",
                json!({ "novelId": novel_id, "title": "Bad type", "type": "epilogue", "order": 3 }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, chapters) = app.get(&format!("/api/chapters/novel/{}", novel_id)).await;
        assert_eq!(chapters.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_chapter_includes_parts() {
        let app = TestApp::new().await;
        let novel_id = app.novel("Harbor Lights").await;
        let with_parts = app.chapter(&novel_id, "main", 1).await;
        let a = app.part(&with_parts, "A").await;
        let b = app.part(&with_parts, "B").await;

        let (status, body) = app.get(&format!("/api/chapters/{}", with_parts)).await;
        assert_eq!(status, StatusCode::OK);
        let parts = body["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["id"], a.as_str());
        assert_eq!(parts[1]["id"], b.as_str());

        let (status, body) = app
            .write(
                Method::POST,
                "/api/chapters",
                json!({
                    "novelId": novel_id,
                    "title": "Interlude",
                    "type": "side",
                    "order": 1,
                    "hasParts": false,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let flat = body["id"].as_str().unwrap().to_string();

        let (status, body) = app.get(&format!("/api/chapters/{}", flat)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hasParts"], false);
        assert!(body.get("parts").is_none());
    }

    #[tokio::test]
    async fn test_chapter_navigation() {
        let app = TestApp::new().await;
        let novel_id = app.novel("Harbor Lights").await;
        let first = app.chapter(&novel_id, "main", 1).await;
        let third = app.chapter(&novel_id, "main", 3).await;
        app.chapter(&novel_id, "side", 2).await;

        let (status, body) = app.get(&format!("/api/chapters/next/{}", first)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], third.as_str());

        let (status, body) = app.get(&format!("/api/chapters/previous/{}", third)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], first.as_str());

        let (status, body) = app.get(&format!("/api/chapters/next/{}", third)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No next chapter found");
    }

    #[tokio::test]
    async fn test_part_reordering_over_http() {
        let app = TestApp::new().await;
        let novel_id = app.novel("Harbor Lights").await;
        let chapter_id = app.chapter(&novel_id, "main", 1).await;
        app.part(&chapter_id, "A").await;
        let b = app.part(&chapter_id, "B").await;
        app.part(&chapter_id, "C").await;

        let (status, body) = app
            .write(
                Method::PUT,
                &format!("/api/parts/{}", b),
                json!({ "title": "B", "content": "<p>b</p>", "order": 3 }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["order"], 3);
        assert_eq!(
            app.part_titles(&chapter_id).await,
            vec![("A".to_string(), 1), ("C".to_string(), 2), ("B".to_string(), 3)]
        );

        let (status, _) = app
            .write(
                Method::PUT,
                &format!("/api/parts/{}", b),
                json!({ "title": "B", "content": "<p>b</p>", "order": 9 }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app.delete(&format!("/api/parts/{}", b)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            app.part_titles(&chapter_id).await,
            vec![("A".to_string(), 1), ("C".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn test_part_reader_view() {
        let app = TestApp::new().await;
        let novel_id = app.novel("Harbor Lights").await;
        let first = app.chapter(&novel_id, "main", 1).await;
        let second = app.chapter(&novel_id, "main", 2).await;
        let a = app.part(&first, "A").await;
        let b = app.part(&first, "B").await;

        let (status, body) = app.get(&format!("/api/parts/{}/reader", a)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["part"]["id"], a.as_str());
        assert_eq!(body["chapter"]["id"], first.as_str());
        assert_eq!(body["previousPart"], Value::Null);
        assert_eq!(body["nextPart"]["id"], b.as_str());
        assert_eq!(body["previousChapter"], Value::Null);
        assert_eq!(body["nextChapter"]["id"], second.as_str());
        assert_eq!(body["wordCount"], 3);
    }

    #[tokio::test]
    async fn test_delete_novel_cascades() {
        let app = TestApp::new().await;
        let novel_id = app.novel("Harbor Lights").await;
        let chapter_id = app.chapter(&novel_id, "main", 1).await;
        let part_id = app.part(&chapter_id, "A").await;

        let (status, _) = app.delete(&format!("/api/novels/{}", novel_id)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app.get(&format!("/api/chapters/{}", chapter_id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.get(&format!("/api/parts/{}", part_id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.delete(&format!("/api/novels/{}", novel_id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cleanup_with_nothing_orphaned() {
        let app = TestApp::new().await;
        let (status, body) = app
            .write(Method::POST, "/api/maintenance/orphaned-parts/cleanup", json!({}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deletedCount"], 0);
    }

    #[tokio::test]
    async fn test_upload_then_serve_image() {
        let app = TestApp::new().await;
        let boundary = "novelist-boundary";
        let payload = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"cover.PNG\"\r\nContent-Type: image/png\r\n\r\nfake-png\r\n--{b}--\r\n",
            b = boundary
        );
        let request = Request::post("/api/upload/image")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .header("authorization", format!("Bearer {}", app.admin))
            .body(Body::from(payload))
            .unwrap();

        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        let url = body["imageUrl"].as_str().unwrap().to_string();
        assert!(url.starts_with("/uploads/image-"));
        assert!(url.ends_with(".png"));

        let response = app
            .router
            .clone()
            .oneshot(Request::get(&url).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"fake-png");
    }
}
