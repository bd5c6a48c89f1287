#![forbid(unsafe_code)]

//! axum HTTP surface of the labeler: JSON endpoints over the project store,
//! generic directory endpoints over the storage tree, server-rendered pages
//! and the request tracing and CORS middleware.

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use axum::Router;
use bijux_labeler_store::{FsProjectStore, ProjectStore, StoreError, TreeAccessor};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod config;
mod http;
mod middleware;

pub use config::{
    parse_origin_list, ServerConfig, DEFAULT_BIND_ADDR, DEFAULT_CORS_ORIGIN, DEFAULT_DATA_ROOT,
};

pub const CRATE_NAME: &str = "bijux-labeler-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProjectStore>,
    pub tree: Arc<TreeAccessor>,
    pub config: Arc<ServerConfig>,
    pub request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn ProjectStore>, tree: Arc<TreeAccessor>, config: ServerConfig) -> Self {
        Self {
            store,
            tree,
            config: Arc::new(config),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Opens the filesystem store under `config.data_root`, creating the root
    /// and its `projects/` directory when absent.
    pub fn open(config: ServerConfig) -> Result<Self, StoreError> {
        let store = FsProjectStore::open(&config.data_root, config.conflict_policy)?;
        let tree = Arc::new(store.tree().clone());
        Ok(Self::new(Arc::new(store), tree, config))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::pages::index_handler))
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/openapi.json", get(http::handlers::openapi_handler))
        .route("/directory", get(http::tree_endpoints::directory_handler))
        .route("/images", get(http::tree_endpoints::image_bytes_handler))
        .route("/mkdir", post(http::tree_endpoints::mkdir_handler))
        .route("/rmdir", delete(http::tree_endpoints::rmdir_handler))
        .route("/rename", put(http::tree_endpoints::rename_handler))
        .route("/upload", post(http::upload::upload_handler))
        .route("/move", put(http::handlers::move_image_handler))
        .route("/delete", delete(http::handlers::delete_image_handler))
        .route("/project/create", post(http::handlers::create_project_handler))
        .route("/project/:projectName", get(http::pages::project_page_handler))
        .route(
            "/project/:projectName/labels",
            get(http::handlers::project_labels_handler),
        )
        .route(
            "/project/:projectName/images",
            get(http::handlers::project_images_handler),
        )
        .route(
            "/project/:projectName/thumbnail",
            get(http::handlers::project_thumbnail_handler),
        )
        .route("/label/create", post(http::handlers::create_label_handler))
        .route("/label/delete", delete(http::handlers::delete_label_handler))
        .layer(from_fn_with_state(state.clone(), middleware::cors::cors_middleware))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}
