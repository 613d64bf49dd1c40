mod handlers;
mod routes;


use axum::Router;
use std::{path::PathBuf, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{posts::PostService, Config};

pub struct AppState {
    pub posts: PostService,
    pub page_size: usize,
    pub max_page_size: usize,
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(posts: PostService) -> Arc<Self> {
        Arc::new(Self {
            posts,
            page_size: 6,
            max_page_size: 100,
            static_dir: None,
        })
    }

    pub fn from_config(posts: PostService, config: &Config) -> Arc<Self> {
        Arc::new(Self {
            posts,
            page_size: config.page_size,
            max_page_size: config.max_page_size,
            static_dir: config.static_dir.clone(),
        })
    }
}

/// The full application: API routes, the optional single-page app bundle,
/// and the tracing and CORS layers.
pub fn app(state: Arc<AppState>) -> Router {
    let mut router = Router::new().merge(routes::create_routes());

    if let Some(dir) = &state.static_dir {
        let index = ServeFile::new(dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(dir).fallback(index));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(addr: String, state: Arc<AppState>) -> crate::Result<()> {
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::Error::Internal(e.to_string()))?;

    Ok(())
}
