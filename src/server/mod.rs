//! HTTP server: renders pages on every request, optional live reload

use anyhow::Result;
use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{listing, RenderPipeline};
use crate::helpers::inject_before_body_end;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
"#;

/// Everything derived from `_config.yml`
pub struct Site {
    config: SiteConfig,
    pipeline: RenderPipeline,
    templates: TemplateRenderer,
    static_dir: PathBuf,
}

impl Site {
    fn load(blog: &Blog) -> Result<Self> {
        Ok(Self {
            config: blog.config.clone(),
            pipeline: blog.pipeline()?,
            templates: TemplateRenderer::new(&blog.config)?,
            static_dir: blog.static_dir.clone(),
        })
    }
}

/// Shared server state. The site is replaced whole when the config changes;
/// each request works on the snapshot it loaded.
pub struct AppState {
    site: ArcSwap<Site>,
    base_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl AppState {
    pub fn new(blog: &Blog, live_reload: bool) -> Result<Self> {
        let (reload_tx, _) = broadcast::channel::<()>(16);
        Ok(Self {
            site: ArcSwap::from_pointee(Site::load(blog)?),
            base_dir: blog.base_dir.clone(),
            reload_tx,
            live_reload,
        })
    }

    fn site(&self) -> Arc<Site> {
        self.site.load_full()
    }

    /// Re-read `_config.yml`. On error the current site keeps serving.
    pub fn reload_config(&self) -> Result<()> {
        let blog = Blog::new(&self.base_dir)?;
        self.site.store(Arc::new(Site::load(&blog)?));
        tracing::info!("Reloaded {}", crate::CONFIG_FILE);
        Ok(())
    }
}

/// Routes of the blog
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/blogpost/:slug", get(post_handler));
    if state.live_reload {
        app = app.route("/__livereload", get(livereload_handler));
    }
    app.fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let state = Arc::new(AppState::new(blog, watch)?);

    let posts = blog.listing();
    for post in listing::dangling_entries(&posts, &blog.loader()) {
        tracing::warn!(
            "Listing entry {:?} points to /blogpost/{} but there is no content file for it",
            post.title,
            post.slug
        );
    }

    let app = router(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let paths = WatchPaths::new(blog);
        let state = state.clone();

        // The debouncer delivers on a std channel, so block on it off the runtime
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(&paths, &state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// What the dev server watches
struct WatchPaths {
    content_dir: PathBuf,
    static_dir: PathBuf,
    base_dir: PathBuf,
    config_path: PathBuf,
}

impl WatchPaths {
    fn new(blog: &Blog) -> Self {
        Self {
            content_dir: blog.content_dir.clone(),
            static_dir: blog.static_dir.clone(),
            base_dir: blog.base_dir.clone(),
            config_path: blog.config_path(),
        }
    }

    fn is_config(&self, path: &std::path::Path) -> bool {
        path == self.config_path
    }

    fn is_relevant(&self, path: &std::path::Path) -> bool {
        let path_str = path.to_string_lossy();
        if path_str.contains(".git") || path_str.contains(".DS_Store") || path_str.ends_with('~')
        {
            return false;
        }
        self.is_config(path)
            || path.starts_with(&self.content_dir)
            || path.starts_with(&self.static_dir)
    }
}

/// Watch content, static files and `_config.yml`, and tell connected
/// browsers to reload.
///
/// Pages render per request, so only a config edit rebuilds anything.
fn watch_and_reload(paths: &WatchPaths, state: &AppState) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&paths.content_dir, &paths.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }
    // Editors often replace the file on save, so watch its directory
    debouncer
        .watcher()
        .watch(&paths.base_dir, RecursiveMode::NonRecursive)?;

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| paths.is_relevant(&e.path))
                    .collect();

                if relevant.is_empty() {
                    continue;
                }
                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }
                if relevant.iter().any(|e| paths.is_config(&e.path)) {
                    if let Err(e) = state.reload_config() {
                        tracing::error!("Keeping previous config: {}", e);
                    }
                }
                // No receivers just means no open browser tabs
                let _ = state.reload_tx.send(());
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Home page
async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    let rendered = {
        let state = state.clone();
        tokio::task::spawn_blocking(move || {
            let site = state.site();
            let posts = listing::listing_posts(&site.config.listing, site.pipeline.loader());
            site.templates.render_index(&posts)
        })
        .await
    };

    match rendered {
        Ok(Ok(html)) => html_response(&state, StatusCode::OK, html),
        Ok(Err(e)) => {
            tracing::error!("Failed to render home page: {}", e);
            server_error()
        }
        Err(e) => {
            tracing::error!("Home page task failed: {}", e);
            server_error()
        }
    }
}

/// Post detail page
async fn post_handler(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let rendered = {
        let state = state.clone();
        tokio::task::spawn_blocking(move || {
            let site = state.site();
            let page = site.pipeline.render_post(&slug).ok()?;
            let meta = site.pipeline.post_metadata(&slug);
            Some(site.templates.render_post(&meta, &page))
        })
        .await
    };

    match rendered {
        Ok(Some(Ok(html))) => html_response(&state, StatusCode::OK, html),
        Ok(None) => not_found(&state),
        Ok(Some(Err(e))) => {
            tracing::error!("Failed to render post page: {}", e);
            not_found(&state)
        }
        Err(e) => {
            tracing::error!("Post render task failed: {}", e);
            not_found(&state)
        }
    }
}

/// Static files, then the not-found page
async fn fallback_handler(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Response {
    let static_dir = state.site().static_dir.clone();
    if static_dir.is_dir() {
        let mut service = ServeDir::new(&static_dir);
        match service.try_call(request).await {
            Ok(response) if response.status() != StatusCode::NOT_FOUND => {
                return response.into_response();
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Static file error: {}", e);
                return server_error();
            }
        }
    }
    not_found(&state)
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

fn html_response(state: &AppState, status: StatusCode, html: String) -> Response {
    let html = if state.live_reload {
        inject_before_body_end(&html, LIVE_RELOAD_SCRIPT)
    } else {
        html
    };
    (status, Html(html)).into_response()
}

fn not_found(state: &AppState) -> Response {
    match state.site().templates.render_not_found() {
        Ok(html) => html_response(state, StatusCode::NOT_FOUND, html),
        Err(e) => {
            tracing::error!("Failed to render not-found page: {}", e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
