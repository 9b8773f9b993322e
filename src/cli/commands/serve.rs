//! HTTP API server for the browser frontend.
//!
//! Exposes the reconciler, exporter and list state over REST. List
//! mutations persist the state file before responding; the sync and
//! save endpoints share one library-level lock so two reconciliation
//! passes never interleave on the same folders.

use crate::archive::{build_archive, ArchiveQuote};
use crate::audio::{ClipSource, Fetcher, WikiClipSource};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::BattlecryError;
use crate::library::{Library, QuoteFile, SaveReport, SyncReport};
use crate::lists::{canonical_hooks, Hook, ListCollection, ListStore, Recommendation};
use crate::manifest::{ManifestBuilder, ManifestEntry, LIBRARY_FOLDERS};
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::io::ReaderStream;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Shared application state.
struct AppState {
    settings: Settings,
    fetcher: Fetcher,
    source: Arc<dyn ClipSource>,
    library: Library,
    store: ListStore,
    lists: Mutex<ListCollection>,
    /// Serializes reconciliation passes; concurrent passes over the
    /// same folder are an unguarded last-writer-wins race otherwise.
    library_lock: Mutex<()>,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<&str>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host
        .map(str::to_string)
        .unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let store = ListStore::new(settings.state_path());
    let collection = store.load(canonical_hooks())?;

    let fetcher = Fetcher::new(&settings.fetch)?;
    let source: Arc<dyn ClipSource> = Arc::new(WikiClipSource::new(&settings)?);
    let library = Library::new(settings.sounds_dir(), source.clone());

    std::fs::create_dir_all(settings.temp_dir())?;

    let state = Arc::new(AppState {
        settings,
        fetcher,
        source,
        library,
        store,
        lists: Mutex::new(collection),
        library_lock: Mutex::new(()),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/audio", get(audio_proxy))
        .route("/api/download", get(download))
        .route("/api/download-batch", post(download_batch))
        .route("/api/save-to-sounds", post(save_to_sounds))
        .route("/api/save-to-sounds-all", post(save_to_sounds_all))
        .route("/api/sync", post(sync_active_list))
        .route("/api/sounds-info", get(sounds_info))
        .route("/api/lists", get(get_lists).post(create_list))
        .route("/api/lists/{id}", delete(delete_list).patch(rename_list))
        .route("/api/lists/{id}/activate", post(activate_list))
        .route("/api/import", post(import_hooks))
        .route(
            "/api/hooks/{hook}/recommendations",
            post(add_recommendation).delete(remove_recommendation),
        )
        .route("/api/hooks/{hook}/reorder", post(reorder_recommendations))
        .route("/api/recommendations/move", post(move_recommendation))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Battlecry API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET    /api/health");
    Output::kv("Audio proxy", "GET    /api/audio?url=...");
    Output::kv("Download", "GET    /api/download?url=...&filename=...");
    Output::kv("Batch archive", "POST   /api/download-batch");
    Output::kv("Scoped save", "POST   /api/save-to-sounds");
    Output::kv("Full sync", "POST   /api/save-to-sounds-all");
    Output::kv("Sync active list", "POST   /api/sync");
    Output::kv("Sounds info", "GET    /api/sounds-info");
    Output::kv("Lists", "GET    /api/lists");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AudioParams {
    url: Option<String>,
}

#[derive(Deserialize)]
struct DownloadParams {
    url: Option<String>,
    filename: Option<String>,
}

#[derive(Deserialize)]
struct BatchRequest {
    #[serde(default)]
    quotes: Vec<ArchiveQuote>,
}

#[derive(Deserialize)]
struct SaveRequest {
    folder: Option<String>,
    #[serde(default)]
    quotes: Vec<QuoteFile>,
}

#[derive(Deserialize)]
struct SyncRequest {
    #[serde(default)]
    quotes: Vec<ManifestEntry>,
}

#[derive(Deserialize)]
struct NameRequest {
    name: Option<String>,
}

#[derive(Deserialize)]
struct ImportRequest {
    #[serde(default)]
    hooks: Vec<Hook>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoveParams {
    source_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderRequest {
    old_index: usize,
    new_index: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveRequest {
    from_hook: String,
    to_hook: String,
    recommendation: Recommendation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveResponse {
    success: bool,
    target_dir: String,
    saved: usize,
    failed: usize,
    details: SaveReport,
}

#[derive(Serialize)]
struct SyncResponse {
    success: bool,
    saved: usize,
    skipped: usize,
    deleted: usize,
    failed: usize,
    details: SyncReport,
}

#[derive(Serialize)]
struct FolderInfo {
    name: String,
    path: String,
    exists: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SoundsInfoResponse {
    base_dir: String,
    folders: Vec<FolderInfo>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn error_response(err: BattlecryError) -> Response {
    let status = if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

fn sync_response(report: SyncReport) -> Response {
    Json(SyncResponse {
        success: true,
        saved: report.saved.len(),
        skipped: report.skipped.len(),
        deleted: report.deleted.len(),
        failed: report.failed.len(),
        details: report,
    })
    .into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Raw passthrough of remote audio for in-browser preview. No
/// transcoding; a failed remote fetch surfaces as not-found.
async fn audio_proxy(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AudioParams>,
) -> Response {
    let Some(url) = params.url else {
        return bad_request("URL parameter is required");
    };

    match state.fetcher.fetch(&url).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "audio/ogg"),
                (header::ACCEPT_RANGES, "bytes"),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            warn!("Audio proxy failed for {}: {}", url, e);
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Audio not found".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Single transcoded download with a suggested filename.
async fn download(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let Some(url) = params.url else {
        return bad_request("URL parameter is required");
    };
    let filename = params.filename.unwrap_or_else(|| "audio.mp3".to_string());

    match state.source.fetch_clip(&url).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "audio/mpeg".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Batch export: builds the archive into a staging file under the temp
/// directory and streams it out, so the full archive never sits in memory.
async fn download_batch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> Response {
    if req.quotes.is_empty() {
        return bad_request("No quotes provided");
    }

    let staging = match tempfile::Builder::new()
        .prefix("battlecry-batch-")
        .suffix(".zip")
        .tempfile_in(state.settings.temp_dir())
    {
        Ok(file) => file,
        Err(e) => return error_response(e.into()),
    };

    if let Err(e) = build_archive(state.source.as_ref(), &req.quotes, staging.path()).await {
        return error_response(e);
    }

    // The open handle outlives the staging guard, so the unlinked file
    // stays readable for the whole stream.
    let file = match tokio::fs::File::open(staging.path()).await {
        Ok(file) => file,
        Err(e) => return error_response(e.into()),
    };

    let body = Body::from_stream(ReaderStream::new(file));
    (
        [
            (header::CONTENT_TYPE, "application/zip"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"battlecry-quotes.zip\"",
            ),
        ],
        body,
    )
        .into_response()
}

/// Scoped save: force-overwrite a selection into one folder.
async fn save_to_sounds(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveRequest>,
) -> Response {
    let Some(folder) = req.folder else {
        return bad_request(&format!(
            "Invalid folder. Must be one of: {}",
            LIBRARY_FOLDERS.join(", ")
        ));
    };

    let _guard = state.library_lock.lock().await;
    match state.library.save_to_folder(&folder, &req.quotes).await {
        Ok(report) => Json(SaveResponse {
            success: true,
            target_dir: report.target_dir.display().to_string(),
            saved: report.saved.len(),
            failed: report.failed.len(),
            details: report,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// Full sync from an explicit manifest.
async fn save_to_sounds_all(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SyncRequest>,
) -> Response {
    if req.quotes.is_empty() {
        return bad_request("No quotes provided");
    }

    let _guard = state.library_lock.lock().await;
    match state.library.sync_all(&req.quotes).await {
        Ok(report) => sync_response(report),
        Err(e) => error_response(e),
    }
}

/// Full sync from the active list: the manifest is derived server-side.
async fn sync_active_list(State(state): State<Arc<AppState>>) -> Response {
    let manifest = {
        let lists = state.lists.lock().await;
        match lists.active_list() {
            Some(active) => ManifestBuilder::new().build(active),
            None => return error_response(BattlecryError::State("no lists in state".into())),
        }
    };

    let _guard = state.library_lock.lock().await;
    match state.library.sync_all(&manifest).await {
        Ok(report) => sync_response(report),
        Err(e) => error_response(e),
    }
}

async fn sounds_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let base = state.settings.sounds_dir();
    let folders = LIBRARY_FOLDERS
        .iter()
        .map(|name| {
            let path = base.join(name);
            FolderInfo {
                name: name.to_string(),
                path: path.display().to_string(),
                exists: path.exists(),
            }
        })
        .collect();

    Json(SoundsInfoResponse {
        base_dir: base.display().to_string(),
        folders,
    })
}

// === List state handlers ===

/// Apply a pure transition to the collection, persist it, then publish
/// it to the in-memory copy.
async fn apply_transition(
    state: &AppState,
    transition: impl FnOnce(&ListCollection) -> ListCollection,
) -> Result<ListCollection, BattlecryError> {
    let mut lists = state.lists.lock().await;
    let next = transition(&lists);
    state.store.save(&next)?;
    *lists = next.clone();
    Ok(next)
}

async fn get_lists(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let lists = state.lists.lock().await;
    Json(lists.clone())
}

async fn create_list(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NameRequest>,
) -> Response {
    let Some(name) = req.name.filter(|n| !n.trim().is_empty()) else {
        return bad_request("Name is required");
    };

    match apply_transition(&state, |c| c.create_list(&name)).await {
        Ok(next) => Json(next).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_list(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match apply_transition(&state, |c| c.delete_list(&id)).await {
        Ok(next) => Json(next).into_response(),
        Err(e) => error_response(e),
    }
}

async fn rename_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<NameRequest>,
) -> Response {
    let Some(name) = req.name.filter(|n| !n.trim().is_empty()) else {
        return bad_request("Name is required");
    };

    match apply_transition(&state, |c| c.rename_list(&id, &name)).await {
        Ok(next) => Json(next).into_response(),
        Err(e) => error_response(e),
    }
}

async fn activate_list(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match apply_transition(&state, |c| c.set_active_list(&id)).await {
        Ok(next) => Json(next).into_response(),
        Err(e) => error_response(e),
    }
}

/// Legacy import: replaces the active list's hooks wholesale.
async fn import_hooks(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImportRequest>,
) -> Response {
    if req.hooks.is_empty() {
        return bad_request("No hooks provided");
    }

    match apply_transition(&state, |c| c.import_hooks(&req.hooks)).await {
        Ok(next) => Json(next).into_response(),
        Err(e) => error_response(e),
    }
}

async fn add_recommendation(
    State(state): State<Arc<AppState>>,
    Path(hook): Path<String>,
    Json(rec): Json<Recommendation>,
) -> Response {
    match apply_transition(&state, |c| c.add_recommendation(&hook, &rec)).await {
        Ok(next) => Json(next).into_response(),
        Err(e) => error_response(e),
    }
}

async fn remove_recommendation(
    State(state): State<Arc<AppState>>,
    Path(hook): Path<String>,
    Query(params): Query<RemoveParams>,
) -> Response {
    let Some(source_url) = params.source_url else {
        return bad_request("sourceUrl parameter is required");
    };

    match apply_transition(&state, |c| c.remove_recommendation(&hook, &source_url)).await {
        Ok(next) => Json(next).into_response(),
        Err(e) => error_response(e),
    }
}

async fn reorder_recommendations(
    State(state): State<Arc<AppState>>,
    Path(hook): Path<String>,
    Json(req): Json<ReorderRequest>,
) -> Response {
    match apply_transition(&state, |c| {
        c.reorder_recommendations(&hook, req.old_index, req.new_index)
    })
    .await
    {
        Ok(next) => Json(next).into_response(),
        Err(e) => error_response(e),
    }
}

async fn move_recommendation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoveRequest>,
) -> Response {
    match apply_transition(&state, |c| {
        c.move_recommendation(&req.from_hook, &req.to_hook, &req.recommendation)
    })
    .await
    {
        Ok(next) => Json(next).into_response(),
        Err(e) => error_response(e),
    }
}
