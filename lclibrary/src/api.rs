//! Handlers HTTP de la bibliothèque
//!
//! Chaque handler résout le chemin client, délègue le travail bloquant
//! (système de fichiers, archives, caches) à `spawn_blocking`, puis met en
//! forme la réponse.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use lcserver::{ErrorResponse, range};
use lcutils::media;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::{LibraryError, Result};
use crate::library::{Library, detect_platform, is_streamable};
use crate::models::{
    BookList, DirListing, MediaUrlResponse, RestartResponse, RootItem, StatusResponse,
};

/// Caractères laissés tels quels dans un segment d'URL
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const THUMBNAIL_CACHE_CONTROL: &str = "public, max-age=86400";

/// Exécute `f` sur un thread bloquant
async fn blocking<T, F>(library: Arc<Library>, f: F) -> Result<T>
where
    F: FnOnce(&Library) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&library))
        .await
        .map_err(|e| LibraryError::Internal(format!("blocking task failed: {}", e)))?
}

fn range_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::RANGE).and_then(|v| v.to_str().ok())
}

/// Liste les racines configurées
#[utoipa::path(
    get,
    path = "/api/roots",
    responses(
        (status = 200, description = "Configured roots", body = [RootItem])
    ),
    tag = "library"
)]
pub async fn list_roots(State(library): State<Arc<Library>>) -> Json<Vec<RootItem>> {
    let roots = library
        .registry()
        .roots()
        .iter()
        .map(|root| RootItem {
            name: root.name.clone(),
            path: root.path.to_string_lossy().into_owned(),
        })
        .collect();
    Json(roots)
}

/// Liste les racines existantes sous forme de répertoires
#[utoipa::path(
    get,
    path = "/api/dir/",
    responses(
        (status = 200, description = "Roots as directories", body = DirListing)
    ),
    tag = "library"
)]
pub async fn list_root_dir(State(library): State<Arc<Library>>) -> Result<Json<DirListing>> {
    let listing = blocking(library, |library| Ok(library.list_roots())).await?;
    Ok(Json(listing))
}

/// Liste un répertoire
#[utoipa::path(
    get,
    path = "/api/dir/{path}",
    params(("path" = String, Path, description = "Logical path: root name then sub path")),
    responses(
        (status = 200, description = "Directory content", body = DirListing),
        (status = 400, description = "Not a directory", body = ErrorResponse),
        (status = 403, description = "Path traversal", body = ErrorResponse),
        (status = 404, description = "Unknown root", body = ErrorResponse)
    ),
    tag = "library"
)]
pub async fn list_dir(
    State(library): State<Arc<Library>>,
    Path(path): Path<String>,
) -> Result<Json<DirListing>> {
    let listing = blocking(library, move |library| {
        let resolved = library.resolve(&path)?;
        library.list_dir(&resolved)
    })
    .await?;
    Ok(Json(listing))
}

/// Opération demandée sur une archive, selon le suffixe du chemin
#[derive(Debug, PartialEq, Eq)]
enum BookOp<'a> {
    List(&'a str),
    Thumbnail(&'a str),
    Image(&'a str, usize),
}

fn parse_book_op(rest: &str) -> Option<BookOp<'_>> {
    if let Some(path) = rest.strip_suffix("/list") {
        return Some(BookOp::List(path));
    }
    if let Some(path) = rest.strip_suffix("/thumbnail") {
        return Some(BookOp::Thumbnail(path));
    }
    let (path, index) = rest.rsplit_once("/image/")?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(BookOp::Image(path, index.parse().ok()?))
}

/// Archives : `/list`, `/thumbnail` et `/image/{index}`
#[utoipa::path(
    get,
    path = "/api/book/{path}",
    params(
        (
            "path" = String,
            Path,
            description = "Archive logical path followed by /list, /thumbnail or /image/{index}"
        )
    ),
    responses(
        (status = 200, description = "Page list (JSON) or image bytes"),
        (status = 404, description = "Archive, page or operation not found", body = ErrorResponse),
        (status = 500, description = "Archive could not be read", body = ErrorResponse)
    ),
    tag = "library"
)]
pub async fn book(
    State(library): State<Arc<Library>>,
    Path(rest): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let op = parse_book_op(&rest)
        .ok_or_else(|| LibraryError::NotFound(format!("book operation in {}", rest)))?;

    match op {
        BookOp::List(path) => {
            let path = path.to_string();
            let list = blocking(library, move |library| {
                let resolved = library.resolve(&path)?;
                let pages = library.book_pages(&resolved)?;
                let images: Vec<String> = pages.iter().map(|p| p.display.clone()).collect();
                Ok(BookList {
                    filename: resolved.file_name(),
                    count: images.len(),
                    images,
                    default_ltr: library.default_ltr(),
                })
            })
            .await?;
            Ok(Json(list).into_response())
        }
        BookOp::Image(path, index) => {
            let path = path.to_string();
            let (data, mime) = blocking(library, move |library| {
                let resolved = library.resolve(&path)?;
                library.book_page(&resolved, index)
            })
            .await?;
            Ok(range::serve_bytes(data, mime, range_header(&headers))?)
        }
        BookOp::Thumbnail(path) => {
            let path = path.to_string();
            let thumbnail = blocking(library, move |library| {
                let resolved = library.resolve(&path)?;
                library.thumbnail(&resolved)
            })
            .await?;

            let mut response = range::serve_bytes(thumbnail.data, thumbnail.mime, None)?;
            let headers = response.headers_mut();
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static(THUMBNAIL_CACHE_CONTROL),
            );
            headers.insert(
                "x-cache",
                HeaderValue::from_static(if thumbnail.hit { "HIT" } else { "MISS" }),
            );
            Ok(response)
        }
    }
}

/// Sert un fichier ordinaire, requêtes partielles comprises
#[utoipa::path(
    get,
    path = "/api/file/{path}",
    params(("path" = String, Path, description = "File logical path")),
    responses(
        (status = 200, description = "Whole file"),
        (status = 206, description = "Requested byte range"),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 416, description = "Range not satisfiable")
    ),
    tag = "library"
)]
pub async fn file(
    State(library): State<Arc<Library>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    serve_file(library, path, &headers, false).await
}

/// Comme `/api/file`, réservé aux fichiers vidéo et audio
#[utoipa::path(
    get,
    path = "/api/media/{path}",
    params(("path" = String, Path, description = "Media logical path")),
    responses(
        (status = 200, description = "Whole file"),
        (status = 206, description = "Requested byte range"),
        (status = 400, description = "Not a video or audio file", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 416, description = "Range not satisfiable")
    ),
    tag = "library"
)]
pub async fn media_file(
    State(library): State<Arc<Library>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    serve_file(library, path, &headers, true).await
}

async fn serve_file(
    library: Arc<Library>,
    path: String,
    headers: &HeaderMap,
    media_only: bool,
) -> Result<Response> {
    let resolved = blocking(library, move |library| {
        let resolved = library.resolve(&path)?;
        library.regular_file(&resolved)?;
        if media_only && !is_streamable(&resolved.full_path) {
            return Err(LibraryError::NotMedia(resolved.logical_path()));
        }
        Ok(resolved)
    })
    .await?;

    let mime = media::mime_type(&resolved.file_name());
    Ok(range::stream_file(&resolved.full_path, mime, range_header(headers)).await?)
}

fn encode_path(logical: &str) -> String {
    logical
        .split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// URL de lecture d'un média, via un lecteur externe si la plateforme en a un
#[utoipa::path(
    get,
    path = "/api/media-url/{path}",
    params(("path" = String, Path, description = "Media logical path")),
    responses(
        (status = 200, description = "URL to open", body = MediaUrlResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    tag = "library"
)]
pub async fn media_url(
    State(library): State<Arc<Library>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Json<MediaUrlResponse>> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost")
        .to_string();

    let response = blocking(library, move |library| {
        let resolved = library.resolve(&path)?;
        library.regular_file(&resolved)?;

        let file_url = format!(
            "http://{}/api/file/{}",
            host,
            encode_path(&resolved.logical_path())
        );

        let player = detect_platform(&user_agent)
            .and_then(|platform| library.player_for(platform, &resolved.file_name()));

        Ok(match player {
            Some(player) => {
                let encoded = utf8_percent_encode(&file_url, SEGMENT).to_string();
                MediaUrlResponse {
                    url: player.url.replace("{url}", &encoded),
                    custom: true,
                    name: Some(player.name.clone()),
                }
            }
            None => MediaUrlResponse {
                url: file_url,
                custom: false,
                name: None,
            },
        })
    })
    .await?;

    Ok(Json(response))
}

/// État du serveur et occupation des caches
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Server status", body = StatusResponse)
    ),
    tag = "library"
)]
pub async fn status(State(library): State<Arc<Library>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        name: "LiteComics".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        roots: library.registry().len(),
        page_list_cache: library.page_lists().stats(),
        thumbnail_cache: library.thumbnails().stats(),
    })
}

/// Demande le redémarrage du serveur avec la configuration relue
#[utoipa::path(
    post,
    path = "/api/restart",
    responses(
        (status = 200, description = "Restart scheduled or unsupported", body = RestartResponse)
    ),
    tag = "library"
)]
pub async fn restart(State(library): State<Arc<Library>>) -> Json<RestartResponse> {
    if library.request_restart() {
        tracing::info!("Restart requested through the API");
        Json(RestartResponse {
            status: "ok".to_string(),
            message: None,
        })
    } else {
        Json(RestartResponse {
            status: "restart_not_supported".to_string(),
            message: Some("Please restart the server manually".to_string()),
        })
    }
}

/// Crée le router de la bibliothèque ; les routes portent leur chemin complet
pub fn create_router(library: Arc<Library>) -> Router {
    let mut router = Router::new()
        .route("/api/roots", get(list_roots))
        .route("/api/dir", get(list_root_dir))
        .route("/api/dir/", get(list_root_dir))
        .route("/api/dir/{*path}", get(list_dir))
        .route("/api/book/{*rest}", get(book))
        .route("/api/file/{*path}", get(file))
        .route("/api/media/{*path}", get(media_file))
        .route("/api/media-url/{*path}", get(media_url))
        .route("/api/status", get(status));

    if library.restart_enabled() {
        router = router.route("/api/restart", post(restart));
    }

    router.with_state(library)
}
