mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use common::{PAGE_1, PAGE_2, PAGE_10, build_library, fixture, movie_bytes};
use lclibrary::api::create_router;
use serde_json::Value;
use tower::ServiceExt;

async fn send(router: Router, request: Request<Body>) -> Response {
    router.oneshot(request).await.unwrap()
}

async fn get(router: Router, uri: &str) -> Response {
    send(router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn header_str(response: &Response, name: &str) -> String {
    response.headers()[name].to_str().unwrap().to_string()
}

#[tokio::test]
async fn test_roots() {
    let fx = fixture();
    let response = get(fx.router(), "/api/roots").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Comics", "Videos"]);
}

#[tokio::test]
async fn test_root_dir_lists_existing_roots() {
    let fx = fixture();
    std::fs::remove_dir(fx.dir.path().join("videos")).unwrap();

    let json = body_json(get(fx.router(), "/api/dir/").await).await;
    let files = json["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "Comics");
    assert_eq!(files[0]["path"], "Comics");
    assert_eq!(files[0]["type"], "directory");
}

#[tokio::test]
async fn test_dir_listing_order_and_types() {
    let fx = fixture();
    let response = get(fx.router(), "/api/dir/Comics").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["rootName"], "Comics");
    assert_eq!(json["relativePath"], "");

    let files = json["files"].as_array().unwrap();
    let listed: Vec<(&str, &str)> = files
        .iter()
        .map(|f| (f["name"].as_str().unwrap(), f["type"].as_str().unwrap()))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("Series", "directory"),
            ("broken.cbz", "book"),
            ("cover.jpg", "image"),
            ("empty.cbz", "book"),
            ("movie.mp4", "video"),
            ("notes.txt", "file"),
            ("song.mp3", "audio"),
        ]
    );
    assert_eq!(files[0]["path"], "Comics/Series");
    assert_eq!(files[4]["size"], 1000);
    assert!(files[4]["modified"].is_string());
}

#[tokio::test]
async fn test_dir_listing_nested_path() {
    let fx = fixture();
    let json = body_json(get(fx.router(), "/api/dir/Comics/Series").await).await;
    assert_eq!(json["relativePath"], "Series");
    assert_eq!(json["files"][0]["path"], "Comics/Series/Tome 01.cbz");
}

#[tokio::test]
async fn test_dir_errors() {
    let fx = fixture();

    let response = get(fx.router(), "/api/dir/Comics/notes.txt").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "NOT_A_DIRECTORY");

    let response = get(fx.router(), "/api/dir/Comics/..%2F..%2Fetc").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "PATH_TRAVERSAL");

    let response = get(fx.router(), "/api/dir/Music").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "UNKNOWN_ROOT");
}

#[tokio::test]
async fn test_book_list_natural_order() {
    let fx = fixture();
    let response = get(fx.router(), "/api/book/Comics/Series/Tome%2001.cbz/list").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["filename"], "Tome 01.cbz");
    assert_eq!(json["count"], 3);
    assert_eq!(json["images"], serde_json::json!(["1.png", "2.jpg", "10.jpg"]));
    assert_eq!(json["defaultLTR"], false);

    let archive = fx.comics().join("Series").join("Tome 01.cbz");
    assert!(fx.library.page_lists().contains(&archive));
}

#[tokio::test]
async fn test_book_list_reports_reading_direction() {
    let fx = fixture();
    let library = Arc::new(build_library(fx.dir.path(), 16).with_default_ltr(true));

    let response = get(
        create_router(library),
        "/api/book/Comics/Series/Tome%2001.cbz/list",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["defaultLTR"], true);
}

#[tokio::test]
async fn test_book_images() {
    let fx = fixture();
    let base = "/api/book/Comics/Series/Tome%2001.cbz/image";

    let response = get(fx.router(), &format!("{}/0", base)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, "content-type"), "image/png");
    assert_eq!(body_bytes(response).await, PAGE_1);

    let response = get(fx.router(), &format!("{}/1", base)).await;
    assert_eq!(header_str(&response, "content-type"), "image/jpeg");
    assert_eq!(body_bytes(response).await, PAGE_2);

    let response = get(fx.router(), &format!("{}/2", base)).await;
    assert_eq!(body_bytes(response).await, PAGE_10);

    let response = get(fx.router(), &format!("{}/3", base)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_errors() {
    let fx = fixture();

    let response = get(fx.router(), "/api/book/Comics/missing.cbz/list").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(fx.router(), "/api/book/Comics/broken.cbz/list").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "ARCHIVE_OPEN_FAILED");

    let response = get(fx.router(), "/api/book/Comics/Series/Tome%2001.cbz/pages").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(fx.router(), "/api/book/Comics/notes.txt/list").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "UNSUPPORTED_FORMAT");
}

#[tokio::test]
async fn test_thumbnail_miss_then_hit() {
    let fx = fixture();
    let uri = "/api/book/Comics/Series/Tome%2001.cbz/thumbnail";

    let response = get(fx.router(), uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, "x-cache"), "MISS");
    assert_eq!(header_str(&response, "cache-control"), "public, max-age=86400");
    assert_eq!(header_str(&response, "content-type"), "image/png");
    assert_eq!(body_bytes(response).await, PAGE_1);

    let response = get(fx.router(), uri).await;
    assert_eq!(header_str(&response, "x-cache"), "HIT");
    assert_eq!(body_bytes(response).await, PAGE_1);

    assert_eq!(std::fs::read_dir(fx.thumbnails_dir()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_thumbnail_without_images() {
    let fx = fixture();
    let response = get(fx.router(), "/api/book/Comics/empty.cbz/thumbnail").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_thumbnail_survives_restart() {
    let fx = fixture();
    let uri = "/api/book/Comics/Series/Tome%2001.cbz/thumbnail";
    let response = get(fx.router(), uri).await;
    assert_eq!(header_str(&response, "x-cache"), "MISS");

    let restarted = build_library(fx.dir.path(), 16);
    assert_eq!(restarted.thumbnails().load_existing().unwrap(), 1);

    let response = get(create_router(Arc::new(restarted)), uri).await;
    assert_eq!(header_str(&response, "x-cache"), "HIT");
    assert_eq!(body_bytes(response).await, PAGE_1);
}

#[tokio::test]
async fn test_file_full_and_partial() {
    let fx = fixture();
    let movie = movie_bytes();

    let response = get(fx.router(), "/api/file/Comics/movie.mp4").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, "content-length"), "1000");
    assert_eq!(header_str(&response, "content-type"), "video/mp4");
    assert_eq!(body_bytes(response).await, movie);

    let request = Request::builder()
        .uri("/api/file/Comics/movie.mp4")
        .header(header::RANGE, "bytes=200-299")
        .body(Body::empty())
        .unwrap();
    let response = send(fx.router(), request).await;
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(header_str(&response, "content-range"), "bytes 200-299/1000");
    assert_eq!(body_bytes(response).await, &movie[200..300]);

    let request = Request::builder()
        .uri("/api/file/Comics/movie.mp4")
        .header(header::RANGE, "bytes=1000-1050")
        .body(Body::empty())
        .unwrap();
    let response = send(fx.router(), request).await;
    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(header_str(&response, "content-range"), "bytes */1000");
}

#[tokio::test]
async fn test_file_errors() {
    let fx = fixture();

    let response = get(fx.router(), "/api/file/Comics/missing.bin").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(fx.router(), "/api/file/Comics/Series").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "NOT_A_FILE");

    let request = Request::builder()
        .uri("/api/file/Comics/notes.txt")
        .header(header::RANGE, "bytes=0-1-2")
        .body(Body::empty())
        .unwrap();
    let response = send(fx.router(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_media_only_serves_video_and_audio() {
    let fx = fixture();

    let response = get(fx.router(), "/api/media/Comics/song.mp3").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, "content-type"), "audio/mpeg");

    let response = get(fx.router(), "/api/media/Comics/notes.txt").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "NOT_MEDIA");
}

async fn media_url(router: Router, user_agent: &str) -> Value {
    let request = Request::builder()
        .uri("/api/media-url/Comics/movie.mp4")
        .header(header::HOST, "192.168.1.10:8539")
        .header(header::USER_AGENT, user_agent)
        .body(Body::empty())
        .unwrap();
    let response = send(router, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn test_media_url_plain() {
    let fx = fixture();
    let json = media_url(fx.router(), "Mozilla/5.0 (X11; Linux x86_64)").await;
    assert_eq!(json["url"], "http://192.168.1.10:8539/api/file/Comics/movie.mp4");
    assert!(json.get("custom").is_none());
    assert!(json.get("name").is_none());
}

#[tokio::test]
async fn test_media_url_external_player() {
    let fx = fixture();

    let json = media_url(fx.router(), "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0)").await;
    assert_eq!(json["custom"], true);
    assert_eq!(json["name"], "IINA");
    assert_eq!(
        json["url"],
        "iina://weblink?url=http%3A%2F%2F192.168.1.10%3A8539%2Fapi%2Ffile%2FComics%2Fmovie.mp4"
    );

    // Le premier lecteur acceptant l'extension l'emporte
    let json = media_url(fx.router(), "Mozilla/5.0 (Windows NT 10.0; Win64; x64)").await;
    assert_eq!(json["name"], "VLC");
}

#[tokio::test]
async fn test_media_url_missing_file() {
    let fx = fixture();
    let response = get(fx.router(), "/api/media-url/Comics/nope.mkv").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status() {
    let fx = fixture();
    get(fx.router(), "/api/book/Comics/Series/Tome%2001.cbz/list").await;

    let json = body_json(get(fx.router(), "/api/status").await).await;
    assert_eq!(json["name"], "LiteComics");
    assert_eq!(json["roots"], 2);
    assert_eq!(json["pageListCache"]["entries"], 1);
    assert_eq!(json["pageListCache"]["capacity"], 8);
    assert_eq!(json["thumbnailCache"]["total_bytes"], 0);
}

#[tokio::test]
async fn test_restart_requires_listener() {
    let fx = fixture();
    let request = Request::builder()
        .method("POST")
        .uri("/api/restart")
        .body(Body::empty())
        .unwrap();
    let response = send(fx.router(), request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_restart_sends_request() {
    let fx = fixture();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let library = Arc::new(build_library(fx.dir.path(), 16).with_restart(tx));

    let request = Request::builder()
        .method("POST")
        .uri("/api/restart")
        .body(Body::empty())
        .unwrap();
    let response = send(create_router(library), request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
    assert!(rx.try_recv().is_ok());
}
