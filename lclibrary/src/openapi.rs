use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LiteComics Library API",
        version = "0.1.0",
        description = "Navigation dans les racines, lecture des archives et diffusion des médias",
    ),
    paths(
        crate::api::list_roots,
        crate::api::list_root_dir,
        crate::api::list_dir,
        crate::api::book,
        crate::api::file,
        crate::api::media_file,
        crate::api::media_url,
        crate::api::status,
        crate::api::restart,
    ),
    components(
        schemas(
            crate::models::RootItem,
            crate::models::FileType,
            crate::models::FileItem,
            crate::models::DirListing,
            crate::models::BookList,
            crate::models::MediaUrlResponse,
            crate::models::StatusResponse,
            crate::models::RestartResponse,
            lcserver::ErrorResponse,
        )
    ),
    tags(
        (name = "library", description = "Endpoints de la bibliothèque")
    )
)]
pub struct ApiDoc;
