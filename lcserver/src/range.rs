//! Réponses HTTP partielles (`Range: bytes=...`)
//!
//! Une seule plage est acceptée par requête. Les en-têtes qui ne commencent pas
//! par `bytes=` sont ignorés et la ressource est servie entière.

use std::io::SeekFrom;
use std::path::Path;

use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::response::ErrorResponse;

/// Plage d'octets inclusive, toujours contenue dans la ressource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Valeur de l'en-tête `Content-Range`
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Malformed Range header: {0}")]
    Malformed(String),

    #[error("Requested range not satisfiable (size {size})")]
    Unsatisfiable { size: u64 },
}

impl IntoResponse for RangeError {
    fn into_response(self) -> Response {
        match self {
            RangeError::Malformed(_) => {
                ErrorResponse::new("INVALID_RANGE", self.to_string())
                    .with_status(StatusCode::BAD_REQUEST)
            }
            RangeError::Unsatisfiable { size } => (
                StatusCode::RANGE_NOT_SATISFIABLE,
                [(header::CONTENT_RANGE, format!("bytes */{}", size))],
            )
                .into_response(),
        }
    }
}

/// Échec du service d'un fichier
#[derive(Debug, Error)]
pub enum StreamError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for StreamError {
    fn into_response(self) -> Response {
        match self {
            StreamError::Range(e) => e.into_response(),
            StreamError::Io(e) => {
                tracing::error!(error = %e, "Failed to stream file");
                ErrorResponse::new("IO_ERROR", e.to_string())
                    .with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

fn malformed(header: &str) -> RangeError {
    RangeError::Malformed(header.to_string())
}

/// Analyse un en-tête `Range` pour une ressource de `size` octets.
///
/// # Returns
///
/// - `Ok(None)` si l'en-tête n'est pas de la forme `bytes=...` : la ressource
///   doit être servie entière
/// - `Ok(Some(range))` pour une plage valide, `end` inclus
///
/// # Errors
///
/// - [`RangeError::Malformed`] pour une syntaxe invalide ou plusieurs plages
/// - [`RangeError::Unsatisfiable`] si la plage sort de la ressource
///
/// # Exemple
///
/// ```
/// use lcserver::range::{parse_range, ByteRange};
///
/// let range = parse_range("bytes=200-299", 1000).unwrap();
/// assert_eq!(range, Some(ByteRange { start: 200, end: 299 }));
/// assert!(parse_range("bytes=1000-1050", 1000).is_err());
/// ```
pub fn parse_range(header: &str, size: u64) -> Result<Option<ByteRange>, RangeError> {
    let Some(spec) = header.trim().strip_prefix("bytes=") else {
        return Ok(None);
    };
    if spec.contains(',') {
        return Err(malformed(header));
    }

    let fields: Vec<&str> = spec.split('-').map(str::trim).collect();
    let [first, second] = fields[..] else {
        return Err(malformed(header));
    };

    let parse = |s: &str| s.parse::<u64>().map_err(|_| malformed(header));
    let unsatisfiable = RangeError::Unsatisfiable { size };

    // bytes=-N : les N derniers octets
    if first.is_empty() {
        let suffix = parse(second)?;
        if suffix == 0 || size == 0 {
            return Err(unsatisfiable);
        }
        return Ok(Some(ByteRange {
            start: size.saturating_sub(suffix),
            end: size - 1,
        }));
    }

    let start = parse(first)?;
    let end = if second.is_empty() {
        size.checked_sub(1).ok_or(unsatisfiable.clone())?
    } else {
        parse(second)?
    };

    if start > end || start >= size || end >= size {
        return Err(unsatisfiable);
    }
    Ok(Some(ByteRange { start, end }))
}

fn full_response(size: u64, mime: &str, body: Body) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CONTENT_LENGTH, size.to_string()),
            (header::ACCEPT_RANGES, "bytes".to_string()),
        ],
        body,
    )
        .into_response()
}

fn partial_response(range: ByteRange, size: u64, mime: &str, body: Body) -> Response {
    (
        StatusCode::PARTIAL_CONTENT,
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CONTENT_LENGTH, range.len().to_string()),
            (header::CONTENT_RANGE, range.content_range(size)),
            (header::ACCEPT_RANGES, "bytes".to_string()),
        ],
        body,
    )
        .into_response()
}

/// Sert un fichier du disque en honorant l'en-tête `Range` éventuel.
///
/// La taille est lue sur le descripteur ouvert, si bien que `Content-Length`
/// décrit le fichier effectivement servi. Le corps est lu par morceaux et le
/// descripteur est libéré à la fin du flux ou à l'abandon du client.
pub async fn stream_file(
    path: &Path,
    mime: &str,
    range_header: Option<&str>,
) -> Result<Response, StreamError> {
    let mut file = tokio::fs::File::open(path).await?;
    let size = file.metadata().await?.len();

    let range = match range_header {
        Some(h) => parse_range(h, size)?,
        None => None,
    };

    match range {
        None => {
            let body = Body::from_stream(ReaderStream::new(file.take(size)));
            Ok(full_response(size, mime, body))
        }
        Some(range) => {
            file.seek(SeekFrom::Start(range.start)).await?;
            let body = Body::from_stream(ReaderStream::new(file.take(range.len())));
            tracing::debug!(
                path = %path.display(),
                start = range.start,
                end = range.end,
                "Serving partial content"
            );
            Ok(partial_response(range, size, mime, body))
        }
    }
}

/// Sert un contenu déjà en mémoire avec la même sémantique que [`stream_file`].
pub fn serve_bytes(
    data: Vec<u8>,
    mime: &str,
    range_header: Option<&str>,
) -> Result<Response, RangeError> {
    let size = data.len() as u64;
    let range = match range_header {
        Some(h) => parse_range(h, size)?,
        None => None,
    };

    Ok(match range {
        None => full_response(size, mime, Body::from(data)),
        Some(range) => {
            let slice = data[range.start as usize..=range.end as usize].to_vec();
            partial_response(range, size, mime, Body::from(slice))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_ended_range() {
        assert_eq!(
            parse_range("bytes=900-", 1000).unwrap(),
            Some(ByteRange { start: 900, end: 999 })
        );
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(
            parse_range("bytes=-100", 1000).unwrap(),
            Some(ByteRange { start: 900, end: 999 })
        );
        // Suffixe plus long que la ressource : tout le fichier
        assert_eq!(
            parse_range("bytes=-5000", 1000).unwrap(),
            Some(ByteRange { start: 0, end: 999 })
        );
        assert_eq!(
            parse_range("bytes=-0", 1000),
            Err(RangeError::Unsatisfiable { size: 1000 })
        );
    }

    #[test]
    fn test_other_units_are_ignored() {
        assert_eq!(parse_range("items=0-5", 1000).unwrap(), None);
    }

    #[test]
    fn test_malformed() {
        for header in ["bytes=", "bytes=-", "bytes=1-2-3", "bytes=a-b", "bytes=0-1,5-6"] {
            assert!(
                matches!(parse_range(header, 1000), Err(RangeError::Malformed(_))),
                "{header}"
            );
        }
    }

    #[test]
    fn test_unsatisfiable() {
        for header in ["bytes=1000-1050", "bytes=500-400", "bytes=0-1000", "bytes=0-"] {
            let size = if header == "bytes=0-" { 0 } else { 1000 };
            assert!(
                matches!(parse_range(header, size), Err(RangeError::Unsatisfiable { .. })),
                "{header}"
            );
        }
    }
}
