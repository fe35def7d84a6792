//! Embedding local media files as `data:` URLs

use crate::MediaError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pagecraft_registry::MediaKind;
use std::path::Path;
use tracing::debug;

/// MIME type for a media file, from its extension
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        _ => return None,
    })
}

/// Read `path` into a `data:<mime>;base64,...` URL.
///
/// The file must be of the kind the control accepts and no larger than
/// `max_bytes`. The result is meant for a single settings update once the
/// read completes; it does not touch any tree.
pub async fn read_data_url(path: &Path, accept: MediaKind, max_bytes: u64) -> Result<String, MediaError> {
    let mime = mime_for(path)
        .filter(|mime| accept.accepts(mime))
        .ok_or_else(|| MediaError::UnsupportedType(path.to_path_buf()))?;

    let read_error = |source| MediaError::Read {
        path: path.to_path_buf(),
        source,
    };

    let size = tokio::fs::metadata(path).await.map_err(read_error)?.len();
    if size > max_bytes {
        return Err(MediaError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: max_bytes,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(read_error)?;
    debug!(path = %path.display(), mime, size, "Embedded media file");
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}
