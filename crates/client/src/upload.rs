//! File payloads for multipart uploads.

use std::path::Path;

/// An in-memory file ready to be sent as a multipart form part.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type of the payload.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, inferring the MIME type from its
    /// extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = guess_content_type(&file_name).to_string();
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

/// Infer a MIME type from a file name's extension.
///
/// Covers the image and video formats the analysis backend accepts;
/// anything else falls back to `application/octet-stream`.
pub fn guess_content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_common_image_types() {
        assert_eq!(guess_content_type("face.jpg"), "image/jpeg");
        assert_eq!(guess_content_type("face.JPEG"), "image/jpeg");
        assert_eq!(guess_content_type("face.png"), "image/png");
    }

    #[test]
    fn guesses_common_video_types() {
        assert_eq!(guess_content_type("clip.mp4"), "video/mp4");
        assert_eq!(guess_content_type("clip.webm"), "video/webm");
    }

    #[test]
    fn unknown_extension_falls_back() {
        assert_eq!(guess_content_type("data.bin"), "application/octet-stream");
        assert_eq!(guess_content_type("noextension"), "application/octet-stream");
    }
}
