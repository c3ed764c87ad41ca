//! Loading room photos from disk.

use std::path::Path;

use anyhow::{bail, Context};
use planovate_core::ImagePayload;

/// Read an image file, detecting its content type from the bytes.
pub async fn load_image(path: &Path) -> anyhow::Result<ImagePayload> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let Some(content_type) = sniff_image(&data) else {
        bail!("{} is not a recognized image file", path.display());
    };

    let file_name = path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("image")
        .to_string();

    Ok(ImagePayload::new(file_name, content_type, data))
}

/// MIME type of an image, or `None` if the bytes are not an image.
fn sniff_image(data: &[u8]) -> Option<&'static str> {
    infer::get(data)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .map(|kind| kind.mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn test_sniff_png() {
        assert_eq!(sniff_image(PNG_HEADER), Some("image/png"));
    }

    #[test]
    fn test_sniff_jpeg() {
        assert_eq!(sniff_image(JPEG_HEADER), Some("image/jpeg"));
    }

    #[test]
    fn test_sniff_rejects_non_image() {
        assert_eq!(sniff_image(b"%PDF-1.7 hello"), None);
        assert_eq!(sniff_image(b""), None);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_image(Path::new("/definitely/not/here.jpg"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
