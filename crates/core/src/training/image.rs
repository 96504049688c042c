//! Images attached to exercises.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ImageError;
use crate::serde::deserialize_base64;

/// Largest accepted source payload (1 MiB).
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// A freshly uploaded image payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageUpload {
    /// Upload token chosen by the caller.
    pub uid: String,
    pub name: String,
    pub content_type: String,
    /// Raw bytes. Arrives base64-encoded on the wire.
    #[serde(rename = "data", deserialize_with = "deserialize_base64")]
    pub bytes: Vec<u8>,
    /// Keeps the identity of the previous image instead of generating a new one.
    #[serde(default)]
    pub uuid: Option<Uuid>,
}

/// An image owned by exactly one exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub uid: String,
    pub uuid: Uuid,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    /// Server path or inlined `data:` URL.
    pub url: String,
}

impl Image {
    /// Builds an image with an inlined base64 data URL.
    ///
    /// Fails instead of truncating when the payload exceeds [`MAX_IMAGE_BYTES`].
    pub fn from_upload(upload: &ImageUpload) -> Result<Self, ImageError> {
        check_size(&upload.bytes)?;
        Ok(Self {
            uid: upload.uid.clone(),
            uuid: upload.uuid.unwrap_or_else(Uuid::new_v4),
            name: upload.name.clone(),
            uploaded_at: Utc::now(),
            url: data_url(&upload.content_type, &upload.bytes),
        })
    }

    /// Builds an image that points at an already uploaded file.
    pub fn from_url(uid: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            uuid: Uuid::new_v4(),
            name: name.into(),
            uploaded_at: Utc::now(),
            url: url.into(),
        }
    }

    /// Replaces the payload. A replaced image is a new image: the uuid is
    /// regenerated unless the upload carries one, and `uploaded_at` is refreshed.
    pub fn update(&mut self, upload: &ImageUpload) -> Result<&mut Self, ImageError> {
        let replacement = Self::from_upload(upload)?;
        *self = replacement;
        Ok(self)
    }
}

fn check_size(bytes: &[u8]) -> Result<(), ImageError> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge {
            size: bytes.len(),
            limit: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// Encodes bytes as a `data:<mime>;base64,` URL.
pub fn data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(size: usize) -> ImageUpload {
        ImageUpload {
            uid: "rc-upload-1".to_string(),
            name: "squat.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![7; size],
            uuid: None,
        }
    }

    #[test]
    fn test_from_upload_inlines_data_url() {
        let mut small = upload(3);
        small.bytes = b"abc".to_vec();

        let image = Image::from_upload(&small).unwrap();

        assert_eq!(image.url, "data:image/png;base64,YWJj");
        assert_eq!(image.uid, "rc-upload-1");
        assert_eq!(image.name, "squat.png");
    }

    #[test]
    fn test_exactly_one_mebibyte_is_accepted() {
        assert!(Image::from_upload(&upload(MAX_IMAGE_BYTES)).is_ok());
    }

    #[test]
    fn test_oversized_upload_is_rejected() {
        let result = Image::from_upload(&upload(MAX_IMAGE_BYTES + 1));

        assert_eq!(
            result,
            Err(ImageError::TooLarge {
                size: MAX_IMAGE_BYTES + 1,
                limit: MAX_IMAGE_BYTES,
            })
        );
    }

    #[test]
    fn test_update_regenerates_uuid() {
        let mut image = Image::from_upload(&upload(4)).unwrap();
        let original = image.clone();

        image.update(&upload(8)).unwrap();

        assert_ne!(image.uuid, original.uuid);
        assert!(image.uploaded_at >= original.uploaded_at);
        assert_ne!(image.url, original.url);
    }

    #[test]
    fn test_update_keeps_supplied_uuid() {
        let mut image = Image::from_upload(&upload(4)).unwrap();
        let mut replacement = upload(8);
        replacement.uuid = Some(image.uuid);
        let before = image.uuid;

        image.update(&replacement).unwrap();

        assert_eq!(image.uuid, before);
    }

    #[test]
    fn test_failed_update_leaves_image_untouched() {
        let mut image = Image::from_upload(&upload(4)).unwrap();
        let original = image.clone();

        assert!(image.update(&upload(MAX_IMAGE_BYTES + 1)).is_err());
        assert_eq!(image, original);
    }

    #[test]
    fn test_upload_deserializes_base64_data() {
        let json = r#"{"uid":"u","name":"n.png","content_type":"image/png","data":"YWJj"}"#;

        let upload: ImageUpload = serde_json::from_str(json).unwrap();

        assert_eq!(upload.bytes, b"abc");
        assert_eq!(upload.uuid, None);
    }

    #[test]
    fn test_image_round_trip() {
        let image = Image::from_url("u", "n.png", "/uploads/n.png");
        let json = serde_json::to_string(&image).unwrap();
        let back: Image = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
    }
}
