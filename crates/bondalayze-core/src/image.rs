//! Encoded screenshot payloads as they travel from client to model.

use serde::{Deserialize, Serialize};

use crate::error::{BondaError, Result};

/// One uploaded screenshot, already downsampled and re-encoded.
///
/// `data_url` is a `data:image/<subtype>;base64,<payload>` string, the same
/// format vision models accept for inline images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    #[serde(rename = "dataUrl")]
    pub data_url: String,
}

impl EncodedImage {
    pub fn new(data_url: impl Into<String>) -> Self {
        Self {
            data_url: data_url.into(),
        }
    }

    /// Returns the declared mime type (e.g. `image/jpeg`) if the payload is a
    /// base64 image data URL.
    pub fn mime_type(&self) -> Option<&str> {
        let rest = self.data_url.strip_prefix("data:")?;
        let (mime, _) = rest.split_once(";base64,")?;
        mime.starts_with("image/").then_some(mime)
    }

    /// Rejects payloads that are not base64 image data URLs.
    pub fn validate(&self) -> Result<()> {
        if self.mime_type().is_none() {
            return Err(BondaError::InvalidImage(
                "expected a data:image/...;base64 URL".to_string(),
            ));
        }
        let payload_empty = self
            .data_url
            .split_once(";base64,")
            .map(|(_, payload)| payload.trim().is_empty())
            .unwrap_or(true);
        if payload_empty {
            return Err(BondaError::InvalidImage("empty image payload".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_from_data_url() {
        let image = EncodedImage::new("data:image/jpeg;base64,/9j/4AAQ");
        assert_eq!(image.mime_type(), Some("image/jpeg"));
        assert!(image.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_image_payloads() {
        assert!(EncodedImage::new("https://example.com/a.png").validate().is_err());
        assert!(EncodedImage::new("data:text/plain;base64,aGk=").validate().is_err());
        assert!(EncodedImage::new("data:image/png;base64,").validate().is_err());
    }

    #[test]
    fn test_deserializes_client_field_name() {
        let image: EncodedImage =
            serde_json::from_str(r#"{"dataUrl":"data:image/png;base64,AAAA"}"#).unwrap();
        assert_eq!(image.mime_type(), Some("image/png"));
    }
}
