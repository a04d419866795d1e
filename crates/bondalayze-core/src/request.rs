//! Request and response contracts of the analysis pipeline.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::error::{BondaError, Result};
use crate::image::EncodedImage;
use crate::plan::Plan;

/// One analysis invocation. Lives only for the duration of a request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisRequest {
    pub typed_text: String,
    pub plan: Plan,
    pub images: Vec<EncodedImage>,
}

impl AnalysisRequest {
    pub fn new(typed_text: impl Into<String>, plan: Plan, images: Vec<EncodedImage>) -> Self {
        Self {
            typed_text: typed_text.into(),
            plan,
            images,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.typed_text.trim().is_empty()
    }

    /// Rejects requests with neither text nor images, and malformed images.
    pub fn validate_input(&self) -> Result<()> {
        if !self.has_text() && self.images.is_empty() {
            return Err(BondaError::NoInputProvided);
        }
        self.images.iter().try_for_each(EncodedImage::validate)
    }
}

/// The externally visible result of a successful analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    /// Clean screenshot transcript, empty when no screenshots were used.
    pub extracted_text: String,
    /// The exact text the analyzer saw, after combining and truncation.
    pub used_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_is_rejected() {
        let request = AnalysisRequest::new("   ", Plan::Free, vec![]);
        assert_eq!(request.validate_input(), Err(BondaError::NoInputProvided));
    }

    #[test]
    fn test_images_only_is_accepted() {
        let request = AnalysisRequest::new(
            "",
            Plan::Free,
            vec![EncodedImage::new("data:image/jpeg;base64,AAAA")],
        );
        assert!(request.validate_input().is_ok());
    }

    #[test]
    fn test_bad_image_is_rejected() {
        let request = AnalysisRequest::new(
            "hi",
            Plan::Pro,
            vec![EncodedImage::new("not a data url")],
        );
        assert!(matches!(
            request.validate_input(),
            Err(BondaError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_response_is_flat() {
        let response = ApiResponse {
            analysis: AnalysisResult::default(),
            extracted_text: String::new(),
            used_text: "Hi\nHey".to_string(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["score"], 0);
        assert_eq!(value["used_text"], "Hi\nHey");
        assert_eq!(value["extracted_text"], "");
        assert!(value["extra"].is_object());
    }
}
