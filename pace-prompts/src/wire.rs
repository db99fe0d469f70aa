//! JSON bodies exchanged between the editor and the template API.

use serde::{Deserialize, Serialize};

/// Body of a template creation request.
///
/// Every field defaults when absent so that missing input reaches
/// [`Template::validate`](crate::Template::validate) instead of failing
/// deserialization. `template` is accepted as an alias for `body`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDraft {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Prompt body containing the placeholder marker.
    #[serde(default, alias = "template")]
    pub body: String,
}

impl TemplateDraft {
    /// Creates a draft with the supplied name and body.
    #[must_use]
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            body: body.into(),
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Body of a completion request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Fully rendered prompt.
    #[serde(default)]
    pub prompt: String,
}

/// Body of a successful completion response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Completion text returned by the provider.
    pub completion: String,
}

/// Body of every non-success API response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short, client-safe message.
    pub error: String,
    /// Upstream detail, present for completion failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Creates an error body without details.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Attaches upstream detail.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_defaults_missing_fields() {
        let draft: TemplateDraft = serde_json::from_str(r#"{"name": "Only name"}"#).unwrap();
        assert_eq!(draft.name, "Only name");
        assert!(draft.body.is_empty());
        assert!(draft.description.is_none());
    }

    #[test]
    fn draft_accepts_template_alias() {
        let draft: TemplateDraft =
            serde_json::from_str(r#"{"name": "N", "template": "T {{selection}}"}"#).unwrap();
        assert_eq!(draft.body, "T {{selection}}");
    }

    #[test]
    fn error_response_omits_empty_details() {
        let json = serde_json::to_string(&ErrorResponse::new("Template not found")).unwrap();
        assert_eq!(json, r#"{"error":"Template not found"}"#);
    }
}
