//! Template records and placeholder substitution.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TemplateId;

/// Literal marker replaced by the editor selection when a prompt is rendered.
pub const PLACEHOLDER: &str = "{{selection}}";

/// Result alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors raised by template validation and store operations.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template content failed validation.
    #[error("invalid template: {reason}")]
    Validation {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// No template exists with the requested identifier.
    #[error("template {id} not found")]
    NotFound {
        /// Identifier that was looked up.
        id: TemplateId,
    },

    /// A template identifier could not be parsed.
    #[error("invalid template id `{value}`")]
    InvalidId {
        /// The offending raw value.
        value: String,
    },
}

impl TemplateError {
    /// Convenience constructor for validation failures.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}

/// A named prompt whose body embeds the [`PLACEHOLDER`] marker.
///
/// Templates are immutable once stored; the store only appends or removes
/// them.
///
/// # Examples
///
/// ```
/// use pace_prompts::{Template, TemplateId};
///
/// let template = Template::new(TemplateId::new(1), "Explain", "", "Explain: {{selection}}")
///     .unwrap();
/// assert_eq!(template.render("function foo(){}"), "Explain: function foo(){}");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    id: TemplateId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(alias = "template")]
    body: String,
}

impl Template {
    /// Creates a validated template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Validation`] when the name or body is empty or
    /// the body lacks the placeholder marker.
    pub fn new(
        id: TemplateId,
        name: impl Into<String>,
        description: impl Into<String>,
        body: impl Into<String>,
    ) -> TemplateResult<Self> {
        let name = name.into();
        let body = body.into();
        Self::validate(&name, &body)?;

        Ok(Self {
            id,
            name,
            description: description.into(),
            body,
        })
    }

    /// Checks the invariants every stored template must satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Validation`] describing the first violated rule.
    pub fn validate(name: &str, body: &str) -> TemplateResult<()> {
        if name.trim().is_empty() {
            return Err(TemplateError::validation("template name is required"));
        }
        if body.trim().is_empty() {
            return Err(TemplateError::validation("template body is required"));
        }
        if !body.contains(PLACEHOLDER) {
            return Err(TemplateError::validation(format!(
                "template body must include the {PLACEHOLDER} placeholder"
            )));
        }
        Ok(())
    }

    /// Renders the prompt for the supplied selection.
    #[must_use]
    pub fn render(&self, selection: &str) -> String {
        render_prompt(&self.body, selection)
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> TemplateId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, empty when none was given.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the raw prompt body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}

/// Substitutes every [`PLACEHOLDER`] in `body` with `selection`.
///
/// Substitution is a single left-to-right pass over the body. The selection is
/// inserted verbatim and never scanned again, so a selection that itself
/// contains the marker text comes through unchanged.
#[must_use]
pub fn render_prompt(body: &str, selection: &str) -> String {
    body.replace(PLACEHOLDER, selection)
}
