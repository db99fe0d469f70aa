//! Editing surface state: content, selection, language, template choice.

use pace_prompts::TemplateId;

use crate::Language;

/// Chooser placeholder shown while nothing is selected.
pub const NO_SELECTION_HINT: &str = "Select text first...";

const HINT_PREVIEW_CHARS: usize = 30;

/// Per-session editor state. Never shared across sessions.
#[derive(Clone, Debug, Default)]
pub struct EditorSession {
    content: String,
    selection: String,
    language: Language,
    chosen: Option<TemplateId>,
}

impl EditorSession {
    /// Creates a session with initial editor content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Replaces the editor content and clears the selection.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.selection.clear();
    }

    /// Returns the editor content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Records the highlighted text, trimmed once of surrounding whitespace.
    pub fn select(&mut self, highlighted: &str) {
        highlighted.trim().clone_into(&mut self.selection);
    }

    /// Returns the current selection; empty means nothing is selected.
    #[must_use]
    pub fn selection(&self) -> &str {
        &self.selection
    }

    /// Returns `true` when a non-empty selection exists.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Records the chosen template (or clears it with `None`).
    pub fn choose_template(&mut self, id: Option<TemplateId>) {
        self.chosen = id;
    }

    /// Returns the chosen template id.
    #[must_use]
    pub const fn chosen_template(&self) -> Option<TemplateId> {
        self.chosen
    }

    /// Switches the syntax mode.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Returns the active language.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Text for the chooser's placeholder option.
    #[must_use]
    pub fn selection_hint(&self) -> String {
        if !self.has_selection() {
            return NO_SELECTION_HINT.to_owned();
        }

        let preview: String = self.selection.chars().take(HINT_PREVIEW_CHARS).collect();
        let ellipsis = if self.selection.chars().count() > HINT_PREVIEW_CHARS {
            "..."
        } else {
            ""
        };
        format!("Apply to \"{preview}{ellipsis}\"")
    }
}
