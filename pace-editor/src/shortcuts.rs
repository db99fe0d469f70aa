//! Keyboard shortcut resolution.

/// Editor-level actions reachable from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorCommand {
    /// Ctrl/Cmd+K: open the add-template form.
    OpenTemplateForm,
    /// Ctrl/Cmd+Enter: apply the chosen template to the selection.
    ApplyTemplate,
    /// Escape: close the add-template form.
    CloseTemplateForm,
}

/// Maps a key press to a command. `key` uses DOM key names (`"k"`, `"Enter"`).
#[must_use]
pub fn resolve_shortcut(key: &str, ctrl: bool, meta: bool) -> Option<EditorCommand> {
    if key == "Escape" {
        return Some(EditorCommand::CloseTemplateForm);
    }
    if !(ctrl || meta) {
        return None;
    }
    match key {
        "k" | "K" => Some(EditorCommand::OpenTemplateForm),
        "Enter" => Some(EditorCommand::ApplyTemplate),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_shortcuts() {
        assert_eq!(
            resolve_shortcut("k", true, false),
            Some(EditorCommand::OpenTemplateForm)
        );
        assert_eq!(
            resolve_shortcut("Enter", false, true),
            Some(EditorCommand::ApplyTemplate)
        );
        assert_eq!(resolve_shortcut("k", false, false), None);
        assert_eq!(resolve_shortcut("Enter", false, false), None);
        assert_eq!(resolve_shortcut("s", true, false), None);
    }

    #[test]
    fn escape_needs_no_modifier() {
        assert_eq!(
            resolve_shortcut("Escape", false, false),
            Some(EditorCommand::CloseTemplateForm)
        );
    }
}
