//! Templates shipped with a freshly started server.

use crate::{Template, TemplateId};

const DEFAULTS: [(&str, &str, &str); 4] = [
    (
        "Explain Code",
        "Explains what the selected code does",
        "Please explain what this code does in simple terms:\n\n{{selection}}",
    ),
    (
        "Add Comments",
        "Adds helpful comments to the code",
        "Add clear, helpful comments to this code. Return only the commented code:\n\n{{selection}}",
    ),
    (
        "Optimize Code",
        "Suggests optimizations for the selected code",
        "Analyze this code and suggest optimizations or improvements:\n\n{{selection}}",
    ),
    (
        "Fix Bugs",
        "Identifies and fixes potential bugs",
        "Review this code for potential bugs and provide a fixed version:\n\n{{selection}}",
    ),
];

/// Returns the built-in templates, numbered from 1.
#[must_use]
pub fn default_templates() -> Vec<Template> {
    DEFAULTS
        .iter()
        .zip(1_u64..)
        .filter_map(|((name, description, body), id)| {
            Template::new(TemplateId::new(id), *name, *description, *body).ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_sequential() {
        let templates = default_templates();
        assert_eq!(templates.len(), DEFAULTS.len());
        for (index, template) in templates.iter().enumerate() {
            assert_eq!(template.id().get(), index as u64 + 1);
        }
        assert_eq!(templates[0].name(), "Explain Code");
        assert_eq!(templates[3].name(), "Fix Bugs");
    }
}
