//! Local snapshot of the server's templates.

use pace_prompts::{Template, TemplateId};

/// Client-side copy of the template list, refreshed from the server.
#[derive(Clone, Debug, Default)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// Creates a catalog from an existing snapshot.
    #[must_use]
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Replaces the snapshot wholesale.
    pub fn replace(&mut self, templates: Vec<Template>) {
        self.templates = templates;
    }

    /// Appends a template returned by the server.
    pub fn push(&mut self, template: Template) {
        self.templates.push(template);
    }

    /// Drops a template from the snapshot, returning whether it was present.
    pub fn remove(&mut self, id: TemplateId) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.id() != id);
        self.templates.len() != before
    }

    /// Looks a template up by id.
    #[must_use]
    pub fn find(&self, id: TemplateId) -> Option<&Template> {
        self.templates.iter().find(|t| t.id() == id)
    }

    /// Returns the snapshot in server order.
    #[must_use]
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }
}

#[cfg(test)]
mod tests {
    use pace_prompts::default_templates;

    use super::*;

    #[test]
    fn find_and_remove() {
        let mut catalog = TemplateCatalog::new(default_templates());
        assert_eq!(
            catalog.find(TemplateId::new(3)).map(Template::name),
            Some("Optimize Code")
        );

        assert!(catalog.remove(TemplateId::new(3)));
        assert!(!catalog.remove(TemplateId::new(3)));
        assert!(catalog.find(TemplateId::new(3)).is_none());
        assert_eq!(catalog.templates().len(), 3);
    }
}
