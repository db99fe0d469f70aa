//! In-memory template store.

use std::sync::RwLock;

use tracing::debug;

use crate::{Template, TemplateError, TemplateId, TemplateResult, default_templates};

#[derive(Debug)]
struct StoreInner {
    templates: Vec<Template>,
    next_id: TemplateId,
}

/// Process-lifetime collection of templates, kept in insertion order.
///
/// The store is the single owner of the template list. It never edits a
/// stored template: `create` appends and `delete` removes. Identifiers come
/// from a counter that only moves forward.
#[derive(Debug)]
pub struct TemplateStore {
    inner: RwLock<StoreInner>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore {
    /// Creates an empty store whose first template receives id 1.
    #[must_use]
    pub fn new() -> Self {
        Self::from_templates(Vec::new())
    }

    /// Creates a store pre-populated with [`default_templates`].
    #[must_use]
    pub fn seeded() -> Self {
        Self::from_templates(default_templates())
    }

    fn from_templates(templates: Vec<Template>) -> Self {
        let next_id = templates
            .iter()
            .map(Template::id)
            .max()
            .map_or(TemplateId::new(1), TemplateId::next);

        Self {
            inner: RwLock::new(StoreInner { templates, next_id }),
        }
    }

    /// Returns every template in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal store lock is poisoned.
    #[must_use]
    pub fn list(&self) -> Vec<Template> {
        let inner = self.inner.read().expect("template store poisoned");
        inner.templates.clone()
    }

    /// Returns the template with the supplied id, if present.
    ///
    /// # Panics
    ///
    /// Panics if the internal store lock is poisoned.
    #[must_use]
    pub fn get(&self, id: TemplateId) -> Option<Template> {
        let inner = self.inner.read().expect("template store poisoned");
        inner.templates.iter().find(|t| t.id() == id).cloned()
    }

    /// Validates and appends a new template, assigning the next id.
    ///
    /// A missing description is stored as an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Validation`] when the name or body is empty or
    /// the body lacks the placeholder marker. The store is left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the internal store lock is poisoned.
    pub fn create(
        &self,
        name: impl Into<String>,
        description: Option<String>,
        body: impl Into<String>,
    ) -> TemplateResult<Template> {
        let name = name.into();
        let body = body.into();
        Template::validate(&name, &body)?;

        let mut inner = self.inner.write().expect("template store poisoned");
        let id = inner.next_id;
        let template = Template::new(id, name, description.unwrap_or_default(), body)?;
        inner.next_id = id.next();
        inner.templates.push(template.clone());

        debug!(template_id = %id, name = template.name(), "template created");
        Ok(template)
    }

    /// Removes the template with the supplied id.
    ///
    /// Surviving templates keep their ids and relative order.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] when no template has that id.
    ///
    /// # Panics
    ///
    /// Panics if the internal store lock is poisoned.
    pub fn delete(&self, id: TemplateId) -> TemplateResult<()> {
        let mut inner = self.inner.write().expect("template store poisoned");
        let index = inner
            .templates
            .iter()
            .position(|t| t.id() == id)
            .ok_or(TemplateError::NotFound { id })?;

        let removed = inner.templates.remove(index);
        debug!(template_id = %id, name = removed.name(), "template deleted");
        Ok(())
    }

    /// Returns the number of stored templates.
    ///
    /// # Panics
    ///
    /// Panics if the internal store lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect("template store poisoned").templates.len()
    }

    /// Returns `true` when the store holds no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
