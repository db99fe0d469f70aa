//! Template application controller.
//!
//! Apply is available only while the selection is non-empty, a template is
//! chosen, and no request is outstanding. The request itself moves through
//! [`RequestState`]; a second submission while [`RequestState::Pending`] is
//! refused without issuing anything.

use std::collections::VecDeque;

use chrono::Utc;
use pace_prompts::wire::TemplateDraft;
use pace_prompts::{PLACEHOLDER, TemplateId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::client::{ClientResult, PaceApi};
use crate::{
    EditorCommand, EditorSession, Language, Notification, NotificationKind, ResultEntry,
    ResultFeed, TemplateCatalog,
};

/// Progress of the most recent completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A request is outstanding.
    Pending,
    /// The last request produced a result entry.
    Resolved,
    /// The last request failed.
    Rejected,
}

impl RequestState {
    /// Returns `true` while a request is outstanding.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestEvent {
    Submit,
    Succeed,
    Fail,
}

/// Reasons an apply or resolve step was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    /// The selection is empty.
    #[error("no text is selected")]
    NoSelection,

    /// No template has been chosen.
    #[error("no template is chosen")]
    NoTemplate,

    /// The chosen template is absent from the local snapshot.
    #[error("template {id} is not in the catalog")]
    TemplateMissing {
        /// Chosen template id.
        id: TemplateId,
    },

    /// Another request is still outstanding.
    #[error("a completion request is already pending")]
    RequestPending,

    /// The ticket does not match the outstanding request.
    #[error("no outstanding request matches this ticket")]
    UnknownRequest,
}

/// Result alias for controller steps.
pub type ApplyResult<T> = Result<T, ApplyError>;

/// Ticket for a submitted apply, carrying the rendered prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingApply {
    ticket: u64,
    template_name: String,
    prompt: String,
}

impl PendingApply {
    /// Name of the template being applied.
    #[must_use]
    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    /// Prompt to send to the completion endpoint.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Drives one editor session against the PACE API.
#[derive(Debug, Default)]
pub struct ApplyController {
    session: EditorSession,
    catalog: TemplateCatalog,
    feed: ResultFeed,
    notifications: VecDeque<Notification>,
    request: RequestState,
    outstanding: Option<u64>,
    next_ticket: u64,
    form_open: bool,
}

impl ApplyController {
    /// Creates a controller over an existing session and catalog snapshot.
    #[must_use]
    pub fn new(session: EditorSession, catalog: TemplateCatalog) -> Self {
        Self {
            session,
            catalog,
            ..Self::default()
        }
    }

    /// Returns the editor session.
    #[must_use]
    pub const fn session(&self) -> &EditorSession {
        &self.session
    }

    /// Returns the template snapshot.
    #[must_use]
    pub const fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Returns the results feed.
    #[must_use]
    pub const fn feed(&self) -> &ResultFeed {
        &self.feed
    }

    /// Returns the request state.
    #[must_use]
    pub const fn state(&self) -> RequestState {
        self.request
    }

    /// Whether apply is currently available.
    #[must_use]
    pub fn can_apply(&self) -> bool {
        self.session.has_selection()
            && self.session.chosen_template().is_some()
            && !self.request.is_pending()
    }

    /// Whether the template chooser accepts input.
    #[must_use]
    pub fn template_chooser_enabled(&self) -> bool {
        self.session.has_selection()
    }

    /// Records a new selection. The template choice survives an empty selection.
    pub fn on_selection_change(&mut self, highlighted: &str) {
        self.session.select(highlighted);
        debug!(
            has_selection = self.session.has_selection(),
            can_apply = self.can_apply(),
            "selection changed"
        );
    }

    /// Switches the session's language mode.
    pub fn set_language(&mut self, language: Language) {
        self.session.set_language(language);
    }

    /// Chooses a template, or clears the choice with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::NoSelection`] while the chooser is disabled.
    pub fn choose_template(&mut self, id: Option<TemplateId>) -> ApplyResult<()> {
        if !self.template_chooser_enabled() {
            return Err(ApplyError::NoSelection);
        }
        self.session.choose_template(id);
        Ok(())
    }

    /// First phase of an apply: checks preconditions and renders the prompt.
    ///
    /// Refusals caused by missing input also queue a notification.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::NoSelection`], [`ApplyError::NoTemplate`] or
    /// [`ApplyError::TemplateMissing`] when the inputs are incomplete, and
    /// [`ApplyError::RequestPending`] while another request is outstanding.
    pub fn begin_apply(&mut self) -> ApplyResult<PendingApply> {
        if self.request.is_pending() {
            debug!("apply refused: request already pending");
            return Err(ApplyError::RequestPending);
        }
        if !self.session.has_selection() {
            self.notify(NotificationKind::Warning, "Please select some text first");
            return Err(ApplyError::NoSelection);
        }
        let Some(id) = self.session.chosen_template() else {
            self.notify(NotificationKind::Warning, "Please select a template");
            return Err(ApplyError::NoTemplate);
        };
        let Some(template) = self.catalog.find(id) else {
            self.notify(NotificationKind::Error, "Template not found");
            return Err(ApplyError::TemplateMissing { id });
        };

        let template_name = template.name().to_owned();
        let prompt = template.render(self.session.selection());

        self.transition(RequestEvent::Submit)?;
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.outstanding = Some(ticket);

        debug!(ticket, template = %template_name, "apply submitted");
        Ok(PendingApply {
            ticket,
            template_name,
            prompt,
        })
    }

    /// Second phase of an apply: records the outcome of the completion call.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::UnknownRequest`] when `pending` is not the
    /// outstanding ticket.
    pub fn resolve(
        &mut self,
        pending: PendingApply,
        outcome: ClientResult<String>,
    ) -> ApplyResult<()> {
        if self.outstanding != Some(pending.ticket) {
            return Err(ApplyError::UnknownRequest);
        }
        self.outstanding = None;

        match outcome {
            Ok(completion) => {
                self.transition(RequestEvent::Succeed)?;
                self.feed.push_front(ResultEntry::new(
                    pending.template_name,
                    Utc::now(),
                    completion,
                ));
                self.notify(NotificationKind::Success, "AI completion successful!");
            }
            Err(err) => {
                self.transition(RequestEvent::Fail)?;
                warn!(error = %err, "completion request failed");
                self.notify(NotificationKind::Error, format!("Error: {err}"));
            }
        }
        Ok(())
    }

    /// Runs both apply phases against `api`.
    ///
    /// # Errors
    ///
    /// Returns the refusal from [`Self::begin_apply`]. Request failures are
    /// reported as notifications, not errors.
    pub async fn apply(&mut self, api: &dyn PaceApi) -> ApplyResult<()> {
        let pending = self.begin_apply()?;
        let outcome = api.complete(pending.prompt()).await;
        self.resolve(pending, outcome)
    }

    /// Reloads the template snapshot. On failure the old snapshot is kept.
    pub async fn refresh_templates(&mut self, api: &dyn PaceApi) {
        match api.list_templates().await {
            Ok(templates) => {
                debug!(count = templates.len(), "templates loaded");
                self.catalog.replace(templates);
            }
            Err(err) => {
                warn!(error = %err, "failed to load templates");
                self.notify(NotificationKind::Error, "Error loading templates");
            }
        }
    }

    /// Submits a new template and appends it to the snapshot.
    ///
    /// Returns `true` when the server accepted it.
    pub async fn add_template(&mut self, api: &dyn PaceApi, draft: &TemplateDraft) -> bool {
        if !draft.body.contains(PLACEHOLDER) {
            self.notify(
                NotificationKind::Error,
                format!("Template must include {PLACEHOLDER} placeholder"),
            );
            return false;
        }

        match api.create_template(draft).await {
            Ok(template) => {
                let message = format!("Added \"{}\" template successfully!", template.name());
                self.catalog.push(template);
                self.form_open = false;
                self.notify(NotificationKind::Success, message);
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to add template");
                self.notify(NotificationKind::Error, "Error adding template");
                false
            }
        }
    }

    /// Deletes a template on the server and drops it from the snapshot.
    ///
    /// Returns `true` when the server deleted it.
    pub async fn remove_template(&mut self, api: &dyn PaceApi, id: TemplateId) -> bool {
        match api.delete_template(id).await {
            Ok(()) => {
                self.catalog.remove(id);
                if self.session.chosen_template() == Some(id) {
                    self.session.choose_template(None);
                }
                true
            }
            Err(err) => {
                warn!(error = %err, %id, "failed to remove template");
                self.notify(NotificationKind::Error, format!("Error: {err}"));
                false
            }
        }
    }

    /// Empties the results feed.
    pub fn clear_results(&mut self) {
        self.feed.clear();
    }

    /// Opens the add-template form.
    pub fn open_template_form(&mut self) {
        self.form_open = true;
    }

    /// Closes the add-template form.
    pub fn close_template_form(&mut self) {
        self.form_open = false;
    }

    /// Whether the add-template form is open.
    #[must_use]
    pub const fn is_template_form_open(&self) -> bool {
        self.form_open
    }

    /// Executes a keyboard command. Apply is only attempted when available.
    ///
    /// # Errors
    ///
    /// Propagates refusals from [`Self::apply`].
    pub async fn handle_command(
        &mut self,
        command: EditorCommand,
        api: &dyn PaceApi,
    ) -> ApplyResult<()> {
        match command {
            EditorCommand::OpenTemplateForm => self.open_template_form(),
            EditorCommand::CloseTemplateForm => self.close_template_form(),
            EditorCommand::ApplyTemplate => {
                if self.session.has_selection() && self.session.chosen_template().is_some() {
                    self.apply(api).await?;
                }
            }
        }
        Ok(())
    }

    /// Drains queued notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notifications.push_back(Notification::new(kind, message));
    }

    fn transition(&mut self, event: RequestEvent) -> ApplyResult<RequestState> {
        let next = match (self.request, event) {
            (
                RequestState::Idle | RequestState::Resolved | RequestState::Rejected,
                RequestEvent::Submit,
            ) => Ok(RequestState::Pending),
            (RequestState::Pending, RequestEvent::Succeed) => Ok(RequestState::Resolved),
            (RequestState::Pending, RequestEvent::Fail) => Ok(RequestState::Rejected),
            (RequestState::Pending, RequestEvent::Submit) => Err(ApplyError::RequestPending),
            (_, RequestEvent::Succeed | RequestEvent::Fail) => Err(ApplyError::UnknownRequest),
        }?;

        debug!(from = ?self.request, to = ?next, ?event, "apply request transition");
        self.request = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pace_prompts::{Template, default_templates};

    use super::*;
    use crate::ClientError;

    #[derive(Default)]
    struct StubApi {
        completion: Option<String>,
        failure: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubApi {
        fn answering(text: &str) -> Self {
            Self {
                completion: Some(text.to_owned()),
                ..Self::default()
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                failure: Some(message.to_owned()),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl PaceApi for StubApi {
        async fn list_templates(&self) -> ClientResult<Vec<Template>> {
            match &self.failure {
                Some(message) => Err(ClientError::Network {
                    reason: message.clone(),
                }),
                None => Ok(default_templates()),
            }
        }

        async fn create_template(&self, draft: &TemplateDraft) -> ClientResult<Template> {
            if let Some(message) = &self.failure {
                return Err(ClientError::Status {
                    status: 400,
                    message: message.clone(),
                });
            }
            Ok(Template::new(
                TemplateId::new(5),
                draft.name.clone(),
                draft.description.clone().unwrap_or_default(),
                draft.body.clone(),
            )
            .unwrap())
        }

        async fn delete_template(&self, _id: TemplateId) -> ClientResult<()> {
            Ok(())
        }

        async fn complete(&self, prompt: &str) -> ClientResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_owned());
            match (&self.completion, &self.failure) {
                (Some(text), _) => Ok(text.clone()),
                (None, Some(message)) => Err(ClientError::Status {
                    status: 500,
                    message: message.clone(),
                }),
                (None, None) => Ok(String::new()),
            }
        }
    }

    fn controller() -> ApplyController {
        ApplyController::new(
            EditorSession::new("function add(a, b) { return a + b; }"),
            TemplateCatalog::new(default_templates()),
        )
    }

    fn messages(controller: &mut ApplyController) -> Vec<(NotificationKind, String)> {
        controller
            .take_notifications()
            .into_iter()
            .map(|note| (note.kind(), note.message().to_owned()))
            .collect()
    }

    #[test]
    fn empty_selection_refuses_apply() {
        let mut controller = controller();
        controller.on_selection_change("   ");
        assert!(!controller.can_apply());
        assert!(!controller.template_chooser_enabled());
        assert_eq!(
            controller.choose_template(Some(TemplateId::new(1))),
            Err(ApplyError::NoSelection)
        );

        let err = controller.begin_apply().expect_err("nothing selected");
        assert_eq!(err, ApplyError::NoSelection);
        assert_eq!(controller.state(), RequestState::Idle);
        assert_eq!(
            messages(&mut controller),
            vec![(
                NotificationKind::Warning,
                "Please select some text first".to_owned()
            )]
        );
    }

    #[test]
    fn apply_needs_a_chosen_template() {
        let mut controller = controller();
        controller.on_selection_change("x");
        assert!(controller.template_chooser_enabled());
        assert!(!controller.can_apply());

        assert_eq!(controller.begin_apply(), Err(ApplyError::NoTemplate));
        assert_eq!(messages(&mut controller)[0].1, "Please select a template");
    }

    #[tokio::test]
    async fn choice_survives_empty_selection_but_apply_is_refused() {
        let api = StubApi::answering("unused");
        let mut controller = controller();
        controller.on_selection_change("x");
        controller.choose_template(Some(TemplateId::new(1))).unwrap();
        assert!(controller.can_apply());

        controller.on_selection_change("");
        assert!(!controller.can_apply());
        assert_eq!(controller.session().chosen_template(), Some(TemplateId::new(1)));
        assert_eq!(controller.apply(&api).await, Err(ApplyError::NoSelection));
        assert!(api.prompts.lock().unwrap().is_empty());
        assert!(controller.feed().is_empty());
        assert_eq!(controller.state(), RequestState::Idle);

        controller.on_selection_change("y");
        assert!(controller.can_apply());
    }

    #[test]
    fn renders_every_marker_once() {
        let template = Template::new(
            TemplateId::new(9),
            "Twice",
            "",
            "A {{selection}} B {{selection}}",
        )
        .unwrap();
        let mut controller = ApplyController::new(
            EditorSession::default(),
            TemplateCatalog::new(vec![template]),
        );
        controller.on_selection_change("  {{selection}}  ");
        controller.choose_template(Some(TemplateId::new(9))).unwrap();

        let pending = controller.begin_apply().unwrap();
        assert_eq!(pending.prompt(), "A {{selection}} B {{selection}}");
        assert_eq!(pending.template_name(), "Twice");
    }

    #[test]
    fn second_apply_while_pending_is_refused() {
        let mut controller = controller();
        controller.on_selection_change("let x = 1;");
        controller.choose_template(Some(TemplateId::new(1))).unwrap();

        let pending = controller.begin_apply().unwrap();
        assert_eq!(controller.state(), RequestState::Pending);
        assert!(!controller.can_apply());
        assert_eq!(controller.begin_apply(), Err(ApplyError::RequestPending));

        controller.resolve(pending.clone(), Ok("done".into())).unwrap();
        assert_eq!(controller.state(), RequestState::Resolved);
        assert_eq!(
            controller.resolve(pending, Ok("again".into())),
            Err(ApplyError::UnknownRequest)
        );
        assert_eq!(controller.feed().len(), 1);
    }

    #[test]
    fn missing_template_is_reported() {
        let mut controller = controller();
        controller.on_selection_change("x");
        controller.choose_template(Some(TemplateId::new(42))).unwrap();

        assert_eq!(
            controller.begin_apply(),
            Err(ApplyError::TemplateMissing {
                id: TemplateId::new(42)
            })
        );
        assert_eq!(
            messages(&mut controller),
            vec![(NotificationKind::Error, "Template not found".to_owned())]
        );
        assert_eq!(controller.state(), RequestState::Idle);
    }

    #[tokio::test]
    async fn successful_apply_prepends_result() {
        let api = StubApi::answering("It adds two numbers.");
        let mut controller = controller();
        controller.on_selection_change("  function add(a, b) { return a + b; }\n");
        controller.choose_template(Some(TemplateId::new(1))).unwrap();

        controller.apply(&api).await.unwrap();

        let prompt = api.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("function add(a, b) { return a + b; }"));
        assert!(!prompt.contains(PLACEHOLDER));

        let entry = controller.feed().latest().unwrap();
        assert_eq!(entry.template_name(), "Explain Code");
        assert_eq!(entry.completion_text(), "It adds two numbers.");
        assert_eq!(controller.state(), RequestState::Resolved);
        assert_eq!(
            messages(&mut controller),
            vec![(
                NotificationKind::Success,
                "AI completion successful!".to_owned()
            )]
        );
    }

    #[tokio::test]
    async fn failed_apply_leaves_feed_untouched() {
        let api = StubApi::failing(
            "Failed to process AI completion (OpenAI API key not configured)",
        );
        let mut controller = controller();
        controller.on_selection_change("x");
        controller.choose_template(Some(TemplateId::new(2))).unwrap();

        controller.apply(&api).await.unwrap();

        assert!(controller.feed().is_empty());
        assert_eq!(controller.state(), RequestState::Rejected);
        assert!(controller.can_apply());
        let notes = messages(&mut controller);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].0, NotificationKind::Error);
        assert!(notes[0].1.starts_with("Error: "));
        assert!(notes[0].1.contains("OpenAI API key not configured"));
    }

    #[tokio::test]
    async fn sequential_applies_are_most_recent_first() {
        let api = StubApi::answering("ok");
        let mut controller = controller();
        controller.on_selection_change("x");

        controller.choose_template(Some(TemplateId::new(1))).unwrap();
        controller.apply(&api).await.unwrap();
        controller.choose_template(Some(TemplateId::new(4))).unwrap();
        controller.apply(&api).await.unwrap();

        let names: Vec<_> = controller
            .feed()
            .iter()
            .map(ResultEntry::template_name)
            .collect();
        assert_eq!(names, vec!["Fix Bugs", "Explain Code"]);

        controller.clear_results();
        assert!(controller.feed().is_empty());
    }

    #[tokio::test]
    async fn add_template_checks_marker_before_request() {
        let api = StubApi::default();
        let mut controller = controller();
        controller.open_template_form();

        let added = controller
            .add_template(&api, &TemplateDraft::new("Shout", "SHOUT"))
            .await;
        assert!(!added);
        assert!(controller.is_template_form_open());
        assert_eq!(
            messages(&mut controller),
            vec![(
                NotificationKind::Error,
                "Template must include {{selection}} placeholder".to_owned()
            )]
        );

        let added = controller
            .add_template(&api, &TemplateDraft::new("Shout", "Shout: {{selection}}"))
            .await;
        assert!(added);
        assert!(!controller.is_template_form_open());
        assert!(controller.catalog().find(TemplateId::new(5)).is_some());
        assert_eq!(
            messages(&mut controller)[0].1,
            "Added \"Shout\" template successfully!"
        );
    }

    #[tokio::test]
    async fn add_template_failure_is_reported() {
        let api = StubApi::failing("template name is required");
        let mut controller = controller();
        let added = controller
            .add_template(&api, &TemplateDraft::new("", "{{selection}}"))
            .await;
        assert!(!added);
        assert_eq!(messages(&mut controller)[0].1, "Error adding template");
    }

    #[tokio::test]
    async fn refresh_failure_keeps_snapshot() {
        let mut controller = controller();
        controller
            .refresh_templates(&StubApi::failing("connection refused"))
            .await;
        assert_eq!(controller.catalog().templates().len(), 4);
        assert_eq!(messages(&mut controller)[0].1, "Error loading templates");
    }

    #[tokio::test]
    async fn removing_chosen_template_clears_choice() {
        let api = StubApi::default();
        let mut controller = controller();
        controller.on_selection_change("x");
        controller.choose_template(Some(TemplateId::new(3))).unwrap();

        assert!(controller.remove_template(&api, TemplateId::new(3)).await);
        assert!(controller.session().chosen_template().is_none());
        assert!(controller.catalog().find(TemplateId::new(3)).is_none());
    }

    #[tokio::test]
    async fn shortcuts_drive_form_and_apply() {
        let api = StubApi::answering("ok");
        let mut controller = controller();

        controller
            .handle_command(EditorCommand::OpenTemplateForm, &api)
            .await
            .unwrap();
        assert!(controller.is_template_form_open());
        controller
            .handle_command(EditorCommand::CloseTemplateForm, &api)
            .await
            .unwrap();
        assert!(!controller.is_template_form_open());

        controller
            .handle_command(EditorCommand::ApplyTemplate, &api)
            .await
            .unwrap();
        assert!(api.prompts.lock().unwrap().is_empty());
        assert!(controller.take_notifications().is_empty());

        controller.on_selection_change("x");
        controller.choose_template(Some(TemplateId::new(1))).unwrap();
        controller
            .handle_command(EditorCommand::ApplyTemplate, &api)
            .await
            .unwrap();
        assert_eq!(controller.feed().len(), 1);
    }
}
