//! Single-field todo creation form.

use std::sync::Arc;

use shared::domain::Todo;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info};

use crate::{ClientError, ClientEvent, ErrorContext, ResourceService, EVENT_CHANNEL_CAPACITY};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 50;

const TRANSPORT_FAILURE_MESSAGE: &str = "Failed to create todo";

/// Field-level validation failure. Never sent to the service and never
/// blocks submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TitleValidation {
    #[error("Todo title cannot be empty")]
    Empty,
    #[error("Todo title must be at least 3 characters long")]
    TooShort,
    #[error("Todo title must be less than 50 characters long")]
    TooLong,
}

/// Checks are ordered; the first failing one wins. Lengths count characters
/// of the untrimmed value.
pub fn validate_title(value: &str) -> Result<(), TitleValidation> {
    let len = value.chars().count();
    if value.trim().is_empty() {
        Err(TitleValidation::Empty)
    } else if len < TITLE_MIN_CHARS {
        Err(TitleValidation::TooShort)
    } else if len > TITLE_MAX_CHARS {
        Err(TitleValidation::TooLong)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormField {
    pub value: String,
    /// Empty when the value is valid.
    pub validation_message: String,
}

impl FormField {
    fn new(value: String) -> Self {
        let validation_message = match validate_title(&value) {
            Ok(()) => String::new(),
            Err(err) => err.to_string(),
        };
        Self {
            value,
            validation_message,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validation_message.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Todo),
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFormSnapshot {
    pub field: FormField,
    pub submit_error: Option<String>,
    pub submitting: bool,
    pub todos: Vec<Todo>,
}

#[derive(Debug, Default)]
struct FormState {
    field: FormField,
    submit_error: Option<String>,
    in_flight: usize,
    todos: Vec<Todo>,
}

pub struct TodoFormController {
    service: Arc<dyn ResourceService>,
    inner: Mutex<FormState>,
    events: broadcast::Sender<ClientEvent>,
}

impl TodoFormController {
    pub fn new(service: Arc<dyn ResourceService>) -> Self {
        Self::with_initial_title(service, "")
    }

    pub fn with_initial_title(service: Arc<dyn ResourceService>, title: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            service,
            inner: Mutex::new(FormState {
                field: FormField::new(title.into()),
                ..FormState::default()
            }),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> TodoFormSnapshot {
        let guard = self.inner.lock().await;
        TodoFormSnapshot {
            field: guard.field.clone(),
            submit_error: guard.submit_error.clone(),
            submitting: guard.in_flight > 0,
            todos: guard.todos.clone(),
        }
    }

    /// Replaces the input value and recomputes its validation message. Any
    /// earlier submission error is cleared so the field-level message for the
    /// new value is what gets shown.
    pub async fn set_title(&self, value: impl Into<String>) {
        let mut guard = self.inner.lock().await;
        guard.field = FormField::new(value.into());
        guard.submit_error = None;
    }

    /// Sends the current value to the service regardless of its validation
    /// state. The input is left untouched whatever the outcome.
    pub async fn submit(&self) -> SubmitOutcome {
        let title = {
            let mut guard = self.inner.lock().await;
            guard.in_flight += 1;
            if !guard.field.is_valid() {
                debug!(
                    validation = %guard.field.validation_message,
                    "todo: submitting title that fails local validation"
                );
            }
            guard.field.value.clone()
        };

        info!(title_chars = title.chars().count(), "todo: creating todo");
        let result = self.service.create_todo(&title).await;

        let mut guard = self.inner.lock().await;
        guard.in_flight = guard.in_flight.saturating_sub(1);
        match result {
            Ok(todo) => {
                guard.todos.push(todo.clone());
                guard.submit_error = None;
                drop(guard);
                let _ = self.events.send(ClientEvent::TodoCreated(todo.clone()));
                SubmitOutcome::Created(todo)
            }
            Err(err) => {
                guard.submit_error = Some(submit_error_message(&err));
                drop(guard);
                error!(context = ErrorContext::CreateTodo.as_str(), error = %err, "todo: request failed");
                let _ = self.events.send(ClientEvent::Error {
                    context: ErrorContext::CreateTodo,
                    message: err.to_string(),
                });
                SubmitOutcome::Failed
            }
        }
    }
}

fn submit_error_message(err: &ClientError) -> String {
    match err.service_message() {
        Some(message) => message.to_string(),
        None => TRANSPORT_FAILURE_MESSAGE.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/todo_form_tests.rs"]
mod tests;
