//! Screen controller for the roster screen.
//!
//! # Responsibility
//! - Own the add form, the edit modal and the delete prompt.
//! - Run store calls inside the screen's lifecycle scope.
//! - Publish `ScreenState` for the UI shell to render.
//!
//! # Invariants
//! - `phase` and the adapter change only when the list subscription emits.
//! - An invalid add/update posts a warning and never writes.
//! - A cancelled action leaves screen state untouched.
//! - Both modals ignore outside taps; only confirm/cancel closes them.

use crate::model::employee::{Employee, EmployeeId, EmployeeInput, EmployeeValidationError};
use crate::store::{EmployeeStore, StoreError};
use crate::ui::adapter::{EmployeeListAdapter, RowAction};
use crate::ui::messages::{MessageCatalog, Notice};
use crate::ui::scope::LifecycleScope;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

pub type ScreenResult<T> = Result<T, ScreenError>;

/// Failure of a user action that reached storage.
#[derive(Debug)]
pub enum ScreenError {
    Store(StoreError),
}

impl Display for ScreenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ScreenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ScreenError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Which of the two list areas is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenPhase {
    /// No snapshot received yet.
    #[default]
    Idle,
    /// Table is empty; list hidden.
    ShowingEmptyMessage,
    /// Table has rows; empty message hidden.
    ShowingList,
}

/// Open edit modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDialog {
    pub employee_id: EmployeeId,
    /// Current field contents, prefilled from the store once the row loads.
    pub input: EmployeeInput,
    /// Whether the row has been loaded at least once.
    pub loaded: bool,
}

/// Open delete confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub employee_id: EmployeeId,
    pub title: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

/// Everything the UI shell needs to render the screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenState {
    pub phase: ScreenPhase,
    pub adapter: EmployeeListAdapter,
    pub form: EmployeeInput,
    pub edit_dialog: Option<EditDialog>,
    pub delete_prompt: Option<DeletePrompt>,
    /// Pending toasts, oldest first. Drained by `EmployeeScreen::take_notices`.
    pub notices: Vec<Notice>,
}

impl ScreenState {
    pub fn list_visible(&self) -> bool {
        self.phase == ScreenPhase::ShowingList
    }

    pub fn empty_message_visible(&self) -> bool {
        self.phase == ScreenPhase::ShowingEmptyMessage
    }

    fn apply_snapshot(&mut self, employees: Vec<Employee>) {
        if employees.is_empty() {
            self.phase = ScreenPhase::ShowingEmptyMessage;
            self.adapter = EmployeeListAdapter::default();
        } else {
            self.phase = ScreenPhase::ShowingList;
            self.adapter = EmployeeListAdapter::new(employees);
        }
    }
}

/// Result of a user action that completed without a storage fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The store call finished and the screen was updated.
    Completed,
    /// Input failed validation; a warning was posted and nothing was written.
    Rejected(EmployeeValidationError),
    /// The screen was destroyed before the call finished.
    Cancelled,
    /// No modal was open for this action.
    Ignored,
}

/// Controller for the single roster screen.
pub struct EmployeeScreen {
    store: EmployeeStore,
    messages: MessageCatalog,
    scope: LifecycleScope,
    dialog_scope: Mutex<Option<LifecycleScope>>,
    state_tx: Arc<watch::Sender<ScreenState>>,
}

impl EmployeeScreen {
    /// Creates the screen and starts observing the employee list.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(store: EmployeeStore, messages: MessageCatalog) -> Self {
        let (state_tx, _) = watch::channel(ScreenState::default());
        let screen = Self {
            store,
            messages,
            scope: LifecycleScope::new(),
            dialog_scope: Mutex::new(None),
            state_tx: Arc::new(state_tx),
        };
        screen.observe_employees();
        info!("event=screen_start module=ui status=ok");
        screen
    }

    fn observe_employees(&self) {
        let mut subscription = self.store.fetch_all();
        let state_tx = Arc::clone(&self.state_tx);
        self.scope.launch(async move {
            loop {
                match subscription.next().await {
                    Ok(employees) => {
                        state_tx.send_modify(move |state| state.apply_snapshot(employees));
                    }
                    Err(err) => {
                        error!("event=screen_observe module=ui status=error error={err}");
                        break;
                    }
                }
            }
        });
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    /// Snapshot of the current screen state.
    pub fn state(&self) -> ScreenState {
        self.state_tx.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<ScreenState> {
        self.state_tx.subscribe()
    }

    /// Drains pending toasts.
    pub fn take_notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        self.state_tx.send_if_modified(|state| {
            notices = std::mem::take(&mut state.notices);
            !notices.is_empty()
        });
        notices
    }

    pub fn set_name_input(&self, name: impl Into<String>) {
        let name = name.into();
        self.state_tx.send_modify(move |state| state.form.name = name);
    }

    pub fn set_email_input(&self, email: impl Into<String>) {
        let email = email.into();
        self.state_tx.send_modify(move |state| state.form.email = email);
    }

    /// Add button: validate the form, insert, clear the form.
    ///
    /// # Errors
    /// - `ScreenError::Store` when the insert fails; the form is kept.
    pub async fn add_record(&self) -> ScreenResult<ActionOutcome> {
        let input = self.state_tx.borrow().form.clone();
        let employee = match input.into_new_employee() {
            Ok(employee) => employee,
            Err(err) => {
                self.post_notice(Notice::EmptyFieldWarning);
                return Ok(ActionOutcome::Rejected(err));
            }
        };

        let Some(result) = self.scope.run(self.store.insert(employee)).await else {
            return Ok(ActionOutcome::Cancelled);
        };
        let id = result?;
        if self.scope.is_cancelled() {
            return Ok(ActionOutcome::Cancelled);
        }

        self.state_tx.send_modify(|state| {
            state.form = EmployeeInput::default();
            state.notices.push(Notice::RecordSaved);
        });
        info!("event=screen_add module=ui status=ok employee_id={id}");
        Ok(ActionOutcome::Completed)
    }

    /// Dispatches an adapter row action.
    pub fn handle_row_action(&self, action: RowAction) {
        match action {
            RowAction::Edit(id) => self.open_edit_dialog(id),
            RowAction::Delete(id) => self.request_delete(id),
        }
    }

    /// Opens the edit modal and keeps it filled from the row's subscription.
    ///
    /// Fields stay empty if the id does not exist.
    pub fn open_edit_dialog(&self, id: EmployeeId) {
        let dialog_scope = LifecycleScope::new();
        let dialog_token = dialog_scope.token();
        self.replace_dialog_scope(Some(dialog_scope));

        self.state_tx.send_modify(|state| {
            state.edit_dialog = Some(EditDialog {
                employee_id: id,
                input: EmployeeInput::default(),
                loaded: false,
            });
        });

        let mut subscription = self.store.fetch_by_id(id);
        let state_tx = Arc::clone(&self.state_tx);
        self.scope.launch(async move {
            let load = async move {
                loop {
                    match subscription.next().await {
                        Ok(employee) => state_tx.send_modify(move |state| {
                            if let Some(dialog) = state.edit_dialog.as_mut() {
                                if dialog.employee_id == employee.id {
                                    dialog.input = EmployeeInput::new(employee.name, employee.email);
                                    dialog.loaded = true;
                                }
                            }
                        }),
                        Err(err) => {
                            error!(
                                "event=edit_dialog_load module=ui status=error employee_id={id} error={err}"
                            );
                            break;
                        }
                    }
                }
            };
            let _ = dialog_token.run_until_cancelled(load).await;
        });
    }

    /// Types into the edit modal. Returns `false` when no modal is open.
    pub fn set_edit_inputs(&self, name: impl Into<String>, email: impl Into<String>) -> bool {
        let input = EmployeeInput::new(name, email);
        self.state_tx.send_if_modified(move |state| match state.edit_dialog.as_mut() {
            Some(dialog) => {
                dialog.input = input;
                true
            }
            None => false,
        })
    }

    /// Update button in the edit modal.
    ///
    /// Invalid input posts the warning and leaves the modal open. Updating a
    /// row that no longer exists is a silent no-op.
    pub async fn confirm_edit(&self) -> ScreenResult<ActionOutcome> {
        let Some(dialog) = self.state_tx.borrow().edit_dialog.clone() else {
            return Ok(ActionOutcome::Ignored);
        };

        let employee = match dialog.input.into_employee(dialog.employee_id) {
            Ok(employee) => employee,
            Err(err) => {
                self.post_notice(Notice::EmptyFieldWarning);
                return Ok(ActionOutcome::Rejected(err));
            }
        };

        let Some(result) = self.scope.run(self.store.update(employee)).await else {
            return Ok(ActionOutcome::Cancelled);
        };
        result?;
        if self.scope.is_cancelled() {
            return Ok(ActionOutcome::Cancelled);
        }

        self.close_edit_dialog();
        self.post_notice(Notice::RecordUpdated);
        Ok(ActionOutcome::Completed)
    }

    /// Cancel button in the edit modal. Returns `false` when no modal is open.
    pub fn cancel_edit(&self) -> bool {
        self.close_edit_dialog()
    }

    /// Opens the delete confirmation prompt for `id`.
    pub fn request_delete(&self, id: EmployeeId) {
        let prompt = DeletePrompt {
            employee_id: id,
            title: self.messages.delete_prompt_title.clone(),
            confirm_label: self.messages.delete_label.clone(),
            cancel_label: self.messages.cancel_label.clone(),
        };
        self.state_tx
            .send_modify(move |state| state.delete_prompt = Some(prompt));
    }

    /// Confirm button in the delete prompt.
    ///
    /// The prompt closes once the delete finished, together with the notice.
    /// Deleting a missing id is a silent no-op.
    pub async fn confirm_delete(&self) -> ScreenResult<ActionOutcome> {
        let Some(prompt) = self.state_tx.borrow().delete_prompt.clone() else {
            return Ok(ActionOutcome::Ignored);
        };

        let delete = self.store.delete(Employee::key(prompt.employee_id));
        let Some(result) = self.scope.run(delete).await else {
            return Ok(ActionOutcome::Cancelled);
        };
        result?;
        if self.scope.is_cancelled() {
            return Ok(ActionOutcome::Cancelled);
        }

        let employee_id = prompt.employee_id;
        self.state_tx.send_modify(|state| {
            if state
                .delete_prompt
                .as_ref()
                .is_some_and(|open| open.employee_id == employee_id)
            {
                state.delete_prompt = None;
            }
            state.notices.push(Notice::RecordDeleted);
        });
        Ok(ActionOutcome::Completed)
    }

    /// Cancel button in the delete prompt. Returns `false` when no prompt is open.
    pub fn cancel_delete(&self) -> bool {
        self.state_tx
            .send_if_modified(|state| state.delete_prompt.take().is_some())
    }

    /// Tap outside an open modal. Modals are not cancelable, so nothing closes.
    pub fn tap_outside_modal(&self) -> bool {
        false
    }

    /// Cancels every pending task and action of this screen.
    pub fn destroy(&self) {
        self.replace_dialog_scope(None);
        self.scope.cancel();
        info!("event=screen_destroy module=ui status=ok");
    }

    pub fn is_destroyed(&self) -> bool {
        self.scope.is_cancelled()
    }

    fn close_edit_dialog(&self) -> bool {
        self.replace_dialog_scope(None);
        self.state_tx
            .send_if_modified(|state| state.edit_dialog.take().is_some())
    }

    fn replace_dialog_scope(&self, next: Option<LifecycleScope>) {
        let mut slot = self
            .dialog_scope
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // The previous scope is cancelled on drop.
        *slot = next;
    }

    fn post_notice(&self, notice: Notice) {
        self.state_tx.send_modify(|state| state.notices.push(notice));
    }
}
