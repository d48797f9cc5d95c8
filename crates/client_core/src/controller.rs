//! Create/edit/delete workflows over the record service.
//!
//! Each workflow is a tagged state value moved only by the operations below.
//! Successful mutations resynchronize the [`CollectionStore`] with a refetch;
//! records are never patched locally.

use std::{mem, sync::Arc};

use shared::domain::{Freelancer, FreelancerFields, FreelancerId, RecordField};
use tracing::{info, warn};

use crate::{
    error::{ManagerError, RemoteError, Workflow},
    remote::RecordService,
    store::CollectionStore,
    validation::{validate, ValidationErrors},
};

pub const CREATE_FAILED_MESSAGE: &str = "An error occurred while adding the user.";
pub const UPDATE_FAILED_MESSAGE: &str = "An error occurred while updating the user.";
pub const DELETE_FAILED_MESSAGE: &str = "An error occurred while deleting the user.";

/// Unsaved field values plus the validation messages shown beside them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub fields: FreelancerFields,
    pub errors: ValidationErrors,
}

impl Draft {
    /// Editing a field clears the message attached to it.
    pub fn set(&mut self, field: RecordField, value: impl Into<String>) {
        self.fields.set(field, value);
        self.errors.clear(field);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub draft: Draft,
    pub server_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CreateWorkflow {
    #[default]
    Hidden,
    Editing(CreateForm),
    Submitting(Draft),
}

impl CreateWorkflow {
    fn name(&self) -> &'static str {
        match self {
            CreateWorkflow::Hidden => "hidden",
            CreateWorkflow::Editing(_) => "editing",
            CreateWorkflow::Submitting(_) => "submitting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDialog {
    pub record: Freelancer,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditWorkflow {
    #[default]
    Closed,
    Open(EditDialog),
    Submitting(Freelancer),
}

impl EditWorkflow {
    fn name(&self) -> &'static str {
        match self {
            EditWorkflow::Closed => "closed",
            EditWorkflow::Open(_) => "open",
            EditWorkflow::Submitting(_) => "submitting",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteWorkflow {
    #[default]
    Closed,
    ConfirmOpen(FreelancerId),
    Deleting(FreelancerId),
}

impl DeleteWorkflow {
    fn name(&self) -> &'static str {
        match self {
            DeleteWorkflow::Closed => "closed",
            DeleteWorkflow::ConfirmOpen(_) => "awaiting confirmation",
            DeleteWorkflow::Deleting(_) => "deleting",
        }
    }

    pub fn pending_id(&self) -> Option<FreelancerId> {
        match self {
            DeleteWorkflow::Closed => None,
            DeleteWorkflow::ConfirmOpen(id) | DeleteWorkflow::Deleting(id) => Some(*id),
        }
    }
}

pub struct RecordManager {
    service: Arc<dyn RecordService>,
    store: Arc<CollectionStore>,
    create: CreateWorkflow,
    edit: EditWorkflow,
    delete: DeleteWorkflow,
}

impl RecordManager {
    pub fn new(service: Arc<dyn RecordService>) -> Self {
        let store = CollectionStore::new(service.clone());
        Self::with_store(service, store)
    }

    pub fn with_store(service: Arc<dyn RecordService>, store: Arc<CollectionStore>) -> Self {
        Self {
            service,
            store,
            create: CreateWorkflow::Hidden,
            edit: EditWorkflow::Closed,
            delete: DeleteWorkflow::Closed,
        }
    }

    pub fn store(&self) -> &Arc<CollectionStore> {
        &self.store
    }

    pub fn create_state(&self) -> &CreateWorkflow {
        &self.create
    }

    pub fn edit_state(&self) -> &EditWorkflow {
        &self.edit
    }

    pub fn delete_state(&self) -> &DeleteWorkflow {
        &self.delete
    }

    /// Opens an empty create form. An already open form keeps its values.
    pub fn show_create_form(&mut self) -> Result<(), ManagerError> {
        match &self.create {
            CreateWorkflow::Hidden => {
                self.create = CreateWorkflow::Editing(CreateForm::default());
                Ok(())
            }
            CreateWorkflow::Editing(_) => Ok(()),
            other => Err(invalid(Workflow::Create, "open", other.name())),
        }
    }

    pub fn set_create_field(
        &mut self,
        field: RecordField,
        value: impl Into<String>,
    ) -> Result<(), ManagerError> {
        let CreateWorkflow::Editing(form) = &mut self.create else {
            return Err(invalid(Workflow::Create, "edit a field", self.create.name()));
        };
        form.draft.set(field, value);
        form.server_error = None;
        Ok(())
    }

    pub fn cancel_create(&mut self) {
        self.create = CreateWorkflow::Hidden;
    }

    /// Validates the form and, if it is clean, creates the record.
    ///
    /// Field errors keep the form open without touching the network. A
    /// rejected create keeps the entered values and shows the server's message.
    pub async fn submit_create(&mut self) -> Result<Freelancer, ManagerError> {
        let mut draft = match mem::take(&mut self.create) {
            CreateWorkflow::Editing(form) => form.draft,
            other => {
                let state = other.name();
                self.create = other;
                return Err(invalid(Workflow::Create, "submit", state));
            }
        };

        let errors = validate(&draft.fields);
        if !errors.is_empty() {
            draft.errors = errors.clone();
            self.create = CreateWorkflow::Editing(CreateForm {
                draft,
                server_error: None,
            });
            return Err(ManagerError::Validation(errors));
        }

        draft.errors = ValidationErrors::default();
        let fields = draft.fields.clone();
        self.create = CreateWorkflow::Submitting(draft);
        let in_flight = InFlight::new(&mut self.create, reopen_create);

        match self.service.create(&fields).await {
            Ok(record) => {
                info!(id = %record.id, username = %record.fields.username, "user added");
                in_flight.settle(|_| CreateWorkflow::Hidden);
                self.resync().await;
                Ok(record)
            }
            Err(err) => {
                warn!(error = %err, "error adding user");
                let server_error = Some(failure_message(Workflow::Create, &err));
                in_flight.settle(|state| match state {
                    CreateWorkflow::Submitting(draft) => {
                        CreateWorkflow::Editing(CreateForm { draft, server_error })
                    }
                    other => other,
                });
                Err(err.into())
            }
        }
    }

    /// Opens the edit dialog on a copy of `record`. No validation runs here.
    pub fn open_edit(&mut self, record: Freelancer) -> Result<(), ManagerError> {
        if let EditWorkflow::Submitting(_) = self.edit {
            return Err(invalid(Workflow::Edit, "open", self.edit.name()));
        }
        self.edit = EditWorkflow::Open(EditDialog {
            record,
            error: None,
        });
        Ok(())
    }

    /// Opens the edit dialog for a record on the current page.
    pub async fn open_edit_by_id(&mut self, id: FreelancerId) -> Result<(), ManagerError> {
        let record = self
            .store
            .find(id)
            .await
            .ok_or(ManagerError::NotOnPage(id))?;
        self.open_edit(record)
    }

    pub fn set_edit_field(
        &mut self,
        field: RecordField,
        value: impl Into<String>,
    ) -> Result<(), ManagerError> {
        let EditWorkflow::Open(dialog) = &mut self.edit else {
            return Err(invalid(Workflow::Edit, "edit a field", self.edit.name()));
        };
        dialog.record.fields.set(field, value);
        dialog.error = None;
        Ok(())
    }

    pub fn close_edit(&mut self) {
        self.edit = EditWorkflow::Closed;
    }

    /// Sends the dialog's record as-is; edits are not validated client-side.
    ///
    /// On failure the dialog stays open with the error attached.
    pub async fn submit_edit(&mut self) -> Result<Freelancer, ManagerError> {
        let record = match mem::take(&mut self.edit) {
            EditWorkflow::Open(dialog) => dialog.record,
            other => {
                let state = other.name();
                self.edit = other;
                return Err(invalid(Workflow::Edit, "submit", state));
            }
        };

        self.edit = EditWorkflow::Submitting(record.clone());
        let in_flight = InFlight::new(&mut self.edit, reopen_edit);

        match self.service.update(record.id, &record).await {
            Ok(updated) => {
                info!(id = %updated.id, "user updated");
                in_flight.settle(|_| EditWorkflow::Closed);
                self.resync().await;
                Ok(updated)
            }
            Err(err) => {
                warn!(id = %record.id, error = %err, "error updating user");
                let error = Some(failure_message(Workflow::Edit, &err));
                in_flight.settle(|_| EditWorkflow::Open(EditDialog { record, error }));
                Err(err.into())
            }
        }
    }

    pub fn request_delete(&mut self, id: FreelancerId) -> Result<(), ManagerError> {
        if let DeleteWorkflow::Deleting(_) = self.delete {
            return Err(invalid(Workflow::Delete, "open", self.delete.name()));
        }
        self.delete = DeleteWorkflow::ConfirmOpen(id);
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.delete = DeleteWorkflow::Closed;
    }

    /// Deletes the pending record. The confirmation closes whatever the outcome;
    /// a failed delete is reported to the caller and not retried.
    pub async fn confirm_delete(&mut self) -> Result<(), ManagerError> {
        let DeleteWorkflow::ConfirmOpen(id) = self.delete else {
            return Err(invalid(Workflow::Delete, "confirm", self.delete.name()));
        };

        self.delete = DeleteWorkflow::Deleting(id);
        let in_flight = InFlight::new(&mut self.delete, |state| *state = DeleteWorkflow::Closed);
        let result = self.service.delete(id).await;
        in_flight.settle(|_| DeleteWorkflow::Closed);

        match result {
            Ok(()) => {
                info!(%id, "user deleted");
                self.resync().await;
                Ok(())
            }
            Err(err) => {
                warn!(%id, error = %err, "error deleting user");
                Err(err.into())
            }
        }
    }

    async fn resync(&self) {
        if let Err(err) = self.store.refetch().await {
            warn!(error = %err, "refetch after mutation failed");
        }
    }
}

/// Holds a workflow in its in-flight state across a request. If the submitting
/// future is dropped before [`InFlight::settle`], `on_drop` puts the workflow
/// back where the operator can retry or cancel.
struct InFlight<'a, T: Default> {
    slot: &'a mut T,
    on_drop: fn(&mut T),
    settled: bool,
}

impl<'a, T: Default> InFlight<'a, T> {
    fn new(slot: &'a mut T, on_drop: fn(&mut T)) -> Self {
        Self {
            slot,
            on_drop,
            settled: false,
        }
    }

    fn settle(mut self, next: impl FnOnce(T) -> T) {
        let current = mem::take(&mut *self.slot);
        *self.slot = next(current);
        self.settled = true;
    }
}

impl<T: Default> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            (self.on_drop)(&mut *self.slot);
        }
    }
}

fn reopen_create(state: &mut CreateWorkflow) {
    if let CreateWorkflow::Submitting(draft) = mem::take(state) {
        warn!("add user request abandoned");
        *state = CreateWorkflow::Editing(CreateForm {
            draft,
            server_error: None,
        });
    }
}

fn reopen_edit(state: &mut EditWorkflow) {
    if let EditWorkflow::Submitting(record) = mem::take(state) {
        warn!(id = %record.id, "update request abandoned");
        *state = EditWorkflow::Open(EditDialog {
            record,
            error: None,
        });
    }
}

/// Operator-facing text for a failed workflow step.
pub fn failure_message(workflow: Workflow, err: &RemoteError) -> String {
    let fallback = match workflow {
        Workflow::Create => CREATE_FAILED_MESSAGE,
        Workflow::Edit => UPDATE_FAILED_MESSAGE,
        Workflow::Delete => DELETE_FAILED_MESSAGE,
    };
    err.display_message(fallback)
}

fn invalid(workflow: Workflow, action: &'static str, state: &'static str) -> ManagerError {
    ManagerError::InvalidState {
        workflow,
        action,
        state,
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
