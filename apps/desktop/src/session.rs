//! Routes console commands to the record manager and renders the result.

use client_core::{
    controller::failure_message, store::LIST_FAILED_MESSAGE, CreateWorkflow, DeleteWorkflow,
    EditWorkflow, FetchOutcome, FilterPatch, ManagerError, RecordManager, RemoteError, Workflow,
};

use crate::{
    commands::{Command, HELP},
    render::{render_create, render_delete, render_edit, render_page},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    manager: RecordManager,
}

impl Session {
    pub fn new(manager: RecordManager) -> Self {
        Self { manager }
    }

    /// Runs `command`, appending operator-facing output to `out`. Failures are
    /// reported in `out`; none of them ends the session.
    pub async fn handle(&mut self, command: Command, out: &mut String) -> Flow {
        match command {
            Command::List => self.show_page(out).await,
            Command::Refresh => {
                let result = self.manager.store().refetch().await;
                self.after_fetch(result, out).await;
            }
            Command::Filter { field, value } => {
                let result = self.manager.store().set_filters(field.patch(value)).await;
                self.after_fetch(result, out).await;
            }
            Command::PageSize(size) => {
                let result = self
                    .manager
                    .store()
                    .set_filters(FilterPatch::page_size(size))
                    .await;
                self.after_fetch(result, out).await;
            }
            Command::Next => {
                let result = self.manager.store().next_page().await;
                self.after_fetch(result, out).await;
            }
            Command::Prev => match self.manager.store().previous_page().await {
                Ok(None) => out.push_str("already on the first page\n"),
                Ok(Some(outcome)) => self.after_fetch(Ok(outcome), out).await,
                Err(err) => self.after_fetch(Err(err), out).await,
            },
            Command::Add => match self.manager.show_create_form() {
                Ok(()) => out.push_str(&render_create(self.manager.create_state())),
                Err(err) => report(out, &err),
            },
            Command::Edit(id) => match self.manager.open_edit_by_id(id).await {
                Ok(()) => out.push_str(&render_edit(self.manager.edit_state())),
                Err(err) => report(out, &err),
            },
            Command::Set { field, value } => {
                if matches!(self.manager.edit_state(), EditWorkflow::Open(_)) {
                    match self.manager.set_edit_field(field, value) {
                        Ok(()) => out.push_str(&render_edit(self.manager.edit_state())),
                        Err(err) => report(out, &err),
                    }
                } else if matches!(self.manager.create_state(), CreateWorkflow::Editing(_)) {
                    match self.manager.set_create_field(field, value) {
                        Ok(()) => out.push_str(&render_create(self.manager.create_state())),
                        Err(err) => report(out, &err),
                    }
                } else {
                    out.push_str("no open form; use 'add' or 'edit <id>' first\n");
                }
            }
            Command::Save => self.save(out).await,
            Command::Cancel => {
                if matches!(self.manager.delete_state(), DeleteWorkflow::ConfirmOpen(_)) {
                    self.manager.cancel_delete();
                    out.push_str("delete cancelled\n");
                } else if matches!(self.manager.edit_state(), EditWorkflow::Open(_)) {
                    self.manager.close_edit();
                    out.push_str("edit dialog closed\n");
                } else if matches!(self.manager.create_state(), CreateWorkflow::Editing(_)) {
                    self.manager.cancel_create();
                    out.push_str("add user form closed\n");
                } else {
                    out.push_str("nothing to cancel\n");
                }
            }
            Command::Delete(id) => match self.manager.request_delete(id) {
                Ok(()) => out.push_str(&render_delete(self.manager.delete_state())),
                Err(err) => report(out, &err),
            },
            Command::Confirm => {
                let pending = self.manager.delete_state().pending_id();
                match self.manager.confirm_delete().await {
                    Ok(()) => {
                        if let Some(id) = pending {
                            out.push_str(&format!("deleted user {id}\n"));
                        }
                        self.show_page(out).await;
                    }
                    Err(ManagerError::Remote(err)) => {
                        out.push_str(&format!("error: {}\n", failure_message(Workflow::Delete, &err)));
                    }
                    Err(err) => report(out, &err),
                }
            }
            Command::Help => {
                out.push_str(HELP);
                out.push('\n');
            }
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Submits whichever form is open, the edit dialog first.
    async fn save(&mut self, out: &mut String) {
        if matches!(self.manager.edit_state(), EditWorkflow::Open(_)) {
            match self.manager.submit_edit().await {
                Ok(record) => {
                    out.push_str(&format!("saved user {}\n", record.id));
                    self.show_page(out).await;
                }
                Err(ManagerError::Remote(_)) => {
                    out.push_str(&render_edit(self.manager.edit_state()));
                }
                Err(err) => report(out, &err),
            }
        } else if matches!(self.manager.create_state(), CreateWorkflow::Editing(_)) {
            match self.manager.submit_create().await {
                Ok(record) => {
                    out.push_str(&format!("added user {}\n", record.id));
                    self.show_page(out).await;
                }
                Err(ManagerError::Validation(_)) | Err(ManagerError::Remote(_)) => {
                    out.push_str(&render_create(self.manager.create_state()));
                }
                Err(err) => report(out, &err),
            }
        } else {
            out.push_str("no open form to save\n");
        }
    }

    async fn after_fetch(&self, result: Result<FetchOutcome, RemoteError>, out: &mut String) {
        match result {
            Ok(FetchOutcome::Applied { .. }) => self.show_page(out).await,
            Ok(FetchOutcome::Superseded) => {}
            Err(err) => {
                out.push_str(&format!("error: {}\n", err.display_message(LIST_FAILED_MESSAGE)));
            }
        }
    }

    async fn show_page(&self, out: &mut String) {
        let store = self.manager.store();
        let filters = store.filters().await;
        let records = store.records().await;
        out.push_str(&render_page(&filters, &records));
    }
}

fn report(out: &mut String, err: &ManagerError) {
    out.push_str(&format!("error: {err}\n"));
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
