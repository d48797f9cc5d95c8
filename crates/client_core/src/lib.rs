//! Client-side state for browsing and editing freelancer records held by a
//! remote record service.

pub mod controller;
pub mod error;
pub mod query;
pub mod remote;
pub mod store;
pub mod validation;

pub use controller::{
    CreateForm, CreateWorkflow, DeleteWorkflow, Draft, EditDialog, EditWorkflow, RecordManager,
};
pub use error::{ManagerError, RemoteError, Workflow};
pub use query::{build_query, FilterPatch, FilterState};
pub use remote::{HttpRecordService, RecordService};
pub use store::{CollectionStore, FetchOutcome};
pub use validation::{validate, ValidationErrors};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
