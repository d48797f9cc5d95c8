//! In-memory record service for store and controller tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use shared::{
    domain::{Freelancer, FreelancerFields, FreelancerId},
    protocol::ListQuery,
};
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::{error::RemoteError, remote::RecordService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List(ListQuery),
    Create(FreelancerFields),
    Update(FreelancerId, Freelancer),
    Delete(FreelancerId),
}

type ListResult = Result<Vec<Freelancer>, RemoteError>;

enum ListScript {
    Ready(ListResult),
    Gated(oneshot::Receiver<ListResult>),
}

#[derive(Default)]
struct Failures {
    create: Option<RemoteError>,
    update: Option<RemoteError>,
    delete: Option<RemoteError>,
}

/// Keeps rows in memory and answers `list` with all of them unless a scripted
/// response is queued. Every call is recorded in order.
pub(crate) struct FakeRecordService {
    rows: Mutex<Vec<Freelancer>>,
    next_id: Mutex<i64>,
    calls: Mutex<Vec<Call>>,
    scripted_lists: Mutex<VecDeque<ListScript>>,
    failures: Mutex<Failures>,
    list_started: Mutex<Option<mpsc::UnboundedSender<ListQuery>>>,
    stall_mutation: Mutex<bool>,
}

impl FakeRecordService {
    pub(crate) fn with_rows(rows: Vec<Freelancer>) -> Self {
        let next_id = rows.iter().map(|row| row.id.0).max().unwrap_or(0) + 1;
        Self {
            rows: Mutex::new(rows),
            next_id: Mutex::new(next_id),
            calls: Mutex::new(Vec::new()),
            scripted_lists: Mutex::new(VecDeque::new()),
            failures: Mutex::new(Failures::default()),
            list_started: Mutex::new(None),
            stall_mutation: Mutex::new(false),
        }
    }

    pub(crate) async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn list_queries(&self) -> Vec<ListQuery> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                Call::List(query) => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) async fn rows(&self) -> Vec<Freelancer> {
        self.rows.lock().await.clone()
    }

    pub(crate) async fn queue_list(&self, result: ListResult) {
        self.scripted_lists
            .lock()
            .await
            .push_back(ListScript::Ready(result));
    }

    /// Queues a list response that resolves only when the returned sender fires.
    pub(crate) async fn queue_gated_list(&self) -> oneshot::Sender<ListResult> {
        let (tx, rx) = oneshot::channel();
        self.scripted_lists
            .lock()
            .await
            .push_back(ListScript::Gated(rx));
        tx
    }

    /// Reports each list call as soon as it starts, before it resolves.
    pub(crate) async fn watch_list_calls(&self) -> mpsc::UnboundedReceiver<ListQuery> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.list_started.lock().await = Some(tx);
        rx
    }

    pub(crate) async fn fail_next_create(&self, err: RemoteError) {
        self.failures.lock().await.create = Some(err);
    }

    pub(crate) async fn fail_next_update(&self, err: RemoteError) {
        self.failures.lock().await.update = Some(err);
    }

    pub(crate) async fn fail_next_delete(&self, err: RemoteError) {
        self.failures.lock().await.delete = Some(err);
    }

    /// The next create, update or delete is recorded and then never resolves.
    pub(crate) async fn stall_next_mutation(&self) {
        *self.stall_mutation.lock().await = true;
    }

    async fn stall_if_requested(&self) {
        let stall = std::mem::take(&mut *self.stall_mutation.lock().await);
        if stall {
            std::future::pending::<()>().await;
        }
    }
}

pub(crate) fn freelancer(id: i64, username: &str) -> Freelancer {
    Freelancer {
        id: FreelancerId(id),
        fields: FreelancerFields {
            username: username.into(),
            email: format!("{username}@example.com"),
            phone_number: "0123456789".into(),
            skillsets: "rust".into(),
            hobby: "chess".into(),
        },
    }
}

pub(crate) fn server_error(status: u16, body: &str) -> RemoteError {
    RemoteError::Server {
        status,
        body: Some(body.to_string()),
    }
}

#[async_trait]
impl RecordService for FakeRecordService {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Freelancer>, RemoteError> {
        self.calls.lock().await.push(Call::List(query.clone()));
        if let Some(tx) = self.list_started.lock().await.as_ref() {
            let _ = tx.send(query.clone());
        }

        let script = self.scripted_lists.lock().await.pop_front();
        match script {
            Some(ListScript::Ready(result)) => result,
            Some(ListScript::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(RemoteError::Network("gate dropped".into()))),
            None => Ok(self.rows.lock().await.clone()),
        }
    }

    async fn create(&self, fields: &FreelancerFields) -> Result<Freelancer, RemoteError> {
        self.calls.lock().await.push(Call::Create(fields.clone()));
        self.stall_if_requested().await;
        if let Some(err) = self.failures.lock().await.create.take() {
            return Err(err);
        }

        let mut next_id = self.next_id.lock().await;
        let record = Freelancer {
            id: FreelancerId(*next_id),
            fields: fields.clone(),
        };
        *next_id += 1;
        self.rows.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: FreelancerId,
        record: &Freelancer,
    ) -> Result<Freelancer, RemoteError> {
        self.calls
            .lock()
            .await
            .push(Call::Update(id, record.clone()));
        self.stall_if_requested().await;
        if let Some(err) = self.failures.lock().await.update.take() {
            return Err(err);
        }

        let mut rows = self.rows.lock().await;
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Err(RemoteError::Server {
                status: 404,
                body: None,
            });
        };
        *row = record.clone();
        Ok(record.clone())
    }

    async fn delete(&self, id: FreelancerId) -> Result<(), RemoteError> {
        self.calls.lock().await.push(Call::Delete(id));
        self.stall_if_requested().await;
        if let Some(err) = self.failures.lock().await.delete.take() {
            return Err(err);
        }

        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(RemoteError::Server {
                status: 404,
                body: None,
            });
        }
        Ok(())
    }
}
