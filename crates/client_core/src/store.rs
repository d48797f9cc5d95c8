//! The current page of freelancers and the filters that produced it.

use std::{num::NonZeroU32, sync::Arc};

use shared::{
    domain::{Freelancer, FreelancerId},
    protocol::ListQuery,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    error::RemoteError,
    query::{build_query, FilterPatch, FilterState},
    remote::RecordService,
};

pub const LIST_FAILED_MESSAGE: &str = "An error occurred while fetching users.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was the latest issued one and replaced the page.
    Applied { count: usize },
    /// A newer request was issued before this one resolved; its result was dropped.
    Superseded,
}

struct StoreState {
    records: Vec<Freelancer>,
    filters: FilterState,
    latest_request: u64,
}

impl StoreState {
    fn issue(&mut self) -> PendingFetch {
        self.latest_request += 1;
        PendingFetch {
            request: self.latest_request,
            page_number: self.filters.page_number.get(),
            query: build_query(&self.filters),
        }
    }
}

struct PendingFetch {
    request: u64,
    page_number: u32,
    query: ListQuery,
}

pub struct CollectionStore {
    service: Arc<dyn RecordService>,
    inner: Mutex<StoreState>,
}

impl CollectionStore {
    pub fn new(service: Arc<dyn RecordService>) -> Arc<Self> {
        Self::with_filters(service, FilterState::default())
    }

    pub fn with_filters(service: Arc<dyn RecordService>, filters: FilterState) -> Arc<Self> {
        Arc::new(Self {
            service,
            inner: Mutex::new(StoreState {
                records: Vec::new(),
                filters,
                latest_request: 0,
            }),
        })
    }

    pub async fn records(&self) -> Vec<Freelancer> {
        self.inner.lock().await.records.clone()
    }

    pub async fn filters(&self) -> FilterState {
        self.inner.lock().await.filters.clone()
    }

    /// Looks `id` up on the current page only.
    pub async fn find(&self, id: FreelancerId) -> Option<Freelancer> {
        self.inner
            .lock()
            .await
            .records
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    pub async fn set_filters(&self, patch: FilterPatch) -> Result<FetchOutcome, RemoteError> {
        let pending = {
            let mut guard = self.inner.lock().await;
            guard.filters.apply(patch);
            guard.issue()
        };
        self.fetch(pending).await
    }

    pub async fn refetch(&self) -> Result<FetchOutcome, RemoteError> {
        let pending = self.inner.lock().await.issue();
        self.fetch(pending).await
    }

    pub async fn next_page(&self) -> Result<FetchOutcome, RemoteError> {
        let pending = {
            let mut guard = self.inner.lock().await;
            guard.filters.page_number = guard.filters.page_number.saturating_add(1);
            guard.issue()
        };
        self.fetch(pending).await
    }

    /// Steps back one page. At page 1 nothing changes and no request is made.
    pub async fn previous_page(&self) -> Result<Option<FetchOutcome>, RemoteError> {
        let pending = {
            let mut guard = self.inner.lock().await;
            let current = guard.filters.page_number.get();
            let Some(previous) = NonZeroU32::new(current - 1) else {
                return Ok(None);
            };
            guard.filters.page_number = previous;
            guard.issue()
        };
        self.fetch(pending).await.map(Some)
    }

    async fn fetch(&self, pending: PendingFetch) -> Result<FetchOutcome, RemoteError> {
        debug!(
            request = pending.request,
            page_number = pending.page_number,
            "issuing list request"
        );
        let result = self.service.list(&pending.query).await;

        let mut guard = self.inner.lock().await;
        if guard.latest_request != pending.request {
            debug!(
                request = pending.request,
                latest = guard.latest_request,
                ok = result.is_ok(),
                "discarding stale list response"
            );
            return Ok(FetchOutcome::Superseded);
        }

        match result {
            Ok(records) => {
                let count = records.len();
                guard.records = records;
                debug!(
                    request = pending.request,
                    page_number = pending.page_number,
                    count,
                    "page replaced"
                );
                Ok(FetchOutcome::Applied { count })
            }
            Err(err) => {
                drop(guard);
                warn!(request = pending.request, error = %err, "error fetching users");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
