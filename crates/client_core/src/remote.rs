//! Access to the remote freelancer collection.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{Freelancer, FreelancerFields, FreelancerId},
    protocol::{user_item_path, ListQuery, USER_COLLECTION_PATH},
};
use tracing::{debug, warn};
use url::Url;

use crate::error::RemoteError;

#[async_trait]
pub trait RecordService: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Freelancer>, RemoteError>;
    async fn create(&self, fields: &FreelancerFields) -> Result<Freelancer, RemoteError>;
    async fn update(
        &self,
        id: FreelancerId,
        record: &Freelancer,
    ) -> Result<Freelancer, RemoteError>;
    async fn delete(&self, id: FreelancerId) -> Result<(), RemoteError>;
}

/// [`RecordService`] over the service's JSON HTTP API.
#[derive(Debug, Clone)]
pub struct HttpRecordService {
    http: Client,
    base_url: String,
}

impl HttpRecordService {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    fn collection_url(&self) -> String {
        format!("{}{USER_COLLECTION_PATH}", self.base_url)
    }

    fn item_url(&self, id: FreelancerId) -> String {
        format!("{}{}", self.base_url, user_item_path(id))
    }
}

#[async_trait]
impl RecordService for HttpRecordService {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Freelancer>, RemoteError> {
        debug!(
            page_number = query.page_number.get(),
            page_size = query.page_size.get(),
            "listing freelancers"
        );
        let res = self
            .http
            .get(self.collection_url())
            .query(query)
            .send()
            .await?;
        let body = ensure_success(res).await?.text().await?;
        decode_body(&body)
    }

    async fn create(&self, fields: &FreelancerFields) -> Result<Freelancer, RemoteError> {
        debug!(username = %fields.username, "creating freelancer");
        let res = self
            .http
            .post(self.collection_url())
            .json(fields)
            .send()
            .await?;
        let body = ensure_success(res).await?.text().await?;
        decode_body(&body)
    }

    async fn update(
        &self,
        id: FreelancerId,
        record: &Freelancer,
    ) -> Result<Freelancer, RemoteError> {
        debug!(%id, "updating freelancer");
        let res = self
            .http
            .put(self.item_url(id))
            .json(record)
            .send()
            .await?;
        let body = ensure_success(res).await?.text().await?;
        if body.trim().is_empty() {
            // 204 or an empty 200: the service applied the record as sent.
            return Ok(record.clone());
        }
        decode_body(&body)
    }

    async fn delete(&self, id: FreelancerId) -> Result<(), RemoteError> {
        debug!(%id, "deleting freelancer");
        let res = self.http.delete(self.item_url(id)).send().await?;
        ensure_success(res).await?;
        Ok(())
    }
}

fn normalize_base_url(raw: &str) -> Result<String, RemoteError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| RemoteError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

async fn ensure_success(res: Response) -> Result<Response, RemoteError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let raw = match res.text().await {
        Ok(raw) => raw,
        Err(err) => {
            warn!(%status, error = %err, "failed to read error body");
            String::new()
        }
    };
    Err(RemoteError::Server {
        status: status.as_u16(),
        body: error_body_text(&raw),
    })
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, RemoteError> {
    serde_json::from_str(body).map_err(|err| {
        warn!(error = %err, "undecodable success body");
        RemoteError::Decode(err.to_string())
    })
}

/// Services commonly answer with a bare JSON string; unwrap it so the operator
/// sees the message rather than a quoted literal. Anything else is kept as-is.
fn error_body_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(message)) if !message.trim().is_empty() => Some(message),
        Ok(Value::String(_)) => None,
        _ => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
