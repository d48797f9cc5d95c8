use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::domain::{Freelancer, FreelancerFields, FreelancerId};

/// Query string of `GET /api/User`.
///
/// Empty filter values are sent as-is; the service reads them as "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub username: String,
    pub phone_number: String,
    pub email: String,
    pub page_number: NonZeroU32,
    pub page_size: NonZeroU32,
}

/// Body of `POST /api/User`.
pub type CreateFreelancerRequest = FreelancerFields;

/// Body of `PUT /api/User/{id}`.
pub type UpdateFreelancerRequest = Freelancer;

pub const USER_COLLECTION_PATH: &str = "/api/User";

pub fn user_item_path(id: FreelancerId) -> String {
    format!("{USER_COLLECTION_PATH}/{}", id.0)
}
