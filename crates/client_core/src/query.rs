//! Filter and pagination state, and its projection into list requests.

use std::num::NonZeroU32;

use shared::protocol::ListQuery;

pub const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(5) {
    Some(size) => size,
    None => unreachable!(),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub username: String,
    pub phone_number: String,
    pub email: String,
    pub page_number: NonZeroU32,
    pub page_size: NonZeroU32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            username: String::new(),
            phone_number: String::new(),
            email: String::new(),
            page_number: NonZeroU32::MIN,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterState {
    pub fn with_page_size(page_size: NonZeroU32) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    /// Merges `patch` in place. The page number is left alone unless the patch
    /// sets it, so narrowing a filter keeps the current page.
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(v) = patch.username {
            self.username = v;
        }
        if let Some(v) = patch.phone_number {
            self.phone_number = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.page_number {
            self.page_number = v;
        }
        if let Some(v) = patch.page_size {
            self.page_size = v;
        }
    }
}

/// Partial update of [`FilterState`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub username: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub page_number: Option<NonZeroU32>,
    pub page_size: Option<NonZeroU32>,
}

impl FilterPatch {
    pub fn username(value: impl Into<String>) -> Self {
        Self {
            username: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn phone_number(value: impl Into<String>) -> Self {
        Self {
            phone_number: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn email(value: impl Into<String>) -> Self {
        Self {
            email: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn page_size(value: NonZeroU32) -> Self {
        Self {
            page_size: Some(value),
            ..Self::default()
        }
    }
}

pub fn build_query(filters: &FilterState) -> ListQuery {
    ListQuery {
        username: filters.username.clone(),
        phone_number: filters.phone_number.clone(),
        email: filters.email.clone(),
        page_number: filters.page_number,
        page_size: filters.page_size,
    }
}
