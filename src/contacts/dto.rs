use serde::{Deserialize, Deserializer};
use time::Date;

use super::repo_types::ContactDraft;

/// Partial update; absent fields keep their stored value.
///
/// `additional_info` is the only nullable field: absent keeps it, `null`
/// clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub birthday: Option<Date>,
    #[serde(default, deserialize_with = "present")]
    pub additional_info: Option<Option<String>>,
}

// Only called when the key is present, so `null` becomes `Some(None)`.
fn present<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(de).map(Some)
}

impl ContactUpdate {
    pub fn merge_into(self, draft: &mut ContactDraft) {
        if let Some(v) = self.first_name {
            draft.first_name = v;
        }
        if let Some(v) = self.last_name {
            draft.last_name = v;
        }
        if let Some(v) = self.email {
            draft.email = v;
        }
        if let Some(v) = self.phone_number {
            draft.phone_number = v;
        }
        if let Some(v) = self.birthday {
            draft.birthday = v;
        }
        if let Some(v) = self.additional_info {
            draft.additional_info = v;
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}
