use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

/// Contact row. `owner_id` stays server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Contact {
    pub id: i64,
    #[serde(skip_serializing)]
    pub owner_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: Date,
    pub additional_info: Option<String>,
}

/// Writable contact fields; the create body and what an update writes back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: Date,
    #[serde(default)]
    pub additional_info: Option<String>,
}

impl From<Contact> for ContactDraft {
    fn from(c: Contact) -> Self {
        Self {
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            phone_number: c.phone_number,
            birthday: c.birthday,
            additional_info: c.additional_info,
        }
    }
}
