use time::{Date, Duration};
use tracing::{debug, info};

use super::{
    dto::{ContactUpdate, Pagination},
    repo::ContactStore,
    repo_types::{Contact, ContactDraft},
};
use crate::error::AppError;

/// Days after today still counted as "upcoming".
pub const BIRTHDAY_WINDOW_DAYS: i64 = 7;

const NOT_FOUND: AppError = AppError::NotFound("Contact");

pub async fn create(
    store: &dyn ContactStore,
    owner_id: i64,
    draft: ContactDraft,
) -> Result<Contact, AppError> {
    let contact = store.insert(owner_id, &draft).await?;
    info!(owner_id, contact_id = contact.id, "contact created");
    Ok(contact)
}

pub async fn get(store: &dyn ContactStore, owner_id: i64, id: i64) -> Result<Contact, AppError> {
    store.get(owner_id, id).await?.ok_or(NOT_FOUND)
}

pub async fn list(
    store: &dyn ContactStore,
    owner_id: i64,
    page: Pagination,
) -> Result<Vec<Contact>, AppError> {
    if page.skip < 0 || page.limit < 0 {
        return Err(AppError::Validation(
            "skip and limit must not be negative".into(),
        ));
    }
    Ok(store.list(owner_id, page.skip, page.limit).await?)
}

/// Loads the owned row, merges the present fields, writes it back.
pub async fn update(
    store: &dyn ContactStore,
    owner_id: i64,
    id: i64,
    patch: ContactUpdate,
) -> Result<Contact, AppError> {
    let mut draft = ContactDraft::from(get(store, owner_id, id).await?);
    patch.merge_into(&mut draft);
    let contact = store.update(owner_id, id, &draft).await?.ok_or(NOT_FOUND)?;
    info!(owner_id, contact_id = id, "contact updated");
    Ok(contact)
}

pub async fn delete(store: &dyn ContactStore, owner_id: i64, id: i64) -> Result<Contact, AppError> {
    let contact = store.delete(owner_id, id).await?.ok_or(NOT_FOUND)?;
    info!(owner_id, contact_id = id, "contact deleted");
    Ok(contact)
}

pub async fn search(
    store: &dyn ContactStore,
    owner_id: i64,
    query: &str,
) -> Result<Vec<Contact>, AppError> {
    Ok(store.search(owner_id, query).await?)
}

/// Contacts whose stored birthday lies in `[today, today + 7 days]`.
///
/// The comparison is on the full calendar date, birth year included.
pub async fn upcoming_birthdays(
    store: &dyn ContactStore,
    owner_id: i64,
    today: Date,
) -> Result<Vec<Contact>, AppError> {
    let until = today
        .checked_add(Duration::days(BIRTHDAY_WINDOW_DAYS))
        .unwrap_or(Date::MAX);
    debug!(owner_id, %today, %until, "upcoming birthdays");
    Ok(store.birthdays_between(owner_id, today, until).await?)
}
