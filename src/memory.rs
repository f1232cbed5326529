//! In-process store used by the tests in place of PostgreSQL.

use std::sync::Mutex;

use axum::async_trait;
use time::{Date, OffsetDateTime};

use crate::{
    auth::{
        repo::{RepoError, UserStore},
        repo_types::User,
    },
    contacts::{
        repo::ContactStore,
        repo_types::{Contact, ContactDraft},
    },
};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    contacts: Vec<Contact>,
    next_user_id: i64,
    next_contact_id: i64,
}

impl MemoryStore {
    pub fn deactivate(&self, email: &str) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(u) = inner.users.iter_mut().find(|u| u.email == email) {
            u.is_active = false;
        }
    }

    pub fn remove_user(&self, email: &str) {
        self.inner.lock().unwrap().users.retain(|u| u.email != email);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, email: &str, hashed_password: &str) -> Result<User, RepoError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.email == email) {
            return Err(RepoError::Conflict);
        }
        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_active: true,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }
}

fn build(id: i64, owner_id: i64, d: &ContactDraft) -> Contact {
    Contact {
        id,
        owner_id,
        first_name: d.first_name.clone(),
        last_name: d.last_name.clone(),
        email: d.email.clone(),
        phone_number: d.phone_number.clone(),
        birthday: d.birthday,
        additional_info: d.additional_info.clone(),
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn insert(&self, owner_id: i64, draft: &ContactDraft) -> anyhow::Result<Contact> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_contact_id += 1;
        let contact = build(inner.next_contact_id, owner_id, draft);
        inner.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn get(&self, owner_id: i64, id: i64) -> anyhow::Result<Option<Contact>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .contacts
            .iter()
            .find(|c| c.id == id && c.owner_id == owner_id)
            .cloned())
    }

    async fn list(&self, owner_id: i64, skip: i64, limit: i64) -> anyhow::Result<Vec<Contact>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .contacts
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        draft: &ContactDraft,
    ) -> anyhow::Result<Option<Contact>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(slot) = inner
            .contacts
            .iter_mut()
            .find(|c| c.id == id && c.owner_id == owner_id)
        else {
            return Ok(None);
        };
        *slot = build(id, owner_id, draft);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, owner_id: i64, id: i64) -> anyhow::Result<Option<Contact>> {
        let mut inner = self.inner.lock().unwrap();
        let pos = inner
            .contacts
            .iter()
            .position(|c| c.id == id && c.owner_id == owner_id);
        Ok(pos.map(|i| inner.contacts.remove(i)))
    }

    async fn search(&self, owner_id: i64, query: &str) -> anyhow::Result<Vec<Contact>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .contacts
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .filter(|c| {
                c.first_name.contains(query) || c.last_name.contains(query) || c.email.contains(query)
            })
            .cloned()
            .collect())
    }

    async fn birthdays_between(
        &self,
        owner_id: i64,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<Contact>> {
        let inner = self.inner.lock().unwrap();
        let mut out: Vec<Contact> = inner
            .contacts
            .iter()
            .filter(|c| c.owner_id == owner_id && c.birthday >= from && c.birthday <= to)
            .cloned()
            .collect();
        out.sort_by_key(|c| (c.birthday, c.id));
        Ok(out)
    }
}
