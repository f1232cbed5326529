use anyhow::Context;
use axum::async_trait;
use time::Date;

use super::repo_types::{Contact, ContactDraft};
use crate::db::PgStore;

/// Owner-scoped contact persistence. Every call filters by `owner_id`, so a
/// row belonging to another user behaves exactly like a missing one.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert(&self, owner_id: i64, draft: &ContactDraft) -> anyhow::Result<Contact>;
    async fn get(&self, owner_id: i64, id: i64) -> anyhow::Result<Option<Contact>>;
    async fn list(&self, owner_id: i64, skip: i64, limit: i64) -> anyhow::Result<Vec<Contact>>;
    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        draft: &ContactDraft,
    ) -> anyhow::Result<Option<Contact>>;
    async fn delete(&self, owner_id: i64, id: i64) -> anyhow::Result<Option<Contact>>;
    /// Case-sensitive substring match on first name, last name or email.
    async fn search(&self, owner_id: i64, query: &str) -> anyhow::Result<Vec<Contact>>;
    /// Inclusive on both ends.
    async fn birthdays_between(
        &self,
        owner_id: i64,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<Contact>>;
}

const COLUMNS: &str =
    "id, owner_id, first_name, last_name, email, phone_number, birthday, additional_info";

#[async_trait]
impl ContactStore for PgStore {
    async fn insert(&self, owner_id: i64, draft: &ContactDraft) -> anyhow::Result<Contact> {
        let row = sqlx::query_as::<_, Contact>(&format!(
            r#"
            INSERT INTO contacts
                (owner_id, first_name, last_name, email, phone_number, birthday, additional_info)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.email)
        .bind(&draft.phone_number)
        .bind(draft.birthday)
        .bind(&draft.additional_info)
        .fetch_one(&self.db)
        .await
        .context("insert contact")?;
        Ok(row)
    }

    async fn get(&self, owner_id: i64, id: i64) -> anyhow::Result<Option<Contact>> {
        let row = sqlx::query_as::<_, Contact>(&format!(
            r#"
            SELECT {COLUMNS}
              FROM contacts
             WHERE id = $1 AND owner_id = $2
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await
        .context("get contact")?;
        Ok(row)
    }

    async fn list(&self, owner_id: i64, skip: i64, limit: i64) -> anyhow::Result<Vec<Contact>> {
        let rows = sqlx::query_as::<_, Contact>(&format!(
            r#"
            SELECT {COLUMNS}
              FROM contacts
             WHERE owner_id = $1
             ORDER BY id ASC
             LIMIT $2 OFFSET $3
            "#
        ))
        .bind(owner_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.db)
        .await
        .context("list contacts")?;
        Ok(rows)
    }

    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        draft: &ContactDraft,
    ) -> anyhow::Result<Option<Contact>> {
        let row = sqlx::query_as::<_, Contact>(&format!(
            r#"
            UPDATE contacts
               SET first_name = $3,
                   last_name = $4,
                   email = $5,
                   phone_number = $6,
                   birthday = $7,
                   additional_info = $8
             WHERE id = $1 AND owner_id = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.email)
        .bind(&draft.phone_number)
        .bind(draft.birthday)
        .bind(&draft.additional_info)
        .fetch_optional(&self.db)
        .await
        .context("update contact")?;
        Ok(row)
    }

    async fn delete(&self, owner_id: i64, id: i64) -> anyhow::Result<Option<Contact>> {
        let row = sqlx::query_as::<_, Contact>(&format!(
            r#"
            DELETE FROM contacts
             WHERE id = $1 AND owner_id = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await
        .context("delete contact")?;
        Ok(row)
    }

    async fn search(&self, owner_id: i64, query: &str) -> anyhow::Result<Vec<Contact>> {
        // strpos keeps the match literal; LIKE would treat % and _ as wildcards.
        let rows = sqlx::query_as::<_, Contact>(&format!(
            r#"
            SELECT {COLUMNS}
              FROM contacts
             WHERE owner_id = $1
               AND (strpos(first_name, $2) > 0
                    OR strpos(last_name, $2) > 0
                    OR strpos(email, $2) > 0)
             ORDER BY id ASC
            "#
        ))
        .bind(owner_id)
        .bind(query)
        .fetch_all(&self.db)
        .await
        .context("search contacts")?;
        Ok(rows)
    }

    async fn birthdays_between(
        &self,
        owner_id: i64,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<Contact>> {
        let rows = sqlx::query_as::<_, Contact>(&format!(
            r#"
            SELECT {COLUMNS}
              FROM contacts
             WHERE owner_id = $1
               AND birthday BETWEEN $2 AND $3
             ORDER BY birthday ASC, id ASC
            "#
        ))
        .bind(owner_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await
        .context("contacts by birthday range")?;
        Ok(rows)
    }
}
