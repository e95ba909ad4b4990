use crate::database::models::{UserId, UserRecord};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

pub(super) struct SqliteUserRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: UserId(row.get(0)?),
        username: row.get(1)?,
        password_digest: row.get(2)?,
        created_at: row.get(3)?,
    })
}

impl<'conn> super::UserRepository for SqliteUserRepository<'conn> {
    fn create(&self, record: &UserRecord) -> Result<bool> {
        let changed = self.conn.execute(
            r#"
            INSERT OR IGNORE INTO users (id, username, password_digest, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                record.id.as_str(),
                record.username,
                record.password_digest,
                record.created_at,
            ],
        )?;
        Ok(changed > 0)
    }

    fn get(&self, id: &UserId) -> Result<Option<UserRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, username, password_digest, created_at FROM users WHERE id = ?1",
                params![id.as_str()],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, username, password_digest, created_at FROM users WHERE username = ?1",
                params![username],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }
}
