use crate::database::models::{PostId, PostRecord, UserId};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

pub(super) struct SqlitePostRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostRecord> {
    Ok(PostRecord {
        id: PostId(row.get(0)?),
        author_id: UserId(row.get(1)?),
        title: row.get(2)?,
        body: row.get(3)?,
        original_artist: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const SELECT_COLUMNS: &str = "id, author_id, title, body, original_artist, created_at";

impl<'conn> super::PostRepository for SqlitePostRepository<'conn> {
    fn create(&self, record: &PostRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO posts (id, author_id, title, body, original_artist, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.id.as_str(),
                record.author_id.as_str(),
                record.title,
                record.body,
                record.original_artist,
                record.created_at,
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: &PostId) -> Result<Option<PostRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM posts WHERE id = ?1"),
                params![id.as_str()],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn get_many(&self, ids: &[PostId]) -> Result<Vec<PostRecord>> {
        // Resolved one by one to preserve the caller's ordering; candidate
        // lists are bounded by the trending window.
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.get(id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn list_since(&self, since: &str) -> Result<Vec<PostRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM posts WHERE created_at >= ?1 ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map(params![since], record_from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    fn set_original_artist(&self, id: &PostId, artist: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE posts SET original_artist = ?2 WHERE id = ?1",
            params![id.as_str(), artist],
        )?;
        Ok(())
    }

    fn delete(&self, id: &PostId) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM posts WHERE id = ?1", params![id.as_str()])?;
        Ok(changed > 0)
    }
}
