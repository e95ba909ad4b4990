use anyhow::Result;
use rusqlite::{params, Connection};

/// Keyed-fact substrate shared by the engagement repositories: a two-column
/// relation with a uniqueness constraint, offering atomic insert-if-absent
/// via `INSERT OR IGNORE` plus the changed-row count. Carries no business
/// semantics; table and column names are fixed at the call site.
pub(super) struct PairRelation<'conn> {
    conn: &'conn Connection,
    table: &'static str,
    left: &'static str,
    right: &'static str,
}

impl<'conn> PairRelation<'conn> {
    pub(super) fn new(
        conn: &'conn Connection,
        table: &'static str,
        left: &'static str,
        right: &'static str,
    ) -> Self {
        Self {
            conn,
            table,
            left,
            right,
        }
    }

    /// Returns true if the fact was inserted, false if it already existed
    /// (or collided with the table's uniqueness constraint).
    pub(super) fn insert_if_absent(&self, left: &str, right: &str, created_at: &str) -> Result<bool> {
        let changed = self.conn.execute(
            &format!(
                "INSERT OR IGNORE INTO {} ({}, {}, created_at) VALUES (?1, ?2, ?3)",
                self.table, self.left, self.right
            ),
            params![left, right, created_at],
        )?;
        Ok(changed > 0)
    }

    /// Returns true if a fact was removed, false if none existed.
    pub(super) fn remove(&self, left: &str, right: &str) -> Result<bool> {
        let changed = self.conn.execute(
            &format!(
                "DELETE FROM {} WHERE {} = ?1 AND {} = ?2",
                self.table, self.left, self.right
            ),
            params![left, right],
        )?;
        Ok(changed > 0)
    }

    pub(super) fn exists(&self, left: &str, right: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ?1 AND {} = ?2",
                self.table, self.left, self.right
            ),
            params![left, right],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub(super) fn rights_of(&self, left: &str) -> Result<Vec<String>> {
        self.column_query(
            &format!(
                "SELECT {} FROM {} WHERE {} = ?1 ORDER BY created_at ASC, {} ASC",
                self.right, self.table, self.left, self.right
            ),
            left,
        )
    }

    pub(super) fn lefts_of(&self, right: &str) -> Result<Vec<String>> {
        self.column_query(
            &format!(
                "SELECT {} FROM {} WHERE {} = ?1 ORDER BY created_at ASC, {} ASC",
                self.left, self.table, self.right, self.left
            ),
            right,
        )
    }

    pub(super) fn count_rights_of(&self, left: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ?1",
                self.table, self.left
            ),
            params![left],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub(super) fn count_lefts_of(&self, right: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ?1",
                self.table, self.right
            ),
            params![right],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Removes every fact whose left key matches; returns the removed count.
    pub(super) fn remove_all_left(&self, left: &str) -> Result<usize> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?1", self.table, self.left),
            params![left],
        )?;
        Ok(changed)
    }

    /// Removes every fact whose right key matches; returns the removed count.
    pub(super) fn remove_all_right(&self, right: &str) -> Result<usize> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?1", self.table, self.right),
            params![right],
        )?;
        Ok(changed)
    }

    fn column_query(&self, sql: &str, key: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![key], |row| row.get::<_, String>(0))?;
        let mut values = Vec::new();
        for row in rows {
            values.push(row?);
        }
        Ok(values)
    }
}
