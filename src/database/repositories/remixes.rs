use super::relation::PairRelation;
use crate::database::models::PostId;
use anyhow::Result;
use rusqlite::Connection;

pub(super) struct SqliteRemixRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> SqliteRemixRepository<'conn> {
    // The remix_id primary key is what makes insert_if_absent reject a
    // second original for the same remix.
    fn relation(&self) -> PairRelation<'conn> {
        PairRelation::new(self.conn, "remix_edges", "original_id", "remix_id")
    }
}

impl<'conn> super::RemixRepository for SqliteRemixRepository<'conn> {
    fn insert_edge_if_absent(
        &self,
        original: &PostId,
        remix: &PostId,
        created_at: &str,
    ) -> Result<bool> {
        self.relation()
            .insert_if_absent(original.as_str(), remix.as_str(), created_at)
    }

    fn remixes_of(&self, original: &PostId) -> Result<Vec<PostId>> {
        Ok(self
            .relation()
            .rights_of(original.as_str())?
            .into_iter()
            .map(PostId)
            .collect())
    }

    fn original_of(&self, remix: &PostId) -> Result<Option<PostId>> {
        Ok(self
            .relation()
            .lefts_of(remix.as_str())?
            .into_iter()
            .map(PostId)
            .next())
    }

    fn count_remixes_of(&self, original: &PostId) -> Result<usize> {
        self.relation().count_rights_of(original.as_str())
    }

    fn remove_edges_touching(&self, post: &PostId) -> Result<usize> {
        let relation = self.relation();
        let as_remix = relation.remove_all_right(post.as_str())?;
        let as_original = relation.remove_all_left(post.as_str())?;
        Ok(as_remix + as_original)
    }
}
