use super::relation::PairRelation;
use crate::database::models::{PostId, UserId};
use anyhow::Result;
use rusqlite::Connection;

pub(super) struct SqliteFavoriteRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> SqliteFavoriteRepository<'conn> {
    fn relation(&self) -> PairRelation<'conn> {
        PairRelation::new(self.conn, "favorites", "user_id", "post_id")
    }
}

impl<'conn> super::FavoriteRepository for SqliteFavoriteRepository<'conn> {
    fn insert_if_absent(&self, user: &UserId, post: &PostId, created_at: &str) -> Result<bool> {
        self.relation()
            .insert_if_absent(user.as_str(), post.as_str(), created_at)
    }

    fn remove(&self, user: &UserId, post: &PostId) -> Result<bool> {
        self.relation().remove(user.as_str(), post.as_str())
    }

    fn exists(&self, user: &UserId, post: &PostId) -> Result<bool> {
        self.relation().exists(user.as_str(), post.as_str())
    }

    fn favorited_by(&self, user: &UserId) -> Result<Vec<PostId>> {
        Ok(self
            .relation()
            .rights_of(user.as_str())?
            .into_iter()
            .map(PostId)
            .collect())
    }

    fn count_for_post(&self, post: &PostId) -> Result<usize> {
        self.relation().count_lefts_of(post.as_str())
    }

    fn remove_all_for_post(&self, post: &PostId) -> Result<usize> {
        self.relation().remove_all_right(post.as_str())
    }
}
