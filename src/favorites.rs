//! Favorite toggling and favorite-count trending.
//!
//! Content references are opaque here: callers confirm a post exists before
//! toggling, and retirement of a deleted post's favorites is driven from the
//! posting service.

use crate::database::models::{PostId, UserId};
use crate::database::repositories::FavoriteRepository;
use crate::database::Database;
use crate::error::ServiceResult;
use crate::trending;
use crate::utils::now_utc_iso;

#[derive(Clone)]
pub struct FavoriteService {
    database: Database,
}

impl FavoriteService {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Flips the favorite on each call; returns the new state (true means
    /// the post is now favorited by `user`).
    pub fn toggle(&self, user: &UserId, post: &PostId) -> ServiceResult<bool> {
        self.database.with_repositories(|repos| {
            let favorites = repos.favorites();
            if favorites.remove(user, post)? {
                return Ok(false);
            }
            favorites.insert_if_absent(user, post, &now_utc_iso())?;
            Ok(true)
        })
    }

    pub fn favorited_by(&self, user: &UserId) -> ServiceResult<Vec<PostId>> {
        self.database
            .with_repositories(|repos| Ok(repos.favorites().favorited_by(user)?))
    }

    pub fn count_for(&self, post: &PostId) -> ServiceResult<usize> {
        self.database
            .with_repositories(|repos| Ok(repos.favorites().count_for_post(post)?))
    }

    /// Top `limit` of `candidates` by favorite count; ties keep candidate
    /// order.
    pub fn most_favorited(
        &self,
        candidates: Vec<PostId>,
        limit: i64,
    ) -> ServiceResult<Vec<PostId>> {
        self.database.with_repositories(|repos| {
            let favorites = repos.favorites();
            trending::top_by_score(candidates, limit, |post| favorites.count_for_post(post))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UserService;
    use rusqlite::Connection;

    fn setup() -> (FavoriteService, Vec<UserId>) {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let db = Database::from_connection(conn, true);
        db.ensure_migrations().expect("migrations");
        let users = UserService::new(db.clone());
        let ids = ["alice", "bob", "carol"]
            .iter()
            .map(|name| users.register(name, "hunter2").expect("register").id)
            .collect();
        (FavoriteService::new(db), ids)
    }

    #[test]
    fn toggle_flips_membership_and_count() {
        let (service, users) = setup();
        let post = PostId("post-1".into());

        assert!(service.toggle(&users[0], &post).expect("toggle on"));
        assert_eq!(service.count_for(&post).expect("count"), 1);

        assert!(!service.toggle(&users[0], &post).expect("toggle off"));
        assert_eq!(service.count_for(&post).expect("count"), 0);
    }

    #[test]
    fn count_tracks_distinct_users() {
        let (service, users) = setup();
        let post = PostId("post-1".into());

        for user in &users {
            assert!(service.toggle(user, &post).expect("toggle on"));
        }
        assert_eq!(service.count_for(&post).expect("count"), users.len());

        assert!(!service.toggle(&users[1], &post).expect("toggle off"));
        assert_eq!(service.count_for(&post).expect("count"), users.len() - 1);
    }

    #[test]
    fn favorited_by_lists_only_that_users_posts() {
        let (service, users) = setup();
        let first = PostId("post-1".into());
        let second = PostId("post-2".into());

        service.toggle(&users[0], &first).expect("toggle");
        service.toggle(&users[0], &second).expect("toggle");
        service.toggle(&users[1], &first).expect("toggle");

        let favorites = service.favorited_by(&users[0]).expect("favorites");
        assert_eq!(favorites, vec![first.clone(), second.clone()]);
        assert_eq!(service.favorited_by(&users[1]).expect("favorites"), vec![first]);
    }

    #[test]
    fn most_favorited_ranks_by_count_with_stable_ties() {
        let (service, users) = setup();
        let c1 = PostId("c1".into());
        let c2 = PostId("c2".into());
        let c3 = PostId("c3".into());

        // c1 and c2 tie on two favorites each, c3 trails with one.
        service.toggle(&users[0], &c1).expect("toggle");
        service.toggle(&users[1], &c1).expect("toggle");
        service.toggle(&users[0], &c2).expect("toggle");
        service.toggle(&users[1], &c2).expect("toggle");
        service.toggle(&users[2], &c3).expect("toggle");

        let top = service
            .most_favorited(vec![c1.clone(), c2.clone(), c3.clone()], 2)
            .expect("rank");
        assert_eq!(top, vec![c1.clone(), c2.clone()]);

        let reversed = service
            .most_favorited(vec![c2.clone(), c1.clone(), c3.clone()], 2)
            .expect("rank");
        assert_eq!(reversed, vec![c2, c1]);
    }
}
