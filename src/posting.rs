//! Post authoring, lookup, and the retirement protocol that keeps the
//! engagement relations free of dangling references when a post is deleted.

use crate::database::models::{PostId, PostRecord, UserId};
use crate::database::repositories::{
    FavoriteRepository, PostRepository, RemixRepository, UserRepository,
};
use crate::database::Database;
use crate::error::{ServiceError, ServiceResult};
use crate::utils::{days_ago_utc_iso, now_utc_iso};
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct PostService {
    database: Database,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub body: String,
}

impl PostService {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn create(&self, author: &UserId, input: CreatePostInput) -> ServiceResult<PostRecord> {
        if input.title.trim().is_empty() {
            return Err(ServiceError::InvalidOperation(
                "post title may not be empty".into(),
            ));
        }
        self.database.with_repositories(|repos| {
            let author_record = repos
                .users()
                .get(author)?
                .ok_or_else(|| ServiceError::NotFound(format!("no user {author}")))?;
            let record = PostRecord {
                id: PostId::generate(),
                author_id: author.clone(),
                title: input.title,
                body: input.body,
                // Remix creation overwrites this with the original's credit.
                original_artist: author_record.username,
                created_at: now_utc_iso(),
            };
            repos.posts().create(&record)?;
            Ok(record)
        })
    }

    pub fn get(&self, id: &PostId) -> ServiceResult<PostRecord> {
        self.database.with_repositories(|repos| {
            repos
                .posts()
                .get(id)?
                .ok_or_else(|| ServiceError::NotFound(format!("no post {id}")))
        })
    }

    pub fn exists(&self, id: &PostId) -> ServiceResult<bool> {
        self.database
            .with_repositories(|repos| Ok(repos.posts().get(id)?.is_some()))
    }

    /// Resolves references to records, preserving input order and skipping
    /// references that no longer resolve.
    pub fn get_many(&self, ids: &[PostId]) -> ServiceResult<Vec<PostRecord>> {
        self.database
            .with_repositories(|repos| Ok(repos.posts().get_many(ids)?))
    }

    /// Posts created within the last `within_days` days, most recent first.
    /// This is the candidate source for the trending endpoints.
    pub fn recent(&self, within_days: i64) -> ServiceResult<Vec<PostRecord>> {
        if within_days < 0 {
            return Err(ServiceError::InvalidOperation(
                "day window may not be negative".into(),
            ));
        }
        let since = days_ago_utc_iso(within_days);
        self.database
            .with_repositories(|repos| Ok(repos.posts().list_since(&since)?))
    }

    /// Deletes a post and retires its engagement state in one step: the
    /// post's favorites and every remix edge touching it go with it, so no
    /// relation can outlive the record it references.
    pub fn delete(&self, caller: &UserId, id: &PostId) -> ServiceResult<()> {
        self.database.with_repositories(|repos| {
            let post = repos
                .posts()
                .get(id)?
                .ok_or_else(|| ServiceError::NotFound(format!("no post {id}")))?;
            if &post.author_id != caller {
                return Err(ServiceError::InvalidOperation(
                    "only the author may delete a post".into(),
                ));
            }
            repos.favorites().remove_all_for_post(id)?;
            repos.remixes().remove_edges_touching(id)?;
            repos.posts().delete(id)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::FavoriteService;
    use crate::identity::UserService;
    use crate::remixes::RemixService;
    use rusqlite::Connection;

    struct Fixture {
        posts: PostService,
        favorites: FavoriteService,
        remixes: RemixService,
        alice: UserId,
        bob: UserId,
    }

    fn setup() -> Fixture {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let db = Database::from_connection(conn, true);
        db.ensure_migrations().expect("migrations");
        let users = UserService::new(db.clone());
        let alice = users.register("alice", "hunter2").expect("register").id;
        let bob = users.register("bob", "hunter2").expect("register").id;
        Fixture {
            posts: PostService::new(db.clone()),
            favorites: FavoriteService::new(db.clone()),
            remixes: RemixService::new(db),
            alice,
            bob,
        }
    }

    fn make_post(fixture: &Fixture, title: &str) -> PostId {
        fixture
            .posts
            .create(
                &fixture.alice,
                CreatePostInput {
                    title: title.into(),
                    body: "body".into(),
                },
            )
            .expect("create post")
            .id
    }

    #[test]
    fn new_posts_credit_their_author() {
        let fixture = setup();
        let id = make_post(&fixture, "hello");
        let record = fixture.posts.get(&id).expect("get");
        assert_eq!(record.original_artist, "alice");
        assert_eq!(record.author_id, fixture.alice);
    }

    #[test]
    fn deletion_retires_favorites_and_remix_edges() {
        let fixture = setup();
        let original = make_post(&fixture, "original");
        let remix = make_post(&fixture, "remix");

        fixture.favorites.toggle(&fixture.bob, &original).expect("favorite");
        fixture.remixes.create_remix(&original, &remix).expect("remix");

        fixture.posts.delete(&fixture.alice, &original).expect("delete");

        assert!(matches!(
            fixture.posts.get(&original).expect_err("gone"),
            ServiceError::NotFound(_)
        ));
        assert_eq!(fixture.favorites.count_for(&original).expect("count"), 0);
        assert_eq!(fixture.remixes.original_of(&remix).expect("original"), None);
    }

    #[test]
    fn only_the_author_may_delete() {
        let fixture = setup();
        let id = make_post(&fixture, "hello");
        let err = fixture.posts.delete(&fixture.bob, &id).expect_err("not the author");
        assert!(matches!(err, ServiceError::InvalidOperation(_)));
        fixture.posts.get(&id).expect("still there");
    }

    #[test]
    fn recent_lists_most_recent_first_within_window() {
        let fixture = setup();
        let first = make_post(&fixture, "first");
        let second = make_post(&fixture, "second");

        let recent = fixture.posts.recent(7).expect("recent");
        let ids: Vec<&PostId> = recent.iter().map(|record| &record.id).collect();
        assert_eq!(ids.len(), 2);
        // Most recent first; the two posts share a window but not an order.
        let first_pos = ids.iter().position(|id| **id == first).expect("first");
        let second_pos = ids.iter().position(|id| **id == second).expect("second");
        assert!(second_pos <= first_pos);

        let err = fixture.posts.recent(-1).expect_err("negative window");
        assert!(matches!(err, ServiceError::InvalidOperation(_)));
    }

    #[test]
    fn get_many_preserves_order_and_skips_missing() {
        let fixture = setup();
        let first = make_post(&fixture, "first");
        let second = make_post(&fixture, "second");
        let missing = PostId("missing".into());

        let records = fixture
            .posts
            .get_many(&[second.clone(), missing, first.clone()])
            .expect("get_many");
        let ids: Vec<&PostId> = records.iter().map(|record| &record.id).collect();
        assert_eq!(ids, vec![&second, &first]);
    }
}
