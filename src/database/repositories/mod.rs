mod favorites;
mod friendships;
mod posts;
mod relation;
mod remixes;
mod sessions;
mod users;

use super::models::{
    FriendRequestRecord, PostId, PostRecord, SessionRecord, UserId, UserRecord,
};
use anyhow::Result;
use rusqlite::Connection;

pub trait UserRepository {
    /// Returns false if the username is already taken.
    fn create(&self, record: &UserRecord) -> Result<bool>;
    fn get(&self, id: &UserId) -> Result<Option<UserRecord>>;
    fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>>;
}

pub trait SessionRepository {
    fn create(&self, record: &SessionRecord) -> Result<()>;
    fn get(&self, token: &str) -> Result<Option<SessionRecord>>;
    fn delete(&self, token: &str) -> Result<bool>;
}

pub trait PostRepository {
    fn create(&self, record: &PostRecord) -> Result<()>;
    fn get(&self, id: &PostId) -> Result<Option<PostRecord>>;
    fn get_many(&self, ids: &[PostId]) -> Result<Vec<PostRecord>>;
    /// Posts created at or after `since`, most recent first.
    fn list_since(&self, since: &str) -> Result<Vec<PostRecord>>;
    fn set_original_artist(&self, id: &PostId, artist: &str) -> Result<()>;
    fn delete(&self, id: &PostId) -> Result<bool>;
}

pub trait FriendshipRepository {
    fn insert_request_if_absent(&self, from: &UserId, to: &UserId, created_at: &str)
        -> Result<bool>;
    fn remove_request(&self, from: &UserId, to: &UserId) -> Result<bool>;
    fn request_exists(&self, from: &UserId, to: &UserId) -> Result<bool>;
    fn requests_to(&self, to: &UserId) -> Result<Vec<FriendRequestRecord>>;
    fn insert_friendship_if_absent(&self, a: &UserId, b: &UserId, created_at: &str)
        -> Result<bool>;
    fn remove_friendship(&self, a: &UserId, b: &UserId) -> Result<bool>;
    fn friendship_exists(&self, a: &UserId, b: &UserId) -> Result<bool>;
    fn friends_of(&self, user: &UserId) -> Result<Vec<UserId>>;
}

pub trait FavoriteRepository {
    fn insert_if_absent(&self, user: &UserId, post: &PostId, created_at: &str) -> Result<bool>;
    fn remove(&self, user: &UserId, post: &PostId) -> Result<bool>;
    fn exists(&self, user: &UserId, post: &PostId) -> Result<bool>;
    fn favorited_by(&self, user: &UserId) -> Result<Vec<PostId>>;
    fn count_for_post(&self, post: &PostId) -> Result<usize>;
    fn remove_all_for_post(&self, post: &PostId) -> Result<usize>;
}

pub trait RemixRepository {
    fn insert_edge_if_absent(&self, original: &PostId, remix: &PostId, created_at: &str)
        -> Result<bool>;
    fn remixes_of(&self, original: &PostId) -> Result<Vec<PostId>>;
    fn original_of(&self, remix: &PostId) -> Result<Option<PostId>>;
    fn count_remixes_of(&self, original: &PostId) -> Result<usize>;
    /// Removes the post's own remix-of edge and every edge where the post is
    /// the original; returns the number of edges removed.
    fn remove_edges_touching(&self, post: &PostId) -> Result<usize>;
}

pub struct SqliteRepositories<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRepositories<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn users(&self) -> impl UserRepository + '_ {
        users::SqliteUserRepository { conn: self.conn }
    }

    pub fn sessions(&self) -> impl SessionRepository + '_ {
        sessions::SqliteSessionRepository { conn: self.conn }
    }

    pub fn posts(&self) -> impl PostRepository + '_ {
        posts::SqlitePostRepository { conn: self.conn }
    }

    pub fn friendships(&self) -> impl FriendshipRepository + '_ {
        friendships::SqliteFriendshipRepository { conn: self.conn }
    }

    pub fn favorites(&self) -> impl FavoriteRepository + '_ {
        favorites::SqliteFavoriteRepository { conn: self.conn }
    }

    pub fn remixes(&self) -> impl RemixRepository + '_ {
        remixes::SqliteRemixRepository { conn: self.conn }
    }

    pub fn conn(&self) -> &'conn Connection {
        self.conn
    }
}
