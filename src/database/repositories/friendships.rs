use super::relation::PairRelation;
use crate::database::models::{FriendRequestRecord, UserId};
use anyhow::Result;
use rusqlite::{params, Connection};

pub(super) struct SqliteFriendshipRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> SqliteFriendshipRepository<'conn> {
    fn requests(&self) -> PairRelation<'conn> {
        PairRelation::new(self.conn, "friend_requests", "from_user", "to_user")
    }

    fn friendships(&self) -> PairRelation<'conn> {
        PairRelation::new(self.conn, "friendships", "user_a", "user_b")
    }
}

/// Friendships are stored once per unordered pair, with the smaller id in
/// `user_a`.
fn canonical_pair<'a>(a: &'a UserId, b: &'a UserId) -> (&'a str, &'a str) {
    if a.as_str() <= b.as_str() {
        (a.as_str(), b.as_str())
    } else {
        (b.as_str(), a.as_str())
    }
}

impl<'conn> super::FriendshipRepository for SqliteFriendshipRepository<'conn> {
    fn insert_request_if_absent(
        &self,
        from: &UserId,
        to: &UserId,
        created_at: &str,
    ) -> Result<bool> {
        self.requests()
            .insert_if_absent(from.as_str(), to.as_str(), created_at)
    }

    fn remove_request(&self, from: &UserId, to: &UserId) -> Result<bool> {
        self.requests().remove(from.as_str(), to.as_str())
    }

    fn request_exists(&self, from: &UserId, to: &UserId) -> Result<bool> {
        self.requests().exists(from.as_str(), to.as_str())
    }

    fn requests_to(&self, to: &UserId) -> Result<Vec<FriendRequestRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT from_user, to_user, created_at
            FROM friend_requests
            WHERE to_user = ?1
            ORDER BY created_at ASC
            "#,
        )?;
        let rows = stmt.query_map(params![to.as_str()], |row| {
            Ok(FriendRequestRecord {
                from_user: UserId(row.get(0)?),
                to_user: UserId(row.get(1)?),
                created_at: row.get(2)?,
            })
        })?;

        let mut requests = Vec::new();
        for row in rows {
            requests.push(row?);
        }
        Ok(requests)
    }

    fn insert_friendship_if_absent(
        &self,
        a: &UserId,
        b: &UserId,
        created_at: &str,
    ) -> Result<bool> {
        let (first, second) = canonical_pair(a, b);
        self.friendships().insert_if_absent(first, second, created_at)
    }

    fn remove_friendship(&self, a: &UserId, b: &UserId) -> Result<bool> {
        let (first, second) = canonical_pair(a, b);
        self.friendships().remove(first, second)
    }

    fn friendship_exists(&self, a: &UserId, b: &UserId) -> Result<bool> {
        let (first, second) = canonical_pair(a, b);
        self.friendships().exists(first, second)
    }

    fn friends_of(&self, user: &UserId) -> Result<Vec<UserId>> {
        let friendships = self.friendships();
        let mut friends: Vec<UserId> = friendships
            .rights_of(user.as_str())?
            .into_iter()
            .chain(friendships.lefts_of(user.as_str())?)
            .map(UserId)
            .collect();
        friends.sort();
        Ok(friends)
    }
}
