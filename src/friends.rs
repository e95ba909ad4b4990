//! Friend request state machine and the derived symmetric friendship
//! relation.
//!
//! Per ordered pair the request lifecycle is `absent -> pending ->
//! retired`, where retirement happens via accept, reject, or withdrawal.
//! Accepted requests leave a friendship behind; a new request is always a
//! fresh record, which is why the duplicate check also covers the reverse
//! direction: two pendings between the same pair would race to create the
//! same friendship twice.

use crate::database::models::{FriendRequestRecord, UserId};
use crate::database::repositories::FriendshipRepository;
use crate::database::Database;
use crate::error::{ServiceError, ServiceResult};
use crate::utils::now_utc_iso;

#[derive(Clone)]
pub struct FriendService {
    database: Database,
}

impl FriendService {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn send_request(&self, from: &UserId, to: &UserId) -> ServiceResult<FriendRequestRecord> {
        if from == to {
            return Err(ServiceError::InvalidOperation(
                "cannot send a friend request to yourself".into(),
            ));
        }
        self.database.with_repositories(|repos| {
            let friendships = repos.friendships();
            if friendships.friendship_exists(from, to)? {
                return Err(ServiceError::AlreadyFriends);
            }
            // A pending reverse request must be accepted or rejected, not
            // answered with a second request.
            if friendships.request_exists(to, from)? {
                return Err(ServiceError::DuplicateRequest);
            }
            let created_at = now_utc_iso();
            if !friendships.insert_request_if_absent(from, to, &created_at)? {
                return Err(ServiceError::DuplicateRequest);
            }
            Ok(FriendRequestRecord {
                from_user: from.clone(),
                to_user: to.clone(),
                created_at,
            })
        })
    }

    /// Withdraws a pending request the sender no longer wants answered.
    pub fn remove_request(&self, from: &UserId, to: &UserId) -> ServiceResult<()> {
        self.database.with_repositories(|repos| {
            if !repos.friendships().remove_request(from, to)? {
                return Err(no_pending_request(from, to));
            }
            Ok(())
        })
    }

    pub fn accept_request(&self, from: &UserId, to: &UserId) -> ServiceResult<()> {
        self.database.with_repositories(|repos| {
            let friendships = repos.friendships();
            if !friendships.remove_request(from, to)? {
                return Err(no_pending_request(from, to));
            }
            friendships.insert_friendship_if_absent(from, to, &now_utc_iso())?;
            Ok(())
        })
    }

    pub fn reject_request(&self, from: &UserId, to: &UserId) -> ServiceResult<()> {
        self.database.with_repositories(|repos| {
            if !repos.friendships().remove_request(from, to)? {
                return Err(no_pending_request(from, to));
            }
            Ok(())
        })
    }

    /// Dissolves an existing friendship; either party may call this.
    pub fn remove_friend(&self, a: &UserId, b: &UserId) -> ServiceResult<()> {
        self.database.with_repositories(|repos| {
            if !repos.friendships().remove_friendship(a, b)? {
                return Err(ServiceError::NotFound(format!(
                    "no friendship between {a} and {b}"
                )));
            }
            Ok(())
        })
    }

    pub fn friends_of(&self, user: &UserId) -> ServiceResult<Vec<UserId>> {
        self.database
            .with_repositories(|repos| Ok(repos.friendships().friends_of(user)?))
    }

    /// Pending requests addressed to `user`.
    pub fn requests_for(&self, user: &UserId) -> ServiceResult<Vec<FriendRequestRecord>> {
        self.database
            .with_repositories(|repos| Ok(repos.friendships().requests_to(user)?))
    }
}

fn no_pending_request(from: &UserId, to: &UserId) -> ServiceError {
    ServiceError::NotFound(format!("no pending friend request from {from} to {to}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UserService;
    use rusqlite::Connection;

    fn setup() -> (FriendService, UserId, UserId, UserId) {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let db = Database::from_connection(conn, true);
        db.ensure_migrations().expect("migrations");
        let users = UserService::new(db.clone());
        let alice = users.register("alice", "hunter2").expect("register").id;
        let bob = users.register("bob", "hunter2").expect("register").id;
        let carol = users.register("carol", "hunter2").expect("register").id;
        (FriendService::new(db), alice, bob, carol)
    }

    #[test]
    fn accepting_a_request_makes_both_sides_friends() {
        let (service, alice, bob, _) = setup();
        service.send_request(&alice, &bob).expect("send");
        service.accept_request(&alice, &bob).expect("accept");

        assert_eq!(service.friends_of(&alice).expect("friends"), vec![bob.clone()]);
        assert_eq!(service.friends_of(&bob).expect("friends"), vec![alice.clone()]);
        assert!(service.requests_for(&bob).expect("requests").is_empty());
    }

    #[test]
    fn self_request_is_invalid() {
        let (service, alice, _, _) = setup();
        let err = service.send_request(&alice, &alice).expect_err("self request");
        assert!(matches!(err, ServiceError::InvalidOperation(_)));
    }

    #[test]
    fn second_unresolved_request_is_a_duplicate() {
        let (service, alice, bob, _) = setup();
        service.send_request(&alice, &bob).expect("send");
        let err = service.send_request(&alice, &bob).expect_err("duplicate");
        assert!(matches!(err, ServiceError::DuplicateRequest));
    }

    #[test]
    fn reverse_pending_request_is_a_duplicate() {
        let (service, alice, bob, _) = setup();
        service.send_request(&alice, &bob).expect("send");
        let err = service.send_request(&bob, &alice).expect_err("reverse duplicate");
        assert!(matches!(err, ServiceError::DuplicateRequest));
    }

    #[test]
    fn request_to_an_existing_friend_is_rejected() {
        let (service, alice, bob, _) = setup();
        service.send_request(&alice, &bob).expect("send");
        service.accept_request(&alice, &bob).expect("accept");

        let err = service.send_request(&bob, &alice).expect_err("already friends");
        assert!(matches!(err, ServiceError::AlreadyFriends));
    }

    #[test]
    fn rejecting_retires_the_request_without_a_friendship() {
        let (service, alice, bob, _) = setup();
        service.send_request(&alice, &bob).expect("send");
        service.reject_request(&alice, &bob).expect("reject");

        assert!(service.friends_of(&alice).expect("friends").is_empty());
        // The pair may try again after a rejection.
        service.send_request(&alice, &bob).expect("resend");
    }

    #[test]
    fn withdrawal_removes_the_pending_request() {
        let (service, alice, bob, _) = setup();
        service.send_request(&alice, &bob).expect("send");
        service.remove_request(&alice, &bob).expect("withdraw");

        assert!(service.requests_for(&bob).expect("requests").is_empty());
        let err = service.accept_request(&alice, &bob).expect_err("nothing to accept");
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn accept_and_reject_require_a_pending_request() {
        let (service, alice, bob, _) = setup();
        assert!(matches!(
            service.accept_request(&alice, &bob).expect_err("absent"),
            ServiceError::NotFound(_)
        ));
        assert!(matches!(
            service.reject_request(&alice, &bob).expect_err("absent"),
            ServiceError::NotFound(_)
        ));
    }

    #[test]
    fn unfriending_works_from_either_side() {
        let (service, alice, bob, _) = setup();
        service.send_request(&alice, &bob).expect("send");
        service.accept_request(&alice, &bob).expect("accept");

        service.remove_friend(&bob, &alice).expect("unfriend");
        assert!(service.friends_of(&alice).expect("friends").is_empty());

        let err = service.remove_friend(&alice, &bob).expect_err("already gone");
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn concurrent_duplicate_sends_leave_one_pending() {
        let (service, alice, bob, _) = setup();

        let mut handles = Vec::new();
        for _ in 0..2 {
            let service = service.clone();
            let (from, to) = (alice.clone(), bob.clone());
            handles.push(std::thread::spawn(move || service.send_request(&from, &to)));
        }
        let outcomes: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .collect();

        let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
        assert_eq!(successes, 1);
        assert!(outcomes
            .iter()
            .any(|outcome| matches!(outcome, Err(ServiceError::DuplicateRequest))));
        assert_eq!(service.requests_for(&bob).expect("requests").len(), 1);
    }

    #[test]
    fn requests_for_lists_only_incoming_pendings() {
        let (service, alice, bob, carol) = setup();
        service.send_request(&alice, &bob).expect("send");
        service.send_request(&carol, &bob).expect("send");
        service.send_request(&alice, &carol).expect("send");

        let incoming = service.requests_for(&bob).expect("requests");
        let senders: Vec<&UserId> = incoming.iter().map(|r| &r.from_user).collect();
        assert_eq!(senders.len(), 2);
        assert!(senders.contains(&&alice));
        assert!(senders.contains(&&carol));
        assert!(service.requests_for(&alice).expect("requests").is_empty());
    }
}
