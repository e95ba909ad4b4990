//! User accounts and bearer-token sessions. The engagement engines treat
//! user references as opaque; this module is where they are minted and
//! validated.

use crate::database::models::{SessionRecord, UserId, UserRecord};
use crate::database::repositories::{SessionRepository, UserRepository};
use crate::database::Database;
use crate::error::{ServiceError, ServiceResult};
use crate::utils::now_utc_iso;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Clone)]
pub struct UserService {
    database: Database,
}

impl UserService {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn register(&self, username: &str, password: &str) -> ServiceResult<UserRecord> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ServiceError::InvalidOperation(
                "username may not be empty".into(),
            ));
        }
        if password.is_empty() {
            return Err(ServiceError::InvalidOperation(
                "password may not be empty".into(),
            ));
        }

        let record = UserRecord {
            id: UserId::generate(),
            username: username.to_string(),
            password_digest: digest_password(password),
            created_at: now_utc_iso(),
        };
        self.database.with_repositories(|repos| {
            if !repos.users().create(&record)? {
                return Err(ServiceError::UsernameTaken);
            }
            Ok(record.clone())
        })
    }

    pub fn login(&self, username: &str, password: &str) -> ServiceResult<SessionRecord> {
        self.database.with_repositories(|repos| {
            let user = repos
                .users()
                .get_by_username(username)?
                .ok_or(ServiceError::Unauthorized)?;
            if !verify_password(password, &user.password_digest) {
                return Err(ServiceError::Unauthorized);
            }
            let session = SessionRecord {
                token: Uuid::new_v4().to_string(),
                user_id: user.id,
                created_at: now_utc_iso(),
            };
            repos.sessions().create(&session)?;
            Ok(session)
        })
    }

    /// Revokes a session. Idempotent; revoking an unknown token is a no-op.
    pub fn logout(&self, token: &str) -> ServiceResult<()> {
        self.database.with_repositories(|repos| {
            repos.sessions().delete(token)?;
            Ok(())
        })
    }

    pub fn authenticate(&self, token: &str) -> ServiceResult<UserRecord> {
        self.database.with_repositories(|repos| {
            let session = repos
                .sessions()
                .get(token)?
                .ok_or(ServiceError::Unauthorized)?;
            repos
                .users()
                .get(&session.user_id)?
                .ok_or(ServiceError::Unauthorized)
        })
    }

    pub fn lookup(&self, username: &str) -> ServiceResult<UserRecord> {
        self.database.with_repositories(|repos| {
            repos
                .users()
                .get_by_username(username)?
                .ok_or_else(|| ServiceError::NotFound(format!("no user named {username}")))
        })
    }

    pub fn get(&self, id: &UserId) -> ServiceResult<UserRecord> {
        self.database.with_repositories(|repos| {
            repos
                .users()
                .get(id)?
                .ok_or_else(|| ServiceError::NotFound(format!("no user {id}")))
        })
    }
}

/// Salted SHA-256, encoded as `salt$hash` in base64.
fn digest_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::rng().fill(&mut salt);
    format!(
        "{}${}",
        BASE64.encode(salt),
        BASE64.encode(hash_with_salt(password, &salt))
    )
}

fn verify_password(password: &str, digest: &str) -> bool {
    let Some((salt_part, hash_part)) = digest.split_once('$') else {
        return false;
    };
    let Ok(salt) = BASE64.decode(salt_part) else {
        return false;
    };
    BASE64.encode(hash_with_salt(password, &salt)) == hash_part
}

fn hash_with_salt(password: &str, salt: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}
