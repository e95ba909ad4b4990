//! Directed original -> remix relation and remix-count trending.
//!
//! The edge set is a forest: a post has at most one original (enforced by
//! the `remix_edges` primary key) while fan-out from an original is
//! unrestricted. Remixing a post that is itself a remix is allowed; the
//! relation stays single-hop, so `original_of` never chases the chain.

use crate::database::models::PostId;
use crate::database::repositories::{PostRepository, RemixRepository};
use crate::database::Database;
use crate::error::{ServiceError, ServiceResult};
use crate::trending;
use crate::utils::now_utc_iso;

#[derive(Clone)]
pub struct RemixService {
    database: Database,
}

impl RemixService {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Links `remix` to its original and copies the original's artist credit
    /// onto the remix record. A post's original is immutable once set.
    pub fn create_remix(&self, original: &PostId, remix: &PostId) -> ServiceResult<()> {
        if original == remix {
            return Err(ServiceError::InvalidOperation(
                "a post cannot be a remix of itself".into(),
            ));
        }
        self.database.with_repositories(|repos| {
            if !repos
                .remixes()
                .insert_edge_if_absent(original, remix, &now_utc_iso())?
            {
                return Err(ServiceError::AlreadyRemix);
            }
            // Attribution follows the chain: a remix credits whoever the
            // original credits, not the original's immediate author.
            let posts = repos.posts();
            if let Some(original_post) = posts.get(original)? {
                posts.set_original_artist(remix, &original_post.original_artist)?;
            }
            Ok(())
        })
    }

    /// Removes every edge touching `post`: its own remix-of link and all
    /// links its remixes hold pointing at it. Invoked when the post itself
    /// is being deleted.
    pub fn retire_post(&self, post: &PostId) -> ServiceResult<usize> {
        self.database
            .with_repositories(|repos| Ok(repos.remixes().remove_edges_touching(post)?))
    }

    pub fn remixes_of(&self, original: &PostId) -> ServiceResult<Vec<PostId>> {
        self.database
            .with_repositories(|repos| Ok(repos.remixes().remixes_of(original)?))
    }

    /// The immediate original, or None for a post that is not a remix.
    pub fn original_of(&self, post: &PostId) -> ServiceResult<Option<PostId>> {
        self.database
            .with_repositories(|repos| Ok(repos.remixes().original_of(post)?))
    }

    /// Top `limit` of `candidates` by remix count; ties keep candidate
    /// order.
    pub fn most_remixed(&self, candidates: Vec<PostId>, limit: i64) -> ServiceResult<Vec<PostId>> {
        self.database.with_repositories(|repos| {
            let remixes = repos.remixes();
            trending::top_by_score(candidates, limit, |post| remixes.count_remixes_of(post))
        })
    }
}
