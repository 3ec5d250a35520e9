//! Idempotent pull-request comments.
//!
//! There is no stored state: the previous comment is rediscovered on every
//! run by scanning the PR's comments for [`COMMENT_MARKER`]. The first match
//! in listing order wins, which is not necessarily the most recent one, and a
//! human comment containing the marker would be overwritten.

use tracing::{info, warn};

use crate::error::ActionError;
use crate::github::client::GitHubApi;
use crate::report::markdown::COMMENT_MARKER;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    Created(u64),
    Updated(u64),
}

/// Id of the first comment on `pr` that carries the marker.
///
/// A failed lookup is logged and reported as "not found": a duplicate
/// comment is preferable to losing the report.
pub fn find_existing_comment(api: &dyn GitHubApi, pr: u64) -> Option<u64> {
    match api.list_comments(pr) {
        Ok(comments) => comments
            .into_iter()
            .find(|c| c.body.as_deref().is_some_and(|b| b.contains(COMMENT_MARKER)))
            .map(|c| c.id),
        Err(e) => {
            warn!(pr, error = %e, "could not look up existing comment, a new one will be created");
            None
        }
    }
}

/// Update the existing report comment on `pr`, or create one.
pub fn upsert_comment(
    api: &dyn GitHubApi,
    pr: u64,
    body: &str,
) -> Result<CommentAction, ActionError> {
    match find_existing_comment(api, pr) {
        Some(id) => {
            api.update_comment(id, body)?;
            info!(pr, comment_id = id, "updated report comment");
            Ok(CommentAction::Updated(id))
        }
        None => {
            let created = api.create_comment(pr, body)?;
            info!(pr, comment_id = created.id, "created report comment");
            Ok(CommentAction::Created(created.id))
        }
    }
}
