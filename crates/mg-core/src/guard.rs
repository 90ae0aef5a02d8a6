//! # Submission Guard
//!
//! Gates the ability to submit against the current authenticated user and the
//! already-loaded records. The ranking guard scans every historical ranking
//! keyed only by user id — the scope is "ever", not month-qualified. Comment
//! flows have no duplicate guard at all; they validate shape only.

use crate::error::{AppError, Result};
use crate::models::{AuthenticatedUser, FanRanking};

/// Rating bounds for a review comment.
pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 10;

/// Whether the user may submit a fan ranking: signed in, and no prior
/// submission under the same user id anywhere in the feed.
pub fn can_submit_ranking(user: Option<&AuthenticatedUser>, existing: &[FanRanking]) -> bool {
    match user {
        Some(user) => !existing.iter().any(|record| record.user_id == user.id),
        None => false,
    }
}

/// Same check, but surfaced as the error copy the submit flow shows.
pub fn check_ranking_submission(
    user: Option<&AuthenticatedUser>,
    existing: &[FanRanking],
) -> Result<()> {
    let user = user.ok_or_else(|| AppError::Unauthorized("sign in to submit a ranking".into()))?;
    if existing.iter().any(|record| record.user_id == user.id) {
        return Err(AppError::DuplicateSubmission(
            "you already submitted a ranking".into(),
        ));
    }
    Ok(())
}

/// Validates a review comment: signed in, rating within bounds, and a
/// non-empty comment after trimming.
pub fn check_review_comment(
    user: Option<&AuthenticatedUser>,
    rating: i64,
    comment: &str,
) -> Result<()> {
    user.ok_or_else(|| AppError::Unauthorized("sign in to comment".into()))?;
    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        return Err(AppError::Validation(format!(
            "rating must be between {RATING_MIN} and {RATING_MAX}"
        )));
    }
    if comment.trim().is_empty() {
        return Err(AppError::Validation("comment cannot be empty".into()));
    }
    Ok(())
}

/// Validates a track comment: signed in and non-empty after trimming.
pub fn check_track_comment(user: Option<&AuthenticatedUser>, comment: &str) -> Result<()> {
    user.ok_or_else(|| AppError::Unauthorized("sign in to comment".into()))?;
    if comment.trim().is_empty() {
        return Err(AppError::Validation("comment cannot be empty".into()));
    }
    Ok(())
}
