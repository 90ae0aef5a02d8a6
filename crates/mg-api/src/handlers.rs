//! # mg-api Handlers
//!
//! Coordinates the flow between HTTP requests and the core: one GET per page
//! that batches that page's reads, plus the submission endpoints. Feeds that
//! accept submissions are cached in `AppState` so a successful write merges
//! optimistically instead of forcing a re-fetch.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;

use mg_core::auth::AuthState;
use mg_core::dates::month_label;
use mg_core::error::AppError;
use mg_core::feed::Feed;
use mg_core::loader::ContentLoader;
use mg_core::models::{FanRanking, Interview, Review, ReviewComment, TrackComment};
use mg_core::selection::RankingDraft;
use mg_core::traits::{collections, DocumentStore, IdentityProvider};
use mg_core::{guard, selection};

/// State shared across all workers.
pub struct AppState {
    pub loader: ContentLoader,
    pub store: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub auth: AuthState,
    rankings: RwLock<Option<Feed<FanRanking>>>,
    review_comments: RwLock<HashMap<String, Feed<ReviewComment>>>,
    track_comments: RwLock<HashMap<String, Feed<TrackComment>>>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            loader: ContentLoader::new(Arc::clone(&store)),
            store,
            identity,
            auth: AuthState::new(),
            rankings: RwLock::new(None),
            review_comments: RwLock::new(HashMap::new()),
            track_comments: RwLock::new(HashMap::new()),
        }
    }
}

/// Maps a core error to the response the page shows inline.
fn error_response(err: &AppError) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        AppError::Validation(_) => HttpResponse::UnprocessableEntity().json(body),
        AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(body),
        AppError::DuplicateSubmission(_) => HttpResponse::Conflict().json(body),
        AppError::WriteFailure(_) => HttpResponse::BadGateway().json(body),
        AppError::LoadFailure(_) | AppError::Internal(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InterviewView {
    #[serde(flatten)]
    interview: Interview,
    embed_url: String,
    watch_url: String,
}

impl From<&Interview> for InterviewView {
    fn from(interview: &Interview) -> Self {
        Self {
            embed_url: interview.embed_url(),
            watch_url: interview.watch_url(),
            interview: interview.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewView {
    #[serde(flatten)]
    review: Review,
    rating_label: String,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            rating_label: review.rating_label(),
            review: review.clone(),
        }
    }
}

// ── Page reads ───────────────────────────────────────────────────────────────

/// Homepage / featured-artist hero.
pub async fn home(data: web::Data<AppState>) -> impl Responder {
    let featured = data.loader.featured_artist().await;
    HttpResponse::Ok().json(json!({ "featured": featured }))
}

pub async fn interviews(data: web::Data<AppState>) -> impl Responder {
    let feed = data.loader.interviews().await;
    let views: Vec<InterviewView> = feed.records().map(InterviewView::from).collect();
    HttpResponse::Ok().json(json!({ "interviews": views }))
}

pub async fn reviews(data: web::Data<AppState>) -> impl Responder {
    let views: Vec<ReviewView> = data.loader.reviews().await.iter().map(ReviewView::from).collect();
    HttpResponse::Ok().json(json!({ "reviews": views }))
}

pub async fn review_comments(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let review_id = path.into_inner();
    // A page read is a fresh fetch; it also reconciles any pending entries.
    let feed = data.loader.review_comments(&review_id).await;
    let body = json!({ "comments": feed.entries() });
    data.review_comments.write().await.insert(review_id, feed);
    HttpResponse::Ok().json(body)
}

/// The fan-ranking page: nominees, the submission feed, and whether the
/// current user may still submit.
pub async fn fan_ranking(data: web::Data<AppState>) -> impl Responder {
    let nominees = data.loader.nominees().await;
    let feed = data.loader.fan_rankings().await;
    let user = data.auth.current();
    let records: Vec<FanRanking> = feed.records().cloned().collect();
    let can_submit = guard::can_submit_ranking(user.as_ref(), &records);
    let body = json!({
        "month": month_label(Utc::now()),
        "nominees": nominees,
        "rankings": feed.entries(),
        "canSubmit": can_submit,
        "user": user,
    });
    *data.rankings.write().await = Some(feed);
    HttpResponse::Ok().json(body)
}

pub async fn my_music_taste(data: web::Data<AppState>) -> impl Responder {
    let top_artists = data.loader.top_artists().await;
    let tracks = data.loader.ranked_tracks().await;
    HttpResponse::Ok().json(json!({ "topArtists": top_artists, "tracks": tracks }))
}

pub async fn track_comments(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let song_id = path.into_inner();
    let feed = data.loader.track_comments(&song_id).await;
    let body = json!({ "comments": feed.entries() });
    data.track_comments.write().await.insert(song_id, feed);
    HttpResponse::Ok().json(body)
}

// ── Submissions ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RankingSubmission {
    /// Nominee ids in preference order, most preferred first.
    pub selections: Vec<String>,
}

pub async fn post_fan_ranking(
    data: web::Data<AppState>,
    form: web::Json<RankingSubmission>,
) -> impl Responder {
    let user = data.auth.current();

    // The guard consults the loaded feed; load it here if the page read
    // never happened in this process.
    let mut rankings = data.rankings.write().await;
    if rankings.is_none() {
        *rankings = Some(data.loader.fan_rankings().await);
    }
    let Some(feed) = rankings.as_mut() else {
        return error_response(&AppError::Internal("ranking feed unavailable".into()));
    };

    let records: Vec<FanRanking> = feed.records().cloned().collect();
    if let Err(err) = guard::check_ranking_submission(user.as_ref(), &records) {
        return error_response(&err);
    }
    let Some(user) = user else {
        return error_response(&AppError::Unauthorized("sign in to submit a ranking".into()));
    };

    // Rebuild the selection through the draft machine so its rules (five
    // picks, no duplicates) hold for API submissions too.
    let nominees = data.loader.nominees().await;
    let mut draft = RankingDraft::new();
    for nominee_id in &form.selections {
        let Some(nominee) = nominees.iter().find(|n| &n.id == nominee_id) else {
            return error_response(&AppError::Validation(format!(
                "unknown nominee: {nominee_id}"
            )));
        };
        if !draft.select(nominee.clone()) {
            return error_response(&AppError::Validation(format!(
                "a ranking holds {} distinct picks",
                selection::RANKING_SIZE
            )));
        }
    }
    let ranked = match draft.into_rankings() {
        Ok(ranked) => ranked,
        Err(err) => return error_response(&err),
    };

    let now = Utc::now();
    let mut record = FanRanking::new_submission(&user, ranked, month_label(now), now);
    match data
        .store
        .insert(collections::FAN_RANKINGS, record.submission_data())
        .await
    {
        Ok(id) => {
            record.id = id;
            feed.merge(record);
            HttpResponse::Created().json(json!({
                "rankings": feed.entries(),
                "canSubmit": false,
            }))
        }
        // The feed is untouched and the submission is echoed back so the
        // page can keep the user's input for a retry.
        Err(err) => {
            log::error!("fan ranking insert failed: {err:#}");
            let retry = json!({ "selections": &form.selections });
            let failure = AppError::WriteFailure("could not save your ranking".into());
            let body = json!({ "error": failure.to_string(), "input": retry });
            HttpResponse::BadGateway().json(body)
        }
    }
}

#[derive(Deserialize)]
pub struct ReviewCommentSubmission {
    pub rating: i64,
    pub comment: String,
}

pub async fn post_review_comment(
    data: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Json<ReviewCommentSubmission>,
) -> impl Responder {
    let review_id = path.into_inner();
    let user = data.auth.current();
    if let Err(err) = guard::check_review_comment(user.as_ref(), form.rating, &form.comment) {
        return error_response(&err);
    }
    let Some(user) = user else {
        return error_response(&AppError::Unauthorized("sign in to comment".into()));
    };

    let now = Utc::now();
    let mut record = ReviewComment::new_submission(
        &user,
        &review_id,
        form.rating,
        form.comment.trim().to_string(),
        now,
    );
    match data
        .store
        .insert(collections::REVIEW_COMMENTS, record.submission_data())
        .await
    {
        Ok(id) => {
            record.id = id;
            let mut comments = data.review_comments.write().await;
            let feed = comments.entry(review_id.clone()).or_default();
            feed.merge(record);
            HttpResponse::Created().json(json!({ "comments": feed.entries() }))
        }
        Err(err) => {
            log::error!("review comment insert failed: {err:#}");
            let failure = AppError::WriteFailure("could not save your comment".into());
            let body = json!({
                "error": failure.to_string(),
                "input": { "rating": form.rating, "comment": &form.comment },
            });
            HttpResponse::BadGateway().json(body)
        }
    }
}

#[derive(Deserialize)]
pub struct TrackCommentSubmission {
    pub comment: String,
}

pub async fn post_track_comment(
    data: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Json<TrackCommentSubmission>,
) -> impl Responder {
    let song_id = path.into_inner();
    let user = data.auth.current();
    if let Err(err) = guard::check_track_comment(user.as_ref(), &form.comment) {
        return error_response(&err);
    }
    let Some(user) = user else {
        return error_response(&AppError::Unauthorized("sign in to comment".into()));
    };

    let now = Utc::now();
    let mut record =
        TrackComment::new_submission(&user, &song_id, form.comment.trim().to_string(), now);
    match data
        .store
        .insert(collections::TRACK_COMMENTS, record.submission_data())
        .await
    {
        Ok(id) => {
            record.id = id;
            let mut comments = data.track_comments.write().await;
            let feed = comments.entry(song_id.clone()).or_default();
            feed.merge(record);
            HttpResponse::Created().json(json!({ "comments": feed.entries() }))
        }
        Err(err) => {
            log::error!("track comment insert failed: {err:#}");
            let failure = AppError::WriteFailure("could not save your comment".into());
            let body = json!({
                "error": failure.to_string(),
                "input": { "comment": &form.comment },
            });
            HttpResponse::BadGateway().json(body)
        }
    }
}

// ── Authentication ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignInRequest {
    pub code: String,
}

pub async fn sign_in(data: web::Data<AppState>, form: web::Json<SignInRequest>) -> impl Responder {
    match data.identity.sign_in(&form.code).await {
        Ok(user) => {
            data.auth.set(user.clone());
            HttpResponse::Ok().json(json!({ "user": user }))
        }
        Err(err) => {
            log::warn!("sign-in failed: {err:#}");
            error_response(&AppError::Unauthorized("sign-in failed".into()))
        }
    }
}

pub async fn sign_out(data: web::Data<AppState>) -> impl Responder {
    if let Err(err) = data.identity.sign_out().await {
        log::warn!("sign-out: {err:#}");
    }
    data.auth.clear();
    HttpResponse::NoContent().finish()
}

pub async fn me(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({ "user": data.auth.current() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn error_taxonomy_maps_to_the_right_status() {
        let cases = [
            (AppError::Validation("bad".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (
                AppError::DuplicateSubmission("again".into()),
                StatusCode::CONFLICT,
            ),
            (AppError::WriteFailure("down".into()), StatusCode::BAD_GATEWAY),
            (
                AppError::LoadFailure("reviews".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(error_response(&err).status(), expected, "{err}");
        }
    }
}
