//! # Domain Models
//!
//! Typed records for the Mental Game content collections. Documents arrive
//! schemaless from the store; each record type owns a single `from_document`
//! normalizer that substitutes a default for every absent or mistyped field,
//! so defaulting lives in exactly one place per entity and is testable on
//! its own.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::dates::DisplayDate;
use crate::traits::{Document, SERVER_TIMESTAMP};
use crate::video;

/// Default artist name substituted when a record carries none.
pub const DEFAULT_NAME: &str = "Artist Name";
/// Default album title substituted when a record carries none.
pub const DEFAULT_ALBUM: &str = "Album Title";
/// Default genre substituted when a record carries none.
pub const DEFAULT_GENRE: &str = "Hip-Hop";
/// Default release year substituted when a record carries none.
pub const DEFAULT_YEAR: &str = "2024";

/// The opaque user capsule handed out by the identity provider.
/// Never persisted; re-derived from the provider on every page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: String,
    pub display_name: String,
    pub photo_url: String,
    pub email: String,
}

/// A candidate eligible to appear in a fan ranking for a given month.
/// Created administratively; read-only to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nominee {
    pub id: String,
    pub name: String,
    pub image: String,
    pub month_nominated: String,
}

impl Nominee {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: str_or(&doc.data, "name", DEFAULT_NAME),
            image: str_or(&doc.data, "image", ""),
            month_nominated: str_or(&doc.data, "monthNominated", ""),
        }
    }
}

/// One slot in a user's submitted ranking, rank 1 = most preferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedChoice {
    pub rank: u8,
    pub name: String,
    pub image: String,
}

/// A user's top-5 submission for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanRanking {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_photo: String,
    pub rankings: Vec<RankedChoice>,
    pub month: String,
    pub created_at: DisplayDate,
    pub likes: i64,
}

impl FanRanking {
    pub fn from_document(doc: &Document) -> Self {
        let rankings = doc
            .data
            .get("rankings")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| RankedChoice {
                        rank: int_or(entry, "rank", 0).clamp(0, u8::MAX as i64) as u8,
                        name: str_or(entry, "name", DEFAULT_NAME),
                        image: str_or(entry, "image", ""),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            id: doc.id.clone(),
            user_id: str_or(&doc.data, "userId", ""),
            user_name: str_or(&doc.data, "userName", "Anonymous"),
            user_photo: str_or(&doc.data, "userPhoto", ""),
            rankings,
            month: str_or(&doc.data, "month", ""),
            created_at: DisplayDate::from_value(doc.data.get("createdAt")),
            likes: int_or(&doc.data, "likes", 0),
        }
    }

    /// Builds the optimistic record for a submission that was just accepted.
    /// The instant is client-synthesized; the store holds the authoritative
    /// timestamp and a later re-fetch reconciles the two.
    pub fn new_submission(
        user: &AuthenticatedUser,
        rankings: Vec<RankedChoice>,
        month: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            user_id: user.id.clone(),
            user_name: user.display_name.clone(),
            user_photo: user.photo_url.clone(),
            rankings,
            month,
            created_at: DisplayDate::from_instant(now),
            likes: 0,
        }
    }

    /// The document body written to the store. `createdAt` carries the
    /// server-timestamp sentinel so the store assigns the authoritative time.
    pub fn submission_data(&self) -> Value {
        json!({
            "userId": self.user_id,
            "userName": self.user_name,
            "userPhoto": self.user_photo,
            "rankings": self.rankings,
            "month": self.month,
            "createdAt": SERVER_TIMESTAMP,
            "likes": self.likes,
        })
    }
}

/// An album review. Created administratively; read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub rating: f64,
    pub genre: String,
    pub date: DisplayDate,
    pub album_cover: String,
    pub summary: String,
    pub verdict: String,
}

impl Review {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            artist: str_or(&doc.data, "artist", DEFAULT_NAME),
            album: str_or(&doc.data, "album", DEFAULT_ALBUM),
            year: text_or_number(&doc.data, "year", DEFAULT_YEAR),
            rating: num_or(&doc.data, "rating", 0.0),
            genre: str_or(&doc.data, "genre", DEFAULT_GENRE),
            date: DisplayDate::from_value(doc.data.get("date")),
            album_cover: str_or(&doc.data, "albumCover", ""),
            summary: str_or(&doc.data, "summary", ""),
            verdict: str_or(&doc.data, "verdict", ""),
        }
    }

    /// The "N/10" badge shown next to a review.
    pub fn rating_label(&self) -> String {
        if self.rating.fract() == 0.0 {
            format!("{:.0}/10", self.rating)
        } else {
            format!("{}/10", self.rating)
        }
    }
}

/// A reader's comment on a review. Unlimited per review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewComment {
    pub id: String,
    pub review_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_photo: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: DisplayDate,
}

impl ReviewComment {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            review_id: str_or(&doc.data, "reviewId", ""),
            user_id: str_or(&doc.data, "userId", ""),
            user_name: str_or(&doc.data, "userName", "Anonymous"),
            user_photo: str_or(&doc.data, "userPhoto", ""),
            rating: int_or(&doc.data, "rating", 0),
            comment: str_or(&doc.data, "comment", ""),
            created_at: DisplayDate::from_value(doc.data.get("createdAt")),
        }
    }

    pub fn new_submission(
        user: &AuthenticatedUser,
        review_id: &str,
        rating: i64,
        comment: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            review_id: review_id.to_string(),
            user_id: user.id.clone(),
            user_name: user.display_name.clone(),
            user_photo: user.photo_url.clone(),
            rating,
            comment,
            created_at: DisplayDate::from_instant(now),
        }
    }

    pub fn submission_data(&self) -> Value {
        json!({
            "reviewId": self.review_id,
            "userId": self.user_id,
            "userName": self.user_name,
            "userPhoto": self.user_photo,
            "rating": self.rating,
            "comment": self.comment,
            "createdAt": SERVER_TIMESTAMP,
        })
    }
}

/// A published interview with an embedded video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: String,
    pub artist: String,
    pub title: String,
    pub description: String,
    pub date: DisplayDate,
    pub tags: Vec<String>,
    pub video_id: String,
}

impl Interview {
    pub fn from_document(doc: &Document) -> Self {
        // The stored reference may be a URL in any supported form or already
        // a bare identifier; the document id stands in when nothing matches.
        let raw_video = doc
            .data
            .get("videoId")
            .or_else(|| doc.data.get("link"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let video_id = video::extract_video_id(raw_video).unwrap_or_else(|| doc.id.clone());
        Self {
            id: doc.id.clone(),
            artist: str_or(&doc.data, "artist", DEFAULT_NAME),
            title: str_or(&doc.data, "title", "Interview"),
            description: str_or(&doc.data, "description", ""),
            date: DisplayDate::from_value(
                doc.data.get("date").or_else(|| doc.data.get("timestamp")),
            ),
            tags: string_list(&doc.data, "tags"),
            video_id,
        }
    }

    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.video_id)
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// One of the site's top-5 artists, ascending by rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopArtist {
    pub id: String,
    pub rank: i64,
    pub name: String,
    pub image: String,
}

impl TopArtist {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            rank: int_or(&doc.data, "rank", 0),
            name: str_or(&doc.data, "name", DEFAULT_NAME),
            image: str_or(&doc.data, "image", ""),
        }
    }
}

/// One entry of the ranked track list, ascending by rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedTrack {
    pub id: String,
    pub rank: i64,
    pub title: String,
    pub artist: String,
    pub image: String,
}

impl RankedTrack {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            rank: int_or(&doc.data, "rank", 0),
            title: str_or(&doc.data, "title", "Track Title"),
            artist: str_or(&doc.data, "artist", DEFAULT_NAME),
            image: str_or(&doc.data, "image", ""),
        }
    }
}

/// A comment on one ranked track. Unlimited per track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackComment {
    pub id: String,
    pub song_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_photo: String,
    pub comment: String,
    pub created_at: DisplayDate,
}

impl TrackComment {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            song_id: str_or(&doc.data, "songId", ""),
            user_id: str_or(&doc.data, "userId", ""),
            user_name: str_or(&doc.data, "userName", "Anonymous"),
            user_photo: str_or(&doc.data, "userPhoto", ""),
            comment: str_or(&doc.data, "comment", ""),
            created_at: DisplayDate::from_value(doc.data.get("createdAt")),
        }
    }

    pub fn new_submission(
        user: &AuthenticatedUser,
        song_id: &str,
        comment: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            song_id: song_id.to_string(),
            user_id: user.id.clone(),
            user_name: user.display_name.clone(),
            user_photo: user.photo_url.clone(),
            comment,
            created_at: DisplayDate::from_instant(now),
        }
    }

    pub fn submission_data(&self) -> Value {
        json!({
            "songId": self.song_id,
            "userId": self.user_id,
            "userName": self.user_name,
            "userPhoto": self.user_photo,
            "comment": self.comment,
            "createdAt": SERVER_TIMESTAMP,
        })
    }
}

/// The hero record behind the homepage and the featured page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedArtist {
    pub id: String,
    pub name: String,
    pub album: String,
    pub year: String,
    pub album_cover: String,
    pub background_image: String,
    pub bio: String,
    pub genre: String,
    pub highlights: Vec<String>,
    pub stats: BTreeMap<String, String>,
    pub quote: String,
    pub spotify_link: String,
    pub apple_music_link: String,
    pub youtube_link: String,
}

impl FeaturedArtist {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: str_or(&doc.data, "name", DEFAULT_NAME),
            album: str_or(&doc.data, "album", DEFAULT_ALBUM),
            year: text_or_number(&doc.data, "year", DEFAULT_YEAR),
            album_cover: str_or(&doc.data, "albumCover", ""),
            background_image: str_or(&doc.data, "backgroundImage", ""),
            bio: str_or(&doc.data, "bio", "Artist biography"),
            genre: str_or(&doc.data, "genre", DEFAULT_GENRE),
            highlights: string_list(&doc.data, "highlights"),
            stats: string_map(&doc.data, "stats"),
            quote: str_or(&doc.data, "quote", ""),
            spotify_link: str_or(&doc.data, "spotifyLink", ""),
            apple_music_link: str_or(&doc.data, "appleMusicLink", ""),
            youtube_link: str_or(&doc.data, "youtubeLink", ""),
        }
    }
}

// ── Field defaulting helpers ─────────────────────────────────────────────────
// The empty string counts as absent, matching the source data's convention.

fn str_or(data: &Value, key: &str, default: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => default.to_string(),
    }
}

fn text_or_number(data: &Value, key: &str, default: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

fn num_or(data: &Value, key: &str, default: f64) -> f64 {
    data.get(key).and_then(Value::as_f64).unwrap_or(default)
}

fn int_or(data: &Value, key: &str, default: i64) -> i64 {
    data.get(key).and_then(Value::as_i64).unwrap_or(default)
}

fn string_list(data: &Value, key: &str) -> Vec<String> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn string_map(data: &Value, key: &str) -> BTreeMap<String, String> {
    data.get(key)
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(k, v)| {
                    let rendered = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), rendered)
                })
                .collect()
        })
        .unwrap_or_default()
}
