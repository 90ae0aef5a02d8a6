//! # Content Loader
//!
//! Fetches named collections on page load, normalizes every document at the
//! store boundary, and returns view-ready, ordered lists. A store failure
//! degrades to an empty list with a logged warning — pages show "no data
//! found" rather than crashing.

use std::sync::Arc;

use crate::feed::Feed;
use crate::models::{
    FanRanking, FeaturedArtist, Interview, Nominee, RankedTrack, Review, ReviewComment, TopArtist,
    TrackComment,
};
use crate::traits::{collections, Document, DocumentStore, OrderDirection, QueryOptions};

/// Typed, normalizing reads over the document store.
#[derive(Clone)]
pub struct ContentLoader {
    store: Arc<dyn DocumentStore>,
}

impl ContentLoader {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.store)
    }

    async fn fetch(&self, collection: &str, options: QueryOptions) -> Vec<Document> {
        match self.store.query(collection, options).await {
            Ok(documents) => documents,
            Err(err) => {
                log::warn!("failed to load {collection}: {err:#}");
                Vec::new()
            }
        }
    }

    /// The single featured-artist record, if one is published.
    pub async fn featured_artist(&self) -> Option<FeaturedArtist> {
        self.fetch(collections::FEATURED, QueryOptions::limited(1))
            .await
            .first()
            .map(FeaturedArtist::from_document)
    }

    /// Nominees for the current voting round, alphabetical by name.
    pub async fn nominees(&self) -> Vec<Nominee> {
        let mut nominees: Vec<Nominee> = self
            .fetch(collections::NOMINATIONS, QueryOptions::default())
            .await
            .iter()
            .map(Nominee::from_document)
            .collect();
        nominees.sort_by(|a, b| a.name.cmp(&b.name));
        nominees
    }

    /// The fan-ranking feed, newest first.
    pub async fn fan_rankings(&self) -> Feed<FanRanking> {
        let records = self
            .fetch(
                collections::FAN_RANKINGS,
                QueryOptions::ordered("createdAt", OrderDirection::Descending),
            )
            .await
            .iter()
            .map(FanRanking::from_document)
            .collect();
        Feed::from_fetched(records)
    }

    /// Album reviews, newest first by review date.
    pub async fn reviews(&self) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .fetch(
                collections::REVIEWS,
                QueryOptions::ordered("date", OrderDirection::Descending),
            )
            .await
            .iter()
            .map(Review::from_document)
            .collect();
        reviews.sort_by(|a, b| b.date.instant.cmp(&a.date.instant));
        reviews
    }

    /// Comments for one review, newest first. The store has no filtered
    /// query, so the collection is fetched whole and narrowed here.
    pub async fn review_comments(&self, review_id: &str) -> Feed<ReviewComment> {
        let records = self
            .fetch(
                collections::REVIEW_COMMENTS,
                QueryOptions::ordered("createdAt", OrderDirection::Descending),
            )
            .await
            .iter()
            .map(ReviewComment::from_document)
            .filter(|comment| comment.review_id == review_id)
            .collect();
        Feed::from_fetched(records)
    }

    /// Published interviews, newest first with deterministic tie-breaks.
    pub async fn interviews(&self) -> Feed<Interview> {
        let records = self
            .fetch(
                collections::INTERVIEWS,
                QueryOptions::ordered("date", OrderDirection::Descending),
            )
            .await
            .iter()
            .map(Interview::from_document)
            .collect();
        Feed::from_fetched(records)
    }

    /// The site's top artists, ascending by rank.
    pub async fn top_artists(&self) -> Vec<TopArtist> {
        let mut artists: Vec<TopArtist> = self
            .fetch(
                collections::TOP_ARTISTS,
                QueryOptions::ordered("rank", OrderDirection::Ascending),
            )
            .await
            .iter()
            .map(TopArtist::from_document)
            .collect();
        artists.sort_by_key(|artist| artist.rank);
        artists
    }

    /// The ranked track list, ascending by rank.
    pub async fn ranked_tracks(&self) -> Vec<RankedTrack> {
        let mut tracks: Vec<RankedTrack> = self
            .fetch(
                collections::RANKED_TRACKS,
                QueryOptions::ordered("rank", OrderDirection::Ascending),
            )
            .await
            .iter()
            .map(RankedTrack::from_document)
            .collect();
        tracks.sort_by_key(|track| track.rank);
        tracks
    }

    /// Comments for one ranked track, newest first.
    pub async fn track_comments(&self, song_id: &str) -> Feed<TrackComment> {
        let records = self
            .fetch(
                collections::TRACK_COMMENTS,
                QueryOptions::ordered("createdAt", OrderDirection::Descending),
            )
            .await
            .iter()
            .map(TrackComment::from_document)
            .filter(|comment| comment.song_id == song_id)
            .collect();
        Feed::from_fetched(records)
    }
}
