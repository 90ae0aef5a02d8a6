//! mental-game/crates/mg-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Mental Game:
//! typed content records, the document-store and identity-provider ports,
//! the content loader, the submission guard, the ranking selection machine,
//! and the optimistic feed merger.

pub mod auth;
pub mod dates;
pub mod error;
pub mod feed;
pub mod guard;
pub mod loader;
pub mod models;
pub mod selection;
pub mod traits;
pub mod video;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use chrono::Utc;

    #[test]
    fn test_ranking_submission_shape() {
        let user = AuthenticatedUser {
            id: "discord:42".into(),
            display_name: "Evan".into(),
            photo_url: "https://cdn.example/avatar.png".into(),
            email: "evan@example.com".into(),
        };
        let rankings: Vec<RankedChoice> = (1..=5)
            .map(|rank| RankedChoice {
                rank,
                name: format!("Nominee {rank}"),
                image: String::new(),
            })
            .collect();
        let submission =
            FanRanking::new_submission(&user, rankings, "December 2024".into(), Utc::now());
        assert_eq!(submission.rankings.len(), 5);
        assert_eq!(submission.user_id, "discord:42");
        assert_eq!(submission.likes, 0);
        assert!(submission.id.is_empty());
    }
}
