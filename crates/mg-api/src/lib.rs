//! # mg-api
//!
//! The web routing and orchestration layer for Mental Game.

pub mod handlers;
pub mod middleware;

use actix_web::web;

pub use handlers::AppState;

/// Configures the routes for the site's API.
///
/// Scoped so the binary can mount everything under a different prefix if
/// the hosting setup ever needs it.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Page reads, one batch per page mount
            .route("/home", web::get().to(handlers::home))
            .route("/interviews", web::get().to(handlers::interviews))
            .route("/reviews", web::get().to(handlers::reviews))
            .route(
                "/reviews/{review_id}/comments",
                web::get().to(handlers::review_comments),
            )
            .route("/fan-ranking", web::get().to(handlers::fan_ranking))
            .route("/my-music-taste", web::get().to(handlers::my_music_taste))
            .route(
                "/my-music-taste/tracks/{song_id}/comments",
                web::get().to(handlers::track_comments),
            )
            // Submissions
            .route("/fan-ranking", web::post().to(handlers::post_fan_ranking))
            .route(
                "/reviews/{review_id}/comments",
                web::post().to(handlers::post_review_comment),
            )
            .route(
                "/my-music-taste/tracks/{song_id}/comments",
                web::post().to(handlers::post_track_comment),
            )
            // Authentication
            .route("/auth/signin", web::post().to(handlers::sign_in))
            .route("/auth/signout", web::post().to(handlers::sign_out))
            .route("/auth/me", web::get().to(handlers::me)),
    );
}
