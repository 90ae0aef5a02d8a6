//! # Mental Game Binary
//!
//! The entry point that assembles the site backend from the feature-selected
//! plugins: a document store, the Discord identity provider, and the API.

use actix_web::{web, App, HttpServer};
use mg_api::{middleware, AppState};
use mg_core::traits::DocumentStore;
use std::sync::Arc;

#[cfg(feature = "store-sqlite")]
use mg_store_sqlite::SqliteDocumentStore;

#[cfg(all(feature = "store-memory", not(feature = "store-sqlite")))]
use mg_store_memory::MemoryDocumentStore;

#[cfg(feature = "auth-discord")]
use mg_auth_discord::DiscordIdentityProvider;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = mg_configs::Settings::load()?;

    // 1. Document store implementation
    #[cfg(feature = "store-sqlite")]
    let store: Arc<dyn DocumentStore> =
        Arc::new(SqliteDocumentStore::new(&settings.store.database_url).await?);

    // Demo/test assembly: everything in memory, nothing persisted.
    #[cfg(all(feature = "store-memory", not(feature = "store-sqlite")))]
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());

    // 2. Identity provider implementation
    #[cfg(feature = "auth-discord")]
    let identity = Arc::new(DiscordIdentityProvider::new(
        settings.discord.client_id.clone(),
        settings.discord.client_secret,
        settings.discord.redirect_uri.clone(),
    ));

    // 3. Shared state over the ports
    let state = web::Data::new(AppState::new(store, identity));

    let bind = (settings.server.host.clone(), settings.server.port);
    log::info!("🚀 Mental Game starting on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::cors_policy())
            .wrap(middleware::standard_middleware())
            .configure(mg_api::configure_routes)
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
