//! Shared fixtures for the integration suite: a seeded in-memory store and
//! an assembled application state, the same wiring the binary does.

use std::sync::Arc;

use mg_api::AppState;
use mg_core::models::AuthenticatedUser;
use mg_core::traits::{DocumentStore, IdentityProvider, MockIdentityProvider};
use mg_store_memory::MemoryDocumentStore;
use serde_json::json;

pub fn test_user(id: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        id: id.to_string(),
        display_name: "Evan".into(),
        photo_url: "https://cdn.example/avatar.png".into(),
        email: "evan@example.com".into(),
    }
}

/// App state over a fresh in-memory store and an identity mock with no
/// expectations; tests that drive the sign-in endpoint build their own mock.
pub fn app_state(store: Arc<dyn DocumentStore>) -> actix_web::web::Data<AppState> {
    let identity: Arc<dyn IdentityProvider> = Arc::new(MockIdentityProvider::new());
    actix_web::web::Data::new(AppState::new(store, identity))
}

pub fn memory_store() -> Arc<MemoryDocumentStore> {
    Arc::new(MemoryDocumentStore::new())
}

/// Seeds five nominees and returns their store-assigned ids in insertion
/// order.
pub async fn seed_nominees(store: &dyn DocumentStore) -> Vec<String> {
    let mut ids = Vec::new();
    for name in ["Lelo", "1300 Saint", "Kai H", "Nardo$ Reign", "Destin Laurel"] {
        let id = store
            .insert(
                "nominations",
                json!({"name": name, "image": "", "monthNominated": "December 2024"}),
            )
            .await
            .expect("seed nominee");
        ids.push(id);
    }
    ids
}
