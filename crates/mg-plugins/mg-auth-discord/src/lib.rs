//! # mg-auth-discord
//!
//! Discord OAuth implementation of `IdentityProvider`. The browser handles
//! the popup; this adapter finishes the flow server-side: it signs the
//! `state` parameter, exchanges the authorization code for a token, and maps
//! the Discord profile into the opaque user capsule the core consumes.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use mg_core::models::AuthenticatedUser;
use mg_core::traits::IdentityProvider;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;

const AUTHORIZE_URL: &str = "https://discord.com/oauth2/authorize";
const TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const USER_URL: &str = "https://discord.com/api/users/@me";
const AVATAR_CDN: &str = "https://cdn.discordapp.com/avatars";

/// Scopes requested from the provider: profile and email.
const SCOPES: &str = "identify email";

type HmacSha256 = Hmac<Sha256>;

pub struct DiscordIdentityProvider {
    http: Client,
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct DiscordUser {
    id: String,
    username: String,
    global_name: Option<String>,
    avatar: Option<String>,
    email: Option<String>,
}

impl DiscordIdentityProvider {
    pub fn new(client_id: String, client_secret: SecretString, redirect_uri: String) -> Self {
        Self {
            http: Client::new(),
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    /// The URL the site sends the popup to, with a signed `state` parameter.
    pub fn authorize_url(&self, session_seed: &str) -> anyhow::Result<Url> {
        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("state", &self.state_token(session_seed)),
            ],
        )?;
        Ok(url)
    }

    /// Derives the `state` parameter for a session: an HMAC over the seed
    /// keyed with the client secret, so the callback can be tied to the
    /// session that opened the popup.
    pub fn state_token(&self, session_seed: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.client_secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(session_seed.as_bytes());
        let digest = hex::encode(mac.finalize().into_bytes());
        digest[..32].to_string()
    }

    pub fn verify_state(&self, session_seed: &str, state: &str) -> bool {
        self.state_token(session_seed) == state
    }

    fn map_user(user: DiscordUser) -> AuthenticatedUser {
        let photo_url = user
            .avatar
            .as_deref()
            .map(|hash| format!("{AVATAR_CDN}/{}/{hash}.png", user.id))
            .unwrap_or_default();
        AuthenticatedUser {
            display_name: user.global_name.unwrap_or_else(|| user.username.clone()),
            photo_url,
            email: user.email.unwrap_or_default(),
            id: user.id,
        }
    }
}

#[async_trait]
impl IdentityProvider for DiscordIdentityProvider {
    async fn sign_in(&self, authorization_code: &str) -> anyhow::Result<AuthenticatedUser> {
        let token: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret()),
                ("grant_type", "authorization_code"),
                ("code", authorization_code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let profile: DiscordUser = self
            .http
            .get(USER_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        log::info!("signed in discord user {}", profile.id);
        Ok(Self::map_user(profile))
    }

    async fn sign_out(&self) -> anyhow::Result<()> {
        // No server-side session to revoke; the access token is never stored.
        log::info!("signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> DiscordIdentityProvider {
        DiscordIdentityProvider::new(
            "client-id".into(),
            SecretString::from("client-secret".to_string()),
            "https://mentalgame.example/auth/callback".into(),
        )
    }

    fn discord_user(global_name: Option<&str>, avatar: Option<&str>) -> DiscordUser {
        DiscordUser {
            id: "766921863094".into(),
            username: "eevan_j".into(),
            global_name: global_name.map(str::to_string),
            avatar: avatar.map(str::to_string),
            email: Some("evan@example.com".into()),
        }
    }

    #[test]
    fn global_name_wins_over_username() {
        let user = DiscordIdentityProvider::map_user(discord_user(Some("Evan J"), None));
        assert_eq!(user.display_name, "Evan J");
    }

    #[test]
    fn username_is_the_fallback_display_name() {
        let user = DiscordIdentityProvider::map_user(discord_user(None, None));
        assert_eq!(user.display_name, "eevan_j");
    }

    #[test]
    fn avatar_hash_becomes_a_cdn_url() {
        let user = DiscordIdentityProvider::map_user(discord_user(None, Some("abc123")));
        assert_eq!(
            user.photo_url,
            "https://cdn.discordapp.com/avatars/766921863094/abc123.png"
        );
    }

    #[test]
    fn missing_avatar_yields_empty_photo_url() {
        let user = DiscordIdentityProvider::map_user(discord_user(None, None));
        assert!(user.photo_url.is_empty());
    }

    #[test]
    fn state_token_is_deterministic_and_verifiable() {
        let provider = provider();
        let state = provider.state_token("session-1");
        assert_eq!(state.len(), 32);
        assert!(provider.verify_state("session-1", &state));
        assert!(!provider.verify_state("session-2", &state));
    }

    #[test]
    fn authorize_url_carries_the_state() {
        let provider = provider();
        let url = provider.authorize_url("session-1").unwrap();
        assert_eq!(url.domain(), Some("discord.com"));
        let state = provider.state_token("session-1");
        assert!(url
            .query_pairs()
            .any(|(key, value)| key == "state" && value == state));
    }
}
