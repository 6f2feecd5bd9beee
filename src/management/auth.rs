use crate::{
    Result,
    clock::Clock,
    info,
    mal::{CodeProvider, OAuthClient},
    success,
    types::TokenRecord,
};

use super::TokenStore;

/// Keeps a usable access token on disk.
///
/// Loads the stored token, authorizes when there is none, and refreshes
/// when the stored one has expired. Every new token is saved before it is
/// handed out.
pub struct TokenManager {
    store: TokenStore,
    oauth: OAuthClient,
    clock: Box<dyn Clock>,
}

impl TokenManager {
    pub fn new(store: TokenStore, oauth: OAuthClient, clock: Box<dyn Clock>) -> Self {
        TokenManager {
            store,
            oauth,
            clock,
        }
    }

    pub async fn get_valid_token(&self, provider: &mut dyn CodeProvider) -> Result<String> {
        let stored = match self.store.load().await? {
            Some(stored) => stored,
            None => return Ok(self.authorize(provider).await?.access_token),
        };

        if !stored.is_stale(self.clock.now()) {
            return Ok(stored.record.access_token);
        }

        info!("Refreshing Access Token...");
        let token = self.oauth.refresh(&stored.record.refresh_token).await?;
        self.store.save(&token).await?;
        Ok(token.access_token)
    }

    /// Runs a fresh authorization regardless of any stored token and saves
    /// the result.
    pub async fn authorize(&self, provider: &mut dyn CodeProvider) -> Result<TokenRecord> {
        let token = self.oauth.authorize(provider).await?;
        self.store.save(&token).await?;
        success!("Saved Access Token in `{}`", self.store.path().display());
        Ok(token)
    }
}
