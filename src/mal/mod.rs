//! # MyAnimeList Integration Module
//!
//! This module is the integration layer between the rule generator and the
//! MyAnimeList API. It covers exactly two concerns:
//!
//! ```text
//! CLI / Token Manager
//!          ↓
//! MyAnimeList Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE, plain method)
//!     └── Anime List (plan to watch, paginated)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Authentication
//!
//! [`auth`] implements the authorization code grant with a `plain` PKCE
//! challenge. The authorization URL is shown to the operator, who completes
//! the consent in a browser and pastes the resulting code back. The code
//! provider is a trait so the interactive prompt can be swapped out.
//!
//! ## Anime List
//!
//! [`anime_list`] walks `GET /users/@me/animelist` page by page, following the
//! `paging.next` link until the server stops sending one, and keeps only the
//! titles that start in the requested season.
//!
//! ## Error Handling
//!
//! Both submodules fail fast. There are no retries: a transport failure, a
//! status above 299 or an undecodable body aborts the whole operation and no
//! partial data is returned. Non-success bodies are carried in
//! [`Error::Status`] so the operator sees what the server said.

pub mod anime_list;
pub mod auth;

pub use anime_list::AnimeListClient;
pub use auth::{CodeProvider, OAuthClient, StdinCodeProvider};

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// Decodes a JSON body if the status is in the success range. Otherwise the
/// body is returned as text inside the error.
pub(crate) async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.as_u16() > 299 {
        let body = response.text().await?;
        return Err(Error::Status { status, body });
    }

    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            Error::Decode(e.to_string())
        } else {
            Error::Transport(e)
        }
    })
}

/// Joins a configured base URL and an endpoint path.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
