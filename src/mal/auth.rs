use std::io::{self, BufRead, Write};

use reqwest::{Client, Url};

use crate::{
    Error, Result,
    config::MalConfig,
    info, success,
    types::TokenRecord,
    utils, warning,
};

use super::{decode_response, endpoint};

/// Supplies the authorization code once the operator has granted access.
pub trait CodeProvider {
    /// Presents `authorize_url` to the operator and returns the code they
    /// obtained from it.
    fn authorization_code(&mut self, authorize_url: &Url) -> Result<String>;
}

/// Prompts on the terminal and reads the code from standard input.
///
/// The URL is always printed. When `open_browser` is set the default browser
/// is pointed at it too; a failure to do so is only a warning.
#[derive(Debug, Clone)]
pub struct StdinCodeProvider {
    pub open_browser: bool,
}

impl CodeProvider for StdinCodeProvider {
    fn authorization_code(&mut self, authorize_url: &Url) -> Result<String> {
        info!(
            "Allow access to MyAnimeList account using this URL:\n{}",
            authorize_url
        );

        if self.open_browser && webbrowser::open(authorize_url.as_str()).is_err() {
            warning!("Failed to open browser. Please navigate to the URL above manually.");
        }

        eprint!("\nPaste auth token: ");
        io::stderr()
            .flush()
            .map_err(|e| Error::Prompt(e.to_string()))?;

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| Error::Prompt(e.to_string()))?;

        let code = line.trim();
        if code.is_empty() {
            return Err(Error::Prompt("no authorization code entered".to_string()));
        }

        Ok(code.to_string())
    }
}

/// OAuth 2.0 client for the MyAnimeList authorization server.
pub struct OAuthClient {
    config: MalConfig,
    client: Client,
}

impl OAuthClient {
    pub fn new(config: &MalConfig) -> Self {
        OAuthClient {
            config: config.clone(),
            client: Client::new(),
        }
    }

    /// Builds the URL the operator opens to grant access.
    pub fn authorize_url(&self, code_challenge: &str) -> Result<Url> {
        Url::parse_with_params(
            &endpoint(&self.config.oauth_url, "authorize"),
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("code_challenge", code_challenge),
                ("state", self.config.state.as_str()),
            ],
        )
        .map_err(|e| Error::Config(format!("invalid authorization url: {e}")))
    }

    /// Runs the interactive PKCE authorization.
    ///
    /// A fresh challenge is generated, the authorization URL is handed to
    /// `provider`, and the returned code is exchanged for a token. Nothing is
    /// persisted here.
    pub async fn authorize(&self, provider: &mut dyn CodeProvider) -> Result<TokenRecord> {
        let code_challenge = utils::generate_code_challenge();
        let authorize_url = self.authorize_url(&code_challenge)?;

        let code = provider.authorization_code(&authorize_url)?;
        let token = self.exchange_code(&code, &code_challenge).await?;

        success!("Successfully generated Access Token!");
        Ok(token)
    }

    /// Exchanges an authorization code for a token.
    ///
    /// With the plain method the verifier is the challenge itself.
    pub async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<TokenRecord> {
        self.request_token(&[
            ("client_id", self.config.client_id.as_str()),
            ("code", code),
            ("code_verifier", code_verifier),
            ("grant_type", "authorization_code"),
        ])
        .await
    }

    /// Exchanges a refresh token for a new token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenRecord> {
        let token = self
            .request_token(&[
                ("client_id", self.config.client_id.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        success!("Successfully refreshed Access Token!");
        Ok(token)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenRecord> {
        let response = self
            .client
            .post(endpoint(&self.config.oauth_url, "token"))
            .form(form)
            .send()
            .await?;

        let token: TokenRecord = decode_response(response).await?;
        if token.access_token.is_empty() {
            return Err(Error::Decode("token response has an empty access_token".to_string()));
        }

        Ok(token)
    }
}
