//! OAuth installed-application flow against Google's token endpoint.
//!
//! The token file keeps the shape Google's client libraries write
//! (`access_token`, `expires_in`, `created`, `refresh_token`, ...), so an
//! existing `token.json` keeps working.

use std::path::PathBuf;

use chrono::Utc;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::store;

pub const SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/classroom.courses",
    "https://www.googleapis.com/auth/classroom.coursework.students",
    "https://www.googleapis.com/auth/classroom.topics",
];

/// Seconds before the recorded expiry at which a token counts as expired.
const EXPIRY_LEEWAY_SECS: i64 = 30;

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_REDIRECT_URI: &str = "http://localhost";

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ClientSecret {
    fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_REDIRECT_URI)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub expires_in: i64,
    /// Unix seconds at which the token was issued.
    #[serde(default)]
    pub created: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl StoredToken {
    pub fn is_expired(&self, now: i64) -> bool {
        self.created + self.expires_in - EXPIRY_LEEWAY_SECS <= now
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    refresh_token: Option<String>,
    scope: Option<String>,
    token_type: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl TokenResponse {
    /// A refresh response usually omits the refresh token; keep the old one.
    fn into_stored(self, previous_refresh: Option<String>, now: i64) -> Result<StoredToken, AppError> {
        if let Some(error) = self.error {
            let detail = self.error_description.unwrap_or_default();
            return Err(AppError::Auth(format!("{} {}", error, detail).trim().to_string()));
        }
        let access_token = self
            .access_token
            .ok_or_else(|| AppError::Auth("token response has no access_token".to_string()))?;

        Ok(StoredToken {
            access_token,
            expires_in: self.expires_in.unwrap_or(0),
            created: now,
            refresh_token: self.refresh_token.or(previous_refresh),
            scope: self.scope,
            token_type: self.token_type,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStep {
    UseStored(String),
    Refresh(String),
    Consent,
}

/// Decides how to obtain an access token from what is on disk.
pub fn next_step(stored: Option<&StoredToken>, now: i64) -> TokenStep {
    match stored {
        Some(token) if !token.is_expired(now) => TokenStep::UseStored(token.access_token.clone()),
        Some(StoredToken {
            refresh_token: Some(refresh_token),
            ..
        }) => TokenStep::Refresh(refresh_token.clone()),
        _ => TokenStep::Consent,
    }
}

pub struct Authenticator {
    client: Client,
    secret: ClientSecret,
    token_path: PathBuf,
}

impl Authenticator {
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let file: CredentialsFile = store::read_json(&config.credentials_path).await?;
        let secret = file.installed.or(file.web).ok_or_else(|| {
            AppError::Auth(format!(
                "{} has neither an 'installed' nor a 'web' client",
                config.credentials_path.display()
            ))
        })?;

        Ok(Self {
            client: Client::builder().build()?,
            secret,
            token_path: config.token_path.clone(),
        })
    }

    /// Returns a valid access token, refreshing or asking the user for
    /// consent when the stored one has expired.
    pub async fn access_token(&self) -> Result<String, AppError> {
        let stored: Option<StoredToken> = store::read_json_if_exists(&self.token_path).await?;

        let token = match next_step(stored.as_ref(), Utc::now().timestamp()) {
            TokenStep::UseStored(access_token) => return Ok(access_token),
            TokenStep::Refresh(refresh_token) => {
                info!("Access token expired, refreshing");
                self.refresh(refresh_token).await?
            }
            TokenStep::Consent => {
                let code = prompt_for_code(&self.authorization_url()?).await?;
                self.exchange_code(&code).await?
            }
        };

        store::write_json(&self.token_path, &token).await?;
        info!("Saved token to {}", self.token_path.display());
        Ok(token.access_token)
    }

    pub fn authorization_url(&self) -> Result<Url, AppError> {
        let scope = SCOPES.join(" ");
        Url::parse_with_params(
            &self.secret.auth_uri,
            &[
                ("response_type", "code"),
                ("client_id", self.secret.client_id.as_str()),
                ("redirect_uri", self.secret.redirect_uri()),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
                ("prompt", "select_account consent"),
            ],
        )
        .map_err(|e| AppError::Auth(format!("invalid auth_uri: {}", e)))
    }

    async fn refresh(&self, refresh_token: String) -> Result<StoredToken, AppError> {
        let response = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .await?;
        response.into_stored(Some(refresh_token), Utc::now().timestamp())
    }

    async fn exchange_code(&self, code: &str) -> Result<StoredToken, AppError> {
        let response = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.secret.redirect_uri()),
            ])
            .await?;
        response.into_stored(None, Utc::now().timestamp())
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<TokenResponse, AppError> {
        let mut form = vec![
            ("client_id", self.secret.client_id.as_str()),
            ("client_secret", self.secret.client_secret.as_str()),
        ];
        form.extend_from_slice(params);

        // Error responses carry an `error` field in a JSON body; decode both.
        let response = self.client.post(&self.secret.token_uri).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        serde_json::from_str::<TokenResponse>(&body)
            .map_err(|_| AppError::Auth(format!("token endpoint returned {}: {}", status, body)))
    }
}

async fn prompt_for_code(url: &Url) -> Result<String, AppError> {
    let stdin_err = |e: std::io::Error| AppError::Auth(format!("failed to read verification code: {}", e));

    let mut stdout = tokio::io::stdout();
    let prompt = format!(
        "Open the following link in your browser:\n{}\nEnter verification code: ",
        url
    );
    stdout.write_all(prompt.as_bytes()).await.map_err(stdin_err)?;
    stdout.flush().await.map_err(stdin_err)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let code = lines.next_line().await.map_err(stdin_err)?.unwrap_or_default();
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::Auth("no verification code entered".to_string()));
    }
    Ok(code.to_string())
}
