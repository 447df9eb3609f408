use anyhow::Context;
use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{OAuthConfig, ProviderCredentials};

const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const APPLE_TOKEN_URL: &str = "https://appleid.apple.com/auth/token";
const APPLE_KEYS_URL: &str = "https://appleid.apple.com/auth/keys";
const APPLE_ISSUER: &str = "https://appleid.apple.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    Apple,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Apple => "apple",
        }
    }

    /// Display name used when the provider does not share one.
    pub fn fallback_name(&self) -> &'static str {
        match self {
            Provider::Google => "Google User",
            Provider::Apple => "Apple User",
        }
    }
}

/// Profile data released by a provider after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProfile {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn exchange_code(&self, provider: Provider, code: &str) -> anyhow::Result<OAuthProfile>;

    fn is_enabled(&self, _provider: Provider) -> bool {
        true
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    email: String,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct AppleIdClaims {
    email: Option<String>,
}

/// Talks to the real provider endpoints over HTTPS.
pub struct HttpIdentityProvider {
    client: Client,
    config: OAuthConfig,
}

impl HttpIdentityProvider {
    pub fn new(config: OAuthConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("build http client")?;
        Ok(Self { client, config })
    }

    fn credentials(&self, provider: Provider) -> anyhow::Result<&ProviderCredentials> {
        match provider {
            Provider::Google => self.config.google.as_ref(),
            Provider::Apple => self.config.apple.as_ref(),
        }
        .ok_or_else(|| anyhow::anyhow!("{} oauth is not configured", provider.as_str()))
    }

    async fn token(
        &self,
        url: &str,
        creds: &ProviderCredentials,
        code: &str,
    ) -> anyhow::Result<TokenResponse> {
        let form = [
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", creds.redirect_uri.as_str()),
        ];
        self.client
            .post(url)
            .form(&form)
            .send()
            .await
            .context("token request")?
            .error_for_status()
            .context("token endpoint status")?
            .json::<TokenResponse>()
            .await
            .context("token response body")
    }

    async fn google(&self, code: &str) -> anyhow::Result<OAuthProfile> {
        let creds = self.credentials(Provider::Google)?;
        let access_token = self
            .token(GOOGLE_TOKEN_URL, creds, code)
            .await?
            .access_token
            .context("no access token received")?;

        let info = self
            .client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .context("userinfo request")?
            .error_for_status()
            .context("userinfo status")?
            .json::<GoogleUserInfo>()
            .await
            .context("userinfo body")?;

        Ok(OAuthProfile {
            email: info.email,
            name: info.name,
            picture: info.picture,
        })
    }

    async fn apple(&self, code: &str) -> anyhow::Result<OAuthProfile> {
        let creds = self.credentials(Provider::Apple)?;
        let id_token = self
            .token(APPLE_TOKEN_URL, creds, code)
            .await?
            .id_token
            .context("no id token received")?;

        let header = decode_header(&id_token).context("decode id token header")?;
        let kid = header.kid.context("no kid in id token header")?;

        let jwks: Jwks = self
            .client
            .get(APPLE_KEYS_URL)
            .send()
            .await
            .context("jwks request")?
            .json()
            .await
            .context("jwks body")?;
        debug!(keys = jwks.keys.len(), "fetched apple jwks");

        let jwk = jwks
            .keys
            .iter()
            .find(|k| k.kid == kid)
            .context("no matching key found")?;
        anyhow::ensure!(jwk.kty == "RSA", "unsupported key type {}", jwk.kty);

        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[APPLE_ISSUER]);
        validation.set_audience(std::slice::from_ref(&creds.client_id));
        let claims = decode::<AppleIdClaims>(&id_token, &key, &validation)
            .context("verify apple id token")?
            .claims;

        Ok(OAuthProfile {
            email: claims.email.context("apple id token carries no email")?,
            name: None,
            picture: None,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn exchange_code(&self, provider: Provider, code: &str) -> anyhow::Result<OAuthProfile> {
        let profile = match provider {
            Provider::Google => self.google(code).await?,
            Provider::Apple => self.apple(code).await?,
        };
        info!(provider = provider.as_str(), email = %profile.email, "oauth code exchanged");
        Ok(profile)
    }

    fn is_enabled(&self, provider: Provider) -> bool {
        self.credentials(provider).is_ok()
    }
}
