//! HTTP plumbing for the hosted backend
//!
//! Auth endpoints live under `/auth/v1`, table endpoints under
//! `/rest/v1` (PostgREST conventions). Every request carries the
//! publishable anon key; authenticated requests additionally carry the
//! session's bearer token.

use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use shared::Identity;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::table::Query;

/// Token grant response from `/auth/v1/token`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: Identity,
}

/// HTTP client for the backend REST surface
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        })
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        // Fall back to the anon key as bearer; RLS decides what it may see.
        let token = bearer.unwrap_or(&self.anon_key);
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
    }

    async fn expect_success(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Auth(text),
            StatusCode::BAD_REQUEST
                if text.contains("invalid_grant") || text.contains("Invalid login") =>
            {
                ClientError::InvalidCredentials
            }
            _ => ClientError::Remote(text),
        })
    }

    // ========== Auth API ==========

    /// Password grant sign-in
    pub async fn token_password_grant(
        &self,
        email: &str,
        password: &str,
    ) -> ClientResult<TokenResponse> {
        #[derive(serde::Serialize)]
        struct Grant<'a> {
            email: &'a str,
            password: &'a str,
        }

        let response = self
            .request(Method::POST, "/auth/v1/token?grant_type=password", None)
            .json(&Grant { email, password })
            .send()
            .await?;

        Ok(Self::expect_success(response).await?.json().await?)
    }

    /// Create an account. The response carries a session only when
    /// e-mail confirmation is disabled on the backend.
    pub async fn sign_up(&self, email: &str, password: &str) -> ClientResult<Option<Identity>> {
        #[derive(serde::Serialize)]
        struct SignUp<'a> {
            email: &'a str,
            password: &'a str,
        }

        let response = self
            .request(Method::POST, "/auth/v1/signup", None)
            .json(&SignUp { email, password })
            .send()
            .await?;

        let body: Value = Self::expect_success(response).await?.json().await?;
        // Either a bare user object or `{ "user": ..., "session": ... }`.
        let user = if body.get("id").is_some() {
            Some(body)
        } else {
            body.get("user").filter(|u| !u.is_null()).cloned()
        };
        match user {
            Some(user) => Ok(Some(serde_json::from_value(user)?)),
            None => Ok(None),
        }
    }

    /// Validate a bearer token and return its user
    pub async fn auth_user(&self, bearer: &str) -> ClientResult<Identity> {
        let response = self
            .request(Method::GET, "/auth/v1/user", Some(bearer))
            .send()
            .await?;
        Ok(Self::expect_success(response).await?.json().await?)
    }

    /// Revoke the session on the backend
    pub async fn logout(&self, bearer: &str) -> ClientResult<()> {
        let response = self
            .request(Method::POST, "/auth/v1/logout", Some(bearer))
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    // ========== Table API ==========

    /// Filtered select
    pub async fn get_rows(
        &self,
        table: &str,
        query: &Query,
        bearer: Option<&str>,
    ) -> ClientResult<Vec<Value>> {
        let response = self
            .request(Method::GET, &format!("/rest/v1/{table}"), bearer)
            .query(&query.to_params())
            .send()
            .await?;
        Ok(Self::expect_success(response).await?.json().await?)
    }

    /// Exact row count via a HEAD request (`Content-Range: 0-n/total`)
    pub async fn head_count(
        &self,
        table: &str,
        query: &Query,
        bearer: Option<&str>,
    ) -> ClientResult<u64> {
        let response = self
            .request(Method::HEAD, &format!("/rest/v1/{table}"), bearer)
            .query(&query.to_params())
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = Self::expect_success(response).await?;

        let range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ClientError::Remote("missing Content-Range header".into()))?;
        range
            .rsplit('/')
            .next()
            .and_then(|total| total.parse().ok())
            .ok_or_else(|| ClientError::Remote(format!("unparseable Content-Range: {range}")))
    }

    /// Insert rows
    pub async fn insert_rows(
        &self,
        table: &str,
        rows: &[Value],
        bearer: Option<&str>,
    ) -> ClientResult<()> {
        let response = self
            .request(Method::POST, &format!("/rest/v1/{table}"), bearer)
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// Patch rows matching the query's filters
    pub async fn patch_rows(
        &self,
        table: &str,
        patch: &Value,
        query: &Query,
        bearer: Option<&str>,
    ) -> ClientResult<()> {
        let response = self
            .request(Method::PATCH, &format!("/rest/v1/{table}"), bearer)
            .query(&query.to_params())
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// Insert-or-merge rows on the given conflict columns
    pub async fn upsert_rows(
        &self,
        table: &str,
        rows: &[Value],
        on_conflict: &[&str],
        bearer: Option<&str>,
    ) -> ClientResult<()> {
        let response = self
            .request(Method::POST, &format!("/rest/v1/{table}"), bearer)
            .query(&[("on_conflict", on_conflict.join(","))])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows)
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }
}
