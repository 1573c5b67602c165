//! Typed HTTP client for the ad swap JSON API.

use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::errors::{ApiResponse, ErrorBody};
use crate::models::product::{CreateProduct, Product, UpdateProduct};
use crate::models::stats::Stats;
use crate::models::swap::{ConfirmSwap, CreateSwap, Swap, SwapWithProduct};
use crate::routes::API_PREFIX;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(e) => e.status(),
            ClientError::Api { status, .. } => Some(*status),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdSwapClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl AdSwapClient {
    /// Client for the server at `base_url` (scheme, host and port, no path).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    /// Attach the auth provider's access token to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub async fn feed(&self) -> Result<Vec<Product>, ClientError> {
        self.data(Method::GET, "/products/feed", None::<&()>).await
    }

    pub async fn my_products(&self) -> Result<Vec<Product>, ClientError> {
        self.data(Method::GET, "/products/mine", None::<&()>).await
    }

    pub async fn create_product(&self, input: &CreateProduct) -> Result<Product, ClientError> {
        self.data(Method::POST, "/products/mine", Some(input)).await
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        changes: &UpdateProduct,
    ) -> Result<Product, ClientError> {
        self.data(Method::PUT, &format!("/products/{id}"), Some(changes))
            .await
    }

    pub async fn swaps(&self) -> Result<Vec<SwapWithProduct>, ClientError> {
        self.data(Method::GET, "/swaps", None::<&()>).await
    }

    pub async fn request_swap(&self, product_id: Uuid) -> Result<Swap, ClientError> {
        let body = CreateSwap {
            product_id: Some(product_id.to_string()),
        };
        self.data(Method::POST, "/swaps", Some(&body)).await
    }

    pub async fn confirm_swap(&self, swap_id: Uuid) -> Result<Swap, ClientError> {
        let body = ConfirmSwap {
            swap_id: Some(swap_id.to_string()),
        };
        self.data(Method::POST, "/swaps/confirm", Some(&body)).await
    }

    /// Stats are served bare, outside the `data` envelope.
    pub async fn stats(&self) -> Result<Stats, ClientError> {
        self.send(Method::GET, "/stats", None::<&()>).await
    }

    async fn data<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let envelope: ApiResponse<T> = self.send(method, path, body).await?;
        Ok(envelope.data)
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{API_PREFIX}{path}", self.base_url);
        let mut request = self.http.request(method, url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
            };
            return Err(ClientError::Api { status, message });
        }

        Ok(response.json::<T>().await?)
    }
}
