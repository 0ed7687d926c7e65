use bon::Builder;
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client, Method, Response,
};
use serde::{de::DeserializeOwned, Deserialize};
use std::{sync::Arc, time::Duration};
use tracing::debug;

use crate::{
    domain::errors::{ProviderError, ProviderResult},
    ports::Auth,
};

/// Code reported when the provider could not be reached or answered garbage
pub const NETWORK_ERROR: i32 = -1;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Service hosts of one storage region
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct QiniuEndpoints {
    /// Form upload host
    #[builder(into, default = "https://up.qiniup.com".to_string())]
    pub up: String,
    /// Resource management host
    #[builder(into, default = "https://rs.qiniuapi.com".to_string())]
    pub rs: String,
    /// Listing host
    #[builder(into, default = "https://rsf.qiniuapi.com".to_string())]
    pub rsf: String,
    /// Domain and processing host
    #[builder(into, default = "https://api.qiniuapi.com".to_string())]
    pub api: String,
    /// Bucket catalogue host
    #[builder(into, default = "https://uc.qbox.me".to_string())]
    pub uc: String,
    /// Fetch and mirror host
    #[builder(into, default = "https://iovip.qbox.me".to_string())]
    pub io: String,
}

impl Default for QiniuEndpoints {
    fn default() -> Self {
        Self::builder().build()
    }
}

pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_default()
}

/// `k=v&k=v` with values percent-encoded
pub(crate) fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

pub(crate) fn transport_error(e: reqwest::Error) -> ProviderError {
    ProviderError::new(NETWORK_ERROR, e.to_string())
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Pass 2xx responses through and turn anything else into a [`ProviderError`]
pub(crate) async fn checked(response: Response) -> ProviderResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };
    Err(ProviderError::new(i32::from(status.as_u16()), message))
}

pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> ProviderResult<T> {
    response.json::<T>().await.map_err(|e| {
        ProviderError::new(NETWORK_ERROR, format!("invalid response body: {}", e))
    })
}

/// Sends management requests carrying a `QBox` authorization header
#[derive(Clone)]
pub(crate) struct ManagementClient {
    http: Client,
    auth: Arc<dyn Auth>,
}

impl ManagementClient {
    pub fn new(http: Client, auth: Arc<dyn Auth>) -> Self {
        Self { http, auth }
    }

    async fn send(
        &self,
        method: Method,
        host: &str,
        path_and_query: &str,
        form: Option<String>,
    ) -> ProviderResult<Response> {
        let authorization = self
            .auth
            .authorization(path_and_query, form.as_deref().map(str::as_bytes));
        let url = format!("{}{}", host.trim_end_matches('/'), path_and_query);
        debug!(%method, path = path_and_query, "provider request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(AUTHORIZATION, authorization);
        if method == Method::POST {
            request = request
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(form.unwrap_or_default());
        }

        let response = request.send().await.map_err(transport_error)?;
        checked(response).await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        host: &str,
        path_and_query: &str,
    ) -> ProviderResult<T> {
        decode(self.send(Method::GET, host, path_and_query, None).await?).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        host: &str,
        path_and_query: &str,
        form: Option<String>,
    ) -> ProviderResult<T> {
        decode(self.send(Method::POST, host, path_and_query, form).await?).await
    }

    /// POST whose success body carries nothing of interest
    pub async fn post_empty(&self, host: &str, path_and_query: &str) -> ProviderResult<()> {
        self.send(Method::POST, host, path_and_query, None)
            .await
            .map(|_| ())
    }
}

/// Every service host pointed at one local address
#[cfg(test)]
pub(crate) fn local_endpoints(base_url: &str) -> QiniuEndpoints {
    QiniuEndpoints::builder()
        .up(base_url)
        .rs(base_url)
        .rsf(base_url)
        .api(base_url)
        .uc(base_url)
        .io(base_url)
        .build()
}
