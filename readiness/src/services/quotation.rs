//! HTTP shipping quotation status probe

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::config::QuotationEndpoint;
use crate::error::{ReadinessError, ReadinessResult};
use crate::traits::QuotationProbe;

/// Asks the storefront whether a shipping quotation exists for the session.
/// Only status 200 counts as a quotation; the body is never read.
pub struct HttpQuotationProbe {
    client: Client,
    status_url: Url,
    session_cookie: Option<String>,
}

impl HttpQuotationProbe {
    pub fn new(endpoint: &QuotationEndpoint) -> ReadinessResult<Self> {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: &QuotationEndpoint) -> ReadinessResult<Self> {
        Ok(Self {
            client,
            status_url: endpoint.status_url()?,
            session_cookie: endpoint.session_cookie.clone(),
        })
    }

    pub fn status_url(&self) -> &Url {
        &self.status_url
    }
}

#[async_trait]
impl QuotationProbe for HttpQuotationProbe {
    async fn quotation_exists(&self) -> ReadinessResult<bool> {
        let mut request = self.client.get(self.status_url.clone());
        if let Some(cookie) = &self.session_cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await.map_err(|err| ReadinessError::QuotationProbe {
            message: err.to_string(),
        })?;

        let status = response.status();
        debug!(url = %self.status_url, %status, "Quotation status response");
        Ok(status == StatusCode::OK)
    }
}
