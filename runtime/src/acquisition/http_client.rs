//! Async HTTP client wrapping reqwest.
//!
//! Plain GET with a browser user agent and bounded redirects. Falls back to
//! an HTTP/1.1-only client when a server trips over HTTP/2.

use std::time::Duration;

use crate::error::FetchError;

/// Default desktop Chrome user agent; some sites serve bots a stripped page.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                              AppleWebKit/537.36 (KHTML, like Gecko) \
                              Chrome/131.0.0.0 Safari/537.36";

const MAX_REDIRECTS: usize = 5;

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL after redirects.
    pub final_url: String,
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    /// HTTP/1.1-only fallback client for sites that reject HTTP/2.
    h1_client: reqwest::Client,
}

impl HttpClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Self::builder(timeout, user_agent).build()?;
        let h1_client = Self::builder(timeout, user_agent).http1_only().build()?;
        Ok(Self { client, h1_client })
    }

    fn builder(timeout: Duration, user_agent: &str) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(user_agent)
    }

    /// Perform a single GET. Any status is returned as a response; only
    /// transport failures are errors.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        match Self::get_inner(&self.client, url).await {
            Ok(resp) => Ok(resp),
            Err(e) if is_protocol_error(&e) => {
                tracing::debug!("retrying {url} over HTTP/1.1: {e}");
                Ok(Self::get_inner(&self.h1_client, url).await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_inner(client: &reqwest::Client, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let r = client.get(url).send().await?;
        let status = r.status().as_u16();
        let final_url = r.url().to_string();
        let body = r.text().await?;
        Ok(HttpResponse {
            final_url,
            status,
            body,
        })
    }
}

fn is_protocol_error(e: &reqwest::Error) -> bool {
    let msg = format!("{e:?}");
    msg.contains("http2") || msg.contains("protocol") || msg.contains("connection closed")
}
