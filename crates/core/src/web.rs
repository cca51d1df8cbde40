// ABOUTME: Blocking HTTP client shared by showing providers.
// ABOUTME: Applies user agent, timeout, and a polite delay after every request.

use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{KinopyError, Result};

/// Default pause after each request, to go easy on cinema websites.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Options for constructing a [`WebClient`].
#[derive(Debug, Clone)]
pub struct WebOptions {
    pub timeout: Duration,
    pub user_agent: String,
    pub request_delay: Duration,
}

impl Default for WebOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("kinopy/{}", env!("CARGO_PKG_VERSION")),
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

/// Thin wrapper over a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct WebClient {
    client: Client,
    request_delay: Duration,
}

impl WebClient {
    pub fn new(opts: WebOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(opts.timeout)
            .user_agent(opts.user_agent)
            .build()
            .map_err(|e| KinopyError::fetch("<client>", e))?;
        Ok(Self {
            client,
            request_delay: opts.request_delay,
        })
    }

    /// GET `url` and return the body as text.
    pub fn get_text(&self, url: &str) -> Result<String> {
        let resp = self.send(url, self.client.get(url))?;
        resp.text().map_err(|e| KinopyError::fetch(url, e))
    }

    /// GET `url` and decode the body as JSON.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_json_with_headers(url, &[])
    }

    /// GET `url` with extra request headers and decode the body as JSON.
    pub fn get_json_with_headers<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<T> {
        let mut req = self.client.get(url);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let resp = self.send(url, req)?;
        resp.json().map_err(|e| KinopyError::fetch(url, e))
    }

    /// POST a urlencoded form and decode the JSON response.
    pub fn post_form_json<F, T>(&self, url: &str, form: &F) -> Result<T>
    where
        F: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(url, self.client.post(url).form(form))?;
        resp.json().map_err(|e| KinopyError::fetch(url, e))
    }

    /// POST a JSON body and decode the JSON response.
    pub fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(url, self.client.post(url).json(body))?;
        resp.json().map_err(|e| KinopyError::fetch(url, e))
    }

    /// HEAD `url`, reporting whether it answered with a success status.
    /// Network failures count as "not ok".
    pub fn head_ok(&self, url: &str) -> bool {
        let result = self.client.head(url).send();
        self.pause();
        match result {
            Ok(resp) => resp.status().is_success(),
            Err(err) => {
                debug!(url, error = %err, "HEAD request failed");
                false
            }
        }
    }

    fn send(&self, url: &str, req: RequestBuilder) -> Result<Response> {
        debug!(url, "sending request");
        let result = req.send();
        self.pause();
        let resp = result.map_err(|e| KinopyError::fetch(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(KinopyError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    fn pause(&self) {
        if !self.request_delay.is_zero() {
            thread::sleep(self.request_delay);
        }
    }
}
