use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Response, Url, header};
use tokio::time::{Duration, timeout as with_timeout};

use crate::config::Config;
use crate::core::error::Result;
use crate::core::types::{Outcome, ResourceEntry, ValidationResult};
use crate::reporting::logging;

/// Checks whether a single stream is reachable.
///
/// Implementations must not mutate shared state so that many calls can run
/// concurrently.
#[async_trait]
pub trait ValidateResource: Send + Sync {
    /// Probe `entry`, following at most `max_redirects` redirects.
    ///
    /// `timeout` applies to each probe attempt, not to the whole chain.
    async fn validate(
        &self,
        entry: &ResourceEntry,
        timeout: Duration,
        max_redirects: usize,
    ) -> ValidationResult;
}

/// HTTP request used to probe a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProbeMethod {
    /// Header-only request
    #[default]
    Head,
    /// GET request whose body is never read
    Get,
}

/// Validator probing streams over HTTP(S) with redirects followed by hand.
#[derive(Debug, Clone)]
pub struct HttpValidator {
    client: reqwest::Client,
    method: ProbeMethod,
    allowed_status_codes: Vec<u16>,
    allowlist: Vec<String>,
}

impl HttpValidator {
    /// Validator with a default client and HEAD probes
    pub fn new() -> Result<Self> {
        let client = Self::client_builder(None).build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            method: ProbeMethod::default(),
            allowed_status_codes: Vec::new(),
            allowlist: Vec::new(),
        }
    }

    /// Build a validator from the network and filtering settings of `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client_builder = Self::client_builder(config.user_agent.as_deref());

        if config.skip_ssl_verification.unwrap_or(false) {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = config.proxy {
            match reqwest::Proxy::all(proxy_url) {
                Ok(proxy) => client_builder = client_builder.proxy(proxy),
                Err(e) => logging::log_warning(&format!("Ignoring invalid proxy '{proxy_url}': {e}")),
            }
        }

        let method = if config.uses_get_probes() {
            ProbeMethod::Get
        } else {
            ProbeMethod::Head
        };

        Ok(Self::with_client(client_builder.build()?)
            .with_method(method)
            .with_allowed_status_codes(config.allowed_status_codes.clone().unwrap_or_default())
            .with_allowlist(config.allowlist.clone().unwrap_or_default()))
    }

    pub fn with_method(mut self, method: ProbeMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_allowed_status_codes(mut self, codes: Vec<u16>) -> Self {
        self.allowed_status_codes = codes;
        self
    }

    pub fn with_allowlist(mut self, allowlist: Vec<String>) -> Self {
        self.allowlist = allowlist;
        self
    }

    pub fn method(&self) -> ProbeMethod {
        self.method
    }

    fn client_builder(user_agent: Option<&str>) -> reqwest::ClientBuilder {
        let user_agent = user_agent.unwrap_or(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        reqwest::Client::builder()
            .redirect(Policy::none())
            .user_agent(user_agent)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
    }

    fn is_allowlisted(&self, uri: &str) -> bool {
        self.allowlist
            .iter()
            .any(|allowed| !allowed.is_empty() && uri.contains(allowed.as_str()))
    }

    fn is_accepted(&self, status: reqwest::StatusCode) -> bool {
        status.is_success() || self.allowed_status_codes.contains(&status.as_u16())
    }

    /// Follow the redirect chain of `uri` and decide its outcome.
    ///
    /// The loop stops on the first non-redirect response. Once `max_redirects`
    /// hops were followed, the last target is still probed and its own status
    /// decides the outcome.
    async fn resolve(&self, uri: &str, timeout: Duration, max_redirects: usize) -> Outcome {
        if self.is_allowlisted(uri) {
            return Outcome::Reachable(uri.to_string());
        }

        let mut current = match Url::parse(uri) {
            Ok(url) => url,
            Err(e) => return Outcome::TransportError(format!("invalid URI: {e}")),
        };
        let mut current_uri = uri.to_string();
        let mut hops = 0;

        loop {
            let response = match self.probe(&current, timeout).await {
                Ok(response) => response,
                Err(outcome) => return outcome,
            };
            let status = response.status();

            if self.is_accepted(status) {
                return Outcome::Reachable(current_uri);
            }

            if status.is_redirection()
                && hops < max_redirects
                && let Some(next) = redirect_target(&current, &response)
            {
                hops += 1;
                current_uri = next.to_string();
                current = next;
                continue;
            }

            return Outcome::Unreachable(status.as_u16());
        }
    }

    /// A single request; the response body is never read.
    async fn probe(&self, url: &Url, timeout: Duration) -> std::result::Result<Response, Outcome> {
        let request = match self.method {
            ProbeMethod::Head => self.client.head(url.clone()),
            ProbeMethod::Get => self.client.get(url.clone()),
        };

        match with_timeout(timeout, request.timeout(timeout).send()).await {
            Err(_) => Err(Outcome::TimedOut),
            Ok(Err(err)) if err.is_timeout() => Err(Outcome::TimedOut),
            Ok(Err(err)) => Err(Outcome::TransportError(describe_error(&err))),
            Ok(Ok(response)) => Ok(response),
        }
    }
}

#[async_trait]
impl ValidateResource for HttpValidator {
    async fn validate(
        &self,
        entry: &ResourceEntry,
        timeout: Duration,
        max_redirects: usize,
    ) -> ValidationResult {
        let outcome = self
            .resolve(&entry.resource_uri, timeout, max_redirects)
            .await;
        ValidationResult::new(entry.clone(), outcome)
    }
}

/// Absolute target of a redirect response, resolving relative locations
fn redirect_target(current: &Url, response: &Response) -> Option<Url> {
    let location = response.headers().get(header::LOCATION)?.to_str().ok()?;
    current.join(location.trim()).ok()
}

fn describe_error(err: &reqwest::Error) -> String {
    std::error::Error::source(err)
        .map(|e| e.to_string())
        .unwrap_or_else(|| err.to_string())
}
