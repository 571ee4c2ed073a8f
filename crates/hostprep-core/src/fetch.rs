use crate::error::{HostprepError, Result};
use std::io::Read;
use std::time::Duration;

/// Network download of release artifacts and datasets.
pub trait Fetch {
    fn get(&mut self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP(S) fetcher. Redirects are followed, so GitHub release
/// asset URLs work directly.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(30))
            .user_agent(concat!("hostprep/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetcher {
    fn get(&mut self, url: &str) -> Result<Vec<u8>> {
        let download_err = |reason: String| HostprepError::Download {
            url: url.to_string(),
            reason,
        };
        tracing::debug!(url, "downloading");
        let response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => download_err(format!("HTTP {code}")),
            other => download_err(other.to_string()),
        })?;
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| download_err(e.to_string()))?;
        Ok(body)
    }
}
