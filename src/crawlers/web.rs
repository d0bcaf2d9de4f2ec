use crate::crawlers::Fetcher;
use crate::error::FetchError;
use crate::utils::calculate_timeout;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;

/// Common local WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // Selenium / geckodriver default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444",
];

const DEFAULT_BASE_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches pages through a browser, so script-rendered content is captured.
///
/// Sessions are opened lazily and kept for reuse, so a pool of N workers
/// holds at most N browser sessions.
pub struct WebDriverFetcher {
    webdriver_url: String,
    sessions: Mutex<Vec<Client>>,
    base_timeout: Duration,
}

impl WebDriverFetcher {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            sessions: Mutex::new(Vec::new()),
            base_timeout: DEFAULT_BASE_TIMEOUT,
        }
    }

    /// Per-page time limit before the URL length adjustment
    pub fn with_base_timeout(mut self, base_timeout: Duration) -> Self {
        self.base_timeout = base_timeout;
        self
    }

    /// Closes every idle session. Call once the crawl has finished.
    pub async fn close(&self) {
        let sessions = std::mem::take(&mut *self.sessions.lock().await);
        ::log::debug!("Closing {} WebDriver sessions", sessions.len());
        for client in sessions {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", e);
            }
        }
    }

    async fn checkout(&self) -> Result<Client, FetchError> {
        if let Some(client) = self.sessions.lock().await.pop() {
            return Ok(client);
        }
        connect_to_webdriver(&self.webdriver_url).await
    }

    async fn checkin(&self, client: Client) {
        self.sessions.lock().await.push(client);
    }

    async fn load(client: &Client, url: &str) -> Result<String, FetchError> {
        let navigation_error = |source: CmdError| FetchError::Navigation {
            url: url.to_string(),
            source,
        };
        client.goto(url).await.map_err(navigation_error)?;
        client.source().await.map_err(navigation_error)
    }
}

impl Fetcher for WebDriverFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send {
        async move {
            let client = self.checkout().await?;
            let limit = calculate_timeout(self.base_timeout, url.len());

            let result = match tokio::time::timeout(limit, Self::load(&client, url)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout {
                    url: url.to_string(),
                    elapsed: limit,
                }),
            };

            let reusable = match &result {
                Ok(_) => true,
                Err(FetchError::Navigation { source, .. }) => !is_session_lost(source),
                // The browser may still be busy with the abandoned navigation
                Err(_) => false,
            };
            if reusable {
                self.checkin(client).await;
            } else {
                ::log::debug!("Discarding WebDriver session after failure on {}", url);
                if let Err(e) = client.close().await {
                    ::log::trace!("Failed to close discarded session: {}", e);
                }
            }

            result
        }
    }
}

fn is_session_lost(error: &CmdError) -> bool {
    error.to_string().contains("Unable to find session")
}

/// Connects to the configured WebDriver, falling back to well-known local ports
async fn connect_to_webdriver(webdriver_url: &str) -> Result<Client, FetchError> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    for url in FALLBACK_WEBDRIVER_URLS
        .iter()
        .filter(|url| **url != webdriver_url)
    {
        ::log::info!("Trying fallback WebDriver URL: {}", url);
        // Fallback failures are not logged
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    Err(FetchError::NoSession(format!(
        "no WebDriver server reachable at {} or any fallback; set WEBDRIVER_URL or --webdriver-url",
        webdriver_url
    )))
}
