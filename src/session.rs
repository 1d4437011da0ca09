use anyhow::{Context, Result};
use fantoccini::{elements::Element, Client, ClientBuilder, Locator};
use serde_json::json;
use tracing::{debug, info, warn};

use std::time::Duration;

/// Desktop user agent presented to the target site
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserKind {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserKind::Firefox),
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl BrowserKind {
    /// Get the WebDriver URL for this browser type
    pub fn webdriver_url(&self) -> &'static str {
        match self {
            BrowserKind::Firefox => "http://localhost:4444",
            BrowserKind::Chrome => "http://localhost:9515",
        }
    }
}

/// The one live automation session, exclusively owned by a run.
///
/// Thin wrapper over a fantoccini [`Client`] exposing only what the outreach
/// flow needs: navigation, element lookup, fill/click, script execution, and
/// best-effort diagnostic screenshots.
pub struct Session {
    client: Client,
    slow_motion: Duration,
}

impl Session {
    /// Connect to the WebDriver endpoint and start a browser session.
    ///
    /// `headless` is normally true; debug mode runs visible so an operator
    /// can watch the automation. `slow_motion` is slept before each
    /// navigation, fill, and click (zero outside debug mode).
    pub async fn launch(kind: BrowserKind, headless: bool, slow_motion: Duration) -> Result<Self> {
        info!("Connecting to {:?} WebDriver", kind);

        let webdriver_url = kind.webdriver_url();
        if !Self::is_webdriver_running(webdriver_url).await {
            let driver_name = match kind {
                BrowserKind::Firefox => "geckodriver",
                BrowserKind::Chrome => "chromedriver",
            };

            anyhow::bail!(
                "Cannot connect to {} WebDriver at {}.\n\
                Please ensure {} is running:\n\
                  For Firefox: geckodriver --port 4444\n\
                  For Chrome: chromedriver --port 9515",
                driver_name,
                webdriver_url,
                driver_name
            );
        }

        let mut caps = serde_json::Map::new();

        match kind {
            BrowserKind::Firefox => {
                let mut firefox_opts = serde_json::Map::new();
                let mut args = Vec::new();

                if headless {
                    args.push("--headless".to_string());
                }

                firefox_opts.insert("args".to_string(), json!(args));
                caps.insert("moz:firefoxOptions".to_string(), json!(firefox_opts));
            }
            BrowserKind::Chrome => {
                let mut chrome_opts = serde_json::Map::new();
                let mut args = vec!["--no-sandbox".to_string()];

                if headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }

                args.push(format!("--user-agent={}", USER_AGENT));

                // Chrome is strict about profile directory reuse
                let profile_dir = tempfile::Builder::new()
                    .prefix("outreach-chrome-")
                    .tempdir()?;
                #[allow(deprecated)]
                let profile_path = profile_dir.into_path();
                args.push(format!("--user-data-dir={}", profile_path.display()));

                chrome_opts.insert("args".to_string(), json!(args));
                caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
            }
        }

        debug!("Connecting to WebDriver at {}", webdriver_url);

        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(webdriver_url)
            .await
            .context("Failed to connect to WebDriver")?;

        Ok(Session {
            client,
            slow_motion,
        })
    }

    async fn is_webdriver_running(url: &str) -> bool {
        let status_url = format!("{}/status", url);

        match reqwest::get(&status_url).await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Debug-mode pacing, applied before each page-mutating action
    async fn pace(&self) {
        if !self.slow_motion.is_zero() {
            tokio::time::sleep(self.slow_motion).await;
        }
    }

    /// Navigate and wait for the document to be ready
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.pace().await;
        info!("Navigating to {}", url);

        self.client.goto(url).await?;

        // Wait for the page to be ready to avoid stale element references
        let wait_script = "return document.readyState === 'complete';";
        for _ in 0..20 {
            // Max 2 seconds
            match self.client.execute(wait_script, vec![]).await {
                Ok(val) if val.as_bool().unwrap_or(false) => break,
                _ => tokio::time::sleep(Duration::from_millis(100)).await,
            }
        }

        Ok(())
    }

    /// Get the current URL, used for challenge-redirect detection
    pub async fn current_url(&self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    /// Find all elements matching a selector (may be empty)
    pub async fn find_all(&self, selector: &str) -> Result<Vec<Element>> {
        self.client
            .find_all(Locator::Css(selector))
            .await
            .context(format!("Failed to query selector: {}", selector))
    }

    /// Poll for an element until it appears.
    ///
    /// Loops forever on absence; callers bound it with a timeout, which the
    /// selector probe always does.
    pub async fn wait_for(&self, selector: &str) -> Result<Element> {
        loop {
            match self.client.find(Locator::Css(selector)).await {
                Ok(element) => return Ok(element),
                Err(_) => tokio::time::sleep(Duration::from_millis(250)).await,
            }
        }
    }

    /// Clear a field and type text into it
    pub async fn fill(&self, element: &Element, text: &str) -> Result<()> {
        self.pace().await;
        // contenteditable surfaces reject clear(); typing still works
        if let Err(e) = element.clear().await {
            debug!("Could not clear field before typing: {}", e);
        }
        element.send_keys(text).await?;
        Ok(())
    }

    /// Click an element
    pub async fn click(&self, element: &Element) -> Result<()> {
        self.pace().await;
        element.click().await?;
        Ok(())
    }

    /// Execute JavaScript in the page
    pub async fn execute(&self, script: &str) -> Result<serde_json::Value> {
        self.client
            .execute(script, vec![])
            .await
            .context("Failed to execute script")
    }

    /// Scroll the viewport vertically by a pixel amount
    pub async fn scroll_by(&self, pixels: i64) -> Result<()> {
        self.execute(&format!("window.scrollBy(0, {});", pixels))
            .await?;
        Ok(())
    }

    /// Current document height in pixels
    pub async fn page_height(&self) -> Result<f64> {
        let value = self.execute("return document.body.scrollHeight;").await?;
        value
            .as_f64()
            .context("scrollHeight did not evaluate to a number")
    }

    /// Capture a diagnostic screenshot named for the failure context.
    ///
    /// Best-effort: a screenshot that cannot be taken or written is logged
    /// and swallowed, never escalated.
    pub async fn screenshot(&self, label: &str) {
        let filename = format!(
            "{}-{}.png",
            label,
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );

        match self.client.screenshot().await {
            Ok(bytes) => match tokio::fs::write(&filename, &bytes).await {
                Ok(()) => info!("Screenshot saved: {}", filename),
                Err(e) => warn!("Failed to write screenshot {}: {}", filename, e),
            },
            Err(e) => warn!("Failed to take screenshot {}: {}", filename, e),
        }
    }

    /// End the WebDriver session
    pub async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .context("Failed to close browser session")
    }
}
