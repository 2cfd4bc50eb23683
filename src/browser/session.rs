use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::cdp::browser_protocol::emulation::{SetDeviceMetricsOverrideParams, SetUserAgentOverrideParams};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::browser::stealth::{generate_stealth_script, launch_args, BrowserFingerprint};
use crate::browser::wait::{at_least, stable_for, stable_polls, wait_for_count, WaitConfig, WaitOutcome};
use crate::config::{BrowserConfig, TimingConfig};
use crate::error::{Result, ScrapingError};

pub type SessionId = Uuid;

/// Owns a session's profile directory and deletes it on drop.
struct ProfileDir(PathBuf);

impl ProfileDir {
    fn create(path: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&path)
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to create user data dir: {}", e)))?;
        Ok(Self(path))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ProfileDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.0) {
            debug!("Could not remove user data dir {:?}: {}", self.0, e);
        }
    }
}

/// One Chromium process with its own profile directory, used for a single scrape.
pub struct BrowserSession {
    pub id: SessionId,
    browser: Browser,
    handler_task: JoinHandle<()>,
    fingerprint: BrowserFingerprint,
    // dropped after the browser
    profile: ProfileDir,
}

impl BrowserSession {
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let id = Uuid::new_v4();
        let fingerprint = BrowserFingerprint::from_config(config);

        // unique user data dir keeps sessions isolated from each other
        let user_data_dir = std::env::temp_dir().join(format!("booking-scraper-{}-{}", std::process::id(), id));

        let mut builder = ChromeConfig::builder()
            .no_sandbox()
            .user_data_dir(&user_data_dir)
            .window_size(fingerprint.viewport.width, fingerprint.viewport.height)
            .viewport(Viewport {
                width: fingerprint.viewport.width,
                height: fingerprint.viewport.height,
                ..Viewport::default()
            })
            .args(launch_args(config));

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to create browser config: {}", e)))?;
        let profile = ProfileDir::create(user_data_dir)?;
        debug!("Session {} uses profile dir {:?}", id, profile.path());

        info!("Launching browser for session {}", id);
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScrapingError::BrowserError(format!("Browser initialization failed: {}", e)))?;

        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if let Err(e) = h {
                    // filter out common websocket deserialization errors
                    let error_msg = e.to_string();
                    if error_msg.contains("data did not match any variant") || error_msg.contains("untagged enum Message") {
                        debug!("Ignoring WebSocket deserialization error: {}", e);
                    } else {
                        warn!("Browser handler error: {}", e);
                    }
                }
            }
            debug!("Browser handler task ended");
        });

        info!("Browser launched successfully for session {}", id);
        Ok(Self {
            id,
            browser,
            handler_task,
            fingerprint,
            profile,
        })
    }

    /// Blank page with the fingerprint and stealth script applied.
    pub async fn new_page(&self) -> Result<Page> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to create new page: {}", e)))?;

        let device_metrics = SetDeviceMetricsOverrideParams::builder()
            .width(self.fingerprint.viewport.width as i64)
            .height(self.fingerprint.viewport.height as i64)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to build device metrics: {}", e)))?;

        page.execute(device_metrics)
            .await
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to set viewport: {}", e)))?;

        let user_agent_params = SetUserAgentOverrideParams::builder()
            .user_agent(&self.fingerprint.user_agent)
            .accept_language(self.fingerprint.accept_language())
            .build()
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to build user agent params: {}", e)))?;

        page.execute(user_agent_params)
            .await
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to set user agent: {}", e)))?;

        let script = generate_stealth_script(&self.fingerprint);
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(script))
            .await
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to inject stealth script: {}", e)))?;

        debug!("Prepared page for session {}", self.id);
        Ok(page)
    }

    /// Loads `url`, waits for `card_selector` to render, scrolls, and returns the final markup.
    pub async fn fetch_rendered(&self, url: &str, card_selector: &str, timing: &TimingConfig) -> Result<String> {
        let page = self.new_page().await?;

        info!("Navigating to search URL: {}", url);
        page.goto(url)
            .await
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to navigate to {}: {}", url, e)))?;

        let initial = wait_for_count(WaitConfig::initial_settle(timing), || count_elements(&page, card_selector), at_least(1)).await;
        if let WaitOutcome::TimedOut { last_count, .. } = initial {
            debug!("No cards after initial settle for session {} (count {})", self.id, last_count);
        }

        if let Err(e) = page.evaluate("window.scrollTo(0, document.body.scrollHeight)").await {
            warn!("Failed to scroll page for session {}: {}", self.id, e);
        }

        let settled = wait_for_count(
            WaitConfig::scroll_settle(timing),
            || count_elements(&page, card_selector),
            stable_for(stable_polls(timing)),
        )
        .await;
        debug!("Page settled for session {}: {:?}", self.id, settled);

        let html = page
            .content()
            .await
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to get page content: {}", e)))?;

        Ok(html)
    }

    /// Closes the browser; the profile directory goes when `self` drops.
    pub async fn close(mut self) -> Result<()> {
        let result: Result<()> = match self.browser.close().await {
            Ok(_) => {
                let _ = self.browser.wait().await;
                Ok(())
            }
            Err(e) => Err(ScrapingError::BrowserError(format!("Failed to close browser session: {}", e)).into()),
        };

        info!("Closed browser session {}", self.id);
        result
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

async fn count_elements(page: &Page, selector: &str) -> Result<usize> {
    let script = format!("document.querySelectorAll({}).length", serde_json::to_string(selector)?);
    let count = page
        .evaluate(script.as_str())
        .await
        .map_err(|e| ScrapingError::BrowserError(format!("Failed to count elements: {}", e)))?
        .into_value::<usize>()?;
    Ok(count)
}

/// Launches a session, renders one page, and closes the session whatever the outcome.
pub async fn render_in_session(config: &BrowserConfig, url: &str, card_selector: &str, timing: &TimingConfig) -> Result<String> {
    let session = BrowserSession::launch(config).await?;
    let result = session.fetch_rendered(url, card_selector, timing).await;

    if let Err(e) = session.close().await {
        error!("{}", e);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_profile_dir_removed_on_drop() {
        let root = tempdir().unwrap();
        let path = root.path().join("profile");

        let profile = ProfileDir::create(path.clone()).unwrap();
        std::fs::write(profile.path().join("Local State"), "{}").unwrap();
        assert!(path.exists());

        drop(profile);
        assert!(!path.exists());
    }

    #[test]
    fn test_profile_dir_removed_when_future_is_dropped() {
        let root = tempdir().unwrap();
        let path = root.path().join("profile");

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let held = path.clone();
        let render = async move {
            let _profile = ProfileDir::create(held).unwrap();
            std::future::pending::<()>().await;
        };

        // poll once so the directory exists, then abandon the future
        let mut render = Box::pin(render);
        runtime.block_on(async {
            let _ = tokio::time::timeout(std::time::Duration::from_millis(10), &mut render).await;
        });
        assert!(path.exists());

        drop(render);
        assert!(!path.exists());
    }
}
