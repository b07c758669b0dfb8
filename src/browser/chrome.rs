//! Chromium-backed page driver
//!
//! A [`BrowserSession`] owns one Chromium process for the whole run. Pages are
//! driven through small JavaScript snippets evaluated in the tab; selectors
//! are embedded as JSON string literals so quoting inside them is safe.

use super::{DriverError, DriverResult, Locator, PageDriver};
use crate::config::CrawlerConfig;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A running browser and the task pumping its protocol events
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launches Chromium with the window settings from the crawler config
    pub async fn launch(config: &CrawlerConfig) -> DriverResult<Self> {
        let (width, height) = config.window_size;
        let mut builder = BrowserConfig::builder()
            .window_size(width, height)
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--lang=zh-TW");

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder.build().map_err(DriverError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        info!(headless = config.headless, "Browser launched");
        Ok(Self { browser, handler })
    }

    /// Opens a blank tab
    pub async fn new_page(&self) -> DriverResult<ChromePage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| DriverError::Protocol(e.to_string()))?;
        Ok(ChromePage { page })
    }

    /// Closes the browser and waits for the event task to finish
    pub async fn close(mut self) -> DriverResult<()> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Protocol(e.to_string()));

        if let Err(e) = self.handler.await {
            warn!("Browser handler task ended abnormally: {}", e);
        }

        info!("Browser closed");
        closed
    }
}

/// One Chromium tab
pub struct ChromePage {
    page: Page,
}

impl ChromePage {
    async fn eval<T: DeserializeOwned>(&self, script: &str) -> DriverResult<T> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?
            .into_value::<T>()
            .map_err(|e| DriverError::Script(e.to_string()))
    }
}

fn js_string(value: &str) -> DriverResult<String> {
    serde_json::to_string(value).map_err(|e| DriverError::Script(e.to_string()))
}

/// JavaScript expression evaluating to the first element the locator matches
fn element_expr(locator: &Locator) -> DriverResult<String> {
    Ok(match locator {
        Locator::Css(selector) => format!("document.querySelector({})", js_string(selector)?),
        Locator::XPath(expression) => format!(
            "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
            js_string(expression)?
        ),
    })
}

fn presence_script(locator: &Locator, visible: bool) -> DriverResult<String> {
    Ok(format!(
        r#"(() => {{
            const el = {};
            if (!el) return false;
            if (!{}) return true;
            const style = window.getComputedStyle(el);
            const rect = el.getBoundingClientRect();
            return style.visibility !== 'hidden' && !!(rect.top || rect.bottom || rect.width || rect.height);
        }})()"#,
        element_expr(locator)?,
        visible
    ))
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn goto(&mut self, url: &str) -> DriverResult<()> {
        self.page
            .goto(url)
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Navigation(e.to_string()))
    }

    async fn current_url(&mut self) -> DriverResult<String> {
        self.page
            .url()
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| DriverError::Protocol(e.to_string()))
    }

    async fn is_present(&mut self, locator: &Locator, visible: bool) -> DriverResult<bool> {
        self.eval(&presence_script(locator, visible)?).await
    }

    async fn click(&mut self, locator: &Locator) -> DriverResult<()> {
        let script = format!(
            "(() => {{ const el = {}; if (!el) return false; el.click(); return true; }})()",
            element_expr(locator)?
        );
        if self.eval::<bool>(&script).await? {
            Ok(())
        } else {
            Err(DriverError::ElementNotFound(locator.to_string()))
        }
    }

    async fn content(&mut self) -> DriverResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| DriverError::Protocol(e.to_string()))
    }

    async fn title(&mut self) -> DriverResult<String> {
        self.page
            .get_title()
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| DriverError::Protocol(e.to_string()))
    }

    async fn scroll_height(&mut self, css: &str) -> DriverResult<Option<f64>> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); return el ? el.scrollHeight : -1; }})()",
            js_string(css)?
        );
        // Missing element comes back as -1; a null result has no value to decode
        let height: f64 = self.eval(&script).await?;
        Ok((height >= 0.0).then_some(height))
    }

    async fn scroll_to_bottom(&mut self, css: &str) -> DriverResult<()> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; el.scrollTo(0, el.scrollHeight); return true; }})()",
            js_string(css)?
        );
        if self.eval::<bool>(&script).await? {
            Ok(())
        } else {
            Err(DriverError::ElementNotFound(css.to_string()))
        }
    }

    async fn count(&mut self, css: &str) -> DriverResult<usize> {
        let script = format!("document.querySelectorAll({}).length", js_string(css)?);
        self.eval(&script).await
    }
}
