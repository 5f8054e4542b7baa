//! Chromium backend over the Chrome `DevTools` Protocol.
//!
//! Elements are resolved by evaluating the selector's JavaScript query, tagging
//! the single match with a unique `data-e2e-ref` attribute, and then addressing
//! it through CDP for real mouse/keyboard input. Tags come from a process-wide
//! counter so concurrent activations on one page never collide.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::element::Element;
use chromiumoxide::page::{Page as ChromePage, ScreenshotParams};
use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::{BrowserConfig, Page};
use crate::locator::Locator;
use crate::result::{FormError, FormResult};

static NEXT_REF: AtomicU64 = AtomicU64::new(1);

/// Browser instance with real CDP connection
#[derive(Debug)]
pub struct Browser {
    config: BrowserConfig,
    inner: Arc<Mutex<CdpBrowser>>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Launch a new browser instance
    ///
    /// # Errors
    ///
    /// Returns error if browser cannot be launched
    pub async fn launch(config: BrowserConfig) -> FormResult<Self> {
        let mut builder = CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|message| FormError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| FormError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            config,
            inner: Arc::new(Mutex::new(browser)),
            handle,
        })
    }

    /// Open a fresh page
    ///
    /// # Errors
    ///
    /// Returns error if page cannot be created
    pub async fn new_page(&self) -> FormResult<CdpPage> {
        let browser = self.inner.lock().await;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| FormError::page(e.to_string()))?;

        Ok(CdpPage {
            inner: Mutex::new(Some(page)),
            url: std::sync::Mutex::new(String::from("about:blank")),
            action_timeout: self.config.action_timeout,
        })
    }

    /// Get the browser configuration
    #[must_use]
    pub const fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Close the browser
    pub async fn close(self) -> FormResult<()> {
        let mut browser = self.inner.lock().await;
        browser
            .close()
            .await
            .map_err(|e| FormError::BrowserLaunch {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Probe {
    count: usize,
    visible: bool,
    enabled: bool,
    text: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Need {
    Attached,
    Visible,
    Actionable,
}

impl Need {
    const fn satisfied_by(self, probe: &Probe) -> bool {
        match self {
            Self::Attached => true,
            Self::Visible => probe.visible,
            Self::Actionable => probe.visible && probe.enabled,
        }
    }
}

/// A Chromium tab implementing [`Page`]
#[derive(Debug)]
pub struct CdpPage {
    inner: Mutex<Option<ChromePage>>,
    url: std::sync::Mutex<String>,
    action_timeout: Duration,
}

impl CdpPage {
    async fn session(&self) -> FormResult<ChromePage> {
        self.inner.lock().await.clone().ok_or(FormError::PageClosed)
    }

    async fn probe(page: &ChromePage, locator: &Locator, tag: u64) -> FormResult<Probe> {
        let script = format!(
            "(() => {{ const els = {query}; \
             if (els.length === 0 || ({strict} && els.length > 1)) \
               return {{ count: els.length, visible: false, enabled: false, text: null }}; \
             const el = els[0]; el.setAttribute('data-e2e-ref', '{tag}'); \
             const r = el.getBoundingClientRect(); const s = getComputedStyle(el); \
             return {{ count: els.length, \
               visible: r.width > 0 && r.height > 0 && s.visibility !== 'hidden', \
               enabled: !el.disabled, text: el.textContent }}; }})()",
            query = locator.selector().to_query_all(),
            strict = locator.options().strict,
        );
        let result = page
            .evaluate(script)
            .await
            .map_err(|e| FormError::page(e.to_string()))?;
        Ok(result.into_value::<Probe>()?)
    }

    /// Poll until the locator resolves to one element meeting `need`.
    async fn resolve(
        &self,
        page: &ChromePage,
        locator: &Locator,
        need: Need,
        timeout: Duration,
    ) -> FormResult<(u64, Probe)> {
        let deadline = Instant::now() + timeout;
        loop {
            let tag = NEXT_REF.fetch_add(1, Ordering::Relaxed);
            let probe = Self::probe(page, locator, tag).await?;

            let failure = match probe.count {
                0 => FormError::ElementNotFound {
                    locator: locator.to_string(),
                },
                n if n > 1 && locator.options().strict => {
                    return Err(FormError::AmbiguousLocator {
                        locator: locator.to_string(),
                        count: n,
                    })
                }
                _ if need.satisfied_by(&probe) => return Ok((tag, probe)),
                _ => FormError::ElementNotInteractable {
                    locator: locator.to_string(),
                    message: if probe.visible {
                        "element is disabled".to_string()
                    } else {
                        "element is not visible".to_string()
                    },
                },
            };

            if Instant::now() >= deadline {
                return Err(failure);
            }
            tokio::time::sleep(locator.options().poll_interval).await;
        }
    }

    async fn element(page: &ChromePage, tag: u64) -> FormResult<Element> {
        page.find_element(format!("[data-e2e-ref=\"{tag}\"]"))
            .await
            .map_err(|e| FormError::page(e.to_string()))
    }

    fn action_timeout_for(&self, locator: &Locator) -> Duration {
        locator.options().timeout.unwrap_or(self.action_timeout)
    }
}

#[async_trait]
impl Page for CdpPage {
    async fn goto(&self, url: &str) -> FormResult<()> {
        let page = self.session().await?;
        debug!(url, "navigating");
        page.goto(url)
            .await
            .map_err(|e| FormError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        *self.url.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = url.to_string();
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> FormResult<()> {
        let page = self.session().await?;
        match self.resolve(&page, locator, Need::Visible, timeout).await {
            Ok(_) => Ok(()),
            Err(FormError::ElementNotFound { .. } | FormError::ElementNotInteractable { .. }) => {
                Err(FormError::Timeout {
                    locator: locator.to_string(),
                    ms: timeout.as_millis() as u64,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn fill(&self, locator: &Locator, value: &str) -> FormResult<()> {
        let page = self.session().await?;
        let timeout = self.action_timeout_for(locator);
        let (tag, _) = self.resolve(&page, locator, Need::Actionable, timeout).await?;
        let element = Self::element(&page, tag).await?;
        let to_page_err = |e: chromiumoxide::error::CdpError| FormError::ElementNotInteractable {
            locator: locator.to_string(),
            message: e.to_string(),
        };

        element.focus().await.map_err(to_page_err)?;
        element
            .call_js_fn(
                "function() { if (typeof this.select === 'function') { this.select(); } }",
                false,
            )
            .await
            .map_err(to_page_err)?;
        if value.is_empty() {
            element.press_key("Backspace").await.map_err(to_page_err)?;
        } else {
            element.type_str(value).await.map_err(to_page_err)?;
        }
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> FormResult<()> {
        let page = self.session().await?;
        let timeout = self.action_timeout_for(locator);
        let (tag, _) = self.resolve(&page, locator, Need::Actionable, timeout).await?;
        let element = Self::element(&page, tag).await?;
        element
            .click()
            .await
            .map_err(|e| FormError::ElementNotInteractable {
                locator: locator.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn set_input_files(&self, locator: &Locator, path: &Path) -> FormResult<()> {
        let page = self.session().await?;
        let timeout = self.action_timeout_for(locator);
        let (tag, _) = self.resolve(&page, locator, Need::Attached, timeout).await?;
        let element = Self::element(&page, tag).await?;

        let params = SetFileInputFilesParams::builder()
            .files(vec![path.to_string_lossy().into_owned()])
            .backend_node_id(element.backend_node_id.clone())
            .build()
            .map_err(FormError::page)?;
        page.execute(params)
            .await
            .map_err(|e| FormError::page(e.to_string()))?;
        Ok(())
    }

    async fn text_content(&self, locator: &Locator) -> FormResult<String> {
        let page = self.session().await?;
        let (_, probe) = self
            .resolve(&page, locator, Need::Attached, Duration::ZERO)
            .await?;
        Ok(probe.text.unwrap_or_default())
    }

    async fn screenshot(&self, full_page: bool) -> FormResult<Vec<u8>> {
        let page = self.session().await?;
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(full_page)
            .build();
        page.screenshot(params)
            .await
            .map_err(|e| FormError::Screenshot {
                message: e.to_string(),
            })
    }

    async fn close(&self) -> FormResult<()> {
        let Some(page) = self.inner.lock().await.take() else {
            warn!("page already closed");
            return Ok(());
        };
        page.close()
            .await
            .map_err(|e| FormError::page(e.to_string()))
    }

    fn current_url(&self) -> String {
        self.url
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn default_timeout(&self) -> Duration {
        self.action_timeout
    }
}
