use crate::core::{BrowserConfig, SessionDriver};
use crate::errors::{DriverError, DriverResult};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Chrome-backed session driver.
///
/// One launched browser, one tab, shared by every credential iteration of a
/// run. Element interaction goes through injected scripts so values are set
/// with the DOM events the target application listens for.
pub struct ChromeSession {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
    session_id: String,
}

impl ChromeSession {
    pub async fn launch(config: &BrowserConfig) -> DriverResult<Self> {
        let window_size_arg = format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        );

        let user_agent_arg = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));

        let mut args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--disable-gpu"),
            OsStr::new(&window_size_arg),
        ];

        if let Some(ref ua_arg) = user_agent_arg {
            args.push(OsStr::new(ua_arg));
        }

        for arg in &config.args {
            args.push(OsStr::new(arg));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .args(args)
            .build()
            .map_err(|e| DriverError::LaunchFailed(e.to_string()))?;

        let browser =
            Browser::new(launch_options).map_err(|e| DriverError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| DriverError::TabCreationFailed(e.to_string()))?;
        // Bounds wait_until_navigated and every other tab-level wait.
        tab.set_default_timeout(Duration::from_millis(config.navigation_timeout_ms));

        let session_id = uuid::Uuid::new_v4().to_string();
        debug!(session_id = %session_id, headless = config.headless, "chrome session launched");

        Ok(Self {
            browser: Some(browser),
            tab: Some(tab),
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn tab(&self) -> DriverResult<&Arc<Tab>> {
        self.tab.as_ref().ok_or(DriverError::NoActiveTab)
    }

    fn evaluate(&self, script: &str, await_promise: bool) -> DriverResult<Value> {
        let tab = self.tab()?;
        let result = tab
            .evaluate(script, await_promise)
            .map_err(|e| DriverError::JavaScriptFailed(e.to_string()))?;
        Ok(result.value.unwrap_or(Value::Null))
    }

    fn visibility_check(selector: &str) -> DriverResult<String> {
        Ok(format!(
            r#"
            (function() {{
                const element = document.querySelector({selector});
                if (!element) return false;
                const rect = element.getBoundingClientRect();
                const style = window.getComputedStyle(element);
                return rect.width > 0 && rect.height > 0
                    && style.visibility !== 'hidden'
                    && style.display !== 'none';
            }})()
            "#,
            selector = serde_json::to_string(selector)?
        ))
    }
}

#[async_trait]
impl SessionDriver for ChromeSession {
    async fn navigate(&self, url: &str) -> DriverResult<()> {
        let tab = self.tab()?;

        tab.navigate_to(url)
            .map_err(|e| DriverError::NavigationFailed(e.to_string()))?;

        tab.wait_until_navigated()
            .map_err(|e| DriverError::NavigationFailed(e.to_string()))?;

        debug!(url, "navigated");
        Ok(())
    }

    async fn set_value(&self, selector: &str, value: &str) -> DriverResult<()> {
        let script = format!(
            r#"
            (function() {{
                const element = document.querySelector({selector});
                if (!element) return {{ success: false, error: 'Element not found' }};

                element.focus();
                element.value = {value};
                ['input', 'change', 'blur'].forEach(type => {{
                    element.dispatchEvent(new Event(type, {{ bubbles: true, cancelable: true }}));
                }});

                return {{ success: true }};
            }})()
            "#,
            selector = serde_json::to_string(selector)?,
            value = serde_json::to_string(value)?
        );

        let result = self.evaluate(&script, false)?;
        if result
            .get("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
        {
            Ok(())
        } else {
            Err(DriverError::ElementNotFound(selector.to_string()))
        }
    }

    async fn click(&self, selector: &str) -> DriverResult<()> {
        let script = format!(
            r#"
            (function() {{
                const element = document.querySelector({selector});
                if (!element) return {{ success: false, error: 'Element not found' }};

                element.scrollIntoView({{ block: 'center' }});
                element.focus();
                element.click();

                return {{ success: true, elementType: element.tagName.toLowerCase() }};
            }})()
            "#,
            selector = serde_json::to_string(selector)?
        );

        let result = self.evaluate(&script, false)?;
        if result
            .get("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
        {
            debug!(selector, "clicked");
            Ok(())
        } else {
            Err(DriverError::ElementNotFound(selector.to_string()))
        }
    }

    async fn is_visible(&self, selector: &str) -> DriverResult<bool> {
        let script = Self::visibility_check(selector)?;
        let result = self.evaluate(&script, false)?;
        Ok(result.as_bool().unwrap_or(false))
    }

    async fn wait_for_visible(&self, selector: &str, timeout_ms: u64) -> DriverResult<bool> {
        // Predicate wait: MutationObserver plus a polling fallback for
        // visibility changes that happen without DOM mutations.
        let script = format!(
            r#"
            (function() {{
                const isVisible = () => {{
                    const element = document.querySelector({selector});
                    if (!element) return false;
                    const rect = element.getBoundingClientRect();
                    const style = window.getComputedStyle(element);
                    return rect.width > 0 && rect.height > 0
                        && style.visibility !== 'hidden'
                        && style.display !== 'none';
                }};

                return new Promise((resolve) => {{
                    if (isVisible()) {{
                        resolve(true);
                        return;
                    }}

                    let timer = null;
                    let deadline = null;
                    const observer = new MutationObserver(() => {{
                        if (isVisible()) {{
                            cleanup();
                            resolve(true);
                        }}
                    }});

                    function cleanup() {{
                        observer.disconnect();
                        clearInterval(timer);
                        clearTimeout(deadline);
                    }}

                    observer.observe(document.documentElement, {{
                        childList: true,
                        subtree: true,
                        attributes: true
                    }});

                    timer = setInterval(() => {{
                        if (isVisible()) {{
                            cleanup();
                            resolve(true);
                        }}
                    }}, 100);

                    deadline = setTimeout(() => {{
                        cleanup();
                        resolve(false);
                    }}, {timeout_ms});
                }});
            }})()
            "#,
            selector = serde_json::to_string(selector)?,
            timeout_ms = timeout_ms
        );

        let result = self.evaluate(&script, true)?;
        Ok(result.as_bool().unwrap_or(false))
    }

    async fn clear_cookies(&self) -> DriverResult<()> {
        let script = r#"
            (function() {
                const cookies = document.cookie.split(';');
                let clearedCount = 0;

                cookies.forEach(cookie => {
                    const name = cookie.split('=')[0].trim();
                    if (name) {
                        document.cookie = name + '=; expires=Thu, 01 Jan 1970 00:00:00 UTC; path=/;';
                        document.cookie = name + '=; expires=Thu, 01 Jan 1970 00:00:00 UTC; path=/; domain=' + window.location.hostname + ';';
                        document.cookie = name + '=; expires=Thu, 01 Jan 1970 00:00:00 UTC; path=/; domain=.' + window.location.hostname + ';';
                        clearedCount++;
                    }
                });

                return { success: true, clearedCount: clearedCount };
            })()
        "#;

        self.evaluate(script, false)?;
        debug!("session cookies cleared");
        Ok(())
    }

    async fn current_url(&self) -> DriverResult<String> {
        Ok(self.tab()?.get_url())
    }

    async fn close(&mut self) -> DriverResult<()> {
        self.tab = None;
        self.browser = None;
        Ok(())
    }
}
