use std::{ffi::OsStr, sync::Arc, thread::sleep, time::Duration};

use anyhow::Context;
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use log::info;
use scraper::Html;
use url::Url;

use crate::{
    batch::AccountSource, config::Config, riot_id::RiotId, schema::AccountRecord, xdx,
};

/// A headless Chrome with one tab, used for every profile of a run.
///
/// The browser process is shut down when the session is dropped.
pub struct BrowserSession {
    tab: Arc<Tab>,
    // Declared after `tab` so that the tab is released first.
    _browser: Browser,
    base_url: Url,
    page_load_wait: Duration,
}

impl BrowserSession {
    pub fn launch(config: &Config) -> anyhow::Result<Self> {
        let options = LaunchOptionsBuilder::default()
            .headless(true)
            .sandbox(false)
            .window_size(Some(config.window_size))
            .port(config.remote_debugging_port)
            .args(vec![OsStr::new("--disable-dev-shm-usage")])
            .build()?;
        let browser = Browser::new(options)
            .context("Could not start Chrome.  Make sure that Chrome or Chromium is installed")?;
        let tab = browser.new_tab()?;
        tab.set_user_agent(&config.user_agent, None, None)?;
        info!("Browser started.");
        Ok(Self {
            tab,
            _browser: browser,
            base_url: config.base_url.clone(),
            page_load_wait: config.page_load_wait,
        })
    }

    /// Rendered markup of `url`, after the configured wait for client-side rendering.
    pub fn rendered_page(&self, url: &Url) -> anyhow::Result<String> {
        info!("Visiting {url}");
        self.tab
            .navigate_to(url.as_str())?
            .wait_until_navigated()
            .with_context(|| format!("While loading {url}"))?;
        sleep(self.page_load_wait);
        self.tab.get_content()
    }
}

impl AccountSource for BrowserSession {
    fn fetch(&mut self, riot_id: &RiotId) -> anyhow::Result<AccountRecord> {
        let url = xdx::profile_url(&self.base_url, riot_id)?;
        let html = self.rendered_page(&url)?;
        Ok(xdx::parser::parse(
            &Html::parse_document(&html),
            riot_id.clone(),
        ))
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        info!("Closing the browser.");
        let _ = self.tab.close(false);
    }
}
