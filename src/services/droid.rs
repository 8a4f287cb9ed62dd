use async_trait::async_trait;
use thirtyfour::{error::WebDriverResult, By, DesiredCapabilities, WebDriver};

use crate::configuration::BrowserSettings;

use super::{open_deals_page, search_firm_website};

/// Navigation the deal scrapers need from a browser.
#[async_trait]
pub trait DealBrowser {
    /// Searches for the firm and opens the first result, returning where it landed.
    async fn find_firm_website(&self, firm: &str) -> anyhow::Result<Option<String>>;

    /// Follows the first link that looks like a deals or portfolio page.
    async fn open_deals_page(&self, deal_keywords: &[String]) -> anyhow::Result<bool>;

    async fn open(&self, url: &str) -> anyhow::Result<()>;

    /// Visible text of the current page.
    async fn page_text(&self) -> anyhow::Result<String>;
}

pub struct Droid {
    pub driver: WebDriver,
    settings: BrowserSettings,
}

impl Droid {
    pub async fn new(settings: &BrowserSettings) -> WebDriverResult<Self> {
        let caps = DesiredCapabilities::chrome();

        let driver = WebDriver::new(&settings.webdriver_url, caps).await?;
        driver.maximize_window().await?;

        Ok(Droid {
            driver,
            settings: settings.clone(),
        })
    }

    pub async fn quit(self) -> WebDriverResult<()> {
        self.driver.quit().await
    }
}

#[async_trait]
impl DealBrowser for Droid {
    async fn find_firm_website(&self, firm: &str) -> anyhow::Result<Option<String>> {
        Ok(search_firm_website(&self.driver, &self.settings, firm).await?)
    }

    async fn open_deals_page(&self, deal_keywords: &[String]) -> anyhow::Result<bool> {
        Ok(open_deals_page(&self.driver, &self.settings, deal_keywords).await?)
    }

    async fn open(&self, url: &str) -> anyhow::Result<()> {
        self.driver.goto(url).await?;
        tokio::time::sleep(self.settings.settle()).await;
        Ok(())
    }

    async fn page_text(&self) -> anyhow::Result<String> {
        let body = self.driver.find(By::Tag("body")).await?;
        Ok(body.text().await?)
    }
}
