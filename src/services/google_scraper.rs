use std::time::Duration;

use thirtyfour::{
    error::{WebDriverError, WebDriverResult},
    prelude::ElementQueryable,
    By, WebDriver,
};
use url::Url;

use crate::configuration::BrowserSettings;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

// WebDriver key code for Enter
const ENTER_KEY: &str = "\u{E007}";

/// Types the firm into the search engine and clicks the first result.
/// `Ok(None)` when no result could be opened.
pub async fn search_firm_website(
    driver: &WebDriver,
    settings: &BrowserSettings,
    firm: &str,
) -> WebDriverResult<Option<String>> {
    driver.goto(&settings.search_url).await?;

    let search_box = driver
        .query(By::Name("q"))
        .wait(settings.wait_timeout(), POLL_INTERVAL)
        .first()
        .await?;
    search_box.clear().await?;
    search_box.send_keys(firm).await?;
    search_box.send_keys(ENTER_KEY).await?;

    let opened = async {
        let first_result = driver
            .query(By::Css("h3"))
            .wait(settings.wait_timeout(), POLL_INTERVAL)
            .first()
            .await?;
        first_result.click().await?;
        tokio::time::sleep(settings.settle()).await;
        let current_url = driver.current_url().await?;
        Ok::<_, WebDriverError>(current_url.to_string())
    }
    .await;

    match opened {
        Ok(url) => Ok(Some(url)),
        Err(e) => {
            log::error!("Could not find site for {}: {:?}", firm, e);
            Ok(None)
        }
    }
}

/// Opens the first anchor whose text mentions a deal keyword. Anchors that
/// fail to read or load are skipped.
pub async fn open_deals_page(
    driver: &WebDriver,
    settings: &BrowserSettings,
    deal_keywords: &[String],
) -> WebDriverResult<bool> {
    for link in driver.find_all(By::Tag("a")).await? {
        let Ok(text) = link.text().await else {
            continue;
        };
        let Ok(Some(href)) = link.attr("href").await else {
            continue;
        };

        if !is_deals_link(&text, &href, deal_keywords) {
            continue;
        }

        match driver.goto(&href).await {
            Ok(_) => {
                tokio::time::sleep(settings.settle()).await;
                return Ok(true);
            }
            Err(e) => {
                log::error!("Failed to open deals link {}: {:?}", href, e);
                continue;
            }
        }
    }

    Ok(false)
}

pub fn is_deals_link(text: &str, href: &str, deal_keywords: &[String]) -> bool {
    let text = text.to_lowercase();

    let keyword_hit = deal_keywords
        .iter()
        .any(|keyword| text.contains(&keyword.to_lowercase()));

    let absolute = match Url::parse(href) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    };

    keyword_hit && absolute
}
