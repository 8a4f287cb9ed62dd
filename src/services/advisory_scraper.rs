use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use reqwest::Client;

use crate::{
    configuration::AdvisorySettings,
    dal::save_advisory_firms,
    domain::advisory_firm::{extract_advisory_firms, AdvisoryFirm},
};

pub struct AdvisoryScraper {
    client: Client,
    settings: AdvisorySettings,
}

impl AdvisoryScraper {
    pub fn new(settings: AdvisorySettings) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .read_timeout(Duration::from_secs(30))
            .build()?;

        Ok(AdvisoryScraper { client, settings })
    }

    /// First page is the base URL itself; later pages append their number.
    pub fn page_url(&self, page: u32) -> String {
        match page > 1 {
            true => format!("{}{}", self.settings.base_url, page),
            false => self.settings.base_url.clone(),
        }
    }

    pub async fn scrape_page(&self, page: u32) -> anyhow::Result<Vec<AdvisoryFirm>> {
        let url = self.page_url(page);
        log::info!("Fetching content from {}...", url);

        let html_content = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .with_context(|| format!("request to {} failed", url))?
            .text()
            .await
            .with_context(|| format!("unreadable body from {}", url))?;

        let firms = extract_advisory_firms(&html_content, page);
        log::info!("Found {} articles on page {}.", firms.len(), page);

        Ok(firms)
    }

    /// A page that fails contributes nothing; the rest still get scraped.
    pub async fn scrape_all_pages(&self) -> Vec<AdvisoryFirm> {
        let mut all_firms = vec![];

        for page in 1..=self.settings.pages {
            match self.scrape_page(page).await {
                Ok(firms) => all_firms.extend(firms),
                Err(e) => log::error!("Error scraping page {}: {:?}", page, e),
            }
            tokio::time::sleep(self.settings.page_delay()).await;
        }

        all_firms
    }

    /// One full pass: every page, then a timestamped snapshot file.
    pub async fn run_once(&self) -> anyhow::Result<Option<PathBuf>> {
        log::info!("Starting full scrape...");

        let firms = self.scrape_all_pages().await;
        let written = save_advisory_firms(
            &PathBuf::from(&self.settings.output_folder),
            &firms,
            chrono::Local::now().naive_local(),
        )?;

        log::info!("Scraping complete.");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{
        matchers::{headers, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn teaser(title: &str) -> String {
        format!(
            r#"<article class="teaser1"><h4 class="teaser1-title"><a href="/firm/{0}">{0}</a></h4><div class="teaser1-description">About {0}</div></article>"#,
            title
        )
    }

    fn settings(server: &MockServer, output_folder: PathBuf) -> AdvisorySettings {
        AdvisorySettings {
            base_url: format!("{}/advisors/", server.uri()),
            pages: 3,
            page_delay_secs: 0,
            output_folder: output_folder.to_string_lossy().to_string(),
            ..AdvisorySettings::default()
        }
    }

    #[tokio::test]
    async fn page_urls_append_page_number() {
        let server = MockServer::start().await;
        let scraper = AdvisoryScraper::new(settings(&server, PathBuf::from("out"))).unwrap();

        assert_eq!(scraper.page_url(1), format!("{}/advisors/", server.uri()));
        assert_eq!(scraper.page_url(3), format!("{}/advisors/3", server.uri()));
    }

    #[tokio::test]
    async fn failed_pages_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/advisors/"))
            .and(headers(
                "user-agent",
                AdvisorySettings::default().user_agent.split(',').map(str::trim).collect(),
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("<html><body>{}</body></html>", teaser("Harbor"))),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/advisors/2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/advisors/3"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                "<html><body>{}{}</body></html>",
                teaser("Quay"),
                teaser("Ridge")
            )))
            .mount(&server)
            .await;

        let scraper = AdvisoryScraper::new(settings(&server, PathBuf::from("out"))).unwrap();
        let firms = scraper.scrape_all_pages().await;

        let titles: Vec<(&str, u32)> = firms.iter().map(|f| (f.title.as_str(), f.page)).collect();
        assert_eq!(titles, vec![("Harbor", 1), ("Quay", 3), ("Ridge", 3)]);
        assert_eq!(firms[0].link.as_deref(), Some("/firm/Harbor"));
    }

    #[tokio::test]
    async fn run_once_writes_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("<html><body>{}</body></html>", teaser("Harbor"))),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("Advisory_Firms");
        let scraper = AdvisoryScraper::new(settings(&server, folder.clone())).unwrap();

        let written = scraper.run_once().await.unwrap().unwrap();

        assert!(written.starts_with(&folder));
        assert!(written.exists());
    }

    #[tokio::test]
    async fn run_once_without_data_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("Advisory_Firms");
        let scraper = AdvisoryScraper::new(settings(&server, folder.clone())).unwrap();

        assert_eq!(scraper.run_once().await.unwrap(), None);
        assert!(!folder.exists());
    }
}
