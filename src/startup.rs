use std::{path::PathBuf, sync::Arc};

use anyhow::Context;

use crate::{
    configuration::{AdvisorySettings, Settings},
    dal::{load_firm_sheet, DealSheet},
    domain::{deal::DealLedger, deal_block::DealExtractor},
    services::{AdvisoryScraper, DealScraper, Droid, Ticker},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealMode {
    /// Find each firm's site through the search engine.
    Search,
    /// Use the listing URL from the sheet.
    Links,
}

pub async fn run_deal_scrape(
    settings: &Settings,
    mode: DealMode,
    output: PathBuf,
) -> anyhow::Result<DealLedger> {
    let firms = load_firm_sheet(&settings.sheet, mode == DealMode::Links)
        .await
        .with_context(|| format!("Failed to load firm sheet from {}", settings.sheet.source))?;
    log::info!("Loaded {} firms", firms.len());

    let extractor =
        DealExtractor::new(&settings.deals.patterns).context("Invalid deal pattern table")?;
    let droid = Droid::new(&settings.browser)
        .await
        .with_context(|| format!("Failed to connect to {}", settings.browser.webdriver_url))?;

    let mut ledger = DealLedger::new();
    {
        let scraper = DealScraper::new(
            &droid,
            extractor,
            DealSheet::new(output),
            settings.deals.deal_keywords.clone(),
        );

        match mode {
            DealMode::Search => scraper.scrape_firm_websites(&firms, &mut ledger).await,
            DealMode::Links => scraper.scrape_firm_links(&firms, &mut ledger).await,
        }
    }

    if let Err(e) = droid.quit().await {
        log::error!("Failed to close browser session: {:?}", e);
    }

    log::info!("Scraping complete! {} deals found", ledger.len());
    Ok(ledger)
}

/// Scrapes the advisory directory once, or on a schedule until Ctrl-C.
pub async fn run_advisory_scrape(settings: AdvisorySettings, once: bool) -> anyhow::Result<()> {
    let scraper = Arc::new(AdvisoryScraper::new(settings.clone())?);

    if once {
        scraper.run_once().await?;
        return Ok(());
    }

    let handle = Ticker::new(settings.interval())
        .context("Invalid advisory interval_secs")?
        .start(move || {
            let scraper = scraper.clone();
            async move {
                if let Err(e) = scraper.run_once().await {
                    log::error!("Advisory scrape failed: {:?}", e);
                }
            }
        });
    log::info!("Scheduler started. Waiting for the next job...");

    tokio::signal::ctrl_c().await?;
    log::info!("Shutting down scheduler");
    handle.stop().await;

    Ok(())
}
