use crate::{
    dal::DealSheet,
    domain::{deal::DealLedger, deal_block::DealExtractor, firm::FirmRow},
};

use super::DealBrowser;

pub struct DealScraper<'a, B: DealBrowser> {
    browser: &'a B,
    extractor: DealExtractor,
    sheet: DealSheet,
    deal_keywords: Vec<String>,
}

impl<'a, B: DealBrowser + Sync> DealScraper<'a, B> {
    pub fn new(
        browser: &'a B,
        extractor: DealExtractor,
        sheet: DealSheet,
        deal_keywords: Vec<String>,
    ) -> Self {
        DealScraper {
            browser,
            extractor,
            sheet,
            deal_keywords,
        }
    }

    /// Finds each firm's website through the search engine, then its deals page.
    pub async fn scrape_firm_websites(&self, firms: &[FirmRow], ledger: &mut DealLedger) {
        for row in firms {
            log::info!("Searching: {}", row.firm);

            let firm_url = match self.browser.find_firm_website(&row.firm).await {
                Ok(Some(url)) => url,
                Ok(None) => continue,
                Err(e) => {
                    log::error!("Search failed for {}: {:?}", row.firm, e);
                    continue;
                }
            };

            match self.browser.open_deals_page(&self.deal_keywords).await {
                Ok(true) => {}
                Ok(false) => {
                    log::error!("No deals/portfolio page found for {}", firm_url);
                    continue;
                }
                Err(e) => {
                    log::error!("Failed looking for deals page on {}: {:?}", firm_url, e);
                    continue;
                }
            }

            if !self.harvest_current_page(&row.firm, &firm_url, ledger).await {
                log::info!("No deals found for {}.", row.firm);
            }
        }
    }

    /// Opens the listing URL given for each firm. Rows without a link are skipped.
    pub async fn scrape_firm_links(&self, firms: &[FirmRow], ledger: &mut DealLedger) {
        for row in firms {
            let Some(link) = row.link.as_deref() else {
                continue;
            };
            log::info!("Visiting: {} => {}", row.firm, link);

            if let Err(e) = self.browser.open(link).await {
                log::error!("Error processing {}: {:?}", row.firm, e);
                continue;
            }

            if !self.harvest_current_page(&row.firm, link, ledger).await {
                log::info!("No deals found on {}", link);
            }
        }
    }

    // Returns whether the ledger grew. The sheet is rewritten only when it did.
    async fn harvest_current_page(
        &self,
        firm: &str,
        website: &str,
        ledger: &mut DealLedger,
    ) -> bool {
        let page_text = match self.browser.page_text().await {
            Ok(text) => text,
            Err(e) => {
                log::error!("Error scraping {}: {:?}", firm, e);
                return false;
            }
        };

        let before_count = ledger.len();
        self.extractor.extract_into(&page_text, firm, website, ledger);

        match ledger.len() > before_count {
            true => {
                if let Err(e) = self.sheet.save(ledger.records()) {
                    log::error!("Failed to save progress for {}: {:?}", firm, e);
                }
                true
            }
            false => false,
        }
    }
}
