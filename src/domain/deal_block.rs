use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use super::deal::{DealLedger, DealRecord, DealStatus};

const TITLE_MAX_CHARS: usize = 80;

// Optional currency symbol, a number, optional magnitude suffix.
const VALUE_SHAPE: &str = r"[^\d$]*\$?\s?[\d,.]+[MBK]?";

lazy_static! {
    static ref BLOCK_SEPARATOR: Regex = Regex::new(r"(?:\r?\n){2,}").unwrap();
    static ref DEFAULT_EXTRACTOR: DealExtractor =
        DealExtractor::new(&default_patterns()).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealField {
    AskingPrice,
    Revenue,
    Ebitda,
}

/// One row of the pattern table: every label shares the same value shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabeledPattern {
    pub field: DealField,
    pub labels: Vec<String>,
}

impl LabeledPattern {
    pub fn new(field: DealField, labels: &[&str]) -> Self {
        LabeledPattern {
            field,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }
}

pub fn default_patterns() -> Vec<LabeledPattern> {
    vec![
        LabeledPattern::new(
            DealField::AskingPrice,
            &["Asking Price", "Price", "Purchase Price"],
        ),
        LabeledPattern::new(DealField::Revenue, &["Revenue"]),
        LabeledPattern::new(DealField::Ebitda, &["EBITDA"]),
    ]
}

#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("pattern for {0:?} has no labels")]
    NoLabels(DealField),
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

#[derive(Debug, Clone)]
pub struct DealExtractor {
    patterns: Vec<(DealField, Regex)>,
}

impl Default for DealExtractor {
    fn default() -> Self {
        DEFAULT_EXTRACTOR.clone()
    }
}

impl DealExtractor {
    pub fn new(table: &[LabeledPattern]) -> Result<Self, PatternError> {
        let mut patterns = Vec::with_capacity(table.len());

        for row in table {
            if row.labels.is_empty() {
                return Err(PatternError::NoLabels(row.field));
            }
            let labels: Vec<String> = row.labels.iter().map(|l| regex::escape(l)).collect();
            let regex = RegexBuilder::new(&format!("({}){}", labels.join("|"), VALUE_SHAPE))
                .case_insensitive(true)
                .build()?;
            patterns.push((row.field, regex));
        }

        Ok(DealExtractor { patterns })
    }

    /// Full matched substring for the first table row of `field` that hits the block.
    pub fn find_field(&self, block: &str, field: DealField) -> Option<String> {
        self.patterns
            .iter()
            .filter(|(f, _)| *f == field)
            .find_map(|(_, regex)| regex.find(block))
            .map(|m| m.as_str().to_string())
    }

    /// Turns one deal block into a record, or `None` when nothing in it matched.
    pub fn classify(&self, block: &str, firm: &str, website: &str) -> Option<DealRecord> {
        let record = DealRecord {
            firm: firm.to_string(),
            website: website.to_string(),
            title: block_title(block),
            asking_price: self.find_field(block, DealField::AskingPrice),
            revenue: self.find_field(block, DealField::Revenue),
            ebitda: self.find_field(block, DealField::Ebitda),
            status: block_status(block),
        };

        match record.has_signal() {
            true => Some(record),
            false => None,
        }
    }

    pub fn extract(&self, page_text: &str, firm: &str, website: &str) -> Vec<DealRecord> {
        split_blocks(page_text)
            .filter_map(|block| self.classify(block, firm, website))
            .collect()
    }

    /// Appends the page's deals to the ledger and returns how many were added.
    pub fn extract_into(
        &self,
        page_text: &str,
        firm: &str,
        website: &str,
        ledger: &mut DealLedger,
    ) -> usize {
        let deals = self.extract(page_text, firm, website);
        let found = deals.len();

        for deal in deals {
            log::info!("Found deal: {}", deal.title);
            ledger.push(deal);
        }

        found
    }
}

pub fn split_blocks(page_text: &str) -> impl Iterator<Item = &str> {
    BLOCK_SEPARATOR.split(page_text)
}

pub fn block_title(block: &str) -> String {
    block
        .trim()
        .split('\n')
        .next()
        .unwrap_or_default()
        .chars()
        .take(TITLE_MAX_CHARS)
        .collect()
}

pub fn block_status(block: &str) -> Option<DealStatus> {
    let block = block.to_lowercase();

    DealStatus::VOCABULARY
        .into_iter()
        .find(|status| block.contains(status.keyword()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRM: &str = "Acme Capital";
    const SITE: &str = "https://acme.example/deals";

    #[test]
    fn asking_price_is_the_exact_match() {
        let extractor = DealExtractor::default();
        let block = "Regional HVAC Contractor\nAsking Price: $5M\nTexas";

        let record = extractor.classify(block, FIRM, SITE).unwrap();

        assert_eq!(record.asking_price.as_deref(), Some("Asking Price: $5M"));
        assert_eq!(record.revenue, None);
        assert_eq!(record.ebitda, None);
    }

    #[test]
    fn revenue_and_ebitda_keep_their_labels() {
        let extractor = DealExtractor::default();
        let block = "SaaS platform\nrevenue of $12,500,000 and Adj. EBITDA 2.1M";

        let record = extractor.classify(block, FIRM, SITE).unwrap();

        assert_eq!(record.revenue.as_deref(), Some("revenue of $12,500,000"));
        assert_eq!(record.ebitda.as_deref(), Some("EBITDA 2.1M"));
    }

    #[test]
    fn plain_text_block_is_dropped() {
        let extractor = DealExtractor::default();
        let block = "About us\nWe partner with founders for the long term.";

        assert_eq!(extractor.classify(block, FIRM, SITE), None);
    }

    #[test]
    fn sold_in_any_case_sets_status() {
        for block in ["Machine shop - SOLD", "machine shop (sold)", "Sold: Machine shop"] {
            assert_eq!(block_status(block), Some(DealStatus::Sold));
        }

        let record = DealExtractor::default()
            .classify("Machine shop\nSOLD", FIRM, SITE)
            .unwrap();
        assert_eq!(record.status.unwrap().to_string(), "Sold");
    }

    #[test]
    fn status_follows_vocabulary_order() {
        assert_eq!(
            block_status("Pending review, now under contract"),
            Some(DealStatus::UnderContract)
        );
        assert_eq!(block_status("Nothing to see"), None);
    }

    #[test]
    fn title_is_first_trimmed_line_capped_at_80_chars() {
        let long_line = "x".repeat(120);
        let block = format!("\n   {}\nsecond line", long_line);

        let title = block_title(&block);

        assert_eq!(title.chars().count(), 80);
        assert_eq!(title, "x".repeat(80));
        assert_eq!(block_title("  Short title  \nPrice $1M"), "Short title  ");
        assert_eq!(block_title("Café Ünïcödé"), "Café Ünïcödé");
    }

    #[test]
    fn whitespace_block_gets_empty_title() {
        assert_eq!(block_title("   \t "), "");
    }

    #[test]
    fn at_most_one_record_per_block() {
        let extractor = DealExtractor::default();
        let text = "Deal A\nPrice: $1M\nRevenue: $4M\n\nDeal B\nEBITDA: $300K\nAvailable";

        let deals = extractor.extract(text, FIRM, SITE);

        assert_eq!(deals.len(), 2);
        assert_eq!(deals[0].title, "Deal A");
        assert_eq!(deals[1].title, "Deal B");
        assert_eq!(deals[1].status, Some(DealStatus::Available));
    }

    #[test]
    fn blocks_split_on_two_or_more_line_breaks() {
        let text = "one\ntwo\n\nthree\n\n\n\nfour\r\n\r\nfive";
        let blocks: Vec<&str> = split_blocks(text).collect();

        assert_eq!(blocks, vec!["one\ntwo", "three", "four", "five"]);
    }

    #[test]
    fn extraction_is_repeatable() {
        let extractor = DealExtractor::default();
        let text = "Deal A\nPurchase Price $2.5M\n\nnoise\n\nDeal C\npending";

        let first = extractor.extract(text, FIRM, SITE);
        let second = extractor.extract(text, FIRM, SITE);

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn extract_into_appends_to_ledger() {
        let extractor = DealExtractor::default();
        let mut ledger = DealLedger::new();

        let added = extractor.extract_into("Deal A\nSold", FIRM, SITE, &mut ledger);
        let added_again = extractor.extract_into("no deals here", FIRM, SITE, &mut ledger);

        assert_eq!(added, 1);
        assert_eq!(added_again, 0);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.records()[0].firm, FIRM);
    }

    #[test]
    fn custom_table_replaces_labels() {
        let extractor = DealExtractor::new(&[LabeledPattern::new(
            DealField::Revenue,
            &["Sales", "Turnover"],
        )])
        .unwrap();

        let record = extractor
            .classify("Bakery\nTurnover: €900K", FIRM, SITE)
            .unwrap();
        assert_eq!(record.revenue.as_deref(), Some("Turnover: €900K"));

        assert_eq!(extractor.classify("Bakery\nRevenue: $900K", FIRM, SITE), None);

        let record = extractor.classify("Bakery\nSales: $900K", FIRM, SITE).unwrap();
        assert_eq!(record.revenue.as_deref(), Some("Sales: $900K"));
        assert_eq!(record.asking_price, None);
    }

    #[test]
    fn empty_label_set_is_rejected() {
        let result = DealExtractor::new(&[LabeledPattern::new(DealField::Ebitda, &[])]);

        assert!(matches!(result, Err(PatternError::NoLabels(DealField::Ebitda))));
    }
}
