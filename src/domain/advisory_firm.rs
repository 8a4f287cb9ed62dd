use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

pub const MISSING: &str = "N/A";

pub const ADVISORY_COLUMNS: [&str; 4] = ["title", "link", "description", "page"];

lazy_static! {
    static ref ARTICLE_SELECTOR: Selector = Selector::parse("article.teaser1").unwrap();
    static ref TITLE_SELECTOR: Selector = Selector::parse("h4.teaser1-title").unwrap();
    static ref DESCRIPTION_SELECTOR: Selector =
        Selector::parse("div.teaser1-description").unwrap();
    static ref LINK_SELECTOR: Selector = Selector::parse("a").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryFirm {
    pub title: String,
    pub link: Option<String>,
    pub description: String,
    pub page: u32,
}

impl AdvisoryFirm {
    pub fn to_row(&self) -> [String; 4] {
        [
            self.title.clone(),
            self.link.clone().unwrap_or_default(),
            self.description.clone(),
            self.page.to_string(),
        ]
    }
}

/// Every directory entry on one listing page, in document order.
pub fn extract_advisory_firms(page_source: &str, page: u32) -> Vec<AdvisoryFirm> {
    let document = Html::parse_document(page_source);

    document
        .select(&ARTICLE_SELECTOR)
        .map(|article| {
            let title_tag = article.select(&TITLE_SELECTOR).next();
            let description_tag = article.select(&DESCRIPTION_SELECTOR).next();

            AdvisoryFirm {
                title: title_tag
                    .map(stripped_text)
                    .unwrap_or_else(|| MISSING.to_string()),
                link: title_tag.and_then(|tag| {
                    tag.select(&LINK_SELECTOR)
                        .next()
                        .and_then(|a| a.value().attr("href"))
                        .map(|href| href.to_string())
                }),
                description: description_tag
                    .map(stripped_text)
                    .unwrap_or_else(|| MISSING.to_string()),
                page,
            }
        })
        .collect()
}

// Each text node trimmed on its own, then glued together.
fn stripped_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}
