use std::{path::Path, time::Duration};

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::deal_block::{default_patterns, LabeledPattern};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0.4389.82 Safari/537.36";
const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1JDYRh44C1-nvJb8t-Gsbvfp9eme72ZTF/export?format=csv&gid=1267470465";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sheet: SheetSettings,
    pub browser: BrowserSettings,
    pub deals: DealSettings,
    pub advisory: AdvisorySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    /// CSV export URL or a local path.
    pub source: String,
    pub firm_column: String,
    pub link_column: String,
}

impl Default for SheetSettings {
    fn default() -> Self {
        SheetSettings {
            source: DEFAULT_SHEET_URL.to_string(),
            firm_column: "PE Firm".to_string(),
            link_column: "Axial Link".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    pub search_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub wait_timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub settle_secs: u64,
}

impl BrowserSettings {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        BrowserSettings {
            webdriver_url: "http://localhost:9515".to_string(),
            search_url: "https://www.google.com/".to_string(),
            wait_timeout_secs: 10,
            settle_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DealSettings {
    pub search_output: String,
    pub links_output: String,
    pub deal_keywords: Vec<String>,
    pub patterns: Vec<LabeledPattern>,
}

impl Default for DealSettings {
    fn default() -> Self {
        DealSettings {
            search_output: "All_PE_Deals.xlsx".to_string(),
            links_output: "All_PE_Deals_URLs.xlsx".to_string(),
            deal_keywords: [
                "deals",
                "portfolio",
                "investments",
                "businesses",
                "opportunities",
                "for sale",
                "acquisitions",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
            patterns: default_patterns(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdvisorySettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub pages: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_delay_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub interval_secs: u64,
    pub output_folder: String,
    pub user_agent: String,
}

impl AdvisorySettings {
    pub fn page_delay(&self) -> Duration {
        Duration::from_secs(self.page_delay_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for AdvisorySettings {
    fn default() -> Self {
        AdvisorySettings {
            base_url: "https://www.axial.net/forum/companies/united-states-m-a-advisory-firms/"
                .to_string(),
            pages: 4,
            page_delay_secs: 2,
            interval_secs: 60,
            output_folder: "Advisory_Firms".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Reads `configuration.{yaml,toml,json}` from the working directory (or `path`),
/// then applies `APP_*` environment overrides, e.g. `APP_BROWSER__WEBDRIVER_URL`.
pub fn get_configuration(path: Option<&Path>) -> Result<Settings, config::ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("configuration").required(false),
    };

    let settings = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
