use std::fmt;

pub const NOT_FOUND: &str = "Not Found";

pub const DEAL_COLUMNS: [&str; 7] = [
    "Firm",
    "Website",
    "Title",
    "Asking Price",
    "Revenue",
    "EBITDA",
    "Status",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealStatus {
    UnderContract,
    Sold,
    Available,
    Pending,
}

impl DealStatus {
    /// Keywords in the order they are tried against a block.
    pub const VOCABULARY: [DealStatus; 4] = [
        DealStatus::UnderContract,
        DealStatus::Sold,
        DealStatus::Available,
        DealStatus::Pending,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            DealStatus::UnderContract => "under contract",
            DealStatus::Sold => "sold",
            DealStatus::Available => "available",
            DealStatus::Pending => "pending",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DealStatus::UnderContract => "Under contract",
            DealStatus::Sold => "Sold",
            DealStatus::Available => "Available",
            DealStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DealRecord {
    pub firm: String,
    pub website: String,
    pub title: String,
    pub asking_price: Option<String>,
    pub revenue: Option<String>,
    pub ebitda: Option<String>,
    pub status: Option<DealStatus>,
}

impl DealRecord {
    /// A record is worth keeping when at least one of the extracted fields matched.
    pub fn has_signal(&self) -> bool {
        self.asking_price.is_some()
            || self.revenue.is_some()
            || self.ebitda.is_some()
            || self.status.is_some()
    }

    /// Cells in `DEAL_COLUMNS` order, missing values rendered as the sentinel.
    pub fn to_row(&self) -> [String; 7] {
        let or_sentinel = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_FOUND.to_string());

        [
            self.firm.clone(),
            self.website.clone(),
            self.title.clone(),
            or_sentinel(&self.asking_price),
            or_sentinel(&self.revenue),
            or_sentinel(&self.ebitda),
            self.status
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| NOT_FOUND.to_string()),
        ]
    }
}

/// Append-only accumulation of deals found during one run.
#[derive(Debug, Default)]
pub struct DealLedger {
    records: Vec<DealRecord>,
}

impl DealLedger {
    pub fn new() -> Self {
        DealLedger::default()
    }

    pub fn push(&mut self, record: DealRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DealRecord] {
        &self.records
    }
}
