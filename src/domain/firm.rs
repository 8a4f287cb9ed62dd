#[derive(Debug, Clone, PartialEq)]
pub struct FirmRow {
    pub firm: String,
    pub link: Option<String>,
}
