use std::path::Path;

use crate::{configuration::SheetSettings, domain::firm::FirmRow};

use super::SheetError;

/// Loads the firm list. `require_links` makes the link column mandatory and
/// drops rows without a link.
pub async fn load_firm_sheet(
    settings: &SheetSettings,
    require_links: bool,
) -> Result<Vec<FirmRow>, SheetError> {
    let csv_text = read_sheet_source(&settings.source).await?;
    let link_column = require_links.then_some(settings.link_column.as_str());

    parse_firm_rows(&csv_text, &settings.firm_column, link_column)
}

pub async fn read_sheet_source(source: &str) -> Result<String, SheetError> {
    match source.starts_with("http://") || source.starts_with("https://") {
        true => {
            let fetch_err = |err: reqwest::Error| SheetError::Fetch {
                url: source.to_string(),
                source: err,
            };
            let response = reqwest::get(source)
                .await
                .and_then(|res| res.error_for_status())
                .map_err(fetch_err)?;
            response.text().await.map_err(fetch_err)
        }
        false => Ok(std::fs::read_to_string(Path::new(source))?),
    }
}

pub fn parse_firm_rows(
    csv_text: &str,
    firm_column: &str,
    link_column: Option<&str>,
) -> Result<Vec<FirmRow>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
            .ok_or_else(|| SheetError::MissingColumn(name.to_string()))
    };

    let firm_index = position(firm_column)?;
    let link_index = match link_column {
        Some(name) => Some(position(name)?),
        None => None,
    };

    let cell = |record: &csv::StringRecord, index: usize| {
        record
            .get(index)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
    };

    let mut rows = vec![];
    for record in reader.records() {
        let record = record?;

        let Some(firm) = cell(&record, firm_index) else {
            continue;
        };
        let link = match link_index {
            Some(index) => match cell(&record, index) {
                Some(link) => Some(link),
                None => continue,
            },
            None => None,
        };

        rows.push(FirmRow { firm, link });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "PE Firm,Axial Link,Notes\n\
        Acme Capital,https://www.axial.net/acme,\n\
        ,https://www.axial.net/nobody,orphan link\n\
        \"Birch, Stone & Co\",,no link\n\
        Cedar Partners,https://www.axial.net/cedar,\n";

    #[test]
    fn firms_without_names_are_dropped() {
        let rows = parse_firm_rows(SHEET, "PE Firm", None).unwrap();

        let firms: Vec<&str> = rows.iter().map(|r| r.firm.as_str()).collect();
        assert_eq!(firms, vec!["Acme Capital", "Birch, Stone & Co", "Cedar Partners"]);
        assert!(rows.iter().all(|r| r.link.is_none()));
    }

    #[test]
    fn link_mode_keeps_complete_rows_only() {
        let rows = parse_firm_rows(SHEET, "PE Firm", Some("Axial Link")).unwrap();

        assert_eq!(
            rows,
            vec![
                FirmRow {
                    firm: "Acme Capital".to_string(),
                    link: Some("https://www.axial.net/acme".to_string()),
                },
                FirmRow {
                    firm: "Cedar Partners".to_string(),
                    link: Some("https://www.axial.net/cedar".to_string()),
                },
            ]
        );
    }

    #[test]
    fn missing_column_is_fatal() {
        let result = parse_firm_rows("Firm,Link\nAcme,x\n", "PE Firm", None);
        assert!(matches!(result, Err(SheetError::MissingColumn(c)) if c == "PE Firm"));

        let result = parse_firm_rows("PE Firm\nAcme\n", "PE Firm", Some("Axial Link"));
        assert!(matches!(result, Err(SheetError::MissingColumn(c)) if c == "Axial Link"));
    }

    #[tokio::test]
    async fn local_file_source_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("firms.csv");
        std::fs::write(&path, SHEET).unwrap();

        let settings = SheetSettings {
            source: path.to_string_lossy().to_string(),
            ..SheetSettings::default()
        };
        let rows = load_firm_sheet(&settings, true).await.unwrap();

        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn remote_source_is_fetched() {
        use wiremock::{
            matchers::{method, path},
            Mock, MockServer, ResponseTemplate,
        };

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/export"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SHEET))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let text = read_sheet_source(&format!("{}/export", server.uri()))
            .await
            .unwrap();
        assert_eq!(text, SHEET);

        let result = read_sheet_source(&format!("{}/gone", server.uri())).await;
        assert!(matches!(result, Err(SheetError::Fetch { .. })));
    }
}
