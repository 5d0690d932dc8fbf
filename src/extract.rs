use crate::error::{EtlError, Result};
use crate::types::BankRecord;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

/// Minimum number of `<td>` cells a data row must carry: the name lives at
/// index 1 and the USD market cap at index 2.
pub const EXPECTED_ROW_CELLS: usize = 3;

/// Fetch the source page and parse its first table body into bank records.
/// A single unbounded-wait GET; no retry on failure.
pub fn extract(client: &Client, url: &str, expected_cells: usize) -> Result<Vec<BankRecord>> {
    info!("Fetching bank table from {}", url);
    let body = client.get(url).send()?.error_for_status()?.text()?;
    let records = parse_bank_table(&body, expected_cells)?;
    info!("Extracted {} bank records", records.len());
    Ok(records)
}

/// Parse the first `<tbody>` of the document, one record per row.
///
/// Rows with zero `<td>` cells are header/separator rows and are skipped.
/// Any other malformed row (too few cells, unparseable market cap) fails the
/// whole extraction rather than producing a partial table.
pub fn parse_bank_table(html: &str, expected_cells: usize) -> Result<Vec<BankRecord>> {
    let tbody_selector = Selector::parse("tbody").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();
    let td_selector = Selector::parse("td").unwrap();

    let document = Html::parse_document(html);
    let tbody = document
        .select(&tbody_selector)
        .next()
        .ok_or_else(|| EtlError::MalformedRow {
            row: 0,
            message: "document contains no <tbody> element".to_string(),
        })?;

    let mut records = Vec::new();
    for (row_index, row) in tbody.select(&tr_selector).enumerate() {
        let cells: Vec<ElementRef> = row.select(&td_selector).collect();
        if cells.is_empty() {
            // header or separator row
            continue;
        }
        if cells.len() < expected_cells {
            return Err(EtlError::MalformedRow {
                row: row_index,
                message: format!("{} cells, expected at least {}", cells.len(), expected_cells),
            });
        }

        let name = cell_text(&cells[1]);
        let raw_cap = cell_text(&cells[2]);
        let mc_usd_billion: f64 = raw_cap.parse().map_err(|_| EtlError::MalformedRow {
            row: row_index,
            message: format!("market cap {raw_cap:?} is not a number"),
        })?;

        records.push(BankRecord {
            name,
            mc_usd_billion,
        });
    }

    if records.is_empty() {
        warn!("No data rows found - the page structure may have changed");
    }
    Ok(records)
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &str) -> String {
        format!("<html><body><table><tbody>{rows}</tbody></table></body></html>")
    }

    #[test]
    fn parses_data_rows_in_order() {
        let html = table(
            "<tr><th>Rank</th><th>Bank name</th><th>Market cap</th></tr>\
             <tr><td>1</td><td> JPMorgan Chase </td><td>432.92\n</td></tr>\
             <tr><td>2</td><td>Bank of America</td><td>231.52</td></tr>\
             <tr><td>3</td><td>ICBC</td><td>194.56</td></tr>",
        );
        let records = parse_bank_table(&html, EXPECTED_ROW_CELLS).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "JPMorgan Chase");
        assert_eq!(records[0].mc_usd_billion, 432.92);
        assert_eq!(records[2].name, "ICBC");
    }

    #[test]
    fn header_rows_without_td_cells_are_skipped() {
        let html = table(
            "<tr><th>Rank</th><th>Bank name</th><th>Market cap</th></tr>\
             <tr><td>1</td><td>Bank A</td><td>100.0</td></tr>",
        );
        let records = parse_bank_table(&html, EXPECTED_ROW_CELLS).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn unparseable_market_cap_fails_whole_extraction() {
        let html = table(
            "<tr><td>1</td><td>Bank A</td><td>100.0</td></tr>\
             <tr><td>2</td><td>Bank B</td><td>n/a</td></tr>",
        );
        let err = parse_bank_table(&html, EXPECTED_ROW_CELLS).unwrap_err();
        match err {
            EtlError::MalformedRow { row, message } => {
                assert_eq!(row, 1);
                assert!(message.contains("n/a"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_row_fails_whole_extraction() {
        let html = table("<tr><td>1</td><td>Bank A</td></tr>");
        assert!(matches!(
            parse_bank_table(&html, EXPECTED_ROW_CELLS),
            Err(EtlError::MalformedRow { row: 0, .. })
        ));
    }

    #[test]
    fn document_without_tbody_is_an_error() {
        let err = parse_bank_table("<html><body><p>no table</p></body></html>", 3).unwrap_err();
        assert!(matches!(err, EtlError::MalformedRow { .. }));
    }

    #[test]
    fn only_first_tbody_is_read() {
        let html = "<html><body>\
             <table><tbody><tr><td>1</td><td>Bank A</td><td>100.0</td></tr></tbody></table>\
             <table><tbody><tr><td>1</td><td>Bank Z</td><td>1.0</td></tr></tbody></table>\
             </body></html>";
        let records = parse_bank_table(html, EXPECTED_ROW_CELLS).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Bank A");
    }
}
