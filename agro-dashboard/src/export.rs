//! CSV exports of the tables page.

use agro_data::field_summary::FieldSummary;

use crate::views::tables::AggregatedTable;

pub const AGGREGATED_FILE_NAME: &str = "agro_report_agg.csv";
pub const FIELDS_FILE_NAME: &str = "fields_summary.csv";

/// UTF-8 byte-order mark, so spreadsheet tools detect the encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Aggregated report as UTF-8 CSV. Missing values are empty cells.
pub fn aggregated_csv(table: &AggregatedTable) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        let mut record = vec![
            row.cluster.clone(),
            row.block.clone(),
            row.culture.clone(),
            row.year.to_string(),
            row.date.clone(),
        ];
        record.extend(row.cells.iter().map(|c| c.map(|v| v.to_string()).unwrap_or_default()));
        wtr.write_record(&record)?;
    }
    Ok(wtr.into_inner().map_err(|e| e.into_error())?)
}

/// Field summary as UTF-8 CSV with a leading byte-order mark.
pub fn fields_csv(summary: &FieldSummary) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(UTF8_BOM.to_vec());
    wtr.write_record(&summary.headers)?;
    for row in &summary.rows {
        wtr.write_record(row)?;
    }
    Ok(wtr.into_inner().map_err(|e| e.into_error())?)
}
