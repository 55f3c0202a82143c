//! Field-level summary table (one row per field x year) with arbitrary
//! columns, filtered by the session selection and reordered for display.

use agro_core::error::Result;
use agro_core::filter::{FilterState, Selection};
use serde::Serialize;

/// Identity columns in display order, each with its accepted header names.
const IDENTITY_COLUMNS: [&[&str]; 5] = [
    &["Field", "Поле"],
    &["Cluster"],
    &["Block"],
    &["Culture"],
    &["Year", "Рік"],
];

const FROST_MARKERS: [&str; 2] = ["frost", "мороз"];

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FieldSummary {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn is_frost_column(header: &str) -> bool {
    let lower = header.to_lowercase();
    FROST_MARKERS.iter().any(|m| lower.contains(m))
}

impl FieldSummary {
    /// Parse a headed CSV. A leading byte-order mark is ignored.
    pub fn from_csv(csv_data: &str) -> Result<Self> {
        let csv_data = csv_data.strip_prefix(BOM).unwrap_or(csv_data);
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }
        log::info!("[Agro] field_summary: Loaded {} field rows", rows.len());
        Ok(FieldSummary { headers, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column(&self, names: &[&str]) -> Option<usize> {
        self.headers.iter().position(|h| names.contains(&h.as_str()))
    }

    /// Keep rows matching the selection. Columns absent from the table do
    /// not filter. Years compare as text, with a numeric fallback for cells
    /// such as `2024.0`.
    pub fn filter(&self, filter: &FilterState, selected_years: &[i32]) -> FieldSummary {
        let year_col = self.column(IDENTITY_COLUMNS[4]);
        let label_cols = [
            (self.column(IDENTITY_COLUMNS[1]), &filter.clusters),
            (self.column(IDENTITY_COLUMNS[2]), &filter.blocks),
            (self.column(IDENTITY_COLUMNS[3]), &filter.cultures),
        ];

        let year_matches = |cell: &str| {
            let cell = cell.trim();
            selected_years.iter().any(|y| y.to_string() == cell)
                || cell
                    .parse::<f64>()
                    .is_ok_and(|v| selected_years.iter().any(|&y| (v - y as f64).abs() < f64::EPSILON))
        };
        let label_matches = |selection: &Selection<String>, cell: &str| match selection.values() {
            None => true,
            Some(values) => values.iter().any(|v| v == cell),
        };

        let rows = self
            .rows
            .iter()
            .filter(|row| match year_col {
                Some(i) if !selected_years.is_empty() => year_matches(&row[i]),
                _ => true,
            })
            .filter(|row| {
                label_cols.iter().all(|(col, selection)| match col {
                    Some(i) => label_matches(selection, &row[*i]),
                    None => true,
                })
            })
            .cloned()
            .collect();
        FieldSummary {
            headers: self.headers.clone(),
            rows,
        }
    }

    /// Identity columns first, frost columns last, the rest in between in
    /// their original order.
    pub fn ordered(&self) -> FieldSummary {
        let mut order: Vec<usize> = IDENTITY_COLUMNS
            .iter()
            .filter_map(|names| self.column(names))
            .collect();
        let identity = order.clone();
        let (frost, other): (Vec<usize>, Vec<usize>) = (0..self.headers.len())
            .filter(|i| !identity.contains(i))
            .partition(|&i| is_frost_column(&self.headers[i]));
        order.extend(other);
        order.extend(frost);

        FieldSummary {
            headers: order.iter().map(|&i| self.headers[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| order.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY_CSV: &str = "\u{feff}\
Frost days,Culture,Field,Area,Year,Cluster,Block,Кількість морозів
2,Wheat,F-01,120.5,2024,North,B1,1
0,Corn,F-02,80,2024,South,B2,0
4,Wheat,F-01,120.5,2023.0,North,B1,3
";

    #[test]
    fn strips_bom_and_reads_headers() {
        let summary = FieldSummary::from_csv(SUMMARY_CSV).unwrap();
        assert_eq!(summary.headers[0], "Frost days");
        assert_eq!(summary.len(), 3);
    }

    #[test]
    fn orders_identity_then_other_then_frost() {
        let summary = FieldSummary::from_csv(SUMMARY_CSV).unwrap().ordered();
        assert_eq!(
            summary.headers,
            vec![
                "Field",
                "Cluster",
                "Block",
                "Culture",
                "Year",
                "Area",
                "Frost days",
                "Кількість морозів"
            ]
        );
        assert_eq!(summary.rows[0], vec!["F-01", "North", "B1", "Wheat", "2024", "120.5", "2", "1"]);
    }

    #[test]
    fn filters_by_years_and_labels() {
        let summary = FieldSummary::from_csv(SUMMARY_CSV).unwrap();
        let all = FilterState::default();
        assert_eq!(summary.filter(&all, &[2024]).len(), 2);
        // numeric fallback for "2023.0"
        assert_eq!(summary.filter(&all, &[2023]).len(), 1);

        let wheat = FilterState {
            cultures: Selection::only(vec!["Wheat".to_string()]),
            ..FilterState::default()
        };
        assert_eq!(summary.filter(&wheat, &[2023, 2024]).len(), 2);
        assert!(summary.filter(&wheat, &[2022]).is_empty());
    }

    #[test]
    fn missing_columns_do_not_filter() {
        let summary = FieldSummary::from_csv("Field,Area\nF-01,10\n").unwrap();
        let filter = FilterState {
            clusters: Selection::only(vec!["North".to_string()]),
            ..FilterState::default()
        };
        assert_eq!(summary.filter(&filter, &[2024]).len(), 1);
    }
}
