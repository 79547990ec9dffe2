//! Wide-CSV ingestion: one row per (company, year), one column per line item.

use anyhow::{bail, Context, Result};
use ratio_core::{FinancialRecord, LineItem};
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    Company,
    Sector,
    Subsector,
    Year,
    Item(LineItem),
    Ignored,
}

impl Column {
    fn from_header(header: &str) -> Self {
        match header.trim().to_ascii_lowercase().as_str() {
            "company" => Column::Company,
            "sector" => Column::Sector,
            "subsector" => Column::Subsector,
            "year" => Column::Year,
            other => match other.parse::<LineItem>() {
                Ok(item) => Column::Item(item),
                Err(_) => {
                    tracing::warn!(column = other, "Ignoring unknown CSV column");
                    Column::Ignored
                }
            },
        }
    }
}

pub fn read_records(path: &Path) -> Result<Vec<FinancialRecord>> {
    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let records = parse_records(reader).with_context(|| format!("Failed to read {}", path.display()))?;
    tracing::info!(path = %path.display(), records = records.len(), "Loaded financial records");
    Ok(records)
}

pub fn parse_records<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<FinancialRecord>> {
    let columns: Vec<Column> = reader.headers()?.iter().map(Column::from_header).collect();
    for required in [Column::Company, Column::Sector, Column::Subsector, Column::Year] {
        if !columns.contains(&required) {
            bail!("missing required column {:?}", required);
        }
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("Malformed CSV row {}", index + 1))?;
        let record = parse_row(&columns, &row).with_context(|| format!("Invalid CSV row {}", index + 1))?;
        records.push(record);
    }
    Ok(records)
}

fn parse_row(columns: &[Column], row: &csv::StringRecord) -> Result<FinancialRecord> {
    let mut company = "";
    let mut sector = "";
    let mut subsector = "";
    let mut year = None;
    let mut items = Vec::new();

    for (column, cell) in columns.iter().zip(row.iter()) {
        let cell = cell.trim();
        match column {
            Column::Company => company = cell,
            Column::Sector => sector = cell,
            Column::Subsector => subsector = cell,
            Column::Year => {
                year = Some(cell.parse::<i32>().with_context(|| format!("year {:?} is not an integer", cell))?)
            }
            Column::Item(item) if !cell.is_empty() => {
                let value = cell
                    .parse::<f64>()
                    .with_context(|| format!("{} value {:?} is not a number", item, cell))?;
                items.push((*item, value));
            }
            Column::Item(_) | Column::Ignored => {}
        }
    }

    if company.is_empty() {
        bail!("company is empty");
    }
    let Some(year) = year else {
        bail!("year is missing for {}", company);
    };

    Ok(items
        .into_iter()
        .fold(FinancialRecord::new(company, sector, subsector, year), |record, (item, value)| {
            record.with(item, value)
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &str) -> Result<Vec<FinancialRecord>> {
        parse_records(csv::Reader::from_reader(data.as_bytes()))
    }

    #[test]
    fn test_wide_rows() {
        let data = "\
company,sector,subsector,year,revenue,net_income,Total_Assets,analyst_notes
AAPL,Technology,Hardware,2022,394328,99803,352755,strong
AAPL,Technology,Hardware,2023,383285,,352583,
";
        let records = parse(data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].company(), "AAPL");
        assert_eq!(records[0].subsector(), "Hardware");
        assert_eq!(records[0].get(LineItem::TotalAssets), Some(352755.0));
        assert_eq!(records[1].year(), 2023);
        assert_eq!(records[1].get(LineItem::NetIncome), None);
        assert_eq!(records[1].line_items().count(), 2);
    }

    #[test]
    fn test_missing_required_column() {
        let err = parse("company,sector,year,revenue\nAAPL,Technology,2022,1\n").unwrap_err();
        assert!(err.to_string().contains("Subsector"));
    }

    #[test]
    fn test_bad_number_is_reported_with_row() {
        let err = parse("company,sector,subsector,year,revenue\nMSFT,Technology,Software,2022,n/a\n").unwrap_err();
        assert!(err.to_string().contains("row 1"));
        assert!(format!("{:#}", err).contains("revenue"));
    }
}
