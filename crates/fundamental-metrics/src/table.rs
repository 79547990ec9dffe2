use ratio_core::{Metric, MetricRecord, MetricValue};
use serde::Serialize;
use std::collections::BTreeMap;

/// Derived metrics for every (company, year) of a dataset.
///
/// Records are ordered by company, then year.
#[derive(Debug, Clone, Default)]
pub struct MetricTable {
    records: Vec<MetricRecord>,
    index: BTreeMap<String, BTreeMap<i32, usize>>,
}

/// One cell of the long-format table handed to presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricRow<'a> {
    pub company: &'a str,
    pub sector: &'a str,
    pub subsector: &'a str,
    pub year: i32,
    pub metric: Metric,
    pub value: MetricValue,
}

impl MetricTable {
    pub(crate) fn from_records(records: Vec<MetricRecord>) -> Self {
        let mut index: BTreeMap<String, BTreeMap<i32, usize>> = BTreeMap::new();
        for (position, record) in records.iter().enumerate() {
            index
                .entry(record.company().to_string())
                .or_default()
                .insert(record.year(), position);
        }
        Self { records, index }
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, company: &str, year: i32) -> Option<&MetricRecord> {
        let position = *self.index.get(company)?.get(&year)?;
        self.records.get(position)
    }

    pub fn value(&self, company: &str, year: i32, metric: Metric) -> Option<MetricValue> {
        self.get(company, year).map(|record| record.get(metric))
    }

    pub fn companies(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.keys().map(String::as_str)
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.records.iter().map(MetricRecord::year).max()
    }

    /// Long-format view: one row per (company, year, metric).
    pub fn rows(&self) -> impl Iterator<Item = MetricRow<'_>> + '_ {
        self.records.iter().flat_map(MetricRow::expand)
    }

    /// Long-format rows for a filtered or ranked selection.
    pub fn rows_for<'a, I>(records: I) -> impl Iterator<Item = MetricRow<'a>>
    where
        I: IntoIterator<Item = &'a MetricRecord>,
    {
        records.into_iter().flat_map(MetricRow::expand)
    }
}

impl<'a> MetricRow<'a> {
    fn expand(record: &'a MetricRecord) -> impl Iterator<Item = MetricRow<'a>> + 'a {
        record.values().map(move |(metric, value)| MetricRow {
            company: record.company(),
            sector: record.sector(),
            subsector: record.subsector(),
            year: record.year(),
            metric,
            value,
        })
    }
}
