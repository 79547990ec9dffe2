//! Period-over-period deltas over one company's fiscal years.
//!
//! Neighbours are found by year value, so a gap in coverage makes the delta
//! across it undefined instead of silently comparing non-adjacent years.

use crate::ratios::ratio;
use crate::{Dataset, MetricTable};
use ratio_core::{FinancialRecord, LineItem, Metric, MetricRecord, MetricValue, Undefined};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A quantity that can be tracked over time: a raw line item or a derived metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Item(LineItem),
    Metric(Metric),
}

impl From<LineItem> for Measure {
    fn from(item: LineItem) -> Self {
        Measure::Item(item)
    }
}

impl From<Metric> for Measure {
    fn from(metric: Metric) -> Self {
        Measure::Metric(metric)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: MetricValue,
}

/// `(current - previous) / |previous|`
pub fn growth_rate(current: f64, previous: f64) -> MetricValue {
    ratio(current - previous, previous.abs()).into()
}

/// Growth from `previous` to `current`; `None` means there is no prior year.
pub fn yoy(current: MetricValue, previous: Option<MetricValue>) -> MetricValue {
    let Some(previous) = previous else {
        return MetricValue::Undefined(Undefined::InsufficientHistory);
    };
    match (current.into_result(), previous.into_result()) {
        (Ok(now), Ok(before)) => growth_rate(now, before),
        (Err(reason), _) | (_, Err(reason)) => MetricValue::Undefined(reason),
    }
}

/// `(end / start)^(1 / years) - 1`
///
/// Undefined when `years <= 0`, `start <= 0`, or the growth factor is not positive.
pub fn cagr(start_value: f64, end_value: f64, years: i32) -> MetricValue {
    if years <= 0 || start_value <= 0.0 {
        return MetricValue::Undefined(Undefined::UndefinedRatio);
    }
    let factor = end_value / start_value;
    if factor <= 0.0 || !factor.is_finite() {
        return MetricValue::Undefined(Undefined::UndefinedRatio);
    }
    MetricValue::from_f64(factor.powf(1.0 / f64::from(years)) - 1.0)
}

/// A fiscal year's raw record paired with its derived metrics.
#[derive(Debug, Clone, Copy)]
pub struct SeriesEntry<'a> {
    pub financial: &'a FinancialRecord,
    pub metrics: &'a MetricRecord,
}

impl SeriesEntry<'_> {
    pub fn measure(&self, measure: Measure) -> MetricValue {
        match measure {
            Measure::Item(item) => self.financial.field(item).into(),
            Measure::Metric(metric) => self.metrics.get(metric),
        }
    }
}

/// One company's years in ascending order. Borrows from the dataset and
/// table; never mutates either.
#[derive(Debug, Clone)]
pub struct CompanyTimeSeries<'a> {
    company: &'a str,
    entries: BTreeMap<i32, SeriesEntry<'a>>,
}

impl<'a> CompanyTimeSeries<'a> {
    /// `None` when the company has no records in both the dataset and the table.
    pub fn new(dataset: &'a Dataset, table: &'a MetricTable, company: &str) -> Option<Self> {
        let entries: BTreeMap<i32, SeriesEntry<'a>> = dataset
            .company_records(company)
            .filter_map(|financial| {
                let metrics = table.get(company, financial.year())?;
                Some((financial.year(), SeriesEntry { financial, metrics }))
            })
            .collect();

        let company = entries.values().next()?.financial.company();
        Some(Self { company, entries })
    }

    pub fn company(&self) -> &'a str {
        self.company
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + Clone + '_ {
        self.entries.keys().copied()
    }

    pub fn entry(&self, year: i32) -> Option<&SeriesEntry<'a>> {
        self.entries.get(&year)
    }

    /// `None` when the year is not covered.
    pub fn value(&self, measure: impl Into<Measure>, year: i32) -> Option<MetricValue> {
        let measure = measure.into();
        self.entries.get(&year).map(|entry| entry.measure(measure))
    }

    pub fn values(&self, measure: impl Into<Measure>) -> impl Iterator<Item = YearValue> + Clone + '_ {
        let measure = measure.into();
        self.entries.iter().map(move |(&year, entry)| YearValue {
            year,
            value: entry.measure(measure),
        })
    }

    /// Lazy YoY growth per covered year. The first year, and any year after a
    /// gap, is `InsufficientHistory`.
    pub fn yoy_growth(&self, measure: impl Into<Measure>) -> impl Iterator<Item = YearValue> + Clone + '_ {
        let measure = measure.into();
        self.entries.iter().map(move |(&year, entry)| YearValue {
            year,
            value: yoy(entry.measure(measure), self.value(measure, year - 1)),
        })
    }

    /// CAGR between two covered years.
    pub fn cagr(&self, measure: impl Into<Measure>, year_start: i32, year_end: i32) -> MetricValue {
        if year_end <= year_start {
            return MetricValue::Undefined(Undefined::UndefinedRatio);
        }
        let measure = measure.into();
        let (Some(start), Some(end)) = (self.value(measure, year_start), self.value(measure, year_end)) else {
            return MetricValue::Undefined(Undefined::InsufficientHistory);
        };
        match (start.into_result(), end.into_result()) {
            (Ok(start), Ok(end)) => cagr(start, end, year_end - year_start),
            (Err(reason), _) | (_, Err(reason)) => MetricValue::Undefined(reason),
        }
    }
}
