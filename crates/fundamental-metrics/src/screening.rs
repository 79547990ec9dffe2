//! Dashboard screens over a computed metric table: KPI top performers,
//! Altman/Beneish risk screens, the cross-company growth CAGR and the
//! top-growth fallback for an empty unconstrained view.

use crate::ranking::{compare, rank, RankRequest, RecordFilter, SortDirection, SortKey, UndefinedPolicy};
use ratio_core::stats::{compound_rate, mean, rounded_percent};
use ratio_core::{Metric, MetricSource, MetricValue, ScoreThresholds, Undefined};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The record with the best defined value of `metric` in `year`.
///
/// Ties resolve to the alphabetically first company.
pub fn top_performer<T: MetricSource>(
    rows: &[T],
    metric: Metric,
    year: i32,
    direction: SortDirection,
) -> Option<&T> {
    let key = SortKey { metric, direction };
    rows.iter()
        .filter(|row| row.year() == year && row.metric(metric).is_defined())
        .min_by(|a, b| compare(*a, *b, key))
}

/// Top `n` records by `metric` (descending) for `year`, undefined values excluded.
pub fn top_companies<T: MetricSource>(rows: &[T], metric: Metric, year: i32, n: usize) -> Vec<&T> {
    let request = RankRequest::new(SortKey::descending(metric))
        .with_filter(RecordFilter::new().year(year))
        .with_undefined(UndefinedPolicy::Exclude)
        .with_limit(n);
    rank(rows, &request)
}

/// Number of companies shown when an unconstrained view comes back empty
pub const FALLBACK_TOP_N: usize = 5;

/// Records behind a dashboard view.
#[derive(Debug)]
pub struct Selection<'a, T> {
    pub records: Vec<&'a T>,
    /// Year of the top-growth fallback, when it replaced an empty result
    pub fallback_year: Option<i32>,
}

/// Applies `filter`. When nothing matches and no sector, subsector or
/// company was chosen, falls back to the `n` companies with the highest YoY
/// revenue growth in the last year of the range, limited to that year.
///
/// The fallback year is the range's upper bound, clamped to the latest year
/// present in `rows`. Without a year range there is nothing to fall back on.
pub fn select_or_top<'a, T: MetricSource>(rows: &'a [T], filter: &RecordFilter, n: usize) -> Selection<'a, T> {
    let records = filter.apply(rows);
    if !records.is_empty() || !filter.is_unconstrained() {
        return Selection {
            records,
            fallback_year: None,
        };
    }

    let latest = rows.iter().map(|row| row.year()).max();
    let year = match (filter.years, latest) {
        (Some((_, hi)), Some(latest)) => hi.min(latest),
        _ => {
            return Selection {
                records,
                fallback_year: None,
            }
        }
    };

    let records = top_companies(rows, Metric::YoyRevenueGrowth, year, n);
    tracing::debug!(year, companies = records.len(), "Filter matched nothing, showing revenue-growth leaders");
    Selection {
        records,
        fallback_year: Some(year),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    /// Mean Altman Z below the distress threshold
    Distress,
    /// Mean Beneish M above the manipulation cutoff
    Manipulation,
}

impl RiskKind {
    pub fn metric(&self) -> Metric {
        match self {
            RiskKind::Distress => Metric::AltmanZScore,
            RiskKind::Manipulation => Metric::BeneishMScore,
        }
    }

    fn at_risk(&self, mean_score: f64, thresholds: &ScoreThresholds) -> bool {
        match self {
            RiskKind::Distress => mean_score < thresholds.altman_distress,
            RiskKind::Manipulation => mean_score > thresholds.beneish_cutoff,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScreen {
    pub kind: RiskKind,
    /// At-risk companies, sorted
    pub companies: Vec<String>,
    /// Rounded share of screened companies at risk; `None` when nothing was screened
    pub at_risk_percent: Option<f64>,
    /// Companies with at least one defined score in the window
    pub screened: usize,
}

/// Averages each company's defined scores over `years` (inclusive) and
/// flags those whose mean crosses the threshold for `kind`.
pub fn risk_screen<T: MetricSource>(
    rows: &[T],
    kind: RiskKind,
    years: (i32, i32),
    thresholds: &ScoreThresholds,
) -> RiskScreen {
    let metric = kind.metric();
    let (lo, hi) = years;

    let mut scores: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in rows.iter().filter(|row| (lo..=hi).contains(&row.year())) {
        if let Some(score) = row.metric(metric).value() {
            scores.entry(row.company()).or_default().push(score);
        }
    }

    let companies: Vec<String> = scores
        .iter()
        .filter_map(|(company, values)| {
            let average = mean(values)?;
            kind.at_risk(average, thresholds).then(|| company.to_string())
        })
        .collect();

    tracing::debug!(
        ?kind,
        screened = scores.len(),
        at_risk = companies.len(),
        "Risk screen evaluated"
    );

    RiskScreen {
        kind,
        at_risk_percent: rounded_percent(companies.len(), scores.len()),
        screened: scores.len(),
        companies,
    }
}

/// Companies flagged by either the distress or the manipulation screen, sorted.
pub fn companies_to_avoid<T: MetricSource>(
    rows: &[T],
    years: (i32, i32),
    thresholds: &ScoreThresholds,
) -> Vec<String> {
    let distress = risk_screen(rows, RiskKind::Distress, years, thresholds);
    let manipulation = risk_screen(rows, RiskKind::Manipulation, years, thresholds);
    distress
        .companies
        .into_iter()
        .chain(manipulation.companies)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Compounds the cross-company average of a growth metric over the years
/// `end_year - period ..= end_year`.
///
/// Years with no defined value are skipped. Undefined when no year has data
/// or the compounded factor is not positive.
pub fn growth_cagr<T: MetricSource>(rows: &[T], metric: Metric, end_year: i32, period: u32) -> MetricValue {
    let start_year = end_year.saturating_sub(i32::try_from(period).unwrap_or(i32::MAX));

    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for row in rows.iter().filter(|row| (start_year..=end_year).contains(&row.year())) {
        if let Some(value) = row.metric(metric).value() {
            by_year.entry(row.year()).or_default().push(value);
        }
    }

    if by_year.is_empty() {
        return MetricValue::Undefined(Undefined::InsufficientHistory);
    }

    let yearly: Vec<f64> = by_year.values().filter_map(|values| mean(values)).collect();
    match compound_rate(&yearly) {
        Some(rate) => MetricValue::Defined(rate),
        None => MetricValue::Undefined(Undefined::UndefinedRatio),
    }
}
