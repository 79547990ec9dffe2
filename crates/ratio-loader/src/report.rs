use fundamental_metrics::ranking::{available_companies, available_sectors, available_subsectors};
use fundamental_metrics::screening::{self, RiskKind, RiskScreen, Selection, FALLBACK_TOP_N};
use fundamental_metrics::{rank, MetricRow, MetricTable, RankRequest, SortDirection, SortKey};
use ratio_core::{AltmanZone, Metric, MetricRecord, MetricValue, ScoreThresholds};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::cli::{FilterArgs, OptionsArgs, RankArgs, SummaryArgs};

/// KPI tiles shown for the reporting year
const KPI_METRICS: [Metric; 3] = [
    Metric::PriceToEarnings,
    Metric::YoyRevenueGrowth,
    Metric::DebtToEquity,
];

#[derive(Debug, Serialize)]
pub struct Kpi {
    pub metric: Metric,
    pub label: &'static str,
    pub company: Option<String>,
    pub value: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub year: i32,
    pub window: (i32, i32),
    pub kpis: Vec<Kpi>,
    /// Leaders by YoY revenue growth in the reporting year
    pub top_companies: Vec<String>,
    pub distress: RiskScreen,
    pub manipulation: RiskScreen,
    pub companies_to_avoid: Vec<String>,
    pub eps_growth_cagr: MetricValue,
}

/// Filter choices for the dashboard sidebar
#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub sectors: Vec<String>,
    pub subsectors: Vec<String>,
    pub companies: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RankedEntry<'a> {
    pub rank: usize,
    pub company: &'a str,
    pub sector: &'a str,
    pub subsector: &'a str,
    pub year: i32,
    pub value: MetricValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altman_zone: Option<AltmanZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manipulation_flag: Option<bool>,
}

/// `None` when the table is empty.
pub fn summary(table: &MetricTable, thresholds: &ScoreThresholds, args: &SummaryArgs) -> Option<Summary> {
    let records = table.records();
    let year = args.year.or_else(|| table.latest_year())?;
    let span = i32::try_from(args.risk_years.max(1)).unwrap_or(i32::MAX);
    let window = (args.since.unwrap_or_else(|| year.saturating_sub(span - 1)), year);

    let kpis: Vec<Kpi> = KPI_METRICS
        .iter()
        .map(|&metric| {
            let best = screening::top_performer(records, metric, year, SortDirection::Descending);
            Kpi {
                metric,
                label: metric.to_label(),
                company: best.map(|r| r.company().to_string()),
                value: best.and_then(|r| r.get(metric).value()),
            }
        })
        .collect();

    let top_companies = screening::top_companies(records, Metric::YoyRevenueGrowth, year, args.top)
        .into_iter()
        .map(|r| r.company().to_string())
        .collect();

    let distress = screening::risk_screen(records, RiskKind::Distress, window, thresholds);
    let manipulation = screening::risk_screen(records, RiskKind::Manipulation, window, thresholds);
    tracing::info!(
        year,
        distress = distress.companies.len(),
        manipulation = manipulation.companies.len(),
        "Risk screens complete"
    );

    Some(Summary {
        year,
        window,
        kpis,
        top_companies,
        companies_to_avoid: screening::companies_to_avoid(records, window, thresholds),
        distress,
        manipulation,
        eps_growth_cagr: screening::growth_cagr(records, Metric::YoyEpsGrowth, year, args.cagr_period),
    })
}

pub fn ranked<'a>(table: &'a MetricTable, args: &RankArgs) -> Vec<RankedEntry<'a>> {
    let selection = select(table, &args.filter);
    let mut request = RankRequest::new(SortKey {
        metric: args.metric,
        direction: args.direction.into(),
    })
    .with_undefined(args.undefined_policy());
    if let Some(limit) = args.limit {
        request = request.with_limit(limit);
    }

    let result: Vec<&MetricRecord> = rank(&selection.records, &request).into_iter().copied().collect();
    if result.is_empty() {
        tracing::warn!(metric = %args.metric, "No records matched the filter");
    }

    result
        .into_iter()
        .enumerate()
        .map(|(index, record)| RankedEntry {
            rank: index + 1,
            company: record.company(),
            sector: record.sector(),
            subsector: record.subsector(),
            year: record.year(),
            value: record.get(args.metric),
            altman_zone: record.labels().altman_zone,
            manipulation_flag: record.labels().manipulation_flag,
        })
        .collect()
}

pub fn export<'a>(table: &'a MetricTable, args: &FilterArgs) -> Vec<MetricRow<'a>> {
    MetricTable::rows_for(select(table, args).records).collect()
}

pub fn options(table: &MetricTable, args: &OptionsArgs) -> FilterOptions {
    let records = table.records();
    let sectors: BTreeSet<String> = args.sectors.iter().cloned().collect();
    let subsectors: BTreeSet<String> = args.subsectors.iter().cloned().collect();
    FilterOptions {
        sectors: available_sectors(records),
        subsectors: available_subsectors(records, &sectors),
        companies: available_companies(records, &sectors, &subsectors),
    }
}

fn select<'a>(table: &'a MetricTable, args: &FilterArgs) -> Selection<'a, MetricRecord> {
    let selection = screening::select_or_top(table.records(), &args.to_filter(), FALLBACK_TOP_N);
    if let Some(year) = selection.fallback_year {
        tracing::info!(year, "No data for the selection, showing top revenue-growth companies");
    }
    selection
}
