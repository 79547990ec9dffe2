use approx::assert_relative_eq;
use ratio_core::{
    AltmanZone, FinancialRecord, LineItem, Metric, MetricRecord, MetricValue, ScoreThresholds,
    Undefined,
};

use crate::screening::{companies_to_avoid, growth_cagr, top_performer};
use crate::{
    rank, CompanyTimeSeries, Dataset, MetricEngine, MetricTable, RankRequest, RecordFilter,
    SortDirection, SortKey, UndefinedPolicy,
};

/// A complete statement for one year, every monetary field scaled by `scale`.
fn full(company: &str, subsector: &str, year: i32, scale: f64) -> FinancialRecord {
    use LineItem::*;
    let items = [
        (Revenue, 1_000.0),
        (CostOfRevenue, 600.0),
        (SellingGeneralAdmin, 150.0),
        (DepreciationAmortization, 40.0),
        (Ebit, 200.0),
        (Ebitda, 240.0),
        (InterestExpense, 20.0),
        (NetIncome, 150.0),
        (OperatingCashFlow, 190.0),
        (TotalAssets, 2_000.0),
        (CurrentAssets, 800.0),
        (CurrentLiabilities, 400.0),
        (TotalLiabilities, 1_000.0),
        (TotalDebt, 500.0),
        (LongTermDebt, 400.0),
        (ShareholdersEquity, 1_000.0),
        (RetainedEarnings, 600.0),
        (Cash, 200.0),
        (CashEquivalents, 100.0),
        (Receivables, 150.0),
        (Inventory, 100.0),
        (PropertyPlantEquipment, 500.0),
        (MarketCapitalization, 4_000.0),
    ];
    items
        .into_iter()
        .fold(FinancialRecord::new(company, "Technology", subsector, year), |record, (item, value)| {
            record.with(item, value * scale)
        })
        .with(SharesOutstanding, 100.0)
}

fn dataset() -> Dataset {
    Dataset::new([
        full("CSCO", "Networking", 2020, 1.0),
        full("CSCO", "Networking", 2021, 1.1),
        full("CSCO", "Networking", 2022, 1.21),
        full("AVGO", "Semiconductors", 2022, 1.0).with(LineItem::TotalDebt, 1_500.0),
        FinancialRecord::new("ZS", "Technology", "Security", 2022).with(LineItem::Revenue, 1_600.0),
    ])
    .unwrap()
}

fn table() -> MetricTable {
    MetricEngine::new().compute(&dataset())
}

fn companies(ranked: &[&MetricRecord]) -> Vec<(String, i32)> {
    ranked.iter().map(|r| (r.company().to_string(), r.year())).collect()
}

#[test]
fn test_table_covers_every_metric() {
    let table = table();
    assert_eq!(table.len(), 5);
    assert_eq!(table.rows().count(), 5 * Metric::ALL.len());
    assert_eq!(table.latest_year(), Some(2022));
    assert_eq!(table.companies().collect::<Vec<_>>(), vec!["AVGO", "CSCO", "ZS"]);

    let sparse = table.get("ZS", 2022).unwrap();
    assert_eq!(
        sparse.get(Metric::AssetTurnover),
        MetricValue::Undefined(Undefined::MissingInput(LineItem::TotalAssets))
    );
    assert_eq!(sparse.labels().altman_zone, None);
    assert_eq!(sparse.labels().manipulation_flag, None);
}

#[test]
fn test_recomputation_is_bit_identical() {
    let dataset = dataset();
    let engine = MetricEngine::new();
    let first = engine.compute(&dataset);
    let second = engine.compute(&dataset);
    for (a, b) in first.records().iter().zip(second.records()) {
        for ((metric, x), (_, y)) in a.values().zip(b.values()) {
            match (x, y) {
                (MetricValue::Defined(x), MetricValue::Defined(y)) => {
                    assert_eq!(x.to_bits(), y.to_bits(), "{metric} differs")
                }
                _ => assert_eq!(x, y),
            }
        }
    }
}

#[test]
fn test_yoy_growth_needs_prior_year() {
    let table = table();
    assert_eq!(
        table.value("CSCO", 2020, Metric::YoyRevenueGrowth),
        Some(MetricValue::Undefined(Undefined::InsufficientHistory))
    );
    assert_relative_eq!(
        table.value("CSCO", 2021, Metric::YoyRevenueGrowth).unwrap().value().unwrap(),
        0.1,
        epsilon = 1e-12
    );
    assert_relative_eq!(
        table.value("CSCO", 2022, Metric::YoyEpsGrowth).unwrap().value().unwrap(),
        0.1,
        epsilon = 1e-12
    );
    assert_eq!(
        table.value("AVGO", 2022, Metric::YoyEpsGrowth),
        Some(MetricValue::Undefined(Undefined::InsufficientHistory))
    );
}

#[test]
fn test_composites_and_labels() {
    let table = table();
    for record in table.records() {
        let f = record.get(Metric::PiotroskiFScore).value().unwrap();
        assert!((0.0..=9.0).contains(&f));
        assert_eq!(f.fract(), 0.0);
    }
    // without a prior year only the three single-year tests can pass
    assert_eq!(table.value("CSCO", 2020, Metric::PiotroskiFScore), Some(MetricValue::Defined(3.0)));

    let csco = table.get("CSCO", 2021).unwrap();
    // 1.2*0.2 + 1.4*0.3 + 3.3*0.1 + 0.6*4.0 + 0.5
    assert_relative_eq!(csco.get(Metric::AltmanZScore).value().unwrap(), 3.89, epsilon = 1e-9);
    assert_eq!(csco.labels().altman_zone, Some(AltmanZone::Safe));
    assert_eq!(csco.labels().manipulation_flag, Some(false));

    let first = table.get("CSCO", 2020).unwrap();
    assert_eq!(
        first.get(Metric::BeneishMScore),
        MetricValue::Undefined(Undefined::InsufficientHistory)
    );
    assert_eq!(first.labels().manipulation_flag, None);
}

#[test]
fn test_thresholds_drive_labels() {
    let strict = ScoreThresholds::new(4.0, 5.0, -2.6).unwrap();
    let table = MetricEngine::with_thresholds(strict).unwrap().compute(&dataset());
    let labels = table.get("CSCO", 2021).unwrap().labels();
    assert_eq!(labels.altman_zone, Some(AltmanZone::Distress));
    assert_eq!(labels.manipulation_flag, Some(true));

    let inverted = ScoreThresholds {
        altman_distress: 3.0,
        altman_safe: 2.0,
        beneish_cutoff: -2.22,
    };
    assert!(MetricEngine::with_thresholds(inverted).is_err());
}

#[test]
fn test_ranking_places_undefined_last() {
    let table = table();
    let records = table.records();

    for direction in [SortDirection::Ascending, SortDirection::Descending] {
        let key = SortKey {
            metric: Metric::DebtToEquity,
            direction,
        };
        let ranked = rank(records, &RankRequest::new(key));
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked.last().unwrap().company(), "ZS");
        assert!(ranked[..4].iter().all(|r| r.get(Metric::DebtToEquity).is_defined()));
    }

    let top = rank(records, &RankRequest::new(SortKey::descending(Metric::DebtToEquity)));
    assert_eq!(companies(&top[..1]), vec![("AVGO".to_string(), 2022)]);

    let defined_only = RankRequest::new(SortKey::ascending(Metric::DebtToEquity))
        .with_undefined(UndefinedPolicy::Exclude);
    assert_eq!(rank(records, &defined_only).len(), 4);
}

#[test]
fn test_filters_on_table() {
    let table = table();
    let records = table.records();

    let absent = RankRequest::new(SortKey::descending(Metric::NetMargin))
        .with_filter(RecordFilter::new().sectors(["Utilities"]));
    assert!(rank(records, &absent).is_empty());

    let networking = RankRequest::new(SortKey::ascending(Metric::NetMargin)).with_filter(
        RecordFilter::new()
            .subsectors(["Networking"])
            .year_range(2021, 2022),
    );
    let ranked = rank(records, &networking);
    assert_eq!(ranked.len(), 2);
    assert!(ranked.iter().all(|r| r.company() == "CSCO" && r.year() >= 2021));

    let export: Vec<_> = MetricTable::rows_for(ranked.iter().copied()).collect();
    assert_eq!(export.len(), 2 * Metric::ALL.len());
    let json = serde_json::to_string(&export[0]).unwrap();
    assert!(json.contains("\"company\":\"CSCO\""));
}

#[test]
fn test_dashboard_screens_on_table() {
    let table = table();
    let records = table.records();

    let best = top_performer(records, Metric::YoyRevenueGrowth, 2022, SortDirection::Descending).unwrap();
    assert_eq!(best.company(), "CSCO");

    assert!(companies_to_avoid(records, (2020, 2022), &ScoreThresholds::default()).is_empty());

    let eps_cagr = growth_cagr(records, Metric::YoyEpsGrowth, 2022, 2);
    assert_relative_eq!(eps_cagr.value().unwrap(), 0.1, epsilon = 1e-9);
}

#[test]
fn test_company_series_over_table() {
    let dataset = dataset();
    let table = MetricEngine::new().compute(&dataset);
    let series = CompanyTimeSeries::new(&dataset, &table, "CSCO").unwrap();

    assert_eq!(series.years().collect::<Vec<_>>(), vec![2020, 2021, 2022]);
    assert_relative_eq!(
        series.cagr(LineItem::Revenue, 2020, 2022).value().unwrap(),
        0.1,
        epsilon = 1e-9
    );
    let margins: Vec<_> = series.values(Metric::GrossMargin).collect();
    assert!(margins.iter().all(|point| point.value.is_defined()));
}
