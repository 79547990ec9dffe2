pub mod composite;
pub mod dataset;
pub mod ranking;
pub mod ratios;
pub mod screening;
pub mod table;
pub mod timeseries;

#[cfg(test)]
mod tests;

pub use dataset::Dataset;
pub use ranking::{rank, RankRequest, RecordFilter, SortDirection, SortKey, UndefinedPolicy};
pub use table::{MetricRow, MetricTable};
pub use timeseries::{CompanyTimeSeries, Measure, YearValue};

use composite::{altman_z_score, altman_zone, beneish_m_score, manipulation_flag, piotroski_f_score};
use ratio_core::{
    FinancialRecord, LineItem, Metric, MetricRecord, MetricValue, Result, RiskLabels,
    ScoreThresholds, Undefined,
};

/// Builds the derived metric table from a dataset of raw records.
#[derive(Debug, Clone, Default)]
pub struct MetricEngine {
    thresholds: ScoreThresholds,
}

impl MetricEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: ScoreThresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &ScoreThresholds {
        &self.thresholds
    }

    /// Every metric for one record. The prior year, when present, is the
    /// same company's record for `year - 1`.
    pub fn compute_record(&self, dataset: &Dataset, record: &FinancialRecord) -> MetricRecord {
        let prior = dataset.prior(record);

        let altman = altman_z_score(record);
        let beneish = beneish_m_score(record, prior);
        let piotroski = piotroski_f_score(record, prior);

        let labels = RiskLabels {
            altman_zone: altman.value().map(|z| altman_zone(z, &self.thresholds)),
            manipulation_flag: beneish.value().map(|m| manipulation_flag(m, &self.thresholds)),
        };

        let yoy_revenue = timeseries::yoy(
            record.field(LineItem::Revenue).into(),
            prior.map(|p| p.field(LineItem::Revenue).into()),
        );
        let yoy_eps = timeseries::yoy(eps(record), prior.map(eps));

        MetricRecord::from_fn(record, labels, |metric| match metric {
            Metric::AltmanZScore => altman,
            Metric::BeneishMScore => beneish,
            Metric::PiotroskiFScore => piotroski,
            Metric::YoyRevenueGrowth => yoy_revenue,
            Metric::YoyEpsGrowth => yoy_eps,
            ratio => ratios::evaluate(ratio, record)
                .unwrap_or(MetricValue::Undefined(Undefined::UndefinedRatio)),
        })
    }

    /// Computes every record of `dataset`, ordered by company then year.
    pub fn compute(&self, dataset: &Dataset) -> MetricTable {
        let records = self.compute_all(dataset);

        let undefined = records
            .iter()
            .flat_map(|r| r.values())
            .filter(|(_, value)| !value.is_defined())
            .count();
        tracing::debug!(
            records = records.len(),
            metrics = records.len() * Metric::ALL.len(),
            undefined,
            "Metric table computed"
        );

        MetricTable::from_records(records)
    }

    #[cfg(feature = "parallel")]
    fn compute_all(&self, dataset: &Dataset) -> Vec<MetricRecord> {
        use rayon::prelude::*;

        let sources: Vec<&FinancialRecord> = dataset.records().collect();
        sources
            .par_iter()
            .map(|record| self.compute_record(dataset, record))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn compute_all(&self, dataset: &Dataset) -> Vec<MetricRecord> {
        dataset
            .records()
            .map(|record| self.compute_record(dataset, record))
            .collect()
    }
}

fn eps(record: &FinancialRecord) -> MetricValue {
    ratios::evaluate(Metric::EarningsPerShare, record)
        .unwrap_or(MetricValue::Undefined(Undefined::UndefinedRatio))
}
