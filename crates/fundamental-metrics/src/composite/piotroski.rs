use crate::ratios::{positive_ratio, value_of};
use ratio_core::{FinancialRecord, LineItem, Metric, MetricValue, Undefined};
use serde::{Deserialize, Serialize};

/// Outcome of each of the nine Piotroski tests.
///
/// A test whose inputs are missing or undefined, including a missing prior
/// year, scores 0 rather than making the whole score undefined. Companies
/// with a single year of history can therefore reach at most 3 points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiotroskiBreakdown {
    pub positive_net_income: bool,
    pub positive_operating_cash_flow: bool,
    pub improving_return_on_assets: bool,
    pub cash_flow_exceeds_net_income: bool,
    pub decreasing_leverage: bool,
    pub improving_current_ratio: bool,
    pub no_share_dilution: bool,
    pub improving_gross_margin: bool,
    pub improving_asset_turnover: bool,
}

impl PiotroskiBreakdown {
    pub fn evaluate(current: &FinancialRecord, prior: Option<&FinancialRecord>) -> Self {
        let prior = prior.filter(|p| p.company() == current.company() && p.year() == current.year() - 1);

        let net_income = current.field(LineItem::NetIncome);
        let operating_cash_flow = current.field(LineItem::OperatingCashFlow);

        Self {
            positive_net_income: matches!(net_income, Ok(ni) if ni > 0.0),
            positive_operating_cash_flow: matches!(operating_cash_flow, Ok(cfo) if cfo > 0.0),
            improving_return_on_assets: compare(current, prior, |r| value_of(Metric::ReturnOnAssets, r), higher),
            cash_flow_exceeds_net_income: matches!(
                (operating_cash_flow, net_income),
                (Ok(cfo), Ok(ni)) if cfo > ni
            ),
            decreasing_leverage: compare(current, prior, long_term_leverage, lower),
            improving_current_ratio: compare(current, prior, |r| value_of(Metric::CurrentRatio, r), higher),
            no_share_dilution: compare(current, prior, |r| r.field(LineItem::SharesOutstanding), not_higher),
            improving_gross_margin: compare(current, prior, |r| value_of(Metric::GrossMargin, r), higher),
            improving_asset_turnover: compare(current, prior, |r| value_of(Metric::AssetTurnover, r), higher),
        }
    }

    pub fn tests(&self) -> [(&'static str, bool); 9] {
        [
            ("Positive Net Income", self.positive_net_income),
            ("Positive Operating Cash Flow", self.positive_operating_cash_flow),
            ("Improving ROA", self.improving_return_on_assets),
            ("Cash Flow Exceeds Net Income", self.cash_flow_exceeds_net_income),
            ("Decreasing Leverage", self.decreasing_leverage),
            ("Improving Current Ratio", self.improving_current_ratio),
            ("No Share Dilution", self.no_share_dilution),
            ("Improving Gross Margin", self.improving_gross_margin),
            ("Improving Asset Turnover", self.improving_asset_turnover),
        ]
    }

    /// Number of passed tests, 0 to 9.
    pub fn score(&self) -> u8 {
        self.tests().iter().filter(|(_, passed)| *passed).count() as u8
    }
}

fn long_term_leverage(r: &FinancialRecord) -> Result<f64, Undefined> {
    positive_ratio(r.field(LineItem::LongTermDebt)?, r.field(LineItem::TotalAssets)?)
}

fn higher(now: f64, before: f64) -> bool {
    now > before
}

fn lower(now: f64, before: f64) -> bool {
    now < before
}

fn not_higher(now: f64, before: f64) -> bool {
    now <= before
}

/// Applies `passes` to the measure in both years; anything undefined fails the test.
fn compare<F>(
    current: &FinancialRecord,
    prior: Option<&FinancialRecord>,
    measure: F,
    passes: fn(f64, f64) -> bool,
) -> bool
where
    F: Fn(&FinancialRecord) -> Result<f64, Undefined>,
{
    let Some(prior) = prior else {
        return false;
    };
    match (measure(current), measure(prior)) {
        (Ok(now), Ok(before)) => passes(now, before),
        _ => false,
    }
}

/// Always defined: the sum of the nine binary tests.
pub fn piotroski_f_score(current: &FinancialRecord, prior: Option<&FinancialRecord>) -> MetricValue {
    MetricValue::Defined(f64::from(PiotroskiBreakdown::evaluate(current, prior).score()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32) -> FinancialRecord {
        FinancialRecord::new("COST", "Consumer Staples", "Retail", year)
    }

    fn strong_pair() -> (FinancialRecord, FinancialRecord) {
        let prior = record(2021)
            .with(LineItem::NetIncome, 50.0)
            .with(LineItem::OperatingCashFlow, 60.0)
            .with(LineItem::TotalAssets, 1_000.0)
            .with(LineItem::LongTermDebt, 300.0)
            .with(LineItem::CurrentAssets, 300.0)
            .with(LineItem::CurrentLiabilities, 250.0)
            .with(LineItem::SharesOutstanding, 100.0)
            .with(LineItem::Revenue, 800.0)
            .with(LineItem::CostOfRevenue, 600.0);
        let current = record(2022)
            .with(LineItem::NetIncome, 80.0)
            .with(LineItem::OperatingCashFlow, 120.0)
            .with(LineItem::TotalAssets, 1_000.0)
            .with(LineItem::LongTermDebt, 250.0)
            .with(LineItem::CurrentAssets, 400.0)
            .with(LineItem::CurrentLiabilities, 250.0)
            .with(LineItem::SharesOutstanding, 100.0)
            .with(LineItem::Revenue, 1_000.0)
            .with(LineItem::CostOfRevenue, 700.0);
        (prior, current)
    }

    #[test]
    fn test_all_tests_pass() {
        let (prior, current) = strong_pair();
        let breakdown = PiotroskiBreakdown::evaluate(&current, Some(&prior));
        assert!(breakdown.tests().iter().all(|(_, passed)| *passed), "{:?}", breakdown);
        assert_eq!(piotroski_f_score(&current, Some(&prior)), MetricValue::Defined(9.0));
    }

    #[test]
    fn test_missing_prior_fails_open() {
        let (_, current) = strong_pair();
        let breakdown = PiotroskiBreakdown::evaluate(&current, None);
        assert_eq!(breakdown.score(), 3);
        assert!(breakdown.positive_net_income);
        assert!(!breakdown.improving_return_on_assets);
    }

    #[test]
    fn test_dilution_and_missing_fields_score_zero() {
        let (prior, current) = strong_pair();
        let current = current
            .with(LineItem::SharesOutstanding, 120.0)
            .with(LineItem::TotalAssets, f64::NAN);
        let breakdown = PiotroskiBreakdown::evaluate(&current, Some(&prior));
        assert!(!breakdown.no_share_dilution);
        assert!(!breakdown.improving_return_on_assets);
        assert!(!breakdown.decreasing_leverage);
        assert!(!breakdown.improving_asset_turnover);
        assert!(breakdown.improving_gross_margin);
    }

    #[test]
    fn test_score_bounded_for_empty_records() {
        let score = piotroski_f_score(&record(2022), Some(&record(2021)));
        assert_eq!(score, MetricValue::Defined(0.0));
    }
}
