//! Single-year financial ratios.
//!
//! Every ratio is a standalone function over named inputs. A zero denominator,
//! a non-positive denominator where the ratio assumes positivity, or a
//! non-finite result yields [`Undefined::UndefinedRatio`]; nothing here panics.
//! Ratios are fractions (0.25 = 25%), not percentages.

use ratio_core::{FinancialRecord, LineItem, Metric, MetricKind, MetricValue, Undefined};

pub const DAYS_PER_YEAR: f64 = 365.0;

/// `numerator / denominator`, undefined for a zero denominator.
pub fn ratio(numerator: f64, denominator: f64) -> Result<f64, Undefined> {
    if denominator == 0.0 {
        return Err(Undefined::UndefinedRatio);
    }
    finite(numerator / denominator)
}

/// `numerator / denominator`, undefined unless the denominator is strictly positive.
pub fn positive_ratio(numerator: f64, denominator: f64) -> Result<f64, Undefined> {
    if denominator <= 0.0 {
        return Err(Undefined::UndefinedRatio);
    }
    finite(numerator / denominator)
}

fn finite(value: f64) -> Result<f64, Undefined> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Undefined::UndefinedRatio)
    }
}

pub fn asset_turnover(revenue: f64, total_assets: f64) -> MetricValue {
    positive_ratio(revenue, total_assets).into()
}

pub fn cash_ratio(cash: f64, cash_equivalents: f64, current_liabilities: f64) -> MetricValue {
    positive_ratio(cash + cash_equivalents, current_liabilities).into()
}

pub fn current_ratio(current_assets: f64, current_liabilities: f64) -> MetricValue {
    positive_ratio(current_assets, current_liabilities).into()
}

pub fn quick_ratio(
    cash: f64,
    cash_equivalents: f64,
    receivables: f64,
    current_liabilities: f64,
) -> MetricValue {
    positive_ratio(cash + cash_equivalents + receivables, current_liabilities).into()
}

pub fn debt_to_equity(total_debt: f64, shareholders_equity: f64) -> MetricValue {
    positive_ratio(total_debt, shareholders_equity).into()
}

pub fn debt_to_assets(total_debt: f64, total_assets: f64) -> MetricValue {
    positive_ratio(total_debt, total_assets).into()
}

/// EBIT / interest expense. Only a zero expense is undefined since filers
/// disagree on the sign convention.
pub fn interest_coverage(ebit: f64, interest_expense: f64) -> MetricValue {
    ratio(ebit, interest_expense).into()
}

pub fn days_inventory(inventory: f64, cost_of_revenue: f64) -> MetricValue {
    positive_ratio(inventory, cost_of_revenue)
        .map(|turn| turn * DAYS_PER_YEAR)
        .into()
}

pub fn days_sales_outstanding(receivables: f64, revenue: f64) -> MetricValue {
    positive_ratio(receivables, revenue)
        .map(|turn| turn * DAYS_PER_YEAR)
        .into()
}

/// Market capitalization + total debt - cash
pub fn enterprise_value(market_capitalization: f64, total_debt: f64, cash: f64) -> f64 {
    market_capitalization + total_debt - cash
}

pub fn ev_to_ebitda(
    market_capitalization: f64,
    total_debt: f64,
    cash: f64,
    ebitda: f64,
) -> MetricValue {
    positive_ratio(enterprise_value(market_capitalization, total_debt, cash), ebitda).into()
}

pub fn gross_margin(revenue: f64, cost_of_revenue: f64) -> MetricValue {
    positive_ratio(revenue - cost_of_revenue, revenue).into()
}

pub fn operating_margin(ebit: f64, revenue: f64) -> MetricValue {
    positive_ratio(ebit, revenue).into()
}

pub fn net_margin(net_income: f64, revenue: f64) -> MetricValue {
    positive_ratio(net_income, revenue).into()
}

pub fn return_on_assets(net_income: f64, total_assets: f64) -> MetricValue {
    positive_ratio(net_income, total_assets).into()
}

pub fn return_on_equity(net_income: f64, shareholders_equity: f64) -> MetricValue {
    positive_ratio(net_income, shareholders_equity).into()
}

pub fn gross_profit_to_assets(revenue: f64, cost_of_revenue: f64, total_assets: f64) -> MetricValue {
    positive_ratio(revenue - cost_of_revenue, total_assets).into()
}

pub fn earnings_per_share(net_income: f64, shares_outstanding: f64) -> MetricValue {
    positive_ratio(net_income, shares_outstanding).into()
}

/// Undefined for loss-making years; a negative P/E is not meaningful.
pub fn price_to_earnings(market_capitalization: f64, net_income: f64) -> MetricValue {
    positive_ratio(market_capitalization, net_income).into()
}

pub fn price_to_book(market_capitalization: f64, shareholders_equity: f64) -> MetricValue {
    positive_ratio(market_capitalization, shareholders_equity).into()
}

/// Evaluates a ratio metric against one record.
///
/// Returns `None` for composite and growth metrics, which need more than one record.
pub fn evaluate(metric: Metric, record: &FinancialRecord) -> Option<MetricValue> {
    if metric.kind() != MetricKind::Ratio {
        return None;
    }
    Some(match from_record(metric, record) {
        Ok(value) => value,
        Err(reason) => MetricValue::Undefined(reason),
    })
}

/// Record-level dispatch. Missing inputs surface as `MissingInput` for the first absent item.
pub(crate) fn from_record(metric: Metric, r: &FinancialRecord) -> Result<MetricValue, Undefined> {
    use LineItem::*;

    let value = match metric {
        Metric::AssetTurnover => asset_turnover(r.field(Revenue)?, r.field(TotalAssets)?),
        Metric::CashRatio => cash_ratio(
            r.field(Cash)?,
            r.field(CashEquivalents)?,
            r.field(CurrentLiabilities)?,
        ),
        Metric::CurrentRatio => {
            current_ratio(r.field(CurrentAssets)?, r.field(CurrentLiabilities)?)
        }
        Metric::QuickRatio => quick_ratio(
            r.field(Cash)?,
            r.field(CashEquivalents)?,
            r.field(Receivables)?,
            r.field(CurrentLiabilities)?,
        ),
        Metric::DebtToEquity => debt_to_equity(r.field(TotalDebt)?, r.field(ShareholdersEquity)?),
        Metric::DebtToAssets => debt_to_assets(r.field(TotalDebt)?, r.field(TotalAssets)?),
        Metric::InterestCoverage => interest_coverage(r.field(Ebit)?, r.field(InterestExpense)?),
        Metric::DaysInventory => days_inventory(r.field(Inventory)?, r.field(CostOfRevenue)?),
        Metric::DaysSalesOutstanding => {
            days_sales_outstanding(r.field(Receivables)?, r.field(Revenue)?)
        }
        Metric::EvToEbitda => ev_to_ebitda(
            r.field(MarketCapitalization)?,
            r.field(TotalDebt)?,
            r.field(Cash)?,
            r.field(Ebitda)?,
        ),
        Metric::GrossMargin => gross_margin(r.field(Revenue)?, r.field(CostOfRevenue)?),
        Metric::OperatingMargin => operating_margin(r.field(Ebit)?, r.field(Revenue)?),
        Metric::NetMargin => net_margin(r.field(NetIncome)?, r.field(Revenue)?),
        Metric::ReturnOnAssets => return_on_assets(r.field(NetIncome)?, r.field(TotalAssets)?),
        Metric::ReturnOnEquity => {
            return_on_equity(r.field(NetIncome)?, r.field(ShareholdersEquity)?)
        }
        Metric::GrossProfitToAssets => gross_profit_to_assets(
            r.field(Revenue)?,
            r.field(CostOfRevenue)?,
            r.field(TotalAssets)?,
        ),
        Metric::EarningsPerShare => {
            earnings_per_share(r.field(NetIncome)?, r.field(SharesOutstanding)?)
        }
        Metric::PriceToEarnings => {
            price_to_earnings(r.field(MarketCapitalization)?, r.field(NetIncome)?)
        }
        Metric::PriceToBook => {
            price_to_book(r.field(MarketCapitalization)?, r.field(ShareholdersEquity)?)
        }
        Metric::AltmanZScore
        | Metric::BeneishMScore
        | Metric::PiotroskiFScore
        | Metric::YoyRevenueGrowth
        | Metric::YoyEpsGrowth => return Err(Undefined::UndefinedRatio),
    };
    Ok(value)
}

/// Like [`from_record`] but flattened to the numeric value, for scorers that
/// consume ratio outputs.
pub(crate) fn value_of(metric: Metric, record: &FinancialRecord) -> Result<f64, Undefined> {
    from_record(metric, record)?.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn undefined() -> MetricValue {
        MetricValue::Undefined(Undefined::UndefinedRatio)
    }

    #[test]
    fn test_asset_turnover_zero_cases() {
        assert_eq!(asset_turnover(0.0, 250.0), MetricValue::Defined(0.0));
        assert_eq!(asset_turnover(100.0, 0.0), undefined());
        assert_eq!(asset_turnover(100.0, -5.0), undefined());
        assert_relative_eq!(asset_turnover(300.0, 150.0).value().unwrap(), 2.0);
    }

    #[test]
    fn test_days_inventory_formula() {
        let value = days_inventory(50.0, 400.0).value().unwrap();
        assert_eq!(value.to_bits(), ((50.0_f64 / 400.0) * 365.0).to_bits());
        assert_eq!(days_inventory(50.0, 0.0), undefined());
    }

    #[test]
    fn test_enterprise_value_multiple() {
        assert_eq!(enterprise_value(1_000.0, 200.0, 150.0), 1_050.0);
        assert_relative_eq!(ev_to_ebitda(1_000.0, 200.0, 150.0, 105.0).value().unwrap(), 10.0);
        assert_eq!(ev_to_ebitda(1_000.0, 200.0, 150.0, -20.0), undefined());
    }

    #[test]
    fn test_interest_coverage_sign_agnostic() {
        assert_relative_eq!(interest_coverage(120.0, 10.0).value().unwrap(), 12.0);
        assert_relative_eq!(interest_coverage(120.0, -10.0).value().unwrap(), -12.0);
        assert_eq!(interest_coverage(120.0, 0.0), undefined());
    }

    #[test]
    fn test_leverage_needs_positive_equity() {
        assert_relative_eq!(debt_to_equity(50.0, 100.0).value().unwrap(), 0.5);
        assert_eq!(debt_to_equity(50.0, -100.0), undefined());
        assert_eq!(price_to_earnings(1_000.0, -10.0), undefined());
    }

    #[test]
    fn test_evaluate_reports_missing_input() {
        let record = FinancialRecord::new("AMZN", "Consumer Discretionary", "Retail", 2021)
            .with(LineItem::Revenue, 470.0);
        assert_eq!(
            evaluate(Metric::AssetTurnover, &record),
            Some(MetricValue::Undefined(Undefined::MissingInput(LineItem::TotalAssets)))
        );
        assert_eq!(evaluate(Metric::AltmanZScore, &record), None);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let record = FinancialRecord::new("NVDA", "Technology", "Semiconductors", 2023)
            .with(LineItem::Revenue, 26.97)
            .with(LineItem::CostOfRevenue, 11.62)
            .with(LineItem::TotalAssets, 41.18)
            .with(LineItem::Inventory, 5.16);

        for metric in Metric::ALL {
            let first = evaluate(metric, &record);
            let second = evaluate(metric, &record);
            match (first, second) {
                (Some(MetricValue::Defined(a)), Some(MetricValue::Defined(b))) => {
                    assert_eq!(a.to_bits(), b.to_bits(), "{}", metric)
                }
                (a, b) => assert_eq!(a, b, "{}", metric),
            }
        }
    }
}
