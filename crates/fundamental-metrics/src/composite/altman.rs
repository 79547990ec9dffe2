use crate::ratios::positive_ratio;
use ratio_core::{AltmanZone, FinancialRecord, LineItem, MetricValue, ScoreThresholds, Undefined};
use serde::{Deserialize, Serialize};

/// The five Altman sub-ratios, all scaled by total assets except `D`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltmanInputs {
    /// A: (current assets - current liabilities) / total assets
    pub working_capital_to_assets: f64,
    /// B: retained earnings / total assets
    pub retained_earnings_to_assets: f64,
    /// C: EBIT / total assets
    pub ebit_to_assets: f64,
    /// D: market value of equity / total liabilities
    pub market_equity_to_liabilities: f64,
    /// E: sales / total assets
    pub sales_to_assets: f64,
}

impl AltmanInputs {
    pub fn from_record(r: &FinancialRecord) -> Result<Self, Undefined> {
        let total_assets = r.field(LineItem::TotalAssets)?;
        let working_capital =
            r.field(LineItem::CurrentAssets)? - r.field(LineItem::CurrentLiabilities)?;

        Ok(Self {
            working_capital_to_assets: positive_ratio(working_capital, total_assets)?,
            retained_earnings_to_assets: positive_ratio(
                r.field(LineItem::RetainedEarnings)?,
                total_assets,
            )?,
            ebit_to_assets: positive_ratio(r.field(LineItem::Ebit)?, total_assets)?,
            market_equity_to_liabilities: positive_ratio(
                r.field(LineItem::MarketCapitalization)?,
                r.field(LineItem::TotalLiabilities)?,
            )?,
            sales_to_assets: positive_ratio(r.field(LineItem::Revenue)?, total_assets)?,
        })
    }

    pub fn score(&self) -> f64 {
        altman_z(self)
    }
}

/// Z = 1.2·A + 1.4·B + 3.3·C + 0.6·D + 1.0·E
pub fn altman_z(inputs: &AltmanInputs) -> f64 {
    1.2 * inputs.working_capital_to_assets
        + 1.4 * inputs.retained_earnings_to_assets
        + 3.3 * inputs.ebit_to_assets
        + 0.6 * inputs.market_equity_to_liabilities
        + 1.0 * inputs.sales_to_assets
}

pub fn altman_z_score(record: &FinancialRecord) -> MetricValue {
    AltmanInputs::from_record(record).map(|inputs| altman_z(&inputs)).into()
}

/// Below `altman_distress` is distress, above `altman_safe` is safe, grey in between.
pub fn altman_zone(z: f64, thresholds: &ScoreThresholds) -> AltmanZone {
    if z < thresholds.altman_distress {
        AltmanZone::Distress
    } else if z > thresholds.altman_safe {
        AltmanZone::Safe
    } else {
        AltmanZone::Grey
    }
}
