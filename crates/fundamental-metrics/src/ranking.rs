//! Filtering and ranking of computed metric rows.
//!
//! Empty filter sets mean "no constraint", matching the dashboard sidebar
//! where nothing selected shows everything. Ordering is fully deterministic:
//! metric value, then company, then year.

use ratio_core::{Metric, MetricSource};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Categorical and year-range selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub sectors: BTreeSet<String>,
    pub subsectors: BTreeSet<String>,
    pub companies: BTreeSet<String>,
    /// Inclusive `(lo, hi)`; `lo > hi` matches nothing.
    pub years: Option<(i32, i32)>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sectors<I, S>(mut self, sectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sectors.extend(sectors.into_iter().map(Into::into));
        self
    }

    pub fn subsectors<I, S>(mut self, subsectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subsectors.extend(subsectors.into_iter().map(Into::into));
        self
    }

    pub fn companies<I, S>(mut self, companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.companies.extend(companies.into_iter().map(Into::into));
        self
    }

    pub fn year_range(mut self, lo: i32, hi: i32) -> Self {
        self.years = Some((lo, hi));
        self
    }

    pub fn year(self, year: i32) -> Self {
        self.year_range(year, year)
    }

    /// True when no categorical selection was made (the year range is ignored).
    pub fn is_unconstrained(&self) -> bool {
        self.sectors.is_empty() && self.subsectors.is_empty() && self.companies.is_empty()
    }

    pub fn matches<T: MetricSource>(&self, row: &T) -> bool {
        (self.sectors.is_empty() || self.sectors.contains(row.sector()))
            && (self.subsectors.is_empty() || self.subsectors.contains(row.subsector()))
            && (self.companies.is_empty() || self.companies.contains(row.company()))
            && self
                .years
                .map_or(true, |(lo, hi)| (lo..=hi).contains(&row.year()))
    }

    /// Matching rows in input order
    pub fn apply<'a, T: MetricSource>(&self, rows: &'a [T]) -> Vec<&'a T> {
        rows.iter().filter(|row| self.matches(*row)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// How rows with an undefined sort value are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedPolicy {
    /// Keep them after every defined value, whatever the direction
    #[default]
    Last,
    /// Drop them from the result
    Exclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub metric: Metric,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(metric: Metric) -> Self {
        Self {
            metric,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(metric: Metric) -> Self {
        Self {
            metric,
            direction: SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankRequest {
    pub filter: RecordFilter,
    pub sort: SortKey,
    #[serde(default)]
    pub undefined: UndefinedPolicy,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl RankRequest {
    pub fn new(sort: SortKey) -> Self {
        Self {
            filter: RecordFilter::default(),
            sort,
            undefined: UndefinedPolicy::default(),
            limit: None,
        }
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_undefined(mut self, policy: UndefinedPolicy) -> Self {
        self.undefined = policy;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Filtered, sorted subsequence of `rows`.
pub fn rank<'a, T: MetricSource>(rows: &'a [T], request: &RankRequest) -> Vec<&'a T> {
    let metric = request.sort.metric;
    let mut selected: Vec<&'a T> = rows
        .iter()
        .filter(|row| request.filter.matches(*row))
        .filter(|row| match request.undefined {
            UndefinedPolicy::Last => true,
            UndefinedPolicy::Exclude => row.metric(metric).is_defined(),
        })
        .collect();

    selected.sort_by(|a, b| compare(*a, *b, request.sort));

    if let Some(limit) = request.limit {
        selected.truncate(limit);
    }
    selected
}

/// Defined before undefined, then by value in the requested direction, then company, then year.
pub fn compare<T: MetricSource>(a: &T, b: &T, key: SortKey) -> Ordering {
    let by_value = match (a.metric(key.metric).value(), b.metric(key.metric).value()) {
        // `+ 0.0` folds -0.0 into 0.0 so signed zeros tie on company
        (Some(x), Some(y)) => match key.direction {
            SortDirection::Ascending => (x + 0.0).total_cmp(&(y + 0.0)),
            SortDirection::Descending => (y + 0.0).total_cmp(&(x + 0.0)),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_value
        .then_with(|| a.company().cmp(b.company()))
        .then_with(|| a.year().cmp(&b.year()))
}

/// Distinct sectors, sorted.
pub fn available_sectors<T: MetricSource>(rows: &[T]) -> Vec<String> {
    distinct(rows.iter(), |row| row.sector())
}

/// Subsectors offered once `sectors` are selected; every subsector when none are.
pub fn available_subsectors<T: MetricSource>(rows: &[T], sectors: &BTreeSet<String>) -> Vec<String> {
    distinct(
        rows.iter()
            .filter(|row| sectors.is_empty() || sectors.contains(row.sector())),
        |row| row.subsector(),
    )
}

/// Companies offered for the selected sectors and subsectors.
pub fn available_companies<T: MetricSource>(
    rows: &[T],
    sectors: &BTreeSet<String>,
    subsectors: &BTreeSet<String>,
) -> Vec<String> {
    distinct(
        rows.iter().filter(|row| {
            (sectors.is_empty() || sectors.contains(row.sector()))
                && (subsectors.is_empty() || subsectors.contains(row.subsector()))
        }),
        |row| row.company(),
    )
}

fn distinct<'a, T, I, F>(rows: I, field: F) -> Vec<String>
where
    T: MetricSource + 'a,
    I: Iterator<Item = &'a T>,
    F: Fn(&'a T) -> &'a str,
{
    rows.map(field)
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
