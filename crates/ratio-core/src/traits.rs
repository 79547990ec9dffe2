use crate::{Metric, MetricRecord, MetricValue};

/// A row that the ranking and screening layer can filter and sort.
pub trait MetricSource {
    fn company(&self) -> &str;
    fn sector(&self) -> &str;
    fn subsector(&self) -> &str;
    fn year(&self) -> i32;
    fn metric(&self, metric: Metric) -> MetricValue;
}

impl MetricSource for MetricRecord {
    fn company(&self) -> &str {
        MetricRecord::company(self)
    }

    fn sector(&self) -> &str {
        MetricRecord::sector(self)
    }

    fn subsector(&self) -> &str {
        MetricRecord::subsector(self)
    }

    fn year(&self) -> i32 {
        MetricRecord::year(self)
    }

    fn metric(&self, metric: Metric) -> MetricValue {
        self.get(metric)
    }
}

impl<T: MetricSource + ?Sized> MetricSource for &T {
    fn company(&self) -> &str {
        (**self).company()
    }

    fn sector(&self) -> &str {
        (**self).sector()
    }

    fn subsector(&self) -> &str {
        (**self).subsector()
    }

    fn year(&self) -> i32 {
        (**self).year()
    }

    fn metric(&self, metric: Metric) -> MetricValue {
        (**self).metric(metric)
    }
}
