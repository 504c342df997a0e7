//! Metric Set - named series scoped to one run (or one namespace of a run)

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

use super::MetricSeries;

/// Mapping from metric name to its series.
///
/// Names are unique within a set. Iteration is in lexicographic name order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetricSet {
    metrics: BTreeMap<String, MetricSeries>,
}

impl MetricSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series, replacing any previous series with the same name.
    pub fn insert(&mut self, name: impl Into<String>, series: impl Into<MetricSeries>) {
        self.metrics.insert(name.into(), series.into());
    }

    /// Get a series by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MetricSeries> {
        self.metrics.get(name)
    }

    /// Check whether a metric name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    /// Last value of the named series, if present and non-empty.
    #[must_use]
    pub fn final_value(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(MetricSeries::last)
    }

    /// Metric names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    /// Iterate `(name, series)` pairs in lexicographic name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, MetricSeries> {
        self.metrics.iter()
    }

    /// Number of metrics in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Check whether the set has no metrics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl<'a> IntoIterator for &'a MetricSet {
    type Item = (&'a String, &'a MetricSeries);
    type IntoIter = btree_map::Iter<'a, String, MetricSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, S: Into<MetricSeries>> FromIterator<(K, S)> for MetricSet {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, series) in iter {
            set.insert(name, series);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_default() {
        let set = MetricSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_insert_replaces() {
        let mut set = MetricSet::new();
        set.insert("loss", vec![1.0]);
        set.insert("loss", vec![2.0, 3.0]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.final_value("loss"), Some(3.0));
    }

    #[test]
    fn test_names_sorted() {
        let set: MetricSet = [("b", vec![1.0]), ("a", vec![2.0]), ("c", vec![])]
            .into_iter()
            .collect();
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_final_value_of_empty_series() {
        let set: MetricSet = [("ratio", Vec::<f64>::new())].into_iter().collect();
        assert!(set.contains("ratio"));
        assert_eq!(set.final_value("ratio"), None);
    }
}
