//! Namespaces of a heterogeneous-agent summary (per-agent, critic, reward)

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::MetricSet;

/// Namespace a summary key belongs to.
///
/// Only the two-agent layout is recognised; keys for any other agent are not
/// classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Policy metrics of the first agent.
    Agent0,
    /// Policy metrics of the second agent.
    Agent1,
    /// Shared value-function metrics.
    Critic,
    /// Episode reward metrics.
    Rewards,
}

impl Namespace {
    /// All namespaces in classification priority order.
    pub const ALL: [Self; 4] = [Self::Agent0, Self::Agent1, Self::Critic, Self::Rewards];

    /// Substring that marks a key as belonging to this namespace.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Agent0 => "/agent0/",
            Self::Agent1 => "/agent1/",
            Self::Critic => "/critic/",
            Self::Rewards => "/train_episode_rewards/",
        }
    }

    /// Short name of the namespace.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agent0 => "agent0",
            Self::Agent1 => "agent1",
            Self::Critic => "critic",
            Self::Rewards => "rewards",
        }
    }

    /// Heading used when rendering the namespace.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Agent0 => "Agent 0 Metrics",
            Self::Agent1 => "Agent 1 Metrics",
            Self::Critic => "Critic Metrics",
            Self::Rewards => "Reward Metrics",
        }
    }

    /// Classify a slash-delimited key, testing markers in priority order.
    #[must_use]
    pub fn classify(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| key.contains(ns.marker()))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric sets of one run, keyed by namespace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NamespacedMetrics {
    sets: BTreeMap<Namespace, MetricSet>,
}

impl NamespacedMetrics {
    /// Create a collection holding an empty set for every namespace.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sets: Namespace::ALL
                .into_iter()
                .map(|ns| (ns, MetricSet::new()))
                .collect(),
        }
    }

    /// Get the set of a namespace.
    #[must_use]
    pub fn get(&self, namespace: Namespace) -> Option<&MetricSet> {
        self.sets.get(&namespace)
    }

    /// Get the set of a namespace for insertion, creating it if needed.
    pub fn set_mut(&mut self, namespace: Namespace) -> &mut MetricSet {
        self.sets.entry(namespace).or_default()
    }

    /// Final value of `metric` within `namespace`.
    #[must_use]
    pub fn final_value(&self, namespace: Namespace, metric: &str) -> Option<f64> {
        self.get(namespace).and_then(|set| set.final_value(metric))
    }

    /// Iterate namespaces in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Namespace, &MetricSet)> {
        self.sets.iter().map(|(ns, set)| (*ns, set))
    }

    /// Total number of metrics across all namespaces.
    #[must_use]
    pub fn metric_count(&self) -> usize {
        self.sets.values().map(MetricSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(
            Namespace::classify("run/agent0/critic/x"),
            Some(Namespace::Agent0)
        );
        assert_eq!(Namespace::classify("run/critic/value_loss"), Some(Namespace::Critic));
        assert_eq!(
            Namespace::classify("run/train_episode_rewards/aver_rewards"),
            Some(Namespace::Rewards)
        );
    }

    #[test]
    fn test_classify_unknown_agent() {
        assert_eq!(Namespace::classify("run/agent2/dist_entropy"), None);
        assert_eq!(Namespace::classify("agent0/dist_entropy"), None);
    }

    #[test]
    fn test_namespaced_metrics_starts_with_all_namespaces() {
        let metrics = NamespacedMetrics::new();
        assert_eq!(metrics.iter().count(), 4);
        assert_eq!(metrics.metric_count(), 0);
    }
}
