use std::collections::HashMap;

use prometheus::{GaugeVec, Opts, Registry};

/// Labels carried by every exposed gauge.
pub const LABELS: [&str; 2] = ["user_id", "username"];

/// One (stat key, exposed metric name, help) triple. The catalog below is
/// the single source of truth for what gets exposed; stat keys outside it
/// are dropped silently by the sink.
pub struct MetricDef {
    pub key: &'static str,
    pub name: &'static str,
    pub help: &'static str,
}

pub const METRIC_CATALOG: &[MetricDef] = &[
    MetricDef { key: "total_hits", name: "osu_total_hitobjects_hit", help: "Total number of hitobjects hit by the user on maps with a leaderboard." },
    MetricDef { key: "play_count", name: "osu_playcount", help: "Number of plays done by the user, including fails and retries, on a map with a leaderboard." },
    MetricDef { key: "ranked_score", name: "osu_ranked_score", help: "Total of every best score achieved by the user on a map with a leaderboard." },
    MetricDef { key: "total_score", name: "osu_total_score", help: "Total of every score achieved by the user on a map with a leaderboard." },
    MetricDef { key: "global_rank", name: "osu_rank", help: "Rank of the user on the global pp leaderboard." },
    MetricDef { key: "country_rank", name: "osu_rank_country", help: "Rank of the user on the country-based pp leaderboard." },
    MetricDef { key: "level", name: "osu_level", help: "The level of the user." },
    MetricDef { key: "pp", name: "osu_pp", help: "The pp score of the user." },
    MetricDef { key: "hit_accuracy", name: "osu_accuracy", help: "The accuracy of the user averaged over all plays, better plays are weighted more (like with pp)." },
    MetricDef { key: "grade_counts_ss", name: "osu_ss_count", help: "The number of SS plays achieved by the user." },
    MetricDef { key: "grade_counts_ssh", name: "osu_ss_modded_count", help: "The number of modded SS plays achieved by the user." },
    MetricDef { key: "grade_counts_s", name: "osu_s_count", help: "The number of S plays achieved by the user." },
    MetricDef { key: "grade_counts_sh", name: "osu_s_modded_count", help: "The number of modded S plays achieved by the user." },
    MetricDef { key: "grade_counts_a", name: "osu_a_count", help: "The number of A plays achieved by the user." },
    MetricDef { key: "play_time", name: "osu_total_seconds_played", help: "The total number of seconds the user was actively playing a map." },
];

/// Holds the registered gauges and the rule for applying a mapped value to
/// the gauge identified by (stat key, identity labels).
pub struct MetricSink {
    registry: Registry,
    gauges: HashMap<&'static str, GaugeVec>,
}

impl MetricSink {
    pub fn new() -> Self {
        let registry = Registry::new();
        let mut gauges = HashMap::with_capacity(METRIC_CATALOG.len());
        for def in METRIC_CATALOG {
            let gauge = GaugeVec::new(Opts::new(def.name, def.help), &LABELS).unwrap();
            registry.register(Box::new(gauge.clone())).unwrap();
            gauges.insert(def.key, gauge);
        }
        Self { registry, gauges }
    }

    /// Set the gauge for `key` labeled by this identity. Last write wins;
    /// keys outside the catalog are ignored.
    pub fn record(&self, user_id: u64, username: &str, key: &str, value: f64) {
        if let Some(gauge) = self.gauges.get(key) {
            gauge
                .with_label_values(&[&user_id.to_string(), username])
                .set(value);
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for MetricSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::gauge_value;

    #[test]
    fn catalog_has_fifteen_entries() {
        assert_eq!(METRIC_CATALOG.len(), 15);
    }

    #[test]
    fn record_sets_labeled_gauge() {
        let sink = MetricSink::new();
        sink.record(7, "foo", "pp", 100.5);
        assert_eq!(gauge_value(sink.registry(), "osu_pp", "7", "foo"), Some(100.5));
    }

    #[test]
    fn unknown_key_is_a_noop() {
        let sink = MetricSink::new();
        sink.record(7, "foo", "beatmap_playcounts_count", 12.0);

        let total: usize = sink
            .registry()
            .gather()
            .iter()
            .map(|family| family.get_metric().len())
            .sum();
        assert_eq!(total, 0, "no gauge should have been touched");
    }

    #[test]
    fn record_is_idempotent() {
        let sink = MetricSink::new();
        sink.record(7, "foo", "level", 42.0);
        let first = sink.registry().gather();
        sink.record(7, "foo", "level", 42.0);
        let second = sink.registry().gather();
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
        assert_eq!(gauge_value(sink.registry(), "osu_level", "7", "foo"), Some(42.0));
    }

    #[test]
    fn same_labels_overwrite_previous_value() {
        let sink = MetricSink::new();
        sink.record(7, "foo", "play_count", 10.0);
        sink.record(7, "foo", "play_count", 11.0);
        assert_eq!(gauge_value(sink.registry(), "osu_playcount", "7", "foo"), Some(11.0));
    }

    #[test]
    fn distinct_users_get_distinct_series() {
        let sink = MetricSink::new();
        sink.record(7, "foo", "pp", 100.0);
        sink.record(8, "bar", "pp", 200.0);
        assert_eq!(gauge_value(sink.registry(), "osu_pp", "7", "foo"), Some(100.0));
        assert_eq!(gauge_value(sink.registry(), "osu_pp", "8", "bar"), Some(200.0));
    }
}
