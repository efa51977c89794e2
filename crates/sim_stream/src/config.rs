use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Deserializer};
use sim_core::scenario::FleetParams;

const DEFAULT_TOPIC: &str = "uber-trips-raw";
const DEFAULT_DURATION_SECONDS: u64 = 120;

/// Settings read from the JSON config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamConfig {
    /// Broker addresses (`host:port`); a single string is accepted too.
    #[serde(default = "default_brokers", deserialize_with = "one_or_many")]
    pub kafka_broker: Vec<String>,
    #[serde(default = "default_topic")]
    pub topic_name: String,
    pub vehicles_per_province: BTreeMap<String, usize>,
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u64,
    #[serde(default)]
    pub tick_interval_ms: Option<u64>,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_brokers() -> Vec<String> {
    vec!["localhost:9092".to_string()]
}

fn default_topic() -> String {
    DEFAULT_TOPIC.to_string()
}

fn default_duration_seconds() -> u64 {
    DEFAULT_DURATION_SECONDS
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(broker) => vec![broker],
        OneOrMany::Many(brokers) => brokers,
    })
}

impl StreamConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        anyhow::ensure!(
            !config.vehicles_per_province.is_empty(),
            "vehicles_per_province must name at least one province"
        );
        Ok(config)
    }

    pub fn fleet_params(&self) -> FleetParams {
        let mut params = self
            .vehicles_per_province
            .iter()
            .fold(FleetParams::default(), |params, (province, &count)| {
                params.with_province(province.clone(), count)
            })
            .with_duration_secs(self.duration_seconds);
        if let Some(tick_interval_ms) = self.tick_interval_ms {
            params = params.with_tick_interval_ms(tick_interval_ms);
        }
        if let Some(seed) = self.seed {
            params = params.with_seed(seed);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parses_full_config() {
        let config = StreamConfig::from_json(
            r#"{
                "kafka_broker": ["host1:9092", "host2:9092"],
                "topic_name": "fleet",
                "vehicles_per_province": {"corrientes": 10, "mendoza": 5},
                "duration_seconds": 30,
                "tick_interval_ms": 250,
                "seed": 4
            }"#,
        )
        .expect("config");

        assert_eq!(config.kafka_broker, vec!["host1:9092", "host2:9092"]);
        let params = config.fleet_params();
        assert_eq!(params.total_vehicles(), 15);
        assert_eq!(params.duration(), Duration::from_secs(30));
        assert_eq!(params.tick_interval(), Duration::from_millis(250));
        assert_eq!(params.seed, Some(4));
    }

    #[test]
    fn optional_fields_fall_back_to_defaults() {
        let config = StreamConfig::from_json(
            r#"{"kafka_broker": "localhost:9092", "vehicles_per_province": {"corrientes": 50}}"#,
        )
        .expect("config");

        assert_eq!(config.kafka_broker, vec!["localhost:9092"]);
        assert_eq!(config.topic_name, DEFAULT_TOPIC);
        let params = config.fleet_params();
        assert_eq!(params.duration(), Duration::from_secs(120));
        assert_eq!(params.tick_interval(), Duration::from_secs(1));
        assert_eq!(params.seed, None);
    }

    #[test]
    fn rejects_configs_without_provinces() {
        assert!(StreamConfig::from_json(r#"{"vehicles_per_province": {}}"#).is_err());
        assert!(StreamConfig::from_json(r#"{"topic_name": "x"}"#).is_err());
    }

    #[test]
    fn load_reports_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let err = StreamConfig::load(&path).expect_err("missing file");
        assert!(format!("{err:#}").contains("config.json"));

        fs::write(&path, r#"{"vehicles_per_province": {"corrientes": 2}}"#).expect("write");
        let config = StreamConfig::load(&path).expect("config");
        assert_eq!(config.vehicles_per_province.get("corrientes"), Some(&2));
    }
}
