/// Broker-level configuration for the dispatch pipeline.
///
/// Hook configuration lives in [`EventFlowConfig`](crate::flow::EventFlowConfig);
/// this only covers the request handling around it.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Name reported in logs, useful when one process hosts several brokers.
    pub broker_name: String,
    /// Maximum number of in-flight state-changing operations before new ones
    /// are shed. Fetches and polls are not counted.
    pub max_concurrent_operations: u32,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            broker_name: "service-broker".to_string(),
            max_concurrent_operations: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broker_config_defaults() {
        let config = BrokerConfig::default();
        assert_eq!(config.broker_name, "service-broker");
        assert_eq!(config.max_concurrent_operations, 1000);
    }
}
