use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use vivu_catalog::TierMultipliers;
use vivu_order::{CheckoutError, CountLimits, ServicePolicy};
use vivu_shared::ServiceType;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

/// Per-service overrides; anything left out keeps the built-in policy.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PricingConfig {
    pub flight: Option<PolicyOverrides>,
    pub tour: Option<PolicyOverrides>,
    pub transport: Option<PolicyOverrides>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PolicyOverrides {
    pub child_multiplier: Option<f64>,
    pub infant_multiplier: Option<f64>,
    pub tax_rate: Option<f64>,
    pub max_adults: Option<u32>,
    pub max_children: Option<u32>,
}

impl PolicyOverrides {
    fn apply(&self, base: ServicePolicy) -> Result<ServicePolicy, CheckoutError> {
        let multipliers = TierMultipliers {
            child: self.child_multiplier.unwrap_or(base.multipliers.child),
            infant: self.infant_multiplier.unwrap_or(base.multipliers.infant),
        };
        let limits = CountLimits {
            adults: self.max_adults.unwrap_or(base.limits.adults),
            children: self.max_children.unwrap_or(base.limits.children),
        };
        ServicePolicy::new(multipliers, self.tax_rate.unwrap_or(base.tax_rate), limits)
    }
}

impl PricingConfig {
    fn overrides(&self, service: ServiceType) -> Option<&PolicyOverrides> {
        match service {
            ServiceType::Flight => self.flight.as_ref(),
            ServiceType::Tour => self.tour.as_ref(),
            ServiceType::Transport => self.transport.as_ref(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("server.port", i64::from(default_port()))?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `VIVU_PRICING__FLIGHT__TAX_RATE=0.08`
            .add_source(
                config::Environment::with_prefix("VIVU")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }

    /// Effective policy for every service, validated.
    pub fn policies(&self) -> Result<BTreeMap<ServiceType, ServicePolicy>, CheckoutError> {
        ServiceType::ALL
            .into_iter()
            .map(|service| {
                let base = ServicePolicy::for_service(service);
                let policy = match self.pricing.overrides(service) {
                    Some(overrides) => overrides.apply(base)?,
                    None => base,
                };
                Ok((service, policy))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = from_toml("[server]\nport = 9000\n");
        let policies = config.policies().unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(policies[&ServiceType::Flight], ServicePolicy::for_service(ServiceType::Flight));
        assert_eq!(policies.len(), 3);
    }

    #[test]
    fn test_partial_override() {
        let config = from_toml(
            "[server]\nport = 9000\n\n[pricing.transport]\nchild_multiplier = 0.75\nmax_children = 4\n",
        );
        let transport = config.policies().unwrap()[&ServiceType::Transport];

        assert_eq!(transport.multipliers.child, 0.75);
        assert_eq!(transport.multipliers.infant, 0.0);
        assert_eq!(transport.limits.children, 4);
        assert_eq!(transport.limits.adults, 10);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let config = from_toml("[server]\nport = 9000\n\n[pricing.flight]\ninfant_multiplier = 1.5\n");
        assert!(config.policies().is_err());
    }
}
