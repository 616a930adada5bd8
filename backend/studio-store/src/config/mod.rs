use serde::Deserialize;

use crate::error::Result;
use crate::models::Actor;

/// What a store does when an action targets a record that is already in a
/// terminal state (banned user, resolved report, ended stream, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalStatePolicy {
    /// Apply the action again and record it in the audit log.
    #[default]
    Allow,
    /// Refuse with `StoreError::TerminalState`.
    Reject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudioConfig {
    /// Seed for the mock data generators.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Max audit events retained per store; oldest are evicted first.
    #[serde(default = "default_audit_capacity")]
    pub audit_capacity: usize,
    #[serde(default)]
    pub terminal_policy: TerminalStatePolicy,
    /// Display name written as the actor of every audit event.
    #[serde(default = "default_actor_name")]
    pub actor_name: String,
    #[serde(default)]
    pub log_json: bool,
    #[serde(default = "default_change_channel_capacity")]
    pub change_channel_capacity: usize,
}

fn default_seed() -> u64 {
    42
}

fn default_audit_capacity() -> usize {
    1_000
}

fn default_actor_name() -> String {
    "Studio Admin".to_string()
}

fn default_change_channel_capacity() -> usize {
    64
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            audit_capacity: default_audit_capacity(),
            terminal_policy: TerminalStatePolicy::default(),
            actor_name: default_actor_name(),
            log_json: false,
            change_channel_capacity: default_change_channel_capacity(),
        }
    }
}

impl StudioConfig {
    /// Load from `STUDIO__*` environment variables (and `.env` if present).
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("STUDIO")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("seed", default_seed())?
            .set_default("audit_capacity", default_audit_capacity() as u64)?
            .set_default("terminal_policy", "allow")?
            .set_default("actor_name", default_actor_name())?
            .set_default("log_json", false)?
            .set_default(
                "change_channel_capacity",
                default_change_channel_capacity() as u64,
            )?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            seed: self.seed,
            audit_capacity: self.audit_capacity.max(1),
            terminal_policy: self.terminal_policy,
            actor: Actor::new(self.actor_name.clone()),
            change_channel_capacity: self.change_channel_capacity.max(1),
        }
    }
}

/// The slice of configuration every store needs at construction time.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub seed: u64,
    pub audit_capacity: usize,
    pub terminal_policy: TerminalStatePolicy,
    pub actor: Actor,
    pub change_channel_capacity: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StudioConfig::default().store_options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_config() {
        std::env::remove_var("STUDIO__SEED");
        std::env::remove_var("STUDIO__TERMINAL_POLICY");
        let config = StudioConfig::load().unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.audit_capacity, 1_000);
        assert_eq!(config.terminal_policy, TerminalStatePolicy::Allow);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("STUDIO__SEED", "7");
        std::env::set_var("STUDIO__TERMINAL_POLICY", "reject");
        let config = StudioConfig::load().unwrap();
        std::env::remove_var("STUDIO__SEED");
        std::env::remove_var("STUDIO__TERMINAL_POLICY");

        assert_eq!(config.seed, 7);
        assert_eq!(config.terminal_policy, TerminalStatePolicy::Reject);
    }

    #[test]
    #[serial]
    fn test_bad_policy_is_a_config_error() {
        std::env::set_var("STUDIO__TERMINAL_POLICY", "sometimes");
        let result = StudioConfig::load();
        std::env::remove_var("STUDIO__TERMINAL_POLICY");

        let err = result.unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_store_options_clamp_capacities() {
        let config = StudioConfig {
            audit_capacity: 0,
            change_channel_capacity: 0,
            ..Default::default()
        };
        let options = config.store_options();
        assert_eq!(options.audit_capacity, 1);
        assert_eq!(options.change_channel_capacity, 1);
        assert_eq!(options.actor.name, "Studio Admin");
    }
}
