//! Policy Manager configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use policy_manager::domain::{MccToSccSwitch, PolicyManagerConfigBuilder};
//!
//! let config = PolicyManagerConfigBuilder::new()
//!     .max_conc_cxns(3)
//!     .mcc_to_scc_switch(MccToSccSwitch::WithFavoriteChannel)
//!     .build()
//!     .expect("Valid config");
//! ```

use serde::{Deserialize, Serialize};

use super::connection_table::MAX_NUMBER_OF_CONC_CONNECTIONS;
use super::errors::{PolicyError, Result};

/// How a SAP follows a STA that moves onto another channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MccToSccSwitch {
    /// Never move the SAP.
    #[default]
    Disabled,
    /// Move to the STA channel when it is a favourable one.
    WithFavoriteChannel,
    /// Move to the STA channel without tearing the SAP down.
    ForceWithoutDisconnection,
    /// Move to a preferred channel without tearing the SAP down.
    ForcePreferredWithoutDisconnection,
}

/// Whether a SAP may share a DFS channel with a STA.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaSapDfsPolicy {
    /// Never.
    #[default]
    Disabled,
    /// Always, the SAP follows the STA onto DFS.
    Enabled,
    /// Allowed while the SAP is not acting as DFS master.
    Flex,
}

/// Policy Manager configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyManagerConfig {
    /// Maximum simultaneous connections (1..=4)
    pub max_conc_cxns: usize,
    /// Narrow-band (5/10 MHz) operation; forbids any concurrency
    pub sub_20_mhz_enabled: bool,
    /// MCC to SCC switching behaviour
    pub mcc_to_scc_switch: MccToSccSwitch,
    /// STA+SAP SCC on DFS channels
    pub sta_sap_scc_on_dfs_chan: StaSapDfsPolicy,
    /// STA+SAP SCC on LTE-coex channels
    pub sta_sap_scc_on_lte_coex_chan: bool,
    /// Treat hardware as single-MAC regardless of firmware
    pub dual_mac_disabled: bool,
}

impl Default for PolicyManagerConfig {
    fn default() -> Self {
        Self {
            max_conc_cxns: 3,
            sub_20_mhz_enabled: false,
            mcc_to_scc_switch: MccToSccSwitch::Disabled,
            sta_sap_scc_on_dfs_chan: StaSapDfsPolicy::Disabled,
            sta_sap_scc_on_lte_coex_chan: true,
            dual_mac_disabled: false,
        }
    }
}

impl PolicyManagerConfig {
    /// Parse and validate a JSON document; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PolicyError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration bounds
    pub fn validate(&self) -> Result<()> {
        if self.max_conc_cxns == 0 || self.max_conc_cxns > MAX_NUMBER_OF_CONC_CONNECTIONS {
            return Err(PolicyError::InvalidConfig(format!(
                "max_conc_cxns must be between 1 and {}, got {}",
                MAX_NUMBER_OF_CONC_CONNECTIONS, self.max_conc_cxns
            )));
        }
        Ok(())
    }

    /// Builder-style method to set the connection limit
    pub fn with_max_conc_cxns(mut self, max: usize) -> Self {
        self.max_conc_cxns = max;
        self
    }

    /// Builder-style method to set the MCC to SCC switch
    pub fn with_mcc_to_scc_switch(mut self, switch: MccToSccSwitch) -> Self {
        self.mcc_to_scc_switch = switch;
        self
    }

    /// Builder-style method to set the STA+SAP DFS policy
    pub fn with_sta_sap_scc_on_dfs_chan(mut self, policy: StaSapDfsPolicy) -> Self {
        self.sta_sap_scc_on_dfs_chan = policy;
        self
    }

    /// Builder-style method to toggle sub-20 MHz operation
    pub fn with_sub_20_mhz(mut self, enabled: bool) -> Self {
        self.sub_20_mhz_enabled = enabled;
        self
    }

    /// Builder-style method to force single-MAC behaviour
    pub fn with_dual_mac_disabled(mut self, disabled: bool) -> Self {
        self.dual_mac_disabled = disabled;
        self
    }
}

/// Builder for PolicyManagerConfig with validation
#[derive(Default)]
pub struct PolicyManagerConfigBuilder {
    max_conc_cxns: Option<usize>,
    sub_20_mhz_enabled: Option<bool>,
    mcc_to_scc_switch: Option<MccToSccSwitch>,
    sta_sap_scc_on_dfs_chan: Option<StaSapDfsPolicy>,
    sta_sap_scc_on_lte_coex_chan: Option<bool>,
    dual_mac_disabled: Option<bool>,
}

impl PolicyManagerConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum simultaneous connections
    pub fn max_conc_cxns(mut self, max: usize) -> Self {
        self.max_conc_cxns = Some(max);
        self
    }

    /// Enable sub-20 MHz operation
    pub fn sub_20_mhz_enabled(mut self, enabled: bool) -> Self {
        self.sub_20_mhz_enabled = Some(enabled);
        self
    }

    /// Set MCC to SCC switching
    pub fn mcc_to_scc_switch(mut self, switch: MccToSccSwitch) -> Self {
        self.mcc_to_scc_switch = Some(switch);
        self
    }

    /// Set STA+SAP DFS policy
    pub fn sta_sap_scc_on_dfs_chan(mut self, policy: StaSapDfsPolicy) -> Self {
        self.sta_sap_scc_on_dfs_chan = Some(policy);
        self
    }

    /// Set STA+SAP LTE-coex policy
    pub fn sta_sap_scc_on_lte_coex_chan(mut self, enabled: bool) -> Self {
        self.sta_sap_scc_on_lte_coex_chan = Some(enabled);
        self
    }

    /// Force single-MAC behaviour
    pub fn dual_mac_disabled(mut self, disabled: bool) -> Self {
        self.dual_mac_disabled = Some(disabled);
        self
    }

    /// Build the PolicyManagerConfig, validating all parameters
    pub fn build(self) -> Result<PolicyManagerConfig> {
        let defaults = PolicyManagerConfig::default();

        let config = PolicyManagerConfig {
            max_conc_cxns: self.max_conc_cxns.unwrap_or(defaults.max_conc_cxns),
            sub_20_mhz_enabled: self
                .sub_20_mhz_enabled
                .unwrap_or(defaults.sub_20_mhz_enabled),
            mcc_to_scc_switch: self.mcc_to_scc_switch.unwrap_or(defaults.mcc_to_scc_switch),
            sta_sap_scc_on_dfs_chan: self
                .sta_sap_scc_on_dfs_chan
                .unwrap_or(defaults.sta_sap_scc_on_dfs_chan),
            sta_sap_scc_on_lte_coex_chan: self
                .sta_sap_scc_on_lte_coex_chan
                .unwrap_or(defaults.sta_sap_scc_on_lte_coex_chan),
            dual_mac_disabled: self.dual_mac_disabled.unwrap_or(defaults.dual_mac_disabled),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PolicyManagerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_conc_cxns, 3);
        assert!(config.sta_sap_scc_on_lte_coex_chan);
        assert_eq!(config.mcc_to_scc_switch, MccToSccSwitch::Disabled);
    }

    #[test]
    fn test_max_conc_cxns_bounds() {
        assert!(PolicyManagerConfig::default()
            .with_max_conc_cxns(0)
            .validate()
            .is_err());
        assert!(PolicyManagerConfig::default()
            .with_max_conc_cxns(5)
            .validate()
            .is_err());
        assert!(PolicyManagerConfig::default()
            .with_max_conc_cxns(4)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_builder_overrides_defaults() {
        let config = PolicyManagerConfigBuilder::new()
            .max_conc_cxns(4)
            .mcc_to_scc_switch(MccToSccSwitch::ForceWithoutDisconnection)
            .sta_sap_scc_on_dfs_chan(StaSapDfsPolicy::Flex)
            .dual_mac_disabled(true)
            .build()
            .unwrap();

        assert_eq!(config.max_conc_cxns, 4);
        assert_eq!(config.sta_sap_scc_on_dfs_chan, StaSapDfsPolicy::Flex);
        assert!(config.dual_mac_disabled);
        assert!(!config.sub_20_mhz_enabled);
    }

    #[test]
    fn test_builder_rejects_invalid() {
        assert!(PolicyManagerConfigBuilder::new().max_conc_cxns(9).build().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = PolicyManagerConfig::from_json(
            r#"{"max_conc_cxns": 4, "sta_sap_scc_on_dfs_chan": "flex"}"#,
        )
        .unwrap();
        assert_eq!(config.max_conc_cxns, 4);
        assert_eq!(config.sta_sap_scc_on_dfs_chan, StaSapDfsPolicy::Flex);
        assert!(config.sta_sap_scc_on_lte_coex_chan);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            PolicyManagerConfig::from_json(r#"{"max_conc_cxns": 0}"#),
            Err(PolicyError::InvalidConfig(_))
        ));
        assert!(PolicyManagerConfig::from_json("not json").is_err());
    }
}
