// Licensed under the Apache-2.0 license

//! Configuration for accessor strategies and peripheral filtering.
//!
//! [`GeneratorConfig`] selects which accessor styles are emitted and whether
//! the `regbase` runtime library is embedded in the output. [`PeripheralFilter`]
//! controls which peripherals are generated at all.

use std::str::FromStr;

use anyhow::bail;

use crate::types::Peripheral;

/// Rendering style of one accessor namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Style {
    /// Peripheral base address is a const generic parameter.
    Fixed,
    /// Peripheral base address is held in the peripheral value.
    Runtime,
}

impl Style {
    /// Name of the namespace the style is emitted into.
    pub fn module(self) -> &'static str {
        match self {
            Style::Fixed => "fixed",
            Style::Runtime => "runtime",
        }
    }
}

/// Which accessor styles to generate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    Fixed,
    Runtime,
    #[default]
    Both,
}

impl Strategy {
    pub fn styles(self) -> &'static [Style] {
        match self {
            Strategy::Fixed => &[Style::Fixed],
            Strategy::Runtime => &[Style::Runtime],
            Strategy::Both => &[Style::Fixed, Style::Runtime],
        }
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" | "template" => Ok(Strategy::Fixed),
            "runtime" | "normal" => Ok(Strategy::Runtime),
            "both" => Ok(Strategy::Both),
            _ => bail!("unknown strategy {s:?}; expected fixed, runtime or both"),
        }
    }
}

/// Top-level generator configuration.
///
/// # Example
///
/// ```
/// use mcu_registers_svd_generator::config::{GeneratorConfig, PeripheralFilter, Strategy};
///
/// let config = GeneratorConfig::new()
///     .strategy(Strategy::Runtime)
///     .filter(PeripheralFilter::new().exclude_name("DBGMCU"));
/// assert_eq!(config.strategy, Strategy::Runtime);
/// assert!(config.include_runtime);
/// ```
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub strategy: Strategy,
    /// Embed the `regbase` runtime library. When false the output re-exports
    /// [`Self::runtime_path`] as `regbase` instead.
    pub include_runtime: bool,
    /// Path of an external `regbase` module, used when the runtime is not
    /// embedded.
    pub runtime_path: String,
    pub filter: PeripheralFilter,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            include_runtime: true,
            runtime_path: "mcu_registers_svd_generator::regbase".to_string(),
            filter: PeripheralFilter::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Reference the runtime library at `path` instead of embedding it.
    pub fn external_runtime(mut self, path: &str) -> Self {
        self.include_runtime = false;
        self.runtime_path = path.to_string();
        self
    }

    pub fn filter(mut self, filter: PeripheralFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Selects the peripherals that get generated.
///
/// Filtering happens after the model is built, so a peripheral can still be
/// derived from one that is filtered out.
///
/// ```
/// use mcu_registers_svd_generator::config::PeripheralFilter;
///
/// let filter = PeripheralFilter::new()
///     .include_address_range(0x4000_0000, 0x4fff_ffff)
///     .exclude_name("dbgmcu");
/// assert!(!filter.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct PeripheralFilter {
    /// Only peripherals with these names (case-insensitive), if non-empty.
    pub include_names: Vec<String>,
    /// Peripherals with these names (case-insensitive) are skipped.
    pub exclude_names: Vec<String>,
    /// Only peripherals whose base address falls in one of these inclusive
    /// ranges, if non-empty.
    pub include_address_ranges: Vec<(u64, u64)>,
    /// Peripherals whose base address falls in one of these inclusive ranges
    /// are skipped.
    pub exclude_address_ranges: Vec<(u64, u64)>,
}

impl PeripheralFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_name(mut self, name: &str) -> Self {
        self.include_names.push(name.to_lowercase());
        self
    }

    pub fn exclude_name(mut self, name: &str) -> Self {
        self.exclude_names.push(name.to_lowercase());
        self
    }

    pub fn include_address_range(mut self, start: u64, end: u64) -> Self {
        self.include_address_ranges.push((start, end));
        self
    }

    pub fn exclude_address_range(mut self, start: u64, end: u64) -> Self {
        self.exclude_address_ranges.push((start, end));
        self
    }

    /// Returns true if this filter has no constraints.
    pub fn is_empty(&self) -> bool {
        self.include_names.is_empty()
            && self.exclude_names.is_empty()
            && self.include_address_ranges.is_empty()
            && self.exclude_address_ranges.is_empty()
    }

    /// Returns true if the peripheral should be generated.
    pub fn matches(&self, peripheral: &Peripheral) -> bool {
        let name = peripheral.name.to_lowercase();
        let base = peripheral.base_address;
        let in_range = |ranges: &[(u64, u64)]| ranges.iter().any(|&(s, e)| base >= s && base <= e);

        if !self.include_names.is_empty() && !self.include_names.contains(&name) {
            return false;
        }
        if self.exclude_names.contains(&name) {
            return false;
        }
        if !self.include_address_ranges.is_empty() && !in_range(&self.include_address_ranges) {
            return false;
        }
        !in_range(&self.exclude_address_ranges)
    }
}
