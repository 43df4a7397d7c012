// Licensed under the Apache-2.0 license

//! Main code generation pipeline for converting SVD descriptions into register
//! accessors.
//!
//! The stages run strictly in order:
//! - `parse`: document tree to [`Device`] (derivation resolved, templates kept)
//! - `expand`: [`Device`] to [`ExpandedDevice`] (dim and clusters materialized)
//! - `dedup`: grouping of identical register and peripheral layouts
//! - `generate`: declaration planning for the selected styles
//! - [`crate::output`]: formatting of the declarations

mod dedup;
mod expand;
mod generate;
mod parse;

use std::fmt::Write;
use std::path::Path;

use anyhow::Context;
use mcu_registers_svd::{Document, SvdNode};

use crate::config::GeneratorConfig;
use crate::output;
use crate::types::{Device, ExpandedDevice};

pub use dedup::{layout_hash, DedupMap, LayoutHash, PeripheralLayout, RegisterGroup};
pub use expand::{expand_device, expand_register};
pub use generate::{
    canonical_peripheral, canonical_register, plan, plan_peripheral, plan_register,
    storage_type, EnumRegistry, REGBASE_SOURCE,
};
pub use parse::{build_device, DEFAULT_REGISTER_SIZE};

/// Build and expand the model of a document tree.
pub fn build_expanded<N: SvdNode>(root: &N) -> ExpandedDevice {
    expand_device(build_device(root))
}

/// Generate accessor code for an already expanded device.
pub fn generate_device(device: ExpandedDevice, config: &GeneratorConfig) -> String {
    let total = device.peripherals.len();
    let device = device.retain_peripherals(|p| config.filter.matches(p));
    if device.peripherals.len() != total {
        log::info!(
            "Generating {} of {total} peripherals",
            device.peripherals.len()
        );
    }
    let dedup = DedupMap::analyze(&device);
    let decls = plan(&device, &dedup, config);

    let mut out = String::new();
    writeln!(
        out,
        "// Generated by mcu-registers-svd-generator from `{}`{}. Do not edit.",
        device.name,
        device
            .version
            .as_deref()
            .map(|v| format!(" version {v}"))
            .unwrap_or_default()
    )
    .unwrap();
    writeln!(out).unwrap();
    out.push_str(&output::render(&decls));
    out
}

/// Generate accessor code from a loaded document.
///
/// Generation cannot fail once the document is loaded: anomalies in the
/// description are logged and defaulted.
pub fn generate(document: &Document, config: &GeneratorConfig) -> String {
    generate_device(build_expanded(&document.root()), config)
}

/// Generate accessor code from SVD text.
pub fn generate_from_str(xml: &str, config: &GeneratorConfig) -> anyhow::Result<String> {
    let document = Document::parse(xml).context("failed to load peripheral description")?;
    Ok(generate(&document, config))
}

/// Generate accessor code from an SVD file.
pub fn generate_from_file(path: &Path, config: &GeneratorConfig) -> anyhow::Result<String> {
    let document = Document::from_file(path)
        .with_context(|| format!("failed to load peripheral description {}", path.display()))?;
    Ok(generate(&document, config))
}

/// Build the model of a document without expanding it.
pub fn build(document: &Document) -> Device {
    build_device(&document.root())
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
