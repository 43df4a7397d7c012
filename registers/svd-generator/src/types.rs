// Licensed under the Apache-2.0 license

//! Semantic model of a peripheral description.
//!
//! ## Architecture Overview
//!
//! ```text
//! Device
//! └── peripherals: Vec<Peripheral>     # document order
//!     └── registers: Vec<Register>     # insertion order
//!         ├── dim / cluster            # repetition templates (before expansion)
//!         └── fields: Vec<Field>
//!             └── enums: Vec<Enum>     # at most one per usage direction
//! ```
//!
//! A [`Device`] is built once from the document and then expanded: every
//! dimensioned register, cluster and field is materialized into concrete
//! instances. The result is wrapped in [`ExpandedDevice`], which is the only
//! form the deduplicator and emitter accept. Nothing mutates the model after
//! expansion.

use std::ops::Deref;

//=============================================================================
// Access modes
//=============================================================================

/// Access permission of a register or field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    #[default]
    ReadWrite,
}

impl Access {
    pub fn is_readable(self) -> bool {
        matches!(self, Access::ReadOnly | Access::ReadWrite)
    }

    pub fn is_writable(self) -> bool {
        matches!(self, Access::WriteOnly | Access::ReadWrite)
    }

    /// Name of the matching marker type in the runtime library.
    pub fn marker(self) -> &'static str {
        match self {
            Access::ReadOnly => "ReadOnly",
            Access::WriteOnly => "WriteOnly",
            Access::ReadWrite => "ReadWrite",
        }
    }
}

/// Direction an enumeratedValues group applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnumUsage {
    Read,
    Write,
    #[default]
    ReadWrite,
}

impl EnumUsage {
    pub fn applies_to_read(self) -> bool {
        matches!(self, EnumUsage::Read | EnumUsage::ReadWrite)
    }

    pub fn applies_to_write(self) -> bool {
        matches!(self, EnumUsage::Write | EnumUsage::ReadWrite)
    }
}

//=============================================================================
// Enumerations
//=============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub value: u64,
}

/// One `enumeratedValues` group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Enum {
    /// Declared name; empty when the document leaves it out.
    pub name: String,
    pub usage: EnumUsage,
    pub values: Vec<EnumValue>,
}

//=============================================================================
// Repetition
//=============================================================================

/// `dim`, `dimIncrement` and the expanded `dimIndex` of a repeated element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DimElement {
    pub dim: u32,
    /// Address stride in bytes for registers and clusters, bit stride for
    /// fields.
    pub dim_increment: u64,
    /// One suffix per instance. Empty means `0..dim`.
    pub dim_index: Vec<String>,
}

impl DimElement {
    /// Largest instance count accepted from a document.
    pub const MAX: u32 = 65_536;

    /// Suffixes for every instance, falling back to `0..dim` when the index
    /// list is missing or its length disagrees with `dim`.
    pub fn suffixes(&self, owner: &str) -> Vec<String> {
        let dim = self.dim.clamp(1, Self::MAX) as usize;
        if self.dim_index.len() == dim {
            return self.dim_index.clone();
        }
        if !self.dim_index.is_empty() {
            log::warn!(
                "{owner}: dimIndex has {} entries but dim is {dim}; using 0..{dim}",
                self.dim_index.len()
            );
        } else if dim == 1 {
            return vec![String::new()];
        }
        (0..dim).map(|i| i.to_string()).collect()
    }
}

/// The repeated group a register was declared in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cluster {
    /// Name template, possibly containing a `%s` placeholder.
    pub name: String,
    pub description: Option<String>,
    pub address_offset: u64,
    pub dim: Option<DimElement>,
}

//=============================================================================
// Fields
//=============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub bit_offset: u32,
    pub bit_width: u32,
    pub access: Access,
    pub enums: Vec<Enum>,
    /// Repetition template. Always `None` after expansion.
    pub dim: Option<DimElement>,
}

impl Field {
    /// The enumeration that types reads of this field, if any.
    pub fn read_enum(&self) -> Option<&Enum> {
        self.enums
            .iter()
            .find(|e| e.usage == EnumUsage::Read)
            .or_else(|| self.enums.iter().find(|e| e.usage.applies_to_read()))
    }

    /// The enumeration that types writes of this field, if any.
    pub fn write_enum(&self) -> Option<&Enum> {
        self.enums
            .iter()
            .find(|e| e.usage == EnumUsage::Write)
            .or_else(|| self.enums.iter().find(|e| e.usage.applies_to_write()))
    }
}

/// Fields produced by expanding one dimensioned field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldGroup {
    /// Template name with the placeholder removed.
    pub name: String,
    /// Indices into the register's `fields`, in instance order.
    pub members: Vec<usize>,
}

//=============================================================================
// Registers
//=============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Register {
    pub name: String,
    pub description: Option<String>,
    /// Byte offset from the peripheral base.
    pub address_offset: u64,
    /// Width in bits.
    pub size: u32,
    pub access: Access,
    pub reset_value: u64,
    pub fields: Vec<Field>,
    /// Filled in by expansion.
    pub field_groups: Vec<FieldGroup>,
    /// Repetition template. Always `None` after expansion.
    pub dim: Option<DimElement>,
    /// Enclosing cluster template. Always `None` after expansion.
    pub cluster: Option<Cluster>,
    /// Shared name of the dimensioned register or cluster member this
    /// instance was expanded from.
    pub dim_group: Option<String>,
}

/// Register defaults that cascade from device to peripheral to register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterProperties {
    pub size: Option<u32>,
    pub access: Option<Access>,
    pub reset_value: Option<u64>,
}

impl RegisterProperties {
    /// Values set here win; the rest come from `outer`.
    pub fn inherit(self, outer: RegisterProperties) -> RegisterProperties {
        RegisterProperties {
            size: self.size.or(outer.size),
            access: self.access.or(outer.access),
            reset_value: self.reset_value.or(outer.reset_value),
        }
    }
}

//=============================================================================
// Peripherals and device
//=============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddressBlock {
    pub offset: u64,
    pub size: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Peripheral {
    pub name: String,
    pub description: Option<String>,
    pub group_name: Option<String>,
    pub base_address: u64,
    pub address_block: AddressBlock,
    pub registers: Vec<Register>,
    pub derived_from: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub version: Option<String>,
    pub schema_version: Option<String>,
    pub description: Option<String>,
    /// Device-wide default reset value.
    pub reset_value: u64,
    pub defaults: RegisterProperties,
    pub peripherals: Vec<Peripheral>,
}

impl Device {
    pub fn peripheral(&self, name: &str) -> Option<&Peripheral> {
        self.peripherals.iter().find(|p| p.name == name)
    }
}

/// A device whose repetitions have all been materialized.
///
/// Only expansion produces one, so holding an
/// `ExpandedDevice` proves that no register or field still carries a
/// `dim`/cluster template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandedDevice(Device);

impl ExpandedDevice {
    pub(crate) fn new(device: Device) -> Self {
        Self(device)
    }

    /// Keep only the peripherals for which `keep` returns true.
    pub fn retain_peripherals(mut self, keep: impl FnMut(&Peripheral) -> bool) -> Self {
        self.0.peripherals.retain(keep);
        self
    }

    pub fn into_inner(self) -> Device {
        self.0
    }
}

impl Deref for ExpandedDevice {
    type Target = Device;

    fn deref(&self) -> &Device {
        &self.0
    }
}
