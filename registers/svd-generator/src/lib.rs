// Licensed under the Apache-2.0 license

//! CMSIS-SVD to type-safe register accessor code generator.
//!
//! This crate turns a peripheral description into one Rust module exposing
//! zero-overhead accessors for every peripheral, register and bit field, in
//! two interchangeable styles:
//!
//! - `fixed`: the peripheral base address is a const generic parameter, so
//!   every register address is a compile-time constant.
//! - `runtime`: the peripheral holds its base address, so one type serves every
//!   instance of a repeated peripheral.
//!
//! ## Usage
//!
//! ```
//! use mcu_registers_svd_generator::{generate_from_str, GeneratorConfig};
//!
//! let svd = r#"
//! <device>
//!   <name>DEMO</name>
//!   <peripherals>
//!     <peripheral>
//!       <name>GPIOA</name>
//!       <baseAddress>0x40020000</baseAddress>
//!       <registers>
//!         <register>
//!           <name>ODR</name>
//!           <addressOffset>0x14</addressOffset>
//!         </register>
//!       </registers>
//!     </peripheral>
//!   </peripherals>
//! </device>"#;
//! let code = generate_from_str(svd, &GeneratorConfig::new()).unwrap();
//! assert!(code.contains("pub struct Gpioa<const BASE: usize = 0x4002_0000>(());"));
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: the semantic model ([`Device`], [`Peripheral`], [`Register`], ...)
//! - [`config`]: strategy selection and peripheral filtering ([`GeneratorConfig`])
//! - [`output`]: declaration types and the formatting pass
//! - [`regbase`]: the accessor runtime library, also embedded into every output
//! - [`util`]: identifier conversion and hex formatting

pub mod config;
pub mod output;
pub mod regbase;
pub mod types;
pub mod util;

mod codegen;
mod value;

pub use codegen::{
    build, build_device, build_expanded, canonical_peripheral, canonical_register,
    expand_device, expand_register, generate, generate_device, generate_from_file,
    generate_from_str, layout_hash, plan, plan_peripheral, plan_register, storage_type, DedupMap,
    EnumRegistry, LayoutHash, PeripheralLayout, RegisterGroup, DEFAULT_REGISTER_SIZE,
    REGBASE_SOURCE,
};
pub use config::{GeneratorConfig, PeripheralFilter, Strategy, Style};
pub use mcu_registers_svd::{Document, SvdError, SvdNode};
pub use types::{
    Access, AddressBlock, Cluster, DimElement, Device, Enum, EnumUsage, EnumValue,
    ExpandedDevice, Field, FieldGroup, Peripheral, Register, RegisterProperties,
};
