// Licensed under the Apache-2.0 license

//! Planning: turning the expanded model and its dedup map into declarations.
//!
//! Every naming and typing decision is made here, once, and shared by both
//! accessor styles. Enumeration types are tracked by an [`EnumRegistry`] that
//! is created fresh for each peripheral and passed down explicitly.

use std::collections::HashMap;

use crate::config::{GeneratorConfig, Style};
use crate::output::{
    AccessorDecl, AccessorKind, ConstDecl, Decl, EnumDecl, EnumValueDecl, FieldDecl,
    FieldGroupDecl, FunctionsDecl, FunctionsSource, NamespaceDecl, PeripheralAlias,
    PeripheralDecl, Placement, RegisterDecl,
};
use crate::types::{Enum, EnumUsage, EnumValue, ExpandedDevice, Field, Peripheral, Register};
use crate::util::{camel_case, hex_const, screaming_case, snake_case, IdentSet};

use super::dedup::{DedupMap, PeripheralLayout};

/// Source of the runtime library embedded into generated output.
pub const REGBASE_SOURCE: &str = include_str!("../regbase.rs");

/// Method names the runtime library already uses on registers and values.
const RESERVED_FIELD_NAMES: &[&str] = &[
    "new",
    "load",
    "store",
    "modify",
    "reset",
    "reset_value",
    "address",
    "value",
    "field",
    "bits",
    "from_bits",
    "offset",
    "deref",
    "clone",
    "fmt",
    "default",
];

/// Method names already used on peripheral types.
const RESERVED_ACCESSOR_NAMES: &[&str] = &["steal", "new", "base", "clone", "fmt"];

/// Storage type for a register of `size` bits.
pub fn storage_type(size: u32) -> (&'static str, u32) {
    match size {
        0..=8 => ("u8", 8),
        9..=16 => ("u16", 16),
        17..=32 => ("u32", 32),
        _ => ("u64", 64),
    }
}

//=============================================================================
// Enumeration registry
//=============================================================================

struct RegisteredEnum {
    type_name: String,
    bits: &'static str,
    values: Vec<EnumValue>,
}

/// Enumeration types already emitted in one peripheral module.
///
/// An enumeration seen again with the same name and values reuses the first
/// type. The same name with different values gets a register-qualified type.
#[derive(Default)]
pub struct EnumRegistry {
    by_name: HashMap<String, Vec<RegisteredEnum>>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type name for `e` on field `field` of register type `register`, plus
    /// the declaration when this is the first time the type is needed.
    pub fn resolve(
        &mut self,
        e: &Enum,
        field: &Field,
        register: &str,
        bits: &'static str,
        types: &mut IdentSet,
    ) -> (String, Option<EnumDecl>) {
        let declared = if e.name.is_empty() {
            let direction = match e.usage {
                EnumUsage::Read => "Read",
                EnumUsage::Write => "Write",
                EnumUsage::ReadWrite => "",
            };
            format!("{}{direction}", camel_case(&field.name))
        } else {
            e.name.clone()
        };

        let known = self.by_name.entry(declared.clone()).or_default();
        if let Some(existing) = known
            .iter()
            .find(|k| k.bits == bits && k.values == e.values)
        {
            return (existing.type_name.clone(), None);
        }
        let candidate = if known.is_empty() {
            camel_case(&declared)
        } else {
            let qualified = format!("{register}{}", camel_case(&declared));
            log::warn!(
                "Enumeration {declared} in {register} differs from an earlier definition; \
                 emitting it as {qualified}"
            );
            qualified
        };
        let type_name = types.unique(candidate);

        let mut value_names = IdentSet::new();
        let decl = EnumDecl {
            type_name: type_name.clone(),
            description: Some(format!("Values of the `{}` field.", field.name)),
            bits,
            values: e
                .values
                .iter()
                .map(|v| EnumValueDecl {
                    name: value_names.unique(screaming_case(&v.name)),
                    value: v.value,
                    description: v.description.clone(),
                })
                .collect(),
        };
        known.push(RegisteredEnum {
            type_name: type_name.clone(),
            bits,
            values: e.values.clone(),
        });
        (type_name, Some(decl))
    }
}

//=============================================================================
// Registers
//=============================================================================

/// Plan the declaration of one register layout.
///
/// `base_name` names the layout (the shared name for grouped instances).
pub fn plan_register(
    register: &Register,
    base_name: &str,
    placement: Placement,
    types: &mut IdentSet,
    enums: &mut EnumRegistry,
) -> RegisterDecl {
    let type_name = types.unique(camel_case(base_name));
    let value_name = types.unique(format!("{type_name}Value"));
    let (bits, width) = storage_type(register.size);

    let mut names = RESERVED_FIELD_NAMES
        .iter()
        .fold(IdentSet::new(), |set, name| set.reserve(name));
    let mut enum_decls = vec![];
    let mut fields = vec![];
    // Planned index of each model field; `None` when it cannot be emitted.
    let mut planned = vec![];

    // The declared size bounds fields even when the storage type is wider.
    let size = match register.size {
        0 => width,
        size => size.min(width),
    };

    for field in register.fields.iter() {
        let end = u64::from(field.bit_offset) + u64::from(field.bit_width);
        if field.bit_width == 0 || end > u64::from(size) {
            log::warn!(
                "{}.{}: bits {}..{end} do not fit a {size}-bit register; skipping field",
                register.name,
                field.name,
                field.bit_offset,
            );
            planned.push(None);
            continue;
        }
        let mut resolve = |e: Option<&Enum>| match e {
            Some(e) => {
                let (name, decl) = enums.resolve(e, field, &type_name, bits, types);
                enum_decls.extend(decl);
                name
            }
            None => bits.to_string(),
        };
        let read_type = resolve(field.read_enum().filter(|_| field.access.is_readable()));
        let write_type = resolve(field.write_enum().filter(|_| field.access.is_writable()));

        planned.push(Some(fields.len()));
        fields.push(FieldDecl {
            name: names.unique(snake_case(&field.name)),
            description: field.description.clone(),
            bits,
            offset: field.bit_offset,
            width: field.bit_width,
            access: field.access,
            read_type,
            write_type,
        });
    }

    let mut field_groups = vec![];
    for group in register.field_groups.iter() {
        let members: Option<Vec<&FieldDecl>> = group
            .members
            .iter()
            .map(|&i| planned.get(i).copied().flatten().map(|p| &fields[p]))
            .collect();
        let Some(members) = members.filter(|m| !m.is_empty()) else {
            continue;
        };
        let first = members[0];
        let snake = snake_case(&group.name);
        field_groups.push(FieldGroupDecl {
            at_name: names.unique(format!("{snake}_at")),
            fields_name: names.unique(format!("{snake}_fields")),
            offsets: members.iter().map(|f| f.offset).collect(),
            width: first.width,
            access: first.access,
            read_type: first.read_type.clone(),
            write_type: first.write_type.clone(),
        });
    }

    RegisterDecl {
        type_name,
        value_name,
        description: register.description.clone(),
        bits,
        access: register.access,
        reset_value: register.reset_value,
        placement,
        enums: enum_decls,
        fields,
        field_groups,
    }
}

/// Name-independent rendering of a register, used to detect identical
/// layouts.
pub fn canonical_register(register: &Register) -> String {
    let shape = Register {
        name: String::new(),
        description: None,
        address_offset: 0,
        dim_group: None,
        ..register.clone()
    };
    let decl = plan_register(
        &shape,
        "Register",
        Placement::Single { offset: 0 },
        &mut IdentSet::new(),
        &mut EnumRegistry::new(),
    );
    crate::output::render(&[Decl::Register(decl)])
}

//=============================================================================
// Peripherals
//=============================================================================

/// Plan one peripheral, its register layouts and its accessors.
pub fn plan_peripheral(
    peripheral: &Peripheral,
    layout: &PeripheralLayout,
    type_name: String,
    module_name: String,
) -> PeripheralDecl {
    let mut enums = EnumRegistry::new();
    let mut types = IdentSet::new();
    let mut accessor_names = RESERVED_ACCESSOR_NAMES
        .iter()
        .fold(IdentSet::new(), |set, name| set.reserve(name));

    let mut registers = vec![];
    for group in layout.groups.iter() {
        let rep = &peripheral.registers[group.representative];
        let (base_name, placement) = if group.count > 1 {
            (
                rep.dim_group.clone().unwrap_or_else(|| rep.name.clone()),
                Placement::Indexed {
                    offsets: group.offsets.clone(),
                    stride: group.stride(),
                },
            )
        } else {
            (
                rep.name.clone(),
                Placement::Single {
                    offset: rep.address_offset,
                },
            )
        };
        registers.push(plan_register(
            rep,
            &base_name,
            placement,
            &mut types,
            &mut enums,
        ));
    }

    let mut accessors = vec![];
    for (i, register) in peripheral.registers.iter().enumerate() {
        let group_index = layout.group_of[i];
        let group = &layout.groups[group_index];
        let kind = if group.count > 1 {
            AccessorKind::Instance {
                index: layout.slot_of(i),
                offset: register.address_offset,
            }
        } else {
            AccessorKind::Single {
                offset: register.address_offset,
            }
        };
        accessors.push(AccessorDecl {
            name: accessor_names.unique(snake_case(&register.name)),
            register: registers[group_index].type_name.clone(),
            description: register.description.clone(),
            kind,
        });
    }
    for (group, decl) in layout.groups.iter().zip(registers.iter()) {
        if group.count < 2 {
            continue;
        }
        let rep = &peripheral.registers[group.representative];
        let base = rep.dim_group.as_deref().unwrap_or(&rep.name);
        accessors.push(AccessorDecl {
            name: accessor_names.unique(format!("{}_at", snake_case(base))),
            register: decl.type_name.clone(),
            description: None,
            kind: AccessorKind::Indexed { count: group.count },
        });
    }

    PeripheralDecl {
        name: peripheral.name.clone(),
        type_name,
        module_name,
        description: peripheral.description.clone(),
        base_address: peripheral.base_address,
        aliases: vec![],
        registers,
        accessors,
    }
}

/// Name- and address-independent rendering of a peripheral.
pub fn canonical_peripheral(peripheral: &Peripheral, layout: &PeripheralLayout) -> String {
    let mut decl = plan_peripheral(
        peripheral,
        layout,
        "Peripheral".to_string(),
        "peripheral".to_string(),
    );
    decl.name = String::new();
    decl.description = None;
    decl.base_address = 0;
    crate::output::render(&[Decl::Peripheral(decl)])
}

//=============================================================================
// Whole device
//=============================================================================

/// Type and module names of every peripheral, in device order.
fn peripheral_names(device: &ExpandedDevice) -> Vec<(String, String)> {
    let mut types = IdentSet::new();
    let mut modules = IdentSet::new().reserve("regbase");
    device
        .peripherals
        .iter()
        .map(|p| {
            (
                types.unique(camel_case(&p.name)),
                modules.unique(snake_case(&p.name)),
            )
        })
        .collect()
}

fn device_namespace(device: &ExpandedDevice) -> NamespaceDecl {
    let text = |s: &str| format!("{s:?}");
    let mut consts = vec![ConstDecl {
        name: "NAME".to_string(),
        ty: "&str",
        value: text(&device.name),
        doc: None,
    }];
    if let Some(version) = &device.version {
        consts.push(ConstDecl {
            name: "VERSION".to_string(),
            ty: "&str",
            value: text(version),
            doc: None,
        });
    }
    if let Some(schema) = &device.schema_version {
        consts.push(ConstDecl {
            name: "SCHEMA_VERSION".to_string(),
            ty: "&str",
            value: text(schema),
            doc: Some("Version of the description format.".to_string()),
        });
    }
    consts.push(ConstDecl {
        name: "RESET_VALUE".to_string(),
        ty: "u64",
        value: hex_const(device.reset_value),
        doc: Some("Default register reset value.".to_string()),
    });
    let mut names = IdentSet::new();
    for p in device.peripherals.iter() {
        consts.push(ConstDecl {
            name: names.unique(format!("{}_BASE", screaming_case(&p.name))),
            ty: "usize",
            value: hex_const(p.base_address),
            doc: Some(format!("Base address of `{}`.", p.name)),
        });
    }
    NamespaceDecl {
        name: "device".to_string(),
        doc: match &device.description {
            Some(d) => crate::util::doc_line(d),
            None => format!("Metadata of the `{}` device.", device.name),
        },
        style: None,
        consts,
        items: vec![],
    }
}

fn style_namespace(
    device: &ExpandedDevice,
    dedup: &DedupMap,
    names: &[(String, String)],
    style: Style,
) -> NamespaceDecl {
    let mut items = vec![];
    for (i, peripheral) in device.peripherals.iter().enumerate() {
        if dedup.representative(i) != i {
            continue;
        }
        let (type_name, module_name) = names[i].clone();
        let mut decl = plan_peripheral(peripheral, dedup.layout(i), type_name, module_name);
        decl.aliases = dedup
            .aliases_of(i)
            .into_iter()
            .map(|j| PeripheralAlias {
                type_name: names[j].0.clone(),
                base_address: device.peripherals[j].base_address,
                description: device.peripherals[j].description.clone(),
            })
            .collect();
        items.push(Decl::Peripheral(decl));
    }
    NamespaceDecl {
        name: style.module().to_string(),
        doc: match style {
            Style::Fixed => "Accessors with the peripheral base address fixed at compile time.",
            Style::Runtime => "Accessors with the peripheral base address supplied at run time.",
        }
        .to_string(),
        style: Some(style),
        consts: vec![],
        items,
    }
}

/// Plan every top-level declaration of the output.
pub fn plan(device: &ExpandedDevice, dedup: &DedupMap, config: &GeneratorConfig) -> Vec<Decl> {
    let source = if config.include_runtime {
        FunctionsSource::Embedded(REGBASE_SOURCE)
    } else {
        FunctionsSource::External(config.runtime_path.clone())
    };
    let mut decls = vec![
        Decl::Functions(FunctionsDecl {
            name: "regbase".to_string(),
            source,
        }),
        Decl::Namespace(device_namespace(device)),
    ];
    let names = peripheral_names(device);
    for &style in config.strategy.styles() {
        decls.push(Decl::Namespace(style_namespace(device, dedup, &names, style)));
    }
    decls
}
