// Licensed under the Apache-2.0 license

//! Building the semantic model from a document tree.
//!
//! Peripherals are built in document order so that a `derivedFrom` reference
//! can only name a peripheral that is already complete. Dimensioned registers,
//! clusters and fields are kept as templates here; [`super::expand`] turns them
//! into concrete instances.

use mcu_registers_svd::SvdNode;

use crate::types::{
    AddressBlock, Cluster, DimElement, Device, Enum, EnumValue, Field, Peripheral, Register,
    RegisterProperties,
};
use crate::value::{expand_dim_index, parse_access, parse_opt_u64, parse_u64, parse_usage};

/// Register width used when neither the register, its peripheral nor the
/// device declares one.
pub const DEFAULT_REGISTER_SIZE: u32 = 32;

/// Build the device model from the root `<device>` node.
pub fn build_device<N: SvdNode>(root: &N) -> Device {
    let defaults = register_properties(root);
    let mut device = Device {
        name: root.child_text("name").unwrap_or_default(),
        version: root.child_text("version"),
        schema_version: root.attribute("schemaVersion"),
        description: root.child_text("description"),
        reset_value: defaults.reset_value.unwrap_or(0),
        defaults,
        peripherals: vec![],
    };

    let Some(peripherals) = root.child("peripherals") else {
        log::warn!("Device {} has no peripherals", device.name);
        return device;
    };
    for node in peripherals.children() {
        if node.tag() != "peripheral" {
            log::warn!("Device {} has unexpected node {}", device.name, node.tag());
            continue;
        }
        if let Some(peripheral) = build_peripheral(&node, &device.peripherals, defaults) {
            device.peripherals.push(peripheral);
        }
    }
    device
}

/// Reads `size`, `access` and `resetValue` declared directly on `node`.
fn register_properties<N: SvdNode>(node: &N) -> RegisterProperties {
    RegisterProperties {
        size: parse_opt_u64(node.child_text("size").as_deref()).and_then(|s| {
            u32::try_from(s).ok().or_else(|| {
                log::warn!("Register size {s} is out of range; ignoring it");
                None
            })
        }),
        access: node.child_text("access").map(|a| parse_access(&a)),
        reset_value: parse_opt_u64(node.child_text("resetValue").as_deref()),
    }
}

fn build_peripheral<N: SvdNode>(
    node: &N,
    built: &[Peripheral],
    device_defaults: RegisterProperties,
) -> Option<Peripheral> {
    let Some(name) = node.child_text("name") else {
        log::warn!("Skipping peripheral without a name");
        return None;
    };
    let base_address = parse_u64(node.child_text("baseAddress").as_deref());

    if let Some(base_name) = node.attribute("derivedFrom") {
        return Some(match built.iter().find(|p| p.name == base_name) {
            Some(base) => Peripheral {
                name,
                base_address,
                derived_from: Some(base_name),
                ..base.clone()
            },
            None => {
                log::warn!("Couldn't find peripheral {base_name} to derive {name} from");
                Peripheral {
                    name,
                    description: node.child_text("description"),
                    group_name: node.child_text("groupName"),
                    base_address,
                    derived_from: Some(base_name),
                    ..Default::default()
                }
            }
        });
    }

    let address_block = match node.child("addressBlock") {
        Some(block) => AddressBlock {
            offset: parse_u64(block.child_text("offset").as_deref()),
            size: parse_u64(block.child_text("size").as_deref()),
        },
        None => {
            log::info!("{name} has no addressBlock");
            AddressBlock::default()
        }
    };

    let defaults = register_properties(node).inherit(device_defaults);
    let mut registers = vec![];
    if let Some(list) = node.child("registers") {
        for child in list.children() {
            match child.tag() {
                "register" => registers.push(build_register(&child, defaults)),
                "cluster" => registers.extend(build_cluster(&child, &name, defaults)),
                other => log::warn!("Peripheral {name} has register node {other}"),
            }
        }
    }

    Some(Peripheral {
        name,
        description: node.child_text("description"),
        group_name: node.child_text("groupName"),
        base_address,
        address_block,
        registers,
        derived_from: None,
    })
}

/// Reads `dim`, `dimIncrement` and `dimIndex`; `None` when `dim` is absent.
///
/// A count above [`DimElement::MAX`] is logged and treated as a single
/// instance.
fn dim_element<N: SvdNode>(node: &N) -> Option<DimElement> {
    let count = parse_u64(Some(&node.child_text("dim")?));
    let dim = match u32::try_from(count) {
        Ok(dim) if dim <= DimElement::MAX => dim,
        _ => {
            log::warn!(
                "{}: dim {count} exceeds {}; using a single instance",
                node.child_text("name").unwrap_or_default(),
                DimElement::MAX
            );
            1
        }
    };
    Some(DimElement {
        dim,
        dim_increment: parse_u64(node.child_text("dimIncrement").as_deref()),
        dim_index: node
            .child_text("dimIndex")
            .map(|text| expand_dim_index(&text))
            .unwrap_or_default(),
    })
}

fn build_cluster<N: SvdNode>(
    node: &N,
    peripheral: &str,
    defaults: RegisterProperties,
) -> Vec<Register> {
    let cluster = Cluster {
        name: node.child_text("name").unwrap_or_default(),
        description: node.child_text("description"),
        address_offset: parse_u64(node.child_text("addressOffset").as_deref()),
        dim: dim_element(node),
    };
    let defaults = register_properties(node).inherit(defaults);

    let mut registers = vec![];
    for child in node.children() {
        match child.tag() {
            "register" => {
                let mut register = build_register(&child, defaults);
                register.cluster = Some(cluster.clone());
                registers.push(register);
            }
            "cluster" => log::warn!(
                "{peripheral}: nested cluster {} inside {} is not supported",
                child.child_text("name").unwrap_or_default(),
                cluster.name
            ),
            _ => {}
        }
    }
    registers
}

fn build_register<N: SvdNode>(node: &N, defaults: RegisterProperties) -> Register {
    let props = register_properties(node).inherit(defaults);
    let name = node.child_text("name").unwrap_or_default();
    let access = props.access.unwrap_or_default();

    let mut fields = vec![];
    if let Some(list) = node.child("fields") {
        for child in list.children() {
            if child.tag() != "field" {
                log::warn!("Register {name} has field node {}", child.tag());
                continue;
            }
            fields.push(build_field(&child, access));
        }
    }

    Register {
        description: node.child_text("description"),
        address_offset: parse_u64(node.child_text("addressOffset").as_deref()),
        size: match props.size {
            Some(0) | None => DEFAULT_REGISTER_SIZE,
            Some(size) => size,
        },
        access,
        reset_value: props.reset_value.unwrap_or(0),
        fields,
        dim: dim_element(node),
        name,
        ..Default::default()
    }
}

/// Bit position from `bitOffset`/`bitWidth`, `lsb`/`msb` or `bitRange`.
///
/// A position that does not fit `u32` comes back as `(0, 0)`, which the
/// planner skips as a zero-width field.
fn bit_range<N: SvdNode>(node: &N, name: &str) -> (u32, u32) {
    let (offset, width) = if let Some(offset) = node.child_text("bitOffset") {
        let width = node.child_text("bitWidth");
        (
            parse_u64(Some(&offset)),
            width.map_or(1, |w| parse_u64(Some(&w))),
        )
    } else if let (Some(lsb), Some(msb)) = (node.child_text("lsb"), node.child_text("msb")) {
        lsb_msb(parse_u64(Some(&lsb)), parse_u64(Some(&msb)))
    } else if let Some(range) = node.child_text("bitRange") {
        let inner = range.trim_start_matches('[').trim_end_matches(']');
        let Some((msb, lsb)) = inner.split_once(':') else {
            log::warn!("{name}: malformed bitRange {range:?}");
            return (0, 0);
        };
        lsb_msb(parse_u64(Some(lsb)), parse_u64(Some(msb)))
    } else {
        return (0, 0);
    };
    match (u32::try_from(offset), u32::try_from(width)) {
        (Ok(offset), Ok(width)) if offset.checked_add(width).is_some() => (offset, width),
        _ => {
            log::warn!("{name}: bit offset {offset} width {width} is out of range");
            (0, 0)
        }
    }
}

fn lsb_msb(lsb: u64, msb: u64) -> (u64, u64) {
    (lsb.min(msb), lsb.abs_diff(msb).saturating_add(1))
}

fn build_field<N: SvdNode>(node: &N, register_access: crate::types::Access) -> Field {
    let name = node.child_text("name").unwrap_or_default();
    let (bit_offset, bit_width) = bit_range(node, &name);
    Field {
        name,
        description: node.child_text("description"),
        bit_offset,
        bit_width,
        access: node
            .child_text("access")
            .map_or(register_access, |a| parse_access(&a)),
        enums: node
            .children_named("enumeratedValues")
            .iter()
            .map(build_enum)
            .collect(),
        dim: dim_element(node),
    }
}

fn build_enum<N: SvdNode>(node: &N) -> Enum {
    let mut values = vec![];
    for child in node.children() {
        match child.tag() {
            "enumeratedValue" => {
                // `isDefault` entries name a catch-all, not a value.
                if child.child("value").is_none() {
                    continue;
                }
                values.push(EnumValue {
                    name: child.child_text("name").unwrap_or_default(),
                    description: child.child_text("description"),
                    value: parse_u64(child.child_text("value").as_deref()),
                });
            }
            "name" | "usage" | "headerEnumName" => {}
            other => log::warn!("enumeratedValues node has value {other}"),
        }
    }
    Enum {
        name: node.child_text("name").unwrap_or_default(),
        usage: parse_usage(node.child_text("usage").as_deref()),
        values,
    }
}
