// Licensed under the Apache-2.0 license

//! Materialization of dimensioned registers, clusters and fields.
//!
//! Offsets of repeated instances:
//! - plain register: `addressOffset + dimIncrement * i`
//! - clustered register: `clusterOffset + dimIncrement * i + addressOffset`
//! - field: `bitOffset + dimIncrement * i`

use crate::types::{Device, ExpandedDevice, Field, FieldGroup, Peripheral, Register};
use crate::value::{strip_placeholder, substitute};

/// Expand every repetition template in the device.
pub fn expand_device(mut device: Device) -> ExpandedDevice {
    for peripheral in device.peripherals.iter_mut() {
        expand_peripheral(peripheral);
    }
    ExpandedDevice::new(device)
}

fn expand_peripheral(peripheral: &mut Peripheral) {
    let registers = std::mem::take(&mut peripheral.registers);
    peripheral.registers = registers
        .iter()
        .flat_map(|r| expand_register(&peripheral.name, r))
        .collect();
}

/// Concrete instances of one register template, in index order.
///
/// A register without `dim` or cluster comes back unchanged apart from field
/// expansion.
pub fn expand_register(peripheral: &str, register: &Register) -> Vec<Register> {
    let mut instances = if let Some(cluster) = &register.cluster {
        let suffixes = match &cluster.dim {
            Some(dim) => dim.suffixes(&format!("{peripheral}.{}", cluster.name)),
            None => vec![String::new()],
        };
        let increment = cluster.dim.as_ref().map_or(0, |d| d.dim_increment);
        let repeated = suffixes.len() > 1;
        // Registers may themselves repeat inside each cluster instance.
        let template = Register {
            cluster: None,
            ..register.clone()
        };
        let inner = expand_plain(peripheral, &template);
        let mut out = vec![];
        for (i, suffix) in suffixes.iter().enumerate() {
            let prefix = substitute(&cluster.name, suffix);
            let base = stride(cluster.address_offset, increment, i);
            for reg in inner.iter() {
                let group_member = reg.dim_group.as_deref().unwrap_or(&reg.name);
                out.push(Register {
                    name: format!("{prefix}_{}", reg.name),
                    address_offset: base.saturating_add(reg.address_offset),
                    dim_group: repeated.then(|| {
                        format!("{}_{group_member}", strip_placeholder(&cluster.name))
                    }),
                    description: reg
                        .description
                        .clone()
                        .or_else(|| cluster.description.clone()),
                    ..reg.clone()
                });
            }
        }
        out
    } else {
        expand_plain(peripheral, register)
    };

    for instance in instances.iter_mut() {
        expand_fields(instance);
    }
    instances
}

fn expand_plain(peripheral: &str, register: &Register) -> Vec<Register> {
    let Some(dim) = &register.dim else {
        return vec![register.clone()];
    };
    let suffixes = dim.suffixes(&format!("{peripheral}.{}", register.name));
    let repeated = suffixes.len() > 1;
    suffixes
        .iter()
        .enumerate()
        .map(|(i, suffix)| Register {
            name: substitute(&register.name, suffix),
            address_offset: stride(register.address_offset, dim.dim_increment, i),
            dim: None,
            dim_group: repeated.then(|| strip_placeholder(&register.name)),
            ..register.clone()
        })
        .collect()
}

/// Replace dimensioned fields with their instances and record each set of
/// instances as a [`FieldGroup`].
fn expand_fields(register: &mut Register) {
    if register.fields.iter().all(|f| f.dim.is_none()) {
        return;
    }
    let templates = std::mem::take(&mut register.fields);
    for field in templates {
        let Some(dim) = &field.dim else {
            register.fields.push(field);
            continue;
        };
        let suffixes = dim.suffixes(&format!("{}.{}", register.name, field.name));
        let first = register.fields.len();
        for (i, suffix) in suffixes.iter().enumerate() {
            let name = substitute(&field.name, suffix);
            let offset = stride(u64::from(field.bit_offset), dim.dim_increment, i);
            // Out-of-range instances keep `u32::MAX` so the planner skips them.
            let bit_offset = u32::try_from(offset).unwrap_or_else(|_| {
                log::warn!("{}.{name}: bit offset {offset} is out of range", register.name);
                u32::MAX
            });
            register.fields.push(Field {
                name,
                bit_offset,
                dim: None,
                ..field.clone()
            });
        }
        if suffixes.len() > 1 {
            register.field_groups.push(FieldGroup {
                name: strip_placeholder(&field.name),
                members: (first..register.fields.len()).collect(),
            });
        }
    }
}

/// `start + increment * index`, saturating instead of wrapping.
fn stride(start: u64, increment: u64, index: usize) -> u64 {
    increment
        .saturating_mul(index as u64)
        .saturating_add(start)
}
