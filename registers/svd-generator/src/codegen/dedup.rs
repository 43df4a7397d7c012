// Licensed under the Apache-2.0 license

//! Structural deduplication of registers and peripherals.
//!
//! Each register is rendered in canonical form (placeholder name, zero
//! offset) and hashed. Registers sharing a hash form a group represented by
//! the first one seen; the group remembers every instance offset so that one
//! type plus an indexed accessor can replace the per-instance types. Whole
//! peripherals are compared the same way one level up.
//!
//! Nothing here changes the model: the (register, field) to (address, bits,
//! reset value) mapping is identical before and after grouping.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::types::{ExpandedDevice, Register};

use super::generate::{canonical_peripheral, canonical_register};

/// SHA-256 of a canonical rendering.
pub type LayoutHash = [u8; 32];

pub fn layout_hash(canonical: &str) -> LayoutHash {
    let digest = Sha256::digest(canonical.as_bytes());
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&digest);
    hash
}

/// Short hex prefix of a hash, for logs.
pub fn short_hash(hash: &LayoutHash) -> String {
    hash[..6].iter().map(|b| format!("{b:02x}")).collect()
}

/// Registers of one peripheral sharing a layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterGroup {
    pub hash: LayoutHash,
    /// Index of the first register with this layout.
    pub representative: usize,
    /// Register indices, in instance order.
    pub members: Vec<usize>,
    /// Offset of each member.
    pub offsets: Vec<u64>,
    pub min_offset: u64,
    pub max_offset: u64,
    pub count: usize,
}

impl RegisterGroup {
    fn new(hash: LayoutHash, index: usize, offset: u64) -> Self {
        Self {
            hash,
            representative: index,
            members: vec![index],
            offsets: vec![offset],
            min_offset: offset,
            max_offset: offset,
            count: 1,
        }
    }

    fn add(&mut self, index: usize, offset: u64) {
        self.members.push(index);
        self.offsets.push(offset);
        self.min_offset = self.min_offset.min(offset);
        self.max_offset = self.max_offset.max(offset);
        self.count += 1;
    }

    /// `(max - min) / (count - 1)`, when every instance actually sits at
    /// `offsets[0] + stride * index`.
    ///
    /// Irregular groups (e.g. instances at 0x0, 0x4 and 0xc) return `None`
    /// and are addressed through their offset table instead.
    pub fn stride(&self) -> Option<u64> {
        if self.count < 2 {
            return None;
        }
        let stride = (self.max_offset - self.min_offset) / (self.count as u64 - 1);
        let first = self.offsets[0];
        let uniform = self
            .offsets
            .iter()
            .enumerate()
            .all(|(i, &o)| Some(o) == (i as u64).checked_mul(stride).map(|d| first + d));
        uniform.then_some(stride)
    }
}

/// Register grouping of one peripheral.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeripheralLayout {
    /// Groups in order of their representative.
    pub groups: Vec<RegisterGroup>,
    /// Group index of every register.
    pub group_of: Vec<usize>,
}

impl PeripheralLayout {
    pub fn analyze(registers: &[Register]) -> Self {
        let mut layout = PeripheralLayout::default();
        let mut by_hash: HashMap<LayoutHash, usize> = HashMap::new();
        for (i, register) in registers.iter().enumerate() {
            let hash = layout_hash(&canonical_register(register));
            let offset = register.address_offset;
            match by_hash.get(&hash) {
                Some(&g) => {
                    layout.groups[g].add(i, offset);
                    layout.group_of.push(g);
                }
                None => {
                    by_hash.insert(hash, layout.groups.len());
                    layout.group_of.push(layout.groups.len());
                    layout.groups.push(RegisterGroup::new(hash, i, offset));
                }
            }
        }
        layout
    }

    pub fn group(&self, register: usize) -> &RegisterGroup {
        &self.groups[self.group_of[register]]
    }

    /// Position of a register within its group.
    pub fn slot_of(&self, register: usize) -> usize {
        self.group(register)
            .members
            .iter()
            .position(|&m| m == register)
            .unwrap_or(0)
    }
}

/// Grouping of every register and peripheral of a device.
#[derive(Clone, Debug, Default)]
pub struct DedupMap {
    layouts: Vec<PeripheralLayout>,
    hashes: Vec<LayoutHash>,
    representatives: Vec<usize>,
}

impl DedupMap {
    pub fn analyze(device: &ExpandedDevice) -> Self {
        let mut map = DedupMap::default();
        let mut by_hash: HashMap<LayoutHash, usize> = HashMap::new();
        for (i, peripheral) in device.peripherals.iter().enumerate() {
            let layout = PeripheralLayout::analyze(&peripheral.registers);
            let hash = layout_hash(&canonical_peripheral(peripheral, &layout));
            let representative = *by_hash.entry(hash).or_insert(i);
            if representative == i {
                log::debug!("{}: layout {}", peripheral.name, short_hash(&hash));
            } else {
                log::debug!(
                    "{}: layout {} shared with {}",
                    peripheral.name,
                    short_hash(&hash),
                    device.peripherals[representative].name
                );
            }
            map.layouts.push(layout);
            map.hashes.push(hash);
            map.representatives.push(representative);
        }
        map
    }

    pub fn layout(&self, peripheral: usize) -> &PeripheralLayout {
        &self.layouts[peripheral]
    }

    pub fn hash(&self, peripheral: usize) -> &LayoutHash {
        &self.hashes[peripheral]
    }

    /// Index of the peripheral whose type `peripheral` uses.
    pub fn representative(&self, peripheral: usize) -> usize {
        self.representatives[peripheral]
    }

    /// Peripherals collapsed into `peripheral`, in device order.
    pub fn aliases_of(&self, peripheral: usize) -> Vec<usize> {
        self.representatives
            .iter()
            .enumerate()
            .filter(|&(i, &r)| r == peripheral && i != peripheral)
            .map(|(i, _)| i)
            .collect()
    }
}
