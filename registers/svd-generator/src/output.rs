// Licensed under the Apache-2.0 license

//! Declaration types and the formatting pass that spells them as Rust.
//!
//! The planner decides *what* to emit as a tree of [`Decl`] nodes; this module
//! decides *how* it is spelled. The two accessor styles share every structural
//! decision (type names, enum typing, grouping) and differ only here.
//!
//! ## Generated Code Structure
//!
//! ```text
//! pub mod regbase { ... }                       # Decl::Functions
//! pub mod device { pub const NAME: &str ... }   # Decl::Namespace
//! pub mod fixed {                               # Decl::Namespace (Style::Fixed)
//!     pub struct Gpioa<const BASE: usize = 0x4002_0000>(());
//!     pub type Gpiob = Gpioa<0x4002_0400>;
//!     pub mod gpioa {
//!         pub struct ModerValue(pub u32);       # chain value
//!         pub struct Moder<const BASE: usize>(..);
//!     }
//! }
//! pub mod runtime {                             # Decl::Namespace (Style::Runtime)
//!     pub struct Gpioa { base: usize }
//!     pub type Gpiob = Gpioa;
//!     pub mod gpioa { ... }
//! }
//! ```

use std::fmt::Write;

use crate::config::Style;
use crate::types::Access;
use crate::util::{doc_line, hex_const, indent};

//=============================================================================
// Declarations
//=============================================================================

/// One node of the declaration tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decl {
    Namespace(NamespaceDecl),
    Peripheral(PeripheralDecl),
    Register(RegisterDecl),
    Field(FieldDecl),
    Functions(FunctionsDecl),
}

/// A `pub mod` holding constants and further declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub name: String,
    pub doc: String,
    /// Accessor style of the peripherals inside, if any.
    pub style: Option<Style>,
    pub consts: Vec<ConstDecl>,
    pub items: Vec<Decl>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstDecl {
    pub name: String,
    pub ty: &'static str,
    /// Already spelled as a Rust literal.
    pub value: String,
    pub doc: Option<String>,
}

/// Another peripheral sharing the representative's layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeripheralAlias {
    pub type_name: String,
    pub base_address: u64,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeripheralDecl {
    /// Source name, used in docs.
    pub name: String,
    pub type_name: String,
    pub module_name: String,
    pub description: Option<String>,
    pub base_address: u64,
    pub aliases: Vec<PeripheralAlias>,
    /// One declaration per unique register layout.
    pub registers: Vec<RegisterDecl>,
    pub accessors: Vec<AccessorDecl>,
}

/// A method on a peripheral returning one of its registers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessorDecl {
    pub name: String,
    /// Type name of the register layout in the peripheral module.
    pub register: String,
    pub description: Option<String>,
    pub kind: AccessorKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessorKind {
    /// The only register with its layout.
    Single { offset: u64 },
    /// One instance of a grouped layout.
    Instance { index: usize, offset: u64 },
    /// Index-parameterized access to every instance of a grouped layout.
    Indexed { count: usize },
}

/// Where instances of a register layout live relative to the peripheral base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    Single {
        offset: u64,
    },
    Indexed {
        /// Offset of every instance, in index order.
        offsets: Vec<u64>,
        /// Set when `offsets[i] == offsets[0] + stride * i` for all `i`.
        stride: Option<u64>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterDecl {
    pub type_name: String,
    pub value_name: String,
    pub description: Option<String>,
    /// Storage type, `u8` through `u64`.
    pub bits: &'static str,
    pub access: Access,
    pub reset_value: u64,
    pub placement: Placement,
    /// Enumerations first introduced by this register.
    pub enums: Vec<EnumDecl>,
    pub fields: Vec<FieldDecl>,
    pub field_groups: Vec<FieldGroupDecl>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub description: Option<String>,
    pub bits: &'static str,
    pub offset: u32,
    pub width: u32,
    pub access: Access,
    /// Type returned by reads: an enumeration or `bits`.
    pub read_type: String,
    /// Type accepted by writes: an enumeration or `bits`.
    pub write_type: String,
}

/// Indexed access to the fields expanded from one dimensioned field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldGroupDecl {
    /// Name of the `*_at` accessor.
    pub at_name: String,
    /// Name of the tuple accessor.
    pub fields_name: String,
    pub offsets: Vec<u32>,
    pub width: u32,
    pub access: Access,
    pub read_type: String,
    pub write_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumDecl {
    pub type_name: String,
    pub description: Option<String>,
    pub bits: &'static str,
    pub values: Vec<EnumValueDecl>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValueDecl {
    pub name: String,
    pub value: u64,
    pub description: Option<String>,
}

/// The accessor runtime library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionsDecl {
    pub name: String,
    pub source: FunctionsSource,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FunctionsSource {
    /// Module body emitted inline.
    Embedded(&'static str),
    /// Path re-exported under the module name.
    External(String),
}

impl FieldDecl {
    fn is_enum_read(&self) -> bool {
        self.read_type != self.bits
    }

    fn is_enum_write(&self) -> bool {
        self.write_type != self.bits
    }
}

//=============================================================================
// Formatting
//=============================================================================

/// Lints allowed on every generated top-level module. Outer attributes keep
/// the output usable through `include!`.
pub const GENERATED_LINTS: &str = "#[allow(dead_code, unused_imports, unused_unsafe, \
     non_camel_case_types, non_upper_case_globals, clippy::all)]";

/// Spell a sequence of top-level declarations.
pub fn render(decls: &[Decl]) -> String {
    let mut out = String::new();
    for (i, decl) in decls.iter().enumerate() {
        if i > 0 {
            writeln!(out).unwrap();
        }
        render_decl(&mut out, decl, Style::Fixed);
    }
    out
}

/// Spell one declaration. `style` applies to peripherals and registers that
/// are not inside a namespace carrying its own style.
pub fn render_decl(out: &mut String, decl: &Decl, style: Style) {
    match decl {
        Decl::Namespace(ns) => render_namespace(out, ns),
        Decl::Peripheral(p) => match style {
            Style::Fixed => render_fixed_peripheral(out, p),
            Style::Runtime => render_runtime_peripheral(out, p),
        },
        Decl::Register(r) => render_register(out, r, style),
        Decl::Field(f) => render_value_field(out, f),
        Decl::Functions(f) => render_functions(out, f),
    }
}

fn write_doc(out: &mut String, text: Option<&str>) {
    if let Some(text) = text.map(doc_line).filter(|t| !t.is_empty()) {
        writeln!(out, "/// {text}").unwrap();
    }
}

fn render_functions(out: &mut String, f: &FunctionsDecl) {
    match &f.source {
        FunctionsSource::Embedded(body) => {
            writeln!(out, "{GENERATED_LINTS}").unwrap();
            writeln!(out, "pub mod {} {{", f.name).unwrap();
            out.push_str(&indent(body.trim_end(), 1));
            writeln!(out, "}}").unwrap();
        }
        FunctionsSource::External(path) => {
            writeln!(out, "pub use {path} as {};", f.name).unwrap();
        }
    }
}

fn render_namespace(out: &mut String, ns: &NamespaceDecl) {
    let mut body = String::new();
    writeln!(body, "//! {}", ns.doc).unwrap();
    if !ns.consts.is_empty() {
        writeln!(body).unwrap();
    }
    for c in ns.consts.iter() {
        write_doc(&mut body, c.doc.as_deref());
        writeln!(body, "pub const {}: {} = {};", c.name, c.ty, c.value).unwrap();
    }
    let style = ns.style.unwrap_or(Style::Fixed);
    for item in ns.items.iter() {
        writeln!(body).unwrap();
        render_decl(&mut body, item, style);
    }
    writeln!(out, "{GENERATED_LINTS}").unwrap();
    writeln!(out, "pub mod {} {{", ns.name).unwrap();
    out.push_str(&indent(&body, 1));
    writeln!(out, "}}").unwrap();
}

/// `base + offset`, leaving out a zero offset.
fn offset_expr(base: &str, offset: u64) -> String {
    if offset == 0 {
        base.to_string()
    } else {
        format!("{base} + {}", hex_const(offset))
    }
}

fn usize_list(offsets: impl Iterator<Item = u64>) -> String {
    offsets.map(hex_const).collect::<Vec<_>>().join(", ")
}

/// The peripheral module with every register layout, shared by both styles
/// apart from the register handles themselves.
fn render_peripheral_module(out: &mut String, p: &PeripheralDecl, style: Style) {
    let mut body = String::new();
    writeln!(body, "//! Registers of the `{}` peripheral.", p.name).unwrap();
    writeln!(body).unwrap();
    writeln!(body, "use super::super::regbase;").unwrap();
    for register in p.registers.iter() {
        writeln!(body).unwrap();
        render_register(&mut body, register, style);
    }
    writeln!(out, "pub mod {} {{", p.module_name).unwrap();
    out.push_str(&indent(&body, 1));
    writeln!(out, "}}").unwrap();
}

const STEAL_SAFETY: &str = "\
/// # Safety
///
/// The address must be that of a register block with this layout, and the
/// caller must coordinate concurrent access to it.";

fn render_fixed_peripheral(out: &mut String, p: &PeripheralDecl) {
    let t = &p.type_name;
    let m = &p.module_name;
    write_doc(out, p.description.as_deref());
    writeln!(out, "#[derive(Clone, Copy, Debug, PartialEq, Eq)]").unwrap();
    writeln!(
        out,
        "pub struct {t}<const BASE: usize = {}>(());",
        hex_const(p.base_address)
    )
    .unwrap();
    for alias in p.aliases.iter() {
        writeln!(out).unwrap();
        write_doc(out, alias.description.as_deref());
        writeln!(out, "/// Same layout as [`{t}`].").unwrap();
        writeln!(
            out,
            "pub type {} = {t}<{}>;",
            alias.type_name,
            hex_const(alias.base_address)
        )
        .unwrap();
    }
    writeln!(out).unwrap();
    writeln!(out, "impl<const BASE: usize> {t}<BASE> {{").unwrap();
    writeln!(out, "    pub const BASE_ADDRESS: usize = BASE;").unwrap();
    writeln!(out).unwrap();
    out.push_str(&indent(STEAL_SAFETY, 1));
    writeln!(out, "    #[inline(always)]").unwrap();
    writeln!(out, "    pub const unsafe fn steal() -> Self {{").unwrap();
    writeln!(out, "        Self(())").unwrap();
    writeln!(out, "    }}").unwrap();
    for a in p.accessors.iter() {
        let r = &a.register;
        writeln!(out).unwrap();
        let mut doc = String::new();
        write_doc(&mut doc, a.description.as_deref());
        match a.kind {
            AccessorKind::Single { .. } => {
                out.push_str(&indent(&doc, 1));
                writeln!(out, "    #[inline(always)]").unwrap();
                writeln!(out, "    pub const fn {}(&self) -> {m}::{r}<BASE> {{", a.name).unwrap();
            }
            AccessorKind::Instance { index, .. } => {
                out.push_str(&indent(&doc, 1));
                writeln!(out, "    #[inline(always)]").unwrap();
                writeln!(
                    out,
                    "    pub const fn {}(&self) -> {m}::{r}<BASE, {index}> {{",
                    a.name
                )
                .unwrap();
            }
            AccessorKind::Indexed { count } => {
                writeln!(
                    out,
                    "    /// Instance `INDEX` of the {count} registers sharing the [`{m}::{r}`] layout."
                )
                .unwrap();
                writeln!(out, "    #[inline(always)]").unwrap();
                writeln!(
                    out,
                    "    pub const fn {}<const INDEX: usize>(&self) -> {m}::{r}<BASE, INDEX> {{",
                    a.name
                )
                .unwrap();
            }
        }
        writeln!(out, "        {m}::{r}(())").unwrap();
        writeln!(out, "    }}").unwrap();
    }
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    render_peripheral_module(out, p, Style::Fixed);
}

fn render_runtime_peripheral(out: &mut String, p: &PeripheralDecl) {
    let t = &p.type_name;
    let m = &p.module_name;
    write_doc(out, p.description.as_deref());
    writeln!(out, "#[derive(Clone, Copy, Debug, PartialEq, Eq)]").unwrap();
    writeln!(out, "pub struct {t} {{").unwrap();
    writeln!(out, "    base: usize,").unwrap();
    writeln!(out, "}}").unwrap();
    for alias in p.aliases.iter() {
        writeln!(out).unwrap();
        write_doc(out, alias.description.as_deref());
        writeln!(out, "/// Same layout as [`{t}`].").unwrap();
        writeln!(out, "pub type {} = {t};", alias.type_name).unwrap();
    }
    writeln!(out).unwrap();
    writeln!(out, "impl {t} {{").unwrap();
    out.push_str(&indent(STEAL_SAFETY, 1));
    writeln!(out, "    #[inline(always)]").unwrap();
    writeln!(out, "    pub const unsafe fn new(base: usize) -> Self {{").unwrap();
    writeln!(out, "        Self {{ base }}").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "    #[inline(always)]").unwrap();
    writeln!(out, "    pub const fn base(&self) -> usize {{").unwrap();
    writeln!(out, "        self.base").unwrap();
    writeln!(out, "    }}").unwrap();
    for a in p.accessors.iter() {
        let r = &a.register;
        writeln!(out).unwrap();
        let mut doc = String::new();
        write_doc(&mut doc, a.description.as_deref());
        let address = match a.kind {
            AccessorKind::Single { offset } | AccessorKind::Instance { offset, .. } => {
                out.push_str(&indent(&doc, 1));
                writeln!(out, "    #[inline(always)]").unwrap();
                writeln!(out, "    pub fn {}(&self) -> {m}::{r} {{", a.name).unwrap();
                offset_expr("self.base", offset)
            }
            AccessorKind::Indexed { count } => {
                writeln!(
                    out,
                    "    /// Instance `index` of the {count} registers sharing the [`{m}::{r}`] layout."
                )
                .unwrap();
                writeln!(out, "    ///").unwrap();
                writeln!(out, "    /// Panics if `index` is out of range.").unwrap();
                writeln!(out, "    #[inline(always)]").unwrap();
                writeln!(
                    out,
                    "    pub fn {}(&self, index: usize) -> {m}::{r} {{",
                    a.name
                )
                .unwrap();
                format!("self.base + {m}::{r}::offset(index)")
            }
        };
        writeln!(out, "        // SAFETY: `self` was created for a valid base address.").unwrap();
        writeln!(out, "        unsafe {{ {m}::{r}::new({address}) }}").unwrap();
        writeln!(out, "    }}").unwrap();
    }
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    render_peripheral_module(out, p, Style::Runtime);
}

fn render_enum(out: &mut String, e: &EnumDecl) {
    let t = &e.type_name;
    let bits = e.bits;
    write_doc(out, e.description.as_deref());
    writeln!(out, "#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]").unwrap();
    writeln!(out, "pub struct {t}(pub {bits});").unwrap();
    writeln!(out).unwrap();
    if !e.values.is_empty() {
        writeln!(out, "impl {t} {{").unwrap();
        for v in e.values.iter() {
            let mut doc = String::new();
            write_doc(&mut doc, v.description.as_deref());
            out.push_str(&indent(&doc, 1));
            writeln!(out, "    pub const {}: Self = Self({});", v.name, hex_const(v.value)).unwrap();
        }
        writeln!(out, "}}").unwrap();
        writeln!(out).unwrap();
    }
    writeln!(out, "impl regbase::FieldValue<{bits}> for {t} {{").unwrap();
    writeln!(out, "    #[inline(always)]").unwrap();
    writeln!(out, "    fn into_bits(self) -> {bits} {{").unwrap();
    writeln!(out, "        self.0").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "    #[inline(always)]").unwrap();
    writeln!(out, "    fn from_bits(bits: {bits}) -> Self {{").unwrap();
    writeln!(out, "        Self(bits)").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out, "}}").unwrap();
}

/// Chain methods of one field on the register value type.
fn render_value_field(out: &mut String, f: &FieldDecl) {
    let extract = format!("regbase::extract(self.0, {}, {})", f.offset, f.width);
    if f.access.is_readable() {
        write_doc(out, f.description.as_deref());
        writeln!(out, "#[inline(always)]").unwrap();
        writeln!(out, "pub fn {}(self) -> {} {{", f.name, f.read_type).unwrap();
        if f.is_enum_read() {
            writeln!(out, "    {}({extract})", f.read_type).unwrap();
        } else {
            writeln!(out, "    {extract}").unwrap();
        }
        writeln!(out, "}}").unwrap();
    }
    if f.access.is_writable() {
        if f.access.is_readable() {
            writeln!(out).unwrap();
        }
        let value = if f.is_enum_write() { "value.0" } else { "value" };
        writeln!(out, "/// Returns a copy with `{}` replaced.", f.name).unwrap();
        writeln!(out, "#[inline(always)]").unwrap();
        writeln!(
            out,
            "pub fn with_{}(self, value: {}) -> Self {{",
            f.name, f.write_type
        )
        .unwrap();
        writeln!(
            out,
            "    Self(regbase::insert(self.0, {}, {}, {value}))",
            f.offset, f.width
        )
        .unwrap();
        writeln!(out, "}}").unwrap();
    }
}

fn offsets_const(ty: &str, offsets: &[u32]) -> String {
    let list = offsets
        .iter()
        .map(|o| o.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("const OFFSETS: [{ty}; {}] = [{list}];", offsets.len())
}

fn render_value_group(out: &mut String, g: &FieldGroupDecl, bits: &str) {
    let enum_read = g.read_type != bits;
    let enum_write = g.write_type != bits;
    let table = offsets_const("u32", &g.offsets);
    if g.access.is_readable() {
        writeln!(out, "/// Field `index` of the `{}` group.", g.at_name).unwrap();
        writeln!(out, "#[inline(always)]").unwrap();
        writeln!(
            out,
            "pub fn {}(self, index: usize) -> {} {{",
            g.at_name, g.read_type
        )
        .unwrap();
        writeln!(out, "    {table}").unwrap();
        let extract = format!("regbase::extract(self.0, OFFSETS[index], {})", g.width);
        if enum_read {
            writeln!(out, "    {}({extract})", g.read_type).unwrap();
        } else {
            writeln!(out, "    {extract}").unwrap();
        }
        writeln!(out, "}}").unwrap();
    }
    if g.access.is_writable() {
        if g.access.is_readable() {
            writeln!(out).unwrap();
        }
        let value = if enum_write { "value.0" } else { "value" };
        writeln!(out, "#[inline(always)]").unwrap();
        writeln!(
            out,
            "pub fn with_{}(self, index: usize, value: {}) -> Self {{",
            g.at_name, g.write_type
        )
        .unwrap();
        writeln!(out, "    {table}").unwrap();
        writeln!(
            out,
            "    Self(regbase::insert(self.0, OFFSETS[index], {}, {value}))",
            g.width
        )
        .unwrap();
        writeln!(out, "}}").unwrap();
    }
}

fn render_value_type(out: &mut String, r: &RegisterDecl) {
    let v = &r.value_name;
    let bits = r.bits;
    writeln!(
        out,
        "/// In-memory copy of [`{}`]. Setters return a new value; nothing touches",
        r.type_name
    )
    .unwrap();
    writeln!(out, "/// hardware until the value is stored.").unwrap();
    writeln!(out, "#[derive(Clone, Copy, Debug, PartialEq, Eq)]").unwrap();
    writeln!(out, "pub struct {v}(pub {bits});").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "impl regbase::RegisterValue for {v} {{").unwrap();
    writeln!(out, "    type Bits = {bits};").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "    const RESET: {bits} = {};", hex_const(r.reset_value)).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "    #[inline(always)]").unwrap();
    writeln!(out, "    fn from_bits(bits: {bits}) -> Self {{").unwrap();
    writeln!(out, "        Self(bits)").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "    #[inline(always)]").unwrap();
    writeln!(out, "    fn bits(self) -> {bits} {{").unwrap();
    writeln!(out, "        self.0").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "impl Default for {v} {{").unwrap();
    writeln!(out, "    fn default() -> Self {{").unwrap();
    writeln!(out, "        Self({})", hex_const(r.reset_value)).unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out, "}}").unwrap();

    if r.fields.is_empty() {
        return;
    }
    let mut body = String::new();
    for (i, field) in r.fields.iter().enumerate() {
        if i > 0 {
            writeln!(body).unwrap();
        }
        render_value_field(&mut body, field);
    }
    for group in r.field_groups.iter() {
        writeln!(body).unwrap();
        render_value_group(&mut body, group, bits);
    }
    writeln!(out).unwrap();
    writeln!(out, "impl {v} {{").unwrap();
    out.push_str(&indent(&body, 1));
    writeln!(out, "}}").unwrap();
}

fn field_type(access: Access, offset: u32, width: u32, read: &str, write: &str) -> String {
    format!(
        "regbase::Field<Self, {offset}, {width}, regbase::{}, {read}, {write}>",
        access.marker()
    )
}

fn render_fixed_register(out: &mut String, r: &RegisterDecl) {
    let t = &r.type_name;
    let (params, args) = match r.placement {
        Placement::Single { .. } => ("const BASE: usize", "BASE"),
        Placement::Indexed { .. } => ("const BASE: usize, const INDEX: usize", "BASE, INDEX"),
    };
    write_doc(out, r.description.as_deref());
    writeln!(out, "#[derive(Clone, Copy, Debug)]").unwrap();
    writeln!(out, "pub struct {t}<{params}>(pub(super) ());").unwrap();
    writeln!(out).unwrap();

    let address = match &r.placement {
        Placement::Single { offset } => offset_expr("BASE", *offset),
        Placement::Indexed { offsets, stride } => {
            writeln!(out, "impl<{params}> {t}<{args}> {{").unwrap();
            writeln!(out, "    pub const COUNT: usize = {};", offsets.len()).unwrap();
            writeln!(
                out,
                "    pub const OFFSETS: [usize; {}] = [{}];",
                offsets.len(),
                usize_list(offsets.iter().copied())
            )
            .unwrap();
            writeln!(out, "}}").unwrap();
            writeln!(out).unwrap();
            match stride {
                Some(stride) => format!(
                    "{} + {} * INDEX",
                    offset_expr("BASE", offsets[0]),
                    hex_const(*stride)
                ),
                None => "BASE + Self::OFFSETS[INDEX]".to_string(),
            }
        }
    };

    writeln!(out, "unsafe impl<{params}> regbase::FixedRegister for {t}<{args}> {{").unwrap();
    writeln!(out, "    type Value = {};", r.value_name).unwrap();
    writeln!(out, "    type Access = regbase::{};", r.access.marker()).unwrap();
    writeln!(out).unwrap();
    match &r.placement {
        Placement::Single { .. } => {
            writeln!(out, "    const ADDRESS: usize = {address};").unwrap();
        }
        Placement::Indexed { offsets, .. } => {
            writeln!(out, "    const ADDRESS: usize = {{").unwrap();
            writeln!(
                out,
                "        assert!(INDEX < {}, \"register index out of range\");",
                offsets.len()
            )
            .unwrap();
            writeln!(out, "        {address}").unwrap();
            writeln!(out, "    }};").unwrap();
        }
    }
    writeln!(out, "}}").unwrap();

    if r.fields.is_empty() {
        return;
    }
    let mut body = String::new();
    for (i, f) in r.fields.iter().enumerate() {
        if i > 0 {
            writeln!(body).unwrap();
        }
        write_doc(&mut body, f.description.as_deref());
        writeln!(body, "#[inline(always)]").unwrap();
        writeln!(
            body,
            "pub const fn {}(&self) -> {} {{",
            f.name,
            field_type(f.access, f.offset, f.width, &f.read_type, &f.write_type)
        )
        .unwrap();
        writeln!(body, "    // SAFETY: `Self` only exists for a valid register.").unwrap();
        writeln!(body, "    unsafe {{ regbase::Field::new() }}").unwrap();
        writeln!(body, "}}").unwrap();
    }
    for g in r.field_groups.iter() {
        let types = g
            .offsets
            .iter()
            .map(|&o| field_type(g.access, o, g.width, &g.read_type, &g.write_type))
            .collect::<Vec<_>>();
        let news = vec!["regbase::Field::new()"; g.offsets.len()];
        writeln!(body).unwrap();
        writeln!(body, "/// Every field of the `{}` group, in index order.", g.at_name).unwrap();
        writeln!(body, "#[inline(always)]").unwrap();
        writeln!(
            body,
            "pub const fn {}(&self) -> ({},) {{",
            g.fields_name,
            types.join(", ")
        )
        .unwrap();
        writeln!(body, "    // SAFETY: `Self` only exists for a valid register.").unwrap();
        writeln!(body, "    unsafe {{ ({},) }}", news.join(", ")).unwrap();
        writeln!(body, "}}").unwrap();
    }
    writeln!(out).unwrap();
    writeln!(out, "impl<{params}> {t}<{args}> {{").unwrap();
    out.push_str(&indent(&body, 1));
    writeln!(out, "}}").unwrap();
}

fn render_runtime_field(
    out: &mut String,
    name: &str,
    access: Access,
    read: &str,
    write: &str,
    position: (&str, u32),
    index_param: &str,
) {
    let (offset, width) = position;
    let marker = access.marker();
    match access {
        Access::ReadWrite => {
            writeln!(
                out,
                "pub fn {name}(&self{index_param}, value: Option<{write}>) -> {read} {{"
            )
            .unwrap();
            writeln!(
                out,
                "    self.0.field::<regbase::{marker}, {read}, {write}>({offset}, {width}).value(value)"
            )
            .unwrap();
        }
        Access::ReadOnly => {
            writeln!(out, "pub fn {name}(&self{index_param}) -> {read} {{").unwrap();
            writeln!(
                out,
                "    self.0.field::<regbase::{marker}, {read}, {read}>({offset}, {width}).get()"
            )
            .unwrap();
        }
        Access::WriteOnly => {
            writeln!(out, "pub fn {name}(&self{index_param}, value: {write}) {{").unwrap();
            writeln!(
                out,
                "    self.0.field::<regbase::{marker}, {write}, {write}>({offset}, {width}).set(value)"
            )
            .unwrap();
        }
    }
    writeln!(out, "}}").unwrap();
}

fn render_runtime_register(out: &mut String, r: &RegisterDecl) {
    let t = &r.type_name;
    let handle = format!(
        "regbase::DynRegister<{}, regbase::{}>",
        r.value_name,
        r.access.marker()
    );
    write_doc(out, r.description.as_deref());
    writeln!(out, "#[derive(Clone, Copy, Debug)]").unwrap();
    writeln!(out, "pub struct {t}({handle});").unwrap();
    writeln!(out).unwrap();

    let mut body = String::new();
    if let Placement::Indexed { offsets, stride } = &r.placement {
        writeln!(body, "pub const COUNT: usize = {};", offsets.len()).unwrap();
        writeln!(
            body,
            "pub const OFFSETS: [usize; {}] = [{}];",
            offsets.len(),
            usize_list(offsets.iter().copied())
        )
        .unwrap();
        writeln!(body).unwrap();
        writeln!(body, "/// Offset of instance `index` from the peripheral base.").unwrap();
        writeln!(body, "#[inline(always)]").unwrap();
        writeln!(body, "pub const fn offset(index: usize) -> usize {{").unwrap();
        match stride {
            Some(stride) => {
                writeln!(
                    body,
                    "    assert!(index < Self::COUNT, \"register index out of range\");"
                )
                .unwrap();
                writeln!(
                    body,
                    "    {} + {} * index",
                    hex_const(offsets[0]),
                    hex_const(*stride)
                )
                .unwrap();
            }
            None => writeln!(body, "    Self::OFFSETS[index]").unwrap(),
        }
        writeln!(body, "}}").unwrap();
        writeln!(body).unwrap();
    }
    writeln!(body, "/// # Safety").unwrap();
    writeln!(body, "///").unwrap();
    writeln!(body, "/// `address` must be the address of this register.").unwrap();
    writeln!(body, "#[inline(always)]").unwrap();
    writeln!(body, "pub const unsafe fn new(address: usize) -> Self {{").unwrap();
    writeln!(body, "    Self(unsafe {{ regbase::DynRegister::new(address) }})").unwrap();
    writeln!(body, "}}").unwrap();
    for f in r.fields.iter() {
        writeln!(body).unwrap();
        write_doc(&mut body, f.description.as_deref());
        writeln!(body, "#[inline(always)]").unwrap();
        let offset = f.offset.to_string();
        render_runtime_field(
            &mut body,
            &f.name,
            f.access,
            &f.read_type,
            &f.write_type,
            (&offset, f.width),
            "",
        );
    }
    for g in r.field_groups.iter() {
        writeln!(body).unwrap();
        writeln!(body, "/// Field `index` of the `{}` group.", g.at_name).unwrap();
        writeln!(body, "#[inline(always)]").unwrap();
        let mut method = String::new();
        render_runtime_field(
            &mut method,
            &g.at_name,
            g.access,
            &g.read_type,
            &g.write_type,
            ("OFFSETS[index]", g.width),
            ", index: usize",
        );
        // The offset table goes first in the method body.
        let (signature, rest) = method.split_once('\n').unwrap_or((&method, ""));
        writeln!(body, "{signature}").unwrap();
        writeln!(body, "    {}", offsets_const("u32", &g.offsets)).unwrap();
        body.push_str(rest);
    }
    writeln!(out, "impl {t} {{").unwrap();
    out.push_str(&indent(&body, 1));
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "impl core::ops::Deref for {t} {{").unwrap();
    writeln!(out, "    type Target = {handle};").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "    #[inline(always)]").unwrap();
    writeln!(out, "    fn deref(&self) -> &Self::Target {{").unwrap();
    writeln!(out, "        &self.0").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out, "}}").unwrap();
}

/// Enumerations, value type and register handle of one layout.
fn render_register(out: &mut String, r: &RegisterDecl, style: Style) {
    for e in r.enums.iter() {
        render_enum(out, e);
        writeln!(out).unwrap();
    }
    render_value_type(out, r);
    writeln!(out).unwrap();
    match style {
        Style::Fixed => render_fixed_register(out, r),
        Style::Runtime => render_runtime_register(out, r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, offset: u32, width: u32, access: Access) -> FieldDecl {
        FieldDecl {
            name: name.to_string(),
            description: None,
            bits: "u32",
            offset,
            width,
            access,
            read_type: "u32".to_string(),
            write_type: "u32".to_string(),
        }
    }

    #[test]
    fn test_render_value_field() {
        let mut out = String::new();
        render_decl(
            &mut out,
            &Decl::Field(field("mode", 5, 2, Access::ReadWrite)),
            Style::Fixed,
        );
        assert!(out.contains("pub fn mode(self) -> u32 {"));
        assert!(out.contains("regbase::extract(self.0, 5, 2)"));
        assert!(out.contains("pub fn with_mode(self, value: u32) -> Self {"));
        assert!(out.contains("regbase::insert(self.0, 5, 2, value)"));

        let mut out = String::new();
        render_value_field(&mut out, &field("busy", 0, 1, Access::ReadOnly));
        assert!(out.contains("pub fn busy(self)"));
        assert!(!out.contains("with_busy"));
    }

    #[test]
    fn test_render_functions() {
        let mut out = String::new();
        render_functions(
            &mut out,
            &FunctionsDecl {
                name: "regbase".into(),
                source: FunctionsSource::External("crate::regbase".into()),
            },
        );
        assert_eq!(out, "pub use crate::regbase as regbase;\n");

        let mut out = String::new();
        render_functions(
            &mut out,
            &FunctionsDecl {
                name: "regbase".into(),
                source: FunctionsSource::Embedded("pub fn f() {}\n"),
            },
        );
        assert_eq!(
            out,
            format!("{GENERATED_LINTS}\npub mod regbase {{\n    pub fn f() {{}}\n}}\n")
        );
    }

    #[test]
    fn test_offset_expr() {
        assert_eq!(offset_expr("BASE", 0), "BASE");
        assert_eq!(offset_expr("BASE", 0x14), "BASE + 0x14");
    }
}
