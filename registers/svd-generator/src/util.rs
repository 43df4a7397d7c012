// Licensed under the Apache-2.0 license

//! Utility functions for name conversion and formatting.
//!
//! This module provides functions for converting peripheral, register and
//! field names into Rust identifiers, keeping identifiers unique within one
//! namespace, and formatting values for Rust code generation.

use std::collections::HashSet;

/// Converts a name to snake_case.
///
/// Handles various edge cases:
/// - Leading digits get underscore prefix
/// - Punctuation and whitespace become underscores
/// - CamelCase transitions get underscore separators
/// - Rust keywords get underscore suffix
///
/// # Examples
/// ```
/// use mcu_registers_svd_generator::util::snake_case;
/// assert_eq!(snake_case("GpioMode"), "gpio_mode");
/// assert_eq!(snake_case("USART1_CR1"), "usart1_cr1");
/// ```
pub fn snake_case(name: &str) -> String {
    let mut result = String::new();
    if let Some(c) = name.chars().next() {
        if c.is_ascii_digit() {
            result.push('_');
        }
    }
    let mut prev = None;
    for c in name.chars() {
        if c.is_ascii_whitespace() || c.is_ascii_punctuation() {
            if prev != Some('_') {
                result.push('_');
            }
            prev = Some('_');
            continue;
        }
        if let Some(prev) = prev {
            if prev.is_ascii_lowercase() && c.is_ascii_uppercase() {
                result.push('_');
            }
        }
        prev = Some(c);
        result.push(c.to_ascii_lowercase());
    }
    let trimmed = result.trim_end_matches('_');
    if trimmed.is_empty() {
        return "_".to_string();
    }
    tweak_keywords(trimmed).to_string()
}

/// Converts a name to CamelCase (PascalCase).
///
/// # Examples
/// ```
/// use mcu_registers_svd_generator::util::camel_case;
/// assert_eq!(camel_case("GPIOA"), "Gpioa");
/// assert_eq!(camel_case("E_Mode"), "EMode");
/// ```
pub fn camel_case(name: &str) -> String {
    let mut result = String::new();
    if let Some(c) = name.chars().next() {
        if c.is_ascii_digit() {
            result.push('_');
        }
    }
    let mut upper_next = true;
    for c in name.chars() {
        if c.is_ascii_punctuation() || c.is_ascii_whitespace() {
            upper_next = true;
        } else {
            result.push(if upper_next {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            });
            upper_next = false;
        }
    }
    if result.is_empty() {
        return "_".to_string();
    }
    String::from(tweak_keywords(&result))
}

/// Converts a name to SCREAMING_SNAKE_CASE for associated constants.
pub fn screaming_case(name: &str) -> String {
    let upper = snake_case(name).trim_end_matches('_').to_ascii_uppercase();
    match upper.as_str() {
        "" => "_".to_string(),
        "SELF" => "SELF_".to_string(),
        _ => upper,
    }
}

/// Appends underscore suffix to Rust keywords to avoid conflicts.
fn tweak_keywords(s: &str) -> &str {
    match s {
        "as" => "as_",
        "break" => "break_",
        "const" => "const_",
        "continue" => "continue_",
        "crate" => "crate_",
        "else" => "else_",
        "enum" => "enum_",
        "extern" => "extern_",
        "false" => "false_",
        "fn" => "fn_",
        "for" => "for_",
        "if" => "if_",
        "impl" => "impl_",
        "in" => "in_",
        "let" => "let_",
        "loop" => "loop_",
        "match" => "match_",
        "mod" => "mod_",
        "move" => "move_",
        "mut" => "mut_",
        "pub" => "pub_",
        "ref" => "ref_",
        "return" => "return_",
        "self" => "self_",
        "Self" => "Self_",
        "static" => "static_",
        "struct" => "struct_",
        "super" => "super_",
        "trait" => "trait_",
        "true" => "true_",
        "type" => "type_",
        "unsafe" => "unsafe_",
        "use" => "use_",
        "where" => "where_",
        "while" => "while_",
        "async" => "async_",
        "await" => "await_",
        "dyn" => "dyn_",
        "abstract" => "abstract_",
        "become" => "become_",
        "box" => "box_",
        "do" => "do_",
        "final" => "final_",
        "macro" => "macro_",
        "override" => "override_",
        "priv" => "priv_",
        "typeof" => "typeof_",
        "unsized" => "unsized_",
        "virtual" => "virtual_",
        "yield" => "yield_",
        "try" => "try_",
        s => s,
    }
}

/// Formats an integer as a hex constant with underscores for readability.
///
/// Values <= 9 are formatted as decimal; larger values use hex with
/// underscore separators every 4 digits.
///
/// # Examples
/// ```
/// use mcu_registers_svd_generator::util::hex_const;
/// assert_eq!(hex_const(5), "5");
/// assert_eq!(hex_const(0x1234), "0x1234");
/// assert_eq!(hex_const(0x40020000), "0x4002_0000");
/// ```
pub fn hex_const(val: u64) -> String {
    if val > 9 {
        let mut x = String::new();
        for (i, c) in format!("{val:x}").chars().rev().enumerate() {
            if i % 4 == 0 && i != 0 {
                x.push('_');
            }
            x.push(c);
        }
        "0x".to_string() + &x.chars().rev().collect::<String>()
    } else {
        format!("{val}")
    }
}

/// Collapses whitespace runs so a description fits on one `///` line.
pub fn doc_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Indents every non-empty line of `text` by `depth` levels of four spaces.
pub fn indent(text: &str, depth: usize) -> String {
    let pad = "    ".repeat(depth);
    let mut out = String::with_capacity(text.len() + text.lines().count() * pad.len());
    for line in text.lines() {
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Identifiers already taken in one Rust namespace.
///
/// Distinct source names can normalize to the same identifier (`CR_1` and
/// `Cr1` both become `cr_1`/`Cr1`); later arrivals get a numeric suffix.
#[derive(Clone, Debug, Default)]
pub struct IdentSet {
    taken: HashSet<String>,
}

impl IdentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a name without claiming it for a declaration.
    pub fn reserve(mut self, ident: &str) -> Self {
        self.taken.insert(ident.to_string());
        self
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.taken.contains(ident)
    }

    /// Claim `ident`, or the first free `ident_N` when it is already taken.
    pub fn unique(&mut self, ident: String) -> String {
        if self.taken.insert(ident.clone()) {
            return ident;
        }
        let sep = if ident.ends_with(|c: char| c.is_ascii_digit()) {
            "_"
        } else {
            ""
        };
        let mut n = 1;
        loop {
            let candidate = format!("{ident}{sep}{n}");
            if self.taken.insert(candidate.clone()) {
                log::warn!("identifier {ident} is already in use; renamed to {candidate}");
                return candidate;
            }
            n += 1;
        }
    }
}
