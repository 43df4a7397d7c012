// Licensed under the Apache-2.0 license

//! Coercion of textual attribute values into model values.

use crate::types::{Access, DimElement, EnumUsage};

/// Parses an unsigned integer attribute.
///
/// Text containing `0x` is hexadecimal, anything else decimal. The `#`-prefixed
/// binary form is accepted with `x` digits read as zero. Missing text is 0;
/// unparseable text logs a warning and is also 0.
pub fn parse_u64(text: Option<&str>) -> u64 {
    let Some(text) = text else {
        return 0;
    };
    let text = text.trim();
    let lower = text.to_ascii_lowercase();
    let parsed = if let Some(pos) = lower.find("0x") {
        u64::from_str_radix(&lower[pos + 2..].replace('_', ""), 16)
    } else if let Some(bits) = lower.strip_prefix('#') {
        u64::from_str_radix(&bits.replace('x', "0"), 2)
    } else {
        lower.parse::<u64>()
    };
    match parsed {
        Ok(v) => v,
        Err(_) => {
            log::warn!("Unable to parse numeric value {text:?}; using 0");
            0
        }
    }
}

/// Parses an optional unsigned integer attribute, `None` when absent.
pub fn parse_opt_u64(text: Option<&str>) -> Option<u64> {
    text.map(|t| parse_u64(Some(t)))
}

/// Maps an access literal onto one of the three access modes. Anything else
/// logs a warning and keeps read-write.
pub fn parse_access(text: &str) -> Access {
    match text.trim() {
        "read-only" => Access::ReadOnly,
        "write-only" => Access::WriteOnly,
        "read-write" => Access::ReadWrite,
        other => {
            log::warn!("Unknown access type {other:?}; using read-write");
            Access::ReadWrite
        }
    }
}

/// Maps an enumeratedValues `usage` literal. Missing usage means read-write.
pub fn parse_usage(text: Option<&str>) -> EnumUsage {
    match text.map(str::trim) {
        None | Some("read-write") => EnumUsage::ReadWrite,
        Some("read") => EnumUsage::Read,
        Some("write") => EnumUsage::Write,
        Some(other) => {
            log::warn!("Unknown enumerated value usage {other:?}; using read-write");
            EnumUsage::ReadWrite
        }
    }
}

/// Expands a `dimIndex` list such as `0-2,5` or `A,B,C` into its ordered
/// suffixes.
///
/// Numeric ranges are inclusive. A token that looks like a range but does not
/// parse, or spans more than [`DimElement::MAX`] values, is kept literally.
pub fn expand_dim_index(text: &str) -> Vec<String> {
    let mut suffixes = vec![];
    for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let range = token.split_once('-').and_then(|(start, end)| {
            Some((start.trim().parse::<u64>().ok()?, end.trim().parse::<u64>().ok()?))
        });
        match range {
            Some((start, end)) if start <= end && end - start < u64::from(DimElement::MAX) => {
                suffixes.extend((start..=end).map(|i| i.to_string()));
            }
            _ => suffixes.push(token.to_string()),
        }
    }
    suffixes
}

/// Substitutes one dimension suffix into a templated name.
///
/// `[%s]` becomes `_<suffix>` (array form), `%s` becomes `<suffix>`, and a
/// name without a placeholder gets the suffix appended.
pub fn substitute(template: &str, suffix: &str) -> String {
    if template.contains("[%s]") {
        if suffix.is_empty() {
            template.replace("[%s]", "")
        } else {
            template.replace("[%s]", &format!("_{suffix}"))
        }
    } else if template.contains("%s") {
        template.replace("%s", suffix)
    } else {
        format!("{template}{suffix}")
    }
}

/// Removes the placeholder from a templated name, giving the name shared by
/// all instances (`CH%s` and `CH[%s]` both give `CH`).
pub fn strip_placeholder(template: &str) -> String {
    let stripped = template.replace("[%s]", "").replace("%s", "");
    let stripped = stripped.trim_matches('_');
    if stripped.is_empty() {
        template.replace(['[', ']', '%'], "")
    } else {
        stripped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u64() {
        assert_eq!(parse_u64(Some("0x40020000")), 0x4002_0000);
        assert_eq!(parse_u64(Some("0X1F")), 0x1f);
        assert_eq!(parse_u64(Some(" 32 ")), 32);
        assert_eq!(parse_u64(Some("#1010")), 0b1010);
        assert_eq!(parse_u64(None), 0);
        assert_eq!(parse_u64(Some("banana")), 0);
        assert_eq!(parse_opt_u64(None), None);
        assert_eq!(parse_opt_u64(Some("0x4")), Some(4));
    }

    #[test]
    fn test_parse_access() {
        assert_eq!(parse_access("read-only"), Access::ReadOnly);
        assert_eq!(parse_access("write-only"), Access::WriteOnly);
        assert_eq!(parse_access("read-write"), Access::ReadWrite);
        assert_eq!(parse_access("sometimes"), Access::ReadWrite);
        assert_eq!(parse_access("writeOnce"), Access::ReadWrite);
    }

    #[test]
    fn test_parse_usage() {
        assert_eq!(parse_usage(None), EnumUsage::ReadWrite);
        assert_eq!(parse_usage(Some("read")), EnumUsage::Read);
        assert_eq!(parse_usage(Some("write")), EnumUsage::Write);
        assert_eq!(parse_usage(Some("bogus")), EnumUsage::ReadWrite);
    }

    #[test]
    fn test_expand_dim_index() {
        assert_eq!(expand_dim_index("0-2,5"), vec!["0", "1", "2", "5"]);
        assert_eq!(expand_dim_index("A,B,C"), vec!["A", "B", "C"]);
        assert_eq!(expand_dim_index("3-4"), vec!["3", "4"]);
        assert_eq!(expand_dim_index("x-y"), vec!["x-y"]);
        assert!(expand_dim_index("").is_empty());
        assert_eq!(expand_dim_index("0-4294967295"), vec!["0-4294967295"]);
    }

    #[test]
    fn test_substitute() {
        assert_eq!(substitute("CH%s", "2"), "CH2");
        assert_eq!(substitute("CH[%s]", "2"), "CH_2");
        assert_eq!(substitute("CH", "2"), "CH2");
        assert_eq!(substitute("CR%s", ""), "CR");
    }

    #[test]
    fn test_strip_placeholder() {
        assert_eq!(strip_placeholder("CH%s"), "CH");
        assert_eq!(strip_placeholder("CH[%s]"), "CH");
        assert_eq!(strip_placeholder("MODE%s_EN"), "MODE_EN");
        assert_eq!(strip_placeholder("%s"), "s");
    }
}
