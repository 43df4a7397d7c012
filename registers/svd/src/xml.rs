// Licensed under the Apache-2.0 license

//! [`SvdNode`] implementation backed by `xmltree`.

use crate::error::{SvdError, SvdResult};
use crate::SvdNode;
use std::path::Path;
use xmltree::{Element, XMLNode};

/// A loaded peripheral description whose root is a `<device>` element.
#[derive(Clone, Debug)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse a document from XML text.
    pub fn parse(xml: &str) -> SvdResult<Self> {
        let root = Element::parse(xml.as_bytes())?;
        if root.name != "device" {
            return Err(SvdError::MissingDevice(root.name));
        }
        Ok(Self { root })
    }

    /// Load and parse a document from disk.
    pub fn from_file(path: &Path) -> SvdResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SvdError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// The `<device>` element.
    pub fn root(&self) -> XmlNode<'_> {
        XmlNode(&self.root)
    }
}

/// Borrowed handle to one XML element.
#[derive(Clone, Copy, Debug)]
pub struct XmlNode<'a>(&'a Element);

impl<'a> SvdNode for XmlNode<'a> {
    fn tag(&self) -> &str {
        &self.0.name
    }

    fn children(&self) -> Vec<Self> {
        self.0
            .children
            .iter()
            .filter_map(|node| match node {
                XMLNode::Element(e) => Some(XmlNode(e)),
                _ => None,
            })
            .collect()
    }

    fn text(&self) -> Option<String> {
        let text = self.0.get_text()?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.attributes.get(name).cloned()
    }
}
