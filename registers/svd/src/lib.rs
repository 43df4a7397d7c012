// Licensed under the Apache-2.0 license

//! Document-tree access for CMSIS-SVD peripheral descriptions.
//!
//! The register generator never looks at XML directly. It walks an abstract
//! tree through the [`SvdNode`] trait, which exposes exactly what the builder
//! needs: the element tag, child elements in document order, trimmed text
//! content and attributes.
//!
//! [`Document`] is the XML-backed implementation. Loading a document is the
//! only place a fatal error can occur; once a [`Document`] exists its root is
//! guaranteed to be a `<device>` element.
//!
//! ```
//! use mcu_registers_svd::{Document, SvdNode};
//!
//! let doc = Document::parse("<device><name>STM32F4</name></device>").unwrap();
//! assert_eq!(doc.root().child_text("name").as_deref(), Some("STM32F4"));
//! ```

mod error;
mod xml;

pub use error::{SvdError, SvdResult};
pub use xml::{Document, XmlNode};

/// Read-only view of one element of a peripheral description tree.
///
/// Implementations are cheap handles (typically a reference) so the trait
/// hands out children by value.
pub trait SvdNode: Sized {
    /// Element tag, e.g. `peripheral` or `register`.
    fn tag(&self) -> &str;

    /// Child elements in document order. Text and comments are skipped.
    fn children(&self) -> Vec<Self>;

    /// Trimmed text content, or `None` when the element has no text.
    fn text(&self) -> Option<String>;

    /// Attribute value by name.
    fn attribute(&self, name: &str) -> Option<String>;

    /// First child element with the given tag.
    fn child(&self, tag: &str) -> Option<Self> {
        self.children().into_iter().find(|c| c.tag() == tag)
    }

    /// Text of the first child element with the given tag.
    fn child_text(&self, tag: &str) -> Option<String> {
        self.child(tag).and_then(|c| c.text())
    }

    /// All child elements with the given tag, in document order.
    fn children_named(&self, tag: &str) -> Vec<Self> {
        self.children()
            .into_iter()
            .filter(|c| c.tag() == tag)
            .collect()
    }
}
