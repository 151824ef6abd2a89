//! Static field descriptions for configuration structs.
//!
//! Rust has no runtime reflection, so a config struct describes its own fields
//! by implementing [`Describe`]. The description is plain `'static` data: each
//! field's name, its annotation string, and whether it is a scalar or a nested
//! struct with its own description.
//!
//! ```
//! use tagfig::{Describe, Field, Meta};
//!
//! struct Database;
//! impl Describe for Database {
//!     const META: Meta = Meta {
//!         name: "Database",
//!         fields: &[Field::leaf("url", r#"desc:"connection string""#)],
//!     };
//! }
//!
//! struct App;
//! impl Describe for App {
//!     const META: Meta = Meta {
//!         name: "App",
//!         fields: &[
//!             Field::leaf("port", r#"short:"p" default:"8080""#),
//!             Field::nested("database", "", &Database::META),
//!         ],
//!     };
//! }
//! ```

/// Implemented by every struct that can be bound from config sources.
pub trait Describe {
    const META: Meta;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    /// Type name, for diagnostics only.
    pub name: &'static str,
    pub fields: &'static [Field],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// The Rust field name.
    pub name: &'static str,
    /// The field's annotation, e.g. `id:"port" default:"8080"`.
    pub tag: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Leaf,
    Nested { meta: &'static Meta },
}

impl Field {
    /// `name` must be non-empty unless the annotation supplies an id.
    pub const fn leaf(name: &'static str, tag: &'static str) -> Self {
        Self {
            name,
            tag,
            kind: FieldKind::Leaf,
        }
    }

    pub const fn nested(name: &'static str, tag: &'static str, meta: &'static Meta) -> Self {
        Self {
            name,
            tag,
            kind: FieldKind::Nested { meta },
        }
    }
}
