//! Bind annotated configuration structs to JSON, YAML and TOML files.
//!
//! Each field of a config struct carries an annotation string such as
//! `id:"port" short:"p" default:"8080" desc:"listen port"`. Tagfig turns
//! every field into a [`ConfigOption`] descriptor, decodes the config file
//! with one or more format decoders, and resolves each option to a value.
//!
//! ```ignore
//! let resolved = Tagfig::builder::<AppConfig>()
//!     .app_name("myapp")
//!     .load()?;
//! let port = resolved.value("port");
//! ```
//!
//! # Options
//!
//! [`option_from_field`] builds one option from a field name, its annotation
//! and the option of the enclosing struct (if any):
//!
//! - **id**: the annotation's `id`, or the field name in ASCII lower case.
//! - **full id parts**: the parent's parts plus this id, so
//!   `database.url` is `["database", "url"]`.
//! - **default**: the annotation's `default`. An empty `default:""` still
//!   counts as set, which is how "empty string" differs from "no default".
//! - **short**, **desc**: copied from the annotation.
//! - **opts**: free-form tokens split on a delimiter, e.g. `opts:"hidden"`.
//!
//! Which annotation keys mean what is not hard-coded: a [`TagSchema`] names
//! them, and [`TagSchema::sample`] is the stock `id`/`short`/`default`/
//! `desc`/`opts` dialect. Malformed annotations never fail; whatever cannot
//! be read is treated as absent.
//!
//! # Describing structs
//!
//! Without runtime reflection, a config struct lists its fields by
//! implementing [`Describe`]. Nested structs are [`FieldKind::Nested`]; the
//! walker marks their options as parents and descends into them. See the
//! [`meta`] module for an example.
//!
//! # Decoders
//!
//! A [`Decoder`] turns bytes into a [`Mapping`]. The built-in [`Format`]s
//! wrap `serde_json`, `serde_yaml` and `toml` without extra leniency.
//! [`MultiDecoder`] tries several decoders in order and keeps the first
//! success; when all fail, [`DecodeError::Exhausted`] lists every attempt.
//! [`MultiDecoder::try_all`] is JSON, then YAML, then TOML, and is the
//! builder's default, so callers need not know the file's format.
//!
//! # Files
//!
//! A discovered file (from the search paths) that does not exist is simply
//! skipped. A file named with [`config_file()`](TagfigBuilder::config_file)
//! must exist: a missing one is [`TagfigError::FileNotFound`], which is a
//! different error from [`TagfigError::Decode`] for an invalid one.
//!
//! When several discovered files exist they are deep-merged, later search
//! paths overriding earlier ones key by key.
//!
//! # Resolution
//!
//! Each leaf option takes the file value at its path, else its annotation
//! default (as a string), else stays unset. [`Resolved`] records which of the
//! three applied through [`ValueSource`].
//!
//! # Strict mode
//!
//! Off by default. With [`.strict(true)`](TagfigBuilder::strict), a key in a
//! config file that matches no option fails the load with the file path and
//! the dotted key.

pub mod decode;
pub mod error;
pub mod meta;
pub mod option;
pub mod types;

mod builder;
mod file;
pub(crate) mod merge;
mod resolve;
mod tag;
mod walk;

#[cfg(test)]
mod fixtures;

pub use builder::{Tagfig, TagfigBuilder};
pub use decode::{
    Decoder, DecoderChoice, FnDecoder, Format, Mapping, MultiDecoder, TRY_ALL_ORDER, decode,
};
pub use error::{DecodeAttempt, DecodeAttempts, DecodeError, TagfigError};
pub use meta::{Describe, Field, FieldKind, Meta};
pub use option::{ConfigOption, OPT_HIDDEN, TagSchema, option_from_field};
pub use resolve::{Resolved, ResolvedValue};
pub use types::{SearchPath, ValueSource};
pub use walk::{collect_options, leaf_options};
