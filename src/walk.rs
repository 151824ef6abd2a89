//! Turn a [`Meta`] description into the flat list of option descriptors.

use crate::meta::{FieldKind, Meta};
use crate::option::{ConfigOption, TagSchema, option_from_field};

/// Build one [`ConfigOption`] per field, depth-first in declaration order.
///
/// A nested struct yields a parent option followed by its own fields, whose
/// paths extend the parent's.
pub fn collect_options(meta: &Meta, schema: &TagSchema) -> Vec<ConfigOption> {
    let mut out = Vec::new();
    walk(meta, None, schema, &mut out);
    out
}

/// Only the options that carry values (the non-parent ones).
pub fn leaf_options(options: &[ConfigOption]) -> impl Iterator<Item = &ConfigOption> {
    options.iter().filter(|o| !o.is_parent())
}

fn walk(
    meta: &Meta,
    parent: Option<&ConfigOption>,
    schema: &TagSchema,
    out: &mut Vec<ConfigOption>,
) {
    for field in meta.fields {
        let option = option_from_field(field.name, field.tag, parent, schema);
        match field.kind {
            FieldKind::Leaf => {
                tracing::trace!(option = %option.dotted_id(), "built option");
                out.push(option);
            }
            FieldKind::Nested { meta: nested } => {
                let option = option.into_parent();
                tracing::trace!(option = %option.dotted_id(), section = nested.name, "built parent option");
                out.push(option.clone());
                walk(nested, Some(&option), schema, out);
            }
        }
    }
}
