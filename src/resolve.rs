//! Resolution: pick a value and a source for every leaf option.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O. Steps:
//!
//! 1. Deep-merge file mappings (later overrides earlier)
//! 2. In strict mode, reject keys that match no option
//! 3. For each leaf option, take the file value at its path, else the
//!    annotation default, else leave it unset

use std::collections::HashSet;
use std::path::PathBuf;

use serde_json::Value;

use crate::decode::Mapping;
use crate::error::TagfigError;
use crate::merge::merge_into;
use crate::option::ConfigOption;
use crate::types::ValueSource;
use crate::walk::leaf_options;

/// All pre-loaded data needed to resolve options. No I/O happens here.
pub struct ResolveInput {
    /// Decoded files in precedence order: first = lowest priority, last = highest.
    pub files: Vec<(PathBuf, Mapping)>,
    /// Whether to reject keys that match no option.
    pub strict: bool,
}

/// One leaf option with the value it ended up with.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue {
    pub option: ConfigOption,
    pub value: Option<Value>,
    pub source: ValueSource,
}

/// The outcome of a load: every leaf option, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolved {
    entries: Vec<ResolvedValue>,
}

impl Resolved {
    /// Look up an entry by dotted id, e.g. `"database.url"`.
    pub fn get(&self, dotted_id: &str) -> Option<&ResolvedValue> {
        self.entries
            .iter()
            .find(|e| e.option.dotted_id() == dotted_id)
    }

    /// The value for a dotted id, if the option exists and has one.
    pub fn value(&self, dotted_id: &str) -> Option<&Value> {
        self.get(dotted_id).and_then(|e| e.value.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedValue> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Resolved {
    type Item = ResolvedValue;
    type IntoIter = std::vec::IntoIter<ResolvedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Resolve `options` against pre-loaded files.
pub fn resolve(options: &[ConfigOption], input: ResolveInput) -> Result<Resolved, TagfigError> {
    if input.strict {
        let known = known_paths(options);
        let mut errors = Vec::new();
        for (path, mapping) in &input.files {
            let mut unknown = Vec::new();
            collect_unknown(mapping, &[], &known, &mut unknown);
            errors.extend(unknown.into_iter().map(|key| TagfigError::UnknownKey {
                key,
                path: path.clone(),
            }));
        }
        if !errors.is_empty() {
            return Err(TagfigError::UnknownKeys(errors));
        }
    }

    let mut merged = Mapping::new();
    for (_, mapping) in input.files {
        merge_into(&mut merged, mapping);
    }

    let entries = leaf_options(options)
        .map(|option| resolve_one(option, &merged))
        .collect();

    Ok(Resolved { entries })
}

fn resolve_one(option: &ConfigOption, merged: &Mapping) -> ResolvedValue {
    let (value, source) = match lookup_path(merged, option.full_id_parts()) {
        Some(v) => (Some(v.clone()), ValueSource::File),
        None => match option.default_value() {
            Some(default) => (Some(Value::String(default.to_string())), ValueSource::Default),
            None => (None, ValueSource::Unset),
        },
    };
    ResolvedValue {
        option: option.clone(),
        value,
        source,
    }
}

/// Walk `mapping` along `parts`. Every segment but the last must be a mapping.
fn lookup_path<'a>(mapping: &'a Mapping, parts: &[String]) -> Option<&'a Value> {
    let (leaf, path) = parts.split_last()?;
    let mut current = mapping;
    for segment in path {
        current = current.get(segment)?.as_object()?;
    }
    current.get(leaf)
}

/// Every dotted path an option claims, split into the parents and the leaves.
struct KnownPaths {
    parents: HashSet<Vec<String>>,
    leaves: HashSet<Vec<String>>,
}

fn known_paths(options: &[ConfigOption]) -> KnownPaths {
    let mut parents = HashSet::new();
    let mut leaves = HashSet::new();
    for option in options {
        let path = option.full_id_parts().to_vec();
        if option.is_parent() {
            parents.insert(path);
        } else {
            leaves.insert(path);
        }
    }
    KnownPaths { parents, leaves }
}

fn collect_unknown(mapping: &Mapping, prefix: &[String], known: &KnownPaths, out: &mut Vec<String>) {
    for (key, value) in mapping {
        let mut path = prefix.to_vec();
        path.push(key.clone());

        if known.leaves.contains(&path) {
            continue;
        }
        match value {
            Value::Object(nested) if known.parents.contains(&path) => {
                collect_unknown(nested, &path, known, out);
            }
            _ => out.push(path.join(".")),
        }
    }
}
