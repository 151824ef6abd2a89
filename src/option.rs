//! Option descriptors derived from annotated struct fields.
//!
//! Every bindable field becomes a [`ConfigOption`]. Its identity is the path
//! of ids from the root struct down to the field, e.g. `["database", "url"]`.
//! Which annotation keys feed which attribute is decided by a [`TagSchema`],
//! so several annotation dialects can coexist in one program.

use crate::tag;

/// Opt token that marks an option as hidden from help and usage output.
pub const OPT_HIDDEN: &str = "hidden";

/// Names of the annotation keys that feed each [`ConfigOption`] attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSchema {
    pub id: String,
    pub short: String,
    pub default: String,
    pub desc: String,
    pub opts: String,
    /// Separator between tokens in the opts value.
    pub opts_delimiter: char,
}

impl TagSchema {
    /// The stock dialect: `id`, `short`, `default`, `desc`, `opts`, split on `,`.
    pub fn sample() -> Self {
        Self {
            id: "id".into(),
            short: "short".into(),
            default: "default".into(),
            desc: "desc".into(),
            opts: "opts".into(),
            opts_delimiter: ',',
        }
    }
}

impl Default for TagSchema {
    fn default() -> Self {
        Self::sample()
    }
}

/// Resolved descriptor for one configuration field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOption {
    full_id_parts: Vec<String>,
    id: String,
    short: String,
    default: String,
    default_set: bool,
    desc: String,
    opts: Vec<String>,
    is_parent: bool,
}

impl ConfigOption {
    /// Ids from the root struct down to this field.
    pub fn full_id_parts(&self) -> &[String] {
        &self.full_id_parts
    }

    /// The full path joined with dots, e.g. `"database.url"`.
    pub fn dotted_id(&self) -> String {
        self.full_id_parts.join(".")
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Short alias; empty when the annotation gives none.
    pub fn short(&self) -> &str {
        &self.short
    }

    /// The annotation default, if one was given (possibly the empty string).
    pub fn default_value(&self) -> Option<&str> {
        self.default_set.then_some(self.default.as_str())
    }

    pub fn default_set(&self) -> bool {
        self.default_set
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn opts(&self) -> &[String] {
        &self.opts
    }

    pub fn has_opt(&self, opt: &str) -> bool {
        self.opts.iter().any(|o| o == opt)
    }

    pub fn is_hidden(&self) -> bool {
        self.has_opt(OPT_HIDDEN)
    }

    /// True for options standing for a nested struct rather than a scalar.
    pub fn is_parent(&self) -> bool {
        self.is_parent
    }

    /// Mark this option as the parent of a nested struct's fields.
    pub fn into_parent(mut self) -> Self {
        self.is_parent = true;
        self
    }
}

/// Build the option for one struct field.
///
/// `tag` is the field's annotation, read with the key names in `schema`.
/// With a `parent`, the option's path extends the parent's path. The result
/// is never a parent itself: the caller decides that from the field's type
/// and calls [`ConfigOption::into_parent`].
///
/// Malformed annotations do not fail; unreadable keys count as absent.
/// An empty `field_name` with no annotation id gives an empty path segment,
/// which [`TagfigBuilder::options`](crate::TagfigBuilder::options) rejects.
pub fn option_from_field(
    field_name: &str,
    tag: &str,
    parent: Option<&ConfigOption>,
    schema: &TagSchema,
) -> ConfigOption {
    let id = tag::lookup(tag, &schema.id)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| field_name.to_ascii_lowercase());

    let short = tag::lookup(tag, &schema.short).unwrap_or_default();
    let desc = tag::lookup(tag, &schema.desc).unwrap_or_default();

    let (default, default_set) = match tag::lookup(tag, &schema.default) {
        Some(value) => (value, true),
        None => (String::new(), false),
    };

    let opts = tag::lookup(tag, &schema.opts)
        .map(|raw| split_opts(&raw, schema.opts_delimiter))
        .unwrap_or_default();

    let mut full_id_parts = parent
        .map(|p| p.full_id_parts.clone())
        .unwrap_or_default();
    full_id_parts.push(id.clone());

    ConfigOption {
        full_id_parts,
        id,
        short,
        default,
        default_set,
        desc,
        opts,
        is_parent: false,
    }
}

fn split_opts(raw: &str, delimiter: char) -> Vec<String> {
    raw.split(delimiter)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(name: &str, tag: &str, parent: Option<&ConfigOption>) -> ConfigOption {
        option_from_field(name, tag, parent, &TagSchema::sample())
    }

    fn parts(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_annotation_uses_lowercased_field_name() {
        let opt = build("Empty", "", None);
        assert_eq!(
            opt,
            ConfigOption {
                full_id_parts: parts(&["empty"]),
                id: "empty".into(),
                ..ConfigOption::default()
            }
        );
        assert!(!opt.default_set());
        assert!(!opt.is_parent());
        assert_eq!(opt.default_value(), None);
    }

    #[test]
    fn full_annotation() {
        let opt = build(
            "name",
            r#"id:"realname" short:"s" default:"defaultvalue" desc:"testing..""#,
            None,
        );
        assert_eq!(
            opt,
            ConfigOption {
                full_id_parts: parts(&["realname"]),
                id: "realname".into(),
                short: "s".into(),
                default: "defaultvalue".into(),
                default_set: true,
                desc: "testing..".into(),
                opts: vec![],
                is_parent: false,
            }
        );
    }

    #[test]
    fn child_extends_parent_path() {
        let parent = ConfigOption {
            full_id_parts: parts(&["mother", "father"]),
            id: "father".into(),
            is_parent: true,
            ..ConfigOption::default()
        };
        let opt = build(
            "child",
            r#"short:"S" default:"defaultvalue" desc:"testing..""#,
            Some(&parent),
        );
        assert_eq!(opt.full_id_parts(), parts(&["mother", "father", "child"]));
        assert_eq!(opt.id(), "child");
        assert_eq!(opt.short(), "S");
        assert_eq!(opt.default_value(), Some("defaultvalue"));
        assert!(!opt.is_parent());
        assert_eq!(opt.dotted_id(), "mother.father.child");
    }

    #[test]
    fn opts_parsed() {
        let opt = build(
            "name",
            r#"id:"realname" opts:"hidden" short:"s" default:"defaultvalue" desc:"testing..""#,
            None,
        );
        assert_eq!(opt.opts(), ["hidden"]);
        assert!(opt.is_hidden());
    }

    #[test]
    fn opts_trimmed_and_empties_dropped() {
        let opt = build("name", r#"opts:" hidden, ,noenv ,""#, None);
        assert_eq!(opt.opts(), ["hidden", "noenv"]);
    }

    #[test]
    fn empty_default_still_counts_as_set() {
        let opt = build("name", r#"default:"""#, None);
        assert!(opt.default_set());
        assert_eq!(opt.default_value(), Some(""));
    }

    #[test]
    fn empty_id_falls_back_to_field_name() {
        let opt = build("Port", r#"id:"""#, None);
        assert_eq!(opt.id(), "port");
    }

    #[test]
    fn lowercasing_is_ascii_only() {
        let opt = build("ÉcoleMode", "", None);
        assert_eq!(opt.id(), "Écolemode");
    }

    #[test]
    fn malformed_annotation_degrades_to_defaults() {
        let opt = build("Host", r#"id:"unterminated"#, None);
        assert_eq!(opt.id(), "host");
        assert!(!opt.default_set());
    }

    #[test]
    fn unknown_keys_ignored() {
        let opt = build("host", r#"env:"HOST" id:"addr""#, None);
        assert_eq!(opt.id(), "addr");
    }

    #[test]
    fn custom_schema_dialect() {
        let schema = TagSchema {
            id: "name".into(),
            short: "alias".into(),
            default: "fallback".into(),
            desc: "help".into(),
            opts: "flags".into(),
            opts_delimiter: '|',
        };
        let tag = r#"name:"listen" alias:"l" fallback:"0.0.0.0" help:"bind address" flags:"hidden|noflag" id:"ignored""#;
        let opt = option_from_field("addr", tag, None, &schema);
        assert_eq!(opt.id(), "listen");
        assert_eq!(opt.short(), "l");
        assert_eq!(opt.default_value(), Some("0.0.0.0"));
        assert_eq!(opt.desc(), "bind address");
        assert_eq!(opt.opts(), ["hidden", "noflag"]);
    }

    #[test]
    fn into_parent_keeps_identity() {
        let opt = build("Database", "", None).into_parent();
        assert!(opt.is_parent());
        assert_eq!(opt.full_id_parts(), parts(&["database"]));
    }
}
