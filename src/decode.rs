//! Structured-format decoders for config file content.
//!
//! A [`Decoder`] turns raw bytes into a [`Mapping`] of string keys to values.
//! [`Format`] covers the built-in JSON, YAML and TOML grammars, each parsed by
//! its standard crate with no extra leniency. [`MultiDecoder`] chains
//! decoders: the first one that succeeds wins, and if none does the error
//! carries every attempt.
//!
//! Decoders only ever see bytes. Finding, opening and reading files is the
//! job of the [`file`](crate::file) module.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{DecodeAttempts, DecodeError};

/// Decoded config content: string keys to JSON-model values, ordered by key.
pub type Mapping = serde_json::Map<String, Value>;

/// Order in which [`MultiDecoder::try_all`] tries the built-in formats.
///
/// JSON comes first because every JSON document is also YAML.
pub const TRY_ALL_ORDER: [Format; 3] = [Format::Json, Format::Yaml, Format::Toml];

/// Something that can turn config file bytes into a [`Mapping`].
pub trait Decoder: Send + Sync {
    /// Short label used in error messages, e.g. `"json"`.
    fn name(&self) -> &str;

    fn decode(&self, bytes: &[u8]) -> Result<Mapping, DecodeError>;
}

/// Decode `bytes` with `decoder`.
pub fn decode(bytes: &[u8], decoder: &dyn Decoder) -> Result<Mapping, DecodeError> {
    decoder.decode(bytes)
}

/// The built-in file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "toml" => Ok(Format::Toml),
            other => Err(DecodeError::UnknownFormat(other.to_string())),
        }
    }
}

impl Decoder for Format {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn decode(&self, bytes: &[u8]) -> Result<Mapping, DecodeError> {
        match self {
            Format::Json => decode_json(bytes),
            Format::Yaml => decode_yaml(bytes),
            Format::Toml => decode_toml(bytes),
        }
    }
}

fn decode_json(bytes: &[u8]) -> Result<Mapping, DecodeError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(DecodeError::NotAMapping {
            format: Format::Json,
            found: json_kind(&other),
        }),
    }
}

fn decode_yaml(bytes: &[u8]) -> Result<Mapping, DecodeError> {
    // Only the first document of a multi-document stream is read.
    let mut value = match serde_yaml::Deserializer::from_slice(bytes).next() {
        Some(document) => serde_yaml::Value::deserialize(document)?,
        None => serde_yaml::Value::Null,
    };
    value.apply_merge()?;
    match &value {
        serde_yaml::Value::Mapping(_) => {}
        serde_yaml::Value::Null => return Ok(Mapping::new()),
        other => {
            return Err(DecodeError::NotAMapping {
                format: Format::Yaml,
                found: yaml_kind(other),
            });
        }
    }
    // YAML keys may be non-strings; serde_json renders scalar keys as strings.
    match serde_json::to_value(&value).map_err(|e| DecodeError::Custom {
        decoder: Format::Yaml.to_string(),
        message: e.to_string(),
    })? {
        Value::Object(map) => Ok(map),
        other => Err(DecodeError::NotAMapping {
            format: Format::Yaml,
            found: json_kind(&other),
        }),
    }
}

fn decode_toml(bytes: &[u8]) -> Result<Mapping, DecodeError> {
    let text = std::str::from_utf8(bytes)?;
    let table: toml::Table = toml::from_str(text)?;
    Ok(toml_table_to_mapping(table))
}

fn toml_table_to_mapping(table: toml::Table) -> Mapping {
    table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect()
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        // NaN and infinities have no JSON number form.
        toml::Value::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(toml_table_to_mapping(table)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

/// A named closure used as a decoder, for formats this crate does not ship.
pub struct FnDecoder<F> {
    name: String,
    decode: F,
}

impl<F> FnDecoder<F>
where
    F: Fn(&[u8]) -> Result<Mapping, DecodeError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, decode: F) -> Self {
        Self {
            name: name.into(),
            decode,
        }
    }
}

impl<F> Decoder for FnDecoder<F>
where
    F: Fn(&[u8]) -> Result<Mapping, DecodeError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&self, bytes: &[u8]) -> Result<Mapping, DecodeError> {
        (self.decode)(bytes)
    }
}

/// An ordered, non-empty chain of decoders. First success wins.
pub struct MultiDecoder {
    candidates: Vec<Box<dyn Decoder>>,
    name: String,
}

impl MultiDecoder {
    /// Chain `candidates` in the given order. Fails on an empty list.
    pub fn new(candidates: Vec<Box<dyn Decoder>>) -> Result<Self, DecodeError> {
        if candidates.is_empty() {
            return Err(DecodeError::NoDecoders);
        }
        let name = candidates
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join("|");
        Ok(Self { candidates, name })
    }

    /// Chain built-in formats in the given order.
    pub fn from_formats(formats: &[Format]) -> Result<Self, DecodeError> {
        Self::new(
            formats
                .iter()
                .map(|f| Box::new(*f) as Box<dyn Decoder>)
                .collect(),
        )
    }

    /// Every built-in format, in [`TRY_ALL_ORDER`].
    pub fn try_all() -> Self {
        let candidates = TRY_ALL_ORDER
            .iter()
            .map(|f| Box::new(*f) as Box<dyn Decoder>)
            .collect::<Vec<_>>();
        let name = TRY_ALL_ORDER
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join("|");
        Self { candidates, name }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Always false for a constructed decoder.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl fmt::Debug for MultiDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiDecoder")
            .field("candidates", &self.name)
            .finish()
    }
}

impl Decoder for MultiDecoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&self, bytes: &[u8]) -> Result<Mapping, DecodeError> {
        let mut attempts = DecodeAttempts::default();
        for candidate in &self.candidates {
            match candidate.decode(bytes) {
                Ok(mapping) => return Ok(mapping),
                Err(e) => attempts.push(candidate.name().to_string(), e),
            }
        }
        Err(DecodeError::Exhausted(attempts))
    }
}

/// A decoder selection expressed as configuration data.
///
/// Parses from `"json"`, `"yaml"`, `"toml"`, a comma-separated chain such as
/// `"yaml,toml"`, or `"try-all"` / `"all"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DecoderChoice {
    Single(Format),
    Chain(Vec<Format>),
    #[default]
    TryAll,
}

impl DecoderChoice {
    /// Build the decoder this choice names.
    pub fn build(&self) -> Result<Box<dyn Decoder>, DecodeError> {
        Ok(match self {
            DecoderChoice::Single(format) => Box::new(*format),
            DecoderChoice::Chain(formats) => Box::new(MultiDecoder::from_formats(formats)?),
            DecoderChoice::TryAll => Box::new(MultiDecoder::try_all()),
        })
    }
}

impl FromStr for DecoderChoice {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("try-all") || trimmed.eq_ignore_ascii_case("all") {
            return Ok(DecoderChoice::TryAll);
        }
        let formats = trimmed
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Format::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        match formats.as_slice() {
            [] => Err(DecodeError::NoDecoders),
            [single] => Ok(DecoderChoice::Single(*single)),
            _ => Ok(DecoderChoice::Chain(formats)),
        }
    }
}

impl TryFrom<String> for DecoderChoice {
    type Error = DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DecoderChoice> for String {
    fn from(choice: DecoderChoice) -> Self {
        match choice {
            DecoderChoice::Single(format) => format.to_string(),
            DecoderChoice::Chain(formats) => formats
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(","),
            DecoderChoice::TryAll => "try-all".into(),
        }
    }
}
