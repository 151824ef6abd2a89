use std::collections::HashSet;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::decode::{Decoder, DecoderChoice, Mapping, MultiDecoder};
use crate::error::TagfigError;
use crate::file;
use crate::meta::Describe;
use crate::option::{ConfigOption, TagSchema};
use crate::resolve::{self, ResolveInput, Resolved};
use crate::types::SearchPath;
use crate::walk;

/// Entry point for building a tagfig configuration.
pub struct Tagfig;

impl Tagfig {
    pub fn builder<C: Describe>() -> TagfigBuilder<C> {
        TagfigBuilder::new()
    }
}

/// Builder for loading annotated configuration from files.
///
/// A file either comes from **discovery** ([`search_paths()`](Self::search_paths)
/// plus [`file_name()`](Self::file_name), missing files skipped) or is named
/// **explicitly** with [`config_file()`](Self::config_file), in which case it
/// must exist.
pub struct TagfigBuilder<C: Describe> {
    app_name: Option<String>,
    file_name: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    config_file: Option<PathBuf>,
    decoder: Option<Box<dyn Decoder>>,
    schema: TagSchema,
    strict: bool,
    _phantom: PhantomData<C>,
}

impl<C: Describe> TagfigBuilder<C> {
    fn new() -> Self {
        Self {
            app_name: None,
            file_name: None,
            search_paths: None,
            config_file: None,
            decoder: None,
            schema: TagSchema::sample(),
            strict: false,
            _phantom: PhantomData,
        }
    }

    /// Set the application name. This derives sensible defaults:
    /// - `file_name` → `"{app_name}.conf"`
    /// - `search_paths` → `[SearchPath::Platform]`
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the discovered file name (default: `"{app_name}.conf"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Replace the default search paths entirely.
    ///
    /// Paths are listed in **priority-ascending** order: the last entry has the
    /// highest priority. Every file found is deep-merged in that order.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append a search path without replacing the defaults.
    /// If no paths have been set yet, starts from the default `[Platform]`.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(|| vec![SearchPath::Platform])
            .push(path);
        self
    }

    /// Load exactly this file instead of searching. A missing file is an error.
    pub fn config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the decoder (default: every built-in format, see [`MultiDecoder::try_all`]).
    pub fn decoder(mut self, decoder: impl Decoder + 'static) -> Self {
        self.decoder = Some(Box::new(decoder));
        self
    }

    /// Set the decoder from a configuration value such as `"yaml,toml"`.
    pub fn decoder_choice(self, choice: &DecoderChoice) -> Result<Self, TagfigError> {
        let decoder = choice.build()?;
        Ok(Self {
            decoder: Some(decoder),
            ..self
        })
    }

    /// Use a different annotation dialect (default: [`TagSchema::sample`]).
    pub fn schema(mut self, schema: TagSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Enable or disable strict mode (default: `false`).
    /// In strict mode, keys in config files that match no option produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolve the effective app name, or error if not set.
    fn effective_app_name(&self) -> Result<&str, TagfigError> {
        self.app_name
            .as_deref()
            .ok_or(TagfigError::AppNameRequired)
    }

    /// Resolve the effective file name.
    fn effective_file_name(&self) -> Result<String, TagfigError> {
        if let Some(name) = &self.file_name {
            return Ok(name.clone());
        }
        let app = self.effective_app_name()?;
        Ok(format!("{app}.conf"))
    }

    /// Resolve the effective search paths.
    fn effective_search_paths(&self) -> Vec<SearchPath> {
        if let Some(paths) = &self.search_paths {
            return paths.clone();
        }
        vec![SearchPath::Platform]
    }

    /// Every option of `C`, parents included, in declaration order.
    ///
    /// Fails if a field has an empty name and no annotation id, or if two
    /// fields end up with the same dotted id.
    pub fn options(&self) -> Result<Vec<ConfigOption>, TagfigError> {
        let options = walk::collect_options(&C::META, &self.schema);
        let mut seen = HashSet::new();
        for option in &options {
            let id = option.dotted_id();
            if option.full_id_parts().iter().any(String::is_empty) {
                return Err(TagfigError::EmptyOptionId(id));
            }
            if !seen.insert(id.clone()) {
                return Err(TagfigError::DuplicateOption(id));
            }
        }
        Ok(options)
    }

    /// Read and decode the config files this builder points at.
    fn load_files(&self) -> Result<Vec<(PathBuf, Mapping)>, TagfigError> {
        let try_all;
        let decoder: &dyn Decoder = match &self.decoder {
            Some(d) => d.as_ref(),
            None => {
                try_all = MultiDecoder::try_all();
                &try_all
            }
        };

        if let Some(path) = &self.config_file {
            tracing::debug!(path = %path.display(), "loading explicit config file");
            let mapping = file::load_explicit(path, decoder)?;
            return Ok(vec![(path.clone(), mapping)]);
        }

        let app_name = self.effective_app_name()?;
        let file_name = self.effective_file_name()?;
        let dirs = file::expand_search_paths(&self.effective_search_paths(), app_name);
        file::load_discovered(&dirs, &file_name, decoder)
    }

    /// Load the config files and resolve every leaf option of `C`.
    pub fn load(self) -> Result<Resolved, TagfigError> {
        let options = self.options()?;
        let files = self.load_files()?;
        resolve::resolve(
            &options,
            ResolveInput {
                files,
                strict: self.strict,
            },
        )
    }
}
