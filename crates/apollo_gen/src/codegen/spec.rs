//! Generator specifications
//!
//! Generators are declared in a TOML file, one `[[generator]]` table each:
//! ```toml
//! [[generator]]
//! name = "configs"
//! template = "synth/src/configs/ComponentConfig.hpp.in"
//! include_prefix = "configs"
//! include_pattern = "{name}Config.hpp"
//! headers_root = "synth/src"
//!
//! [generator.source]
//! kind = "macro_list"
//! path = "shared/types/ComponentType.hpp"
//! ```
//! Relative paths are resolved against the directory containing the file.

use super::{default_output_path, CodegenError, IncludeStyle, Sentinels, TypeSource};
use anyhow::Context;
use apollo_utils::{AnyResult, AnyhowResultExt};
use clap::ValueEnum;
use derive_builder::Builder;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Header holding the engine's canonical type list, relative to the project root
pub const TYPE_LIST_HEADER: &str = "shared/types/ComponentType.hpp";
/// Include directory of the synth, relative to the project root
pub const SYNTH_INCLUDE_ROOT: &str = "synth/src";
pub const COMPONENTS_TEMPLATE: &str = "synth/src/components/Components.hpp.in";
pub const CONFIGS_TEMPLATE: &str = "synth/src/configs/ComponentConfig.hpp.in";

#[derive(Debug, Clone, PartialEq, Eq, Builder, Deserialize)]
#[builder(setter(into))]
#[serde(deny_unknown_fields)]
pub struct GeneratorSpec {
    /// Name used in logs and for `--only` selection
    pub name: String,
    pub source: TypeSource,
    /// Template containing the include placeholder
    pub template: PathBuf,
    /// Defaults to the template path without `.in`
    #[builder(setter(into, strip_option), default)]
    #[serde(default)]
    pub output: Option<PathBuf>,
    pub include_prefix: String,
    pub include_pattern: String,
    /// Enumerators skipped by exact name
    #[builder(default = "default_sentinels()")]
    #[serde(default = "default_sentinels")]
    pub sentinels: Vec<String>,
    /// Enumerators skipped by name prefix
    #[builder(default = "default_sentinel_prefixes()")]
    #[serde(default = "default_sentinel_prefixes")]
    pub sentinel_prefixes: Vec<String>,
    /// Directory the include paths are relative to. If set, headers are checked for existence.
    #[builder(setter(into, strip_option), default)]
    #[serde(default)]
    pub headers_root: Option<PathBuf>,
    /// Turns missing headers into errors, rather than warnings
    #[builder(default)]
    #[serde(default)]
    pub require_headers: bool,
}

fn default_sentinels() -> Vec<String> {
    Sentinels::default().names
}

fn default_sentinel_prefixes() -> Vec<String> {
    Sentinels::default().prefixes
}

impl GeneratorSpec {
    pub fn builder() -> GeneratorSpecBuilder {
        GeneratorSpecBuilder::default()
    }

    pub fn sentinel_filter(&self) -> Sentinels {
        Sentinels {
            names: self.sentinels.clone(),
            prefixes: self.sentinel_prefixes.clone(),
        }
    }

    pub fn include_style(&self) -> IncludeStyle {
        IncludeStyle::new(&self.include_prefix, &self.include_pattern)
    }

    pub fn output_path(&self) -> Result<PathBuf, CodegenError> {
        match &self.output {
            Some(output) => Ok(output.clone()),
            None => default_output_path(&self.template),
        }
    }

    pub fn validate(&self) -> Result<(), CodegenError> {
        self.include_style().validate()?;
        self.output_path()?;
        Ok(())
    }

    /// Makes all relative paths relative to `base` instead.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        resolve(self.source.path_mut());
        resolve(&mut self.template);
        if let Some(output) = &mut self.output {
            resolve(output);
        }
        if let Some(headers_root) = &mut self.headers_root {
            resolve(headers_root);
        }
    }
}

/// Contents of a generator specification file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecFile {
    #[serde(rename = "generator", default)]
    pub generators: Vec<GeneratorSpec>,
}

impl SpecFile {
    /// Parses specification text. Relative paths are resolved against `base_dir`.
    pub fn parse(text: &str, base_dir: &Path) -> AnyResult<Self> {
        let mut spec: SpecFile = toml::from_str(text)?;
        for generator in &mut spec.generators {
            generator.resolve_paths(base_dir);
        }
        spec.validate()?;
        Ok(spec)
    }

    pub fn load(path: &Path) -> AnyResult<Self> {
        let text = fs::read_to_string(path)
            .otherwise(format_args!("reading generator specification {}", path.display()))?;
        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::parse(&text, base_dir)
            .with_context(|| format!("invalid generator specification {}", path.display()))
    }

    fn validate(&self) -> Result<(), CodegenError> {
        for (i, generator) in self.generators.iter().enumerate() {
            if self.generators[..i].iter().any(|g| g.name == generator.name) {
                return Err(CodegenError::DuplicateGenerator {
                    name: generator.name.clone(),
                });
            }
            generator.validate()?;
        }
        Ok(())
    }

    /// Picks generators by name, in the order given. An empty selection means all of them.
    pub fn select(&self, only: &[String]) -> Result<Vec<&GeneratorSpec>, CodegenError> {
        if only.is_empty() {
            return Ok(self.generators.iter().collect());
        }

        only.iter()
            .map(|name| {
                self.generators
                    .iter()
                    .find(|g| &g.name == name)
                    .ok_or_else(|| CodegenError::UnknownGenerator { name: name.clone() })
            })
            .collect()
    }
}

/// Generators used by the engine itself, for use without a specification file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// `Components.hpp`, including every component declaration header
    Components,
    /// `ComponentConfig.hpp`, including every component configuration header
    Configs,
}

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Preset::Components => "components",
            Preset::Configs => "configs",
        }
    }

    /// Builds the preset's specification for a project checked out at `root`.
    pub fn spec(self, root: &Path) -> AnyResult<GeneratorSpec> {
        let (template, pattern) = match self {
            Preset::Components => (COMPONENTS_TEMPLATE, "{name}.hpp"),
            Preset::Configs => (CONFIGS_TEMPLATE, "{name}Config.hpp"),
        };

        let spec = GeneratorSpec::builder()
            .name(self.name())
            .source(TypeSource::MacroList {
                path: root.join(TYPE_LIST_HEADER),
                macro_name: super::DEFAULT_LIST_MACRO.to_owned(),
            })
            .template(root.join(template))
            .include_prefix(self.name())
            .include_pattern(pattern)
            .headers_root(root.join(SYNTH_INCLUDE_ROOT))
            .build()?;
        Ok(spec)
    }
}
