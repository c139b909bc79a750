use super::CodegenError;
use apollo_utils::{ok, AnyResult, AnyhowResultExt};
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Token replaced with the generated include block
pub const PLACEHOLDER: &str = "@INCLUDES@";
/// Extension of checked-in templates. The output is the template path without it.
pub const TEMPLATE_EXTENSION: &str = "in";

/// A checked-in header template, like `ComponentConfig.hpp.in`.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    text: String,
}

impl Template {
    /// Wraps loaded template text. Fails if the placeholder is missing, as the output would
    /// silently lack all includes.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Result<Self, CodegenError> {
        let path = path.into();
        let text = text.into();
        if !text.contains(PLACEHOLDER) {
            return Err(CodegenError::PlaceholderMissing {
                placeholder: PLACEHOLDER,
                path,
            });
        }
        Ok(Self { path, text })
    }

    pub fn open(path: &Path) -> AnyResult<Self> {
        let text = fs::read_to_string(path)
            .otherwise(format_args!("reading template {}", path.display()))?;
        Ok(Self::new(path, text)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Substitutes every placeholder occurrence, leaving the rest of the text untouched.
    pub fn render(&self, includes: &str) -> String {
        self.text.replace(PLACEHOLDER, includes)
    }
}

/// Derives the output path of a template by dropping its `.in` extension.
///
/// ```
/// # use apollo_gen::codegen::default_output_path;
/// # use std::path::Path;
/// let output = default_output_path(Path::new("src/configs/ComponentConfig.hpp.in")).unwrap();
/// assert_eq!(output, Path::new("src/configs/ComponentConfig.hpp"));
/// ```
pub fn default_output_path(template: &Path) -> Result<PathBuf, CodegenError> {
    let no_output = || CodegenError::NoOutputPath {
        path: template.to_owned(),
    };

    if template.extension().and_then(|ext| ext.to_str()) != Some(TEMPLATE_EXTENSION) {
        return Err(no_output());
    }
    match template.file_stem() {
        Some(stem) if !stem.is_empty() => Ok(template.with_file_name(stem)),
        _ => Err(no_output()),
    }
}

/// Writes generated contents, replacing whatever was at `path`.
pub fn write_output(path: &Path, contents: &str) -> AnyResult {
    fs::write(path, contents).otherwise(format_args!("writing {}", path.display()))?;
    info!("Generated {}", path.display());
    ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_placeholder_is_replaced() {
        let text = "#ifndef ALL_CONFIGS\n#define ALL_CONFIGS\n\n@INCLUDES@\n\n#endif // @ not a token\n";
        let template = Template::new("ComponentConfig.hpp.in", text).unwrap();

        let rendered = template.render("#include \"configs/DelayConfig.hpp\"");
        assert_eq!(
            rendered,
            "#ifndef ALL_CONFIGS\n#define ALL_CONFIGS\n\n#include \"configs/DelayConfig.hpp\"\n\n#endif // @ not a token\n"
        );
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let template = Template::new("t.in", "@INCLUDES@|@INCLUDES@").unwrap();
        assert_eq!(template.render("x"), "x|x");
    }

    #[test]
    fn missing_placeholder_is_an_error() {
        let err = Template::new("Components.hpp.in", "#pragma once\n").unwrap_err();
        assert!(matches!(err, CodegenError::PlaceholderMissing { .. }));
    }

    #[test]
    fn output_path_requires_in_extension() {
        assert!(default_output_path(Path::new("Components.hpp")).is_err());
        assert!(default_output_path(Path::new(".in")).is_err());
        assert_eq!(
            default_output_path(Path::new("Components.hpp.in")).unwrap(),
            Path::new("Components.hpp")
        );
    }
}
