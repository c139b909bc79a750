use super::{CodegenError, TypeList};
use itertools::Itertools;

/// Token replaced with the type name in include patterns
pub const NAME_TOKEN: &str = "{name}";

/// Describes how a type name maps to the header declaring it.
///
/// With a prefix of `configs` and a pattern of `{name}Config.hpp`, the `Delay` type becomes
/// `#include "configs/DelayConfig.hpp"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeStyle {
    /// Directory prepended to every header. Can be empty.
    pub prefix: String,
    /// File name pattern containing [`NAME_TOKEN`].
    pub pattern: String,
}

impl IncludeStyle {
    pub fn new(prefix: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            pattern: pattern.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CodegenError> {
        if self.pattern.contains(NAME_TOKEN) {
            Ok(())
        } else {
            Err(CodegenError::InvalidPattern {
                pattern: self.pattern.clone(),
            })
        }
    }

    /// Path of the header as written inside the include directive.
    ///
    /// ```
    /// # use apollo_gen::codegen::IncludeStyle;
    /// let style = IncludeStyle::new("configs/", "{name}Config.hpp");
    /// assert_eq!(style.header_path("Delay"), "configs/DelayConfig.hpp");
    /// ```
    pub fn header_path(&self, name: &str) -> String {
        let file = self.pattern.replace(NAME_TOKEN, name);
        let prefix = self.prefix.trim_end_matches('/');
        if prefix.is_empty() {
            file
        } else {
            format!("{prefix}/{file}")
        }
    }

    pub fn directive(&self, name: &str) -> String {
        format!("#include \"{}\"", self.header_path(name))
    }
}

/// Builds the newline separated list of include directives, one per type, in list order.
/// There's no trailing newline, the template decides what surrounds the block.
pub fn include_block(types: &TypeList, style: &IncludeStyle) -> String {
    types.iter().map(|name| style.directive(name)).join("\n")
}
