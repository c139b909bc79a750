//! Type list extraction
//!
//! The engine keeps its canonical list of component kinds in a header, as an X-macro:
//! ```c
//! #define COMPONENT_TYPE_LIST \
//!     X(Oscillator) \
//!     X(BiquadFilter) \
//!     X(Delay) \
//!
//! enum class ComponentType {
//!     #define X(name) name,
//!     COMPONENT_TYPE_LIST
//!     #undef X
//!     Unknown,
//!     N_COMPONENTS
//! };
//! ```
//!
//! Both forms can be scanned. The macro list is read directly, while the enum body is read
//! enumerator by enumerator, expanding any X-macro list it references. Entries like `Unknown` and
//! `N_COMPONENTS` aren't real types, and are removed by [`Sentinels`].
//!
//! This isn't a C++ parser. Comments are ignored, preprocessor directives inside the enum body
//! are skipped, and anything fancier than `Name`, `Name = value` or a bare list macro is reported
//! as malformed.

use super::CodegenError;
use apollo_utils::{AnyResult, AnyhowResultExt};
use log::{debug, warn};
use serde::Deserialize;
use std::{
    ffi::OsStr,
    fmt::{self, Display},
    fs,
    path::{Path, PathBuf},
};

/// Name of the type list macro used by the engine
pub const DEFAULT_LIST_MACRO: &str = "COMPONENT_TYPE_LIST";
/// Name of the per-entry macro inside a type list
pub const ENTRY_MACRO: &str = "X";
pub const DEFAULT_HEADER_EXTENSION: &str = "hpp";

/// Where the names of a generator come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeSource {
    /// `#define <macro_name> X(A) X(B) ...` in a header
    MacroList {
        path: PathBuf,
        #[serde(default = "default_list_macro")]
        macro_name: String,
    },
    /// `enum class <enum_name> { A, B, ... }` in a header
    Enum { path: PathBuf, enum_name: String },
    /// Every `*.<extension>` file in a directory, named by its file stem
    Directory {
        path: PathBuf,
        #[serde(default = "default_header_extension")]
        extension: String,
    },
}

fn default_list_macro() -> String {
    DEFAULT_LIST_MACRO.to_owned()
}

fn default_header_extension() -> String {
    DEFAULT_HEADER_EXTENSION.to_owned()
}

impl TypeSource {
    pub fn path(&self) -> &Path {
        match self {
            TypeSource::MacroList { path, .. }
            | TypeSource::Enum { path, .. }
            | TypeSource::Directory { path, .. } => path,
        }
    }

    pub(crate) fn path_mut(&mut self) -> &mut PathBuf {
        match self {
            TypeSource::MacroList { path, .. }
            | TypeSource::Enum { path, .. }
            | TypeSource::Directory { path, .. } => path,
        }
    }

    /// Reads all names from the source, in discovery order, sentinels included.
    ///
    /// `exclude` is a file directory sources must never list. Generators pass their own output
    /// path here, so that the aggregate header doesn't end up including itself.
    pub fn read_names(&self, exclude: Option<&Path>) -> AnyResult<Vec<String>> {
        match self {
            TypeSource::MacroList { path, macro_name } => {
                Ok(HeaderScanner::open(path)?.macro_list(macro_name)?)
            }
            TypeSource::Enum { path, enum_name } => {
                Ok(HeaderScanner::open(path)?.enum_body(enum_name)?)
            }
            TypeSource::Directory { path, extension } => scan_directory(path, extension, exclude),
        }
    }

    /// Reads the source and builds a [`TypeList`] out of it, with sentinels removed.
    pub fn extract(&self, sentinels: &Sentinels, exclude: Option<&Path>) -> AnyResult<TypeList> {
        let names = self.read_names(exclude)?;
        let discovered = names.len();
        let list = TypeList::new(names.into_iter().filter(|name| !sentinels.matches(name)))?;

        debug!(
            "Found {} types in {} ({} sentinels skipped)",
            list.len(),
            self.path().display(),
            discovered - list.len(),
        );

        Ok(list)
    }
}

/// Enumerators that don't correspond to actual types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinels {
    /// Exact names to skip, like `Unknown`
    pub names: Vec<String>,
    /// Name prefixes to skip, like the `N_` of `N_COMPONENTS`
    pub prefixes: Vec<String>,
}

impl Sentinels {
    /// A filter that lets everything through
    pub fn none() -> Self {
        Self {
            names: vec![],
            prefixes: vec![],
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|sentinel| sentinel == name)
            || self.prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
    }
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            names: vec!["Unknown".to_owned()],
            prefixes: vec!["N_".to_owned()],
        }
    }
}

/// Ordered list of unique type names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeList {
    names: Vec<String>,
}

impl TypeList {
    /// Creates a list, keeping the given order. Fails if a name is repeated.
    pub fn new<I, S>(names: I) -> Result<Self, CodegenError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut result = Vec::new();
        for name in names {
            let name = name.into();
            if result.contains(&name) {
                return Err(CodegenError::DuplicateType { name });
            }
            result.push(name);
        }
        Ok(Self { names: result })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Scans a single header for type lists.
pub struct HeaderScanner {
    path: PathBuf,
    /// Header source with all comments blanked out
    code: String,
}

impl HeaderScanner {
    /// Creates a scanner from already loaded source. The path is only used in error messages.
    pub fn new(path: impl Into<PathBuf>, source: &str) -> Self {
        Self {
            path: path.into(),
            code: strip_comments(source),
        }
    }

    pub fn open(path: &Path) -> AnyResult<Self> {
        let source = fs::read_to_string(path)
            .otherwise(format_args!("reading type list header {}", path.display()))?;
        Ok(Self::new(path, &source))
    }

    /// Returns all `X(Name)` entries of `#define <macro_name>`.
    pub fn macro_list(&self, macro_name: &str) -> Result<Vec<String>, CodegenError> {
        let body = self
            .macro_body(macro_name)
            .ok_or_else(|| CodegenError::PatternNotFound {
                pattern: format!("`#define {macro_name}`"),
                path: self.path.clone(),
            })?;
        Ok(x_macro_entries(&body))
    }

    /// Returns all enumerators of `enum class <enum_name>`, in order.
    pub fn enum_body(&self, enum_name: &str) -> Result<Vec<String>, CodegenError> {
        let code = without_directives(&self.code);
        let tokens = tokenize(&code);

        let open = find_enum_open(&tokens, enum_name).ok_or_else(|| {
            CodegenError::PatternNotFound {
                pattern: format!("`enum class {enum_name}`"),
                path: self.path.clone(),
            }
        })?;
        let close = matching_brace(&tokens, open)
            .ok_or_else(|| self.malformed(enum_name, "missing closing brace"))?;

        self.enumerators(enum_name, &tokens[open + 1..close])
    }

    fn enumerators(&self, enum_name: &str, body: &[Token]) -> Result<Vec<String>, CodegenError> {
        let mut names = vec![];
        let mut tokens = body.iter().copied().peekable();

        while let Some(token) = tokens.next() {
            let Token::Ident(name) = token else {
                return Err(self.malformed(enum_name, format!("unexpected `{token}`")));
            };

            match tokens.peek() {
                Some(Token::Punct(',')) => {
                    tokens.next();
                    names.push(name.to_owned());
                }
                Some(Token::Punct('=')) => {
                    names.push(name.to_owned());
                    skip_initializer(&mut tokens);
                }
                // Last enumerator, without a trailing comma. Could also be a list macro.
                None => match self.macro_body(name) {
                    Some(list) => names.extend(x_macro_entries(&list)),
                    None => names.push(name.to_owned()),
                },
                // An X-macro expansion isn't followed by a comma
                Some(Token::Ident(_)) => {
                    let list = self.macro_body(name).ok_or_else(|| {
                        self.malformed(
                            enum_name,
                            format!("`{name}` is neither an enumerator nor a type list macro"),
                        )
                    })?;
                    names.extend(x_macro_entries(&list));
                }
                Some(other) => {
                    return Err(self.malformed(enum_name, format!("unexpected `{other}` after `{name}`")));
                }
            }
        }

        Ok(names)
    }

    /// Finds `#define <macro_name>` and returns its body, with line continuations joined.
    fn macro_body(&self, macro_name: &str) -> Option<String> {
        let mut lines = self.code.lines();

        while let Some(line) = lines.next() {
            let Some(rest) = define_rest(line, macro_name) else {
                continue;
            };

            let mut body = String::new();
            let mut current = rest;
            loop {
                let trimmed = current.trim_end();
                match trimmed.strip_suffix('\\') {
                    Some(continued) => {
                        body.push_str(continued);
                        body.push(' ');
                        match lines.next() {
                            Some(next) => current = next,
                            None => break,
                        }
                    }
                    None => {
                        body.push_str(trimmed);
                        break;
                    }
                }
            }
            return Some(body);
        }

        None
    }

    fn malformed(&self, enum_name: &str, reason: impl Display) -> CodegenError {
        CodegenError::MalformedEnum {
            enum_name: enum_name.to_owned(),
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

fn scan_directory(dir: &Path, extension: &str, exclude: Option<&Path>) -> AnyResult<Vec<String>> {
    let mut names = vec![];

    let entries =
        fs::read_dir(dir).otherwise(format_args!("reading directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension() != Some(OsStr::new(extension)) {
            continue;
        }
        if exclude.map_or(false, |excluded| is_same_file(&path, excluded)) {
            continue;
        }

        match path.file_stem().and_then(OsStr::to_str) {
            Some(stem) => names.push(stem.to_owned()),
            None => warn!("Skipping {} (file name isn't valid UTF-8)", path.display()),
        }
    }

    // `read_dir` order is platform dependent
    names.sort();
    Ok(names)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// If `line` is `#define <name>...`, returns everything after the macro name and its parameter
/// list (for function-like macros).
fn define_rest<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line
        .trim_start()
        .strip_prefix('#')?
        .trim_start()
        .strip_prefix("define")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let rest = rest.trim_start().strip_prefix(name)?;
    if rest.starts_with(is_ident_char) {
        return None;
    }

    match rest.strip_prefix('(') {
        Some(params) => params.find(')').map(|end| &params[end + 1..]),
        None => Some(rest),
    }
}

fn x_macro_entries(body: &str) -> Vec<String> {
    tokenize(body)
        .windows(4)
        .filter_map(|window| match window {
            [
                Token::Ident(ENTRY_MACRO),
                Token::Punct('('),
                Token::Ident(name),
                Token::Punct(')'),
            ] => Some((*name).to_owned()),
            _ => None,
        })
        .collect()
}

/// Replaces comments with whitespace, keeping line breaks intact.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                while chars.next_if(|&next| next != '\n').is_some() {}
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push(' ');
                let mut last = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if last == '*' && next == '/' {
                        break;
                    }
                    last = next;
                }
            }
            '"' | '\'' => {
                out.push(c);
                let mut escaped = false;
                for next in chars.by_ref() {
                    out.push(next);
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == c || next == '\n' {
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Blanks out preprocessor directives, including their continuation lines.
fn without_directives(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut continued = false;

    for line in code.lines() {
        if continued || line.trim_start().starts_with('#') {
            continued = line.trim_end().ends_with('\\');
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Number(&'a str),
    Punct(char),
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(text) | Token::Number(text) => write!(f, "{text}"),
            Token::Punct(c) => write!(f, "{c}"),
        }
    }
}

/// Splits code into identifiers, numbers and punctuation. String and character literals are
/// dropped, as nothing we look for can be inside of them.
fn tokenize(code: &str) -> Vec<Token<'_>> {
    let mut tokens = vec![];
    let mut chars = code.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        if is_ident_char(c) {
            let mut end = start + c.len_utf8();
            while let Some((i, next)) = chars.next_if(|&(_, next)| is_ident_char(next)) {
                end = i + next.len_utf8();
            }

            let text = &code[start..end];
            tokens.push(if c.is_ascii_digit() {
                Token::Number(text)
            } else {
                Token::Ident(text)
            });
        } else if c == '"' || c == '\'' {
            let mut escaped = false;
            for (_, next) in chars.by_ref() {
                if escaped {
                    escaped = false;
                } else if next == '\\' {
                    escaped = true;
                } else if next == c {
                    break;
                }
            }
        } else {
            tokens.push(Token::Punct(c));
        }
    }

    tokens
}

/// Returns the index of the opening brace of `enum [class|struct] <enum_name>`. Forward
/// declarations are skipped.
fn find_enum_open(tokens: &[Token], enum_name: &str) -> Option<usize> {
    for (i, token) in tokens.iter().enumerate() {
        if *token != Token::Ident("enum") {
            continue;
        }

        let mut name_at = i + 1;
        if matches!(tokens.get(name_at), Some(Token::Ident("class" | "struct"))) {
            name_at += 1;
        }
        if !matches!(tokens.get(name_at), Some(Token::Ident(name)) if *name == enum_name) {
            continue;
        }

        // Anything between the name and the brace is the underlying type
        for (j, token) in tokens.iter().enumerate().skip(name_at + 1) {
            match token {
                Token::Punct('{') => return Some(j),
                Token::Punct(';') => break,
                _ => {}
            }
        }
    }
    None
}

fn matching_brace(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::Punct('{') => depth += 1,
            Token::Punct('}') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Consumes an enumerator initializer (`= ...`) along with the comma ending it.
fn skip_initializer<'a>(tokens: &mut impl Iterator<Item = Token<'a>>) {
    let mut depth = 0usize;
    for token in tokens {
        match token {
            Token::Punct('(' | '[' | '{') => depth += 1,
            Token::Punct(')' | ']' | '}') => depth = depth.saturating_sub(1),
            Token::Punct(',') if depth == 0 => break,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPONENT_TYPE_HPP: &str = r#"
#ifndef __COMPONENT_TYPE_HPP_
#define __COMPONENT_TYPE_HPP_

// X-Macro for components
#define COMPONENT_TYPE_LIST \
    X(Oscillator) \
    X(PolyOscillator) \
    X(BiquadFilter) \
    X(LinearFader) \
    X(ADSREnvelope) \

/**
 * @brief enumeration of component kinds
 */
enum class ComponentType {
    #define X(name) \
        name,
    COMPONENT_TYPE_LIST
    #undef X
    Unknown,
    N_COMPONENTS
};

constexpr int N_COMPONENT_TYPES = static_cast<int>(ComponentType::N_COMPONENTS) - 1 ;

#endif // __COMPONENT_TYPE_HPP_
"#;

    const EXPECTED: [&str; 5] = [
        "Oscillator",
        "PolyOscillator",
        "BiquadFilter",
        "LinearFader",
        "ADSREnvelope",
    ];

    fn scanner(source: &str) -> HeaderScanner {
        HeaderScanner::new("ComponentType.hpp", source)
    }

    #[test]
    fn reads_macro_list_in_order() {
        let names = scanner(COMPONENT_TYPE_HPP)
            .macro_list(DEFAULT_LIST_MACRO)
            .unwrap();
        assert_eq!(names, EXPECTED);
    }

    #[test]
    fn enum_expands_the_macro_list() {
        let names = scanner(COMPONENT_TYPE_HPP)
            .enum_body("ComponentType")
            .unwrap();

        let mut expected = EXPECTED.to_vec();
        expected.extend(["Unknown", "N_COMPONENTS"]);
        assert_eq!(names, expected);

        let list = TypeList::new(names.into_iter().filter(|n| !Sentinels::default().matches(n)))
            .unwrap();
        assert_eq!(list.names(), EXPECTED);
    }

    #[test]
    fn plain_enum_with_initializers_and_comments() {
        let source = r#"
            enum class ModuleType; // forward declaration

            enum class ModuleType : uint8_t {
                Oscillator = 0,     // the classic
                /* PolyOscillator = 1, */
                Mixer = make_id(2, 3),
                Unknown,
                N_MODULES
            };
        "#;

        let names = scanner(source).enum_body("ModuleType").unwrap();
        assert_eq!(names, ["Oscillator", "Mixer", "Unknown", "N_MODULES"]);
    }

    #[test]
    fn function_like_list_macro() {
        let source = "#define FILTERS(X) X(LowPass) X(HighPass) \\\n    X(BandPass)\n";
        let names = scanner(source).macro_list("FILTERS").unwrap();
        assert_eq!(names, ["LowPass", "HighPass", "BandPass"]);
    }

    #[test]
    fn entries_need_a_closing_paren() {
        let source = "#define COMPONENT_TYPE_LIST X(Delay) X(Gain, X(Multiply)\n";
        let names = scanner(source).macro_list(DEFAULT_LIST_MACRO).unwrap();
        assert_eq!(names, ["Delay", "Multiply"]);
    }

    #[test]
    fn longer_macro_names_dont_match() {
        let source = "#define COMPONENT_TYPE_LIST_OLD X(Stale)\n";
        let err = scanner(source).macro_list(DEFAULT_LIST_MACRO).unwrap_err();
        assert!(matches!(err, CodegenError::PatternNotFound { .. }));
    }

    #[test]
    fn missing_enum_is_reported() {
        let err = scanner(COMPONENT_TYPE_HPP)
            .enum_body("ModulatorType")
            .unwrap_err();
        assert!(matches!(err, CodegenError::PatternNotFound { .. }));
        assert!(err.to_string().contains("ModulatorType"));
    }

    #[test]
    fn unknown_bare_identifier_is_malformed() {
        let source = "enum class Broken { NOT_A_LIST Oscillator, };";
        let err = scanner(source).enum_body("Broken").unwrap_err();
        assert!(matches!(err, CodegenError::MalformedEnum { .. }));
    }

    #[test]
    fn unterminated_enum_is_malformed() {
        let err = scanner("enum class Open { A, B,").enum_body("Open").unwrap_err();
        assert!(matches!(err, CodegenError::MalformedEnum { .. }));
    }

    #[test]
    fn duplicates_are_rejected() {
        let err = TypeList::new(["Delay", "Multiply", "Delay"]).unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateType { name } if name == "Delay"));
    }

    #[test]
    fn sentinel_matching() {
        let sentinels = Sentinels::default();
        assert!(sentinels.matches("Unknown"));
        assert!(sentinels.matches("N_COMPONENTS"));
        assert!(!sentinels.matches("Oscillator"));
        assert!(!sentinels.matches("UnknownFilter"));
        assert!(!Sentinels::none().matches("Unknown"));
    }
}
