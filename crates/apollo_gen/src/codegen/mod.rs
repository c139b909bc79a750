//! Aggregate header generation
//!
//! Every generator runs the same pipeline: the type list is read from its [`TypeSource`], turned
//! into an include block, substituted into the [`Template`], and written next to it.
//!
//! Nothing is written until everything else succeeded, so a broken type list or template leaves
//! the previously generated header in place.

use anyhow::Context;
use apollo_utils::{normalize_line_endings, AnyResult, AnyhowResultExt};
use log::{debug, warn};
use std::{fs, io, path::PathBuf};

mod error;
pub use error::*;
mod includes;
pub use includes::*;
mod spec;
pub use spec::*;
mod template;
pub use template::*;
mod type_list;
pub use type_list::*;

/// Result of running a generator, before anything's written.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub name: String,
    pub output: PathBuf,
    pub types: TypeList,
    pub contents: String,
}

/// How an existing generated header compares to what would be generated now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    UpToDate,
    Stale,
    Missing,
}

/// Runs the generator in memory.
pub fn render(spec: &GeneratorSpec) -> AnyResult<Rendered> {
    spec.validate()?;
    let output = spec.output_path()?;
    let style = spec.include_style();

    let types = spec
        .source
        .extract(&spec.sentinel_filter(), Some(&output))
        .with_context(|| format!("generator `{}` couldn't read its type list", spec.name))?;
    verify_headers(spec, &style, &types)?;

    let template = Template::open(&spec.template)?;
    debug!(
        "{}: filling {} with {} includes",
        spec.name,
        template.path().display(),
        types.len()
    );
    let contents = template.render(&include_block(&types, &style));

    Ok(Rendered {
        name: spec.name.clone(),
        output,
        types,
        contents,
    })
}

/// Runs the generator and writes its output, overwriting any previous one.
pub fn materialize(spec: &GeneratorSpec) -> AnyResult<Rendered> {
    let rendered = render(spec)?;
    write_output(&rendered.output, &rendered.contents)?;
    Ok(rendered)
}

/// Runs the generator in memory and compares the result with the header on disk.
pub fn check(spec: &GeneratorSpec) -> AnyResult<(Rendered, CheckOutcome)> {
    let rendered = render(spec)?;

    let outcome = match fs::read_to_string(&rendered.output) {
        Ok(existing) => {
            if normalize_line_endings(&existing) == normalize_line_endings(&rendered.contents) {
                CheckOutcome::UpToDate
            } else {
                CheckOutcome::Stale
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => CheckOutcome::Missing,
        Err(err) => {
            return Err(err).otherwise(format_args!("reading {}", rendered.output.display()))
        }
    };

    debug!("{}: {outcome:?}", rendered.output.display());
    Ok((rendered, outcome))
}

fn verify_headers(spec: &GeneratorSpec, style: &IncludeStyle, types: &TypeList) -> AnyResult {
    let Some(root) = &spec.headers_root else {
        return Ok(());
    };

    for name in types.iter() {
        let path = root.join(style.header_path(name));
        if path.is_file() {
            continue;
        }

        if spec.require_headers {
            return Err(CodegenError::MissingHeader {
                name: name.to_owned(),
                path,
            }
            .into());
        }
        warn!(
            "{}: header {} for type `{name}` doesn't exist",
            spec.name,
            path.display()
        );
    }

    Ok(())
}
