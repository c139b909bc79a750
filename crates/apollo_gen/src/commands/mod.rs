pub mod build;
pub mod check;
pub mod list;
pub mod preset;

use crate::codegen::{CheckOutcome, GeneratorSpec};
use apollo_utils::AnyResult;
use log::{info, warn};

/// Checks the given generators, logging every header that needs regenerating. Returns the names
/// of the stale (or missing) ones.
pub(crate) fn check_all<'a>(
    generators: impl IntoIterator<Item = &'a GeneratorSpec>,
) -> AnyResult<Vec<String>> {
    let mut outdated = vec![];

    for spec in generators {
        let (rendered, outcome) = crate::codegen::check(spec)?;
        match outcome {
            CheckOutcome::UpToDate => info!("{}: up to date", rendered.output.display()),
            CheckOutcome::Stale => {
                warn!("{}: out of date", rendered.output.display());
                outdated.push(rendered.name);
            }
            CheckOutcome::Missing => {
                warn!("{}: not generated yet", rendered.output.display());
                outdated.push(rendered.name);
            }
        }
    }

    Ok(outdated)
}
