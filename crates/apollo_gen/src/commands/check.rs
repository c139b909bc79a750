use crate::codegen::{CodegenError, SpecFile};
use apollo_utils::{ok, AnyResult};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckCommand {
    /// Specification file to use
    pub specification: PathBuf,
    /// Only checks the named generators (can be repeated)
    #[arg(long)]
    pub only: Vec<String>,
}

impl crate::Command for CheckCommand {
    fn run(self) -> AnyResult {
        let spec = SpecFile::load(&self.specification)?;

        let outdated = super::check_all(spec.select(&self.only)?)?;
        if !outdated.is_empty() {
            return Err(CodegenError::OutOfDate { names: outdated }.into());
        }

        ok()
    }
}
