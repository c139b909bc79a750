use crate::codegen::{materialize, CodegenError, Preset};
use apollo_utils::{ok, AnyResult};
use clap::Args;
use log::{info, warn};
use std::path::PathBuf;

#[derive(Args)]
pub struct PresetCommand {
    /// Which of the engine's headers to generate
    #[arg(value_enum)]
    pub preset: Preset,
    /// Root of the Apollo source tree
    #[arg(long, short = 'r', default_value = ".")]
    pub root: PathBuf,
    /// Only verifies the header is up to date
    #[arg(long)]
    pub check: bool,
}

impl crate::Command for PresetCommand {
    fn run(self) -> AnyResult {
        let spec = self.preset.spec(&self.root)?;

        if self.check {
            let outdated = super::check_all([&spec])?;
            if !outdated.is_empty() {
                return Err(CodegenError::OutOfDate { names: outdated }.into());
            }
        } else {
            info!("Running preset `{}`...", spec.name);
            let rendered = materialize(&spec)?;
            if rendered.types.is_empty() {
                warn!("  - no types found, the header includes nothing");
            } else {
                info!("  - {} types included", rendered.types.len());
            }
        }

        ok()
    }
}
