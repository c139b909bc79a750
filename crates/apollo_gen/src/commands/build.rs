use crate::codegen::{materialize, SpecFile};
use apollo_utils::{ok, AnyResult};
use clap::Args;
use log::{info, warn};
use std::path::PathBuf;

#[derive(Args)]
pub struct BuildCommand {
    /// Specification file to use
    pub specification: PathBuf,
    /// Only runs the named generators (can be repeated)
    #[arg(long)]
    pub only: Vec<String>,
}

impl crate::Command for BuildCommand {
    fn run(self) -> AnyResult {
        let spec = SpecFile::load(&self.specification)?;

        for generator in spec.select(&self.only)? {
            info!("Running generator `{}`...", generator.name);
            let rendered = materialize(generator)?;
            if rendered.types.is_empty() {
                warn!("  - no types found, the header includes nothing");
            } else {
                info!("  - {} types included", rendered.types.len());
            }
        }

        ok()
    }
}
