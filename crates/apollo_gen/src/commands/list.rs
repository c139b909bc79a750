use crate::codegen::SpecFile;
use apollo_utils::{ok, AnyResult};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ListCommand {
    /// Specification file to use
    pub specification: PathBuf,
    /// Only lists types of the named generators (can be repeated)
    #[arg(long)]
    pub only: Vec<String>,
}

impl crate::Command for ListCommand {
    fn run(self) -> AnyResult {
        let spec = SpecFile::load(&self.specification)?;

        for generator in spec.select(&self.only)? {
            let output = generator.output_path()?;
            let types = generator.source.extract(&generator.sentinel_filter(), Some(&output))?;

            println!("{} ({}):", generator.name, generator.source.path().display());
            for name in types.iter() {
                println!("  - {name}");
            }
        }

        ok()
    }
}
