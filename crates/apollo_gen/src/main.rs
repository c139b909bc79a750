use apollo_utils::{ok, AnyResult};
use clap::Parser;

fn main() -> AnyResult {
    let cli = apollo_gen::Cli::parse_from(wild::args());
    apollo_gen::init_logging(cli.verbose);
    apollo_gen::run(cli)?;
    ok()
}
