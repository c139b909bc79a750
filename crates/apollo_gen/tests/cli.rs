mod common;

use apollo_gen::{codegen::CodegenError, run, Cli};
use clap::Parser;
use common::*;
use std::{fs, path::Path};

const SPEC: &str = r#"
[[generator]]
name = "configs"
template = "synth/src/configs/ComponentConfig.hpp.in"
include_prefix = "configs"
include_pattern = "{name}Config.hpp"
headers_root = "synth/src"
require_headers = true

[generator.source]
kind = "macro_list"
path = "shared/types/ComponentType.hpp"

[[generator]]
name = "components"
template = "synth/src/components/Components.hpp.in"
include_prefix = "components"
include_pattern = "{name}.hpp"

[generator.source]
kind = "enum"
path = "shared/types/ComponentType.hpp"
enum_name = "ComponentType"
"#;

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("apollo_gen").chain(args.iter().copied()))
}

fn spec_path(root: &Path) -> String {
    let path = root.join("codegen.toml");
    fs::write(&path, SPEC).unwrap();
    path.to_str().unwrap().to_owned()
}

#[test]
fn build_generates_every_header() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let spec = spec_path(tmp.path());

    run(cli(&["build", &spec])).unwrap();

    let configs = fs::read_to_string(tmp.path().join("synth/src/configs/ComponentConfig.hpp")).unwrap();
    assert_eq!(configs, expected_configs());
    assert!(tmp.path().join("synth/src/components/Components.hpp").is_file());
}

#[test]
fn build_only_runs_selected_generators() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let spec = spec_path(tmp.path());

    run(cli(&["build", &spec, "--only", "components"])).unwrap();

    assert!(tmp.path().join("synth/src/components/Components.hpp").is_file());
    assert!(!tmp.path().join("synth/src/configs/ComponentConfig.hpp").exists());

    let err = run(cli(&["build", &spec, "--only", "modules"])).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CodegenError>(),
        Some(CodegenError::UnknownGenerator { .. })
    ));
}

#[test]
fn build_accepts_an_empty_type_list() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    write(
        tmp.path().join("shared/types/ComponentType.hpp"),
        "enum class ComponentType {\n    Unknown,\n    N_COMPONENTS\n};\n",
    );
    let spec = spec_path(tmp.path());

    run(cli(&["build", &spec, "--only", "components"])).unwrap();

    let components =
        fs::read_to_string(tmp.path().join("synth/src/components/Components.hpp")).unwrap();
    assert_eq!(components, COMPONENTS_TEMPLATE.replace("@INCLUDES@", ""));
}

#[test]
fn check_fails_until_built() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let spec = spec_path(tmp.path());

    let err = run(cli(&["check", &spec])).unwrap_err();
    match err.downcast_ref::<CodegenError>() {
        Some(CodegenError::OutOfDate { names }) => assert_eq!(names, &["configs", "components"]),
        other => panic!("unexpected result: {other:?}"),
    }

    run(cli(&["build", &spec])).unwrap();
    run(cli(&["check", &spec])).unwrap();
}

#[test]
fn list_reads_without_writing() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let spec = spec_path(tmp.path());

    run(cli(&["-v", "list", &spec])).unwrap();
    assert!(!tmp.path().join("synth/src/configs/ComponentConfig.hpp").exists());
}

#[test]
fn preset_runs_against_a_root() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let root = tmp.path().to_str().unwrap();

    assert!(run(cli(&["preset", "configs", "--root", root, "--check"])).is_err());
    run(cli(&["preset", "configs", "--root", root])).unwrap();
    run(cli(&["preset", "configs", "--root", root, "--check"])).unwrap();
}
