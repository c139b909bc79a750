#![allow(dead_code)]

use std::{fs, path::Path};

pub const COMPONENT_TYPES: [&str; 4] = ["Oscillator", "BiquadFilter", "ADSREnvelope", "Delay"];

pub const TYPE_LIST_HEADER: &str = r#"#ifndef __COMPONENT_TYPE_HPP_
#define __COMPONENT_TYPE_HPP_

// X-Macro for components
#define COMPONENT_TYPE_LIST \
    X(Oscillator) \
    X(BiquadFilter) \
    X(ADSREnvelope) \
    X(Delay) \

enum class ComponentType {
    #define X(name) \
        name,
    COMPONENT_TYPE_LIST
    #undef X
    Unknown,
    N_COMPONENTS
};

#endif // __COMPONENT_TYPE_HPP_
"#;

pub const CONFIGS_TEMPLATE: &str = "#ifndef __HPP_COMPONENT_CONFIG_\n#define __HPP_COMPONENT_CONFIG_\n\n@INCLUDES@\n\n#endif // __HPP_COMPONENT_CONFIG_\n";

pub const COMPONENTS_TEMPLATE: &str = "#ifndef __HPP_ALL_COMPONENTS_\n#define __HPP_ALL_COMPONENTS_\n\n@INCLUDES@\n\n#endif // __HPP_ALL_COMPONENTS_\n";

pub fn write(path: impl AsRef<Path>, contents: &str) {
    let path = path.as_ref();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Lays out a miniature Apollo source tree: the type list, both templates, and a header for
/// every component type.
pub fn project(root: &Path) {
    write(root.join("shared/types/ComponentType.hpp"), TYPE_LIST_HEADER);
    write(
        root.join("synth/src/configs/ComponentConfig.hpp.in"),
        CONFIGS_TEMPLATE,
    );
    write(
        root.join("synth/src/components/Components.hpp.in"),
        COMPONENTS_TEMPLATE,
    );

    for name in COMPONENT_TYPES {
        write(
            root.join(format!("synth/src/components/{name}.hpp")),
            "#pragma once\n",
        );
        write(
            root.join(format!("synth/src/configs/{name}Config.hpp")),
            "#pragma once\n",
        );
    }
}

pub fn expected_configs() -> String {
    let includes: Vec<_> = COMPONENT_TYPES
        .iter()
        .map(|name| format!("#include \"configs/{name}Config.hpp\""))
        .collect();
    CONFIGS_TEMPLATE.replace("@INCLUDES@", &includes.join("\n"))
}
