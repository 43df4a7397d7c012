// Licensed under the Apache-2.0 license

//! Build script for registers-generated-svd
//! Runs the generator over `demo.svd` and writes the accessors to `OUT_DIR`.

use std::env;
use std::path::PathBuf;

use mcu_registers_svd_generator::{generate_from_file, GeneratorConfig};

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let svd = manifest_dir.join("demo.svd");
    println!("cargo:rerun-if-changed={}", svd.display());

    // Both styles and the embedded runtime library.
    let code = generate_from_file(&svd, &GeneratorConfig::new())
        .unwrap_or_else(|err| panic!("failed to generate {}: {err:#}", svd.display()));
    std::fs::write(out_dir.join("demo.rs"), code).unwrap();
}
