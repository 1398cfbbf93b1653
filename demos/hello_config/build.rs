//! Generates the configuration loader from the annotated types in
//! `src/config`.

use layerconf_codegen::Generator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::env::var("OUT_DIR")?;
    let report = Generator::new("src/config")
        .type_root("crate::config")
        .output(format!("{out_dir}/config_loader.rs"))
        .generate()?;
    emit_rerun_directives(&report.inputs);
    Ok(())
}

#[expect(
    clippy::print_stdout,
    reason = "cargo reads build script directives from stdout"
)]
fn emit_rerun_directives(inputs: &[camino::Utf8PathBuf]) {
    println!("cargo::rerun-if-changed=src/config");
    for input in inputs {
        println!("cargo::rerun-if-changed={input}");
    }
}
