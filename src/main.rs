//! Command-line driver for the GUIslice code generator.

fn main() {
    if let Err(error) = guislice_codegen::cli::run_from_env() {
        eprintln!("Code Generation Failed: {error:#}");
        std::process::exit(1);
    }
}
