use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let result = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("TUNESHARE_H")
        .with_cpp_compat(true)
        .generate();
    match result {
        Ok(bindings) => {
            bindings.write_to_file(crate_dir.join("include").join("tuneshare.h"));
        }
        Err(err) => println!("cargo:warning=skipping C header generation: {err}"),
    }
}
