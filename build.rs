use std::env;
use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=ucd");

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    let tables = ucd_table_gen::generate(Path::new("ucd"))
        .unwrap_or_else(|err| panic!("failed to generate Unicode tables: {err}"));
    tables
        .write_to(&out_dir)
        .unwrap_or_else(|err| panic!("failed to write Unicode tables: {err}"));
}
