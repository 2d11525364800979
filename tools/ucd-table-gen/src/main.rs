// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::PathBuf;

use anyhow::{bail, Context};

const HELP: &str = "\
Usage: ucd-table-gen [options...] <ucd-directory>
  -h, --help            Prints help information
  --out=<dir>           Output directory for the table files (default: .)

Reads UnicodeData.txt, CaseFolding.txt, DerivedEastAsianWidth.txt,
DerivedCoreProperties.txt, DerivedNormalizationProps.txt,
extracted/DerivedCombiningClass.txt, auxiliary/GraphemeBreakProperty.txt and
emoji/emoji-data.txt from the given directory and writes gbp.bin, ccc.bin,
dwp.bin, fold.bin and norm.bin.
";

fn main() -> anyhow::Result<()> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        eprint!("{HELP}");
        return Ok(());
    }

    let out_dir: PathBuf =
        args.opt_value_from_str("--out")?.unwrap_or_else(|| PathBuf::from("."));
    let ucd_dir: PathBuf =
        args.free_from_os_str(|s| -> Result<PathBuf, &'static str> { Ok(s.into()) })?;
    let remaining = args.finish();
    if !remaining.is_empty() {
        bail!("unrecognized arguments: {:?}", remaining);
    }

    let tables = ucd_table_gen::generate(&ucd_dir)
        .with_context(|| format!("failed to generate tables from {}", ucd_dir.display()))?;
    tables
        .write_to(&out_dir)
        .with_context(|| format!("failed to write tables to {}", out_dir.display()))?;

    let mut total = 0;
    for (name, bytes) in tables.families() {
        eprintln!("{name}: {} bytes", bytes.len());
        total += bytes.len();
    }
    eprintln!("total: {total} bytes");
    Ok(())
}
