// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fs;
use std::path::Path;

/// Reads a fixture from `tests/data/`.
pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("{}: {err}", path.display()))
}

/// Parses a whitespace-separated list of hex code points into a string.
pub fn parse_cps(field: &str) -> String {
    field
        .split_whitespace()
        .map(|t| {
            let cp = u32::from_str_radix(t, 16)
                .unwrap_or_else(|_| panic!("bad code point {t:?}"));
            char::from_u32(cp).unwrap_or_else(|| panic!("non-scalar code point {t:?}"))
        })
        .collect()
}

/// Yields the data lines of a fixture (comments and part markers stripped).
pub fn data_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty() && !line.starts_with('@'))
}
