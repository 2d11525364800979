// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod common;

use unicore::{canon_caseless_match, case_fold, compat_caseless_match};

#[test]
fn fixture_cases() {
    let data = common::fixture("caseless_cases.txt");
    let mut checked = 0usize;
    for line in common::data_lines(&data) {
        let fields: Vec<&str> = line.split(';').collect();
        assert_eq!(fields.len(), 4, "bad line: {line}");
        let a = common::parse_cps(fields[0]);
        let b = common::parse_cps(fields[1]);
        let canon = fields[2] == "1";
        let compat = fields[3] == "1";
        assert_eq!(canon_caseless_match(a.as_bytes(), b.as_bytes()), canon, "canon {line}");
        assert_eq!(compat_caseless_match(a.as_bytes(), b.as_bytes()), compat, "compat {line}");
        // Matching is symmetric.
        assert_eq!(canon_caseless_match(b.as_bytes(), a.as_bytes()), canon, "canon sym {line}");
        assert_eq!(compat_caseless_match(b.as_bytes(), a.as_bytes()), compat, "compat sym {line}");
        checked += 1;
    }
    assert!(checked > 300);
}

#[test]
fn reflexive() {
    for s in ["", "hello", "Ω\u{0301}ﬃ", "👨‍👩‍👧‍👧", "각"] {
        assert!(canon_caseless_match(s.as_bytes(), s.as_bytes()));
        assert!(compat_caseless_match(s.as_bytes(), s.as_bytes()));
    }
}

#[test]
fn fold_idempotent_over_all_code_points() {
    // fold(fold(x)) == fold(x) for every scalar value.
    let mut buf = [0u8; 4];
    for cp in 0..=0x10FFFFu32 {
        let Some(c) = char::from_u32(cp) else { continue };
        let s = c.encode_utf8(&mut buf);
        let once = case_fold(s.as_bytes());
        assert_eq!(case_fold(once.as_bytes()), once, "U+{cp:04X}");
    }
}
