// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Full case folding (CaseFolding.txt statuses C and F).

use crate::tables;
use crate::utf8::code_points;

/// Applies the full case fold to every code point. Each input code point
/// maps to 1..=3 output code points; the result is not normalized.
pub fn case_fold(bytes: &[u8]) -> String {
    let mut out = String::new();
    case_fold_into(bytes, &mut out);
    out
}

/// Like [`case_fold`], but reuses `out` (cleared first).
pub fn case_fold_into(bytes: &[u8], out: &mut String) {
    out.clear();
    out.reserve(bytes.len());

    // The ASCII rows of CaseFolding.txt are exactly A-Z -> a-z.
    if bytes.is_ascii() {
        for &b in bytes {
            out.push(b.to_ascii_lowercase() as char);
        }
        return;
    }

    for r in code_points(bytes) {
        push_fold(r.code, |c| out.push(c));
    }
}

/// Folds a code point sequence, appending to `out`. Used by the caseless
/// matchers between normalization passes.
pub(crate) fn fold_chars(input: &[char], out: &mut Vec<char>) {
    for &c in input {
        push_fold(c, |c| out.push(c));
    }
}

#[inline]
fn push_fold(c: char, mut push: impl FnMut(char)) {
    if c.is_ascii() {
        push(c.to_ascii_lowercase());
    } else {
        match tables::full_fold(c) {
            Some(mapping) => mapping.iter().copied().for_each(&mut push),
            None => push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii() {
        assert_eq!(case_fold(b"Hello, WORLD!"), "hello, world!");
    }

    #[test]
    fn test_expansion() {
        assert_eq!(case_fold("Stra\u{00DF}e".as_bytes()), "strasse");
        assert_eq!(case_fold("\u{0390}".as_bytes()), "\u{03B9}\u{0308}\u{0301}");
        assert_eq!(case_fold("\u{FB03}".as_bytes()), "ffi");
    }

    #[test]
    fn test_non_turkic() {
        // The Turkic (T) rows are ignored: dotted capital I folds with a
        // combining dot, plain I folds to i.
        assert_eq!(case_fold("I".as_bytes()), "i");
        assert_eq!(case_fold("\u{0130}".as_bytes()), "i\u{0307}");
    }

    #[test]
    fn test_idempotent() {
        for s in ["MASSE", "\u{0390}\u{03B0}", "İstanbul", "ΣΊΣΥΦΟΣ"] {
            let once = case_fold(s.as_bytes());
            assert_eq!(case_fold(once.as_bytes()), once);
        }
    }
}
