// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Caseless matching (UAX #44 D145/D146).

use crate::fold::fold_chars;
use crate::normalize::decompose_chars;
use crate::utf8::code_points;

/// Canonical caseless match: `NFD(fold(NFD(x)))` compared on both sides.
pub fn canon_caseless_match(a: &[u8], b: &[u8]) -> bool {
    if a == b {
        return true;
    }
    canon_key(a) == canon_key(b)
}

/// Compatibility caseless match: `NFKD(fold(NFKD(fold(NFD(x)))))`. One extra
/// fold+NFKD round reaches the fixed point for all assigned characters.
pub fn compat_caseless_match(a: &[u8], b: &[u8]) -> bool {
    if a == b {
        return true;
    }
    compat_key(a) == compat_key(b)
}

fn decode(bytes: &[u8]) -> Vec<char> {
    code_points(bytes).map(|r| r.code).collect()
}

fn canon_key(bytes: &[u8]) -> Vec<char> {
    let chars = decode(bytes);
    let mut nfd = Vec::with_capacity(chars.len() * 2);
    decompose_chars(&chars, false, &mut nfd);
    let mut folded = Vec::with_capacity(nfd.len());
    fold_chars(&nfd, &mut folded);
    nfd.clear();
    decompose_chars(&folded, false, &mut nfd);
    nfd
}

fn compat_key(bytes: &[u8]) -> Vec<char> {
    let chars = decode(bytes);
    let mut buf = Vec::with_capacity(chars.len() * 2);
    decompose_chars(&chars, false, &mut buf);
    let mut scratch = Vec::with_capacity(buf.len());
    for _ in 0..2 {
        scratch.clear();
        fold_chars(&buf, &mut scratch);
        buf.clear();
        decompose_chars(&scratch, true, &mut buf);
    }
    buf
}
