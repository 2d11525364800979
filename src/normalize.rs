// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The four Unicode normalization forms.
//!
//! Decompositions are table lookups (the tables already store the fully
//! recursive mapping); Hangul syllables decompose and recompose
//! algorithmically. Composition walks the decomposed sequence once, combining
//! each character with the last starter unless a blocking non-starter
//! intervenes. Quick-check flags let already-normalized input pass through as
//! a plain copy.

use crate::tables::{self, QuickCheck};
use crate::utf8::code_points;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Form {
    Nfd,
    Nfc,
    Nfkd,
    Nfkc,
}

impl Form {
    fn compat(self) -> bool {
        matches!(self, Form::Nfkd | Form::Nfkc)
    }

    fn composing(self) -> bool {
        matches!(self, Form::Nfc | Form::Nfkc)
    }
}

pub fn nfd(bytes: &[u8]) -> String {
    normalize(Form::Nfd, bytes)
}

pub fn nfc(bytes: &[u8]) -> String {
    normalize(Form::Nfc, bytes)
}

pub fn nfkd(bytes: &[u8]) -> String {
    normalize(Form::Nfkd, bytes)
}

pub fn nfkc(bytes: &[u8]) -> String {
    normalize(Form::Nfkc, bytes)
}

/// Normalizes `bytes` into a fresh string. Ill-formed input follows the
/// U+FFFD policy of [`code_points`].
pub fn normalize(form: Form, bytes: &[u8]) -> String {
    let mut out = String::new();
    normalize_into(form, bytes, &mut out);
    out
}

/// Like [`normalize`], but reuses `out` (cleared first) so repeated calls can
/// amortise the allocation.
pub fn normalize_into(form: Form, bytes: &[u8], out: &mut String) {
    out.clear();

    // Everything at or below U+007F is inert under all four forms.
    if bytes.is_ascii() {
        // SAFETY: ASCII is valid UTF-8.
        out.push_str(unsafe { std::str::from_utf8_unchecked(bytes) });
        return;
    }

    out.reserve(bytes.len());

    // Quick check while decoding: if every code point answers Yes and the
    // combining classes never fall back, the input already is normalized and
    // the decoded copy can be returned as-is.
    let mut chars: Vec<char> = Vec::with_capacity(bytes.len() / 2);
    let mut normalized = true;
    let mut last_ccc = 0u8;
    for r in code_points(bytes) {
        let c = r.code;
        chars.push(c);
        if normalized {
            let ccc = tables::combining_class(c);
            if ccc != 0 && last_ccc > ccc {
                normalized = false;
            } else if !quick_check_yes(form, c) {
                normalized = false;
            }
            last_ccc = ccc;
        }
    }
    if normalized {
        out.extend(&chars);
        return;
    }

    let mut buf = Vec::with_capacity(chars.len() * 2);
    decompose_chars(&chars, form.compat(), &mut buf);
    if form.composing() {
        compose_chars(&mut buf);
    }
    out.extend(&buf);
}

fn quick_check_yes(form: Form, c: char) -> bool {
    match form {
        Form::Nfd => !is_hangul_syllable(c) && tables::canonical_decomposition(c).is_none(),
        Form::Nfkd => !is_hangul_syllable(c) && tables::compatibility_decomposition(c).is_none(),
        Form::Nfc => tables::nfc_quick_check(c) == QuickCheck::Yes,
        Form::Nfkc => tables::nfkc_quick_check(c) == QuickCheck::Yes,
    }
}

/// Appends the canonical (or compatibility) decomposition of `input` to
/// `out` and canonically reorders the appended range.
pub(crate) fn decompose_chars(input: &[char], compat: bool, out: &mut Vec<char>) {
    let start = out.len();
    for &c in input {
        if is_hangul_syllable(c) {
            decompose_hangul(c, out);
            continue;
        }
        let mapping = if compat {
            tables::compatibility_decomposition(c)
        } else {
            tables::canonical_decomposition(c)
        };
        match mapping {
            Some(seq) => out.extend_from_slice(seq),
            None => out.push(c),
        }
    }
    canonical_reorder(&mut out[start..]);
}

/// Canonical ordering: within every maximal run of non-starters, sort by
/// combining class, ascending and stable. Runs are a handful of marks, so a
/// simple insertion sort beats anything clever.
fn canonical_reorder(buf: &mut [char]) {
    let mut i = 0;
    while i < buf.len() {
        if tables::combining_class(buf[i]) == 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < buf.len() && tables::combining_class(buf[i]) != 0 {
            i += 1;
        }
        let run = &mut buf[start..i];
        for a in 1..run.len() {
            let mut b = a;
            while b > 0
                && tables::combining_class(run[b - 1]) > tables::combining_class(run[b])
            {
                run.swap(b - 1, b);
                b -= 1;
            }
        }
    }
}

/// Recomposes a canonically ordered, fully decomposed sequence in place.
///
/// A character combines with the last starter unless an earlier non-starter
/// with equal or greater combining class blocks it. Exclusions, singletons
/// and non-starter decompositions never made it into the pair table, so they
/// stay decomposed without extra checks here.
pub(crate) fn compose_chars(buf: &mut Vec<char>) {
    let mut write = 0;
    let mut last_starter: Option<usize> = None;
    let mut last_ccc = 0u8;

    for read in 0..buf.len() {
        let c = buf[read];
        let ccc = tables::combining_class(c);

        if let Some(s) = last_starter {
            let blocked = write != s + 1 && last_ccc >= ccc;
            if !blocked {
                if let Some(composite) = compose_pair(buf[s], c) {
                    buf[s] = composite;
                    continue;
                }
            }
        }

        if ccc == 0 {
            last_starter = Some(write);
        }
        last_ccc = ccc;
        buf[write] = c;
        write += 1;
    }

    buf.truncate(write);
}

// Hangul syllable arithmetic (Unicode chapter 3.12).
const S_BASE: u32 = 0xAC00;
const L_BASE: u32 = 0x1100;
const V_BASE: u32 = 0x1161;
const T_BASE: u32 = 0x11A7;
const L_COUNT: u32 = 19;
const V_COUNT: u32 = 21;
const T_COUNT: u32 = 28;
const N_COUNT: u32 = V_COUNT * T_COUNT;
const S_COUNT: u32 = L_COUNT * N_COUNT;

fn is_hangul_syllable(c: char) -> bool {
    (S_BASE..S_BASE + S_COUNT).contains(&(c as u32))
}

fn decompose_hangul(c: char, out: &mut Vec<char>) {
    let s = c as u32 - S_BASE;
    out.push(jamo(L_BASE + s / N_COUNT));
    out.push(jamo(V_BASE + (s % N_COUNT) / T_COUNT));
    if s % T_COUNT != 0 {
        out.push(jamo(T_BASE + s % T_COUNT));
    }
}

fn compose_pair(a: char, b: char) -> Option<char> {
    let (a, b) = (a as u32, b as u32);
    if (L_BASE..L_BASE + L_COUNT).contains(&a) && (V_BASE..V_BASE + V_COUNT).contains(&b) {
        return Some(jamo(S_BASE + ((a - L_BASE) * V_COUNT + (b - V_BASE)) * T_COUNT));
    }
    if (S_BASE..S_BASE + S_COUNT).contains(&a)
        && (a - S_BASE) % T_COUNT == 0
        && (T_BASE + 1..T_BASE + T_COUNT).contains(&b)
    {
        return Some(jamo(a + (b - T_BASE)));
    }
    tables::compose_pair(char::from_u32(a)?, char::from_u32(b)?)
}

fn jamo(cp: u32) -> char {
    debug_assert!(char::from_u32(cp).is_some());
    // SAFETY: Hangul arithmetic stays inside the AC00..D7A3 and 1100..11C2
    // blocks, far away from the surrogate range.
    unsafe { char::from_u32_unchecked(cp) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_fast_path() {
        assert_eq!(nfd(b"hello"), "hello");
        assert_eq!(nfkc(b"hello"), "hello");
    }

    #[test]
    fn test_basic_forms() {
        assert_eq!(nfd("\u{00E9}".as_bytes()), "e\u{0301}");
        assert_eq!(nfc("e\u{0301}".as_bytes()), "\u{00E9}");
        assert_eq!(nfkd("\u{FB03}".as_bytes()), "ffi");
        assert_eq!(nfkc("\u{FB03}".as_bytes()), "ffi");
        assert_eq!(nfc("\u{FB03}".as_bytes()), "\u{FB03}");
    }

    #[test]
    fn test_reordering() {
        // cedilla (202) sorts before acute (230), stably.
        assert_eq!(nfd("q\u{0301}\u{0327}".as_bytes()), "q\u{0327}\u{0301}");
        assert_eq!(nfc("q\u{0301}\u{0327}".as_bytes()), "q\u{0327}\u{0301}");
    }

    #[test]
    fn test_blocked_composition() {
        // The dot below (ccc 220) combines first; the acute then finds no
        // precomposed form and stays.
        assert_eq!(nfc("e\u{0323}\u{0301}".as_bytes()), "\u{1EB9}\u{0301}");
        // A second mark of equal class cannot jump over the first.
        assert_eq!(nfc("e\u{0301}\u{0301}".as_bytes()), "\u{00E9}\u{0301}");
        assert_eq!(nfc("e\u{0300}\u{0301}".as_bytes()), "\u{00E8}\u{0301}");
    }

    #[test]
    fn test_exclusions_stay_decomposed() {
        // U+0958 QA is a composition exclusion.
        assert_eq!(nfc("\u{0915}\u{093C}".as_bytes()), "\u{0915}\u{093C}");
        assert_eq!(nfd("\u{0958}".as_bytes()), "\u{0915}\u{093C}");
        assert_eq!(nfc("\u{0958}".as_bytes()), "\u{0915}\u{093C}");
    }

    #[test]
    fn test_singletons() {
        assert_eq!(nfc("\u{2126}".as_bytes()), "\u{03A9}"); // OHM SIGN
        assert_eq!(nfd("\u{0340}".as_bytes()), "\u{0300}");
    }

    #[test]
    fn test_hangul() {
        assert_eq!(nfd("\u{AC01}".as_bytes()), "\u{1100}\u{1161}\u{11A8}");
        assert_eq!(nfc("\u{1100}\u{1161}\u{11A8}".as_bytes()), "\u{AC01}");
        assert_eq!(nfc("\u{AC00}\u{11A8}".as_bytes()), "\u{AC01}");
        assert_eq!(nfd("\u{D7A3}".as_bytes()), "\u{1112}\u{1175}\u{11C2}");
        assert_eq!(nfc(nfd("\u{D7A3}".as_bytes()).as_bytes()), "\u{D7A3}");
    }

    #[test]
    fn test_long_s_dot() {
        // Canonical decomposition keeps the long s; only compatibility
        // folding reaches the plain s.
        assert_eq!(nfd("\u{1E9B}".as_bytes()), "\u{017F}\u{0307}");
        assert_eq!(nfkd("\u{1E9B}".as_bytes()), "s\u{0307}");
    }

    #[test]
    fn test_normalize_into_reuse() {
        let mut out = String::new();
        normalize_into(Form::Nfd, "\u{00E9}".as_bytes(), &mut out);
        assert_eq!(out, "e\u{0301}");
        normalize_into(Form::Nfc, out.clone().as_bytes(), &mut out);
        assert_eq!(out, "\u{00E9}");
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(nfc(&[0x61, 0xFF, 0x62]), "a\u{FFFD}b");
    }
}
