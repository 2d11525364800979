// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Unicode text processing over packed, code-generated UCD tables.
//!
//! Three coupled subsystems share the embedded property tables:
//!
//! * Extended grapheme cluster segmentation per UAX #29, including regional
//!   indicator pairing, Extended_Pictographic ZWJ sequences and Indic
//!   conjunct breaks ([`graphemes`], [`grapheme_break`]).
//! * Caseless matching per UAX #44, built from NFD/NFKD/NFC/NFKC
//!   normalization ([`normalize`]) composed with the full case fold
//!   ([`case_fold`], [`canon_caseless_match`], [`compat_caseless_match`]).
//! * Monospace display width per UAX #11 with grapheme-aware emoji and
//!   variation selector handling ([`str_width`], [`code_point_width`]).
//!
//! All operations take UTF-8 byte slices; ill-formed sequences are replaced
//! with U+FFFD by the maximal-subpart rule, so nothing here ever fails. The
//! tables are generated at build time by `ucd-table-gen` from the checked-in
//! `ucd/` snapshot, parsed once on first use and shared by all threads.

mod caseless;
mod fold;
mod graphemes;
mod normalize;
mod tables;
mod utf8;
mod width;

pub use caseless::{canon_caseless_match, compat_caseless_match};
pub use fold::{case_fold, case_fold_into};
pub use graphemes::{grapheme_break, graphemes, Grapheme, GraphemeBreakState, Graphemes};
pub use normalize::{nfc, nfd, nfkc, nfkd, normalize, normalize_into, Form};
pub use utf8::{code_points, CodePoint, CodePoints};
pub use width::{code_point_width, str_width};
