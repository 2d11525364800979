// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Parsers for the UCD text files.
//!
//! All files share the same lexical shape: `#` starts a comment, fields are
//! `;`-separated, and the first field is either a single code point or an
//! inclusive `XXXX..YYYY` range, both in hex.

use std::fs;
use std::path::Path;

use crate::{Error, CODESPACE};

/// Raw property data pulled out of a UCD directory.
///
/// Everything is stored as one flat slot per code point. That is wasteful in
/// the extreme, but it is an offline tool and the flat form is what the
/// packing stage wants anyway.
pub struct UcdData {
    /// Grapheme_Cluster_Break, as [`Gbp`] discriminants.
    pub gcb: Vec<u8>,
    /// Indic_Conjunct_Break, as [`Incb`] discriminants.
    pub incb: Vec<u8>,
    pub extended_pictographic: Vec<bool>,
    pub emoji_presentation: Vec<bool>,
    /// East_Asian_Width collapsed to a column count: 2 for W/F, 1 otherwise.
    /// Ambiguous characters are counted as narrow.
    pub ea_wide: Vec<bool>,
    /// Canonical_Combining_Class.
    pub ccc: Vec<u8>,
    /// General categories Me, Mn and Cf (rendered zero-width).
    pub gc_zero: Vec<bool>,
    /// Raw (non-recursive) decompositions from UnicodeData.txt field 5.
    pub decomp: Vec<Option<Decomposition>>,
    /// Full_Composition_Exclusion.
    pub comp_exclusion: Vec<bool>,
    /// NFC_QC / NFKC_QC, as [`QuickCheck`] discriminants.
    pub nfc_qc: Vec<u8>,
    pub nfkc_qc: Vec<u8>,
    /// Full case folds (statuses C and F), ascending by code point.
    pub folds: Vec<(u32, Vec<u32>)>,
}

/// Grapheme_Cluster_Break values, packed into the top nibble of the gbp
/// table's stage-3 byte. The runtime mirrors this enumeration; the order is
/// part of the binary format.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gbp {
    Other = 0,
    Cr,
    Lf,
    Control,
    Extend,
    Zwj,
    RegionalIndicator,
    Prepend,
    SpacingMark,
    HangulL,
    HangulV,
    HangulT,
    HangulLv,
    HangulLvt,
}

/// Indic_Conjunct_Break values, bits 1..=3 of the stage-3 byte.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Incb {
    None = 0,
    Consonant,
    Extend,
    Linker,
}

/// Quick-check values for NFC/NFKC, two bits each in the norm record flags.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum QuickCheck {
    Yes = 0,
    No,
    Maybe,
}

/// A raw decomposition mapping from UnicodeData.txt.
#[derive(Clone)]
pub struct Decomposition {
    pub compat: bool,
    pub mapping: Vec<u32>,
}

impl UcdData {
    pub fn parse(dir: &Path) -> Result<Self, Error> {
        let mut data = UcdData {
            gcb: vec![Gbp::Other as u8; CODESPACE],
            incb: vec![Incb::None as u8; CODESPACE],
            extended_pictographic: vec![false; CODESPACE],
            emoji_presentation: vec![false; CODESPACE],
            ea_wide: vec![false; CODESPACE],
            ccc: vec![0; CODESPACE],
            gc_zero: vec![false; CODESPACE],
            decomp: vec![None; CODESPACE],
            comp_exclusion: vec![false; CODESPACE],
            nfc_qc: vec![QuickCheck::Yes as u8; CODESPACE],
            nfkc_qc: vec![QuickCheck::Yes as u8; CODESPACE],
            folds: Vec::new(),
        };
        data.parse_unicode_data(&dir.join("UnicodeData.txt"))?;
        data.parse_case_folding(&dir.join("CaseFolding.txt"))?;
        data.parse_combining_class(&dir.join("extracted/DerivedCombiningClass.txt"))?;
        data.parse_east_asian_width(&dir.join("DerivedEastAsianWidth.txt"))?;
        data.parse_grapheme_break(&dir.join("auxiliary/GraphemeBreakProperty.txt"))?;
        data.parse_core_properties(&dir.join("DerivedCoreProperties.txt"))?;
        data.parse_emoji_data(&dir.join("emoji/emoji-data.txt"))?;
        data.parse_normalization_props(&dir.join("DerivedNormalizationProps.txt"))?;
        Ok(data)
    }

    fn parse_unicode_data(&mut self, path: &Path) -> Result<(), Error> {
        let mut range_start: Option<u32> = None;
        for line in read_lines(path)? {
            let (line_no, fields) = line?;
            let fields: Vec<&str> = fields.split(';').collect();
            if fields.len() < 15 {
                return Err(Error::field_count(path, line_no, 15, fields.len()));
            }
            let cp = parse_hex(path, line_no, fields[0])?;
            let name = fields[1];
            let gc = fields[2];

            // `<..., First>`/`<..., Last>` pairs describe large uniform
            // blocks (CJK, Hangul, surrogates, private use). None of them
            // carry decompositions, so only the category matters.
            let (lo, hi) = if name.ends_with(", First>") {
                range_start = Some(cp);
                continue;
            } else if name.ends_with(", Last>") {
                let start = range_start
                    .take()
                    .ok_or_else(|| Error::bad_line(path, line_no, "Last without First"))?;
                (start, cp)
            } else {
                (cp, cp)
            };

            let zero = matches!(gc, "Me" | "Mn" | "Cf");
            for c in lo..=hi {
                self.gc_zero[c as usize] = zero;
            }

            let decomp = fields[5];
            if !decomp.is_empty() {
                let (compat, rest) = match decomp.strip_prefix('<') {
                    Some(rest) => {
                        let rest = rest
                            .split_once('>')
                            .ok_or_else(|| Error::bad_line(path, line_no, "unterminated tag"))?
                            .1;
                        (true, rest)
                    }
                    None => (false, decomp),
                };
                let mapping = rest
                    .split_whitespace()
                    .map(|t| parse_hex(path, line_no, t))
                    .collect::<Result<Vec<_>, _>>()?;
                if mapping.is_empty() {
                    return Err(Error::bad_line(path, line_no, "empty decomposition"));
                }
                self.decomp[cp as usize] = Some(Decomposition { compat, mapping });
            }
        }
        Ok(())
    }

    fn parse_case_folding(&mut self, path: &Path) -> Result<(), Error> {
        for line in read_lines(path)? {
            let (line_no, fields) = line?;
            let mut it = fields.split(';').map(str::trim);
            let cp = parse_hex(path, line_no, it.next().unwrap_or(""))?;
            let status = it
                .next()
                .ok_or_else(|| Error::bad_line(path, line_no, "missing status"))?;
            // Only the common and full folds take part in full case folding;
            // simple (S) and Turkic (T) entries are skipped.
            if status != "C" && status != "F" {
                continue;
            }
            let mapping = it
                .next()
                .ok_or_else(|| Error::bad_line(path, line_no, "missing mapping"))?
                .split_whitespace()
                .map(|t| parse_hex(path, line_no, t))
                .collect::<Result<Vec<_>, _>>()?;
            if mapping.is_empty() || mapping.len() > 3 {
                return Err(Error::bad_line(path, line_no, "fold length out of range"));
            }
            self.folds.push((cp, mapping));
        }
        self.folds.sort_by_key(|&(cp, _)| cp);
        Ok(())
    }

    fn parse_combining_class(&mut self, path: &Path) -> Result<(), Error> {
        for line in read_lines(path)? {
            let (line_no, fields) = line?;
            let (range, value) = split2(path, line_no, &fields)?;
            let (lo, hi) = parse_range(path, line_no, range)?;
            let ccc: u8 = value
                .parse()
                .map_err(|_| Error::bad_line(path, line_no, "bad combining class"))?;
            for cp in lo..=hi {
                self.ccc[cp as usize] = ccc;
            }
        }
        Ok(())
    }

    fn parse_east_asian_width(&mut self, path: &Path) -> Result<(), Error> {
        for line in read_lines(path)? {
            let (line_no, fields) = line?;
            let (range, value) = split2(path, line_no, &fields)?;
            let (lo, hi) = parse_range(path, line_no, range)?;
            let wide = match value {
                "W" | "F" => true,
                "N" | "Na" | "H" | "A" => false,
                _ => return Err(Error::bad_line(path, line_no, "unknown East_Asian_Width")),
            };
            if wide {
                for cp in lo..=hi {
                    self.ea_wide[cp as usize] = true;
                }
            }
        }
        Ok(())
    }

    fn parse_grapheme_break(&mut self, path: &Path) -> Result<(), Error> {
        for line in read_lines(path)? {
            let (line_no, fields) = line?;
            let (range, value) = split2(path, line_no, &fields)?;
            let (lo, hi) = parse_range(path, line_no, range)?;
            let gbp = match value {
                "CR" => Gbp::Cr,
                "LF" => Gbp::Lf,
                "Control" => Gbp::Control,
                "Extend" => Gbp::Extend,
                "ZWJ" => Gbp::Zwj,
                "Regional_Indicator" => Gbp::RegionalIndicator,
                "Prepend" => Gbp::Prepend,
                "SpacingMark" => Gbp::SpacingMark,
                "L" => Gbp::HangulL,
                "V" => Gbp::HangulV,
                "T" => Gbp::HangulT,
                "LV" => Gbp::HangulLv,
                "LVT" => Gbp::HangulLvt,
                _ => return Err(Error::bad_line(path, line_no, "unknown Grapheme_Cluster_Break")),
            };
            for cp in lo..=hi {
                self.gcb[cp as usize] = gbp as u8;
            }
        }
        Ok(())
    }

    fn parse_core_properties(&mut self, path: &Path) -> Result<(), Error> {
        for line in read_lines(path)? {
            let (line_no, fields) = line?;
            let fields: Vec<&str> = fields.split(';').map(str::trim).collect();
            if fields.len() < 2 || fields[1] != "InCB" {
                continue;
            }
            if fields.len() < 3 {
                return Err(Error::bad_line(path, line_no, "missing InCB value"));
            }
            let (lo, hi) = parse_range(path, line_no, fields[0])?;
            let incb = match fields[2] {
                "Consonant" => Incb::Consonant,
                "Extend" => Incb::Extend,
                "Linker" => Incb::Linker,
                _ => return Err(Error::bad_line(path, line_no, "unknown InCB value")),
            };
            for cp in lo..=hi {
                self.incb[cp as usize] = incb as u8;
            }
        }
        Ok(())
    }

    fn parse_emoji_data(&mut self, path: &Path) -> Result<(), Error> {
        for line in read_lines(path)? {
            let (line_no, fields) = line?;
            let (range, value) = split2(path, line_no, &fields)?;
            let (lo, hi) = parse_range(path, line_no, range)?;
            let table = match value {
                "Extended_Pictographic" => &mut self.extended_pictographic,
                "Emoji_Presentation" => &mut self.emoji_presentation,
                _ => continue,
            };
            for cp in lo..=hi {
                table[cp as usize] = true;
            }
        }
        Ok(())
    }

    fn parse_normalization_props(&mut self, path: &Path) -> Result<(), Error> {
        for line in read_lines(path)? {
            let (line_no, fields) = line?;
            let fields: Vec<&str> = fields.split(';').map(str::trim).collect();
            let (lo, hi) = parse_range(path, line_no, fields[0])?;
            match fields.get(1).copied() {
                Some("Full_Composition_Exclusion") => {
                    for cp in lo..=hi {
                        self.comp_exclusion[cp as usize] = true;
                    }
                }
                Some(prop @ ("NFC_QC" | "NFKC_QC")) => {
                    let qc = match fields.get(2).copied() {
                        Some("N") => QuickCheck::No,
                        Some("M") => QuickCheck::Maybe,
                        Some("Y") => QuickCheck::Yes,
                        _ => return Err(Error::bad_line(path, line_no, "bad quick-check value")),
                    };
                    let table = if prop == "NFC_QC" { &mut self.nfc_qc } else { &mut self.nfkc_qc };
                    for cp in lo..=hi {
                        table[cp as usize] = qc as u8;
                    }
                }
                // NFD_QC/NFKD_QC are implied by the stored decompositions.
                _ => continue,
            }
        }
        Ok(())
    }
}

/// Reads a UCD file and yields `(line_number, content)` for every line that
/// still has content after comment stripping.
fn read_lines(path: &Path) -> Result<impl Iterator<Item = Result<(usize, String), Error>>, Error> {
    let text = fs::read_to_string(path).map_err(|err| Error::Io { path: path.into(), err })?;
    let lines: Vec<(usize, String)> = text
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = line.split('#').next().unwrap_or("").trim();
            // The conformance-test style `@Part` markers carry no data.
            if line.is_empty() || line.starts_with('@') {
                None
            } else {
                Some((idx + 1, line.to_string()))
            }
        })
        .collect();
    Ok(lines.into_iter().map(Ok))
}

fn split2<'a>(path: &Path, line_no: usize, line: &'a str) -> Result<(&'a str, &'a str), Error> {
    let (range, value) = line
        .split_once(';')
        .ok_or_else(|| Error::bad_line(path, line_no, "expected two fields"))?;
    Ok((range.trim(), value.trim()))
}

fn parse_hex(path: &Path, line_no: usize, s: &str) -> Result<u32, Error> {
    let cp = u32::from_str_radix(s, 16)
        .map_err(|_| Error::bad_line(path, line_no, "bad code point"))?;
    if cp as usize >= CODESPACE {
        return Err(Error::bad_line(path, line_no, "code point out of range"));
    }
    Ok(cp)
}

fn parse_range(path: &Path, line_no: usize, s: &str) -> Result<(u32, u32), Error> {
    match s.split_once("..") {
        Some((lo, hi)) => {
            let lo = parse_hex(path, line_no, lo)?;
            let hi = parse_hex(path, line_no, hi)?;
            if lo > hi {
                return Err(Error::bad_line(path, line_no, "inverted range"));
            }
            Ok((lo, hi))
        }
        None => {
            let cp = parse_hex(path, line_no, s)?;
            Ok((cp, cp))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        let p = Path::new("x");
        assert_eq!(parse_range(p, 1, "0915..0939").unwrap(), (0x915, 0x939));
        assert_eq!(parse_range(p, 1, "200D").unwrap(), (0x200D, 0x200D));
        assert!(parse_range(p, 1, "0939..0915").is_err());
        assert!(parse_range(p, 1, "110000").is_err());
    }
}
