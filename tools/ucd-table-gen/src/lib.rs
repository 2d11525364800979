// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Generates the packed Unicode property tables from UCD text files.
//!
//! One binary table per property family:
//! * `gbp.bin`  — grapheme cluster break, Indic conjunct break and
//!   Extended_Pictographic, three-stage, one packed byte per code point
//!   (`GBP:4 | InCB:3 | ExtPic:1`, GBP in the top nibble).
//! * `ccc.bin`  — canonical combining classes, two-stage.
//! * `dwp.bin`  — display widths, two-stage, `i8` values in `-1..=3`.
//! * `fold.bin` — full case folds, flat length-prefixed records.
//! * `norm.bin` — canonical/compatibility decompositions, quick-check flags
//!   and the primary composition pairs.
//!
//! The output is deterministic: the same input files produce byte-identical
//! tables. `build.rs` runs [`generate`] at build time; the standalone binary
//! exists for regenerating tables by hand and for diffing table sizes.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error as ThisError;

mod pack;
mod ucd;

pub use ucd::{Gbp, Incb, QuickCheck};

use pack::{build_two_stage, Writer};
use ucd::UcdData;

/// Number of code points addressed by the tables (U+0000..=U+10FFFF).
pub const CODESPACE: usize = 0x110000;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{}: {err}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
    #[error("{}:{line}: {msg}", path.display())]
    Parse { path: PathBuf, line: usize, msg: String },
}

impl Error {
    fn bad_line(path: &Path, line: usize, msg: &str) -> Self {
        Error::Parse { path: path.into(), line, msg: msg.into() }
    }

    fn field_count(path: &Path, line: usize, want: usize, got: usize) -> Self {
        Error::Parse {
            path: path.into(),
            line,
            msg: format!("expected {want} fields, got {got}"),
        }
    }
}

/// The serialized table families.
pub struct Tables {
    pub gbp: Vec<u8>,
    pub ccc: Vec<u8>,
    pub dwp: Vec<u8>,
    pub fold: Vec<u8>,
    pub norm: Vec<u8>,
}

impl Tables {
    pub fn families(&self) -> [(&'static str, &[u8]); 5] {
        [
            ("gbp.bin", &self.gbp),
            ("ccc.bin", &self.ccc),
            ("dwp.bin", &self.dwp),
            ("fold.bin", &self.fold),
            ("norm.bin", &self.norm),
        ]
    }

    pub fn write_to(&self, dir: &Path) -> io::Result<()> {
        for (name, bytes) in self.families() {
            std::fs::write(dir.join(name), bytes)?;
        }
        Ok(())
    }
}

/// Parses the UCD files under `dir` and builds all five table families.
pub fn generate(dir: &Path) -> Result<Tables, Error> {
    let data = UcdData::parse(dir)?;
    let ((gbp, ccc), (dwp, (fold, norm))) = rayon::join(
        || rayon::join(|| build_gbp(&data), || build_ccc(&data)),
        || rayon::join(|| build_dwp(&data), || rayon::join(|| build_fold(&data), || build_norm(&data))),
    );
    Ok(Tables { gbp, ccc, dwp, fold, norm })
}

fn build_gbp(data: &UcdData) -> Vec<u8> {
    // Distinct packed bytes go into a small stage-3 palette; the two-stage
    // table then only stores palette indices, which keeps stage 2 at one
    // byte per entry.
    let mut palette: Vec<u8> = Vec::new();
    let mut palette_index: HashMap<u8, u8> = HashMap::new();
    let mut values = vec![0u8; CODESPACE];

    for cp in 0..CODESPACE {
        let packed = (data.gcb[cp] << 4)
            | (data.incb[cp] << 1)
            | data.extended_pictographic[cp] as u8;
        values[cp] = *palette_index.entry(packed).or_insert_with(|| {
            palette.push(packed);
            (palette.len() - 1) as u8
        });
    }

    let stages = build_two_stage(&values);
    let mut w = Writer::new();
    w.section_u16(&stages.stage1);
    w.section_u8(&stages.stage2);
    w.section_u8(&palette);
    w.finish()
}

fn build_ccc(data: &UcdData) -> Vec<u8> {
    let stages = build_two_stage(&data.ccc);
    let mut w = Writer::new();
    w.section_u16(&stages.stage1);
    w.section_u8(&stages.stage2);
    w.finish()
}

fn build_dwp(data: &UcdData) -> Vec<u8> {
    let mut values = vec![0u8; CODESPACE];
    for cp in 0..CODESPACE {
        let width: i8 = if cp == 0x08 || cp == 0x7F {
            // BACKSPACE and DELETE erase a column.
            -1
        } else if cp < 0x20 || (0x7F..=0x9F).contains(&cp) {
            0
        } else if cp == 0x2E3B {
            // THREE-EM DASH.
            3
        } else if cp == 0xAD {
            // SOFT HYPHEN renders as a narrow glyph in terminals, unlike the
            // rest of gc=Cf; this matches wcswidth().
            1
        } else if data.gc_zero[cp] {
            0
        } else if data.ea_wide[cp] || data.emoji_presentation[cp] {
            2
        } else {
            1
        };
        values[cp] = width as u8;
    }

    let stages = build_two_stage(&values);
    let mut w = Writer::new();
    w.section_u16(&stages.stage1);
    w.section_u8(&stages.stage2);
    w.finish()
}

fn build_fold(data: &UcdData) -> Vec<u8> {
    // Flat records `u8 n; n x u24`: the source code point followed by its
    // mapping, ascending by source, closed by a u16 0 sentinel.
    let mut w = Writer::new();
    for (cp, mapping) in &data.folds {
        w.put_u8((1 + mapping.len()) as u8);
        w.put_u24(*cp);
        for &m in mapping {
            w.put_u24(m);
        }
    }
    w.put_u16(0);
    w.finish()
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
struct NormRecord {
    flags: u8,
    canon_off: u16,
    canon_len: u8,
    compat_off: u16,
    compat_len: u8,
}

fn build_norm(data: &UcdData) -> Vec<u8> {
    let mut arena: Vec<u32> = Vec::new();
    let mut arena_dedup: HashMap<Vec<u32>, u16> = HashMap::new();
    let mut records: Vec<NormRecord> = vec![NormRecord::default()];
    let mut record_dedup: HashMap<NormRecord, u16> = HashMap::new();
    record_dedup.insert(NormRecord::default(), 0);
    let mut values = vec![0u16; CODESPACE];

    fn intern(
        arena: &mut Vec<u32>,
        arena_dedup: &mut HashMap<Vec<u32>, u16>,
        seq: &[u32],
    ) -> (u16, u8) {
        let off = *arena_dedup.entry(seq.to_vec()).or_insert_with(|| {
            let off = arena.len();
            arena.extend_from_slice(seq);
            u16::try_from(off).expect("norm arena exceeds u16 offsets")
        });
        (off, seq.len() as u8)
    }

    for cp in 0..CODESPACE as u32 {
        let canon = canon_full(data, cp);
        let compat = compat_full(data, cp);
        let flags = data.nfc_qc[cp as usize] | (data.nfkc_qc[cp as usize] << 2);

        let mut record = NormRecord { flags, ..Default::default() };
        if canon[..] != [cp] {
            let (off, len) = intern(&mut arena, &mut arena_dedup, &canon);
            record.canon_off = off;
            record.canon_len = len;
        }
        // The compat mapping is stored only where it differs from the
        // canonical one (NFKD falls back to the canonical decomposition).
        if compat != canon {
            let (off, len) = intern(&mut arena, &mut arena_dedup, &compat);
            record.compat_off = off;
            record.compat_len = len;
        }

        if record != NormRecord::default() {
            values[cp as usize] = *record_dedup.entry(record).or_insert_with(|| {
                records.push(record);
                u16::try_from(records.len() - 1).expect("norm records exceed u16 indices")
            });
        }
    }

    // Primary composites: the inverse of the raw canonical pair
    // decompositions, minus the full composition exclusions (which already
    // cover singletons and non-starter decompositions).
    let mut pairs: Vec<(u32, u32, u32)> = Vec::new();
    for cp in 0..CODESPACE as u32 {
        if data.comp_exclusion[cp as usize] {
            continue;
        }
        if let Some(d) = &data.decomp[cp as usize] {
            if !d.compat && d.mapping.len() == 2 {
                pairs.push((d.mapping[0], d.mapping[1], cp));
            }
        }
    }
    pairs.sort_unstable();

    let stages = build_two_stage(&values);
    let mut w = Writer::new();
    w.section_u16(&stages.stage1);
    w.section_u16(&stages.stage2);
    w.put_u16(u16::try_from(records.len()).expect("norm records exceed u16 length"));
    for r in &records {
        w.put_u8(r.flags);
        w.put_u16(r.canon_off);
        w.put_u8(r.canon_len);
        w.put_u16(r.compat_off);
        w.put_u8(r.compat_len);
    }
    w.section_u24(&arena);
    w.put_u16(u16::try_from(pairs.len()).expect("composition pairs exceed u16 length"));
    for &(a, b, c) in &pairs {
        w.put_u24(a);
        w.put_u24(b);
        w.put_u24(c);
    }
    w.finish()
}

/// Fully recursive canonical decomposition, or `[cp]` if there is none.
fn canon_full(data: &UcdData, cp: u32) -> Vec<u32> {
    fn rec(data: &UcdData, cp: u32, out: &mut Vec<u32>) {
        match &data.decomp[cp as usize] {
            Some(d) if !d.compat => {
                for &c in &d.mapping {
                    rec(data, c, out);
                }
            }
            _ => out.push(cp),
        }
    }
    let mut out = Vec::new();
    rec(data, cp, &mut out);
    out
}

/// Fully recursive compatibility decomposition (canonical mappings are
/// applied too), or `[cp]` if there is none.
fn compat_full(data: &UcdData, cp: u32) -> Vec<u32> {
    fn rec(data: &UcdData, cp: u32, out: &mut Vec<u32>) {
        match &data.decomp[cp as usize] {
            Some(d) => {
                for &c in &d.mapping {
                    rec(data, c, out);
                }
            }
            _ => out.push(cp),
        }
    }
    let mut out = Vec::new();
    rec(data, cp, &mut out);
    out
}
