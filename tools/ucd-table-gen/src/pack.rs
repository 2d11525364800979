// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Two-stage packing and the binary on-disk format.
//!
//! Every table family is looked up as `stage2[stage1[cp >> 8] + (cp & 0xff)]`.
//! Stage 1 has one `u16` entry per 256-code-point block (0x1100 entries for
//! the whole codespace); stage 2 holds the deduplicated blocks, where
//! identical blocks share a single offset. The serialized form is a sequence
//! of sections, each `u16 len` (element count, little-endian) followed by the
//! payload.

use std::collections::HashMap;
use std::hash::Hash;

use crate::CODESPACE;

pub const BLOCK_SIZE: usize = 0x100;
pub const STAGE1_LEN: usize = CODESPACE / BLOCK_SIZE;

pub struct TwoStage<T> {
    pub stage1: Vec<u16>,
    pub stage2: Vec<T>,
}

/// Splits the flat per-code-point array into 256-entry blocks and
/// deduplicates them. The result is deterministic: blocks are appended in
/// block order on first sight.
pub fn build_two_stage<T: Copy + Eq + Hash>(values: &[T]) -> TwoStage<T> {
    assert_eq!(values.len(), CODESPACE);

    let mut stage1 = Vec::with_capacity(STAGE1_LEN);
    let mut stage2: Vec<T> = Vec::new();
    let mut dedup: HashMap<&[T], usize> = HashMap::new();

    for block in values.chunks_exact(BLOCK_SIZE) {
        let offset = *dedup.entry(block).or_insert_with(|| {
            let offset = stage2.len();
            stage2.extend_from_slice(block);
            offset
        });
        stage1.push(u16::try_from(offset).expect("stage 2 exceeds u16 offsets"));
    }

    TwoStage { stage1, stage2 }
}

/// Little-endian section writer for the table files.
#[derive(Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn put_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_u24(&mut self, v: u32) {
        assert!(v < 1 << 24);
        self.buf.extend_from_slice(&v.to_le_bytes()[..3]);
    }

    fn put_len(&mut self, len: usize) {
        self.put_u16(u16::try_from(len).expect("section exceeds u16 length"));
    }

    pub fn section_u8(&mut self, values: &[u8]) {
        self.put_len(values.len());
        self.buf.extend_from_slice(values);
    }

    pub fn section_u16(&mut self, values: &[u16]) {
        self.put_len(values.len());
        for &v in values {
            self.put_u16(v);
        }
    }

    pub fn section_u24(&mut self, values: &[u32]) {
        self.put_len(values.len());
        for &v in values {
            self.put_u24(v);
        }
    }
}
