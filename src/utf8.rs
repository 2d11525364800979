use std::iter;

/// One decoded scalar with its position in the source slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodePoint {
    pub code: char,
    /// Byte offset of the first byte of this code point.
    pub offset: usize,
    /// Number of source bytes consumed (1..=4). For U+FFFD substitutions
    /// this is the length of the maximal subpart that was replaced.
    pub len: usize,
}

/// Iterates the code points of a byte slice.
///
/// Ill-formed sequences are replaced with U+FFFD, advancing by the maximal
/// subpart of a valid sequence (one replacement per invalid prefix, never
/// consuming the byte that caused the rejection).
pub fn code_points(source: &[u8]) -> CodePoints<'_> {
    CodePoints { source, offset: 0 }
}

#[derive(Clone, Copy)]
pub struct CodePoints<'a> {
    source: &'a [u8],
    offset: usize,
}

impl<'a> CodePoints<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self { source, offset: 0 }
    }

    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// The offset the next `next()` call will decode from.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn has_next(&self) -> bool {
        self.offset < self.source.len()
    }

    // See: https://datatracker.ietf.org/doc/html/rfc3629
    // as well as ICU's `utf8.h` for the bitmask approach.
    // Mixed text spends most of its time in ASCII; keeping the non-ASCII
    // decoder out of line keeps `next()` trivially inlinable.
    #[cold]
    fn next_slow(&mut self, c: u8) -> char {
        if self.offset >= self.source.len() {
            return '\u{FFFD}';
        }

        let mut cp = c as u32;

        if cp < 0xE0 {
            // UTF8-2 = %xC2-DF UTF8-tail

            if cp < 0xC2 {
                return '\u{FFFD}';
            }

            // The lead byte is 110xxxxx
            // -> Strip off the 110 prefix
            cp &= !0xE0;
        } else if cp < 0xF0 {
            // UTF8-3 =
            //   %xE0    %xA0-BF   UTF8-tail
            //   %xE1-EC UTF8-tail UTF8-tail
            //   %xED    %x80-9F   UTF8-tail
            //   %xEE-EF UTF8-tail UTF8-tail
            const BITS_80_9F: u8 = 1 << 0b100; // 0x80-9F, aka 0b100xxxxx
            const BITS_A0_BF: u8 = 1 << 0b101; // 0xA0-BF, aka 0b101xxxxx
            const BITS_BOTH: u8 = BITS_80_9F | BITS_A0_BF;
            const LEAD_TRAIL1_BITS: [u8; 16] = [
                //             v-- lead byte
                BITS_A0_BF, // 0xE0
                BITS_BOTH,  // 0xE1
                BITS_BOTH,  // 0xE2
                BITS_BOTH,  // 0xE3
                BITS_BOTH,  // 0xE4
                BITS_BOTH,  // 0xE5
                BITS_BOTH,  // 0xE6
                BITS_BOTH,  // 0xE7
                BITS_BOTH,  // 0xE8
                BITS_BOTH,  // 0xE9
                BITS_BOTH,  // 0xEA
                BITS_BOTH,  // 0xEB
                BITS_BOTH,  // 0xEC
                BITS_80_9F, // 0xED
                BITS_BOTH,  // 0xEE
                BITS_BOTH,  // 0xEF
            ];

            // The lead byte is 1110xxxx
            // -> Strip off the 1110 prefix
            cp &= !0xF0;

            let t = self.source[self.offset] as u32;
            if LEAD_TRAIL1_BITS[cp as usize] & (1 << (t >> 5)) == 0 {
                return '\u{FFFD}';
            }
            cp = (cp << 6) | (t & 0x3F);

            self.offset += 1;
            if self.offset >= self.source.len() {
                return '\u{FFFD}';
            }
        } else {
            // UTF8-4 =
            //   %xF0    %x90-BF   UTF8-tail UTF8-tail
            //   %xF1-F3 UTF8-tail UTF8-tail UTF8-tail
            //   %xF4    %x80-8F   UTF8-tail UTF8-tail

            // Same idea as above with the indices flipped: the trail byte is
            // the index and the lead byte mask is the value, because the
            // split at 0x90 needs more bits than fit into an u8.
            const TRAIL1_LEAD_BITS: [u8; 16] = [
                // +------ 0xF4 lead
                // |+----- 0xF3 lead
                // ||+---- 0xF2 lead
                // |||+--- 0xF1 lead
                // ||||+-- 0xF0 lead
                // vvvvv
                0b_00000, //
                0b_00000, //
                0b_00000, //
                0b_00000, //
                0b_00000, //
                0b_00000, //
                0b_00000, // trail bytes:
                0b_00000, //
                0b_11110, // 0x80-8F -> 0x80-8F can be preceded by 0xF1-F4
                0b_01111, // 0x90-9F -v
                0b_01111, // 0xA0-AF -> 0x90-BF can be preceded by 0xF0-F3
                0b_01111, // 0xB0-BF -^
                0b_00000, //
                0b_00000, //
                0b_00000, //
                0b_00000, //
            ];

            // The lead byte *may* be 11110xxx, but could also be e.g.
            // 11111xxx. -> Only strip off the 1111 prefix
            cp &= !0xF0;

            // Now we can verify if it's actually <= 0xF4.
            if cp > 4 {
                return '\u{FFFD}';
            }

            let t = self.source[self.offset] as u32;
            if TRAIL1_LEAD_BITS[(t >> 4) as usize] & (1 << cp) == 0 {
                return '\u{FFFD}';
            }
            cp = (cp << 6) | (t & 0x3F);

            self.offset += 1;
            if self.offset >= self.source.len() {
                return '\u{FFFD}';
            }

            // UTF8-tail = %x80-BF
            let t = (self.source[self.offset] as u32).wrapping_sub(0x80);
            if t > 0x3F {
                return '\u{FFFD}';
            }
            cp = (cp << 6) | t;

            self.offset += 1;
            if self.offset >= self.source.len() {
                return '\u{FFFD}';
            }
        }

        // UTF8-tail = %x80-BF
        let t = (self.source[self.offset] as u32).wrapping_sub(0x80);
        if t > 0x3F {
            return '\u{FFFD}';
        }
        cp = (cp << 6) | t;

        self.offset += 1;

        // SAFETY: Overlong, surrogate and out-of-range encodings were all
        // rejected above, so `cp` is a Unicode scalar value.
        unsafe { char::from_u32_unchecked(cp) }
    }
}

impl Iterator for CodePoints<'_> {
    type Item = CodePoint;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.source.len() {
            return None;
        }

        let start = self.offset;
        let c = self.source[start];
        self.offset += 1;

        // UTF8-1 = %x00-7F
        let code = if (c & 0x80) == 0 { c as char } else { self.next_slow(c) };
        Some(CodePoint { code, offset: start, len: self.offset - start })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        // Lower bound: all remaining bytes are 4-byte sequences.
        // Upper bound: all remaining bytes are ASCII.
        let remaining = self.source.len() - self.offset;
        (remaining / 4, Some(remaining))
    }
}

impl iter::FusedIterator for CodePoints<'_> {}
