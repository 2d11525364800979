// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod common;

use unicore::{nfc, nfd, nfkc, nfkd};

/// Runs the five-column conformance fixture with the invariants of the
/// official NormalizationTest:
///
/// ```text
/// c2 == toNFC(c1) == toNFC(c2) == toNFC(c3)
/// c4 == toNFC(c4) == toNFC(c5)
/// c3 == toNFD(c1) == toNFD(c2) == toNFD(c3)
/// c5 == toNFD(c4) == toNFD(c5)
/// c4 == toNFKC(cX), c5 == toNFKD(cX) for X in 1..5
/// ```
#[test]
fn conformance() {
    let data = common::fixture("normalization_cases.txt");
    let mut checked = 0usize;
    for line in common::data_lines(&data) {
        let cols: Vec<String> =
            line.split(';').take(5).map(common::parse_cps).collect();
        assert_eq!(cols.len(), 5, "short line: {line}");
        let (c1, c2, c3, c4, c5) = (&cols[0], &cols[1], &cols[2], &cols[3], &cols[4]);

        for x in [c1, c2, c3] {
            assert_eq!(&nfc(x.as_bytes()), c2, "NFC of {line}");
            assert_eq!(&nfd(x.as_bytes()), c3, "NFD of {line}");
        }
        for x in [c4, c5] {
            assert_eq!(&nfc(x.as_bytes()), c4, "NFC of {line}");
            assert_eq!(&nfd(x.as_bytes()), c5, "NFD of {line}");
        }
        for x in [c1, c2, c3, c4, c5] {
            assert_eq!(&nfkc(x.as_bytes()), c4, "NFKC of {line}");
            assert_eq!(&nfkd(x.as_bytes()), c5, "NFKD of {line}");
        }
        checked += 1;
    }
    assert!(checked > 5000, "suspiciously small fixture: {checked} lines");
}

#[test]
fn idempotence_and_commutation() {
    let data = common::fixture("normalization_cases.txt");
    for line in common::data_lines(&data).step_by(7) {
        let c1 = common::parse_cps(line.split(';').next().unwrap());
        let b = c1.as_bytes();

        let d = nfd(b);
        assert_eq!(nfd(d.as_bytes()), d);
        let c = nfc(b);
        assert_eq!(nfc(c.as_bytes()), c);
        let kd = nfkd(b);
        assert_eq!(nfkd(kd.as_bytes()), kd);
        let kc = nfkc(b);
        assert_eq!(nfkc(kc.as_bytes()), kc);

        // NFC(NFD(s)) == NFC(s), NFKD(NFD(s)) == NFKD(s).
        assert_eq!(nfc(d.as_bytes()), c);
        assert_eq!(nfkd(d.as_bytes()), kd);
    }
}
