//! String-matching adapters: naive, Rabin–Karp and Knuth–Morris–Pratt.
//!
//! Text and pattern are ASCII, so byte offsets and character positions
//! coincide. Every adapter reports all (possibly overlapping) occurrences.

use algoviz_core::{AlgorithmId, Outcome, Ref, Snapshot, StepKind, Trace, TraceError, ValidationError};

use super::{check_len, TEXT_LEN_LIMIT};
use crate::recorder::TraceRecorder;

/// Rabin–Karp radix.
pub const RADIX: i64 = 256;
/// Rabin–Karp modulus. Small on purpose so spurious hits show up.
pub const MODULUS: i64 = 101;

pub fn check_text(text: &str, pattern: &str) -> Result<(), ValidationError> {
    if pattern.is_empty() {
        return Err(ValidationError::EmptyPattern);
    }
    if !text.is_ascii() {
        return Err(ValidationError::NonAscii { what: "text" });
    }
    if !pattern.is_ascii() {
        return Err(ValidationError::NonAscii { what: "pattern" });
    }
    check_len("text length", text.len(), TEXT_LEN_LIMIT)?;
    check_len("pattern length", pattern.len(), TEXT_LEN_LIMIT)
}

struct Scan<'a> {
    rec: TraceRecorder,
    text: &'a str,
    pattern: &'a str,
    matches: Vec<usize>,
}

impl<'a> Scan<'a> {
    fn new(algorithm: AlgorithmId, text: &'a str, pattern: &'a str) -> Self {
        Scan {
            rec: TraceRecorder::new(algorithm),
            text,
            pattern,
            matches: Vec::new(),
        }
    }

    fn snap(&self, offset: usize, hashes: Option<(i64, i64)>) -> Snapshot {
        Snapshot::Text {
            text: self.text.to_string(),
            pattern: self.pattern.to_string(),
            offset,
            pattern_hash: hashes.map(|(p, _)| p as u64),
            window_hash: hashes.map(|(_, w)| w as u64),
            matches: self.matches.clone(),
        }
    }

    fn step(
        &mut self,
        kind: StepKind,
        offset: usize,
        hashes: Option<(i64, i64)>,
        refs: &[Ref],
        description: String,
    ) -> Result<(), TraceError> {
        let snapshot = self.snap(offset, hashes);
        self.rec.record(kind, snapshot, refs, description)
    }

    /// Records a character comparison at alignment `s`. Returns true on
    /// equality.
    fn compare(
        &mut self,
        kind: StepKind,
        s: usize,
        j: usize,
        hashes: Option<(i64, i64)>,
    ) -> Result<bool, TraceError> {
        let t = self.text.as_bytes()[s + j];
        let p = self.pattern.as_bytes()[j];
        let equal = t == p;
        let verdict = if equal { "==" } else { "!=" };
        self.step(
            kind,
            s,
            hashes,
            &[Ref::Text(s + j), Ref::Pattern(j)],
            format!(
                "text[{}] '{}' {} pattern[{}] '{}'",
                s + j,
                t as char,
                verdict,
                j,
                p as char
            ),
        )?;
        Ok(equal)
    }

    fn matched(&mut self, s: usize, hashes: Option<(i64, i64)>) -> Result<(), TraceError> {
        self.matches.push(s);
        self.step(
            StepKind::Match,
            s,
            hashes,
            &[Ref::Text(s), Ref::Pattern(0)],
            format!("pattern occurs at {}", s),
        )
    }

    fn finish(mut self) -> Result<Trace, TraceError> {
        let description = match self.matches.len() {
            0 => "no occurrences".to_string(),
            n => format!("{} occurrence(s) at {:?}", n, self.matches),
        };
        let offset = self.matches.last().copied().unwrap_or(0);
        self.step(StepKind::Done, offset, None, &[], description)?;
        let positions = self.matches;
        self.rec.finish(Outcome::Matches { positions })
    }
}

/// Slides the pattern one position at a time and compares left to right,
/// stopping an alignment at the first mismatch.
pub fn naive_string_match(text: &str, pattern: &str) -> Result<Trace, TraceError> {
    check_text(text, pattern)?;
    let (n, m) = (text.len(), pattern.len());
    let mut scan = Scan::new(AlgorithmId::NaiveStringMatch, text, pattern);
    if m <= n {
        for s in 0..=n - m {
            let mut full = true;
            for j in 0..m {
                if !scan.compare(StepKind::Compare, s, j, None)? {
                    full = false;
                    break;
                }
            }
            if full {
                scan.matched(s, None)?;
            }
        }
    }
    scan.finish()
}

fn hash(bytes: &[u8]) -> i64 {
    bytes
        .iter()
        .fold(0, |acc, &b| (acc * RADIX + i64::from(b)) % MODULUS)
}

/// Rabin–Karp with a rolling hash. Characters are only verified when the
/// window hash equals the pattern hash; a verified mismatch is a spurious
/// hit.
pub fn rabin_karp(text: &str, pattern: &str) -> Result<Trace, TraceError> {
    check_text(text, pattern)?;
    let (n, m) = (text.len(), pattern.len());
    let bytes = text.as_bytes();
    let mut scan = Scan::new(AlgorithmId::RabinKarp, text, pattern);
    if m > n {
        return scan.finish();
    }

    // RADIX^(m-1) mod MODULUS, the weight of the outgoing character.
    let high = (1..m).fold(1, |acc, _| acc * RADIX % MODULUS);
    let p = hash(pattern.as_bytes());
    let mut w = hash(&bytes[..m]);

    for s in 0..=n - m {
        let hashes = Some((p, w));
        scan.step(
            StepKind::Hash,
            s,
            hashes,
            &[Ref::Text(s)],
            format!("window at {} hashes to {} (pattern {})", s, w, p),
        )?;
        if w == p {
            let mut full = true;
            for j in 0..m {
                if !scan.compare(StepKind::Verify, s, j, hashes)? {
                    full = false;
                    break;
                }
            }
            if full {
                scan.matched(s, hashes)?;
            } else {
                scan.step(
                    StepKind::SpuriousHit,
                    s,
                    hashes,
                    &[Ref::Text(s)],
                    format!("hash {} collides at {} but the text differs", w, s),
                )?;
            }
        }
        if s + m < n {
            let outgoing = i64::from(bytes[s]);
            let incoming = i64::from(bytes[s + m]);
            w = (RADIX * (w - outgoing * high) + incoming).rem_euclid(MODULUS);
        }
    }
    scan.finish()
}

/// KMP failure function: `lps[j]` is the length of the longest proper
/// prefix of `pattern[..=j]` that is also a suffix of it.
fn failure_table(pattern: &[u8]) -> Vec<usize> {
    let mut lps = vec![0; pattern.len()];
    let mut len = 0;
    let mut i = 1;
    while i < pattern.len() {
        if pattern[i] == pattern[len] {
            len += 1;
            lps[i] = len;
            i += 1;
        } else if len > 0 {
            len = lps[len - 1];
        } else {
            i += 1;
        }
    }
    lps
}

/// Knuth–Morris–Pratt. A mismatch after a partial match falls back through
/// the failure table (`shift`) without re-reading text.
pub fn knuth_morris_pratt(text: &str, pattern: &str) -> Result<Trace, TraceError> {
    check_text(text, pattern)?;
    let (n, m) = (text.len(), pattern.len());
    let lps = failure_table(pattern.as_bytes());
    let mut scan = Scan::new(AlgorithmId::KnuthMorrisPratt, text, pattern);

    let (mut i, mut j) = (0, 0);
    while i < n {
        if n - i < m - j {
            break;
        }
        if scan.compare(StepKind::Compare, i - j, j, None)? {
            i += 1;
            j += 1;
            if j == m {
                scan.matched(i - m, None)?;
                j = lps[m - 1];
            }
        } else if j > 0 {
            let from = j;
            j = lps[j - 1];
            scan.step(
                StepKind::Shift,
                i - j,
                None,
                &[Ref::Text(i), Ref::Pattern(j)],
                format!("fall back from pattern[{}] to pattern[{}]", from, j),
            )?;
        } else {
            i += 1;
        }
    }
    scan.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(trace: &Trace) -> Vec<usize> {
        match trace.outcome() {
            Outcome::Matches { positions } => positions.clone(),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    fn kinds(trace: &Trace) -> Vec<StepKind> {
        trace.steps().iter().map(|s| s.kind).collect()
    }

    #[test]
    fn naive_finds_single_match() {
        let trace = naive_string_match("ABABCABABA", "ABABA").unwrap();
        assert_eq!(positions(&trace), vec![5]);
        assert_eq!(trace.outcome().found(), Some(true));
    }

    #[test]
    fn naive_stops_alignment_at_first_mismatch() {
        let trace = naive_string_match("XAB", "AB").unwrap();
        use StepKind::*;
        // s=0: X != A; s=1: A == A, B == B.
        assert_eq!(kinds(&trace), vec![Compare, Compare, Compare, Match, Done]);
    }

    #[test]
    fn rabin_karp_distinguishes_spurious_hits() {
        // "JU" and "AB" both hash to 41 with radix 256, modulus 101.
        let trace = rabin_karp("JUAB", "AB").unwrap();
        use StepKind::*;
        assert_eq!(
            kinds(&trace),
            vec![Hash, Verify, SpuriousHit, Hash, Hash, Verify, Verify, Match, Done]
        );
        assert_eq!(positions(&trace), vec![2]);
    }

    #[test]
    fn kmp_falls_back_through_the_failure_table() {
        let trace = knuth_morris_pratt("ABABDABACDABABCABAB", "ABABCABAB").unwrap();
        assert_eq!(positions(&trace), vec![10]);
        assert!(kinds(&trace).contains(&StepKind::Shift));
    }

    #[test]
    fn failure_table_of_repeating_pattern() {
        assert_eq!(failure_table(b"ABABCABAB"), vec![0, 0, 1, 2, 0, 1, 2, 3, 4]);
        assert_eq!(failure_table(b"AAAA"), vec![0, 1, 2, 3]);
    }

    #[test]
    fn all_matchers_report_overlapping_occurrences() {
        for matcher in [naive_string_match, rabin_karp, knuth_morris_pratt] {
            let trace = matcher("AAAA", "AA").unwrap();
            assert_eq!(positions(&trace), vec![0, 1, 2]);
        }
    }

    #[test]
    fn pattern_longer_than_text_has_no_matches() {
        for matcher in [naive_string_match, rabin_karp, knuth_morris_pratt] {
            let trace = matcher("AB", "ABC").unwrap();
            assert_eq!(kinds(&trace), vec![StepKind::Done]);
            assert_eq!(trace.outcome().found(), Some(false));
        }
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert_eq!(
            rabin_karp("ABC", "").unwrap_err(),
            TraceError::Validation(ValidationError::EmptyPattern)
        );
    }

    #[test]
    fn multibyte_text_or_pattern_is_rejected() {
        for matcher in [naive_string_match, rabin_karp, knuth_morris_pratt] {
            assert_eq!(
                matcher("héllo", "llo").unwrap_err(),
                TraceError::Validation(ValidationError::NonAscii { what: "text" })
            );
            assert_eq!(
                matcher("ab", "é").unwrap_err(),
                TraceError::Validation(ValidationError::NonAscii { what: "pattern" })
            );
        }
    }

    #[test]
    fn oversized_text_is_rejected() {
        let text = "A".repeat(TEXT_LEN_LIMIT + 1);
        assert_eq!(
            check_text(&text, "A").unwrap_err(),
            ValidationError::TooLarge {
                what: "text length",
                size: TEXT_LEN_LIMIT + 1,
                limit: TEXT_LEN_LIMIT
            }
        );
    }
}
