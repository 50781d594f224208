//! Byte-to-key decoding.
//!
//! Bytes read from the terminal are buffered until they form a complete token.
//! Lookup is two-tier: the front of the buffer is first matched against a fixed
//! table of multi-byte escape sequences; when no entry matches (and the buffer
//! is not a strict prefix of one), a single literal character is emitted.
//!
//! A buffer that is a strict prefix of a known sequence (for example a lone
//! `ESC`) is held back until either more bytes arrive or the caller signals
//! that the escape delay has elapsed, at which point it is flushed as literals.

use std::collections::VecDeque;

use super::Key;

const ESC: u8 = 0x1b;

/// Known multi-byte sequences. Both CSI (`ESC [`) and SS3 (`ESC O`) forms are
/// listed because terminals switch between them in application cursor mode.
const SEQUENCES: &[(&[u8], Key)] = &[
    (b"\x1b[A", Key::Up),
    (b"\x1b[B", Key::Down),
    (b"\x1b[C", Key::Right),
    (b"\x1b[D", Key::Left),
    (b"\x1bOA", Key::Up),
    (b"\x1bOB", Key::Down),
    (b"\x1bOC", Key::Right),
    (b"\x1bOD", Key::Left),
    (b"\x1b[H", Key::Home),
    (b"\x1b[F", Key::End),
    (b"\x1bOH", Key::Home),
    (b"\x1bOF", Key::End),
    (b"\x1b[1~", Key::Home),
    (b"\x1b[4~", Key::End),
    (b"\x1b[7~", Key::Home),
    (b"\x1b[8~", Key::End),
];

/// Result of matching the front of the buffer against [`SEQUENCES`].
enum SequenceMatch {
    /// A full sequence of `len` bytes matched.
    Complete(Key, usize),
    /// The buffer is a strict prefix of at least one sequence.
    Partial,
    /// Nothing in the table starts with the buffer.
    None,
}

/// Stateful decoder that buffers bytes across polling cycles.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: VecDeque<u8>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append freshly read bytes.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes);
    }

    /// True when bytes are buffered but no token has been emitted for them yet.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Decode the next token.
    ///
    /// With `flush == false`, an incomplete escape prefix yields `None` so the
    /// caller can wait for the rest of the sequence. With `flush == true` the
    /// prefix is given up on and its first byte is emitted as a literal.
    pub fn next_key(&mut self, flush: bool) -> Option<Key> {
        let first = *self.pending.front()?;

        if first == ESC {
            match self.match_sequence() {
                SequenceMatch::Complete(key, len) => {
                    self.pending.drain(..len);
                    return Some(key);
                }
                SequenceMatch::Partial if !flush => return None,
                SequenceMatch::Partial | SequenceMatch::None => {
                    self.pending.pop_front();
                    return Some(Key::Escape);
                }
            }
        }

        self.next_literal(flush)
    }

    fn match_sequence(&self) -> SequenceMatch {
        let mut partial = false;
        for (seq, key) in SEQUENCES {
            let n = seq.len().min(self.pending.len());
            let agrees = self.pending.iter().take(n).copied().eq(seq[..n].iter().copied());
            if !agrees {
                continue;
            }
            if self.pending.len() >= seq.len() {
                return SequenceMatch::Complete(*key, seq.len());
            }
            partial = true;
        }
        if partial {
            SequenceMatch::Partial
        } else {
            SequenceMatch::None
        }
    }

    /// Emit one literal character, decoding UTF-8 when possible.
    fn next_literal(&mut self, flush: bool) -> Option<Key> {
        let first = *self.pending.front()?;
        let width = utf8_width(first);

        if width <= 1 {
            self.pending.pop_front();
            return Some(literal_key(first));
        }

        if self.pending.len() < width {
            if !flush {
                return None;
            }
            self.pending.pop_front();
            return Some(Key::Char(char::REPLACEMENT_CHARACTER));
        }

        let bytes: Vec<u8> = self.pending.iter().take(width).copied().collect();
        match std::str::from_utf8(&bytes).ok().and_then(|s| s.chars().next()) {
            Some(c) => {
                self.pending.drain(..width);
                Some(Key::Char(c))
            }
            None => {
                self.pending.pop_front();
                Some(Key::Char(char::REPLACEMENT_CHARACTER))
            }
        }
    }
}

/// Expected length of a UTF-8 sequence from its lead byte (1 for ASCII and
/// for stray continuation bytes, which are emitted on their own).
fn utf8_width(lead: u8) -> usize {
    match lead {
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 1,
    }
}

fn literal_key(byte: u8) -> Key {
    match byte {
        b'\r' | b'\n' => Key::Enter,
        ESC => Key::Escape,
        b if b.is_ascii() => Key::Char(b as char),
        _ => Key::Char(char::REPLACEMENT_CHARACTER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8], flush: bool) -> Vec<Key> {
        let mut decoder = KeyDecoder::new();
        decoder.feed(bytes);
        std::iter::from_fn(|| decoder.next_key(flush)).collect()
    }

    #[test]
    fn test_arrow_sequences() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[B\x1bOA\x1bOB", false),
            vec![Key::Up, Key::Down, Key::Up, Key::Down]
        );
    }

    #[test]
    fn test_home_end_variants() {
        assert_eq!(
            decode_all(b"\x1b[H\x1b[4~\x1bOH\x1b[8~", false),
            vec![Key::Home, Key::End, Key::Home, Key::End]
        );
    }

    #[test]
    fn test_plain_characters() {
        assert_eq!(
            decode_all(b"jk1\r", false),
            vec![Key::Char('j'), Key::Char('k'), Key::Char('1'), Key::Enter]
        );
    }

    #[test]
    fn test_lone_escape_waits_until_flush() {
        let mut decoder = KeyDecoder::new();
        decoder.feed(b"\x1b");
        assert_eq!(decoder.next_key(false), None);
        assert!(decoder.has_pending());
        assert_eq!(decoder.next_key(true), Some(Key::Escape));
        assert!(!decoder.has_pending());
    }

    #[test]
    fn test_split_sequence_across_reads() {
        let mut decoder = KeyDecoder::new();
        decoder.feed(b"\x1b[");
        assert_eq!(decoder.next_key(false), None);
        decoder.feed(b"B");
        assert_eq!(decoder.next_key(false), Some(Key::Down));
        assert_eq!(decoder.next_key(false), None);
    }

    #[test]
    fn test_flushed_prefix_becomes_literals() {
        assert_eq!(
            decode_all(b"\x1b[", true),
            vec![Key::Escape, Key::Char('[')]
        );
    }

    #[test]
    fn test_unknown_sequence_falls_back_to_literals() {
        assert_eq!(
            decode_all(b"\x1bx", false),
            vec![Key::Escape, Key::Char('x')]
        );
        assert_eq!(
            decode_all(b"\x1b[Z", false),
            vec![Key::Escape, Key::Char('['), Key::Char('Z')]
        );
    }

    #[test]
    fn test_utf8_character() {
        assert_eq!(decode_all("é".as_bytes(), false), vec![Key::Char('é')]);
    }

    #[test]
    fn test_truncated_utf8_waits_then_replaces() {
        let mut decoder = KeyDecoder::new();
        decoder.feed(&[0xc3]);
        assert_eq!(decoder.next_key(false), None);
        assert_eq!(
            decoder.next_key(true),
            Some(Key::Char(char::REPLACEMENT_CHARACTER))
        );
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let input = b"\x1b[Aq\x1b\x1bOBx";
        assert_eq!(decode_all(input, false), decode_all(input, false));
    }
}
