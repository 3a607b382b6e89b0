//! Deterministic block key generation.
//!
//! Block keys only need to be unique within one document, so the parser
//! uses a plain counter rather than randomness. The counter starts high
//! enough that every key encodes to five base-32 characters, which keeps
//! keys fixed-width and visibly opaque.

const ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// Produces a fresh sequence of block keys for one conversion call.
#[derive(Debug, Clone)]
pub struct KeySequence {
    next: u64,
}

impl KeySequence {
    pub fn new() -> Self {
        // 32^4: the first five-character base-32 value.
        KeySequence { next: 1 << 20 }
    }

    /// The next key in the sequence.
    pub fn next_key(&mut self) -> String {
        let key = encode_base32(self.next);
        self.next += 1;
        key
    }
}

impl Default for KeySequence {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_base32(mut value: u64) -> String {
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 32) as usize]);
        value /= 32;
    }
    digits.reverse();
    String::from_utf8(digits).expect("alphabet is ASCII")
}
