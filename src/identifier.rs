use std::{fmt, str::FromStr};

/// UID lengths of the two ISO14443A tag families in circulation (Mifare Classic and Mifare
/// Ultralight).
pub const STANDARD_LENGTHS: [usize; 2] = [4, 7];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,
    #[error("invalid hex digit {ch:?} in identifier")]
    InvalidHexDigit { ch: char },
    #[error("identifier has an odd number of hex digits ({count})")]
    OddDigitCount { count: usize },
}

/// The unique id read from a tag. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    bytes: Vec<u8>,
}

impl Identifier {
    pub fn new(bytes: Vec<u8>) -> Result<Self, IdentifierError> {
        if bytes.is_empty() {
            return Err(IdentifierError::Empty);
        }
        Ok(Self { bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_standard_length(&self) -> bool {
        STANDARD_LENGTHS.contains(&self.len())
    }

    /// Each byte split into its high nibble then its low nibble.
    pub fn nibbles(&self) -> impl Iterator<Item = u8> + '_ {
        self.bytes
            .iter()
            .flat_map(|&byte| [(byte & 0xF0) >> 4, byte & 0x0F])
    }
}

impl TryFrom<&[u8]> for Identifier {
    type Error = IdentifierError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::new(bytes.to_vec())
    }
}

/// Accepts hex digits optionally separated by whitespace, `:` or `-`, e.g. `04:3A:9F:12`,
/// `04 3a 9f 12` or `043A9F12`. A `0x` prefix on any group is ignored, so the `Display` form
/// parses back.
impl FromStr for Identifier {
    type Err = IdentifierError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut digits = Vec::new();
        for token in s.split(|ch: char| ch.is_whitespace() || ch == ':' || ch == '-') {
            let token = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            for ch in token.chars() {
                let digit = ch
                    .to_digit(16)
                    .ok_or(IdentifierError::InvalidHexDigit { ch })?;
                digits.push(digit as u8);
            }
        }
        if digits.len() % 2 != 0 {
            return Err(IdentifierError::OddDigitCount {
                count: digits.len(),
            });
        }
        let bytes = digits
            .chunks(2)
            .map(|pair| (pair[0] << 4) | pair[1])
            .collect();
        Self::new(bytes)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, byte) in self.bytes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "0x{:02X}", byte)?;
        }
        Ok(())
    }
}
