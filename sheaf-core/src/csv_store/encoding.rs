//! Text encodings for CSV files.
//!
//! Exchange files default to the legacy Korean single-byte family so that
//! existing spreadsheets open them unchanged. Text that cannot be represented
//! is substituted with `?` rather than failing the write.

use encoding_rs::Encoding;

use super::CsvError;

/// Replacement for characters the target encoding cannot represent
pub const SUBSTITUTE: char = '?';

/// A CSV file encoding resolved from a WHATWG label
#[derive(Debug, Clone, Copy)]
pub struct TextEncoding {
  encoding: &'static Encoding,
}

impl TextEncoding {
  /// Resolve an encoding label such as `euc-kr` or `utf-8`
  pub fn for_label(label: &str) -> Result<Self, CsvError> {
    Encoding::for_label(label.trim().as_bytes())
      .map(|encoding| Self { encoding })
      .ok_or_else(|| CsvError::UnknownEncoding(label.to_string()))
  }

  pub fn name(&self) -> &'static str {
    self.encoding.name()
  }

  /// Encode text, substituting unrepresentable characters.
  ///
  /// Returns the bytes and whether any substitution happened.
  pub fn encode_lossy(&self, text: &str) -> (Vec<u8>, bool) {
    let (bytes, _, had_errors) = self.encoding.encode(text);
    if !had_errors {
      return (bytes.into_owned(), false);
    }

    let mut buf = [0u8; 4];
    let substituted: String = text
      .chars()
      .map(|c| {
        let (_, _, unmappable) = self.encoding.encode(c.encode_utf8(&mut buf));
        if unmappable { SUBSTITUTE } else { c }
      })
      .collect();

    let (bytes, _, _) = self.encoding.encode(&substituted);
    (bytes.into_owned(), true)
  }

  /// Decode bytes, returning the text and whether malformed sequences were
  /// replaced
  pub fn decode(&self, bytes: &[u8]) -> (String, bool) {
    let (text, _, had_errors) = self.encoding.decode(bytes);
    (text.into_owned(), had_errors)
  }
}
