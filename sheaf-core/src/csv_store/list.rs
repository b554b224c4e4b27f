//! List-literal cells.
//!
//! Components, labels, and watchers are stored in a single cell as a list
//! literal in single-quote style: `['ES94111-01', 'ES94111-02']`. Decoding
//! swaps single quotes for double quotes and then parses strict JSON, which
//! also accepts cells that are already double-quoted.

use super::CsvError;

/// Encode a list of values as a single-quote style list literal
pub fn encode_list<S: AsRef<str>>(items: &[S]) -> String {
  let body = items
    .iter()
    .map(|item| quote_item(item.as_ref()))
    .collect::<Vec<_>>()
    .join(", ");
  format!("[{body}]")
}

fn quote_item(item: &str) -> String {
  let quote = if item.contains('\'') && !item.contains('"') { '"' } else { '\'' };

  let mut out = String::with_capacity(item.len() + 2);
  out.push(quote);
  for c in item.chars() {
    match c {
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      c if c == quote => {
        out.push('\\');
        out.push(c);
      }
      c => out.push(c),
    }
  }
  out.push(quote);
  out
}

/// Decode a list-literal cell.
///
/// A blank cell is an empty list. The literal is first parsed as is; if that
/// fails, its quoting is normalized to double quotes and it is parsed again.
pub fn decode_list(cell: &str) -> Result<Vec<String>, CsvError> {
  let trimmed = cell.trim();
  if trimmed.is_empty() {
    return Ok(Vec::new());
  }

  if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
    return Ok(items);
  }

  serde_json::from_str::<Vec<String>>(&normalize_quotes(trimmed)).map_err(|e| CsvError::ListLiteral {
    cell: cell.to_string(),
    reason: e.to_string(),
  })
}

/// Rewrite a single-quote style literal with strict double quoting.
///
/// Every string delimiter becomes `"`; a `"` inside a single-quoted string is
/// escaped and `\'` loses its backslash. Other escapes pass through.
fn normalize_quotes(literal: &str) -> String {
  let mut out = String::with_capacity(literal.len());
  let mut quote: Option<char> = None;
  let mut chars = literal.chars();

  while let Some(c) = chars.next() {
    match quote {
      None => {
        if c == '\'' || c == '"' {
          quote = Some(c);
          out.push('"');
        } else {
          out.push(c);
        }
      }
      Some(q) => match c {
        '\\' => match chars.next() {
          Some('\'') => out.push('\''),
          Some(next) => {
            out.push('\\');
            out.push(next);
          }
          None => out.push('\\'),
        },
        c if c == q => {
          quote = None;
          out.push('"');
        }
        '"' => out.push_str("\\\""),
        c => out.push(c),
      },
    }
  }

  out
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use super::*;

  #[test]
  fn test_encode_list() {
    assert_eq!(encode_list(&["ES94111-01", "ES94111-02"]), "['ES94111-01', 'ES94111-02']");
    assert_eq!(encode_list::<&str>(&[]), "[]");
  }

  #[test]
  fn test_encode_item_with_apostrophe_uses_double_quotes() {
    assert_eq!(encode_list(&["Gil's list"]), "[\"Gil's list\"]");
  }

  #[test]
  fn test_decode_single_quoted() {
    let items = decode_list("['ccIC24_CLU_WBS', 'WBS3']").unwrap();
    assert_eq!(items, vec!["ccIC24_CLU_WBS", "WBS3"]);
  }

  #[test]
  fn test_decode_double_quoted() {
    let items = decode_list("[\"Hong Gildong (gildong.hong)\"]").unwrap();
    assert_eq!(items, vec!["Hong Gildong (gildong.hong)"]);
  }

  #[test]
  fn test_decode_blank_and_empty() {
    assert!(decode_list("").unwrap().is_empty());
    assert!(decode_list("  ").unwrap().is_empty());
    assert!(decode_list("[]").unwrap().is_empty());
  }

  #[test]
  fn test_decode_malformed() {
    let err = decode_list("['unterminated").unwrap_err();
    assert!(matches!(err, CsvError::ListLiteral { .. }));
    assert!(err.to_string().contains("unterminated"));
  }

  #[test]
  fn test_round_trip_preserves_contents() {
    let cases: [&[&str]; 4] = [
      &["ES94111-01", "ES94111-02"],
      &["Hong Gildong (gildong.hong)", "Kim, Cheolsu (cheolsu.kim)"],
      &["홍길동 (gildong.hong)"],
      &["Gil's list", "path\\to"],
    ];

    for items in cases {
      let decoded = decode_list(&encode_list(items)).unwrap();
      let expected: BTreeSet<&str> = items.iter().copied().collect();
      let actual: BTreeSet<&str> = decoded.iter().map(String::as_str).collect();
      assert_eq!(actual, expected, "round trip of {items:?}");
    }
  }
}
