//! An ordered, form-urlencoded query parameter list.
//!
//! Keys are case-sensitive and keep their original order. Parameters the
//! guide does not understand are carried through untouched.

use std::fmt;

/// Query parameters in the order they appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
  pairs: Vec<(String, String)>,
}

impl QueryParams {
  /// Creates an empty parameter list.
  pub fn new() -> Self {
    Self::default()
  }

  /// Parses a query string, with or without its leading `?`.
  ///
  /// `+` decodes to a space and malformed percent escapes are decoded
  /// lossily, so parsing never fails.
  pub fn parse(query: &str) -> Self {
    let query = query.strip_prefix('?').unwrap_or(query);
    let pairs = query
      .split('&')
      .filter(|segment| !segment.is_empty())
      .map(|segment| match segment.split_once('=') {
        Some((key, value)) => (decode(key), decode(value)),
        None => (decode(segment), String::new()),
      })
      .collect();
    Self { pairs }
  }

  /// The first value stored under `key`.
  pub fn get(&self, key: &str) -> Option<&str> {
    self
      .pairs
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }

  /// Returns `true` if `key` is present.
  pub fn contains(&self, key: &str) -> bool {
    self.pairs.iter().any(|(k, _)| k == key)
  }

  /// Sets `key` to `value`.
  ///
  /// The first existing entry keeps its position and takes the new value;
  /// any further entries with the same key are dropped. A new key is
  /// appended at the end.
  pub fn set(&mut self, key: &str, value: impl Into<String>) {
    let value = value.into();
    match self.pairs.iter().position(|(k, _)| k == key) {
      Some(first) => {
        self.pairs[first].1 = value;
        let mut index = 0;
        self.pairs.retain(|(k, _)| {
          let keep = index <= first || k != key;
          index += 1;
          keep
        });
      }
      None => self.pairs.push((key.to_string(), value)),
    }
  }

  /// Appends an entry without touching existing ones.
  pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
    self.pairs.push((key.into(), value.into()));
  }

  /// Removes every entry for `key`.
  pub fn delete(&mut self, key: &str) {
    self.pairs.retain(|(k, _)| k != key);
  }

  /// Iterates over decoded `(key, value)` pairs.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn is_empty(&self) -> bool {
    self.pairs.is_empty()
  }
}

impl fmt::Display for QueryParams {
  /// Writes the encoded query string without a leading `?`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, (key, value)) in self.pairs.iter().enumerate() {
      if i > 0 {
        f.write_str("&")?;
      }
      write!(f, "{}={}", encode(key), encode(value))?;
    }
    Ok(())
  }
}

fn decode(raw: &str) -> String {
  let raw = raw.replace('+', " ");
  match urlencoding::decode(&raw) {
    Ok(decoded) => decoded.into_owned(),
    Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned(),
  }
}

fn encode(raw: &str) -> String {
  urlencoding::encode(raw).replace("%20", "+")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_and_get() {
    let params = QueryParams::parse("?q=british+museum&category=EAT%2CSEE&empty&utm=x");
    assert_eq!(params.get("q"), Some("british museum"));
    assert_eq!(params.get("category"), Some("EAT,SEE"));
    assert_eq!(params.get("empty"), Some(""));
    assert_eq!(params.get("missing"), None);
    assert!(params.contains("utm"));
  }

  #[test]
  fn test_keys_are_case_sensitive() {
    let params = QueryParams::parse("Q=cafe");
    assert_eq!(params.get("q"), None);
    assert_eq!(params.get("Q"), Some("cafe"));
  }

  #[test]
  fn test_set_keeps_position_and_dedupes() {
    let mut params = QueryParams::parse("a=1&tags=x&b=2&tags=y");
    params.set("tags", "z");
    assert_eq!(params.to_string(), "a=1&tags=z&b=2");

    params.set("q", "new");
    assert_eq!(params.to_string(), "a=1&tags=z&b=2&q=new");
  }

  #[test]
  fn test_delete() {
    let mut params = QueryParams::parse("q=a&keep=1&q=b");
    params.delete("q");
    assert_eq!(params.to_string(), "keep=1");
    params.delete("keep");
    assert!(params.is_empty());
  }

  #[test]
  fn test_encoding() {
    let mut params = QueryParams::new();
    params.append("q", "fish & chips");
    params.append("tags", "hidden-gem,rooftop");
    assert_eq!(params.to_string(), "q=fish+%26+chips&tags=hidden-gem%2Crooftop");
    assert_eq!(QueryParams::parse(&params.to_string()), params);
  }

  #[test]
  fn test_malformed_escape_is_lossy() {
    let params = QueryParams::parse("q=100%");
    assert_eq!(params.get("q"), Some("100%"));
  }
}
