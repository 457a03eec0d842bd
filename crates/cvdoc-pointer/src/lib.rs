//! RFC 6901 JSON Pointer handling for the cvdoc document tree.
//!
//! Pointers address locations inside a document: `""` is the whole
//! document, `/basics/name` a member, `/sections/skills/items/0` an
//! array element. Tokens are stored **unescaped**; escaping (`~0` for
//! `~`, `~1` for `/`) only exists on the wire.
//!
//! Rules:
//! - a non-empty pointer must start with `/`
//! - `~` must be followed by `0` or `1`; anything else is a parse error
//! - array index tokens are `0` or `[1-9][0-9]*` (no leading zeros,
//!   no sign); the literal `-` is the append position

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A parsed JSON Pointer: an ordered list of unescaped reference tokens.
///
/// The empty token list is the root pointer (the whole document).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer {
    tokens: Vec<String>,
}

/// Why a pointer string failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerParseError {
    /// Non-empty pointer text did not start with `/`.
    NoLeadingSlash,
    /// A `~` escape was not followed by `0` or `1`.
    InvalidEscape {
        /// Byte offset of the offending `~` in the input.
        position: usize,
    },
}

impl fmt::Display for PointerParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerParseError::NoLeadingSlash => {
                write!(f, "missing leading '/'")
            }
            PointerParseError::InvalidEscape { position } => {
                write!(f, "invalid '~' escape at byte {position} (expected '~0' or '~1')")
            }
        }
    }
}

impl std::error::Error for PointerParseError {}

impl Pointer {
    /// The root pointer (`""`), addressing the whole document.
    pub fn root() -> Self {
        Pointer { tokens: Vec::new() }
    }

    /// Parse RFC 6901 pointer text.
    ///
    /// `""` parses to the root pointer. `"/"` parses to a single empty
    /// token (the member named `""`), per the RFC.
    pub fn parse(text: &str) -> Result<Self, PointerParseError> {
        if text.is_empty() {
            return Ok(Pointer::root());
        }
        if !text.starts_with('/') {
            return Err(PointerParseError::NoLeadingSlash);
        }

        let mut tokens = Vec::new();
        let mut token = String::new();
        let mut chars = text.char_indices().skip(1).peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '/' => {
                    tokens.push(std::mem::take(&mut token));
                }
                '~' => match chars.next() {
                    Some((_, '0')) => token.push('~'),
                    Some((_, '1')) => token.push('/'),
                    _ => return Err(PointerParseError::InvalidEscape { position: pos }),
                },
                other => token.push(other),
            }
        }
        tokens.push(token);

        Ok(Pointer { tokens })
    }

    /// Build a pointer from already-unescaped tokens.
    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Pointer {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Unescaped reference tokens, in order. Empty for the root pointer.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of reference tokens.
    pub fn depth(&self) -> usize {
        self.tokens.len()
    }

    /// The final token, if any.
    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Split into (parent tokens, final token). `None` for the root.
    pub fn split_last(&self) -> Option<(&[String], &str)> {
        let (last, parent) = self.tokens.split_last()?;
        Some((parent, last.as_str()))
    }

    /// The parent pointer, if any (`/a/b` -> `/a`; `/a` -> `""`).
    pub fn parent(&self) -> Option<Pointer> {
        let (parent, _) = self.split_last()?;
        Some(Pointer {
            tokens: parent.to_vec(),
        })
    }

    /// Append one token in place. Used for building paths while walking
    /// a tree; pair with [`Pointer::pop`].
    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// Remove the final token, if any.
    pub fn pop(&mut self) -> Option<String> {
        self.tokens.pop()
    }

    /// Child pointer with one extra token.
    pub fn child(&self, token: impl Into<String>) -> Pointer {
        let mut tokens = self.tokens.clone();
        tokens.push(token.into());
        Pointer { tokens }
    }

    /// True when `self` addresses `other` or one of its ancestors.
    ///
    /// The root pointer is a prefix of everything (including itself).
    pub fn is_prefix_of(&self, other: &Pointer) -> bool {
        other.tokens.len() >= self.tokens.len()
            && self.tokens.iter().zip(other.tokens.iter()).all(|(a, b)| a == b)
    }

    /// True when `self` addresses a strict ancestor of `other`.
    pub fn is_proper_prefix_of(&self, other: &Pointer) -> bool {
        self.tokens.len() < other.tokens.len() && self.is_prefix_of(other)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str("/")?;
            for c in token.chars() {
                match c {
                    '~' => f.write_str("~0")?,
                    '/' => f.write_str("~1")?,
                    other => write!(f, "{other}")?,
                }
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Pointer {
    type Err = PointerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pointer::parse(s)
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Pointer::parse(&text).map_err(|e| D::Error::custom(format!("invalid JSON pointer '{text}': {e}")))
    }
}

/// Interpretation of a reference token against an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayToken {
    /// A concrete element index.
    Index(usize),
    /// The literal `-`: the position past the final element.
    Append,
}

impl ArrayToken {
    /// Classify a token per the RFC array-index grammar.
    ///
    /// Returns `None` for tokens that are not valid against an array
    /// (`"01"`, `"+1"`, `"one"`, `""`).
    pub fn parse(token: &str) -> Option<ArrayToken> {
        if token == "-" {
            return Some(ArrayToken::Append);
        }
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Leading zeros are only valid for "0" itself.
        if token.len() > 1 && token.starts_with('0') {
            return None;
        }
        token.parse().ok().map(ArrayToken::Index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_parses_from_empty_text() {
        let p = Pointer::parse("").unwrap();
        assert!(p.is_root());
        assert_eq!(p.to_string(), "");
    }

    #[test]
    fn single_slash_is_the_empty_member() {
        let p = Pointer::parse("/").unwrap();
        assert_eq!(p.tokens(), &[String::new()]);
        assert_eq!(p.to_string(), "/");
    }

    #[test]
    fn tokens_are_unescaped() {
        let p = Pointer::parse("/a~1b/c~0d/e").unwrap();
        assert_eq!(p.tokens(), &["a/b".to_string(), "c~d".to_string(), "e".to_string()]);
    }

    #[test]
    fn display_reescapes() {
        let p = Pointer::from_tokens(["a/b", "c~d"]);
        assert_eq!(p.to_string(), "/a~1b/c~0d");
        assert_eq!(Pointer::parse(&p.to_string()).unwrap(), p);
    }

    #[test]
    fn missing_leading_slash_is_rejected() {
        assert_eq!(
            Pointer::parse("basics/name").unwrap_err(),
            PointerParseError::NoLeadingSlash
        );
    }

    #[test]
    fn invalid_escapes_are_rejected() {
        assert!(matches!(
            Pointer::parse("/a~2b").unwrap_err(),
            PointerParseError::InvalidEscape { .. }
        ));
        // A trailing lone '~' is also invalid.
        assert!(matches!(
            Pointer::parse("/a~").unwrap_err(),
            PointerParseError::InvalidEscape { .. }
        ));
    }

    #[test]
    fn parent_and_last() {
        let p = Pointer::parse("/sections/skills/items/0").unwrap();
        assert_eq!(p.last(), Some("0"));
        assert_eq!(p.parent().unwrap().to_string(), "/sections/skills/items");
        assert_eq!(Pointer::root().parent(), None);
    }

    #[test]
    fn prefix_relations() {
        let a = Pointer::parse("/sections").unwrap();
        let b = Pointer::parse("/sections/skills").unwrap();
        assert!(a.is_prefix_of(&b));
        assert!(a.is_proper_prefix_of(&b));
        assert!(a.is_prefix_of(&a));
        assert!(!a.is_proper_prefix_of(&a));
        assert!(!b.is_prefix_of(&a));
        assert!(Pointer::root().is_prefix_of(&a));
    }

    #[test]
    fn array_token_grammar() {
        assert_eq!(ArrayToken::parse("-"), Some(ArrayToken::Append));
        assert_eq!(ArrayToken::parse("0"), Some(ArrayToken::Index(0)));
        assert_eq!(ArrayToken::parse("17"), Some(ArrayToken::Index(17)));
        assert_eq!(ArrayToken::parse("01"), None);
        assert_eq!(ArrayToken::parse("+1"), None);
        assert_eq!(ArrayToken::parse("-1"), None);
        assert_eq!(ArrayToken::parse(""), None);
        assert_eq!(ArrayToken::parse("one"), None);
    }

    #[test]
    fn serde_round_trips_as_string() {
        let p = Pointer::parse("/a~1b/0").unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"/a~1b/0\"");
        let back: Pointer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn serde_rejects_malformed_text() {
        let err = serde_json::from_str::<Pointer>("\"no-slash\"").unwrap_err();
        assert!(err.to_string().contains("missing leading '/'"));
    }
}
