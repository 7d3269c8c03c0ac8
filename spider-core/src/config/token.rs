//! src/config/token.rs
//! ============================================================================
//! # Token: one unit of the config language

use std::fmt;

use compact_str::CompactString;

/// Keywords, in classification priority order.
pub const KEYWORDS: [(&str, TokenKind); 3] = [
    ("bind", TokenKind::Bind),
    ("exec", TokenKind::Exec),
    ("set", TokenKind::Set),
];

/// Setting names, checked after keywords.
pub const SETTING_NAMES: [(&str, TokenKind); 2] = [
    ("terminal", TokenKind::Terminal),
    ("visual", TokenKind::Visual),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Bind,
    /// Reserved; recognized but ignored by the interpreter.
    Exec,
    Set,

    /// Never produced by the lexer. The interpreter uses it to mean "a
    /// setting name is expected next".
    ConfigKey,
    Terminal,
    Visual,

    String,
}

impl TokenKind {
    pub const fn is_setting_name(self) -> bool {
        matches!(self, Self::Terminal | Self::Visual)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Only `String` tokens carry a payload.
    pub value: CompactString,
}

impl Token {
    pub const fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            value: CompactString::const_new(""),
        }
    }

    pub fn string(value: impl Into<CompactString>) -> Self {
        Self {
            kind: TokenKind::String,
            value: value.into(),
        }
    }

    /// Classify an unquoted word.
    pub fn word(word: &str) -> Self {
        KEYWORDS
            .iter()
            .chain(SETTING_NAMES.iter())
            .find(|(name, _)| *name == word)
            .map_or_else(|| Self::string(word), |(_, kind)| Self::new(*kind))
    }

    /// A `String` token with a non-empty payload.
    pub fn non_empty_string(&self) -> Option<&str> {
        (self.kind == TokenKind::String && !self.value.is_empty()).then_some(self.value.as_str())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String if self.value.is_empty() => write!(f, "String: Null"),
            TokenKind::String => write!(f, "String: {}", self.value),
            kind => write!(f, "{kind:?}"),
        }
    }
}
