//! src/config/lexer.rs
//! ============================================================================
//! # Lexer: config text → flat token sequence
//!
//! Whitespace separates words, `#` starts a line comment, `"` starts a quoted
//! literal that runs to the next unescaped `"` (or to end of input). End of
//! input flushes a pending word. No semantic checks happen here.

use std::path::Path;

use compact_str::CompactString;
use tracing::trace;

use crate::{
    config::token::Token,
    error::{AppError, AppResult},
};

/// Scan `text` into tokens.
pub fn lex(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = CompactString::default();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '#' => {
                flush_word(&mut word, &mut tokens);
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
            }
            '"' => {
                flush_word(&mut word, &mut tokens);
                let mut literal = CompactString::default();
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' if chars.peek() == Some(&'"') => {
                            literal.push('"');
                            chars.next();
                        }
                        other => literal.push(other),
                    }
                }
                tokens.push(Token::string(literal));
            }
            c if c.is_whitespace() => flush_word(&mut word, &mut tokens),
            c => word.push(c),
        }
    }
    flush_word(&mut word, &mut tokens);

    trace!(count = tokens.len(), "Lexed config tokens");
    tokens
}

/// Read and scan a config file. A missing file is an empty token stream.
pub async fn lex_file(path: &Path) -> AppResult<Vec<Token>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(lex(&text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(AppError::ConfigIo {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn flush_word(word: &mut CompactString, tokens: &mut Vec<Token>) {
    if !word.is_empty() {
        tokens.push(Token::word(word));
        word.clear();
    }
}
