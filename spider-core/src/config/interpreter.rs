//! src/config/interpreter.rs
//! ============================================================================
//! # Interpreter: tokens → settings and bindings
//!
//! A single forward pass with one "expected next" cursor. The language is a
//! flat list of `set NAME VALUE` and `bind KEY "TEMPLATE"` statements; anything
//! the pass cannot make sense of is skipped and scanning continues with the
//! next token. Interpretation never fails.

use spider_screen::Settings;
use tracing::{debug, trace};

use crate::config::{
    bindings::Bindings,
    token::{Token, TokenKind},
};

/// Apply `tokens` to `settings` and `bindings`.
pub fn interpret(tokens: &[Token], settings: &mut Settings, bindings: &mut Bindings) {
    let mut expected = TokenKind::String;
    let mut cursor = tokens.iter();

    while let Some(token) = cursor.next() {
        match token.kind {
            TokenKind::Set => expected = TokenKind::ConfigKey,

            TokenKind::Bind => {
                let Some(key_token) = cursor.next() else {
                    trace!("Dangling bind at end of input");
                    return;
                };
                let Some(key) = single_char(key_token) else {
                    trace!(token = %key_token, "Bind key is not a single character");
                    continue;
                };

                let Some(template_token) = cursor.next() else {
                    trace!(key = %key, "Bind without template at end of input");
                    return;
                };
                let Some(template) = template_token.non_empty_string() else {
                    trace!(key = %key, token = %template_token, "Bind template is empty");
                    continue;
                };

                debug!(key = %key, template, "Bound key to command");
                bindings.bind_command(key, template);
            }

            kind if kind.is_setting_name() => {
                if expected != TokenKind::ConfigKey {
                    continue;
                }
                expected = kind;

                let Some(value_token) = cursor.next() else {
                    return;
                };
                let Some(value) = value_token.non_empty_string() else {
                    trace!(setting = ?kind, "Setting without value");
                    continue;
                };

                match kind {
                    TokenKind::Terminal => settings.terminal = value.to_string(),
                    TokenKind::Visual => settings.editor = value.to_string(),
                    _ => {}
                }
                debug!(setting = ?kind, value, "Applied setting");
            }

            _ => {}
        }
    }
}

fn single_char(token: &Token) -> Option<char> {
    let value = token.non_empty_string()?;
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        bindings::{BindingAction, BuiltinAction, CommandTemplate},
        lexer::lex,
    };
    use std::path::Path;

    fn run(text: &str) -> (Settings, Bindings) {
        let mut settings = Settings::default();
        let mut bindings = Bindings::new();
        interpret(&lex(text), &mut settings, &mut bindings);
        (settings, bindings)
    }

    fn template(bindings: &Bindings, key: char) -> Option<&str> {
        bindings.template(key).map(CommandTemplate::as_str)
    }

    #[test]
    fn test_set_terminal() {
        let (settings, _) = run("set terminal \"urxvt\"");
        assert_eq!(settings.terminal, "urxvt");
    }

    #[test]
    fn test_set_visual_unquoted() {
        let (settings, _) = run("set visual ed");
        assert_eq!(settings.editor, "ed");
    }

    #[test]
    fn test_bind_expands_placeholder() {
        let (_, bindings) = run("bind c \"echo %F\"");
        let command = bindings.template('c').unwrap();
        assert_eq!(command.expand(Path::new("/tmp")), "echo /tmp");
    }

    #[test]
    fn test_later_bind_overwrites() {
        let (_, bindings) = run("bind x \"first\"\nbind x \"second\"");
        assert_eq!(bindings.len(), 1);
        assert_eq!(template(&bindings, 'x'), Some("second"));
    }

    #[test]
    fn test_full_line_comment_is_transparent() {
        let with_comment = "bind a \"one %F\"\n# set visual nope\nset terminal st\n";
        let without = "bind a \"one %F\"\nset terminal st\n";

        let (settings_a, bindings_a) = run(with_comment);
        let (settings_b, bindings_b) = run(without);

        assert_eq!(settings_a, settings_b);
        assert_eq!(bindings_a, bindings_b);
        assert_eq!(settings_a.terminal, "st");
    }

    #[test]
    fn test_trailing_bare_bind_keeps_prior_entries() {
        let (settings, bindings) = run("bind D \"rm -rf %F\"\nset visual \"ed\"\nbind\n");
        assert_eq!(template(&bindings, 'D'), Some("rm -rf %F"));
        assert_eq!(settings.editor, "ed");
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn test_multi_char_key_is_skipped_without_reinterpreting() {
        // `xy` fails, so the template token is read as a stray string.
        let (_, bindings) = run("bind xy \"echo\" bind z \"ok\"");
        assert_eq!(bindings.len(), 1);
        assert_eq!(template(&bindings, 'z'), Some("ok"));
    }

    #[test]
    fn test_failed_key_token_is_consumed() {
        // The keyword in key position is consumed as the failure point, so
        // the following statement is never started.
        let (settings, bindings) = run("bind set visual ed");
        assert!(bindings.is_empty());
        assert_eq!(settings.editor, Settings::default().editor);
    }

    #[test]
    fn test_empty_template_is_rejected() {
        let (_, bindings) = run("bind x \"\"\nbind y \"ok\"");
        assert!(bindings.get('x').is_none());
        assert_eq!(template(&bindings, 'y'), Some("ok"));
    }

    #[test]
    fn test_setting_name_without_set_is_ignored() {
        let (settings, _) = run("terminal kitty");
        assert_eq!(settings.terminal, Settings::default().terminal);
    }

    #[test]
    fn test_expectation_resets_after_assignment() {
        let (settings, _) = run("set terminal kitty visual ed");
        assert_eq!(settings.terminal, "kitty");
        assert_eq!(settings.editor, Settings::default().editor);
    }

    #[test]
    fn test_empty_value_discards_assignment() {
        let (settings, _) = run("set terminal \"\" set visual ed");
        assert_eq!(settings.terminal, Settings::default().terminal);
        assert_eq!(settings.editor, "ed");
    }

    #[test]
    fn test_exec_is_ignored() {
        let (settings, bindings) = run("exec \"make\" set visual ed");
        assert!(bindings.is_empty());
        assert_eq!(settings.editor, "ed");
    }

    #[test]
    fn test_bind_overrides_builtin_default() {
        let mut settings = Settings::default();
        let mut bindings = Bindings::with_defaults();
        interpret(&lex("bind D \"trash %F\""), &mut settings, &mut bindings);

        assert_eq!(template(&bindings, 'D'), Some("trash %F"));
        assert_eq!(
            bindings.get('j').map(|b| &b.action),
            Some(&BindingAction::Builtin(BuiltinAction::Down))
        );
    }

    #[test]
    fn test_unicode_key() {
        let (_, bindings) = run("bind é \"echo accent\"");
        assert_eq!(template(&bindings, 'é'), Some("echo accent"));
    }
}
