//! Line grammar for the text harness.
//!
//! One query per line: `<operation> [sid:<session>] [key=value ...] [free text]`.
//! Bare words are folded into the operation's natural free-text field.
//! Meta-commands start with `/`:
//!
//! - **`/summary [session]`**: project one conversation's context
//! - **`/sessions`**: list tracked conversations
//! - **`/clear [session]`**: drop one conversation
//! - **`/quit`**: exit

use lectern_dispatch::{DEFAULT_SESSION, FunctionCall};
use lectern_schedule::{Operation, QueryParams};
use std::fmt;

/// A parsed harness command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Dispatch a function call.
    Call(FunctionCall),
    /// Show a session summary.
    Summary(String),
    /// List tracked sessions.
    Sessions,
    /// Clear a session.
    Clear(String),
    /// Exit the harness.
    Quit,
}

/// Error from parsing a harness line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line was empty.
    Empty,
    /// Unknown operation or meta-command.
    UnknownCommand { word: String },
    /// A key=value pair used an unknown key.
    UnknownKey { key: String },
    /// A value failed to parse.
    BadValue { key: String, value: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty line"),
            Self::UnknownCommand { word } => write!(f, "unknown command: {word}"),
            Self::UnknownKey { key } => write!(f, "unknown parameter: {key}"),
            Self::BadValue { key, value } => {
                write!(f, "bad value for {key}: {value}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// The field free text lands in for each operation.
fn free_text_field(operation: Operation) -> fn(&mut QueryParams) -> &mut Option<String> {
    match operation {
        Operation::SearchByTopic => |p| &mut p.topic,
        Operation::SearchBySpeaker => |p| &mut p.speaker_name,
        Operation::GetSessionDetails => |p| &mut p.session_query,
        Operation::SearchByType => |p| &mut p.session_type,
        _ => |p| &mut p.query,
    }
}

/// Parses one harness line.
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let mut tokens = line.split_whitespace();
    let Some(head) = tokens.next() else {
        return Err(ParseError::Empty);
    };

    match head {
        "/quit" | "/exit" => return Ok(Command::Quit),
        "/sessions" => return Ok(Command::Sessions),
        "/summary" => {
            let session = tokens.next().unwrap_or(DEFAULT_SESSION).to_string();
            return Ok(Command::Summary(session));
        }
        "/clear" => {
            let session = tokens.next().unwrap_or(DEFAULT_SESSION).to_string();
            return Ok(Command::Clear(session));
        }
        word if word.starts_with('/') => {
            return Err(ParseError::UnknownCommand {
                word: word.to_string(),
            });
        }
        _ => {}
    }

    let operation: Operation = head.parse().map_err(|_| ParseError::UnknownCommand {
        word: head.to_string(),
    })?;

    let mut call = FunctionCall::new(operation);
    let mut params = QueryParams::new();
    let mut free_text: Vec<&str> = Vec::new();

    for token in tokens {
        if let Some(session) = token.strip_prefix("sid:") {
            call.session_id = Some(session.to_string());
        } else if let Some((key, value)) = token.split_once('=') {
            match key {
                "topic" => params.topic = Some(value.to_string()),
                "speaker" | "speaker_name" => params.speaker_name = Some(value.to_string()),
                "session" | "session_query" => params.session_query = Some(value.to_string()),
                "type" | "session_type" => params.session_type = Some(value.to_string()),
                "query" => params.query = Some(value.to_string()),
                "limit" => {
                    params.limit = Some(value.parse().map_err(|_| ParseError::BadValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    })?);
                }
                _ => {
                    return Err(ParseError::UnknownKey {
                        key: key.to_string(),
                    });
                }
            }
        } else {
            free_text.push(token);
        }
    }

    if !free_text.is_empty() {
        let text = free_text.join(" ");
        let field = free_text_field(operation)(&mut params);
        if field.is_none() {
            *field = Some(text.clone());
        }
        call.user_query = Some(text);
    }

    call.parameters = params;
    Ok(Command::Call(call))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_operation_with_key_values() {
        let command = parse_line("search_by_speaker sid:call-1 speaker=Maria").expect("parse");
        let Command::Call(call) = command else {
            panic!("expected call");
        };

        assert_eq!(call.operation, Operation::SearchBySpeaker);
        assert_eq!(call.session_id.as_deref(), Some("call-1"));
        assert_eq!(call.parameters.speaker_name.as_deref(), Some("Maria"));
    }

    #[test]
    fn bare_words_fold_into_natural_field() {
        let command = parse_line("get_session_details tell me about the first one").expect("parse");
        let Command::Call(call) = command else {
            panic!("expected call");
        };

        assert_eq!(
            call.parameters.session_query.as_deref(),
            Some("tell me about the first one")
        );
        assert_eq!(
            call.user_query.as_deref(),
            Some("tell me about the first one")
        );
    }

    #[test]
    fn explicit_key_beats_free_text() {
        let command = parse_line("search_by_topic topic=rust anything related").expect("parse");
        let Command::Call(call) = command else {
            panic!("expected call");
        };
        assert_eq!(call.parameters.topic.as_deref(), Some("rust"));
    }

    #[test]
    fn meta_commands_parse() {
        assert_eq!(parse_line("/quit"), Ok(Command::Quit));
        assert_eq!(parse_line("/sessions"), Ok(Command::Sessions));
        assert_eq!(
            parse_line("/summary call-7"),
            Ok(Command::Summary("call-7".to_string()))
        );
        assert_eq!(
            parse_line("/clear"),
            Ok(Command::Clear(DEFAULT_SESSION.to_string()))
        );
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let err = parse_line("order_coffee large").expect_err("should fail");
        assert_eq!(
            err,
            ParseError::UnknownCommand {
                word: "order_coffee".to_string()
            }
        );
    }

    #[test]
    fn bad_limit_is_rejected() {
        let err = parse_line("get_full_schedule limit=lots").expect_err("should fail");
        assert!(matches!(err, ParseError::BadValue { .. }));
    }

    #[test]
    fn empty_line_is_rejected() {
        assert_eq!(parse_line("   "), Err(ParseError::Empty));
    }
}
