//! Command line tokenizer.
//!
//! Syntax: `<command-name> [token]*`, tokens separated by single spaces, each
//! token either `key` or `key=value`.

use crate::domain::ParameterMap;
use crate::error::ParseError;

/// A tokenized command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub name: String,
    pub params: ParameterMap,
}

/// Split one input line into a command name and its parameters.
///
/// A token with more than one `=` aborts the whole line; no partial map is
/// returned. A repeated key keeps its last value.
pub fn parse_line(line: &str) -> Result<CommandLine, ParseError> {
    let mut tokens = line.split(' ').filter(|token| !token.is_empty());

    let name = tokens
        .by_ref()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .ok_or(ParseError::NoCommand)?;

    let mut params = ParameterMap::new();
    for token in tokens {
        let mut parts = token.split('=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next();
        if parts.next().is_some() {
            return Err(ParseError::MalformedParameter(token.to_string()));
        }
        params.insert(key, value.map(str::to_string));
    }

    Ok(CommandLine {
        name: name.to_string(),
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_command_has_empty_parameters() {
        let parsed = parse_line("listbots").unwrap();
        assert_eq!(parsed.name, "listbots");
        assert!(parsed.params.is_empty());
    }

    #[test]
    fn keys_with_and_without_values() {
        let parsed = parse_line("botlog name=alpha verbose lines=20").unwrap();
        assert_eq!(parsed.name, "botlog");
        assert_eq!(parsed.params.len(), 3);
        assert_eq!(parsed.params.value("name"), Some("alpha"));
        assert_eq!(parsed.params.value("lines"), Some("20"));
        assert!(parsed.params.contains("verbose"));
        assert_eq!(parsed.params.value("verbose"), None);
    }

    #[test]
    fn token_with_two_equals_aborts_the_line() {
        let err = parse_line("cmd a=1 b c=3=4").unwrap_err();
        assert_eq!(err, ParseError::MalformedParameter("c=3=4".into()));
        assert!(err.to_string().contains("c=3=4"));
    }

    #[test]
    fn empty_and_blank_lines_have_no_command() {
        assert_eq!(parse_line(""), Err(ParseError::NoCommand));
        assert_eq!(parse_line("    "), Err(ParseError::NoCommand));
    }

    #[test]
    fn repeated_spaces_are_ignored() {
        let parsed = parse_line("  botstatus   name=alpha  ").unwrap();
        assert_eq!(parsed.name, "botstatus");
        assert_eq!(parsed.params.value("name"), Some("alpha"));
    }

    #[test]
    fn later_duplicate_key_wins() {
        let parsed = parse_line("botstatus name=alpha name=beta").unwrap();
        assert_eq!(parsed.params.len(), 1);
        assert_eq!(parsed.params.value("name"), Some("beta"));
    }

    #[test]
    fn trailing_equals_gives_empty_value() {
        let parsed = parse_line("cmd key=").unwrap();
        assert_eq!(parsed.params.value("key"), Some(""));
    }

    #[test]
    fn command_name_is_trimmed() {
        let parsed = parse_line("\thelp").unwrap();
        assert_eq!(parsed.name, "help");
    }

    #[test]
    fn leading_whitespace_tokens_are_skipped() {
        let parsed = parse_line("\t listbots").unwrap();
        assert_eq!(parsed.name, "listbots");
        assert!(parsed.params.is_empty());

        let parsed = parse_line(" \t botlog name=alpha").unwrap();
        assert_eq!(parsed.name, "botlog");
        assert_eq!(parsed.params.value("name"), Some("alpha"));
    }

    #[test]
    fn whitespace_only_line_has_no_command() {
        assert_eq!(parse_line("\t \t"), Err(ParseError::NoCommand));
    }
}
