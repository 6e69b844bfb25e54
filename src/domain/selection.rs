use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Whether one or several items may be picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    Single,
    Multiple,
}

/// Outcome of a selection that was not rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    /// Chosen items, ordered by display index
    Chosen(Vec<T>),
    Cancelled,
}

/// Why a single token was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidToken {
    NotANumber(String),
    OutOfRange(String),
}

impl fmt::Display for InvalidToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidToken::NotANumber(token) => write!(f, "'{}' (not a number)", token),
            InvalidToken::OutOfRange(token) => write!(f, "'{}' (out of range)", token),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no items available for selection")]
    NoItems,
    #[error("no selection made")]
    Empty,
    #[error("no valid items selected")]
    NothingSelected,
    #[error("invalid input: {}", join_tokens(.0))]
    Invalid(Vec<InvalidToken>),
}

fn join_tokens(tokens: &[InvalidToken]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The token that cancels a selection, compared case-insensitively
pub const CANCEL_TOKEN: &str = "c";

/// Resolve raw input against a 0-indexed list.
///
/// Either every requested index is valid and returned, or the whole
/// input is rejected.
pub fn select<'a, T>(
    items: &'a [T],
    input: &str,
    mode: SelectMode,
) -> Result<Selection<&'a T>, SelectionError> {
    if items.is_empty() {
        return Err(SelectionError::NoItems);
    }

    let input = input.trim();
    if input.eq_ignore_ascii_case(CANCEL_TOKEN) {
        return Ok(Selection::Cancelled);
    }
    if input.is_empty() {
        return Err(SelectionError::Empty);
    }

    let tokens: Vec<&str> = match mode {
        SelectMode::Single => vec![input],
        SelectMode::Multiple => input
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect(),
    };

    let mut chosen = BTreeSet::new();
    let mut invalid = Vec::new();
    for token in tokens {
        match parse_index(token, items.len()) {
            Ok(index) => {
                chosen.insert(index);
            }
            Err(reason) => invalid.push(reason),
        }
    }

    if !invalid.is_empty() {
        return Err(SelectionError::Invalid(invalid));
    }
    if chosen.is_empty() {
        return Err(SelectionError::NothingSelected);
    }

    Ok(Selection::Chosen(chosen.into_iter().map(|i| &items[i]).collect()))
}

/// Parse a token made only of ASCII digits into an index below `len`
fn parse_index(token: &str, len: usize) -> Result<usize, InvalidToken> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return Err(InvalidToken::NotANumber(token.to_string()));
    }
    match token.parse::<usize>() {
        Ok(index) if index < len => Ok(index),
        // Too many digits for usize is out of range as well
        _ => Err(InvalidToken::OutOfRange(token.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ITEMS: [&str; 3] = ["a", "b", "c"];

    fn chosen(input: &str, mode: SelectMode) -> Vec<&'static str> {
        match select(&ITEMS, input, mode).unwrap() {
            Selection::Chosen(items) => items.into_iter().copied().collect(),
            Selection::Cancelled => panic!("unexpected cancel"),
        }
    }

    #[test]
    fn test_single_select() {
        assert_eq!(chosen("1", SelectMode::Single), vec!["b"]);
        assert_eq!(chosen("  2 ", SelectMode::Single), vec!["c"]);
    }

    #[test]
    fn test_single_select_rejects() {
        assert_eq!(
            select(&ITEMS, "3", SelectMode::Single),
            Err(SelectionError::Invalid(vec![InvalidToken::OutOfRange("3".into())]))
        );
        assert_eq!(
            select(&ITEMS, "x", SelectMode::Single),
            Err(SelectionError::Invalid(vec![InvalidToken::NotANumber("x".into())]))
        );
        assert_eq!(
            select(&ITEMS, "0,1", SelectMode::Single),
            Err(SelectionError::Invalid(vec![InvalidToken::NotANumber("0,1".into())]))
        );
        assert_eq!(
            select(&ITEMS, "-1", SelectMode::Single),
            Err(SelectionError::Invalid(vec![InvalidToken::NotANumber("-1".into())]))
        );
        assert_eq!(select(&ITEMS, "   ", SelectMode::Single), Err(SelectionError::Empty));
    }

    #[test]
    fn test_multi_select_dedups_and_sorts() {
        assert_eq!(chosen("2, 0,2", SelectMode::Multiple), vec!["a", "c"]);
        assert_eq!(chosen("1,,0", SelectMode::Multiple), vec!["a", "b"]);
    }

    #[test]
    fn test_multi_select_is_atomic() {
        assert_eq!(
            select(&ITEMS, "0,x,2", SelectMode::Multiple),
            Err(SelectionError::Invalid(vec![InvalidToken::NotANumber("x".into())]))
        );
        assert_eq!(
            select(&ITEMS, "0,7,y", SelectMode::Multiple),
            Err(SelectionError::Invalid(vec![
                InvalidToken::OutOfRange("7".into()),
                InvalidToken::NotANumber("y".into()),
            ]))
        );
    }

    #[test]
    fn test_multi_select_only_commas() {
        assert_eq!(
            select(&ITEMS, ",,", SelectMode::Multiple),
            Err(SelectionError::NothingSelected)
        );
    }

    #[test]
    fn test_cancel_token() {
        assert_eq!(select(&ITEMS, "c", SelectMode::Multiple), Ok(Selection::Cancelled));
        assert_eq!(select(&ITEMS, " C ", SelectMode::Single), Ok(Selection::Cancelled));
    }

    #[test]
    fn test_empty_list() {
        let empty: [&str; 0] = [];
        assert_eq!(select(&empty, "0", SelectMode::Single), Err(SelectionError::NoItems));
    }

    #[test]
    fn test_huge_index_is_out_of_range() {
        let input = "99999999999999999999999999";
        assert_eq!(
            select(&ITEMS, input, SelectMode::Single),
            Err(SelectionError::Invalid(vec![InvalidToken::OutOfRange(input.into())]))
        );
    }

    #[test]
    fn test_error_message_lists_tokens() {
        let err = select(&ITEMS, "0,x,9", SelectMode::Multiple).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input: 'x' (not a number), '9' (out of range)"
        );
    }
}
