//! Guard expression syntax checks
//!
//! A shallow scan, not a parser: catches the mistakes users make when
//! typing a condition at the prompt.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxIssue {
    Empty,
    /// Closing bracket with no matching opener, or a wrong one
    UnexpectedClose { offset: usize, found: char },
    /// Opener still unclosed at end of input
    Unclosed { offset: usize, opener: char },
    UnterminatedString { offset: usize },
    /// Expression starts with a binary operator
    LeadingOperator { found: char },
    /// Expression ends with a binary operator
    DanglingOperator { found: char },
}

impl fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxIssue::Empty => write!(f, "empty expression"),
            SyntaxIssue::UnexpectedClose { offset, found } => {
                write!(f, "unexpected '{}' at offset {}", found, offset)
            }
            SyntaxIssue::Unclosed { offset, opener } => {
                write!(f, "unclosed '{}' opened at offset {}", opener, offset)
            }
            SyntaxIssue::UnterminatedString { offset } => {
                write!(f, "unterminated string starting at offset {}", offset)
            }
            SyntaxIssue::LeadingOperator { found } => {
                write!(f, "expression starts with operator '{}'", found)
            }
            SyntaxIssue::DanglingOperator { found } => {
                write!(f, "expression ends with operator '{}'", found)
            }
        }
    }
}

const BINARY_ENDINGS: &[char] = &['+', '-', '*', '/', '%', '<', '>', '=', '&', '|', '^', ',', '.'];
const BINARY_STARTS: &[char] = &['*', '/', '%', '<', '>', '=', '&', '|', '^', ',', '.'];

fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Check a guard expression
pub fn check_guard_syntax(expr: &str) -> Result<(), SyntaxIssue> {
    let code = expr.trim();
    if code.is_empty() {
        return Err(SyntaxIssue::Empty);
    }

    let mut open: Vec<(usize, char)> = Vec::new();
    let mut chars = code.char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '(' | '[' | '{' => open.push((offset, c)),
            ')' | ']' | '}' => match open.pop() {
                Some((_, opener)) if closer_for(opener) == c => {}
                _ => return Err(SyntaxIssue::UnexpectedClose { offset, found: c }),
            },
            '"' | '\'' => {
                let mut escaped = false;
                let mut closed = false;
                for (_, s) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if s == '\\' {
                        escaped = true;
                    } else if s == c {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(SyntaxIssue::UnterminatedString { offset });
                }
            }
            _ => {}
        }
    }

    if let Some(&(offset, opener)) = open.last() {
        return Err(SyntaxIssue::Unclosed { offset, opener });
    }

    if let Some(first) = code.chars().next() {
        if BINARY_STARTS.contains(&first) {
            return Err(SyntaxIssue::LeadingOperator { found: first });
        }
    }
    if let Some(last) = code.chars().last() {
        if BINARY_ENDINGS.contains(&last) {
            return Err(SyntaxIssue::DanglingOperator { found: last });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_guards() {
        for expr in [
            "x > 1",
            "ready?",
            "items.empty? && !done",
            "name == \"a)b\"",
            "h[:k] == 'x'",
            "list.map { |v| v * 2 }.sum > 10",
            "-x < 0",
            "save!",
        ] {
            assert_eq!(check_guard_syntax(expr), Ok(()), "{}", expr);
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(check_guard_syntax("   "), Err(SyntaxIssue::Empty));
    }

    #[test]
    fn test_rejects_unclosed_paren() {
        assert_eq!(
            check_guard_syntax("x > bad syntax("),
            Err(SyntaxIssue::Unclosed {
                offset: 14,
                opener: '('
            })
        );
    }

    #[test]
    fn test_rejects_mismatched_close() {
        assert_eq!(
            check_guard_syntax("foo(1]"),
            Err(SyntaxIssue::UnexpectedClose {
                offset: 5,
                found: ']'
            })
        );
    }

    #[test]
    fn test_rejects_unterminated_string() {
        assert_eq!(
            check_guard_syntax("name == 'abc"),
            Err(SyntaxIssue::UnterminatedString { offset: 8 })
        );
    }

    #[test]
    fn test_escaped_quote_stays_inside_string() {
        assert_eq!(check_guard_syntax(r#"s == "a\"b""#), Ok(()));
    }

    #[test]
    fn test_rejects_dangling_and_leading_operators() {
        assert_eq!(
            check_guard_syntax("x >"),
            Err(SyntaxIssue::DanglingOperator { found: '>' })
        );
        assert_eq!(
            check_guard_syntax("== 3"),
            Err(SyntaxIssue::LeadingOperator { found: '=' })
        );
    }
}
