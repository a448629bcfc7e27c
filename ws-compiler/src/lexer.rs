//! Source text to tokens. `--` starts a comment that runs to the end of the
//! line; comments never reach the token stream.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use ws_ir::{Literal, Radix};

use crate::error::LexError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Number(Literal),
    Ident(String),

    If,
    Then,
    End,
    Goto,
    Return,
    And,
    Or,
    Not,

    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    Amp,
    Pipe,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    NotEq,
    Shl,
    Shr,

    Dot,
    Comma,
    Assign,
    Colon,
    /// `::`, on both sides of a label name.
    LabelDelim,
    LParen,
    RParen,
    LBracket,
    RBracket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Number(lit) => return write!(f, "number {lit}"),
            TokenKind::Ident(name) => return write!(f, "identifier `{name}`"),
            TokenKind::If => "if",
            TokenKind::Then => "then",
            TokenKind::End => "end",
            TokenKind::Goto => "goto",
            TokenKind::Return => "return",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Bang => "!",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Le => "<=",
            TokenKind::Ge => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Assign => "=",
            TokenKind::Colon => ":",
            TokenKind::LabelDelim => "::",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
        };
        write!(f, "`{text}`")
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    for (i, text) in source.lines().enumerate() {
        lex_line(strip_comment(text), i + 1, &mut tokens)?;
    }
    Ok(tokens)
}

/// Cut `line` at the first `--` that is not inside a quoted run.
pub fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    let mut escaped = false;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '-') if chars.peek().is_some_and(|&(_, next)| next == '-') => {
                return line[..i].trim_end();
            }
            (None, _) => {}
        }
    }
    line
}

fn lex_line(text: &str, line: usize, tokens: &mut Vec<Token>) -> Result<(), LexError> {
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let kind = match c {
            c if c.is_whitespace() => continue,
            '0'..='9' => {
                let end = take_word(&mut chars, start);
                number(&text[start..end], line)?
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let end = take_word(&mut chars, start);
                keyword_or_ident(&text[start..end])
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '&' => TokenKind::Amp,
            '|' => TokenKind::Pipe,
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '!' if eat(&mut chars, '=') => TokenKind::NotEq,
            '!' => TokenKind::Bang,
            '=' if eat(&mut chars, '=') => TokenKind::EqEq,
            '=' => TokenKind::Assign,
            '<' if eat(&mut chars, '=') => TokenKind::Le,
            '<' if eat(&mut chars, '<') => TokenKind::Shl,
            '<' => TokenKind::Lt,
            '>' if eat(&mut chars, '=') => TokenKind::Ge,
            '>' if eat(&mut chars, '>') => TokenKind::Shr,
            '>' => TokenKind::Gt,
            ':' if eat(&mut chars, ':') => TokenKind::LabelDelim,
            ':' => TokenKind::Colon,
            ch => return Err(LexError::UnexpectedChar { ch, line }),
        };
        tokens.push(Token { kind, line });
    }
    Ok(())
}

fn eat(chars: &mut Peekable<CharIndices<'_>>, expected: char) -> bool {
    chars.next_if(|&(_, c)| c == expected).is_some()
}

/// Consume the rest of an identifier-like run whose first (ASCII) character
/// sits at `start`; returns its end index.
fn take_word(chars: &mut Peekable<CharIndices<'_>>, start: usize) -> usize {
    let mut end = start + 1;
    while let Some((i, c)) = chars.next_if(|&(_, c)| c.is_ascii_alphanumeric() || c == '_') {
        end = i + c.len_utf8();
    }
    end
}

fn number(text: &str, line: usize) -> Result<TokenKind, LexError> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).map(|value| Literal {
            value,
            radix: Radix::Hex,
        }),
        None => text.parse::<u32>().map(|value| Literal {
            value,
            radix: Radix::Decimal,
        }),
    };
    parsed.map(TokenKind::Number).map_err(|_| LexError::BadNumber {
        text: text.to_string(),
        line,
    })
}

fn keyword_or_ident(word: &str) -> TokenKind {
    match word {
        "if" => TokenKind::If,
        "then" => TokenKind::Then,
        "end" => TokenKind::End,
        "goto" => TokenKind::Goto,
        "return" => TokenKind::Return,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        _ => TokenKind::Ident(word.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.into())
    }

    #[test]
    fn operators_take_the_longest_match() {
        assert_eq!(
            kinds("<= < << >= > >> == = != ! :: :"),
            [
                TokenKind::Le,
                TokenKind::Lt,
                TokenKind::Shl,
                TokenKind::Ge,
                TokenKind::Gt,
                TokenKind::Shr,
                TokenKind::EqEq,
                TokenKind::Assign,
                TokenKind::NotEq,
                TokenKind::Bang,
                TokenKind::LabelDelim,
                TokenKind::Colon,
            ]
        );
    }

    #[test]
    fn numbers_keep_their_radix() {
        assert_eq!(
            kinds("1580 0xC22"),
            [
                TokenKind::Number(Literal {
                    value: 1580,
                    radix: Radix::Decimal
                }),
                TokenKind::Number(Literal {
                    value: 0xC22,
                    radix: Radix::Hex
                }),
            ]
        );
    }

    #[test]
    fn keywords_and_names() {
        assert_eq!(
            kinds("if Savemap.game_progress then end"),
            [
                TokenKind::If,
                ident("Savemap"),
                TokenKind::Dot,
                ident("game_progress"),
                TokenKind::Then,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn comments_are_dropped() {
        assert!(kinds("-- only a comment").is_empty());
        assert_eq!(kinds("return -- done"), [TokenKind::Return]);
        assert_eq!(kinds("a - b"), [ident("a"), TokenKind::Minus, ident("b")]);
    }

    #[test]
    fn dashes_inside_quotes_are_not_comments() {
        assert_eq!(strip_comment("x = \"a--b\" -- c"), "x = \"a--b\"");
        assert_eq!(strip_comment("'--'"), "'--'");
        assert_eq!(strip_comment("\\'x -- y"), "\\'x");
    }

    #[test]
    fn lines_are_counted() {
        let tokens = tokenize("Entity.stop()\n\n-- c\nreturn").unwrap();
        assert_eq!(tokens.last().map(|t| t.line), Some(4));
    }

    #[test]
    fn bad_input() {
        assert_eq!(
            tokenize("x = 1\ny = $2").unwrap_err(),
            LexError::UnexpectedChar { ch: '$', line: 2 }
        );
        assert_eq!(
            tokenize("12ab").unwrap_err(),
            LexError::BadNumber {
                text: "12ab".into(),
                line: 1
            }
        );
        assert!(matches!(tokenize("0x").unwrap_err(), LexError::BadNumber { .. }));
        assert!(matches!(
            tokenize("4294967296").unwrap_err(),
            LexError::BadNumber { .. }
        ));
    }
}
