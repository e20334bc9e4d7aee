use crate::error::Diagnostic;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifiers and keywords — distinguished in the parser
    Word(String),
    /// Quoted string literal (content without quotes, escapes resolved)
    Str(String),
    /// Numeric literal
    Number(f64),
    // Punctuation
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Colon,
    Semicolon,
    Comma,
    Dot,
    Question,
    QuestionDot,
    // Operators
    Assign, // =
    Eq,     // ==
    Neq,    // !=
    Lt,
    Lte,
    Gt,
    Gte,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    AndAnd,
    OrOr,
    FatArrow,  // =>
    ThinArrow, // ->
    // End of input
    Eof,
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
    pub col: u32,
}

/// The fixed reserved-word set of the language. Declaration identifiers may
/// not collide with these; object-literal keys and member-access property
/// names may.
pub fn is_reserved_word(word: &str) -> bool {
    matches!(
        word,
        "entity"
            | "property"
            | "computed"
            | "derived"
            | "hasMany"
            | "hasOne"
            | "belongsTo"
            | "ref"
            | "through"
            | "with"
            | "command"
            | "when"
            | "guard"
            | "returns"
            | "mutate"
            | "emit"
            | "compute"
            | "effect"
            | "publish"
            | "persist"
            | "constraint"
            | "overrideable"
            | "on"
            | "behavior"
            | "policy"
            | "store"
            | "event"
            | "module"
            | "flow"
            | "http"
            | "storage"
            | "timer"
            | "custom"
            | "expose"
            | "compose"
            | "connect"
            | "in"
            | "and"
            | "or"
            | "not"
            | "is"
            | "contains"
            | "self"
            | "this"
            | "user"
            | "context"
            | "true"
            | "false"
            | "null"
            | "string"
            | "number"
            | "boolean"
            | "any"
            | "void"
            | "list"
            | "map"
    )
}

/// Tokenize source text. Lexical problems (unterminated strings, stray
/// characters) are reported as diagnostics, never failures: the lexer emits
/// its best-guess token and keeps going, so the parser always receives a
/// complete, `Eof`-terminated stream.
pub fn tokenize(src: &str) -> (Vec<Spanned>, Vec<Diagnostic>) {
    let mut tokens = Vec::new();
    let mut diagnostics = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0usize;
    let mut line: u32 = 1;
    let mut col: u32 = 1;

    macro_rules! bump {
        () => {{
            if chars[pos] == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
            pos += 1;
        }};
    }

    while pos < chars.len() {
        let c = chars[pos];
        let next = if pos + 1 < chars.len() {
            Some(chars[pos + 1])
        } else {
            None
        };

        // Line comment
        if c == '/' && next == Some('/') {
            while pos < chars.len() && chars[pos] != '\n' {
                bump!();
            }
            continue;
        }

        // Block comment
        if c == '/' && next == Some('*') {
            let start_line = line;
            let start_col = col;
            bump!();
            bump!();
            let mut closed = false;
            while pos < chars.len() {
                if chars[pos] == '*' && pos + 1 < chars.len() && chars[pos + 1] == '/' {
                    bump!();
                    bump!();
                    closed = true;
                    break;
                }
                bump!();
            }
            if !closed {
                diagnostics.push(Diagnostic::error(
                    "Unterminated block comment",
                    start_line,
                    start_col,
                ));
            }
            continue;
        }

        // Whitespace
        if c.is_whitespace() {
            bump!();
            continue;
        }

        let tok_line = line;
        let tok_col = col;

        // String literal
        if c == '"' {
            bump!();
            let mut s = String::new();
            let mut terminated = false;
            while pos < chars.len() {
                let sc = chars[pos];
                if sc == '"' {
                    bump!();
                    terminated = true;
                    break;
                }
                if sc == '\n' {
                    // Leave the newline for the main loop so line counting
                    // stays consistent.
                    break;
                }
                if sc == '\\' {
                    bump!();
                    if pos >= chars.len() {
                        break;
                    }
                    match chars[pos] {
                        '"' => s.push('"'),
                        '\\' => s.push('\\'),
                        'n' => s.push('\n'),
                        't' => s.push('\t'),
                        other => {
                            s.push('\\');
                            s.push(other);
                        }
                    }
                    bump!();
                    continue;
                }
                s.push(sc);
                bump!();
            }
            if !terminated {
                diagnostics.push(Diagnostic::error(
                    "Unterminated string literal",
                    tok_line,
                    tok_col,
                ));
            }
            tokens.push(Spanned {
                token: Token::Str(s),
                line: tok_line,
                col: tok_col,
            });
            continue;
        }

        // Number. A leading '-' is never part of the literal; negation is a
        // unary operator in the expression grammar.
        if c.is_ascii_digit() {
            let start = pos;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                bump!();
            }
            if pos < chars.len()
                && chars[pos] == '.'
                && pos + 1 < chars.len()
                && chars[pos + 1].is_ascii_digit()
            {
                bump!(); // consume '.'
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    bump!();
                }
            }
            let text: String = chars[start..pos].iter().collect();
            match text.parse::<f64>() {
                Ok(n) => tokens.push(Spanned {
                    token: Token::Number(n),
                    line: tok_line,
                    col: tok_col,
                }),
                Err(_) => diagnostics.push(Diagnostic::error(
                    format!("Invalid number literal '{}'", text),
                    tok_line,
                    tok_col,
                )),
            }
            continue;
        }

        // Identifier / keyword
        if c.is_alphabetic() || c == '_' {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                bump!();
            }
            let word: String = chars[start..pos].iter().collect();
            tokens.push(Spanned {
                token: Token::Word(word),
                line: tok_line,
                col: tok_col,
            });
            continue;
        }

        // Operators and punctuation. Two-character forms are matched first.
        let two = next.map(|n| (c, n));
        let token = match two {
            Some(('=', '=')) => {
                bump!();
                bump!();
                Some(Token::Eq)
            }
            Some(('=', '>')) => {
                bump!();
                bump!();
                Some(Token::FatArrow)
            }
            Some(('!', '=')) => {
                bump!();
                bump!();
                Some(Token::Neq)
            }
            Some(('<', '=')) => {
                bump!();
                bump!();
                Some(Token::Lte)
            }
            Some(('>', '=')) => {
                bump!();
                bump!();
                Some(Token::Gte)
            }
            Some(('-', '>')) => {
                bump!();
                bump!();
                Some(Token::ThinArrow)
            }
            Some(('?', '.')) => {
                bump!();
                bump!();
                Some(Token::QuestionDot)
            }
            Some(('&', '&')) => {
                bump!();
                bump!();
                Some(Token::AndAnd)
            }
            Some(('|', '|')) => {
                bump!();
                bump!();
                Some(Token::OrOr)
            }
            _ => None,
        };
        if let Some(token) = token {
            tokens.push(Spanned {
                token,
                line: tok_line,
                col: tok_col,
            });
            continue;
        }

        let token = match c {
            '{' => Some(Token::LBrace),
            '}' => Some(Token::RBrace),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            ':' => Some(Token::Colon),
            ';' => Some(Token::Semicolon),
            ',' => Some(Token::Comma),
            '.' => Some(Token::Dot),
            '?' => Some(Token::Question),
            '=' => Some(Token::Assign),
            '<' => Some(Token::Lt),
            '>' => Some(Token::Gt),
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '%' => Some(Token::Percent),
            '!' => Some(Token::Bang),
            _ => None,
        };
        match token {
            Some(token) => {
                bump!();
                tokens.push(Spanned {
                    token,
                    line: tok_line,
                    col: tok_col,
                });
            }
            None => {
                diagnostics.push(Diagnostic::error(
                    format!("Unexpected character '{}'", c),
                    tok_line,
                    tok_col,
                ));
                bump!();
            }
        }
    }

    tokens.push(Spanned {
        token: Token::Eof,
        line,
        col,
    });
    (tokens, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        let (tokens, diagnostics) = tokenize(src);
        assert!(diagnostics.is_empty(), "unexpected: {:?}", diagnostics);
        tokens.into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn words_and_punctuation() {
        assert_eq!(
            kinds("entity User {}"),
            vec![
                Token::Word("entity".into()),
                Token::Word("User".into()),
                Token::LBrace,
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn two_char_operators_win_over_single() {
        assert_eq!(
            kinds("== => != <= >= -> ?. && ||"),
            vec![
                Token::Eq,
                Token::FatArrow,
                Token::Neq,
                Token::Lte,
                Token::Gte,
                Token::ThinArrow,
                Token::QuestionDot,
                Token::AndAnd,
                Token::OrOr,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn minus_is_not_part_of_a_number() {
        assert_eq!(
            kinds("-42"),
            vec![Token::Minus, Token::Number(42.0), Token::Eof]
        );
    }

    #[test]
    fn decimal_numbers() {
        assert_eq!(kinds("3.14"), vec![Token::Number(3.14), Token::Eof]);
    }

    #[test]
    fn string_escapes_resolved() {
        assert_eq!(
            kinds(r#""a\"b\n""#),
            vec![Token::Str("a\"b\n".into()), Token::Eof]
        );
    }

    #[test]
    fn unterminated_string_recovers_with_partial_token() {
        let (tokens, diagnostics) = tokenize("\"oops\nentity User {}");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Unterminated string"));
        assert_eq!(tokens[0].token, Token::Str("oops".into()));
        assert_eq!(tokens[1].token, Token::Word("entity".into()));
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("// line\nentity /* block */ User"),
            vec![
                Token::Word("entity".into()),
                Token::Word("User".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn positions_are_one_based() {
        let (tokens, _) = tokenize("a\n  b");
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].col), (2, 3));
    }

    #[test]
    fn unexpected_character_is_skipped_with_diagnostic() {
        let (tokens, diagnostics) = tokenize("a @ b");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Unexpected character"));
        assert_eq!(tokens.len(), 3); // a, b, Eof
    }
}
