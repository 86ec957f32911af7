use crate::query::QueryError;

///
/// TokenKind
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) enum TokenKind {
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Colon,
    Tilde,
    Minus,
    Star,
    Name(String),
    End,
}

impl TokenKind {
    // Human label used in "expected ..., found ..." messages.
    pub(super) fn describe(&self) -> String {
        match self {
            Self::LBrace => "'{'".to_string(),
            Self::RBrace => "'}'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::Comma => "','".to_string(),
            Self::Colon => "':'".to_string(),
            Self::Tilde => "'~'".to_string(),
            Self::Minus => "'-'".to_string(),
            Self::Star => "'*'".to_string(),
            Self::Name(name) => format!("name '{name}'"),
            Self::End => "end of query".to_string(),
        }
    }
}

///
/// Token
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token start in the source text.
    pub offset: usize,
}

/// Split query text into tokens; the result always ends with `TokenKind::End`.
pub(super) fn tokenize(source: &str) -> Result<Vec<Token>, QueryError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = match ch {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '~' => TokenKind::Tilde,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            c if is_name_start(c) => {
                let mut end = offset;
                while let Some(&(i, c)) = chars.peek() {
                    if !is_name_continue(c) {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Name(source[offset..end].to_string()),
                    offset,
                });
                continue;
            }
            other => {
                return Err(QueryError::syntax(
                    format!("unexpected character '{other}'"),
                    source,
                    offset,
                ));
            }
        };

        chars.next();
        tokens.push(Token { kind, offset });
    }

    tokens.push(Token {
        kind: TokenKind::End,
        offset: source.len(),
    });

    Ok(tokens)
}

const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("source should tokenize")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn tokenizes_argument_block_and_selectors() {
        assert_eq!(
            kinds("(a:b~c){ x_1 , -y }"),
            vec![
                TokenKind::LParen,
                TokenKind::Name("a".into()),
                TokenKind::Colon,
                TokenKind::Name("b".into()),
                TokenKind::Tilde,
                TokenKind::Name("c".into()),
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Name("x_1".into()),
                TokenKind::Comma,
                TokenKind::Minus,
                TokenKind::Name("y".into()),
                TokenKind::RBrace,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn token_offsets_point_into_source() {
        let tokens = tokenize("{  name}").expect("source should tokenize");

        assert_eq!(tokens[1].offset, 3);
        assert_eq!(tokens[3].offset, 8);
    }

    #[test]
    fn rejects_unknown_character_with_remaining_text() {
        let err = tokenize("{id, na$me}").expect_err("'$' is not a query character");

        assert_eq!(
            err,
            QueryError::Syntax {
                message: "unexpected character '$'".to_string(),
                offending: "$me}".to_string(),
                offset: 7,
            }
        );
    }

    #[test]
    fn names_cannot_start_with_digit() {
        assert!(tokenize("{1abc}").is_err());
    }
}
