use crate::query::{
    FieldArguments, ParseOptions, ParsedQuery, QueryError, Selector,
    lexer::{Token, TokenKind, tokenize},
};
use std::collections::{BTreeMap, BTreeSet};

///
/// Parser
///
/// Recursive-descent parser over the token stream of one query string.
/// Each `{ ... }` level is collected into a `LevelBuilder`, which enforces the
/// include/exclude rules before the level becomes a `ParsedQuery`.
///

pub(super) struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub(super) fn new(source: &'a str, options: ParseOptions) -> Result<Self, QueryError> {
        Ok(Self {
            source,
            tokens: tokenize(source)?,
            pos: 0,
            options,
        })
    }

    pub(super) fn parse(mut self) -> Result<ParsedQuery, QueryError> {
        if self.peek() == &TokenKind::End {
            return Err(self.error_here("empty query"));
        }

        let query = self.parse_query(0)?;
        if self.peek() != &TokenKind::End {
            return Err(self.error_here("unexpected trailing input"));
        }

        Ok(query)
    }

    // query := args? '{' selectors? '}'
    fn parse_query(&mut self, depth: usize) -> Result<ParsedQuery, QueryError> {
        let arguments = if self.peek() == &TokenKind::LParen {
            self.parse_arguments()?
        } else {
            BTreeMap::new()
        };

        self.expect(&TokenKind::LBrace)?;
        let mut level = LevelBuilder::default();

        if self.peek() != &TokenKind::RBrace {
            loop {
                self.parse_selector(depth, &mut level)?;
                if self.peek() == &TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.expect(&TokenKind::RBrace)?;

        level.finish(arguments)
    }

    // selector := '*' | '-' name | name | name args? '{' selectors? '}'
    fn parse_selector(&mut self, depth: usize, level: &mut LevelBuilder) -> Result<(), QueryError> {
        match self.peek().clone() {
            TokenKind::Star => {
                self.advance();
                level.wildcard();
            }
            TokenKind::Minus => {
                self.advance();
                let name = self.expect_name()?;
                level.exclude(name);
            }
            TokenKind::Name(name) => {
                self.advance();
                if matches!(self.peek(), TokenKind::LBrace | TokenKind::LParen) {
                    let nested_depth = depth + 1;
                    if let Some(max) = self.options.max_depth
                        && nested_depth > max
                    {
                        return Err(QueryError::format(format!(
                            "query nesting exceeds the maximum depth of {max} at field '{name}'"
                        )));
                    }
                    let nested = self.parse_query(nested_depth)?;
                    level.nested(name, nested);
                } else {
                    level.flat(name);
                }
            }
            _ => return Err(self.error_here("expected a field name, '*' or '-'")),
        }

        Ok(())
    }

    // args := '(' pair (',' pair)* ')'
    fn parse_arguments(&mut self) -> Result<BTreeMap<String, FieldArguments>, QueryError> {
        self.expect(&TokenKind::LParen)?;
        let mut arguments = BTreeMap::new();

        loop {
            let (field, args) = self.parse_argument_pair()?;
            if arguments.insert(field.clone(), args).is_some() {
                return Err(QueryError::format(format!(
                    "duplicate arguments for field '{field}'"
                )));
            }

            match self.peek().clone() {
                TokenKind::Comma => self.advance(),
                TokenKind::RParen => break,
                _ => return Err(self.error_here("expected ',' or ')' in argument block")),
            }
        }

        self.expect(&TokenKind::RParen)?;

        Ok(arguments)
    }

    // pair := name ':' name ('~' name)? | name '~' name
    fn parse_argument_pair(&mut self) -> Result<(String, FieldArguments), QueryError> {
        let field = self.expect_name()?;
        let mut args = FieldArguments::default();

        match self.peek().clone() {
            TokenKind::Colon => {
                self.advance();
                args.rename = Some(self.expect_name()?);
                if self.peek() == &TokenKind::Tilde {
                    self.advance();
                    args.filter = Some(self.expect_name()?);
                }
            }
            TokenKind::Tilde => {
                self.advance();
                args.filter = Some(self.expect_name()?);
            }
            _ => {
                return Err(self.error_here(format!(
                    "expected ':' or '~' after argument field '{field}'"
                )));
            }
        }

        Ok((field, args))
    }

    //
    // Token helpers
    //

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn current(&self) -> &Token {
        // tokenize always terminates the stream with End
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), QueryError> {
        if self.peek() == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.error_here(format!(
                "expected {}, found {}",
                kind.describe(),
                self.peek().describe()
            )))
        }
    }

    fn expect_name(&mut self) -> Result<String, QueryError> {
        if let TokenKind::Name(name) = self.peek() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error_here(format!(
                "expected a field name, found {}",
                self.peek().describe()
            )))
        }
    }

    fn error_here(&self, message: impl Into<String>) -> QueryError {
        QueryError::syntax(message, self.source, self.current().offset)
    }
}

///
/// LevelBuilder
/// Selectors collected for one brace level.
///

#[derive(Default)]
struct LevelBuilder {
    include: Vec<Selector>,
    exclude: BTreeSet<String>,
    flat_seen: BTreeSet<String>,
    has_wildcard: bool,
}

impl LevelBuilder {
    fn wildcard(&mut self) {
        if !self.has_wildcard {
            self.has_wildcard = true;
            self.include.push(Selector::Wildcard);
        }
    }

    fn flat(&mut self, name: String) {
        if self.flat_seen.insert(name.clone()) {
            self.include.push(Selector::Flat(name));
        }
    }

    fn nested(&mut self, name: String, query: ParsedQuery) {
        self.include.push(Selector::Nested(name, query));
    }

    fn exclude(&mut self, name: String) {
        self.exclude.insert(name);
    }

    fn finish(
        mut self,
        arguments: BTreeMap<String, FieldArguments>,
    ) -> Result<ParsedQuery, QueryError> {
        for selector in &self.include {
            if let Some(name) = selector.field()
                && self.exclude.contains(name)
            {
                return Err(QueryError::format(format!(
                    "field '{name}' is both selected and excluded"
                )));
            }
        }

        if !self.exclude.is_empty() {
            if let Some(name) = self.flat_seen.iter().next() {
                return Err(QueryError::format(format!(
                    "cannot include field '{name}' while excluding fields at the same level"
                )));
            }
            self.include
                .retain(|selector| matches!(selector, Selector::Nested(..)));
        }

        Ok(ParsedQuery::from_parts(self.include, self.exclude, arguments))
    }
}
