use crate::license::expression::LicenseExpression;

/// Parenthesis nesting deeper than this is treated as malformed input.
const MAX_DEPTH: usize = 64;

/// Expressions with more tokens than this are treated as malformed input.
/// Operator chains build one tree level per operator, so this bounds the
/// recursion of every walk over the parsed tree.
const MAX_TOKENS: usize = 1024;

/// Parse a license expression.
///
/// Never fails: empty input, unbalanced parentheses, unknown operators or
/// characters, and operators missing an operand all produce
/// [`LicenseExpression::Invalid`].
///
/// Grammar (AND binds tighter than OR, keywords are case-insensitive):
/// ```text
/// expr     := or_expr
/// or_expr  := and_expr ( "OR" and_expr )*
/// and_expr := atom ( "AND" atom )*
/// atom     := "(" or_expr ")" | id [ "+" ]
/// ```
pub fn parse(raw: &str) -> LicenseExpression {
    let Some(tokens) = tokenize(raw) else {
        return LicenseExpression::Invalid;
    };
    if tokens.is_empty() || tokens.len() > MAX_TOKENS {
        return LicenseExpression::Invalid;
    }

    let mut parser = ExprParser {
        tokens,
        pos: 0,
        depth: 0,
    };
    match parser.parse_or() {
        Some(expr) if parser.peek().is_none() => expr,
        _ => LicenseExpression::Invalid,
    }
}

#[derive(Debug, PartialEq, Clone)]
enum Token {
    Id(String),
    /// An identifier immediately followed by `+`.
    OrLater(String),
    And,
    Or,
    LParen,
    RParen,
}

/// Split `expr` into tokens, or `None` when it contains something that is
/// neither an identifier, a keyword, nor a parenthesis.
fn tokenize(expr: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        match c {
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            c if c.is_ascii_alphanumeric() => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if !(c.is_ascii_alphanumeric() || c == '-' || c == '.') {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                if word.ends_with('-') || word.ends_with('.') {
                    return None;
                }
                let or_later = chars.peek() == Some(&'+');
                if or_later {
                    chars.next();
                }
                let token = if word.eq_ignore_ascii_case("AND") {
                    Token::And
                } else if word.eq_ignore_ascii_case("OR") {
                    Token::Or
                } else if word.eq_ignore_ascii_case("WITH") {
                    return None;
                } else if or_later {
                    Token::OrLater(word)
                } else {
                    Token::Id(word)
                };
                // "AND+" is not a thing
                if or_later && !matches!(token, Token::OrLater(_)) {
                    return None;
                }
                tokens.push(token);
            }
            _ => return None,
        }
    }
    Some(tokens)
}

/// Recursive descent over the token stream. Each level answers `None` on
/// malformed input; [`parse`] collapses that into `Invalid`.
struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    /// Parse an OR-level expression (lowest precedence).
    fn parse_or(&mut self) -> Option<LicenseExpression> {
        let mut result = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.consume();
            let rhs = self.parse_and()?;
            result = LicenseExpression::or(result, rhs);
        }
        Some(result)
    }

    /// Parse an AND-level expression (higher precedence than OR).
    fn parse_and(&mut self) -> Option<LicenseExpression> {
        let mut result = self.parse_atom()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.consume();
            let rhs = self.parse_atom()?;
            result = LicenseExpression::and(result, rhs);
        }
        Some(result)
    }

    fn parse_atom(&mut self) -> Option<LicenseExpression> {
        match self.consume()? {
            Token::LParen => {
                self.depth += 1;
                if self.depth > MAX_DEPTH {
                    return None;
                }
                let inner = self.parse_or()?;
                if self.consume()? != Token::RParen {
                    return None;
                }
                self.depth -= 1;
                Some(inner)
            }
            Token::Id(name) => Some(LicenseExpression::Identifier(name)),
            Token::OrLater(name) => Some(LicenseExpression::OrLater(name)),
            Token::And | Token::Or | Token::RParen => None,
        }
    }
}
