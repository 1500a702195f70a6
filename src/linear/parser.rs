use crate::error::{Result, TutorError};
use crate::linear::fraction::Fraction;
use crate::linear::LinearExpr;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(i64),
    X,
    Plus,
    Minus,
    Times,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' => {
                let mut value: i64 = 0;
                while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(d as i64))
                        .ok_or_else(|| TutorError::parse(input, "number too large"))?;
                    chars.next();
                }
                tokens.push(Token::Number(value));
            }
            'x' | 'X' => {
                chars.next();
                tokens.push(Token::X);
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' | '\u{2212}' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' | '\u{00d7}' | '\u{00b7}' => {
                chars.next();
                tokens.push(Token::Times);
            }
            '/' | '\u{00f7}' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            other => {
                return Err(TutorError::parse(input, format!("unexpected character '{other}'")));
            }
        }
    }

    Ok(tokens)
}

/// Recursive-descent parser for linear expressions in `x`:
///
/// ```text
/// expr   := ['-'] term (('+' | '-') term)*
/// term   := factor (('*' factor) | ('/' number))*
/// factor := number ['x' | '(' expr ')'] | 'x' | '(' expr ')'
/// ```
///
/// Products of two `x`-terms are rejected.
struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn error(&self, reason: impl Into<String>) -> TutorError {
        TutorError::parse(self.input, reason)
    }

    fn overflow(&self) -> TutorError {
        self.error("number too large")
    }

    fn expr(&mut self) -> Result<LinearExpr> {
        let negate = if self.peek() == Some(Token::Minus) {
            self.bump();
            true
        } else {
            false
        };

        let first = self.term()?;
        let mut acc = if negate {
            first.checked_neg().ok_or_else(|| self.overflow())?
        } else {
            first
        };

        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.bump();
                    let rhs = self.term()?;
                    acc = acc.checked_add(&rhs).ok_or_else(|| self.overflow())?;
                }
                Token::Minus => {
                    self.bump();
                    let rhs = self.term()?;
                    acc = acc.checked_sub(&rhs).ok_or_else(|| self.overflow())?;
                }
                _ => break,
            }
        }

        Ok(acc)
    }

    fn term(&mut self) -> Result<LinearExpr> {
        let mut acc = self.factor()?;

        loop {
            match self.peek() {
                Some(Token::Times) => {
                    self.bump();
                    let rhs = self.factor()?;
                    if !acc.is_constant() && !rhs.is_constant() {
                        return Err(self.error("expression is not linear"));
                    }
                    acc = acc.product(&rhs).ok_or_else(|| self.overflow())?;
                }
                Some(Token::Slash) => {
                    self.bump();
                    let divisor = match self.bump() {
                        Some(Token::Number(n)) => n,
                        _ => return Err(self.error("expected a number after '/'")),
                    };
                    if divisor == 0 {
                        return Err(self.error("division by zero"));
                    }
                    acc = acc
                        .divide(Fraction::integer(divisor))
                        .ok_or_else(|| self.overflow())?;
                }
                _ => break,
            }
        }

        Ok(acc)
    }

    fn factor(&mut self) -> Result<LinearExpr> {
        match self.bump() {
            Some(Token::Number(n)) => {
                let scale = Fraction::integer(n);
                match self.peek() {
                    Some(Token::X) => {
                        self.bump();
                        Ok(LinearExpr::new(scale, Fraction::ZERO))
                    }
                    Some(Token::LParen) => {
                        self.bump();
                        let inner = self.group()?;
                        inner.scale(scale).ok_or_else(|| self.overflow())
                    }
                    _ => Ok(LinearExpr::constant(scale)),
                }
            }
            Some(Token::X) => {
                if matches!(self.peek(), Some(Token::X) | Some(Token::LParen)) {
                    return Err(self.error("expression is not linear"));
                }
                Ok(LinearExpr::x())
            }
            Some(Token::LParen) => self.group(),
            Some(other) => Err(self.error(format!("unexpected token {other:?}"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Parses the rest of a parenthesised group; the `(` is already consumed.
    fn group(&mut self) -> Result<LinearExpr> {
        let inner = self.expr()?;
        match self.bump() {
            Some(Token::RParen) => Ok(inner),
            _ => Err(self.error("missing ')'")),
        }
    }
}

pub fn parse_expr(input: &str) -> Result<LinearExpr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(TutorError::parse(input, "empty expression"));
    }

    let mut parser = Parser {
        input,
        tokens,
        pos: 0,
    };
    let expr = parser.expr()?;

    if parser.pos < parser.tokens.len() {
        return Err(parser.error("trailing input"));
    }

    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Fraction {
        Fraction::integer(v)
    }

    #[test]
    fn parses_simple_terms() {
        assert_eq!(parse_expr("3x + 5").unwrap(), LinearExpr::new(int(3), int(5)));
        assert_eq!(parse_expr("x - 7").unwrap(), LinearExpr::new(int(1), int(-7)));
        assert_eq!(parse_expr("-x").unwrap(), LinearExpr::new(int(-1), int(0)));
        assert_eq!(parse_expr("12").unwrap(), LinearExpr::constant(int(12)));
    }

    #[test]
    fn parses_distribution_and_division() {
        assert_eq!(parse_expr("3(x + 4)").unwrap(), LinearExpr::new(int(3), int(12)));
        assert_eq!(parse_expr("-2(x - 3) + 1").unwrap(), LinearExpr::new(int(-2), int(7)));
        assert_eq!(
            parse_expr("x/4 - 2").unwrap(),
            LinearExpr::new(Fraction::new(1, 4).unwrap(), int(-2))
        );
        assert_eq!(parse_expr("2 * (x + 1)").unwrap(), LinearExpr::new(int(2), int(2)));
    }

    #[test]
    fn combines_like_terms() {
        assert_eq!(parse_expr("4x + 3x - 2").unwrap(), LinearExpr::new(int(7), int(-2)));
        assert_eq!(parse_expr("5x - 2x + 1").unwrap(), LinearExpr::new(int(3), int(1)));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_expr("").is_err());
        assert!(parse_expr("3x +").is_err());
        assert!(parse_expr("(x + 1").is_err());
        assert!(parse_expr("x(x + 1)").is_err());
        assert!(parse_expr("x * x").is_err());
        assert!(parse_expr("x / 0").is_err());
        assert!(parse_expr("3y").is_err());
        assert!(parse_expr("3 4").is_err());
    }

    #[test]
    fn reports_overflow_as_parse_error() {
        let too_large = |input: &str| match parse_expr(input) {
            Err(TutorError::Parse { reason, .. }) => reason == "number too large",
            _ => false,
        };
        assert!(too_large("9223372036854775808"));
        assert!(too_large("4000000000x * 4000000000"));
        assert!(too_large("4000000000(4000000000x + 1)"));
        assert!(too_large("9223372036854775807 + 1"));
        assert!(too_large("x - 9223372036854775807 - 2"));
        assert!(parse_expr("9223372036854775807x / 9223372036854775807").is_ok());
    }
}
