//! Expression parser
//!
//! Converts cell source text into builder callbacks. Text starting with `=`
//! is parsed as a formula by a recursive descent parser with the usual
//! precedence ladder; anything else becomes a single literal (a number when
//! the whole text parses as one, text otherwise).

use crate::builder::ExprBuilder;
use crate::error::{FormulaError, FormulaResult};

/// Parse cell source text, reporting the result through `builder`
///
/// # Example
/// ```
/// use tabula_formula::{parse_expression, ExprBuilder};
///
/// let mut builder = ExprBuilder::new(true);
/// parse_expression("=A1+2-B$3", &mut builder).unwrap();
/// let built = builder.finish().unwrap();
/// assert_eq!(built.expr.to_string(), "((A1+2)-B$3)");
/// ```
pub fn parse_expression(contents: &str, builder: &mut ExprBuilder) -> FormulaResult<()> {
    let Some(body) = contents.strip_prefix('=') else {
        // Literal cell: numbers stand alone, everything else is text
        match contents.parse::<f64>() {
            Ok(n) => builder.val_number(n),
            Err(_) => builder.val_string(contents),
        }
        return Ok(());
    };

    let mut parser = Parser::new(body)?;
    parser.parse_comparison(builder)?;

    if parser.current != Token::Eof {
        return Err(FormulaError::Parse(format!(
            "Unexpected input after expression: {:?}",
            parser.current
        )));
    }
    Ok(())
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Str(String),
    CellRef(String),
    Identifier(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Colon,
    Comma,
    LeftParen,
    RightParen,

    Eof,
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    current: Token,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current: Token::Eof,
        };
        parser.advance()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance(&mut self) -> FormulaResult<()> {
        self.current = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        // Single-character tokens
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            '=' => Some(Token::Equal),
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.bump();
            return Ok(token);
        }

        // Two-character operators
        if c == '<' {
            self.bump();
            return Ok(match self.peek_char() {
                Some('=') => {
                    self.bump();
                    Token::LessEqual
                }
                Some('>') => {
                    self.bump();
                    Token::NotEqual
                }
                _ => Token::LessThan,
            });
        }
        if c == '>' {
            self.bump();
            return Ok(if self.peek_char() == Some('=') {
                self.bump();
                Token::GreaterEqual
            } else {
                Token::GreaterThan
            });
        }

        if c == '"' {
            return self.scan_string();
        }

        if c.is_ascii_digit() || c == '.' {
            return self.scan_number();
        }

        if c.is_ascii_alphabetic() || c == '_' || c == '$' {
            return Ok(self.scan_identifier_or_ref());
        }

        Err(FormulaError::Parse(format!("Unexpected character: {:?}", c)))
    }

    fn scan_string(&mut self) -> FormulaResult<Token> {
        self.bump(); // opening quote

        let mut s = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.bump();
                    // A doubled quote is an escaped quote
                    if self.peek_char() == Some('"') {
                        s.push('"');
                        self.bump();
                    } else {
                        return Ok(Token::Str(s));
                    }
                }
                Some(c) => {
                    s.push(c);
                    self.bump();
                }
                None => {
                    return Err(FormulaError::Parse("Unterminated string literal".into()));
                }
            }
        }
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek_char() == Some('.') {
            self.bump();
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        if self.peek_char().is_some_and(|c| c == 'e' || c == 'E') {
            self.bump();
            if self.peek_char().is_some_and(|c| c == '+' || c == '-') {
                self.bump();
            }
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }

        let text = &self.input[start..self.pos];
        let number: f64 = text
            .parse()
            .map_err(|_| FormulaError::Parse(format!("Invalid number literal: {:?}", text)))?;
        Ok(Token::Number(number))
    }

    fn scan_identifier_or_ref(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek_char()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            self.bump();
        }

        let text = &self.input[start..self.pos];
        if Self::is_cell_reference(text) {
            Token::CellRef(text.to_string())
        } else {
            Token::Identifier(text.to_string())
        }
    }

    /// Check for the `[$]LETTERS[$]DIGITS` shape
    fn is_cell_reference(text: &str) -> bool {
        let mut rest = text.strip_prefix('$').unwrap_or(text);

        let letters = rest.bytes().take_while(|b| b.is_ascii_alphabetic()).count();
        if letters == 0 {
            return false;
        }
        rest = &rest[letters..];
        rest = rest.strip_prefix('$').unwrap_or(rest);

        let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
        digits > 0 && digits == rest.len()
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: Token) -> FormulaResult<()> {
        if self.current == expected {
            self.advance()
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected, self.current
            )))
        }
    }

    // === Expression parsing with precedence ===
    // Lowest to highest:
    // 1. Comparison: =, <>, <, <=, >, >=
    // 2. Addition/Subtraction: +, -
    // 3. Multiplication/Division: *, /
    // 4. Exponentiation: ^ (right associative)
    // 5. Unary minus
    // 6. Primary: literals, references, parentheses

    fn parse_comparison(&mut self, builder: &mut ExprBuilder) -> FormulaResult<()> {
        self.parse_additive(builder)?;

        loop {
            let op = self.current.clone();
            match op {
                Token::Equal
                | Token::NotEqual
                | Token::LessThan
                | Token::LessEqual
                | Token::GreaterThan
                | Token::GreaterEqual => {
                    self.advance()?;
                    self.parse_additive(builder)?;
                    match op {
                        Token::Equal => builder.op_eq()?,
                        Token::NotEqual => builder.op_ne()?,
                        Token::LessThan => builder.op_lt()?,
                        Token::LessEqual => builder.op_le()?,
                        Token::GreaterThan => builder.op_gt()?,
                        Token::GreaterEqual => builder.op_ge()?,
                        _ => unreachable!(),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_additive(&mut self, builder: &mut ExprBuilder) -> FormulaResult<()> {
        self.parse_multiplicative(builder)?;

        loop {
            match self.current {
                Token::Plus => {
                    self.advance()?;
                    self.parse_multiplicative(builder)?;
                    builder.op_add()?;
                }
                Token::Minus => {
                    self.advance()?;
                    self.parse_multiplicative(builder)?;
                    builder.op_sub()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_multiplicative(&mut self, builder: &mut ExprBuilder) -> FormulaResult<()> {
        self.parse_exponent(builder)?;

        loop {
            match self.current {
                Token::Star => {
                    self.advance()?;
                    self.parse_exponent(builder)?;
                    builder.op_mul()?;
                }
                Token::Slash => {
                    self.advance()?;
                    self.parse_exponent(builder)?;
                    builder.op_div()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_exponent(&mut self, builder: &mut ExprBuilder) -> FormulaResult<()> {
        self.parse_unary(builder)?;

        if self.current == Token::Caret {
            self.advance()?;
            self.parse_exponent(builder)?; // right associative
            builder.op_pow()?;
        }
        Ok(())
    }

    fn parse_unary(&mut self, builder: &mut ExprBuilder) -> FormulaResult<()> {
        if self.current == Token::Minus {
            self.advance()?;
            self.parse_unary(builder)?;
            return builder.op_neg();
        }
        self.parse_primary(builder)
    }

    fn parse_primary(&mut self, builder: &mut ExprBuilder) -> FormulaResult<()> {
        match self.current.clone() {
            Token::LeftParen => {
                self.advance()?;
                self.parse_comparison(builder)?;
                self.expect(Token::RightParen)
            }
            Token::Number(n) => {
                self.advance()?;
                builder.val_number(n);
                Ok(())
            }
            Token::Str(s) => {
                self.advance()?;
                builder.val_string(&s);
                Ok(())
            }
            Token::CellRef(text) => {
                self.advance()?;
                if self.current == Token::Colon {
                    // A1:B2 would reach val_range, which builds nothing
                    return Err(FormulaError::Unsupported("range references"));
                }
                builder.val_reference(&text)
            }
            Token::Identifier(name) => {
                self.advance()?;
                if self.current == Token::LeftParen {
                    // NAME(...) would reach func_call, which builds nothing
                    return Err(FormulaError::Unsupported("function calls"));
                }
                Err(FormulaError::Parse(format!("Unknown identifier: {:?}", name)))
            }
            other => Err(FormulaError::Parse(format!(
                "Expected an operand, got {:?}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CellTable;
    use tabula_core::Value;

    fn build(contents: &str) -> FormulaResult<crate::builder::BuiltExpr> {
        let mut builder = ExprBuilder::new(contents.starts_with('='));
        parse_expression(contents, &mut builder)?;
        builder.finish()
    }

    fn serialized(contents: &str) -> String {
        build(contents).unwrap().expr.to_string()
    }

    fn eval(contents: &str) -> Value {
        let built = build(contents).unwrap();
        crate::evaluator::evaluate(&built.expr, &CellTable::new())
    }

    #[test]
    fn test_literal_cells() {
        assert_eq!(serialized("10"), "10");
        assert_eq!(serialized("3.25"), "3.25");
        assert_eq!(serialized("-4"), "-4");
        assert_eq!(serialized("1e3"), "1000");
        assert_eq!(serialized("hello"), "hello");
        assert_eq!(serialized("12abc"), "12abc");
        assert_eq!(serialized(""), "");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("=1+2*3"), Value::Number(7.0));
        assert_eq!(eval("=(1+2)*3"), Value::Number(9.0));
        assert_eq!(eval("=2+3*4-5"), Value::Number(9.0));
        assert_eq!(eval("=20/4/5"), Value::Number(1.0));
        assert_eq!(eval("=2*3^2"), Value::Number(18.0));
    }

    #[test]
    fn test_exponent_right_associative() {
        assert_eq!(eval("=2^3^2"), Value::Number(512.0));
        assert_eq!(serialized("=2^3^2"), "(2^(3^2))");
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(eval("=-5"), Value::Number(-5.0));
        assert_eq!(eval("=--5"), Value::Number(5.0));
        assert_eq!(eval("=3*-2"), Value::Number(-6.0));
        assert_eq!(serialized("=-A1"), "(-A1)");
        // Binds tighter than ^ applied to its left operand
        assert_eq!(eval("=-2^2"), Value::Number(4.0));
    }

    #[test]
    fn test_comparison_chain() {
        assert_eq!(eval("=1<2"), Value::Number(1.0));
        assert_eq!(eval("=1>2"), Value::Number(0.0));
        assert_eq!(eval("=5=5"), Value::Number(1.0));
        assert_eq!(eval("=5<>5"), Value::Number(0.0));
        assert_eq!(eval("=5<=5"), Value::Number(1.0));
        assert_eq!(eval("=5>=6"), Value::Number(0.0));
        assert_eq!(eval("=1+1=2"), Value::Number(1.0));
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(eval("=\"hi\""), Value::Text("hi".into()));
        assert_eq!(
            eval("=\"a\"+\"b\""),
            Value::Text("ab".into())
        );
        assert_eq!(
            eval("=\"say \"\"hi\"\"\""),
            Value::Text("say \"hi\"".into())
        );
        assert_eq!(serialized("=\"say \"\"hi\"\"\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_references() {
        assert_eq!(serialized("=A1"), "A1");
        assert_eq!(serialized("=$a$1"), "$A$1");
        assert_eq!(serialized("=$A1+A$1"), "($A1+A$1)");
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(eval("= 1 + 2 * 3 "), Value::Number(7.0));
        assert_eq!(serialized("=( A1 + B2 )"), "(A1+B2)");
    }

    #[test]
    fn test_parse_errors() {
        assert!(build("=").is_err());
        assert!(build("=1+").is_err());
        assert!(build("=(1+2").is_err());
        assert!(build("=1 2").is_err());
        assert!(build("=\"open").is_err());
        assert!(build("=1 @ 2").is_err());
        assert!(build("=foo").is_err());
    }

    #[test]
    fn test_ranges_and_calls_rejected() {
        assert!(matches!(
            build("=A1:B2"),
            Err(FormulaError::Unsupported("range references"))
        ));
        assert!(matches!(
            build("=SUM(A1,B2)"),
            Err(FormulaError::Unsupported("function calls"))
        ));
    }
}
