//! Recursive-descent statement parser with precedence climbing for binary
//! operators. Binding strength comes from [`BinOp::precedence`].

use ws_ir::{BinOp, Expr, Stmt, UnOp};

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};

type Result<T> = std::result::Result<T, ParseError>;

pub fn parse(tokens: &[Token]) -> Result<Vec<Stmt>> {
    let mut parser = Parser { tokens, pos: 0 };
    let mut stmts = Vec::new();
    while parser.peek().is_some() {
        stmts.push(parser.statement()?);
    }
    Ok(stmts)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    fn ident(&mut self, expected: &'static str) -> Result<String> {
        match self.peek() {
            Some(TokenKind::Ident(name)) => {
                self.pos += 1;
                Ok(name.clone())
            }
            _ => Err(self.error(expected)),
        }
    }

    /// Error describing the token at the cursor.
    fn error(&self, expected: &'static str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(token) => ParseError::Unexpected {
                expected,
                found: token.kind.to_string(),
                line: token.line,
            },
            None => ParseError::UnexpectedEnd { expected },
        }
    }

    fn statement(&mut self) -> Result<Stmt> {
        match self.peek() {
            Some(TokenKind::If) => {
                self.pos += 1;
                let cond = self.expression()?;
                self.expect(&TokenKind::Then, "`then`")?;
                let then_body = self.block()?;
                Ok(Stmt::If { cond, then_body })
            }
            Some(TokenKind::Goto) => {
                self.pos += 1;
                Ok(Stmt::Goto(self.ident("label name")?))
            }
            Some(TokenKind::LabelDelim) => {
                self.pos += 1;
                let name = self.ident("label name")?;
                self.expect(&TokenKind::LabelDelim, "`::`")?;
                Ok(Stmt::Label(name))
            }
            Some(TokenKind::Return) => {
                self.pos += 1;
                Ok(Stmt::Return)
            }
            Some(_) => {
                let target = self.expression()?;
                if self.eat(&TokenKind::Assign) {
                    let value = self.expression()?;
                    Ok(Stmt::Assign { target, value })
                } else {
                    Ok(Stmt::Expr(target))
                }
            }
            None => Err(self.error("statement")),
        }
    }

    /// Statements up to and including the closing `end`.
    fn block(&mut self) -> Result<Vec<Stmt>> {
        let mut body = Vec::new();
        loop {
            match self.peek() {
                Some(TokenKind::End) => {
                    self.pos += 1;
                    return Ok(body);
                }
                Some(_) => body.push(self.statement()?),
                None => return Err(self.error("`end`")),
            }
        }
    }

    fn expression(&mut self) -> Result<Expr> {
        self.binary(1)
    }

    fn binary(&mut self, min_precedence: u8) -> Result<Expr> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.peek().and_then(binary_op) {
            if op.precedence() < min_precedence {
                break;
            }
            self.pos += 1;
            let rhs = self.binary(op.precedence() + 1)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr> {
        let op = match self.peek() {
            Some(TokenKind::Minus) => UnOp::Neg,
            Some(TokenKind::Bang | TokenKind::Not) => UnOp::Not,
            _ => return self.postfix(),
        };
        self.pos += 1;
        Ok(Expr::unary(op, self.unary()?))
    }

    /// A primary followed by any chain of `.name`, `[index]` and `(args)`.
    fn postfix(&mut self) -> Result<Expr> {
        let mut expr = self.primary()?;
        loop {
            expr = match self.peek() {
                Some(TokenKind::Dot) => {
                    self.pos += 1;
                    expr.member(self.ident("property name")?)
                }
                Some(TokenKind::LBracket) => {
                    self.pos += 1;
                    let index = self.expression()?;
                    self.expect(&TokenKind::RBracket, "`]`")?;
                    expr.index(index)
                }
                Some(TokenKind::LParen) => {
                    self.pos += 1;
                    Expr::call(expr, self.arguments()?)
                }
                _ => return Ok(expr),
            };
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RParen, "`,` or `)`")?;
                return Ok(args);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(TokenKind::Number(lit)) => {
                self.pos += 1;
                Ok(Expr::Literal(*lit))
            }
            Some(TokenKind::Ident(name)) => {
                self.pos += 1;
                Ok(Expr::ident(name.as_str()))
            }
            Some(TokenKind::LParen) => {
                self.pos += 1;
                let expr = self.expression()?;
                self.expect(&TokenKind::RParen, "`)`")?;
                Ok(expr)
            }
            _ => Err(self.error("expression")),
        }
    }
}

fn binary_op(kind: &TokenKind) -> Option<BinOp> {
    Some(match kind {
        TokenKind::Or => BinOp::Or,
        TokenKind::And => BinOp::And,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::Le => BinOp::Le,
        TokenKind::Ge => BinOp::Ge,
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::NotEq => BinOp::Ne,
        TokenKind::Pipe => BinOp::BitOr,
        TokenKind::Amp => BinOp::BitAnd,
        TokenKind::Shl => BinOp::Shl,
        TokenKind::Shr => BinOp::Shr,
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn parse_str(source: &str) -> Vec<Stmt> {
        parse(&tokenize(source).unwrap()).unwrap()
    }

    fn parse_expr(source: &str) -> Expr {
        match parse_str(source).pop() {
            Some(Stmt::Expr(expr)) => expr,
            other => panic!("not an expression statement: {other:?}"),
        }
    }

    #[test]
    fn precedence_climbing() {
        let a = || Expr::ident("a");
        let b = || Expr::ident("b");
        let c = || Expr::ident("c");
        assert_eq!(
            parse_expr("a + b * c"),
            Expr::binary(BinOp::Add, a(), Expr::binary(BinOp::Mul, b(), c()))
        );
        assert_eq!(
            parse_expr("a - b - c"),
            Expr::binary(BinOp::Sub, Expr::binary(BinOp::Sub, a(), b()), c())
        );
        assert_eq!(
            parse_expr("a == b or c"),
            Expr::binary(BinOp::Or, Expr::binary(BinOp::Eq, a(), b()), c())
        );
        assert_eq!(
            parse_expr("a & b == c"),
            Expr::binary(BinOp::Eq, Expr::binary(BinOp::BitAnd, a(), b()), c())
        );
        assert_eq!(
            parse_expr("(a + b) * c"),
            Expr::binary(BinOp::Mul, Expr::binary(BinOp::Add, a(), b()), c())
        );
    }

    #[test]
    fn unary_binds_tighter_than_binary() {
        assert_eq!(
            parse_expr("-a + not b"),
            Expr::binary(
                BinOp::Add,
                Expr::unary(UnOp::Neg, Expr::ident("a")),
                Expr::unary(UnOp::Not, Expr::ident("b"))
            )
        );
        assert_eq!(
            parse_expr("!!a"),
            Expr::unary(UnOp::Not, Expr::unary(UnOp::Not, Expr::ident("a")))
        );
    }

    #[test]
    fn postfix_chains() {
        assert_eq!(
            parse_expr("Savemap[0xF29].bit[6]"),
            Expr::ident("Savemap")
                .index(Expr::hex(0xF29))
                .member("bit")
                .index(Expr::num(6))
        );
        assert_eq!(
            parse_expr("System.enter_field(Fields.highwind_bridge_5, 0)"),
            Expr::call(
                Expr::path("System", "enter_field"),
                vec![Expr::path("Fields", "highwind_bridge_5"), Expr::num(0)]
            )
        );
        assert_eq!(
            parse_expr("Entity.stop()"),
            Expr::call(Expr::path("Entity", "stop"), vec![])
        );
    }

    #[test]
    fn statements() {
        let stmts = parse_str(
            "if Temp[0].byte then\n  goto label_end\nend\nSavemap.game_progress = 1\n::label_end::\nreturn",
        );
        assert_eq!(
            stmts,
            [
                Stmt::If {
                    cond: Expr::ident("Temp").index(Expr::num(0)).member("byte"),
                    then_body: vec![Stmt::Goto("label_end".into())],
                },
                Stmt::Assign {
                    target: Expr::path("Savemap", "game_progress"),
                    value: Expr::num(1),
                },
                Stmt::Label("label_end".into()),
                Stmt::Return,
            ]
        );
    }

    #[test]
    fn empty_body() {
        assert_eq!(
            parse_str("if 1 then end"),
            [Stmt::If {
                cond: Expr::num(1),
                then_body: vec![],
            }]
        );
    }

    #[test]
    fn missing_then() {
        let err = parse(&tokenize("if 1\n  return\nend").unwrap()).unwrap_err();
        assert_eq!(
            err,
            ParseError::Unexpected {
                expected: "`then`",
                found: "`return`".into(),
                line: 2,
            }
        );
    }

    #[test]
    fn unterminated_if() {
        let err = parse(&tokenize("if 1 then\n  return").unwrap()).unwrap_err();
        assert_eq!(err, ParseError::UnexpectedEnd { expected: "`end`" });
    }

    #[test]
    fn unbalanced_parens() {
        let err = parse(&tokenize("Entity.stop(").unwrap()).unwrap_err();
        assert_eq!(err, ParseError::UnexpectedEnd { expected: "expression" });
        let err = parse(&tokenize("System.wait(1 2)").unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { expected: "`,` or `)`", .. }));
    }

    #[test]
    fn stray_token() {
        let err = parse(&tokenize("then").unwrap()).unwrap_err();
        assert_eq!(
            err,
            ParseError::Unexpected {
                expected: "expression",
                found: "`then`".into(),
                line: 1,
            }
        );
    }
}
