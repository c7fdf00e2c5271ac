use crate::{
    ast::Node,
    token_stream::TokenStream,
    tokenizer::{Token, TokenType},
};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected} but found {found} at line {line}")]
    Expected {
        expected: TokenType,
        found: TokenType,
        line: usize,
    },
    #[error("unexpected {found} at line {line}")]
    Unexpected { found: TokenType, line: usize },
    #[error("invalid assignment target at line {line}")]
    InvalidAssignmentTarget { line: usize },
    #[error("integer literal \"{lexeme}\" out of range at line {line}")]
    NumberOutOfRange { lexeme: String, line: usize },
}

/// Parses the whole stream, including the trailing end-of-input token, into
/// a single `Block` root. Stops at the first grammar violation.
pub fn parse(tokens: TokenStream) -> Result<Node, ParseError> {
    Parser { tokens }.program()
}

struct Parser {
    tokens: TokenStream,
}

impl Parser {
    fn program(mut self) -> Result<Node, ParseError> {
        let mut statements = Vec::new();
        while self.peek().token_type != TokenType::Eof {
            statements.push(self.statement()?);
        }
        self.consume(TokenType::Eof)?;
        Ok(Node::Block {
            statements,
            line: 1,
        })
    }

    fn statement(&mut self) -> Result<Node, ParseError> {
        match self.peek().token_type {
            TokenType::Print => self.print_statement(),
            TokenType::If => self.if_statement(),
            TokenType::While => self.while_statement(),
            TokenType::LeftBrace => self.block(),
            _ => self.assign_statement(),
        }
    }

    fn assign_statement(&mut self) -> Result<Node, ParseError> {
        let name = self.consume(TokenType::Identifier)?;
        self.consume(TokenType::Assign)?;
        let value = self.expression()?;
        self.consume(TokenType::Semicolon)?;
        Ok(Node::Assign {
            name: name.lexeme,
            value: Box::new(value),
            line: name.line,
        })
    }

    fn print_statement(&mut self) -> Result<Node, ParseError> {
        let keyword = self.dequeue();
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon)?;
        Ok(Node::Print {
            expr: Box::new(expr),
            line: keyword.line,
        })
    }

    fn if_statement(&mut self) -> Result<Node, ParseError> {
        let keyword = self.dequeue();
        self.consume(TokenType::LeftParen)?;
        let condition = self.expression()?;
        self.consume(TokenType::RightParen)?;
        let then_branch = self.statement()?;
        let else_branch = if self.peek().token_type == TokenType::Else {
            self.dequeue();
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Node::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch,
            line: keyword.line,
        })
    }

    fn while_statement(&mut self) -> Result<Node, ParseError> {
        let keyword = self.dequeue();
        self.consume(TokenType::LeftParen)?;
        let condition = self.expression()?;
        self.consume(TokenType::RightParen)?;
        let body = self.statement()?;
        Ok(Node::While {
            condition: Box::new(condition),
            body: Box::new(body),
            line: keyword.line,
        })
    }

    fn block(&mut self) -> Result<Node, ParseError> {
        let brace = self.dequeue();
        let mut statements = Vec::new();
        while !matches!(
            self.peek().token_type,
            TokenType::RightBrace | TokenType::Eof
        ) {
            statements.push(self.statement()?);
        }
        self.consume(TokenType::RightBrace)?;
        Ok(Node::Block {
            statements,
            line: brace.line,
        })
    }

    fn expression(&mut self) -> Result<Node, ParseError> {
        self.assignment()
    }

    // `x = ...` is also an expression whose value is the stored value. The
    // left side is parsed first, then reinterpreted when "=" follows.
    fn assignment(&mut self) -> Result<Node, ParseError> {
        let expr = self.equality()?;

        if self.peek().token_type == TokenType::Assign {
            let equals = self.dequeue();
            let value = self.assignment()?;
            return match expr {
                Node::Variable { name, line } => Ok(Node::Assign {
                    name,
                    value: Box::new(value),
                    line,
                }),
                _ => Err(ParseError::InvalidAssignmentTarget { line: equals.line }),
            };
        }

        Ok(expr)
    }

    /// One left-associative precedence level: parse an operand at the next
    /// higher level, then fold further operands into a left-nested chain.
    fn binary(
        &mut self,
        operators: &[&str],
        operand: fn(&mut Self) -> Result<Node, ParseError>,
    ) -> Result<Node, ParseError> {
        let mut expr = operand(self)?;

        loop {
            let token = self.peek();
            if token.token_type != TokenType::Operator
                || !operators.contains(&token.lexeme.as_str())
            {
                break;
            }
            let token = self.dequeue();
            let right = operand(self)?;
            expr = Node::BinaryOp {
                op: token.lexeme,
                left: Box::new(expr),
                right: Box::new(right),
                line: token.line,
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Node, ParseError> {
        self.binary(&["==", "!="], Self::relational)
    }

    fn relational(&mut self) -> Result<Node, ParseError> {
        self.binary(&["<", "<=", ">", ">="], Self::additive)
    }

    fn additive(&mut self) -> Result<Node, ParseError> {
        self.binary(&["+", "-"], Self::multiplicative)
    }

    fn multiplicative(&mut self) -> Result<Node, ParseError> {
        self.binary(&["*", "/", "%"], Self::unary)
    }

    fn unary(&mut self) -> Result<Node, ParseError> {
        let token = self.peek();
        if token.token_type == TokenType::Operator && token.lexeme == "!" {
            let token = self.dequeue();
            let right = self.unary()?;
            // Negation reuses the binary node shape; the left operand is a
            // placeholder the evaluator ignores.
            return Ok(Node::BinaryOp {
                op: token.lexeme,
                left: Box::new(Node::Number {
                    value: 0,
                    line: token.line,
                }),
                right: Box::new(right),
                line: token.line,
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Node, ParseError> {
        let token = self.dequeue();
        match token.token_type {
            TokenType::Number => {
                let value = token
                    .lexeme
                    .parse()
                    .map_err(|_| ParseError::NumberOutOfRange {
                        lexeme: token.lexeme.clone(),
                        line: token.line,
                    })?;
                Ok(Node::Number {
                    value,
                    line: token.line,
                })
            }
            TokenType::Identifier => Ok(Node::Variable {
                name: token.lexeme,
                line: token.line,
            }),
            TokenType::LeftParen => {
                let expr = self.expression()?;
                self.consume(TokenType::RightParen)?;
                Ok(expr)
            }
            found => Err(ParseError::Unexpected {
                found,
                line: token.line,
            }),
        }
    }

    fn consume(&mut self, expected: TokenType) -> Result<Token, ParseError> {
        let token = self.peek();
        if token.token_type == expected {
            Ok(self.dequeue())
        } else {
            Err(ParseError::Expected {
                expected,
                found: token.token_type.clone(),
                line: token.line,
            })
        }
    }

    fn peek(&self) -> &Token {
        self.tokens
            .peek()
            .expect("token stream ends with an end-of-input token")
    }

    fn dequeue(&mut self) -> Token {
        self.tokens
            .dequeue()
            .expect("token stream ends with an end-of-input token")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tokenizer::tokens;

    fn parse_source(source: &str) -> Result<Node, ParseError> {
        parse(tokens(source).unwrap())
    }

    fn single_statement(source: &str) -> Node {
        let root = parse_source(source).unwrap();
        let Node::Block { mut statements, .. } = root else {
            panic!("root should be a block");
        };
        assert_eq!(statements.len(), 1);
        statements.pop().unwrap()
    }

    #[test]
    fn test_empty_program() {
        let root = parse_source("").unwrap();
        assert_eq!(
            root,
            Node::Block {
                statements: vec![],
                line: 1
            }
        );
    }

    #[test]
    fn test_left_associativity() {
        let stmt = single_statement("print 2 - 3 - 4;");
        let Node::Print { expr, .. } = stmt else {
            panic!("expected print");
        };
        // ((2 - 3) - 4), not (2 - (3 - 4))
        assert_eq!(expr.to_string(), "(- (- 2 3) 4)");
    }

    #[test]
    fn test_precedence() {
        let stmt = single_statement("print 2 + 3 * 4;");
        let Node::Print { expr, .. } = stmt else {
            panic!("expected print");
        };
        assert_eq!(expr.to_string(), "(+ 2 (* 3 4))");
    }

    #[test]
    fn test_parenthesized_expression() {
        let stmt = single_statement("print (2 + 3) * 4;");
        let Node::Print { expr, .. } = stmt else {
            panic!("expected print");
        };
        assert_eq!(expr.to_string(), "(* (+ 2 3) 4)");
    }

    #[test]
    fn test_nested_assignment_expression() {
        let stmt = single_statement("x = y = 3;");
        let Node::Assign { name, value, .. } = stmt else {
            panic!("expected assignment");
        };
        assert_eq!(name, "x");
        assert!(matches!(*value, Node::Assign { .. }));
    }

    #[test]
    fn test_if_else_binds_branches() {
        let stmt = single_statement("if (x < 1) { y = 1; } else y = 2;");
        let Node::If {
            then_branch,
            else_branch,
            ..
        } = stmt
        else {
            panic!("expected if");
        };
        assert!(matches!(*then_branch, Node::Block { .. }));
        assert!(matches!(else_branch.as_deref(), Some(Node::Assign { .. })));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_source("x = 1").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Expected {
                expected: TokenType::Semicolon,
                found: TokenType::Eof,
                ..
            }
        ));
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse_source("{ x = 1;").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Expected {
                expected: TokenType::RightBrace,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = parse_source("print (x + 1) = 2;").unwrap_err();
        assert!(matches!(err, ParseError::InvalidAssignmentTarget { line: 1 }));
    }

    #[test]
    fn test_stray_token_reports_line() {
        let err = parse_source("x = 1;\n;").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Expected {
                expected: TokenType::Identifier,
                found: TokenType::Semicolon,
                line: 2
            }
        ));
    }

    #[test]
    fn test_number_out_of_range() {
        let err = parse_source("x = 99999999999999999999;").unwrap_err();
        assert!(matches!(err, ParseError::NumberOutOfRange { .. }));
    }
}
