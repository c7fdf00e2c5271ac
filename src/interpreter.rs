use std::{
    cell::RefCell,
    fmt::Debug,
    io::Write,
    rc::Rc,
};

use rustc_hash::FxHashMap;

use crate::ast::Node;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("undefined variable '{name}' at line {line}")]
    UndefinedVariable { name: String, line: usize },
    #[error("division by zero at line {line}")]
    DivisionByZero { line: usize },
    #[error("modulo by zero at line {line}")]
    ModuloByZero { line: usize },
    #[error("unknown operator '{op}' at line {line}")]
    UnknownOperator { op: String, line: usize },
}

/// Walks the AST depth-first against a single global environment. Variables
/// spring into existence on first assignment; blocks introduce no scope.
#[derive(Clone)]
pub struct Interpreter {
    variables: FxHashMap<String, i64>,
    stdout: Rc<RefCell<dyn Write>>,
}

impl Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("variables", &self.variables)
            .finish()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Rc::new(RefCell::new(std::io::stdout())))
    }
}

impl Interpreter {
    pub fn new(stdout: Rc<RefCell<dyn Write>>) -> Self {
        Self {
            variables: FxHashMap::default(),
            stdout,
        }
    }

    /// Executes the program for its side effects. The per-node integer
    /// result only matters inside the tree.
    pub fn interpret(&mut self, root: &Node) -> Result<(), RuntimeError> {
        self.visit(root)?;
        Ok(())
    }

    fn visit(&mut self, node: &Node) -> Result<i64, RuntimeError> {
        match node {
            Node::Number { value, .. } => Ok(*value),
            Node::Variable { name, line } => {
                self.variables
                    .get(name)
                    .copied()
                    .ok_or_else(|| RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        line: *line,
                    })
            }
            Node::BinaryOp {
                op,
                left,
                right,
                line,
            } => {
                // Left before right; observable when operands assign.
                let left = self.visit(left)?;
                let right = self.visit(right)?;
                match op.as_str() {
                    "+" => Ok(left.wrapping_add(right)),
                    "-" => Ok(left.wrapping_sub(right)),
                    "*" => Ok(left.wrapping_mul(right)),
                    "/" => {
                        if right == 0 {
                            Err(RuntimeError::DivisionByZero { line: *line })
                        } else {
                            Ok(left.wrapping_div(right))
                        }
                    }
                    "%" => {
                        if right == 0 {
                            Err(RuntimeError::ModuloByZero { line: *line })
                        } else {
                            Ok(left.wrapping_rem(right))
                        }
                    }
                    "==" => Ok((left == right) as i64),
                    "!=" => Ok((left != right) as i64),
                    "<" => Ok((left < right) as i64),
                    "<=" => Ok((left <= right) as i64),
                    ">" => Ok((left > right) as i64),
                    ">=" => Ok((left >= right) as i64),
                    // Logical negation; the left operand is a placeholder.
                    "!" => Ok((right == 0) as i64),
                    _ => Err(RuntimeError::UnknownOperator {
                        op: op.clone(),
                        line: *line,
                    }),
                }
            }
            Node::Assign { name, value, .. } => {
                let value = self.visit(value)?;
                self.variables.insert(name.clone(), value);
                Ok(value)
            }
            Node::Print { expr, .. } => {
                let value = self.visit(expr)?;
                writeln!(self.stdout.borrow_mut(), "{}", value)?;
                Ok(value)
            }
            Node::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.visit(condition)? != 0 {
                    self.visit(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.visit(else_branch)?;
                }
                Ok(0)
            }
            Node::While {
                condition, body, ..
            } => {
                while self.visit(condition)? != 0 {
                    self.visit(body)?;
                }
                Ok(0)
            }
            Node::Block { statements, .. } => {
                for statement in statements {
                    self.visit(statement)?;
                }
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn number(value: i64) -> Box<Node> {
        Box::new(Node::Number { value, line: 1 })
    }

    fn binary(op: &str, left: Box<Node>, right: Box<Node>) -> Node {
        Node::BinaryOp {
            op: op.to_string(),
            left,
            right,
            line: 1,
        }
    }

    fn eval(node: &Node) -> Result<i64, RuntimeError> {
        Interpreter::new(Rc::new(RefCell::new(std::io::sink()))).visit(node)
    }

    #[test]
    fn test_number_evaluates_to_itself() {
        for n in [0, 1, -1, i64::MAX, i64::MIN] {
            assert_eq!(eval(&Node::Number { value: n, line: 1 }).unwrap(), n);
        }
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        assert_eq!(eval(&binary("/", number(7), number(2))).unwrap(), 3);
        assert_eq!(eval(&binary("/", number(-7), number(2))).unwrap(), -3);
        assert_eq!(eval(&binary("%", number(-7), number(2))).unwrap(), -1);
    }

    #[test]
    fn test_comparisons_yield_zero_or_one() {
        assert_eq!(eval(&binary("<", number(2), number(3))).unwrap(), 1);
        assert_eq!(eval(&binary(">=", number(2), number(3))).unwrap(), 0);
        assert_eq!(eval(&binary("==", number(3), number(3))).unwrap(), 1);
    }

    #[test]
    fn test_logical_negation() {
        assert_eq!(eval(&binary("!", number(0), number(0))).unwrap(), 1);
        assert_eq!(eval(&binary("!", number(0), number(5))).unwrap(), 0);
    }

    #[test]
    fn test_division_by_zero() {
        let err = eval(&binary("/", number(5), number(0))).unwrap_err();
        assert!(matches!(err, RuntimeError::DivisionByZero { line: 1 }));
        let err = eval(&binary("%", number(5), number(0))).unwrap_err();
        assert!(matches!(err, RuntimeError::ModuloByZero { line: 1 }));
    }

    #[test]
    fn test_unknown_operator() {
        let err = eval(&binary("**", number(2), number(3))).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownOperator { .. }));
    }

    #[test]
    fn test_undefined_variable() {
        let err = eval(&Node::Variable {
            name: "x".to_string(),
            line: 3,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::UndefinedVariable { line: 3, .. }
        ));
    }

    #[test]
    fn test_assignment_returns_stored_value() {
        let mut interpreter = Interpreter::new(Rc::new(RefCell::new(std::io::sink())));
        let result = interpreter
            .visit(&Node::Assign {
                name: "x".to_string(),
                value: number(7),
                line: 1,
            })
            .unwrap();
        assert_eq!(result, 7);
        assert_eq!(interpreter.variables.get("x"), Some(&7));
    }

    #[test]
    fn test_statements_return_zero() {
        let mut interpreter = Interpreter::new(Rc::new(RefCell::new(std::io::sink())));
        let stmt = Node::If {
            condition: number(1),
            then_branch: Box::new(Node::Assign {
                name: "x".to_string(),
                value: number(9),
                line: 1,
            }),
            else_branch: None,
            line: 1,
        };
        assert_eq!(interpreter.visit(&stmt).unwrap(), 0);
    }
}
