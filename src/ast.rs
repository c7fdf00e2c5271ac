use std::fmt::Display;

/// One node per language construct. The parser is the only producer; the
/// evaluator only reads. Children are exclusively owned, so the tree is
/// acyclic by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Number {
        value: i64,
        line: usize,
    },
    Variable {
        name: String,
        line: usize,
    },
    /// The operator is kept as its source text; `"!"` ignores its left
    /// operand, which the parser fills with a zero placeholder.
    BinaryOp {
        op: String,
        left: Box<Node>,
        right: Box<Node>,
        line: usize,
    },
    Assign {
        name: String,
        value: Box<Node>,
        line: usize,
    },
    Print {
        expr: Box<Node>,
        line: usize,
    },
    If {
        condition: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
        line: usize,
    },
    While {
        condition: Box<Node>,
        body: Box<Node>,
        line: usize,
    },
    Block {
        statements: Vec<Node>,
        line: usize,
    },
}

impl Node {
    pub fn line(&self) -> usize {
        match self {
            Node::Number { line, .. }
            | Node::Variable { line, .. }
            | Node::BinaryOp { line, .. }
            | Node::Assign { line, .. }
            | Node::Print { line, .. }
            | Node::If { line, .. }
            | Node::While { line, .. }
            | Node::Block { line, .. } => *line,
        }
    }
}

// Assignments double as expressions, so they carry no terminator of their
// own; statement positions add it here.
fn write_statement(f: &mut std::fmt::Formatter<'_>, node: &Node) -> std::fmt::Result {
    match node {
        Node::Assign { .. } => writeln!(f, "{node};"),
        _ => writeln!(f, "{node}"),
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Number { value, .. } => write!(f, "{value}"),
            Node::Variable { name, .. } => write!(f, "{name}"),
            Node::BinaryOp {
                op, left, right, ..
            } => {
                if op == "!" {
                    write!(f, "(! {right})")
                } else {
                    write!(f, "({op} {left} {right})")
                }
            }
            Node::Assign { name, value, .. } => write!(f, "{name} = {value}"),
            Node::Print { expr, .. } => write!(f, "print {expr};"),
            Node::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                write!(f, "if ({condition}) ")?;
                write_statement(f, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, "else ")?;
                    write_statement(f, else_branch)?;
                }
                Ok(())
            }
            Node::While {
                condition, body, ..
            } => {
                write!(f, "while ({condition}) ")?;
                write_statement(f, body)
            }
            Node::Block { statements, .. } => {
                writeln!(f, "{{")?;
                for statement in statements {
                    write_statement(f, statement)?;
                }
                write!(f, "}}")
            }
        }
    }
}
