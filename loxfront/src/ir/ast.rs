use crate::span::Span;

/// Precedence tiers of the binary operators, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Equality,
    Comparison,
    Term,
    Factor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Equal,        // ==
    NotEqual,     // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=
    Add,          // +
    Subtract,     // -
    Multiply,     // *
    Divide,       // /
    Modulo,       // %
}

impl BinaryOperator {
    pub fn tier(&self) -> Tier {
        match self {
            Self::Equal | Self::NotEqual => Tier::Equality,
            Self::Less | Self::LessEqual | Self::Greater | Self::GreaterEqual => Tier::Comparison,
            Self::Add | Self::Subtract => Tier::Term,
            Self::Multiply | Self::Divide | Self::Modulo => Tier::Factor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate, // -
    Not,    // !
}

impl UnaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::Not => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// 10, "text", true, nil
    Literal(LiteralValue),
    /// a
    Variable(String),
    /// (a + b)
    Grouping {
        inner: Box<Expr>,
        /// The closing parenthesis was missing.
        degraded: bool,
    },
    /// -a, !a
    Unary {
        operator: UnaryOperator,
        operand: Box<Expr>,
    },
    /// a + b
    Binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// a = b
    Assignment {
        target: String,
        value: Box<Expr>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn literal(value: LiteralValue, span: Span) -> Self {
        Self::new(ExprKind::Literal(value), span)
    }

    pub fn variable(name: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Variable(name.into()), span)
    }

    pub fn grouping(inner: Expr, degraded: bool, span: Span) -> Self {
        Self::new(
            ExprKind::Grouping {
                inner: Box::new(inner),
                degraded,
            },
            span,
        )
    }

    pub fn unary(operator: UnaryOperator, operand: Expr, span: Span) -> Self {
        Self::new(
            ExprKind::Unary {
                operator,
                operand: Box::new(operand),
            },
            span,
        )
    }

    pub fn binary(operator: BinaryOperator, left: Expr, right: Expr) -> Self {
        let span = left.span.to(&right.span);
        Self::new(
            ExprKind::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn assignment(target: impl Into<String>, value: Expr, span: Span) -> Self {
        Self::new(
            ExprKind::Assignment {
                target: target.into(),
                value: Box::new(value),
            },
            span,
        )
    }

    /// Same shape, names, operators and literal values. Spans are ignored.
    pub fn structurally_eq(&self, other: &Expr) -> bool {
        match (&self.kind, &other.kind) {
            (ExprKind::Literal(a), ExprKind::Literal(b)) => a == b,
            (ExprKind::Variable(a), ExprKind::Variable(b)) => a == b,
            (
                ExprKind::Grouping { inner: a, degraded: da },
                ExprKind::Grouping { inner: b, degraded: db },
            ) => da == db && a.structurally_eq(b),
            (
                ExprKind::Unary { operator: oa, operand: a },
                ExprKind::Unary { operator: ob, operand: b },
            ) => oa == ob && a.structurally_eq(b),
            (
                ExprKind::Binary { operator: oa, left: la, right: ra },
                ExprKind::Binary { operator: ob, left: lb, right: rb },
            ) => oa == ob && la.structurally_eq(lb) && ra.structurally_eq(rb),
            (
                ExprKind::Assignment { target: ta, value: va },
                ExprKind::Assignment { target: tb, value: vb },
            ) => ta == tb && va.structurally_eq(vb),
            _ => false,
        }
    }

    /// True if a degraded node appears anywhere in this expression.
    pub fn has_errors(&self) -> bool {
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Variable(_) => false,
            ExprKind::Grouping { inner, degraded } => *degraded || inner.has_errors(),
            ExprKind::Unary { operand, .. } => operand.has_errors(),
            ExprKind::Binary { left, right, .. } => left.has_errors() || right.has_errors(),
            ExprKind::Assignment { value, .. } => value.has_errors(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// a = 1;
    Expression(Expr),
    /// print a;
    Print(Expr),
    /// var a = 1;
    VarDeclaration {
        name: String,
        initializer: Option<Expr>,
    },
    /// { ... }
    Block(Vec<Stmt>),
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn structurally_eq(&self, other: &Stmt) -> bool {
        match (&self.kind, &other.kind) {
            (StmtKind::Expression(a), StmtKind::Expression(b)) => a.structurally_eq(b),
            (StmtKind::Print(a), StmtKind::Print(b)) => a.structurally_eq(b),
            (
                StmtKind::VarDeclaration { name: na, initializer: ia },
                StmtKind::VarDeclaration { name: nb, initializer: ib },
            ) => {
                na == nb
                    && match (ia, ib) {
                        (Some(a), Some(b)) => a.structurally_eq(b),
                        (None, None) => true,
                        _ => false,
                    }
            }
            (StmtKind::Block(a), StmtKind::Block(b)) => statements_eq(a, b),
            _ => false,
        }
    }

    /// True if this statement was kept despite a recorded syntax error.
    pub fn has_errors(&self) -> bool {
        match &self.kind {
            StmtKind::Expression(expr) | StmtKind::Print(expr) => expr.has_errors(),
            StmtKind::VarDeclaration { initializer, .. } => {
                initializer.as_ref().is_some_and(Expr::has_errors)
            }
            StmtKind::Block(statements) => statements.iter().any(Stmt::has_errors),
        }
    }
}

/// Pairwise `structurally_eq` over two statement lists.
pub fn statements_eq(a: &[Stmt], b: &[Stmt]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structurally_eq(y))
}
