//! Expression nodes.
//!
//! Nodes are immutable once built and shared through `Arc`, since a single
//! dictionary literal can be referenced by many dictionary values, each
//! re-evaluating its entries on read.

use std::fmt;
use std::sync::Arc;

use crate::{BinaryOp, UnaryOp};

/// Shared handle to an expression node.
pub type ExprRef = Arc<Expr>;

/// An expression in the tree produced by the parser.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    // Literals
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Money literal in minor units, e.g. `$12.50` is `1250` at scale 2.
    Money {
        amount: i64,
        currency: String,
        scale: u8,
    },
    /// Unit literal such as `5km` or `2.5lb`.
    Unit {
        value: f64,
        suffix: String,
    },

    /// Identifier reference.
    Ident(String),
    /// `this` inside a dictionary entry.
    This,

    /// `[a, b, c]`
    Array(Vec<ExprRef>),
    /// `{key: expr, ...}` in source order.
    Dict(Vec<(String, ExprRef)>),

    Prefix {
        op: UnaryOp,
        operand: ExprRef,
    },
    Binary {
        op: BinaryOp,
        left: ExprRef,
        right: ExprRef,
    },

    /// `target[index]`, or `target[?index]` when `optional`.
    Index {
        target: ExprRef,
        index: ExprRef,
        optional: bool,
    },
    /// `target[start:end]`; either bound may be omitted.
    Slice {
        target: ExprRef,
        start: Option<ExprRef>,
        end: Option<ExprRef>,
    },
    /// `target.name`
    Member {
        target: ExprRef,
        name: String,
    },

    /// `callee(args)`
    Call {
        callee: ExprRef,
        args: Vec<ExprRef>,
    },
    /// `receiver.method(args)`
    MethodCall {
        receiver: ExprRef,
        method: String,
        args: Vec<ExprRef>,
    },
    /// `fn(params) { body }`
    Lambda {
        params: Vec<String>,
        body: ExprRef,
    },

    /// A declaration in the current scope. `immutable` marks the immutable
    /// `let` form, which `Assign` cannot rebind; `export` makes the name
    /// visible to importers.
    Let {
        name: String,
        value: ExprRef,
        export: bool,
        immutable: bool,
    },
    /// `name = value` against an existing binding.
    Assign {
        name: String,
        value: ExprRef,
    },

    /// Sequence of expressions; evaluates to the last one.
    Block(Vec<ExprRef>),
    If {
        cond: ExprRef,
        then_branch: ExprRef,
        else_branch: Option<ExprRef>,
    },
}

// Construction helpers. The parser and tests build trees through these
// rather than spelling out `Arc::new(Expr::...)` everywhere.
impl Expr {
    pub fn null() -> ExprRef {
        Arc::new(Expr::Null)
    }

    pub fn bool(b: bool) -> ExprRef {
        Arc::new(Expr::Bool(b))
    }

    pub fn int(n: i64) -> ExprRef {
        Arc::new(Expr::Int(n))
    }

    pub fn float(f: f64) -> ExprRef {
        Arc::new(Expr::Float(f))
    }

    pub fn str(s: impl Into<String>) -> ExprRef {
        Arc::new(Expr::Str(s.into()))
    }

    pub fn money(amount: i64, currency: impl Into<String>, scale: u8) -> ExprRef {
        Arc::new(Expr::Money {
            amount,
            currency: currency.into(),
            scale,
        })
    }

    pub fn unit(value: f64, suffix: impl Into<String>) -> ExprRef {
        Arc::new(Expr::Unit {
            value,
            suffix: suffix.into(),
        })
    }

    pub fn ident(name: impl Into<String>) -> ExprRef {
        Arc::new(Expr::Ident(name.into()))
    }

    pub fn this() -> ExprRef {
        Arc::new(Expr::This)
    }

    pub fn array(items: impl IntoIterator<Item = ExprRef>) -> ExprRef {
        Arc::new(Expr::Array(items.into_iter().collect()))
    }

    pub fn dict<K: Into<String>>(entries: impl IntoIterator<Item = (K, ExprRef)>) -> ExprRef {
        Arc::new(Expr::Dict(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn prefix(op: UnaryOp, operand: ExprRef) -> ExprRef {
        Arc::new(Expr::Prefix { op, operand })
    }

    pub fn binary(op: BinaryOp, left: ExprRef, right: ExprRef) -> ExprRef {
        Arc::new(Expr::Binary { op, left, right })
    }

    pub fn index(target: ExprRef, index: ExprRef) -> ExprRef {
        Arc::new(Expr::Index {
            target,
            index,
            optional: false,
        })
    }

    pub fn optional_index(target: ExprRef, index: ExprRef) -> ExprRef {
        Arc::new(Expr::Index {
            target,
            index,
            optional: true,
        })
    }

    pub fn slice(target: ExprRef, start: Option<ExprRef>, end: Option<ExprRef>) -> ExprRef {
        Arc::new(Expr::Slice { target, start, end })
    }

    pub fn member(target: ExprRef, name: impl Into<String>) -> ExprRef {
        Arc::new(Expr::Member {
            target,
            name: name.into(),
        })
    }

    pub fn call(callee: ExprRef, args: impl IntoIterator<Item = ExprRef>) -> ExprRef {
        Arc::new(Expr::Call {
            callee,
            args: args.into_iter().collect(),
        })
    }

    pub fn method(
        receiver: ExprRef,
        method: impl Into<String>,
        args: impl IntoIterator<Item = ExprRef>,
    ) -> ExprRef {
        Arc::new(Expr::MethodCall {
            receiver,
            method: method.into(),
            args: args.into_iter().collect(),
        })
    }

    pub fn lambda<P: Into<String>>(params: impl IntoIterator<Item = P>, body: ExprRef) -> ExprRef {
        Arc::new(Expr::Lambda {
            params: params.into_iter().map(Into::into).collect(),
            body,
        })
    }

    /// A local, reassignable declaration.
    pub fn let_(name: impl Into<String>, value: ExprRef) -> ExprRef {
        Arc::new(Expr::Let {
            name: name.into(),
            value,
            export: false,
            immutable: false,
        })
    }

    pub fn assign(name: impl Into<String>, value: ExprRef) -> ExprRef {
        Arc::new(Expr::Assign {
            name: name.into(),
            value,
        })
    }

    pub fn block(items: impl IntoIterator<Item = ExprRef>) -> ExprRef {
        Arc::new(Expr::Block(items.into_iter().collect()))
    }

    pub fn if_(cond: ExprRef, then_branch: ExprRef, else_branch: Option<ExprRef>) -> ExprRef {
        Arc::new(Expr::If {
            cond,
            then_branch,
            else_branch,
        })
    }
}

/// Writes `items` separated by `", "`.
fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Source-like rendering, used when inspecting dictionaries whose entries
/// have not been evaluated.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Null => f.write_str("null"),
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Int(n) => write!(f, "{n}"),
            Expr::Float(x) => write!(f, "{x}"),
            Expr::Str(s) => write!(f, "{s:?}"),
            Expr::Money {
                amount,
                currency,
                scale,
            } => write!(f, "{currency}#{amount}e-{scale}"),
            Expr::Unit { value, suffix } => write!(f, "{value}{suffix}"),
            Expr::Ident(name) => f.write_str(name),
            Expr::This => f.write_str("this"),
            Expr::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Expr::Dict(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Expr::Prefix { op, operand } => write!(f, "{}{operand}", op.as_symbol()),
            Expr::Binary { op, left, right } => {
                write!(f, "({left} {} {right})", op.as_symbol())
            }
            Expr::Index {
                target,
                index,
                optional,
            } => {
                let q = if *optional { "?" } else { "" };
                write!(f, "{target}[{q}{index}]")
            }
            Expr::Slice { target, start, end } => {
                write!(f, "{target}[")?;
                if let Some(start) = start {
                    write!(f, "{start}")?;
                }
                f.write_str(":")?;
                if let Some(end) = end {
                    write!(f, "{end}")?;
                }
                f.write_str("]")
            }
            Expr::Member { target, name } => write!(f, "{target}.{name}"),
            Expr::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::MethodCall {
                receiver,
                method,
                args,
            } => {
                write!(f, "{receiver}.{method}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::Lambda { params, body } => {
                f.write_str("fn(")?;
                write_list(f, params)?;
                write!(f, ") {{ {body} }}")
            }
            Expr::Let {
                name,
                value,
                export,
                ..
            } => {
                let kw = if *export { "export" } else { "let" };
                write!(f, "{kw} {name} = {value}")
            }
            Expr::Assign { name, value } => write!(f, "{name} = {value}"),
            Expr::Block(items) => {
                f.write_str("{ ")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(" }")
            }
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                write!(f, "if ({cond}) {then_branch}")?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else {else_branch}")?;
                }
                Ok(())
            }
        }
    }
}
