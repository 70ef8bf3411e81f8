//! Builder expressions produced inside a property body.
//!
//! A property body assembles a [`LogicExpr`] tree with these combinators;
//! the lowering pass turns it into a `Relation` tree once every referenced
//! property signature is known. Converter, equality and predicate
//! properties are referenced by their stable uid.

use crate::operand::Operand;

/// One combinator call in a property body.
#[derive(Clone, Debug)]
pub enum LogicExpr {
    /// `Bind(from, to, converter?, equality?)`
    Bind {
        from: Operand,
        to: Operand,
        converter: Option<String>,
        equality: Option<String>,
    },
    /// `Predicate(property, *args)`: logic variables first, then the
    /// closure arguments.
    Predicate { property: String, args: Vec<Operand> },
    /// `Domain(var, domain)`
    Domain { var: Operand, domain: Operand },
    /// `Any(relations)`: ordered disjunction.
    Any(Vec<LogicExpr>),
    /// `All(relations)`: conjunction.
    All(Vec<LogicExpr>),
    /// `LogicTrue()`
    True,
    /// `LogicFalse()`
    False,
}

impl LogicExpr {
    pub fn bind(from: impl Into<Operand>, to: impl Into<Operand>) -> Self {
        LogicExpr::Bind {
            from: from.into(),
            to: to.into(),
            converter: None,
            equality: None,
        }
    }

    pub fn bind_with(
        from: impl Into<Operand>,
        to: impl Into<Operand>,
        converter: Option<&str>,
        equality: Option<&str>,
    ) -> Self {
        LogicExpr::Bind {
            from: from.into(),
            to: to.into(),
            converter: converter.map(str::to_string),
            equality: equality.map(str::to_string),
        }
    }

    pub fn pred(property: impl Into<String>, args: Vec<Operand>) -> Self {
        LogicExpr::Predicate {
            property: property.into(),
            args,
        }
    }

    pub fn domain(var: impl Into<Operand>, domain: impl Into<Operand>) -> Self {
        LogicExpr::Domain {
            var: var.into(),
            domain: domain.into(),
        }
    }

    pub fn any(children: Vec<LogicExpr>) -> Self {
        LogicExpr::Any(children)
    }

    pub fn all(children: Vec<LogicExpr>) -> Self {
        LogicExpr::All(children)
    }

    pub fn logic_true() -> Self {
        LogicExpr::True
    }

    pub fn logic_false() -> Self {
        LogicExpr::False
    }
}
