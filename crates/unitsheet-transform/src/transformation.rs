//! Declarative column transformations.
//!
//! Each [`TransformKind`] variant carries its own typed configuration. A
//! [`Transformation`] is validated once, when it is built; applying it to
//! rows never fails.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransformError};

/// Binary operation of a formula transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaOp {
    Multiply,
    Add,
    Subtract,
    Divide,
}

impl FormulaOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaOp::Multiply => "multiply",
            FormulaOp::Add => "add",
            FormulaOp::Subtract => "subtract",
            FormulaOp::Divide => "divide",
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            FormulaOp::Multiply => '*',
            FormulaOp::Add => '+',
            FormulaOp::Subtract => '-',
            FormulaOp::Divide => '/',
        }
    }

    /// Evaluates the operation. Division by zero yields `None`.
    pub fn eval(&self, lhs: f64, rhs: f64) -> Option<f64> {
        match self {
            FormulaOp::Multiply => Some(lhs * rhs),
            FormulaOp::Add => Some(lhs + rhs),
            FormulaOp::Subtract => Some(lhs - rhs),
            FormulaOp::Divide if rhs == 0.0 => None,
            FormulaOp::Divide => Some(lhs / rhs),
        }
    }
}

impl fmt::Display for FormulaOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific configuration of a transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformKind {
    /// Splits a cell on a literal delimiter into several columns.
    Split {
        source_column: String,
        delimiter: String,
        target_columns: Vec<String>,
    },
    /// Joins the non-empty cells of several columns.
    Merge {
        source_columns: Vec<String>,
        target_column: String,
        /// Defaults to a single space when absent or empty.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        separator: Option<String>,
    },
    /// Writes the same literal into every row.
    Static { target_column: String, value: String },
    /// Binary arithmetic over two columns.
    Formula {
        target_column: String,
        #[serde(rename = "formula")]
        op: FormulaOp,
        column1: String,
        column2: String,
    },
}

pub const DEFAULT_MERGE_SEPARATOR: &str = " ";

impl TransformKind {
    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::Split { .. } => "split",
            TransformKind::Merge { .. } => "merge",
            TransformKind::Static { .. } => "static",
            TransformKind::Formula { .. } => "formula",
        }
    }

    /// Checks that every required configuration key is present.
    pub fn validate(&self) -> Result<()> {
        let kind = self.name();
        let missing = |field| Err(TransformError::MissingConfig { kind, field });
        match self {
            TransformKind::Split {
                source_column,
                delimiter,
                target_columns,
            } => {
                if is_blank(source_column) {
                    return missing("a source column");
                }
                if delimiter.is_empty() {
                    return missing("a delimiter");
                }
                if target_columns.is_empty() || target_columns.iter().any(|c| is_blank(c)) {
                    return missing("named target columns");
                }
            }
            TransformKind::Merge {
                source_columns,
                target_column,
                ..
            } => {
                if source_columns.is_empty() || source_columns.iter().any(|c| is_blank(c)) {
                    return missing("named source columns");
                }
                if is_blank(target_column) {
                    return missing("a target column");
                }
            }
            TransformKind::Static { target_column, .. } => {
                if is_blank(target_column) {
                    return missing("a target column");
                }
            }
            TransformKind::Formula {
                target_column,
                column1,
                column2,
                ..
            } => {
                if is_blank(target_column) {
                    return missing("a target column");
                }
                if is_blank(column1) || is_blank(column2) {
                    return missing("two operand columns");
                }
            }
        }
        Ok(())
    }

    /// Columns read by this transformation.
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            TransformKind::Split { source_column, .. } => vec![source_column.as_str()],
            TransformKind::Merge { source_columns, .. } => {
                source_columns.iter().map(String::as_str).collect()
            }
            TransformKind::Static { .. } => Vec::new(),
            TransformKind::Formula {
                column1, column2, ..
            } => vec![column1.as_str(), column2.as_str()],
        }
    }

    /// Columns written by this transformation.
    pub fn outputs(&self) -> Vec<&str> {
        match self {
            TransformKind::Split { target_columns, .. } => {
                target_columns.iter().map(String::as_str).collect()
            }
            TransformKind::Merge { target_column, .. }
            | TransformKind::Static { target_column, .. }
            | TransformKind::Formula { target_column, .. } => vec![target_column.as_str()],
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// A named, ordered transformation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub kind: TransformKind,
    /// Position within the owning pipeline, renumbered on every edit.
    #[serde(default)]
    pub order: u32,
}

impl Transformation {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: TransformKind,
    ) -> Result<Self> {
        let transformation = Self {
            id: id.into(),
            name: name.into(),
            kind,
            order: 0,
        };
        transformation.validate()?;
        Ok(transformation)
    }

    /// Re-checks a transformation that was deserialized rather than built.
    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.id) {
            return Err(TransformError::EmptyId);
        }
        self.kind.validate()
    }

    pub fn split(
        id: impl Into<String>,
        source_column: impl Into<String>,
        delimiter: impl Into<String>,
        target_columns: &[&str],
    ) -> Result<Self> {
        let source_column = source_column.into();
        let name = format!("Split {source_column}");
        Self::new(
            id,
            name,
            TransformKind::Split {
                source_column,
                delimiter: delimiter.into(),
                target_columns: target_columns.iter().map(|c| (*c).to_string()).collect(),
            },
        )
    }

    pub fn merge(
        id: impl Into<String>,
        source_columns: &[&str],
        separator: Option<&str>,
        target_column: impl Into<String>,
    ) -> Result<Self> {
        let target_column = target_column.into();
        let name = format!("Merge into {target_column}");
        Self::new(
            id,
            name,
            TransformKind::Merge {
                source_columns: source_columns.iter().map(|c| (*c).to_string()).collect(),
                target_column,
                separator: separator.map(str::to_string),
            },
        )
    }

    pub fn constant(
        id: impl Into<String>,
        target_column: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let target_column = target_column.into();
        let name = format!("Set {target_column}");
        Self::new(
            id,
            name,
            TransformKind::Static {
                target_column,
                value: value.into(),
            },
        )
    }

    pub fn formula(
        id: impl Into<String>,
        target_column: impl Into<String>,
        op: FormulaOp,
        column1: impl Into<String>,
        column2: impl Into<String>,
    ) -> Result<Self> {
        let target_column = target_column.into();
        let name = format!("{op} into {target_column}");
        Self::new(
            id,
            name,
            TransformKind::Formula {
                target_column,
                op,
                column1: column1.into(),
                column2: column2.into(),
            },
        )
    }

    /// Every column the transformation reads or writes, inputs first.
    pub fn affected_columns(&self) -> Vec<&str> {
        let mut columns = self.kind.inputs();
        for output in self.kind.outputs() {
            if !columns.contains(&output) {
                columns.push(output);
            }
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_config() {
        let err = Transformation::split("t1", "Code", "", &["A"]).unwrap_err();
        assert_eq!(
            err,
            TransformError::MissingConfig {
                kind: "split",
                field: "a delimiter"
            }
        );
        assert!(Transformation::merge("t2", &[], None, "X").is_err());
        assert!(Transformation::constant("t3", " ", "v").is_err());
        assert!(Transformation::formula("t4", "X", FormulaOp::Add, "A", "").is_err());
        assert_eq!(
            Transformation::constant("", "X", "v").unwrap_err(),
            TransformError::EmptyId
        );
    }

    #[test]
    fn affected_columns_follow_variant() {
        let split = Transformation::split("t1", "Code", "-", &["Block", "Unit"]).unwrap();
        assert_eq!(split.affected_columns(), vec!["Code", "Block", "Unit"]);
        let formula =
            Transformation::formula("t2", "Total", FormulaOp::Multiply, "Area", "Rate").unwrap();
        assert_eq!(formula.affected_columns(), vec!["Area", "Rate", "Total"]);
    }

    #[test]
    fn divide_by_zero_has_no_value() {
        assert_eq!(FormulaOp::Divide.eval(10.0, 0.0), None);
        assert_eq!(FormulaOp::Multiply.eval(10.0, 0.0), Some(0.0));
        assert_eq!(FormulaOp::Subtract.eval(0.0, 4.0), Some(-4.0));
    }
}
