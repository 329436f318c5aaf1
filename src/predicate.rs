//! Storage predicates.
//!
//! A small boolean expression language over the four key columns of a verse
//! row. It is what the range compiler emits and what a [`Store`](crate::Store)
//! consumes. Two interpretations are provided:
//!
//! - [`Predicate::matches`] evaluates against an in-memory [`Verse`].
//! - [`Predicate::to_sql`] renders a parameterised SQL `WHERE` fragment.
//!
//! ```text
//! Or ─┬─ And ─┬─ Eq(book, "genesis")
//!     │       └─ Or ─┬─ And(Eq(chapter,1), Ge(verse,1))
//!     │              └─ Gt(chapter,1)
//!     └─ And ─┬─ Eq(book, "exodus")
//!             └─ ...
//! ```

use std::fmt;

use crate::Verse;

/// Verse columns a predicate can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Translation,
    Book,
    Chapter,
    Verse,
}

impl Field {
    pub fn column(self) -> &'static str {
        match self {
            Field::Translation => "translation",
            Field::Book => "book",
            Field::Chapter => "chapter",
            Field::Verse => "verse",
        }
    }

    fn number(self, verse: &Verse) -> Option<u16> {
        match self {
            Field::Chapter => Some(verse.chapter),
            Field::Verse => Some(verse.verse),
            Field::Translation | Field::Book => None,
        }
    }

    fn text(self, verse: &Verse) -> Option<&str> {
        match self {
            Field::Translation => Some(&verse.translation),
            Field::Book => Some(&verse.book),
            Field::Chapter | Field::Verse => None,
        }
    }
}

/// Boolean expression over verse columns.
///
/// Text comparisons (`Is`, `In`) apply to `Translation`/`Book`; numeric ones
/// to `Chapter`/`Verse`. A mismatched field never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Is(Field, String),
    In(Field, Vec<String>),
    Eq(Field, u16),
    Gt(Field, u16),
    Ge(Field, u16),
    Lt(Field, u16),
    Le(Field, u16),
    /// Inclusive on both ends.
    Between(Field, u16, u16),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn book(slug: &str) -> Self {
        Predicate::Is(Field::Book, slug.to_string())
    }

    pub fn translation(slug: &str) -> Self {
        Predicate::Is(Field::Translation, slug.to_string())
    }

    pub fn matches(&self, verse: &Verse) -> bool {
        match self {
            Predicate::Is(field, value) => field.text(verse) == Some(value.as_str()),
            Predicate::In(field, values) => field.text(verse).is_some_and(|t| values.iter().any(|v| v == t)),
            Predicate::Eq(field, n) => field.number(verse) == Some(*n),
            Predicate::Gt(field, n) => field.number(verse).is_some_and(|v| v > *n),
            Predicate::Ge(field, n) => field.number(verse).is_some_and(|v| v >= *n),
            Predicate::Lt(field, n) => field.number(verse).is_some_and(|v| v < *n),
            Predicate::Le(field, n) => field.number(verse).is_some_and(|v| v <= *n),
            Predicate::Between(field, lo, hi) => field.number(verse).is_some_and(|v| *lo <= v && v <= *hi),
            Predicate::And(parts) => parts.iter().all(|p| p.matches(verse)),
            Predicate::Or(parts) => parts.iter().any(|p| p.matches(verse)),
        }
    }

    /// Render as a parameterised SQL boolean expression.
    pub fn to_sql(&self) -> SqlFragment {
        let mut out = SqlFragment::default();
        self.write_sql(&mut out);
        out
    }

    fn write_sql(&self, out: &mut SqlFragment) {
        match self {
            Predicate::Is(field, value) => {
                out.clause.push_str(&format!("{} = ?", field.column()));
                out.params.push(SqlParam::Text(value.clone()));
            }
            Predicate::In(field, values) => {
                if values.is_empty() {
                    out.clause.push_str("1 = 0");
                    return;
                }
                let marks = vec!["?"; values.len()].join(", ");
                out.clause.push_str(&format!("{} IN ({marks})", field.column()));
                out.params.extend(values.iter().cloned().map(SqlParam::Text));
            }
            Predicate::Eq(field, n) => out.compare(*field, "=", *n),
            Predicate::Gt(field, n) => out.compare(*field, ">", *n),
            Predicate::Ge(field, n) => out.compare(*field, ">=", *n),
            Predicate::Lt(field, n) => out.compare(*field, "<", *n),
            Predicate::Le(field, n) => out.compare(*field, "<=", *n),
            Predicate::Between(field, lo, hi) => {
                out.clause.push_str(&format!("{} BETWEEN ? AND ?", field.column()));
                out.params.push(SqlParam::Int(i64::from(*lo)));
                out.params.push(SqlParam::Int(i64::from(*hi)));
            }
            Predicate::And(parts) => out.join(parts, " AND ", "1 = 1"),
            Predicate::Or(parts) => out.join(parts, " OR ", "1 = 0"),
        }
    }
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            SqlParam::Int(n) => write!(f, "{n}"),
        }
    }
}

/// SQL text with `?` placeholders and their parameters in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlFragment {
    pub clause: String,
    pub params: Vec<SqlParam>,
}

impl SqlFragment {
    fn compare(&mut self, field: Field, op: &str, n: u16) {
        self.clause.push_str(&format!("{} {op} ?", field.column()));
        self.params.push(SqlParam::Int(i64::from(n)));
    }

    fn join(&mut self, parts: &[Predicate], sep: &str, empty: &str) {
        match parts {
            [] => self.clause.push_str(empty),
            [only] => only.write_sql(self),
            _ => {
                for (idx, part) in parts.iter().enumerate() {
                    if idx > 0 {
                        self.clause.push_str(sep);
                    }
                    let part = innermost(part);
                    let nested = matches!(part, Predicate::And(p) | Predicate::Or(p) if p.len() > 1);
                    if nested {
                        self.clause.push('(');
                    }
                    part.write_sql(self);
                    if nested {
                        self.clause.push(')');
                    }
                }
            }
        }
    }
}

/// Skip through `And`/`Or` wrappers that hold a single child.
fn innermost(predicate: &Predicate) -> &Predicate {
    match predicate {
        Predicate::And(parts) | Predicate::Or(parts) => match parts.as_slice() {
            [only] => innermost(only),
            _ => predicate,
        },
        other => other,
    }
}

/// A verse selection: predicate, canonical ordering and an optional cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseQuery {
    pub predicate: Predicate,
    pub limit: Option<usize>,
}

impl VerseQuery {
    pub fn new(predicate: Predicate) -> Self {
        VerseQuery { predicate, limit: None }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Full `SELECT` against a `verses` table.
    pub fn to_sql(&self) -> SqlFragment {
        let mut where_ = self.predicate.to_sql();
        let mut clause = format!(
            "SELECT translation, book, book_ordinal, book_name, chapter, verse, text FROM verses WHERE {} \
             ORDER BY book_ordinal, chapter, verse",
            where_.clause
        );
        if let Some(limit) = self.limit {
            clause.push_str(" LIMIT ?");
            where_.params.push(SqlParam::Int(limit as i64));
        }
        SqlFragment { clause, params: where_.params }
    }
}
