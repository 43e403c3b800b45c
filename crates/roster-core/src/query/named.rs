//! Named queries - explicit SQL declared once and checked up front
//!
//! A query string written by hand is only known to be correct once the
//! database has seen it. [`NamedQuery::new`] catches structural mistakes
//! (missing or skipped placeholders, wrong parameter count) when the query
//! is declared, and the repository layer prepares every declared query
//! against the server while it initializes.

use crate::error::DomainError;

/// An explicit, parameterised SQL statement with a stable name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedQuery {
    name: &'static str,
    sql: &'static str,
    params: usize,
}

impl NamedQuery {
    /// Declare a query taking `params` positional parameters (`$1..$params`)
    pub fn new(name: &'static str, sql: &'static str, params: usize) -> Result<Self, DomainError> {
        let invalid = |reason: String| DomainError::InvalidQuery { name, reason };

        if sql.trim().is_empty() {
            return Err(invalid("query text is empty".to_string()));
        }

        let placeholders = placeholders(sql).map_err(invalid)?;
        let highest = placeholders.iter().copied().max().unwrap_or(0);

        if let Some(missing) = (1..=highest).find(|n| !placeholders.contains(n)) {
            return Err(invalid(format!("placeholder ${missing} is never used")));
        }
        if highest != params {
            return Err(invalid(format!(
                "declares {params} parameter(s) but uses {highest}"
            )));
        }

        Ok(Self { name, sql, params })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn sql(&self) -> &'static str {
        self.sql
    }

    pub fn params(&self) -> usize {
        self.params
    }
}

/// Collect `$n` placeholders outside single-quoted literals
fn placeholders(sql: &str) -> Result<Vec<usize>, String> {
    let mut found = Vec::new();
    let mut in_literal = false;
    let mut chars = sql.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        match ch {
            '\'' => in_literal = !in_literal,
            '$' if !in_literal => {
                let mut digits = String::new();
                while let Some(&(_, next)) = chars.peek() {
                    if !next.is_ascii_digit() {
                        break;
                    }
                    digits.push(next);
                    chars.next();
                }
                if digits.is_empty() {
                    return Err("'$' must be followed by a parameter number".to_string());
                }
                let n: usize = digits
                    .parse()
                    .map_err(|_| format!("invalid placeholder ${digits}"))?;
                if n == 0 {
                    return Err("placeholders start at $1".to_string());
                }
                if !found.contains(&n) {
                    found.push(n);
                }
            }
            _ => {}
        }
    }

    if in_literal {
        return Err("unterminated string literal".to_string());
    }
    Ok(found)
}
