//! Clause fragments with `?` placeholders.
//!
//! A fragment keeps the caller's SQL text and the values for its `?` tokens
//! side by side. `$n` numbers are only assigned when the whole statement is
//! rendered, so they follow textual order no matter which clause method ran first.

use crate::error::{ModelError, ModelResult};
use crate::qb::param::ParamList;
use crate::value::Value;

/// Number of `?` placeholders in `sql`.
pub(crate) fn count_placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}

/// How a WHERE fragment attaches to the one before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Connective::And => " and ",
            Connective::Or => " or ",
        }
    }
}

/// SQL text plus the values for its `?` tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    sql: String,
    params: Vec<Value>,
}

impl Fragment {
    /// A fragment whose `?` count must equal `params.len()`.
    pub fn template(sql: impl Into<String>, params: Vec<Value>) -> ModelResult<Self> {
        let sql = sql.into();
        let expected = count_placeholders(&sql);
        if expected != params.len() {
            return Err(ModelError::argument(format!(
                "`{}` has {} `?` placeholder(s) but {} parameter(s) were supplied",
                sql,
                expected,
                params.len()
            )));
        }
        Ok(Self { sql, params })
    }

    /// A fragment holding at most one `?`, bound to `param`.
    pub fn single(sql: impl Into<String>, param: Option<Value>) -> ModelResult<Self> {
        let sql = sql.into();
        match (count_placeholders(&sql), param) {
            (0, None) => Ok(Self {
                sql,
                params: Vec::new(),
            }),
            (1, Some(value)) => Ok(Self {
                sql,
                params: vec![value],
            }),
            (0, Some(_)) => Err(ModelError::argument(format!(
                "a parameter was supplied but `{sql}` has no `?` placeholder"
            ))),
            (1, None) => Err(ModelError::argument(format!(
                "`{sql}` has a `?` placeholder, a parameter must be supplied too"
            ))),
            (n, _) => Err(ModelError::argument(format!(
                "`{sql}` has {n} `?` placeholders, only one is supported per call"
            ))),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Append the SQL to `out`, replacing each `?` with the next `$n` and
    /// pushing its value onto `params`.
    pub fn render(&self, out: &mut String, params: &mut ParamList) {
        let mut values = self.params.iter();
        for ch in self.sql.chars() {
            if ch != '?' {
                out.push(ch);
                continue;
            }
            match values.next() {
                Some(value) => {
                    let idx = params.push(value.clone());
                    out.push('$');
                    out.push_str(&idx.to_string());
                }
                None => out.push(ch),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_counts_placeholders() {
        assert!(Fragment::template("a = ? and b = ?", vec![1.into(), 2.into()]).is_ok());
        let err = Fragment::template("a = ? and b = ?", vec![1.into()]).unwrap_err();
        assert!(err.is_argument());
    }

    #[test]
    fn single_requires_matching_param() {
        assert!(Fragment::single("x = ?", None).unwrap_err().is_argument());
        assert!(Fragment::single("x = 1", Some(1.into())).unwrap_err().is_argument());
        assert!(Fragment::single("x = ? or y = ?", Some(1.into())).unwrap_err().is_argument());
        assert!(Fragment::single("x is null", None).is_ok());
        assert_eq!(Fragment::single("x = ?", Some(5.into())).unwrap().params().len(), 1);
    }

    #[test]
    fn render_numbers_from_current_offset() {
        let mut params = ParamList::new();
        params.push(Value::from("earlier"));

        let frag = Fragment::template("a = ? or b = ?", vec![1.into(), 2.into()]).unwrap();
        let mut sql = String::new();
        frag.render(&mut sql, &mut params);

        assert_eq!(sql, "a = $2 or b = $3");
        assert_eq!(params.len(), 3);
    }
}
