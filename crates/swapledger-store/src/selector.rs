//! Selector query language of the in-memory store.
//!
//! ```text
//! {"selector": {"docType": "asset", "owner": "tom", "size": {"$gt": 10}}}
//! ```
//!
//! Each selector field is a dotted path into the record (`want.category`)
//! and either a literal (equality) or an operator object using `$eq`,
//! `$ne`, `$gt`, `$gte`, `$lt`, `$lte`. All clauses must hold. Top-level
//! `use_index`, `fields` and `sort` members are accepted and ignored.

use std::cmp::Ordering;

use serde_json::{Map, Value};
use swapledger_types::{LedgerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Op {
    fn parse(name: &str) -> Result<Self> {
        Ok(match name {
            "$eq" => Self::Eq,
            "$ne" => Self::Ne,
            "$gt" => Self::Gt,
            "$gte" => Self::Gte,
            "$lt" => Self::Lt,
            "$lte" => Self::Lte,
            other => {
                return Err(LedgerError::InvalidQuery {
                    reason: format!("unsupported operator {other}"),
                });
            }
        })
    }
}

#[derive(Debug, Clone)]
struct Clause {
    path: Vec<String>,
    op: Op,
    operand: Value,
}

/// A parsed selector expression.
#[derive(Debug, Clone)]
pub struct Selector {
    clauses: Vec<Clause>,
}

impl Selector {
    /// Parse a query expression.
    pub fn parse(expr: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(expr).map_err(|err| LedgerError::InvalidQuery {
            reason: err.to_string(),
        })?;
        let selector = doc
            .get("selector")
            .and_then(Value::as_object)
            .ok_or_else(|| LedgerError::InvalidQuery {
                reason: "expected a top-level \"selector\" object".into(),
            })?;

        let mut clauses = Vec::new();
        for (field, condition) in selector {
            let path: Vec<String> = field.split('.').map(str::to_string).collect();
            match condition {
                Value::Object(ops) if is_operator_object(ops) => {
                    for (name, operand) in ops {
                        clauses.push(Clause {
                            path: path.clone(),
                            op: Op::parse(name)?,
                            operand: operand.clone(),
                        });
                    }
                }
                literal => clauses.push(Clause {
                    path,
                    op: Op::Eq,
                    operand: literal.clone(),
                }),
            }
        }
        Ok(Self { clauses })
    }

    /// `true` if `record` satisfies every clause.
    #[must_use]
    pub fn matches(&self, record: &Value) -> bool {
        self.clauses.iter().all(|clause| {
            let Some(actual) = lookup(record, &clause.path) else {
                return clause.op == Op::Ne;
            };
            let ordering = compare(actual, &clause.operand);
            match clause.op {
                Op::Eq => ordering == Some(Ordering::Equal),
                Op::Ne => ordering != Some(Ordering::Equal),
                Op::Gt => ordering == Some(Ordering::Greater),
                Op::Gte => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
                Op::Lt => ordering == Some(Ordering::Less),
                Op::Lte => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            }
        })
    }
}

fn is_operator_object(map: &Map<String, Value>) -> bool {
    !map.is_empty() && map.keys().all(|k| k.starts_with('$'))
}

fn lookup<'a>(record: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(record, |node, segment| node.get(segment))
}

/// Numbers compare numerically, strings lexicographically; other equal-typed
/// values only compare for equality. Mixed types are unordered.
fn compare(actual: &Value, operand: &Value) -> Option<Ordering> {
    match (actual, operand) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (a, b) if a == b => Some(Ordering::Equal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn asset(owner: &str, size: u64) -> Value {
        json!({"docType": "asset", "id": "m", "category": "blue", "size": size, "owner": owner})
    }

    #[test]
    fn equality_clauses() {
        let sel = Selector::parse(r#"{"selector":{"docType":"asset","owner":"tom"}}"#).unwrap();
        assert!(sel.matches(&asset("tom", 1)));
        assert!(!sel.matches(&asset("jerry", 1)));
    }

    #[test]
    fn operators() {
        let sel = Selector::parse(
            r#"{"selector":{"docType":{"$eq":"asset"},"owner":{"$eq":"tom"},"size":{"$gt":0}},"use_index":"_design/x"}"#,
        )
        .unwrap();
        assert!(sel.matches(&asset("tom", 35)));
        assert!(!sel.matches(&asset("tom", 0)));

        let range = Selector::parse(r#"{"selector":{"size":{"$gte":10,"$lt":20}}}"#).unwrap();
        assert!(range.matches(&asset("x", 10)));
        assert!(range.matches(&asset("x", 19)));
        assert!(!range.matches(&asset("x", 20)));
    }

    #[test]
    fn dotted_paths_reach_nested_fields() {
        let sel = Selector::parse(r#"{"selector":{"want.category":"red"}}"#).unwrap();
        assert!(sel.matches(&json!({"want": {"category": "red", "size": 1}})));
        assert!(!sel.matches(&json!({"want": {"category": "blue", "size": 1}})));
        assert!(!sel.matches(&json!({"offer": {"category": "red"}})));
    }

    #[test]
    fn ne_matches_missing_field() {
        let sel = Selector::parse(r#"{"selector":{"owner":{"$ne":"tom"}}}"#).unwrap();
        assert!(sel.matches(&json!({"id": "x"})));
        assert!(!sel.matches(&asset("tom", 1)));
    }

    #[test]
    fn malformed_queries_rejected() {
        assert!(matches!(
            Selector::parse("not json"),
            Err(LedgerError::InvalidQuery { .. })
        ));
        assert!(Selector::parse(r#"{"fields":["owner"]}"#).is_err());
        assert!(Selector::parse(r#"{"selector":{"size":{"$regex":"x"}}}"#).is_err());
    }

    #[test]
    fn mixed_types_never_match() {
        let sel = Selector::parse(r#"{"selector":{"size":"35"}}"#).unwrap();
        assert!(!sel.matches(&asset("tom", 35)));
    }
}
