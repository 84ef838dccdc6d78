use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    Eq(Value),
    Ne(Value),
    Lt(Value),
    Le(Value),
    Gt(Value),
    Ge(Value),
    In(Vec<Value>),
    /// String equality ignoring ASCII and Unicode case.
    EqIgnoreCase(String),
}

impl FilterOp {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FilterOp::Eq(expected) => compare(value, expected) == Some(Ordering::Equal),
            FilterOp::Ne(expected) => compare(value, expected) != Some(Ordering::Equal),
            FilterOp::Lt(expected) => compare(value, expected) == Some(Ordering::Less),
            FilterOp::Le(expected) => matches!(compare(value, expected), Some(Ordering::Less | Ordering::Equal)),
            FilterOp::Gt(expected) => compare(value, expected) == Some(Ordering::Greater),
            FilterOp::Ge(expected) => matches!(compare(value, expected), Some(Ordering::Greater | Ordering::Equal)),
            FilterOp::In(options) => options.iter().any(|o| compare(value, o) == Some(Ordering::Equal)),
            FilterOp::EqIgnoreCase(expected) => value
                .as_str()
                .is_some_and(|s| s.to_lowercase() == expected.to_lowercase()),
        }
    }
}

/// Orders two JSON scalars. Numbers are compared numerically, which also covers decimals
/// serialized as strings, e.g. "12.50" vs 3.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::String(x), Value::Number(y)) => x.parse::<f64>().ok()?.partial_cmp(&y.as_f64()?),
        (Value::Number(x), Value::String(y)) => x.as_f64()?.partial_cmp(&y.parse::<f64>().ok()?),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Filter, sort and limit over named top-level document fields.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<(String, FilterOp)>,
    sort: Option<(String, SortOrder)>,
    limit: Option<usize>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: &str, op: FilterOp) -> Self {
        self.filters.push((field.to_string(), op));
        self
    }

    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.filter(field, FilterOp::Eq(value.into()))
    }

    pub fn sort_by(mut self, field: &str, order: SortOrder) -> Self {
        self.sort = Some((field.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.filters.iter().all(|(field, op)| op.matches(doc.get(field).unwrap_or(&Value::Null)))
    }

    /// Missing fields sort before present ones, incomparable values keep insertion order.
    pub(crate) fn apply<T>(&self, mut rows: Vec<(Value, T)>) -> Vec<T> {
        if let Some((field, order)) = &self.sort {
            rows.sort_by(|(a, _), (b, _)| {
                let ord = match (a.get(field), b.get(field)) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Less,
                    (Some(_), None) => Ordering::Greater,
                    (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
                };
                match order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }
        let take = self.limit.unwrap_or(usize::MAX);
        rows.into_iter().take(take).map(|(_, row)| row).collect()
    }
}
