//! Field sanitization and validation applied to every submitted form before it is written.
//!
//! A field is trimmed first, then checked, then escaped, so length limits count the characters
//! the user typed. Every failing rule contributes a message; nothing stops at the first error.

use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Replaces characters significant in HTML with entities.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            other => out.push(other),
        }
    }
    out
}

/// A form posted by the browser, sanitized into the record it describes.
pub trait Form: Sized + Clone + Serialize {
    type Target;

    fn sanitize(self) -> Submission<Self>;
}

/// Sanitized form plus the outcome of its field rules.
#[derive(Debug, Clone)]
pub struct Submission<F: Form> {
    pub form: F,
    pub errors: Vec<FieldError>,
    target: Option<F::Target>,
}

/// What goes back to the form view when a write is refused.
#[derive(Debug, Clone, Serialize)]
pub struct Rejected<F> {
    pub form: F,
    pub errors: Vec<FieldError>,
}

impl<F: Form> Submission<F> {
    pub fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError { field, message: message.into() });
        self.target = None;
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.target.is_some()
    }

    pub fn into_result(self) -> Result<F::Target, Rejected<F>> {
        match self.target {
            Some(target) if self.errors.is_empty() => Ok(target),
            _ => Err(Rejected { form: self.form, errors: self.errors }),
        }
    }
}

#[derive(Debug, Default)]
pub struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&mut self, name: &'static str, raw: &str) -> FieldCheck<'_> {
        FieldCheck { checker: self, name, value: raw.trim().to_string() }
    }

    /// Finishes the checks; the target is dropped when any rule failed.
    pub fn submit<F: Form>(self, form: F, target: Option<F::Target>) -> Submission<F> {
        let target = if self.errors.is_empty() { target } else { None };
        Submission { form, errors: self.errors, target }
    }
}

pub struct FieldCheck<'c> {
    checker: &'c mut Checker,
    name: &'static str,
    value: String,
}

impl FieldCheck<'_> {
    fn fail(&mut self, message: &str) {
        self.checker.errors.push(FieldError { field: self.name, message: message.to_string() });
    }

    pub fn min_len(mut self, min: usize, message: &str) -> Self {
        if self.value.chars().count() < min {
            self.fail(message);
        }
        self
    }

    pub fn len_between(mut self, min: usize, max: usize, message: &str) -> Self {
        let len = self.value.chars().count();
        if len < min || len > max {
            self.fail(message);
        }
        self
    }

    pub fn one_of(mut self, options: &[&str], message: &str) -> Self {
        if !options.contains(&self.value.as_str()) {
            self.fail(message);
        }
        self
    }

    pub fn int_between(mut self, min: i64, max: i64, message: &str) -> Self {
        match self.value.parse::<i64>() {
            Ok(n) if (min..=max).contains(&n) => {}
            _ => self.fail(message),
        }
        self
    }

    pub fn decimal_min(mut self, min: Decimal, message: &str) -> Self {
        match Decimal::from_str(&self.value) {
            Ok(d) if d >= min => {}
            _ => self.fail(message),
        }
        self
    }

    pub fn escape(mut self) -> Self {
        self.value = escape(&self.value);
        self
    }

    pub fn value(self) -> String {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize)]
    struct QtyForm {
        qty: String,
    }

    impl Form for QtyForm {
        type Target = i64;

        fn sanitize(self) -> Submission<Self> {
            let mut checker = Checker::new();
            let qty = checker.field("qty", &self.qty).int_between(1, 100, "Quantity must be 1-100.").value();
            let parsed = qty.parse().ok();
            checker.submit(QtyForm { qty }, parsed)
        }
    }

    #[test]
    fn escape_replaces_markup_characters() {
        assert_eq!(escape(r#"<a href="/x">'&'</a>"#), "&lt;a href=&quot;&#x2F;x&quot;&gt;&#x27;&amp;&#x27;&lt;&#x2F;a&gt;");
        assert_eq!(escape("back\\tick`"), "back&#x5C;tick&#96;");
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn length_counts_trimmed_characters_before_escaping() {
        let mut checker = Checker::new();
        let value = checker.field("name", "  <>  ").len_between(2, 2, "bad").escape().value();
        assert_eq!(value, "&lt;&gt;");
        let sub = checker.submit(QtyForm { qty: value }, Some(1));
        assert!(sub.is_valid());
    }

    #[test]
    fn integer_range_is_inclusive() {
        assert_eq!(QtyForm { qty: " 1 ".into() }.sanitize().into_result().unwrap(), 1);
        assert_eq!(QtyForm { qty: "100".into() }.sanitize().into_result().unwrap(), 100);
        for bad in ["0", "101", "1.5", "ten", ""] {
            let rejected = QtyForm { qty: bad.into() }.sanitize().into_result().unwrap_err();
            assert_eq!(rejected.errors[0].field, "qty");
        }
    }

    #[test]
    fn decimal_minimum_accepts_fractions() {
        let mut checker = Checker::new();
        checker.field("price", "1.00").decimal_min(Decimal::ONE, "too low");
        checker.field("price", "12.5").decimal_min(Decimal::ONE, "too low");
        checker.field("price", "0.99").decimal_min(Decimal::ONE, "too low");
        checker.field("price", "abc").decimal_min(Decimal::ONE, "too low");
        let sub = checker.submit(QtyForm { qty: String::new() }, Some(0));
        assert_eq!(sub.errors.len(), 2);
        assert!(!sub.is_valid());
    }

    #[test]
    fn late_rejection_discards_target() {
        let mut sub = QtyForm { qty: "5".into() }.sanitize();
        assert!(sub.is_valid());
        sub.reject("qty", "Referenced record does not exist.");
        let rejected = sub.into_result().unwrap_err();
        assert_eq!(rejected.errors.len(), 1);
        assert_eq!(rejected.form.qty, "5");
    }
}
