//! Two-step delete: a confirmation page listing blocking dependents, then an attempt that
//! only goes through with no dependents and the configured confirmation code.

use crate::model::Present;
use crate::validation::escape;
use docstore::Stored;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct DeleteGuard {
    code: String,
}

/// Confirmation view state, re-rendered with errors when an attempt is refused.
#[derive(Debug, Clone)]
pub struct DeletePage<D, Dep> {
    pub target: Stored<D>,
    pub dependents: Vec<Dep>,
    pub code: String,
    pub errors: Vec<String>,
}

#[derive(Debug)]
pub enum Verdict<D, Dep> {
    Proceed(Stored<D>),
    Blocked(DeletePage<D, Dep>),
}

#[derive(Debug)]
pub enum DeleteOutcome<D, Dep> {
    Deleted,
    Missing,
    Blocked(DeletePage<D, Dep>),
}

impl DeleteGuard {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn confirm<D, Dep>(&self, target: Stored<D>, dependents: Vec<Dep>) -> DeletePage<D, Dep> {
        DeletePage { target, dependents, code: String::new(), errors: Vec::new() }
    }

    pub fn attempt<D, Dep>(&self, target: Stored<D>, dependents: Vec<Dep>, submitted: &str) -> Verdict<D, Dep> {
        let submitted = submitted.trim();
        let mut errors = Vec::new();
        if !dependents.is_empty() {
            errors.push(format!("Delete the {} dependent record(s) listed below before deleting this one.", dependents.len()));
        }
        if submitted != self.code {
            errors.push("Incorrect confirmation code.".to_string());
        }
        if errors.is_empty() {
            Verdict::Proceed(target)
        } else {
            Verdict::Blocked(DeletePage { target, dependents, code: escape(submitted), errors })
        }
    }
}

impl<D, Dep> Present for DeletePage<D, Dep>
where
    Stored<D>: Present,
    Dep: Present,
{
    fn present(&self) -> Value {
        json!({
            "target": self.target.present(),
            "dependents": self.dependents.present(),
            "code": self.code,
            "errors": self.errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstore::DocId;

    fn target() -> Stored<&'static str> {
        Stored::new(DocId::from("01TARGET"), "target")
    }

    #[test]
    fn dependents_block_even_with_correct_code() {
        let guard = DeleteGuard::new("123");
        match guard.attempt(target(), vec!["dep"], "123") {
            Verdict::Blocked(page) => {
                assert_eq!(page.errors.len(), 1);
                assert_eq!(page.dependents, vec!["dep"]);
                assert_eq!(page.code, "123");
            }
            Verdict::Proceed(_) => panic!("delete with dependents must be refused"),
        }
    }

    #[test]
    fn wrong_code_blocks_and_is_echoed_escaped() {
        let guard = DeleteGuard::new("123");
        match guard.attempt::<_, &str>(target(), vec![], " <12> ") {
            Verdict::Blocked(page) => {
                assert_eq!(page.errors, vec!["Incorrect confirmation code.".to_string()]);
                assert_eq!(page.code, "&lt;12&gt;");
            }
            Verdict::Proceed(_) => panic!("wrong code must be refused"),
        }
    }

    #[test]
    fn no_dependents_and_correct_code_proceeds() {
        let guard = DeleteGuard::new("123");
        assert!(matches!(guard.attempt::<_, &str>(target(), vec![], " 123 "), Verdict::Proceed(_)));
    }

    #[test]
    fn confirmation_page_starts_clean() {
        let page = DeleteGuard::new("123").confirm(target(), vec!["dep"]);
        assert!(page.errors.is_empty());
        assert!(page.code.is_empty());
    }
}
