//! Server-side HTML views.
//!
//! Templates are named `*.html.tera`, which keeps Tera from auto-escaping them: every text field
//! is escaped when it is validated and stored, so views print stored values verbatim.

use crate::err::CatalogError;
use axum::response::Html;
use rust_embed::Embed;
use tera::{Context, Tera};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, CatalogError> {
        let mut templates = Vec::new();
        for file in EmbeddedTemplates::iter() {
            let name = file.as_ref().to_string();
            if let Some(content) = EmbeddedTemplates::get(&name) {
                let source = String::from_utf8_lossy(&content.data).into_owned();
                templates.push((name, source));
            }
        }
        let mut tera = Tera::default();
        tera.add_raw_templates(templates)?;
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<Html<String>, CatalogError> {
        Ok(Html(self.tera.render(&format!("{}.html.tera", name), context)?))
    }
}

/// Context with the page title every layout expects.
pub fn page(title: &str) -> Context {
    let mut context = Context::new();
    context.insert("title", title);
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_compiles_with_layout() {
        let views = Views::new().unwrap();
        let mut context = page("Broken");
        context.insert("message", "Slot not found");
        context.insert("status", &404);
        let html = views.render("error", &context).unwrap().0;
        assert!(html.contains("Slot not found"));
        assert!(html.contains("<title>Broken</title>"));
    }

    #[test]
    fn stored_values_are_printed_verbatim() {
        let views = Views::new().unwrap();
        let mut context = page("Error");
        context.insert("message", "Skill&#x27;s Fang");
        context.insert("status", &500);
        let html = views.render("error", &context).unwrap().0;
        assert!(html.contains("Skill&#x27;s Fang"));
    }
}
