use tera::Tera;

/// Tera-backed template engine for building structured prompts.
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Create with inline templates (no filesystem).
    pub fn new() -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        Self { tera }
    }

    /// Register a template from a string.
    pub fn add_template(&mut self, name: &str, content: &str) -> anyhow::Result<()> {
        self.tera.add_raw_template(name, content)?;
        Ok(())
    }

    /// Render a named template with the given context.
    pub fn render(&self, template_name: &str, context: &tera::Context) -> anyhow::Result<String> {
        let rendered = self.tera.render(template_name, context)?;
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::Context;

    #[test]
    fn unknown_template_fails_to_render() {
        let engine = TeraEngine::new();
        assert!(engine.render("nonexistent", &Context::new()).is_err());
    }

    #[test]
    fn add_template_and_render() {
        let mut engine = TeraEngine::new();
        engine.add_template("greeting", "Hello, {{ name }}!").unwrap();

        let mut ctx = Context::new();
        ctx.insert("name", "Ana");
        assert_eq!(engine.render("greeting", &ctx).unwrap(), "Hello, Ana!");
    }

    #[test]
    fn markup_is_not_escaped() {
        let mut engine = TeraEngine::new();
        engine.add_template("raw", "{{ text }}").unwrap();

        let mut ctx = Context::new();
        ctx.insert("text", "<b>'Use of English'</b> & more");
        assert_eq!(
            engine.render("raw", &ctx).unwrap(),
            "<b>'Use of English'</b> & more"
        );
    }
}
