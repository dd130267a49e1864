use super::filters::{datetime, german_float, last_day_of_month};
use crate::{
    context::Context, error::Result, loader::TemplateResolver,
    renderer::interface::TemplateRenderer,
};
use minijinja::{AutoEscape, Environment, ErrorKind, Template};

/// Name given to inline templates (queries, variables, filenames).
const INLINE_TEMPLATE_NAME: &str = "inline";

/// Markup templates are HTML-escaped; everything else, inline strings
/// included, renders verbatim.
fn auto_escape_for(name: &str) -> AutoEscape {
    match name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "html" || ext == "htm" || ext == "xml" => AutoEscape::Html,
        _ => AutoEscape::None,
    }
}

/// MiniJinja-based template rendering engine.
///
/// Named templates are loaded lazily through the [`TemplateResolver`], so
/// `{% include %}` and `{% extends %}` honour the same search order.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
    resolver: TemplateResolver,
}

impl MiniJinjaRenderer {
    /// Creates a new MiniJinjaRenderer looking named templates up with `resolver`.
    pub fn new(resolver: TemplateResolver) -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(auto_escape_for);

        env.add_filter("datetime", datetime);
        env.add_filter("german_float", german_float);
        env.add_filter("last_day_of_month", last_day_of_month);

        let loader = resolver.clone();
        env.set_loader(move |name| {
            loader.find(name).map_err(|e| {
                minijinja::Error::new(
                    ErrorKind::InvalidOperation,
                    format!("cannot load template '{name}'"),
                )
                .with_source(e)
            })
        });

        Self { env, resolver }
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    fn get_template(&self, name: &str) -> Result<Template<'_, '_>> {
        match self.env.get_template(name) {
            Ok(template) => Ok(template),
            Err(e) if e.kind() == ErrorKind::TemplateNotFound => {
                Err(self.resolver.not_found(name))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(
        &self,
        template: &str,
        context: &Context,
        template_name: Option<&str>,
    ) -> Result<String> {
        let name = template_name.unwrap_or(INLINE_TEMPLATE_NAME);
        Ok(self.env.render_named_str(name, template, context.to_value())?)
    }

    fn load_template(&self, name: &str) -> Result<()> {
        self.get_template(name).map(|_| ())
    }

    fn render_template(&self, name: &str, context: &Context) -> Result<String> {
        Ok(self.get_template(name)?.render(context.to_value())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::loader::TemplateLocation;
    use minijinja::Value;

    fn renderer_in(dir: &std::path::Path) -> MiniJinjaRenderer {
        MiniJinjaRenderer::new(TemplateResolver::new(vec![
            TemplateLocation::Directory(dir.to_path_buf()),
            TemplateLocation::Bundled,
        ]))
    }

    fn test_template(template: &str, expected: &str) {
        let renderer = MiniJinjaRenderer::new(TemplateResolver::new(vec![]));
        let result = renderer.render(template, &Context::default(), None).unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_custom_filters() {
        test_template("{{ '2024-02-03' | last_day_of_month }}", "2024-02-29");
        test_template("{{ '2024-02-03' | datetime('%d.%m.%Y') }}", "03.02.2024");
        test_template("{{ 1234.5 | german_float }}", "1.234,50");
    }

    #[test]
    fn test_inline_templates_are_not_escaped() {
        let renderer = MiniJinjaRenderer::new(TemplateResolver::new(vec![]));
        let context = Context::default().with("account", Value::from("a<b>&c"));
        let result = renderer.render("bal {{ account }}", &context, None).unwrap();
        assert_eq!(result, "bal a<b>&c");
    }

    #[test]
    fn test_html_templates_are_escaped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.html"), "<p>{{ account }}</p>").unwrap();
        let context = Context::default().with("account", Value::from("<b>"));
        let result = renderer_in(dir.path()).render_template("page.html", &context).unwrap();
        assert_eq!(result, "<p>&lt;b&gt;</p>");
    }

    #[test]
    fn test_data_templates_are_not_escaped() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["data.yaml", "data.json", "data.js"] {
            std::fs::write(dir.path().join(name), "v: {{ account }}").unwrap();
        }
        let context = Context::default().with("account", Value::from("a&b"));
        let renderer = renderer_in(dir.path());
        for name in ["data.yaml", "data.json", "data.js"] {
            assert_eq!(renderer.render_template(name, &context).unwrap(), "v: a&b");
        }
    }

    #[test]
    fn test_auto_escape_by_extension() {
        assert_eq!(auto_escape_for("page.html"), AutoEscape::Html);
        assert_eq!(auto_escape_for("feed.XML"), AutoEscape::Html);
        assert_eq!(auto_escape_for("summary.yaml"), AutoEscape::None);
        assert_eq!(auto_escape_for("inline"), AutoEscape::None);
    }

    #[test]
    fn test_include_uses_search_locations() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.txt"), "[{% include 'part.txt' %}]").unwrap();
        std::fs::write(dir.path().join("part.txt"), "{{ n }}").unwrap();
        let context = Context::default().with("n", Value::from(3));
        let result = renderer_in(dir.path()).render_template("page.txt", &context).unwrap();
        assert_eq!(result, "[3]");
    }

    #[test]
    fn test_missing_named_template() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer_in(dir.path());
        let result = renderer.render_template("none.html", &Context::default());
        assert!(matches!(result, Err(Error::TemplateNotFound { .. })));
        let loaded = renderer.load_template("none.html");
        assert!(matches!(loaded, Err(Error::TemplateNotFound { .. })));
        assert!(renderer.load_template("default.html").is_ok());
    }

    #[test]
    fn test_undefined_values_render_empty() {
        test_template("[{{ missing }}]", "[]");
    }
}
