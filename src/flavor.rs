use tera::Tera;

/// Output flavor of a template set. Decides how a fresh Tera context escapes
/// expression output.
pub trait Flavor: Clone + Default + Send + Sync + 'static {
    /// Short label used in log output.
    const NAME: &'static str;

    fn configure(tera: &mut Tera);
}

/// Markup output: every expression is HTML-escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html;

impl Flavor for Html {
    const NAME: &'static str = "html";

    fn configure(tera: &mut Tera) {
        // Every template name ends with "", so this escapes regardless of extension.
        tera.autoescape_on(vec![""]);
    }
}

/// Plain text output: nothing is escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl Flavor for Text {
    const NAME: &'static str = "text";

    fn configure(tera: &mut Tera) {
        tera.autoescape_on(Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::Context;

    fn render<F: Flavor>(source: &str) -> String {
        let mut tera = Tera::default();
        F::configure(&mut tera);
        tera.add_raw_template("page.tmpl", source).unwrap();
        let mut context = Context::new();
        context.insert("name", "<b>Bob</b>");
        tera.render("page.tmpl", &context).unwrap()
    }

    #[test]
    fn html_escapes_any_extension() {
        assert_eq!(render::<Html>("{{ name }}"), "&lt;b&gt;Bob&lt;&#x2F;b&gt;");
    }

    #[test]
    fn text_never_escapes() {
        assert_eq!(render::<Text>("{{ name }}"), "<b>Bob</b>");
    }
}
