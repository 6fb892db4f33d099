use std::collections::HashMap;
use std::path::Path;

use log::trace;

use crate::flavor::Flavor;
use crate::name::normalize;
use crate::template::Template;

/// Compiled pages of one load, keyed by normalized file name.
#[derive(Debug, Clone)]
pub struct NameIndex<F: Flavor> {
    pages: HashMap<String, Template<F>>,
}

impl<F: Flavor> NameIndex<F> {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    /// Insert `template` under the normalized name of `path`.
    ///
    /// A later page with the same normalized name replaces the earlier one.
    pub fn insert(&mut self, path: &Path, template: Template<F>) {
        let name = normalize(path);
        if let Some(previous) = self.pages.insert(name.clone(), template) {
            trace!(
                "page {} replaces {} as '{name}'",
                path.display(),
                previous
                    .source()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            );
        }
    }

    pub fn get(&self, name: &str) -> Option<&Template<F>> {
        self.pages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Normalized names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<F: Flavor> Default for NameIndex<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flavor::Text;
    use serde_json::json;
    use std::path::PathBuf;
    use tera::Tera;

    fn page(path: &str, body: &str) -> Template<Text> {
        let mut tera = Tera::default();
        Text::configure(&mut tera);
        tera.add_raw_template("entry", body).unwrap();
        Template::new(tera, "entry".into(), PathBuf::from(path))
    }

    #[test]
    fn empty_index() {
        let index = NameIndex::<Text>::default();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert!(!index.contains("one"));
        assert!(index.names().is_empty());
    }

    #[test]
    fn keys_are_normalized_file_names() {
        let mut index = NameIndex::new();
        index.insert(Path::new("pages/One.tmpl"), page("pages/One.tmpl", "1"));
        index.insert(Path::new("pages/TWO.html.tmpl"), page("pages/TWO.html.tmpl", "2"));

        assert!(!index.is_empty());
        assert_eq!(index.len(), 2);
        assert!(index.contains("one"));
        assert!(index.contains("two.html"));
        assert!(!index.contains("One"));
        assert_eq!(index.names(), vec!["one", "two.html"]);
    }

    #[test]
    fn later_insert_replaces_same_name() {
        let mut index = NameIndex::new();
        index.insert(Path::new("a/one.tmpl"), page("a/one.tmpl", "first"));
        index.insert(Path::new("b/ONE.txt"), page("b/ONE.txt", "second"));

        assert_eq!(index.len(), 1);
        let one = index.get("one").unwrap();
        assert_eq!(one.source(), Some(Path::new("b/ONE.txt")));
        assert_eq!(one.render(&json!({})).unwrap(), "second");
    }
}
