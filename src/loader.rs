use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::debug;
use tera::Tera;

use crate::bind::{bind, TemplateSet};
use crate::error::{PagebindError, Result};
use crate::flavor::{Flavor, Html, Text};
use crate::funcs::FuncMap;
use crate::glob::{FsGlob, PathGlob};
use crate::index::NameIndex;
use crate::name::basename;
use crate::template::Template;

/// Loads a set of page templates, with an optional shared base template.
///
/// Configuration is immutable: `with_base` and `with_funcs` return a new loader
/// and leave the receiver untouched. No I/O happens until a load method runs.
#[derive(Debug, Clone)]
pub struct Loader<F: Flavor> {
    base: Option<PathBuf>,
    pages: String,
    funcs: Option<FuncMap>,
    flavor: PhantomData<F>,
}

pub type HtmlLoader = Loader<Html>;
pub type TextLoader = Loader<Text>;

/// The compiled base. Only ever used as a clone source.
struct Base {
    tera: Tera,
    name: String,
}

impl<F: Flavor> Loader<F> {
    /// A loader for every file matching `pages`.
    pub fn new(pages: impl Into<String>) -> Self {
        Self {
            base: None,
            pages: pages.into(),
            funcs: None,
            flavor: PhantomData,
        }
    }

    pub fn with_base(&self, base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
            ..self.clone()
        }
    }

    pub fn with_funcs(&self, funcs: FuncMap) -> Self {
        Self {
            funcs: Some(funcs),
            ..self.clone()
        }
    }

    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    pub fn pages(&self) -> &str {
        &self.pages
    }

    pub fn funcs(&self) -> Option<&FuncMap> {
        self.funcs.as_ref()
    }

    /// Load every matching page into the fields of `dest`.
    pub fn load<S>(&self, dest: &mut S) -> Result<()>
    where
        S: TemplateSet<F> + ?Sized,
    {
        self.load_with(&FsGlob, dest)
    }

    /// Like [`Loader::load`], expanding the pages pattern with `glob`.
    pub fn load_with<S>(&self, glob: &dyn PathGlob, dest: &mut S) -> Result<()>
    where
        S: TemplateSet<F> + ?Sized,
    {
        let index = self.load_index_with(glob)?;
        bind(&index, dest)
    }

    /// Compile every matching page without binding them.
    pub fn load_index(&self) -> Result<NameIndex<F>> {
        self.load_index_with(&FsGlob)
    }

    pub fn load_index_with(&self, glob: &dyn PathGlob) -> Result<NameIndex<F>> {
        let pages = glob.expand(&self.pages)?;
        debug!(
            "{} loader: {} page(s) match {}",
            F::NAME,
            pages.len(),
            self.pages
        );

        let base = match &self.base {
            Some(path) => Some(self.compile_base(path)?),
            None => None,
        };

        let mut index = NameIndex::new();
        for page in &pages {
            let template = match &base {
                Some(base) => self.compile_on_base(base, page)?,
                None => self.compile_standalone(page)?,
            };
            index.insert(page, template);
        }

        Ok(index)
    }

    /// Fresh context with the flavor's escaping and the function table applied.
    fn context(&self) -> Tera {
        let mut tera = Tera::default();
        F::configure(&mut tera);
        if let Some(funcs) = &self.funcs {
            funcs.apply(&mut tera);
        }
        tera
    }

    fn compile_base(&self, path: &Path) -> Result<Base> {
        debug!("compiling base template {}", path.display());
        let name = basename(path);
        let mut tera = self.context();
        read_source(path)
            .and_then(|source| tera.add_raw_template(&name, &source))
            .map_err(|e| PagebindError::BaseCompile {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Base { tera, name })
    }

    fn compile_on_base(&self, base: &Base, page: &Path) -> Result<Template<F>> {
        // Keyed by full path so a page never replaces the base inside its clone.
        let entry = format!("page:{}", page.display());

        debug!("compiling page {} on base {}", page.display(), base.name);
        let mut tera = base.tera.clone();
        read_source(page)
            .and_then(|source| tera.add_raw_template(&entry, &extend_base(&base.name, &source)))
            .map_err(|e| PagebindError::PageCompile {
                path: page.to_path_buf(),
                source: e,
            })?;

        Ok(Template::new(tera, entry, page.to_path_buf()))
    }

    fn compile_standalone(&self, page: &Path) -> Result<Template<F>> {
        debug!("compiling standalone page {}", page.display());
        let name = basename(page);
        let mut tera = self.context();
        read_source(page)
            .and_then(|source| tera.add_raw_template(&name, &source))
            .map_err(|e| PagebindError::PageCompile {
                path: page.to_path_buf(),
                source: e,
            })?;

        Ok(Template::new(tera, name, page.to_path_buf()))
    }
}

fn read_source(path: &Path) -> tera::Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| tera::Error::chain(format!("reading {}", path.display()), e))
}

/// Make `source` a child of the base unless it already names its own parent.
fn extend_base(base: &str, source: &str) -> String {
    if declares_parent(source) {
        return source.to_string();
    }
    format!("{{% extends \"{base}\" %}}{source}")
}

/// True when the first tag of `source`, after whitespace and comments, is `extends`.
fn declares_parent(source: &str) -> bool {
    let mut rest = source.trim_start();
    while let Some(comment) = rest.strip_prefix("{#") {
        match comment.find("#}") {
            Some(end) => rest = comment[end + 2..].trim_start(),
            None => return false,
        }
    }
    let Some(tag) = rest.strip_prefix("{%") else {
        return false;
    };
    let tag = tag.strip_prefix('-').unwrap_or(tag).trim_start();
    tag.strip_prefix("extends")
        .is_some_and(|after| after.starts_with(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == '`'))
}
