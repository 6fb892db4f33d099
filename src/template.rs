use std::fmt;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::{PagebindError, Result};
use crate::flavor::{Flavor, Html, Text};

/// A compiled page, ready to execute.
///
/// Each bound template owns its own Tera context, so executing one page never
/// observes block overrides from another page of the same set. The default
/// value is an unbound slot; executing it fails with [`PagebindError::Unbound`].
pub struct Template<F: Flavor> {
    compiled: Option<Arc<Compiled>>,
    flavor: PhantomData<F>,
}

pub type HtmlTemplate = Template<Html>;
pub type TextTemplate = Template<Text>;

struct Compiled {
    tera: Tera,
    entry: String,
    source: PathBuf,
}

impl<F: Flavor> Template<F> {
    pub(crate) fn new(tera: Tera, entry: String, source: PathBuf) -> Self {
        Self {
            compiled: Some(Arc::new(Compiled {
                tera,
                entry,
                source,
            })),
            flavor: PhantomData,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.compiled.is_some()
    }

    /// Name of the entry template inside this page's context: the page file's
    /// basename, or `page:<path>` for a page compiled on a base.
    pub fn name(&self) -> Option<&str> {
        self.compiled.as_deref().map(|c| c.entry.as_str())
    }

    /// Page file this template was compiled from.
    pub fn source(&self) -> Option<&Path> {
        self.compiled.as_deref().map(|c| c.source.as_path())
    }

    /// Names of every template in this page's context (base, page).
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .compiled
            .as_deref()
            .map(|c| c.tera.get_template_names().collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Render against `data` into `out`. `data` must serialize to a map.
    pub fn execute<W, T>(&self, out: W, data: &T) -> Result<()>
    where
        W: Write,
        T: Serialize + ?Sized,
    {
        let compiled = self.compiled.as_deref().ok_or(PagebindError::Unbound)?;
        let context = Context::from_serialize(data).map_err(|e| PagebindError::RenderError {
            name: compiled.entry.clone(),
            source: e,
        })?;
        compiled
            .tera
            .render_to(&compiled.entry, &context, out)
            .map_err(|e| PagebindError::RenderError {
                name: compiled.entry.clone(),
                source: e,
            })
    }

    pub fn render<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let mut buf = Vec::new();
        self.execute(&mut buf, data)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl<F: Flavor> Default for Template<F> {
    fn default() -> Self {
        Self {
            compiled: None,
            flavor: PhantomData,
        }
    }
}

impl<F: Flavor> Clone for Template<F> {
    fn clone(&self) -> Self {
        Self {
            compiled: self.compiled.clone(),
            flavor: PhantomData,
        }
    }
}

impl<F: Flavor> fmt::Debug for Template<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.compiled.as_deref() {
            Some(c) => f
                .debug_struct("Template")
                .field("flavor", &F::NAME)
                .field("entry", &c.entry)
                .field("source", &c.source)
                .finish(),
            None => f
                .debug_struct("Template")
                .field("flavor", &F::NAME)
                .field("bound", &false)
                .finish(),
        }
    }
}
