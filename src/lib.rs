//! Load a directory of Tera page templates into a typed struct.
//!
//! A [`Loader`] expands a glob of page files, optionally compiles one shared
//! base template, and compiles every page into its own independent context
//! (a clone of the base, or a fresh one). Each page is then bound to the
//! destination field whose lowercased name equals the page's lowercased file
//! stem, so `one.tmpl` fills the field `one` (or `One`).
//!
//! [`HtmlLoader`] escapes expression output; [`TextLoader`] does not.

pub mod bind;
pub mod config;
pub mod error;
pub mod flavor;
pub mod funcs;
pub mod glob;
pub mod index;
pub mod loader;
pub mod name;
pub mod template;

pub use bind::{bind, Binder, TemplateSet};
pub use config::{load_config, LoaderConfig};
pub use error::{PagebindError, Result};
pub use flavor::{Flavor, Html, Text};
pub use funcs::FuncMap;
pub use glob::{FsGlob, Listing, PathGlob};
pub use index::NameIndex;
pub use loader::{HtmlLoader, Loader, TextLoader};
pub use name::{field_key, normalize};
pub use template::{HtmlTemplate, Template, TextTemplate};
