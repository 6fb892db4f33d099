use log::debug;

use crate::error::{PagebindError, Result};
use crate::flavor::Flavor;
use crate::index::NameIndex;
use crate::name::field_key;
use crate::template::Template;

/// A destination record whose fields receive compiled pages.
///
/// Implementations hand each field to the [`Binder`] in declaration order.
/// The [`template_set!`](crate::template_set) macro generates this impl.
pub trait TemplateSet<F: Flavor> {
    fn bind(&mut self, binder: &mut Binder<'_, F>) -> Result<()>;
}

/// Hands out templates from a [`NameIndex`] by field name.
pub struct Binder<'a, F: Flavor> {
    index: &'a NameIndex<F>,
    bound: usize,
}

impl<'a, F: Flavor> Binder<'a, F> {
    pub fn new(index: &'a NameIndex<F>) -> Self {
        Self { index, bound: 0 }
    }

    /// Assign the page named like `field` (case-insensitively) to `slot`.
    pub fn field(&mut self, field: &str, slot: &mut Template<F>) -> Result<()> {
        self.with(field, |template| *slot = template)
    }

    /// Look up the page named like `field` and pass it to `set`.
    ///
    /// Fails with [`PagebindError::MissingTemplate`] without calling `set`.
    /// Fields bound by earlier calls keep their values.
    pub fn with(&mut self, field: &str, set: impl FnOnce(Template<F>)) -> Result<()> {
        let key = field_key(field);
        let template = self
            .index
            .get(&key)
            .ok_or_else(|| PagebindError::MissingTemplate {
                expected: key.clone(),
            })?;
        debug!("binding field {field} to template '{key}'");
        set(template.clone());
        self.bound += 1;
        Ok(())
    }

    /// Number of fields bound so far.
    pub fn bound(&self) -> usize {
        self.bound
    }
}

/// Populate every field of `dest` from `index`, stopping at the first field
/// without a matching page.
pub fn bind<F, S>(index: &NameIndex<F>, dest: &mut S) -> Result<()>
where
    F: Flavor,
    S: TemplateSet<F> + ?Sized,
{
    let mut binder = Binder::new(index);
    dest.bind(&mut binder)?;
    debug!("bound {} of {} loaded template(s)", binder.bound(), index.len());
    Ok(())
}

/// Declare a struct of template fields together with its [`TemplateSet`] impl.
///
/// ```ignore
/// pagebind::template_set! {
///     pub struct Emails<pagebind::Text> {
///         pub welcome,
///         pub reset_password,
///     }
/// }
/// ```
///
/// Fields bind in declaration order; `reset_password` expects a page that
/// normalizes to `reset_password`, e.g. `Reset_Password.tmpl`.
#[macro_export]
macro_rules! template_set {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident<$flavor:ty> {
            $($(#[$fmeta:meta])* $fvis:vis $field:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        $vis struct $name {
            $($(#[$fmeta])* $fvis $field: $crate::Template<$flavor>,)*
        }

        impl $crate::TemplateSet<$flavor> for $name {
            fn bind(&mut self, binder: &mut $crate::Binder<'_, $flavor>) -> $crate::Result<()> {
                $(binder.field(stringify!($field), &mut self.$field)?;)*
                Ok(())
            }
        }
    };
}
