use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tera::{Filter, Function, Test, Tera, Value};

/// Named callables made available to every template of a set.
///
/// Filters are used as `{{ name | toLower }}`, functions as
/// `{{ shout(text=name) }}` and testers as `{% if name is short %}`. Cloning is
/// cheap; the callables themselves are shared.
#[derive(Clone, Default)]
pub struct FuncMap {
    filters: BTreeMap<String, Arc<dyn Filter>>,
    functions: BTreeMap<String, Arc<dyn Function>>,
    testers: BTreeMap<String, Arc<dyn Test>>,
}

impl FuncMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter<T: Filter + 'static>(mut self, name: &str, filter: T) -> Self {
        self.filters.insert(name.to_string(), Arc::new(filter));
        self
    }

    pub fn function<T: Function + 'static>(mut self, name: &str, function: T) -> Self {
        self.functions.insert(name.to_string(), Arc::new(function));
        self
    }

    pub fn tester<T: Test + 'static>(mut self, name: &str, tester: T) -> Self {
        self.testers.insert(name.to_string(), Arc::new(tester));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.functions.is_empty() && self.testers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len() + self.functions.len() + self.testers.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
            || self.functions.contains_key(name)
            || self.testers.contains_key(name)
    }

    /// Register every entry on `tera`.
    pub(crate) fn apply(&self, tera: &mut Tera) {
        for (name, filter) in &self.filters {
            tera.register_filter(name, SharedFilter(Arc::clone(filter)));
        }
        for (name, function) in &self.functions {
            tera.register_function(name, SharedFunction(Arc::clone(function)));
        }
        for (name, tester) in &self.testers {
            tera.register_tester(name, SharedTest(Arc::clone(tester)));
        }
    }
}

impl fmt::Debug for FuncMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncMap")
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("testers", &self.testers.keys().collect::<Vec<_>>())
            .finish()
    }
}

struct SharedFilter(Arc<dyn Filter>);

impl Filter for SharedFilter {
    fn filter(&self, value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
        self.0.filter(value, args)
    }

    fn is_safe(&self) -> bool {
        self.0.is_safe()
    }
}

struct SharedFunction(Arc<dyn Function>);

impl Function for SharedFunction {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        self.0.call(args)
    }

    fn is_safe(&self) -> bool {
        self.0.is_safe()
    }
}

struct SharedTest(Arc<dyn Test>);

impl Test for SharedTest {
    fn test(&self, value: Option<&Value>, args: &[Value]) -> tera::Result<bool> {
        self.0.test(value, args)
    }
}
