//! Type descriptors for `with_type_of`.

use crate::fields::Fields;

/// Field key for the type name.
pub const TYPE_NAME_FIELD: &str = "type.name";
/// Field key for the defining module.
pub const TYPE_MODULE_FIELD: &str = "type.module";

/// Name and defining module of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    name: String,
    module: String,
}

impl TypeInfo {
    /// Describe a type with explicit strings.
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
        }
    }

    /// Describe `T` from its compile-time path.
    ///
    /// `my_app::orders::Order` yields name `Order`, module `my_app::orders`.
    /// Generic arguments stay attached to the name. References and `dyn`
    /// are described by the type they point at; slices, arrays and tuples
    /// keep their full spelling as the name and have no module.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self::from_type_name(std::any::type_name::<T>())
    }

    fn from_type_name(full: &str) -> Self {
        let mut path = full;
        while let Some(rest) = ["&mut ", "&", "dyn "]
            .iter()
            .find_map(|prefix| path.strip_prefix(prefix))
        {
            path = rest;
        }
        if path.starts_with(['[', '(']) {
            return Self::new(path, "");
        }

        let path_end = path.find('<').unwrap_or(path.len());
        let (head, generics) = path.split_at(path_end);
        match head.rsplit_once("::") {
            Some((module, name)) => Self::new(format!("{name}{generics}"), module),
            None => Self::new(path, ""),
        }
    }

    /// Describe the type of a value.
    #[must_use]
    pub fn of_val<T: ?Sized>(_value: &T) -> Self {
        Self::of::<T>()
    }

    /// Type name without the module path.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Defining module path.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The two diagnostic fields attached by `with_type_of`.
    #[must_use]
    pub fn to_fields(&self) -> Fields {
        Fields::new()
            .with(TYPE_NAME_FIELD, self.name.as_str())
            .with(TYPE_MODULE_FIELD, self.module.as_str())
    }
}
