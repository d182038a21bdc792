//! Shape and field definitions

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::resolver::{CompiledPath, FieldPath};
use crate::value::Value;

/// Type-erased reader for a scalar field.
pub(crate) trait ScalarAccess: Send + Sync {
    /// Returns `None` when `parent` is not the type the accessor was built for
    fn read(&self, parent: &dyn Any) -> Option<Value>;
}

/// Type-erased reader for a composite field.
pub(crate) trait CompositeAccess: Send + Sync {
    /// Returns `None` when `parent` is not the type the accessor was built for
    fn reach<'a>(&self, parent: &'a dyn Any) -> Option<Reach<'a>>;
}

/// Outcome of reaching into a composite field
pub(crate) enum Reach<'a> {
    Present(&'a dyn Any),
    Nil,
}

pub(crate) enum Access {
    Scalar(Box<dyn ScalarAccess>),
    Composite {
        access: Box<dyn CompositeAccess>,
        shape: fn() -> &'static Shape,
        embedded: bool,
        pointer: bool,
    },
}

/// One addressable field of a shape
pub struct FieldDef {
    name: &'static str,
    pub(crate) access: Access,
}

impl FieldDef {
    pub(crate) fn new(name: &'static str, access: Access) -> Self {
        Self { name, access }
    }

    /// Field name as used in paths
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True for nested, embedded and pointer fields
    pub fn is_composite(&self) -> bool {
        matches!(self.access, Access::Composite { .. })
    }

    /// True when this field's own fields are promoted to the parent
    pub fn is_embedded(&self) -> bool {
        matches!(self.access, Access::Composite { embedded: true, .. })
    }

    /// True when the field is an optional reference
    pub fn is_pointer(&self) -> bool {
        matches!(self.access, Access::Composite { pointer: true, .. })
    }

    /// Shape of the composite this field leads to
    pub fn target_shape(&self) -> Option<&'static Shape> {
        match &self.access {
            Access::Composite { shape, .. } => Some(shape()),
            Access::Scalar(_) => None,
        }
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("composite", &self.is_composite())
            .field("embedded", &self.is_embedded())
            .field("pointer", &self.is_pointer())
            .finish()
    }
}

/// A declared secondary index: equality lookups on `path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    name: &'static str,
    path: FieldPath,
}

impl IndexDef {
    pub(crate) fn new(name: &'static str, path: FieldPath) -> Self {
        Self { name, path }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }
}

/// Static description of one composite type
pub struct Shape {
    name: &'static str,
    type_id: TypeId,
    fields: Vec<FieldDef>,
    indexes: Vec<IndexDef>,
    compiled: RwLock<HashMap<String, Arc<CompiledPath>>>,
}

impl Shape {
    pub(crate) fn new(
        name: &'static str,
        type_id: TypeId,
        fields: Vec<FieldDef>,
        indexes: Vec<IndexDef>,
    ) -> Self {
        Self {
            name,
            type_id,
            fields,
            indexes,
            compiled: RwLock::new(HashMap::new()),
        }
    }

    /// Type name; also the default bucket for records of this shape
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type this shape describes
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Exact lookup of a field declared directly on this shape
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Embedded fields in declaration order
    pub fn embedded_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.is_embedded())
    }

    /// Declared secondary indexes
    pub fn indexes(&self) -> &[IndexDef] {
        &self.indexes
    }

    /// Index declared on exactly this path, if any
    pub fn index_on(&self, path: &FieldPath) -> Option<&IndexDef> {
        self.indexes.iter().find(|idx| idx.path == *path)
    }

    pub(crate) fn cached_path(&self, path: &str) -> Option<Arc<CompiledPath>> {
        self.compiled
            .read()
            .ok()
            .and_then(|cache| cache.get(path).cloned())
    }

    pub(crate) fn cache_path(&self, path: &str, compiled: Arc<CompiledPath>) {
        // A poisoned cache only costs recompilation
        if let Ok(mut cache) = self.compiled.write() {
            cache.insert(path.to_string(), compiled);
        }
    }

    /// Number of compiled paths cached on this shape
    pub fn cached_path_count(&self) -> usize {
        self.compiled.read().map(|cache| cache.len()).unwrap_or(0)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("indexes", &self.indexes)
            .finish()
    }
}
