//! Fluent construction of shapes

use std::any::{Any, TypeId};
use std::marker::PhantomData;

use crate::resolver::FieldPath;
use crate::value::Value;

use super::record::Shaped;
use super::shape::{Access, CompositeAccess, FieldDef, IndexDef, Reach, ScalarAccess, Shape};

struct ScalarField<T> {
    get: fn(&T) -> Value,
}

impl<T: Any> ScalarAccess for ScalarField<T> {
    fn read(&self, parent: &dyn Any) -> Option<Value> {
        parent.downcast_ref::<T>().map(self.get)
    }
}

struct DirectField<T, U> {
    get: fn(&T) -> &U,
}

impl<T: Any, U: Any> CompositeAccess for DirectField<T, U> {
    fn reach<'a>(&self, parent: &'a dyn Any) -> Option<Reach<'a>> {
        let parent = parent.downcast_ref::<T>()?;
        let child: &'a U = (self.get)(parent);
        Some(Reach::Present(child))
    }
}

struct PointerField<T, U> {
    get: fn(&T) -> Option<&U>,
}

impl<T: Any, U: Any> CompositeAccess for PointerField<T, U> {
    fn reach<'a>(&self, parent: &'a dyn Any) -> Option<Reach<'a>> {
        let parent = parent.downcast_ref::<T>()?;
        let child: Option<&'a U> = (self.get)(parent);
        Some(match child {
            Some(child) => Reach::Present(child),
            None => Reach::Nil,
        })
    }
}

/// Builds the [`Shape`] of `T`.
///
/// ```ignore
/// impl Shaped for Nested {
///     fn shape() -> &'static Shape {
///         static SHAPE: OnceLock<Shape> = OnceLock::new();
///         SHAPE.get_or_init(|| {
///             ShapeBuilder::<Nested>::new("Nested")
///                 .field("Key", |n| n.key.into())
///                 .embedded::<Embed>("Embed", |n| &n.embed)
///                 .nested::<Nest>("L1", |n| &n.l1)
///                 .pointer::<Nest>("Pointer", |n| n.pointer.as_deref())
///                 .build()
///         })
///     }
/// }
/// ```
pub struct ShapeBuilder<T> {
    name: &'static str,
    fields: Vec<FieldDef>,
    indexes: Vec<IndexDef>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Any> ShapeBuilder<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            indexes: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Adds a scalar field read through `get`
    pub fn field(self, name: &'static str, get: fn(&T) -> Value) -> Self {
        self.push(name, Access::Scalar(Box::new(ScalarField { get })))
    }

    /// Adds a nested composite addressed as `name.<child>`
    pub fn nested<U: Shaped>(self, name: &'static str, get: fn(&T) -> &U) -> Self {
        self.push(
            name,
            Access::Composite {
                access: Box::new(DirectField { get }),
                shape: U::shape,
                embedded: false,
                pointer: false,
            },
        )
    }

    /// Adds an embedded composite; its fields are also addressable by their
    /// bare names on this shape
    pub fn embedded<U: Shaped>(self, name: &'static str, get: fn(&T) -> &U) -> Self {
        self.push(
            name,
            Access::Composite {
                access: Box::new(DirectField { get }),
                shape: U::shape,
                embedded: true,
                pointer: false,
            },
        )
    }

    /// Adds an optional composite; `None` is a nil reference
    pub fn pointer<U: Shaped>(self, name: &'static str, get: fn(&T) -> Option<&U>) -> Self {
        self.push(
            name,
            Access::Composite {
                access: Box::new(PointerField { get }),
                shape: U::shape,
                embedded: false,
                pointer: true,
            },
        )
    }

    /// Declares a secondary index over the value at `path`
    pub fn index(mut self, name: &'static str, path: &str) -> Self {
        assert!(
            self.indexes.iter().all(|idx| idx.name() != name),
            "index '{}' declared twice on shape '{}'",
            name,
            self.name
        );
        self.indexes.push(IndexDef::new(name, FieldPath::parse(path)));
        self
    }

    pub fn build(self) -> Shape {
        Shape::new(self.name, TypeId::of::<T>(), self.fields, self.indexes)
    }

    fn push(mut self, name: &'static str, access: Access) -> Self {
        assert!(
            !name.is_empty() && !name.contains('.'),
            "invalid field name '{}' on shape '{}'",
            name,
            self.name
        );
        assert!(
            self.fields.iter().all(|f| f.name() != name),
            "field '{}' declared twice on shape '{}'",
            name,
            self.name
        );
        self.fields.push(FieldDef::new(name, access));
        self
    }
}
