//! Path compilation and resolution

use std::any::Any;
use std::sync::Arc;

use crate::shape::{Access, FieldDef, Reach, Shape, Shaped};
use crate::value::Value;

use super::errors::{ResolveError, ResolveResult};
use super::field::{Field, FieldPath};

/// How a step was reached during compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Field found by exact name at its level
    Named,
    /// Embedded component crossed to reach a promoted field
    Promoted,
    /// Pointer dereferenced before the next segment
    Deref,
}

/// One accessor step of a compiled path
#[derive(Debug, Clone, Copy)]
pub struct Step {
    kind: StepKind,
    field: &'static FieldDef,
}

impl Step {
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn field_name(&self) -> &'static str {
        self.field.name()
    }
}

/// Result of walking a compiled path over a record
pub(crate) enum Resolved<'a> {
    Value(Value),
    Composite(&'a dyn Any),
    Nil,
}

/// A field path compiled against one shape
#[derive(Debug)]
pub struct CompiledPath {
    path: FieldPath,
    root: &'static Shape,
    steps: Vec<Step>,
}

impl CompiledPath {
    /// Compiles `path` against `shape`, reusing the shape's cache.
    pub fn compile(shape: &'static Shape, path: &FieldPath) -> ResolveResult<Arc<CompiledPath>> {
        if let Some(hit) = shape.cached_path(path.as_str()) {
            return Ok(hit);
        }

        let steps = build_steps(shape, path)?;
        let compiled = Arc::new(CompiledPath {
            path: path.clone(),
            root: shape,
            steps,
        });
        shape.cache_path(path.as_str(), Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// True when any step reads a pointer, which may be nil on some records
    pub fn crosses_pointer(&self) -> bool {
        self.steps.iter().any(|step| step.field.is_pointer())
    }

    /// Resolves to a comparable value.
    ///
    /// A nil pointer at the end of the path is `Value::Null`; a present
    /// composite at the end is `NotComparable`.
    pub fn value(&self, record: &dyn Any) -> ResolveResult<Value> {
        match self.walk(record)? {
            Resolved::Value(value) => Ok(value),
            Resolved::Nil => Ok(Value::Null),
            Resolved::Composite(_) => Err(self.not_comparable()),
        }
    }

    pub(crate) fn walk<'a>(&self, record: &'a dyn Any) -> ResolveResult<Resolved<'a>> {
        let Some((last, init)) = self.steps.split_last() else {
            return Err(ResolveError::not_found(
                self.path.as_str(),
                self.root.name(),
                "empty path",
            ));
        };

        let mut current = record;
        for step in init {
            let Access::Composite { access, .. } = &step.field.access else {
                return Err(self.not_comparable());
            };
            match access.reach(current) {
                Some(Reach::Present(next)) => current = next,
                Some(Reach::Nil) => {
                    return Err(ResolveError::not_found(
                        self.path.as_str(),
                        self.root.name(),
                        format!("'{}' is a nil reference", step.field.name()),
                    ))
                }
                None => return Err(self.shape_mismatch()),
            }
        }

        match &last.field.access {
            Access::Scalar(access) => access
                .read(current)
                .map(Resolved::Value)
                .ok_or_else(|| self.shape_mismatch()),
            Access::Composite { access, .. } => match access.reach(current) {
                Some(Reach::Present(inner)) => Ok(Resolved::Composite(inner)),
                Some(Reach::Nil) => Ok(Resolved::Nil),
                None => Err(self.shape_mismatch()),
            },
        }
    }

    pub(crate) fn not_comparable(&self) -> ResolveError {
        ResolveError::NotComparable {
            path: self.path.as_str().to_string(),
            shape: self.root.name(),
        }
    }

    fn shape_mismatch(&self) -> ResolveError {
        ResolveError::ShapeMismatch {
            path: self.path.as_str().to_string(),
            expected: self.root.name(),
        }
    }
}

fn build_steps(root: &'static Shape, path: &FieldPath) -> ResolveResult<Vec<Step>> {
    let segments = path.segments();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ResolveError::not_found(
            path.as_str(),
            root.name(),
            "empty path segment",
        ));
    }

    if !path.is_qualified() {
        let name = &segments[0];
        if let Some(field) = root.field(name) {
            return Ok(vec![Step {
                kind: StepKind::Named,
                field,
            }]);
        }
        return find_promoted(root, name).ok_or_else(|| {
            ResolveError::not_found(
                path.as_str(),
                root.name(),
                format!("no field or promoted field '{}'", name),
            )
        });
    }

    let mut current = root;
    let mut steps = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        let field = current.field(segment).ok_or_else(|| {
            ResolveError::not_found(
                path.as_str(),
                root.name(),
                format!("no field '{}' on {}", segment, current.name()),
            )
        })?;

        let last = i + 1 == segments.len();
        let kind = if field.is_pointer() && !last {
            StepKind::Deref
        } else {
            StepKind::Named
        };
        steps.push(Step { kind, field });

        if !last {
            current = field.target_shape().ok_or_else(|| {
                ResolveError::not_found(
                    path.as_str(),
                    root.name(),
                    format!("'{}' on {} has no fields", segment, current.name()),
                )
            })?;
        }
    }
    Ok(steps)
}

/// Depth-first search through embedded components; first match wins.
fn find_promoted(shape: &'static Shape, name: &str) -> Option<Vec<Step>> {
    for embedded in shape.embedded_fields() {
        let Some(inner) = embedded.target_shape() else {
            continue;
        };
        let crossing = Step {
            kind: StepKind::Promoted,
            field: embedded,
        };

        if let Some(field) = inner.field(name) {
            return Some(vec![
                crossing,
                Step {
                    kind: StepKind::Named,
                    field,
                },
            ]);
        }
        if let Some(rest) = find_promoted(inner, name) {
            let mut steps = vec![crossing];
            steps.extend(rest);
            return Some(steps);
        }
    }
    None
}

/// Entry points for resolving fields on typed records
pub struct FieldResolver;

impl FieldResolver {
    /// Compiles `field` against the shape of `T`.
    ///
    /// The key is not a field of the record and is always `FieldNotFound`.
    pub fn compile<T: Shaped>(field: &Field) -> ResolveResult<Arc<CompiledPath>> {
        match field {
            Field::Key => Err(ResolveError::not_found(
                "<key>",
                T::shape().name(),
                "the record key is not a field",
            )),
            Field::Path(path) => CompiledPath::compile(T::shape(), path),
        }
    }

    /// Resolves `path` on `record`
    pub fn resolve<T: Shaped>(record: &T, path: &str) -> ResolveResult<Value> {
        let compiled = CompiledPath::compile(T::shape(), &FieldPath::parse(path))?;
        compiled.value(record)
    }
}
