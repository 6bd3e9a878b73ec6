//! Type context for managing types and type interning

use super::error::TypeError;
use super::ty::{
    names, CallableType, ClassId, ClassType, GenericType, PrimitiveType, Type, TypeId, UnionType,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Type context that manages all types in a program
///
/// This uses type interning to ensure that identical types have the same TypeId,
/// which enables efficient equality checking and memory usage.
#[derive(Debug, Clone)]
pub struct TypeContext {
    /// Storage for all types, indexed by TypeId
    types: Vec<Arc<Type>>,

    /// Reverse mapping from Type to TypeId for interning
    type_to_id: FxHashMap<Type, TypeId>,

    /// Named type definitions (builtins and declared classes)
    named_types: FxHashMap<String, TypeId>,
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Containers that can be parameterized, with their fixed arity (`None` = variadic)
const GENERIC_CONTAINERS: &[(&str, &str, Option<usize>)] = &[
    ("list", names::LIST, Some(1)),
    ("dict", names::DICT, Some(2)),
    ("set", names::SET, Some(1)),
    ("tuple", names::TUPLE, None),
    ("type", names::TYPE, Some(1)),
    ("ClassVar", names::CLASS_VAR, Some(1)),
    ("InitVar", names::INIT_VAR, Some(1)),
];

impl TypeContext {
    /// Well-known TypeIds, pre-interned by [`TypeContext::new`]
    pub const INT_TYPE_ID: u32 = 0;
    pub const FLOAT_TYPE_ID: u32 = 1;
    pub const COMPLEX_TYPE_ID: u32 = 2;
    pub const BOOL_TYPE_ID: u32 = 3;
    pub const STR_TYPE_ID: u32 = 4;
    pub const BYTES_TYPE_ID: u32 = 5;
    pub const NONE_TYPE_ID: u32 = 6;
    pub const OBJECT_TYPE_ID: u32 = 7;
    pub const ANY_TYPE_ID: u32 = 8;
    pub const NEVER_TYPE_ID: u32 = 9;

    /// Create a new type context with the builtin types registered
    pub fn new() -> Self {
        let mut ctx = TypeContext {
            types: Vec::new(),
            type_to_id: FxHashMap::default(),
            named_types: FxHashMap::default(),
        };

        // Order must match the *_TYPE_ID constants
        for prim in [
            PrimitiveType::Int,
            PrimitiveType::Float,
            PrimitiveType::Complex,
            PrimitiveType::Bool,
            PrimitiveType::Str,
            PrimitiveType::Bytes,
            PrimitiveType::NoneType,
            PrimitiveType::Object,
        ] {
            let id = ctx.intern(Type::Primitive(prim));
            ctx.register_named_type(prim.type_name().to_string(), id);
        }
        ctx.intern(Type::Any);
        ctx.intern(Type::Never);
        let any = ctx.any_type();
        ctx.register_named_type("Any".to_string(), any);

        for (short, qualified, _) in GENERIC_CONTAINERS {
            let id = ctx.intern(Type::Generic(GenericType {
                base: qualified.to_string(),
                type_args: Vec::new(),
            }));
            ctx.register_named_type(short.to_string(), id);
        }

        ctx
    }

    /// Intern a type, returning its TypeId
    ///
    /// If the type already exists, returns the existing TypeId.
    /// Otherwise, allocates a new TypeId and stores the type.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.type_to_id.get(&ty) {
            return id;
        }

        let id = TypeId(self.types.len() as u32);
        self.types.push(Arc::new(ty.clone()));
        self.type_to_id.insert(ty, id);
        id
    }

    /// Get a type by its TypeId
    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0 as usize).map(|arc| arc.as_ref())
    }

    /// Look up a type's ID without interning (returns None if type doesn't exist)
    pub fn lookup(&self, ty: &Type) -> Option<TypeId> {
        self.type_to_id.get(ty).copied()
    }

    /// Register a named type (builtin or declared class)
    pub fn register_named_type(&mut self, name: String, ty: TypeId) {
        self.named_types.insert(name, ty);
    }

    /// Look up a named type by name
    pub fn lookup_named_type(&self, name: &str) -> Option<TypeId> {
        self.named_types.get(name).copied()
    }

    /// Resolve a named type, returning an error if not found
    pub fn resolve_named_type(&self, name: &str) -> Result<TypeId, TypeError> {
        self.lookup_named_type(name).ok_or_else(|| TypeError::UndefinedType {
            name: name.to_string(),
        })
    }

    /// Resolve `name[args]` for a registered container, checking its arity
    pub fn parameterize(&mut self, name: &str, args: Vec<TypeId>) -> Result<TypeId, TypeError> {
        let (_, qualified, arity) = GENERIC_CONTAINERS
            .iter()
            .find(|(short, qualified, _)| *short == name || *qualified == name)
            .ok_or_else(|| {
                if self.lookup_named_type(name).is_some() {
                    TypeError::NotGeneric {
                        name: name.to_string(),
                    }
                } else {
                    TypeError::UndefinedType {
                        name: name.to_string(),
                    }
                }
            })?;

        if let Some(expected) = arity {
            if args.len() != *expected {
                return Err(TypeError::InvalidTypeArgCount {
                    name: name.to_string(),
                    expected: *expected,
                    actual: args.len(),
                });
            }
        }

        Ok(self.generic_type(qualified, args))
    }

    // Well-known types (pre-interned, so no interning needed)

    /// Get the int type
    pub fn int_type(&self) -> TypeId {
        TypeId(Self::INT_TYPE_ID)
    }

    /// Get the float type
    pub fn float_type(&self) -> TypeId {
        TypeId(Self::FLOAT_TYPE_ID)
    }

    /// Get the complex type
    pub fn complex_type(&self) -> TypeId {
        TypeId(Self::COMPLEX_TYPE_ID)
    }

    /// Get the bool type
    pub fn bool_type(&self) -> TypeId {
        TypeId(Self::BOOL_TYPE_ID)
    }

    /// Get the str type
    pub fn str_type(&self) -> TypeId {
        TypeId(Self::STR_TYPE_ID)
    }

    /// Get the bytes type
    pub fn bytes_type(&self) -> TypeId {
        TypeId(Self::BYTES_TYPE_ID)
    }

    /// Get the type of the `None` constant
    pub fn none_type(&self) -> TypeId {
        TypeId(Self::NONE_TYPE_ID)
    }

    /// Get the object type
    pub fn object_type(&self) -> TypeId {
        TypeId(Self::OBJECT_TYPE_ID)
    }

    /// Get the unsolvable type
    pub fn any_type(&self) -> TypeId {
        TypeId(Self::ANY_TYPE_ID)
    }

    /// Get the never type
    pub fn never_type(&self) -> TypeId {
        TypeId(Self::NEVER_TYPE_ID)
    }

    // Convenience methods for creating composite types

    /// Create a generic container instantiation by qualified name
    pub fn generic_type(&mut self, base: &str, type_args: Vec<TypeId>) -> TypeId {
        self.intern(Type::Generic(GenericType {
            base: base.to_string(),
            type_args,
        }))
    }

    /// Create `list[element]`
    pub fn list_type(&mut self, element: TypeId) -> TypeId {
        self.generic_type(names::LIST, vec![element])
    }

    /// Create `dict[key, value]`
    pub fn dict_type(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.generic_type(names::DICT, vec![key, value])
    }

    /// Create `set[element]`
    pub fn set_type(&mut self, element: TypeId) -> TypeId {
        self.generic_type(names::SET, vec![element])
    }

    /// Create `tuple[elements...]`
    pub fn tuple_type(&mut self, elements: Vec<TypeId>) -> TypeId {
        self.generic_type(names::TUPLE, elements)
    }

    /// Create `type[instance]`, the type of a class object
    pub fn class_object_type(&mut self, instance: TypeId) -> TypeId {
        self.generic_type(names::TYPE, vec![instance])
    }

    /// Create `ClassVar[inner]`
    pub fn class_var(&mut self, inner: TypeId) -> TypeId {
        self.generic_type(names::CLASS_VAR, vec![inner])
    }

    /// Create `InitVar[inner]`
    pub fn init_var(&mut self, inner: TypeId) -> TypeId {
        self.generic_type(names::INIT_VAR, vec![inner])
    }

    /// Create the nominal type of a user-defined class
    pub fn class_type(&mut self, id: ClassId, name: impl Into<String>, bases: Vec<TypeId>) -> TypeId {
        self.intern(Type::Class(ClassType {
            id,
            name: name.into(),
            bases,
        }))
    }

    /// Create a callable type
    pub fn callable_type(&mut self, params: Vec<TypeId>, return_type: TypeId, min_params: usize) -> TypeId {
        self.intern(Type::Callable(CallableType {
            params,
            return_type,
            min_params,
        }))
    }

    /// Create a union type
    ///
    /// Nested unions are flattened and duplicates removed. A single member
    /// collapses to that member; no members collapses to `nothing`.
    pub fn union_type(&mut self, members: Vec<TypeId>) -> TypeId {
        let mut normalized_members = Vec::new();
        for &member in &members {
            if let Some(Type::Union(u)) = self.get(member) {
                normalized_members.extend_from_slice(&u.members);
            } else {
                normalized_members.push(member);
            }
        }

        normalized_members.sort_unstable_by_key(|id| id.0);
        normalized_members.dedup();

        match normalized_members.len() {
            0 => self.never_type(),
            1 => normalized_members[0],
            _ => self.intern(Type::Union(UnionType {
                members: normalized_members,
            })),
        }
    }

    /// Create `Optional[ty]`, i.e. `ty | None`
    pub fn optional_type(&mut self, ty: TypeId) -> TypeId {
        let none = self.none_type();
        self.union_type(vec![ty, none])
    }

    /// Unpack the single type parameter of a marker container
    ///
    /// Returns `Some(inner)` when `ty` is `base[inner]`, `Some(Any)` when it
    /// is the bare container, and `None` when it is something else.
    pub fn match_type_container(&self, ty: TypeId, base: &str) -> Option<TypeId> {
        match self.get(ty)? {
            Type::Generic(g) if g.base == base => {
                Some(g.type_args.first().copied().unwrap_or_else(|| self.any_type()))
            }
            _ => None,
        }
    }

    /// Get a display string for a type, rendering nested types by name
    pub fn display(&self, id: TypeId) -> String {
        match self.get(id) {
            None => format!("InvalidType({})", id.0),
            Some(Type::Generic(g)) => {
                if g.type_args.is_empty() {
                    return g.short_name().to_string();
                }
                let args: Vec<String> = g.type_args.iter().map(|&a| self.display(a)).collect();
                format!("{}[{}]", g.short_name(), args.join(", "))
            }
            Some(Type::Union(u)) => {
                let members: Vec<String> = u.members.iter().map(|&m| self.display(m)).collect();
                members.join(" | ")
            }
            Some(Type::Callable(c)) => {
                let params: Vec<String> = c.params.iter().map(|&p| self.display(p)).collect();
                format!("Callable[[{}], {}]", params.join(", "), self.display(c.return_type))
            }
            Some(ty) => format!("{}", ty),
        }
    }

    /// Get the number of types in the context
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
