//! Core type definitions for the Shapely type lattice

use std::fmt;

/// Unique identifier for a type in the type context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    /// Create a new TypeId from a raw value
    ///
    /// Note: This should generally only be used internally or for interop.
    /// Prefer using TypeContext methods to get well-known type IDs.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value of this TypeId
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Identity of a user-defined class object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    /// Get the raw value of this ClassId
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

/// Qualified names of the generic containers the analyzer knows about
pub mod names {
    /// `list[T]`
    pub const LIST: &str = "builtins.list";
    /// `dict[K, V]`
    pub const DICT: &str = "builtins.dict";
    /// `set[T]`
    pub const SET: &str = "builtins.set";
    /// `tuple[T, ...]`
    pub const TUPLE: &str = "builtins.tuple";
    /// `type[T]`, the type of a class object
    pub const TYPE: &str = "builtins.type";
    /// Excluded-from-storage marker
    pub const CLASS_VAR: &str = "typing.ClassVar";
    /// Constructor-only marker
    pub const INIT_VAR: &str = "dataclasses.InitVar";
}

/// Builtin scalar classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `int`
    Int,
    /// `float`
    Float,
    /// `complex`
    Complex,
    /// `bool`, a subclass of `int`
    Bool,
    /// `str`
    Str,
    /// `bytes`
    Bytes,
    /// `NoneType`, the class of the `None` constant
    NoneType,
    /// `object`, the root of every class hierarchy
    Object,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

impl PrimitiveType {
    /// Name as written in an annotation
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Float => "float",
            PrimitiveType::Complex => "complex",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Str => "str",
            PrimitiveType::Bytes => "bytes",
            PrimitiveType::NoneType => "None",
            PrimitiveType::Object => "object",
        }
    }

    /// Rank in the numeric tower `bool <: int <: float <: complex`
    pub fn numeric_rank(&self) -> Option<u8> {
        match self {
            PrimitiveType::Bool => Some(0),
            PrimitiveType::Int => Some(1),
            PrimitiveType::Float => Some(2),
            PrimitiveType::Complex => Some(3),
            _ => None,
        }
    }
}

/// Nominal class type for a user-defined class
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassType {
    /// Class object this type describes
    pub id: ClassId,
    /// Class name
    pub name: String,
    /// Direct bases, in declaration order
    pub bases: Vec<TypeId>,
}

/// Parameterized container: `list[int]`, `ClassVar[str]`
///
/// An empty `type_args` list is the bare, unparameterized container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericType {
    /// Qualified name of the container, see [`names`]
    pub base: String,
    /// Type arguments
    pub type_args: Vec<TypeId>,
}

impl GenericType {
    /// Name without its module prefix
    pub fn short_name(&self) -> &str {
        self.base.rsplit('.').next().unwrap_or(&self.base)
    }
}

/// Union type: T1 | T2 | ... | Tn
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnionType {
    /// Members of the union
    pub members: Vec<TypeId>,
}

/// Callable type: (T1, T2, ..., Tn) -> R
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallableType {
    /// Parameter types
    pub params: Vec<TypeId>,
    /// Return type
    pub return_type: TypeId,
    /// Minimum number of required parameters (params without default values)
    pub min_params: usize,
}

/// The core type representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Builtin scalar class
    Primitive(PrimitiveType),

    /// User-defined class (nominal)
    Class(ClassType),

    /// Generic container instantiation
    Generic(GenericType),

    /// Union type: T1 | T2 | ... | Tn
    Union(UnionType),

    /// Callable type
    Callable(CallableType),

    /// Unsolvable type; compatible with everything in both directions
    Any,

    /// Bottom type (no possible value)
    Never,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{}", p),
            Type::Class(c) => write!(f, "{}", c.name),
            Type::Generic(g) => {
                write!(f, "{}", g.short_name())?;
                if !g.type_args.is_empty() {
                    write!(f, "[")?;
                    for (i, arg) in g.type_args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, "]")?;
                }
                Ok(())
            }
            Type::Union(u) => {
                for (i, member) in u.members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
            Type::Callable(c) => {
                write!(f, "Callable[[")?;
                for (i, param) in c.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, "], {}]", c.return_type)
            }
            Type::Any => write!(f, "Any"),
            Type::Never => write!(f, "nothing"),
        }
    }
}

impl Type {
    /// Check if this type is the unsolvable type
    pub fn is_any(&self) -> bool {
        matches!(self, Type::Any)
    }

    /// Check if this type is the never type
    pub fn is_never(&self) -> bool {
        matches!(self, Type::Never)
    }

    /// Get the primitive type if this is a primitive
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Get the generic container if this is one
    pub fn as_generic(&self) -> Option<&GenericType> {
        match self {
            Type::Generic(g) => Some(g),
            _ => None,
        }
    }

    /// Get the class type if this is a user-defined class
    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            Type::Class(c) => Some(c),
            _ => None,
        }
    }
}
