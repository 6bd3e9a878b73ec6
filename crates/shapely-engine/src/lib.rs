//! Shapely Engine
//!
//! Static synthesis of dataclass constructors and attribute metadata.
//!
//! This crate provides:
//! - An interned type lattice with an assignability relation
//! - A minimal analysis state: program points, abstract values, class objects
//! - The `dataclasses` overlay: `@dataclass` and `field(...)`
//! - Error reporting with codespan and JSON rendering
//! - TOML configuration for warnings
//!
//! # Usage
//!
//! ```ignore
//! use shapely_engine::{ClassBuilder, Constant, Dataclass, Vm};
//!
//! let mut vm = Vm::new();
//! let int = vm.types.int_type();
//! let str_ty = vm.types.str_type();
//!
//! let base = ClassBuilder::new("Base").annotate("a", int).build(&mut vm)?;
//! Dataclass::new().decorate(&mut vm, base)?;
//!
//! let child = ClassBuilder::new("Child")
//!     .base(base)
//!     .declare("b", str_ty, vm.constant(Constant::Str("x".into())))
//!     .build(&mut vm)?;
//! Dataclass::new().decorate(&mut vm, child)?;
//!
//! // Child.__init__(self, a: int, b: str = 'x') -> None
//! ```

#![warn(rust_2018_idioms)]

pub mod checker;
pub mod config;
pub mod overlays;
pub mod span;
pub mod types;
pub mod vm;

pub use checker::{CheckError, CheckWarning, DecorateError, Diagnostic, ErrorLog, WarningCode, WarningConfig};
pub use config::{AnalyzerConfig, ConfigError};
pub use overlays::{Attribute, AttributeSummary, Dataclass, DataclassOptions, DataclassOverlay, Field, FieldInstance, OverlayMember};
pub use span::Span;
pub use types::{ClassId, TypeContext, TypeId};
pub use vm::{CallArgs, ClassBuilder, Constant, NodeId, Ordering, Value, Variable, Vm};
