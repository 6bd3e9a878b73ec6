//! Module overlays
//!
//! An overlay replaces members of a host-language module with analyzer
//! implementations. Only `dataclasses` is overlaid.

pub mod classgen;
pub mod dataclass;

pub use classgen::{Attribute, AttributeSummary};
pub use dataclass::{Dataclass, DataclassOptions, Field, FieldInstance, MemberKind};

use rustc_hash::FxHashMap;

/// A member provided by an overlay
#[derive(Debug, Clone)]
pub enum OverlayMember {
    /// `dataclasses.dataclass`
    Dataclass(Dataclass),
    /// `dataclasses.field`
    Field(Field),
}

type MemberFactory = fn() -> OverlayMember;

/// Overlay for the `dataclasses` module
pub struct DataclassOverlay {
    /// Map from member name to its constructor
    members: FxHashMap<&'static str, MemberFactory>,
}

impl Default for DataclassOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl DataclassOverlay {
    /// Name of the overlaid module
    pub const MODULE: &'static str = "dataclasses";

    /// Create the overlay with all of its members registered
    pub fn new() -> Self {
        let mut members: FxHashMap<&'static str, MemberFactory> = FxHashMap::default();
        members.insert("dataclass", || OverlayMember::Dataclass(Dataclass::new()));
        members.insert("field", || OverlayMember::Field(Field::new()));
        Self { members }
    }

    /// Look up a member by name; `None` means the module's own definition applies
    pub fn lookup(&self, name: &str) -> Option<OverlayMember> {
        self.members.get(name).map(|make| make())
    }

    /// Check if a qualified name such as `dataclasses.field` is overlaid
    pub fn is_overlaid(&self, qualified: &str) -> bool {
        qualified
            .strip_prefix(Self::MODULE)
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|member| self.members.contains_key(member))
    }

    /// Names of the overlaid members, sorted
    pub fn member_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.members.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
