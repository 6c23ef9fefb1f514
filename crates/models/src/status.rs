//! Declared status vocabularies with explicit transition tables.
//!
//! Every entity that carries a lifecycle stores it as a plain string column
//! but exposes it through an enum implementing [`StatusFlow`]. Legality of a
//! transition is decided by the enum's table, never by ad hoc string
//! comparisons in the services.

/// A status enum with a declared transition matrix.
pub trait StatusFlow: Copy + Eq + std::fmt::Debug {
    /// Entity name used in error messages and logs.
    const ENTITY: &'static str;

    /// Stable storage representation.
    fn as_str(self) -> &'static str;

    /// Parse the storage representation; `None` for unknown values.
    fn parse(raw: &str) -> Option<Self>;

    /// Whether the `(self, to)` pair appears in the transition table.
    fn can_transition(self, to: Self) -> bool;
}
