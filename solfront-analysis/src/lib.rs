//! Scoped name resolution over a parsed source unit.
//!
//! [`resolve`] walks one tree, builds the lexical scope chain (file →
//! contract → function → block) out of [`Environment`]s, and returns a
//! [`Resolution`]: every declared [`Symbol`] with its accumulated
//! references, plus the identifier sites no scope could bind. Progress is
//! reported through `tracing` events so a host can observe a pass without
//! the pass knowing about the host.

pub mod environment;
pub mod resolve;
pub mod symbol;

pub use environment::Environment;
pub use resolve::{resolve, Resolution};
pub use symbol::{
    BaseSymbol, NodeArena, NodeId, Reference, Symbol, SymbolArena, SymbolId, UsageKind,
};
