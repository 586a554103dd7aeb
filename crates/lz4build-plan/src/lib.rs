//! Source selection, freestanding macro synthesis, and artifact assembly.
//!
//! Derives artifact descriptors from a resolved configuration through a
//! fixed sequence of pure stages: source selection, memory-primitive
//! synthesis (freestanding builds only), and assembly of defines, sanitizers,
//! and exported headers. Nothing here performs I/O.

pub mod artifact;
pub mod assemble;
pub mod error;
pub mod fingerprint;
pub mod freestanding;
pub mod headers;
pub mod report;
pub mod sources;

pub use artifact::{ArtifactDescriptor, ArtifactKind, Define, Sanitizers, UnitInvocation};
pub use assemble::{assemble, plan, plan_from_raw, BuildPlan, PlanWarning, XXH_NAMESPACE_PREFIX};
pub use error::PlanError;
pub use freestanding::{synthesize, MacroDefinition, MacroSet, MemoryPrimitive};
pub use headers::{exported_headers, HeaderId};
pub use sources::{select, SourceSet, TranslationUnit};
