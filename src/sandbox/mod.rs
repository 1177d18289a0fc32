/// Sandbox domain layer: engine invocation, output envelope, cosmetic rewrites.
pub mod envelope;
pub mod errors;
pub mod exec;
pub mod filters;
pub mod rewrite;

pub use envelope::SandboxOutput;
pub use errors::SandboxError;
pub use exec::{Engine, EngineCommand, ExecRequest};
pub use filters::{Filters, adjust_include_exclude};
