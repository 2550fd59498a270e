//! Schema registry generations for the BRFSS harmonization pipeline.
//!
//! Each generation is a TOML file under `standards/registry/` listing the
//! canonical output columns, their kind, and every raw survey name they have
//! appeared under. [`SchemaRegistry`] validates a generation and answers the
//! lookups the engine needs.

pub mod error;
pub mod generation;
pub mod registry;

pub use error::RegistryError;
pub use generation::Generation;
pub use registry::SchemaRegistry;
