// Public modules
pub mod alias;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod playbook;
pub mod prompt;
pub mod resolver;
pub mod runner;
pub mod script;
pub mod settings;
pub mod shell;
pub mod ssh;
pub mod status;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use resolver::ResolvedEnvironment;
pub use runner::{CommandSpec, RunResult};
pub use settings::ConfigStore;
