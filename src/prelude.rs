//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the cadeia crate so a
//! consumer can wire up a session without importing each module
//! individually.
//!
//! # Example
//!
//! ```rust
//! use cadeia::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let mut simulator = Simulator::new();
//! simulator.set_root_text(RootName::Json, r#"{"usuario": {"nome": "Ana"}}"#);
//!
//! let id = simulator.pipeline_mut().add_step(OpKind::GetProperty);
//! simulator.pipeline_mut().update_step_param(id, "property", "usuario");
//!
//! let outcome = simulator.execute();
//! assert!(!outcome.is_error);
//! # Ok(())
//! # }
//! ```

// Session facade
pub use crate::simulator::{EditMode, Simulator};

// Context
pub use crate::context::{ContextModel, ContextSnapshot, RootName};

// Pipeline and operations
pub use crate::operation::{OpKind, Operation, OperationRegistry, StepParams};
pub use crate::pipeline::{Pipeline, Step, StepId};

// Method registry
pub use crate::methods::{
    MethodCategory, MethodDefinition, MethodRegistry, ParameterSpec, ParameterType,
};

// Execution
pub use crate::executor::{ExecutionOutcome, ExpressionExecutor};

// Values
pub use crate::ast::{Value, ValueKind};

// Error types
pub use crate::error::{ContextError, EvalError, ExprParseError};

// Standard library re-exports commonly used with this crate
pub use std::sync::Arc;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
