//! # Cadeia - Expression Pipeline and Evaluation Engine
//!
//! **Cadeia** is the engine behind an expression-simulator tool: a user
//! either builds a chain of data-transformation steps visually, each step
//! mapping to an equivalent fragment of expression text, or writes the
//! expression directly — and evaluates it live against a mutable,
//! multi-root data context.
//!
//! ## Core Workflow
//!
//! 1.  **Feed the context**: three independently-editable raw-text roots
//!     (`json`, `node`, `env`) are re-parsed on every edit into structured
//!     values; a parse failure in any root invalidates the whole context.
//! 2.  **Build a pipeline**: an ordered list of steps (`getProperty`,
//!     `filter`, `map`, `reduceSum`, `callMethod`) rooted at one context
//!     binding. Each step previews its live value and emits its code
//!     fragment, so the chain always has an equivalent expression text.
//! 3.  **Or write the text freehand**: the generated expression is
//!     synchronized into the editor only while the pipeline is
//!     authoritative; a direct edit decouples the two representations.
//! 4.  **Execute**: the expression body (optionally wrapped in `{{ … }}`)
//!     is parsed by a small restricted grammar and evaluated against the
//!     context. Extension methods such as `.filter(...)` or `.length` are
//!     resolved through the [`methods::MethodRegistry`] by explicit
//!     dispatch — nothing is ever installed on shared built-in types, so
//!     evaluations are isolated and concurrency-safe.
//!
//! ## Quick Start
//!
//! ```rust
//! use cadeia::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut simulator = Simulator::new();
//!     simulator.set_root_text(
//!         RootName::Json,
//!         r#"{"pedidos": [
//!             {"valor": 150, "status": "pago"},
//!             {"valor": 80, "status": "pendente"}
//!         ]}"#,
//!     );
//!
//!     // Build: $json?.pedidos?.map("valor")?.reduceSum()
//!     let pipeline = simulator.pipeline_mut();
//!     let step = pipeline.add_step(OpKind::GetProperty);
//!     pipeline.update_step_param(step, "property", "pedidos");
//!     let step = pipeline.add_step(OpKind::Map);
//!     pipeline.update_step_param(step, "property", "valor");
//!     pipeline.add_step(OpKind::ReduceSum);
//!
//!     let outcome = simulator.execute();
//!     assert_eq!(outcome.value, Value::Number(230.0));
//!
//!     // The same result through the decoupled free-text editor.
//!     simulator.set_free_text("{{ $json?.pedidos?.map(\"valor\")?.reduceSum() }}");
//!     let outcome = simulator.execute();
//!     assert_eq!(outcome.value, Value::Number(230.0));
//!     Ok(())
//! }
//! ```

pub mod ast;
pub mod context;
pub mod error;
pub mod executor;
pub mod methods;
pub mod operation;
pub mod pipeline;
pub mod prelude;
pub mod simulator;
