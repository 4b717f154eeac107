use crate::ast::Value;
use crate::context::{ContextModel, RootName};
use crate::error::ContextError;
use crate::executor::{ExecutionOutcome, ExpressionExecutor};
use crate::methods::MethodRegistry;
use crate::operation::OperationRegistry;
use crate::pipeline::Pipeline;
use std::sync::Arc;

/// Which representation of the expression is currently authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// The pipeline is authoritative; the expression text is regenerated
    /// from it on every read.
    Pipeline,
    /// The user edits the text directly; the pipeline is decoupled and no
    /// longer synchronized into the text.
    FreeText,
}

/// One editing session of the expression simulator: the context, the
/// pipeline, the executor and the mode switch between the two expression
/// representations.
///
/// While in pipeline mode the generated expression is kept one-way
/// synchronized from the pipeline into the text. The first free-text edit
/// decouples them; re-entering pipeline mode makes the pipeline
/// authoritative again.
pub struct Simulator {
    context: ContextModel,
    pipeline: Pipeline,
    executor: ExpressionExecutor,
    mode: EditMode,
    free_text: String,
}

impl Simulator {
    pub fn new() -> Self {
        Self::with_methods(Arc::new(MethodRegistry::new()))
    }

    pub fn with_methods(methods: Arc<MethodRegistry>) -> Self {
        let operations = Arc::new(OperationRegistry::new(Arc::clone(&methods)));
        Self {
            context: ContextModel::new(),
            pipeline: Pipeline::new(operations),
            executor: ExpressionExecutor::new(methods),
            mode: EditMode::Pipeline,
            free_text: String::new(),
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn context(&self) -> &ContextModel {
        &self.context
    }

    pub fn set_root_text(&mut self, root: RootName, text: &str) {
        self.context.set_root_text(root, text);
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Mutable pipeline access for step editing. Edits only reach the
    /// expression text while the session is in pipeline mode.
    pub fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }

    /// The current expression text, including the `{{ … }}` delimiters.
    pub fn expression_text(&self) -> String {
        match self.mode {
            EditMode::Pipeline => self.pipeline.generated_template(&self.context),
            EditMode::FreeText => self.free_text.clone(),
        }
    }

    /// Replaces the expression text directly, decoupling it from the
    /// pipeline.
    pub fn set_free_text(&mut self, text: &str) {
        self.mode = EditMode::FreeText;
        self.free_text = text.to_string();
    }

    /// Makes the pipeline authoritative again; the stored free text is
    /// discarded in favor of the generated expression.
    pub fn use_pipeline(&mut self) {
        self.mode = EditMode::Pipeline;
        self.free_text.clear();
    }

    /// The live value after each pipeline step.
    pub fn step_previews(&self) -> Result<Vec<Value>, ContextError> {
        self.pipeline.step_previews(&self.context)
    }

    /// Evaluates the current expression text against the current context.
    pub fn execute(&self) -> ExecutionOutcome {
        self.executor.execute(&self.expression_text(), &self.context)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}
