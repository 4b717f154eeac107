use crate::ast::Value;
use crate::context::{ContextModel, RootName};
use crate::error::ContextError;
use crate::operation::{OpKind, OperationRegistry, StepParams};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type StepId = u64;

/// One stage of a user-built transformation chain: an operation kind and its
/// parameter bag. Order in the pipeline is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub kind: OpKind,
    pub params: StepParams,
}

/// An ordered, user-editable sequence of steps rooted at a context binding.
///
/// The pipeline stores only the root and the steps; the per-step preview
/// values and the generated expression text are recomputed on demand, never
/// stored.
pub struct Pipeline {
    registry: Arc<OperationRegistry>,
    root: RootName,
    steps: Vec<Step>,
    next_id: StepId,
}

impl Pipeline {
    pub fn new(registry: Arc<OperationRegistry>) -> Self {
        Self {
            registry,
            root: RootName::Json,
            steps: Vec::new(),
            next_id: 1,
        }
    }

    pub fn root(&self) -> RootName {
        self.root
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, id: StepId) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == id)
    }

    /// Changes the root binding. Every downstream step depends on the root's
    /// shape, so this clears the whole chain.
    pub fn set_root(&mut self, root: RootName) {
        self.root = root;
        self.steps.clear();
    }

    /// Appends a step seeded with the variant's declared defaults.
    pub fn add_step(&mut self, kind: OpKind) -> StepId {
        let params = self
            .registry
            .by_kind(kind)
            .map(|op| op.default_params())
            .unwrap_or_default();
        self.add_step_with(kind, params)
    }

    pub fn add_step_with(&mut self, kind: OpKind, params: StepParams) -> StepId {
        let id = self.next_id;
        self.next_id += 1;
        self.steps.push(Step { id, kind, params });
        id
    }

    /// Removes one step, preserving the order and ids of the rest.
    pub fn remove_step(&mut self, id: StepId) -> bool {
        let before = self.steps.len();
        self.steps.retain(|step| step.id != id);
        self.steps.len() != before
    }

    /// Targeted update of one step's parameter. Returns false when the step
    /// or the key does not exist.
    pub fn update_step_param(&mut self, id: StepId, key: &str, value: &str) -> bool {
        match self.steps.iter_mut().find(|step| step.id == id) {
            Some(step) => step.params.set(key, value),
            None => false,
        }
    }

    /// Targeted update of one named call-method argument.
    pub fn update_step_arg(&mut self, id: StepId, name: &str, value: &str) -> bool {
        match self.steps.iter_mut().find(|step| step.id == id) {
            Some(step) => {
                step.params.set_arg(name, value);
                true
            }
            None => false,
        }
    }

    /// The live value after each step, folding left-to-right from the root's
    /// structured value. Once a step degrades to `Undefined`, every later
    /// step is reported as `Undefined` without being evaluated.
    pub fn step_previews(&self, context: &ContextModel) -> Result<Vec<Value>, ContextError> {
        let snapshot = context.snapshot()?;
        let mut current = snapshot.root(self.root).clone();
        let mut previews = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            if current.is_undefined() {
                previews.push(Value::Undefined);
                continue;
            }
            current = match self.registry.by_kind(step.kind) {
                Some(op) => op.evaluate(&current, &step.params),
                None => Value::Undefined,
            };
            previews.push(current.clone());
        }
        Ok(previews)
    }

    /// The expression text equivalent to the current chain, starting from
    /// the root-binding sigil form. Code generation always succeeds
    /// syntactically, even when the live value is undefined or the context
    /// does not parse; the context is consulted only for literal-rendering
    /// hints.
    pub fn generated_expression(&self, context: &ContextModel) -> String {
        let mut text = format!("${}", self.root);
        let mut hint = context
            .snapshot()
            .ok()
            .map(|snapshot| snapshot.root(self.root).clone());
        for step in &self.steps {
            let Some(op) = self.registry.by_kind(step.kind) else {
                continue;
            };
            text = op.emit(&text, &step.params, hint.as_ref());
            hint = hint.and_then(|value| {
                let next = op.evaluate(&value, &step.params);
                if next.is_undefined() { None } else { Some(next) }
            });
        }
        text
    }

    /// The generated expression wrapped in the `{{ … }}` delimiters the
    /// executor strips.
    pub fn generated_template(&self, context: &ContextModel) -> String {
        format!("{{{{ {} }}}}", self.generated_expression(context))
    }
}
