//! Workflow continuation subsystem.
//!
//! # Data Flow
//! ```text
//! matched HandlerDescriptor + session id
//!     → resolve (role-dependent load or create of handler/form instances)
//!     → shell binds the form and invokes the handler
//!     → finish (Completes tears the session slot down)
//! ```
//!
//! # State Machine
//! ```text
//! per (session, workflow name):
//!
//!   Absent --Initiates--> Active --Completes--> Absent
//!                         Active --Resumes----> Active
//!   Absent --Resumes/Completes--> error (no implicit recovery)
//! ```
//!
//! # Design Decisions
//! - Removal on Completes is deferred to `finish` so the handler still sees
//!   its state while executing
//! - No internal locking: racing requests on one workflow name observe
//!   last-write-wins on the session store
//! - An Active slot whose workflow never completes expires with the session

pub mod store;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::descriptor::{HandlerDescriptor, WorkflowRole};
use crate::error::{WorkflowError, WorkflowResult};

pub use store::{MemorySessionStore, SessionStore, StoredInstance};

const HANDLER_SUFFIX: &str = "-handler";
const FORM_SUFFIX: &str = "-form";

/// Creates handler and form instances by scanned type name.
pub trait InstanceFactory: Send + Sync {
    fn create_handler(&self, type_name: &str) -> Option<StoredInstance>;
    fn create_form(&self, type_name: &str) -> Option<StoredInstance>;
}

/// Whether a workflow slot currently holds state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Absent,
    Active,
}

/// The handler/form pair a request executes against.
pub struct Continuation {
    pub handler: StoredInstance,
    pub form: Option<StoredInstance>,
}

impl std::fmt::Debug for Continuation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Continuation")
            .field("handler", &"<instance>")
            .field("form", &self.form.as_ref().map(|_| "<instance>"))
            .finish()
    }
}

/// Resolves handler/form instance lifetime across a workflow's requests.
pub struct WorkflowContinuation {
    store: Arc<dyn SessionStore>,
}

impl WorkflowContinuation {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Resolve the instances for one dispatch.
    ///
    /// Stateless descriptors get fresh instances and never touch the session
    /// store. `Initiates` creates and stores the pair; `Resumes` and
    /// `Completes` load the stored pair and fail when the workflow is not
    /// active.
    pub fn resolve(
        &self,
        session_id: &str,
        descriptor: &HandlerDescriptor,
        factory: &dyn InstanceFactory,
    ) -> WorkflowResult<Continuation> {
        let Some((role, workflow)) = descriptor.workflow() else {
            return self.fresh(descriptor, factory);
        };

        match role {
            WorkflowRole::Initiates => {
                if self.state(session_id, workflow) == WorkflowState::Active {
                    // Matches the session store's last-write-wins contract:
                    // a re-initiation replaces the previous slot.
                    warn!(workflow, session_id, "re-initiating an active workflow");
                }
                let continuation = self.fresh(descriptor, factory)?;
                self.store.put(
                    session_id,
                    &handler_key(workflow),
                    Arc::clone(&continuation.handler),
                );
                if let Some(form) = &continuation.form {
                    self.store
                        .put(session_id, &form_key(workflow), Arc::clone(form));
                }
                debug!(workflow, session_id, "workflow initiated");
                Ok(continuation)
            }
            WorkflowRole::Resumes | WorkflowRole::Completes => {
                let handler = self
                    .store
                    .get(session_id, &handler_key(workflow))
                    .ok_or_else(|| WorkflowError::NotActive {
                        workflow: workflow.to_string(),
                    })?;
                let form = self.store.get(session_id, &form_key(workflow));
                Ok(Continuation { handler, form })
            }
        }
    }

    /// Called by the shell after the handler executed. `Completes` removes
    /// the session slot; every other role is a no-op.
    pub fn finish(&self, session_id: &str, descriptor: &HandlerDescriptor) {
        if let Some((WorkflowRole::Completes, workflow)) = descriptor.workflow() {
            self.store.remove(session_id, &handler_key(workflow));
            self.store.remove(session_id, &form_key(workflow));
            debug!(workflow, session_id, "workflow completed");
        }
    }

    /// Current state of a workflow slot.
    pub fn state(&self, session_id: &str, workflow: &str) -> WorkflowState {
        if self.store.get(session_id, &handler_key(workflow)).is_some() {
            WorkflowState::Active
        } else {
            WorkflowState::Absent
        }
    }

    fn fresh(
        &self,
        descriptor: &HandlerDescriptor,
        factory: &dyn InstanceFactory,
    ) -> WorkflowResult<Continuation> {
        let handler = factory
            .create_handler(descriptor.handler_type())
            .ok_or_else(|| WorkflowError::UnknownInstanceType {
                type_name: descriptor.handler_type().to_string(),
            })?;
        let form = match descriptor.form_type() {
            Some(form_type) => Some(factory.create_form(form_type).ok_or_else(|| {
                WorkflowError::UnknownInstanceType {
                    type_name: form_type.to_string(),
                }
            })?),
            None => None,
        };
        Ok(Continuation { handler, form })
    }
}

fn handler_key(workflow: &str) -> String {
    format!("{workflow}{HANDLER_SUFFIX}")
}

fn form_key(workflow: &str) -> String {
    format!("{workflow}{FORM_SUFFIX}")
}
