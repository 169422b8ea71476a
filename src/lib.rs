//! Declarative model for dynamic, data-bound forms
//!
//! This crate provides an in-memory model of form elements and a reactive
//! evaluation engine over it:
//! - Fields bound to backing data through read/write [`Binding`]s
//! - Validator pipeline with ordered, field- and form-scoped feedback
//! - Trigger-based actions that re-derive enabled/disabled field state,
//!   settled to a fixed point per submission cycle
//! - Atomic commit: validated user input is written through bindings
//!   all-or-nothing, then a submit callback runs exactly once
//!
//! Rendering and the request/response cycle are external collaborators:
//! they consume the element tree plus the per-cycle enabled state and
//! feedback, and hand back submitted raw values keyed by stable field ids.

pub mod action;
pub mod binding;
pub mod element;
pub mod engine;
pub mod field;
pub mod form;
pub mod validation;
pub mod validators;

pub use action::{FormAction, ToggleEnabledAction};
pub use binding::{Binding, BindingError, BindingResult, ConstantBinding, PropertyBinding};
pub use element::{FormElement, Section, Text};
pub use engine::{CycleOutcome, DEFAULT_REQUIRED_MESSAGE, FormEngine, SubmitOutcome};
pub use field::{FieldKind, InputField};
pub use form::{FormError, FormModel, FormResult};
pub use validation::{
	FeedbackMessage, FeedbackScope, FieldValidator, FnFormValidator, FormValidator,
	ValidationFeedback,
};
pub use validators::{
	FieldsEqualValidator, NumberRangeValidator, PatternValidator, StringLengthValidator,
};
