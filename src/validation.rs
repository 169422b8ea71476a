//! Validation feedback and the validator contracts.

use serde::Serialize;

use crate::field::InputField;
use crate::form::FormModel;

/// Where a feedback message is anchored: a single field, or the form as a
/// whole (cross-field rules).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackScope {
	Field(String),
	Form,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackMessage {
	pub scope: FeedbackScope,
	pub message: String,
}

/// Append-only sink of validation error messages, scoped per evaluation
/// cycle.
///
/// Message order is deterministic: validators append in declaration order,
/// the engine visits fields in tree order, and form-level validators run
/// last. The sink is never persisted across cycles.
///
/// # Examples
///
/// ```
/// use dynaform::validation::ValidationFeedback;
///
/// let mut feedback = ValidationFeedback::new();
/// assert!(feedback.is_empty());
///
/// feedback.field_error("age", "The value for 'Age' is below the minimum of 0");
/// feedback.form_error("Passwords do not match");
///
/// assert_eq!(feedback.len(), 2);
/// assert_eq!(feedback.field_messages("age").len(), 1);
/// assert_eq!(feedback.form_messages().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationFeedback {
	messages: Vec<FeedbackMessage>,
}

impl ValidationFeedback {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an error message with an explicit scope.
	pub fn error(&mut self, scope: FeedbackScope, message: impl Into<String>) {
		self.messages.push(FeedbackMessage {
			scope,
			message: message.into(),
		});
	}

	/// Append an error message scoped to the field with the given id.
	pub fn field_error(&mut self, field_id: impl Into<String>, message: impl Into<String>) {
		self.error(FeedbackScope::Field(field_id.into()), message);
	}

	/// Append a form-scoped (cross-field) error message.
	pub fn form_error(&mut self, message: impl Into<String>) {
		self.error(FeedbackScope::Form, message);
	}

	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}

	pub fn len(&self) -> usize {
		self.messages.len()
	}

	/// All messages, in emission order.
	pub fn messages(&self) -> &[FeedbackMessage] {
		&self.messages
	}

	/// Messages scoped to the given field, in emission order.
	pub fn field_messages(&self, field_id: &str) -> Vec<&str> {
		self.messages
			.iter()
			.filter(|m| matches!(&m.scope, FeedbackScope::Field(id) if id == field_id))
			.map(|m| m.message.as_str())
			.collect()
	}

	/// Form-scoped messages, in emission order.
	pub fn form_messages(&self) -> Vec<&str> {
		self.messages
			.iter()
			.filter(|m| m.scope == FeedbackScope::Form)
			.map(|m| m.message.as_str())
			.collect()
	}
}

/// A validation rule on a single input field.
///
/// Implementations must be idempotent and free of side effects other than
/// appending to the feedback sink. They never mutate the field or the
/// value. The `value` passed in is the field's user input for the current
/// cycle, not its possibly stale bound value.
pub trait FieldValidator {
	fn validate(
		&self,
		field: &InputField,
		value: Option<&serde_json::Value>,
		feedback: &mut ValidationFeedback,
	);
}

/// A cross-field validation rule over the whole form model.
///
/// Ad-hoc rules can be registered as plain closures via
/// [`FormModel::validator_fn`](crate::form::FormModel::validator_fn).
pub trait FormValidator {
	fn validate(&self, form: &FormModel, feedback: &mut ValidationFeedback);
}

/// Adapter turning a closure into a [`FormValidator`].
pub struct FnFormValidator<F>(pub F);

impl<F> FormValidator for FnFormValidator<F>
where
	F: Fn(&FormModel, &mut ValidationFeedback),
{
	fn validate(&self, form: &FormModel, feedback: &mut ValidationFeedback) {
		(self.0)(form, feedback)
	}
}
