//! Input fields: user-facing form fields with validators and actions.

use std::rc::Rc;

use serde::Serialize;

use crate::action::FormAction;
use crate::binding::{Binding, BindingResult};
use crate::validation::FieldValidator;

/// The declared value kind of an input field.
///
/// The kind is fixed at form-definition time and drives both the raw-input
/// type check in the engine and widget selection in a renderer. `Null` is
/// accepted for every kind; required-ness is a separate rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
	Text,
	Integer,
	Float,
	Boolean,
}

impl FieldKind {
	/// Whether a raw submitted value is representable in this kind.
	///
	/// # Examples
	///
	/// ```
	/// use dynaform::field::FieldKind;
	///
	/// assert!(FieldKind::Integer.accepts(&serde_json::json!(3)));
	/// assert!(FieldKind::Integer.accepts(&serde_json::Value::Null));
	/// assert!(!FieldKind::Integer.accepts(&serde_json::json!("3")));
	/// assert!(FieldKind::Float.accepts(&serde_json::json!(3)));
	/// assert!(FieldKind::Boolean.accepts(&serde_json::json!(true)));
	/// ```
	pub fn accepts(&self, value: &serde_json::Value) -> bool {
		use serde_json::Value;
		match (self, value) {
			(_, Value::Null) => true,
			(FieldKind::Text, Value::String(_)) => true,
			(FieldKind::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
			(FieldKind::Float, Value::Number(_)) => true,
			(FieldKind::Boolean, Value::Bool(_)) => true,
			_ => false,
		}
	}
}

/// An input field of a dynamic form.
///
/// A field carries a stable id (the key the submission boundary uses), a
/// label, optional metadata, an ordered list of validators and an ordered
/// list of actions. The transient user-input slot holds the candidate value
/// for the current cycle; the bound value is only updated by a successful
/// commit.
///
/// Fields are assembled with fluent builders:
///
/// ```
/// use dynaform::field::InputField;
/// use dynaform::validators::NumberRangeValidator;
///
/// let field = InputField::integer("age", "Age")
/// 	.required()
/// 	.with_hint("Your age in years")
/// 	.validator(NumberRangeValidator::new(Some(0.0), Some(150.0)));
///
/// assert_eq!(field.id(), "age");
/// assert!(field.is_required());
/// assert!(field.is_enabled());
/// ```
pub struct InputField {
	id: String,
	kind: FieldKind,
	label: String,
	hint: Option<String>,
	required: bool,
	required_message: Option<String>,
	enabled: bool,
	binding: Option<Box<dyn Binding>>,
	value: Option<serde_json::Value>,
	user_input: Option<serde_json::Value>,
	validators: Vec<Box<dyn FieldValidator>>,
	actions: Vec<Rc<dyn FormAction>>,
}

impl InputField {
	fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			id: id.into(),
			kind,
			label: label.into(),
			hint: None,
			required: false,
			required_message: None,
			enabled: true,
			binding: None,
			value: None,
			user_input: None,
			validators: vec![],
			actions: vec![],
		}
	}

	/// Create a text field.
	pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(id, label, FieldKind::Text)
	}

	/// Create an integer field.
	pub fn integer(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(id, label, FieldKind::Integer)
	}

	/// Create a floating-point field.
	pub fn float(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(id, label, FieldKind::Float)
	}

	/// Create a boolean (checkbox) field.
	pub fn boolean(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(id, label, FieldKind::Boolean)
	}

	/// Mark the field as mandatory. Submission cannot commit while an
	/// enabled required field has empty input.
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	/// Mark the field as mandatory with a custom message to use instead of
	/// the default one when the field is left empty.
	pub fn required_with_message(mut self, message: impl Into<String>) -> Self {
		self.required = true;
		self.required_message = Some(message.into());
		self
	}

	/// Set a hint shown next to the field, e.g. as a tooltip.
	pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
		self.hint = Some(hint.into());
		self
	}

	/// Back this field with a binding. The bound value is refreshed from it
	/// and committed through it.
	pub fn with_binding(mut self, binding: impl Binding + 'static) -> Self {
		self.binding = Some(Box::new(binding));
		self
	}

	/// Set an initial in-memory value for an unbound field.
	pub fn with_initial(mut self, value: serde_json::Value) -> Self {
		self.value = Some(value);
		self
	}

	/// Append a validator. Validators run in the order they were added.
	pub fn validator(mut self, validator: impl FieldValidator + 'static) -> Self {
		self.validators.push(Box::new(validator));
		self
	}

	/// Append an action. Actions run in the order they were added, after
	/// every field's user input for the cycle has been applied.
	pub fn action(mut self, action: impl FormAction + 'static) -> Self {
		self.actions.push(Rc::new(action));
		self
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn kind(&self) -> FieldKind {
		self.kind
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn hint(&self) -> Option<&str> {
		self.hint.as_deref()
	}

	pub fn is_required(&self) -> bool {
		self.required
	}

	pub fn required_message(&self) -> Option<&str> {
		self.required_message.as_deref()
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Enable or disable the field. Disabling never clears the stored value
	/// or the user input; a disabled field is simply skipped by validation
	/// and commit.
	pub fn set_enabled(&mut self, enabled: bool) {
		self.enabled = enabled;
	}

	/// Store the candidate value for the current cycle. No validation and
	/// no side effects beyond the assignment.
	pub fn set_user_input(&mut self, value: serde_json::Value) {
		self.user_input = Some(value);
	}

	/// The last-set candidate value, if any. Validators and actions read
	/// this instead of the possibly stale bound value.
	pub fn user_input(&self) -> Option<&serde_json::Value> {
		self.user_input.as_ref()
	}

	pub fn clear_user_input(&mut self) {
		self.user_input = None;
	}

	/// Whether the user-input slot counts as empty for the required check:
	/// never set, explicit `Null`, or a blank string.
	pub fn has_empty_input(&self) -> bool {
		match &self.user_input {
			None => true,
			Some(serde_json::Value::Null) => true,
			Some(serde_json::Value::String(s)) => s.trim().is_empty(),
			Some(_) => false,
		}
	}

	/// The cached bound value: whatever was last refreshed from or
	/// committed through the binding, or the in-memory value for unbound
	/// fields.
	pub fn value(&self) -> Option<&serde_json::Value> {
		self.value.as_ref()
	}

	/// Pull the current backing value through the binding into the cache.
	/// No-op for unbound fields.
	pub fn refresh(&mut self) -> BindingResult<()> {
		if let Some(binding) = &self.binding {
			self.value = Some(binding.read()?);
		}
		Ok(())
	}

	pub fn validators(&self) -> &[Box<dyn FieldValidator>] {
		&self.validators
	}

	pub fn actions(&self) -> &[Rc<dyn FormAction>] {
		&self.actions
	}

	pub fn has_binding(&self) -> bool {
		self.binding.is_some()
	}

	pub(crate) fn binding_mut(&mut self) -> Option<&mut (dyn Binding + 'static)> {
		self.binding.as_deref_mut()
	}

	pub(crate) fn set_value(&mut self, value: serde_json::Value) {
		self.value = Some(value);
	}
}
