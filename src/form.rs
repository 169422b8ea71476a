//! The form model: root aggregate of the element tree.

use std::collections::HashSet;

use crate::binding::BindingError;
use crate::element::Section;
use crate::field::{FieldKind, InputField};
use crate::validation::{FnFormValidator, FormValidator, ValidationFeedback};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum FormError {
	/// A binding read or write failed. Fatal to the commit; no partial
	/// state is left behind.
	#[error("binding error on field '{field}': {source}")]
	Binding {
		field: String,
		#[source]
		source: BindingError,
	},
	/// A field id does not resolve to an element in the tree. This is a
	/// form-definition or caller bug and aborts the cycle instead of being
	/// silently ignored.
	#[error("unknown field '{field}'")]
	UnknownField { field: String },
	/// Two input fields in the tree share an id. Lookups resolve the first
	/// occurrence only, leaving the other unreachable, so the cycle aborts
	/// instead of processing a partial form.
	#[error("duplicate field id '{field}'")]
	DuplicateField { field: String },
	/// A submitted raw value contradicts the field's declared kind.
	#[error("value for field '{field}' does not match its declared kind {kind:?}")]
	ValueType { field: String, kind: FieldKind },
	/// The action pipeline kept changing field state past the iteration
	/// cap, which indicates a cyclic toggle chain.
	#[error("form actions did not settle after {passes} passes")]
	ActionLoop { passes: usize },
}

pub type FormResult<T> = Result<T, FormError>;

/// Root aggregate of a dynamic form: a label, the main section tree, and
/// the ordered form-level (cross-field) validators.
///
/// Field identity within the tree is the explicit id assigned at
/// definition time; it stays stable across submission cycles so raw input
/// always maps back to the same field instance.
///
/// # Examples
///
/// ```
/// use dynaform::element::Section;
/// use dynaform::field::InputField;
/// use dynaform::form::FormModel;
///
/// let form = FormModel::new(
/// 	"Registration",
/// 	Section::unlabeled()
/// 		.add(InputField::text("name", "Name").required())
/// 		.add(InputField::integer("age", "Age")),
/// );
///
/// assert_eq!(form.label(), "Registration");
/// assert_eq!(form.field_ids(), vec!["name", "age"]);
/// ```
pub struct FormModel {
	label: String,
	main_section: Section,
	validators: Vec<Box<dyn FormValidator>>,
}

impl FormModel {
	pub fn new(label: impl Into<String>, main_section: Section) -> Self {
		Self {
			label: label.into(),
			main_section,
			validators: vec![],
		}
	}

	/// Append a form-level validator. Form-level validators run after all
	/// field-level validation, in the order they were added.
	pub fn validator(mut self, validator: impl FormValidator + 'static) -> Self {
		self.validators.push(Box::new(validator));
		self
	}

	/// Append a form-level validation rule given as a closure.
	///
	/// # Examples
	///
	/// ```
	/// use dynaform::element::Section;
	/// use dynaform::field::InputField;
	/// use dynaform::form::FormModel;
	///
	/// let form = FormModel::new(
	/// 	"Range",
	/// 	Section::unlabeled()
	/// 		.add(InputField::integer("min", "Minimum"))
	/// 		.add(InputField::integer("max", "Maximum")),
	/// )
	/// .validator_fn(|form, feedback| {
	/// 	let min = form.field("min").and_then(|f| f.user_input()).and_then(|v| v.as_i64());
	/// 	let max = form.field("max").and_then(|f| f.user_input()).and_then(|v| v.as_i64());
	/// 	if let (Some(min), Some(max)) = (min, max)
	/// 		&& max < min
	/// 	{
	/// 		feedback.form_error("Maximum must not be below minimum");
	/// 	}
	/// });
	/// ```
	pub fn validator_fn<F>(mut self, validator: F) -> Self
	where
		F: Fn(&FormModel, &mut ValidationFeedback) + 'static,
	{
		self.validators.push(Box::new(FnFormValidator(validator)));
		self
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn main_section(&self) -> &Section {
		&self.main_section
	}

	pub fn main_section_mut(&mut self) -> &mut Section {
		&mut self.main_section
	}

	/// Find an input field by its stable id.
	pub fn field(&self, id: &str) -> Option<&InputField> {
		self.main_section.field(id)
	}

	pub fn field_mut(&mut self, id: &str) -> Option<&mut InputField> {
		self.main_section.field_mut(id)
	}

	/// All input fields, depth-first in declaration order.
	pub fn fields(&self) -> Vec<&InputField> {
		self.main_section.fields()
	}

	pub fn fields_mut(&mut self) -> Vec<&mut InputField> {
		self.main_section.fields_mut()
	}

	/// Ids of all input fields, in tree order.
	pub fn field_ids(&self) -> Vec<String> {
		self.fields().iter().map(|f| f.id().to_string()).collect()
	}

	/// Verify that every input field id in the tree is unique.
	///
	/// Lookups resolve the first occurrence of an id, so a duplicate leaves
	/// its second field unreachable: its input is never applied and its
	/// required check never runs. The engine calls this before touching the
	/// model and surfaces [`FormError::DuplicateField`] for the offender.
	pub fn check_field_ids(&self) -> FormResult<()> {
		let mut seen = HashSet::new();
		for field in self.fields() {
			if !seen.insert(field.id()) {
				return Err(FormError::DuplicateField {
					field: field.id().to_string(),
				});
			}
		}
		Ok(())
	}

	pub fn validators(&self) -> &[Box<dyn FormValidator>] {
		&self.validators
	}

	/// Refresh every bound field's cached value from its binding.
	pub fn refresh(&mut self) -> FormResult<()> {
		for field in self.main_section.fields_mut() {
			field.refresh().map_err(|source| FormError::Binding {
				field: field.id().to_string(),
				source,
			})?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::validation::ValidationFeedback;

	#[test]
	fn test_field_lookup_by_id() {
		let form = FormModel::new(
			"Test",
			Section::new("Main")
				.add(InputField::text("a", "A"))
				.add(Section::new("Sub").add(InputField::text("b", "B"))),
		);

		assert!(form.field("a").is_some());
		assert!(form.field("b").is_some());
		assert!(form.field("c").is_none());
	}

	#[test]
	fn test_check_field_ids_accepts_unique_tree() {
		let form = FormModel::new(
			"Test",
			Section::new("Main")
				.add(InputField::text("a", "A"))
				.add(Section::new("Sub").add(InputField::text("b", "B"))),
		);

		assert!(form.check_field_ids().is_ok());
	}

	#[test]
	fn test_check_field_ids_reports_duplicate() {
		let form = FormModel::new(
			"Test",
			Section::unlabeled()
				.add(InputField::text("dup", "First"))
				.add(Section::new("Sub").add(InputField::text("dup", "Second"))),
		);

		assert_eq!(
			form.check_field_ids(),
			Err(FormError::DuplicateField {
				field: "dup".to_string()
			})
		);
	}

	#[test]
	fn test_closure_form_validator() {
		let form = FormModel::new("Test", Section::unlabeled().add(InputField::text("a", "A")))
			.validator_fn(|_form, feedback| {
				feedback.form_error("always fails");
			});

		let mut feedback = ValidationFeedback::new();
		for validator in form.validators() {
			validator.validate(&form, &mut feedback);
		}
		assert_eq!(feedback.form_messages(), vec!["always fails"]);
	}

	#[test]
	fn test_refresh_pulls_bound_values() {
		use crate::binding::ConstantBinding;

		let mut form = FormModel::new(
			"Test",
			Section::unlabeled().add(
				InputField::text("greeting", "Greeting")
					.with_binding(ConstantBinding::new(serde_json::json!("hi"))),
			),
		);

		form.refresh().unwrap();
		assert_eq!(
			form.field("greeting").unwrap().value(),
			Some(&serde_json::json!("hi"))
		);
	}

	#[test]
	fn test_refresh_surfaces_binding_failure() {
		use std::cell::RefCell;
		use std::rc::Rc;

		use crate::binding::PropertyBinding;

		let doc = Rc::new(RefCell::new(serde_json::json!({})));
		let mut form = FormModel::new(
			"Test",
			Section::unlabeled().add(
				InputField::text("name", "Name").with_binding(PropertyBinding::new(doc, "missing.path")),
			),
		);

		assert!(matches!(
			form.refresh(),
			Err(FormError::Binding { field, .. }) if field == "name"
		));
	}
}
