//! Shipped validation rules.
//!
//! Each rule is a small struct holding its own parameters, constructed at
//! form-definition time. Rules silently accept null or blank input:
//! mandatory-ness is the orthogonal required check performed by the engine.

use regex::Regex;

use crate::field::InputField;
use crate::form::FormModel;
use crate::validation::{FieldValidator, FormValidator, ValidationFeedback};

/// Checks that a numeric value lies within the configured thresholds.
///
/// Either threshold may be `None`, in which case that side is not checked.
/// Null values are silently accepted.
///
/// # Examples
///
/// ```
/// use dynaform::field::InputField;
/// use dynaform::validation::{FieldValidator, ValidationFeedback};
/// use dynaform::validators::NumberRangeValidator;
///
/// let field = InputField::integer("age", "Age");
/// let validator = NumberRangeValidator::new(Some(0.0), Some(150.0));
///
/// let mut feedback = ValidationFeedback::new();
/// validator.validate(&field, Some(&serde_json::json!(-1)), &mut feedback);
/// assert_eq!(feedback.len(), 1);
///
/// let mut feedback = ValidationFeedback::new();
/// validator.validate(&field, Some(&serde_json::json!(35)), &mut feedback);
/// assert!(feedback.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct NumberRangeValidator {
	min: Option<f64>,
	max: Option<f64>,
	message: Option<String>,
}

impl NumberRangeValidator {
	pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
		Self {
			min,
			max,
			message: None,
		}
	}

	/// Sets a custom error message used for both threshold failures.
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}

impl FieldValidator for NumberRangeValidator {
	fn validate(
		&self,
		field: &InputField,
		value: Option<&serde_json::Value>,
		feedback: &mut ValidationFeedback,
	) {
		let Some(number) = value.and_then(serde_json::Value::as_f64) else {
			return;
		};
		if let Some(min) = self.min
			&& number < min
		{
			let message = self.message.clone().unwrap_or_else(|| {
				format!(
					"The value for '{}' is below the minimum of {}",
					field.label(),
					min
				)
			});
			feedback.field_error(field.id(), message);
		}
		if let Some(max) = self.max
			&& number > max
		{
			let message = self.message.clone().unwrap_or_else(|| {
				format!(
					"The value for '{}' is above the maximum of {}",
					field.label(),
					max
				)
			});
			feedback.field_error(field.id(), message);
		}
	}
}

/// Checks that a string value's character count lies within the configured
/// bounds. Null and blank input are left to the required check.
#[derive(Debug, Clone)]
pub struct StringLengthValidator {
	min: Option<usize>,
	max: Option<usize>,
	message: Option<String>,
}

impl StringLengthValidator {
	pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
		Self {
			min,
			max,
			message: None,
		}
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}

impl FieldValidator for StringLengthValidator {
	fn validate(
		&self,
		field: &InputField,
		value: Option<&serde_json::Value>,
		feedback: &mut ValidationFeedback,
	) {
		let Some(text) = value.and_then(serde_json::Value::as_str) else {
			return;
		};
		if text.trim().is_empty() {
			return;
		}
		let length = text.chars().count();
		if let Some(min) = self.min
			&& length < min
		{
			let message = self.message.clone().unwrap_or_else(|| {
				format!(
					"The value for '{}' must be at least {} characters long",
					field.label(),
					min
				)
			});
			feedback.field_error(field.id(), message);
		}
		if let Some(max) = self.max
			&& length > max
		{
			let message = self.message.clone().unwrap_or_else(|| {
				format!(
					"The value for '{}' must be at most {} characters long",
					field.label(),
					max
				)
			});
			feedback.field_error(field.id(), message);
		}
	}
}

/// Checks that a string value matches a regex pattern.
///
/// The pattern is compiled once at construction; an invalid pattern is a
/// form-definition error and surfaces there.
///
/// # Examples
///
/// ```
/// use dynaform::field::InputField;
/// use dynaform::validation::{FieldValidator, ValidationFeedback};
/// use dynaform::validators::PatternValidator;
///
/// let field = InputField::text("code", "Code");
/// let validator = PatternValidator::new("^[A-Z]{3}$").unwrap();
///
/// let mut feedback = ValidationFeedback::new();
/// validator.validate(&field, Some(&serde_json::json!("ABC")), &mut feedback);
/// assert!(feedback.is_empty());
///
/// validator.validate(&field, Some(&serde_json::json!("abc")), &mut feedback);
/// assert_eq!(feedback.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PatternValidator {
	pattern: Regex,
	message: Option<String>,
}

impl PatternValidator {
	pub fn new(pattern: &str) -> Result<Self, regex::Error> {
		Ok(Self {
			pattern: Regex::new(pattern)?,
			message: None,
		})
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}

impl FieldValidator for PatternValidator {
	fn validate(
		&self,
		field: &InputField,
		value: Option<&serde_json::Value>,
		feedback: &mut ValidationFeedback,
	) {
		let Some(text) = value.and_then(serde_json::Value::as_str) else {
			return;
		};
		if text.trim().is_empty() {
			return;
		}
		if !self.pattern.is_match(text) {
			let message = self.message.clone().unwrap_or_else(|| {
				format!(
					"The value for '{}' does not match the expected format",
					field.label()
				)
			});
			feedback.field_error(field.id(), message);
		}
	}
}

/// Form-level rule checking that all named fields hold equal user input,
/// commonly used for password confirmation.
///
/// The error is anchored to the optional target field, or form-scoped when
/// no target is given. Fields missing from the tree count as empty input.
pub struct FieldsEqualValidator {
	fields: Vec<String>,
	message: String,
	target: Option<String>,
}

impl FieldsEqualValidator {
	pub fn new<I, S>(fields: I, message: impl Into<String>) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			fields: fields.into_iter().map(Into::into).collect(),
			message: message.into(),
			target: None,
		}
	}

	/// Anchor the error message to a specific field instead of the form.
	pub fn with_target(mut self, target: impl Into<String>) -> Self {
		self.target = Some(target.into());
		self
	}
}

impl FormValidator for FieldsEqualValidator {
	fn validate(&self, form: &FormModel, feedback: &mut ValidationFeedback) {
		let inputs: Vec<Option<&serde_json::Value>> = self
			.fields
			.iter()
			.map(|id| form.field(id).and_then(InputField::user_input))
			.collect();
		let all_equal = inputs.windows(2).all(|pair| pair[0] == pair[1]);
		if !all_equal {
			match &self.target {
				Some(target) => feedback.field_error(target, &self.message),
				None => feedback.form_error(&self.message),
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn age_field() -> InputField {
		InputField::integer("age", "Age")
	}

	// =========================================================================
	// NumberRangeValidator tests
	// =========================================================================

	#[rstest]
	#[case(serde_json::json!(-1), 1, "below the minimum")]
	#[case(serde_json::json!(11), 1, "above the maximum")]
	fn test_number_range_out_of_bounds(
		#[case] value: serde_json::Value,
		#[case] expected_errors: usize,
		#[case] fragment: &str,
	) {
		// Arrange
		let validator = NumberRangeValidator::new(Some(0.0), Some(10.0));
		let field = age_field();
		let mut feedback = ValidationFeedback::new();

		// Act
		validator.validate(&field, Some(&value), &mut feedback);

		// Assert
		let messages = feedback.field_messages("age");
		assert_eq!(messages.len(), expected_errors);
		assert!(messages[0].contains(fragment), "got: {}", messages[0]);
	}

	#[rstest]
	#[case(serde_json::json!(0))]
	#[case(serde_json::json!(5))]
	#[case(serde_json::json!(10))]
	#[case(serde_json::json!(7.5))]
	fn test_number_range_within_bounds(#[case] value: serde_json::Value) {
		let validator = NumberRangeValidator::new(Some(0.0), Some(10.0));
		let mut feedback = ValidationFeedback::new();

		validator.validate(&age_field(), Some(&value), &mut feedback);

		assert!(feedback.is_empty());
	}

	#[rstest]
	fn test_number_range_accepts_null() {
		let validator = NumberRangeValidator::new(Some(0.0), Some(10.0));
		let mut feedback = ValidationFeedback::new();

		validator.validate(&age_field(), None, &mut feedback);
		validator.validate(&age_field(), Some(&serde_json::Value::Null), &mut feedback);

		assert!(feedback.is_empty());
	}

	#[rstest]
	fn test_number_range_open_thresholds() {
		let at_least = NumberRangeValidator::new(Some(0.0), None);
		let at_most = NumberRangeValidator::new(None, Some(10.0));
		let mut feedback = ValidationFeedback::new();

		at_least.validate(&age_field(), Some(&serde_json::json!(1_000_000)), &mut feedback);
		at_most.validate(&age_field(), Some(&serde_json::json!(-1_000_000)), &mut feedback);

		assert!(feedback.is_empty());
	}

	#[rstest]
	fn test_number_range_custom_message() {
		let validator = NumberRangeValidator::new(Some(18.0), None).with_message("Adults only");
		let mut feedback = ValidationFeedback::new();

		validator.validate(&age_field(), Some(&serde_json::json!(12)), &mut feedback);

		assert_eq!(feedback.field_messages("age"), vec!["Adults only"]);
	}

	#[rstest]
	fn test_number_range_message_names_the_label() {
		let validator = NumberRangeValidator::new(Some(0.0), None);
		let mut feedback = ValidationFeedback::new();

		validator.validate(&age_field(), Some(&serde_json::json!(-1)), &mut feedback);

		assert!(feedback.field_messages("age")[0].contains("'Age'"));
	}

	// =========================================================================
	// StringLengthValidator tests
	// =========================================================================

	#[rstest]
	#[case("ab", 1)]
	#[case("abc", 0)]
	#[case("abcdefghij", 0)]
	#[case("abcdefghijk", 1)]
	fn test_string_length_bounds(#[case] value: &str, #[case] expected_errors: usize) {
		let validator = StringLengthValidator::new(Some(3), Some(10));
		let field = InputField::text("name", "Name");
		let mut feedback = ValidationFeedback::new();

		validator.validate(&field, Some(&serde_json::json!(value)), &mut feedback);

		assert_eq!(feedback.len(), expected_errors);
	}

	#[rstest]
	fn test_string_length_ignores_blank_and_null() {
		let validator = StringLengthValidator::new(Some(3), None);
		let field = InputField::text("name", "Name");
		let mut feedback = ValidationFeedback::new();

		validator.validate(&field, None, &mut feedback);
		validator.validate(&field, Some(&serde_json::Value::Null), &mut feedback);
		validator.validate(&field, Some(&serde_json::json!("  ")), &mut feedback);

		assert!(feedback.is_empty());
	}

	#[rstest]
	fn test_string_length_counts_chars_not_bytes() {
		let validator = StringLengthValidator::new(None, Some(3));
		let field = InputField::text("name", "Name");
		let mut feedback = ValidationFeedback::new();

		validator.validate(&field, Some(&serde_json::json!("äöü")), &mut feedback);

		assert!(feedback.is_empty());
	}

	// =========================================================================
	// PatternValidator tests
	// =========================================================================

	#[rstest]
	#[case("ABC", 0)]
	#[case("abc", 1)]
	#[case("ABCD", 1)]
	fn test_pattern_match(#[case] value: &str, #[case] expected_errors: usize) {
		let validator = PatternValidator::new("^[A-Z]{3}$").unwrap();
		let field = InputField::text("code", "Code");
		let mut feedback = ValidationFeedback::new();

		validator.validate(&field, Some(&serde_json::json!(value)), &mut feedback);

		assert_eq!(feedback.len(), expected_errors);
	}

	#[rstest]
	fn test_pattern_rejects_invalid_regex_at_construction() {
		assert!(PatternValidator::new("([unclosed").is_err());
	}

	// =========================================================================
	// FieldsEqualValidator tests
	// =========================================================================

	fn password_form() -> FormModel {
		use crate::element::Section;

		FormModel::new(
			"Account",
			Section::unlabeled()
				.add(InputField::text("password", "Password"))
				.add(InputField::text("confirm", "Confirm password")),
		)
	}

	#[rstest]
	fn test_fields_equal_matching() {
		let mut form = password_form();
		form.field_mut("password")
			.unwrap()
			.set_user_input(serde_json::json!("secret"));
		form.field_mut("confirm")
			.unwrap()
			.set_user_input(serde_json::json!("secret"));

		let validator =
			FieldsEqualValidator::new(["password", "confirm"], "Passwords do not match");
		let mut feedback = ValidationFeedback::new();
		validator.validate(&form, &mut feedback);

		assert!(feedback.is_empty());
	}

	#[rstest]
	fn test_fields_equal_mismatch_is_form_scoped() {
		let mut form = password_form();
		form.field_mut("password")
			.unwrap()
			.set_user_input(serde_json::json!("secret"));
		form.field_mut("confirm")
			.unwrap()
			.set_user_input(serde_json::json!("different"));

		let validator =
			FieldsEqualValidator::new(["password", "confirm"], "Passwords do not match");
		let mut feedback = ValidationFeedback::new();
		validator.validate(&form, &mut feedback);

		assert_eq!(feedback.form_messages(), vec!["Passwords do not match"]);
	}

	#[rstest]
	fn test_fields_equal_mismatch_with_target_field() {
		let mut form = password_form();
		form.field_mut("password")
			.unwrap()
			.set_user_input(serde_json::json!("secret"));

		let validator = FieldsEqualValidator::new(["password", "confirm"], "Passwords do not match")
			.with_target("confirm");
		let mut feedback = ValidationFeedback::new();
		validator.validate(&form, &mut feedback);

		assert_eq!(
			feedback.field_messages("confirm"),
			vec!["Passwords do not match"]
		);
	}

	// Property: values inside the configured range never produce feedback.
	mod properties {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn number_range_accepts_in_range_values(value in 0.0f64..=10.0) {
				let validator = NumberRangeValidator::new(Some(0.0), Some(10.0));
				let field = InputField::float("score", "Score");
				let mut feedback = ValidationFeedback::new();

				validator.validate(&field, Some(&serde_json::json!(value)), &mut feedback);

				prop_assert!(feedback.is_empty());
			}

			#[test]
			fn number_range_is_idempotent(value in proptest::num::f64::NORMAL) {
				let validator = NumberRangeValidator::new(Some(0.0), Some(10.0));
				let field = InputField::float("score", "Score");

				let mut first = ValidationFeedback::new();
				validator.validate(&field, Some(&serde_json::json!(value)), &mut first);
				let mut second = ValidationFeedback::new();
				validator.validate(&field, Some(&serde_json::json!(value)), &mut second);

				prop_assert_eq!(first, second);
			}
		}
	}
}
