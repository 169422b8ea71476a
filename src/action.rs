//! Reactive rules that re-derive field state from trigger-field values.

use std::collections::BTreeSet;

use crate::form::{FormError, FormModel, FormResult};

/// A reactive rule: declares which fields trigger it and mutates a set of
/// target fields when executed.
///
/// Actions reference fields by their stable id, never by holding the field
/// itself; the model tree stays the single owner. `execute` returns the ids
/// of the elements whose state it changed, so a renderer can recompute only
/// the affected subtree. Over-approximating the changed set is fine: a
/// re-render of an unchanged field is a no-op.
pub trait FormAction {
	/// The ids of the fields whose user input this action depends on.
	///
	/// This is declarative metadata for renderers and tooling (dependency
	/// graphs, client-side event wiring). [`FormEngine`] does not consult
	/// it: every action re-executes on every pass until the field state
	/// settles, so an action stays correct even if its declared triggers
	/// are incomplete.
	///
	/// [`FormEngine`]: crate::engine::FormEngine
	fn trigger_fields(&self) -> Vec<String>;

	/// Apply the rule against the current model state.
	///
	/// Referencing a field id that is not present in the tree is a
	/// form-definition bug and aborts the cycle with
	/// [`FormError::UnknownField`].
	fn execute(&self, form: &mut FormModel) -> FormResult<BTreeSet<String>>;
}

/// Enables or disables target fields depending on the value of a trigger
/// field.
///
/// When the trigger field's user input equals the configured value, every
/// target is enabled; otherwise every target is disabled. The returned
/// changed set always contains all targets, whether or not their flag
/// actually flipped.
///
/// # Examples
///
/// ```
/// use dynaform::action::ToggleEnabledAction;
/// use dynaform::element::Section;
/// use dynaform::field::InputField;
/// use dynaform::form::FormModel;
/// use dynaform::FormAction;
///
/// let mut form = FormModel::new(
/// 	"Order",
/// 	Section::unlabeled()
/// 		.add(InputField::boolean("gift", "Gift wrap"))
/// 		.add(InputField::text("message", "Gift message")),
/// );
/// let action = ToggleEnabledAction::new("gift", serde_json::json!(true), ["message"]);
///
/// form.field_mut("gift").unwrap().set_user_input(serde_json::json!(true));
/// action.execute(&mut form).unwrap();
/// assert!(form.field("message").unwrap().is_enabled());
///
/// form.field_mut("gift").unwrap().set_user_input(serde_json::json!(false));
/// action.execute(&mut form).unwrap();
/// assert!(!form.field("message").unwrap().is_enabled());
/// ```
pub struct ToggleEnabledAction {
	trigger: String,
	enabled_value: serde_json::Value,
	targets: Vec<String>,
}

impl ToggleEnabledAction {
	pub fn new<I, S>(trigger: impl Into<String>, enabled_value: serde_json::Value, targets: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			trigger: trigger.into(),
			enabled_value,
			targets: targets.into_iter().map(Into::into).collect(),
		}
	}
}

impl FormAction for ToggleEnabledAction {
	fn trigger_fields(&self) -> Vec<String> {
		vec![self.trigger.clone()]
	}

	fn execute(&self, form: &mut FormModel) -> FormResult<BTreeSet<String>> {
		let trigger = form
			.field(&self.trigger)
			.ok_or_else(|| FormError::UnknownField {
				field: self.trigger.clone(),
			})?;
		let enable = trigger.user_input() == Some(&self.enabled_value);

		let mut changed = BTreeSet::new();
		for id in &self.targets {
			let target = form.field_mut(id).ok_or_else(|| FormError::UnknownField {
				field: id.clone(),
			})?;
			target.set_enabled(enable);
			changed.insert(id.clone());
		}
		Ok(changed)
	}
}
