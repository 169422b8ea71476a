//! The evaluation engine: one synchronous submission cycle over a form
//! model.
//!
//! A cycle is a fixed sequence: apply raw user input, settle the action
//! pipeline, validate enabled fields, and either commit every user input
//! through its binding (invoking the submit callback exactly once) or
//! reject with the aggregated feedback. No step suspends and no partial
//! commit is ever left behind.

use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::action::FormAction;
use crate::form::{FormError, FormModel, FormResult};
use crate::validation::ValidationFeedback;

/// Message used for an empty required field without a custom one.
pub const DEFAULT_REQUIRED_MESSAGE: &str = "This field is required.";

const DEFAULT_MAX_ACTION_PASSES: usize = 16;

/// Result of [`FormEngine::submit`].
#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
	/// Validation passed; all bindings were written and the callback ran.
	Committed,
	/// Validation failed; no binding was touched and the callback did not
	/// run. The model stays usable for a corrected resubmission.
	Rejected(ValidationFeedback),
}

/// Result of a full [`FormEngine::process`] cycle, carrying the set of
/// element ids whose state the action pipeline changed (for selective
/// re-render).
#[derive(Debug, PartialEq)]
pub enum CycleOutcome {
	Committed {
		changed: BTreeSet<String>,
	},
	Rejected {
		changed: BTreeSet<String>,
		feedback: ValidationFeedback,
	},
}

/// Orchestrates submission cycles against a [`FormModel`].
///
/// The engine holds no per-cycle state; one instance can serve any number
/// of models, but a single model must only ever be evaluated by one cycle
/// at a time.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use dynaform::element::Section;
/// use dynaform::engine::{CycleOutcome, FormEngine};
/// use dynaform::field::InputField;
/// use dynaform::form::FormModel;
///
/// let mut form = FormModel::new(
/// 	"Contact",
/// 	Section::unlabeled().add(InputField::text("name", "Name").required()),
/// );
/// let engine = FormEngine::new();
///
/// let mut raw = HashMap::new();
/// raw.insert("name".to_string(), serde_json::json!("Ada"));
///
/// let outcome = engine.process(&mut form, &raw, |_form| {}).unwrap();
/// assert!(matches!(outcome, CycleOutcome::Committed { .. }));
/// assert_eq!(form.field("name").unwrap().value(), Some(&serde_json::json!("Ada")));
/// ```
pub struct FormEngine {
	max_action_passes: usize,
}

impl Default for FormEngine {
	fn default() -> Self {
		Self::new()
	}
}

impl FormEngine {
	pub fn new() -> Self {
		Self {
			max_action_passes: DEFAULT_MAX_ACTION_PASSES,
		}
	}

	/// Override the iteration cap of the action fixed point. Chains deeper
	/// than the cap are reported as [`FormError::ActionLoop`].
	pub fn with_max_action_passes(mut self, max_action_passes: usize) -> Self {
		self.max_action_passes = max_action_passes;
		self
	}

	/// Store submitted raw values into the fields' user-input slots.
	///
	/// Fields missing from `raw` retain their prior user input and count as
	/// unchanged for this cycle. Keys are processed in sorted order so a bad
	/// submission always fails on the same field: an unknown key aborts with
	/// [`FormError::UnknownField`], a value contradicting the field's
	/// declared kind with [`FormError::ValueType`].
	pub fn apply_user_input(
		&self,
		form: &mut FormModel,
		raw: &HashMap<String, serde_json::Value>,
	) -> FormResult<()> {
		form.check_field_ids()?;
		let mut keys: Vec<&String> = raw.keys().collect();
		keys.sort();
		for key in keys {
			let value = &raw[key];
			let field = form
				.field_mut(key)
				.ok_or_else(|| FormError::UnknownField { field: key.clone() })?;
			if !field.kind().accepts(value) {
				return Err(FormError::ValueType {
					field: key.clone(),
					kind: field.kind(),
				});
			}
			field.set_user_input(value.clone());
		}
		Ok(())
	}

	/// Run the action pipeline to a fixed point.
	///
	/// All actions execute once per pass, in declaration order (tree order
	/// of their owning fields, then per-field order). Passes repeat until
	/// one leaves every field's enabled flag unchanged, so multi-hop toggle
	/// chains settle within a single cycle. Settlement is detected from the
	/// actual enabled state, not the actions' returned changed sets, since
	/// those may over-approximate.
	///
	/// Returns the union of all reported changed element ids.
	pub fn run_actions(&self, form: &mut FormModel) -> FormResult<BTreeSet<String>> {
		form.check_field_ids()?;
		let actions: Vec<Rc<dyn FormAction>> = form
			.fields()
			.iter()
			.flat_map(|field| field.actions().iter().cloned())
			.collect();
		if actions.is_empty() {
			return Ok(BTreeSet::new());
		}

		let mut changed = BTreeSet::new();
		for pass in 1..=self.max_action_passes {
			let before = enabled_snapshot(form);
			for action in &actions {
				changed.extend(action.execute(form)?);
			}
			let settled = enabled_snapshot(form) == before;
			tracing::debug!(pass, settled, changed = changed.len(), "action pass complete");
			if settled {
				return Ok(changed);
			}
		}
		Err(FormError::ActionLoop {
			passes: self.max_action_passes,
		})
	}

	/// Validate the model and aggregate feedback.
	///
	/// Disabled fields are skipped entirely, including their required
	/// check. For each enabled field the required check runs first, then
	/// its validators in declaration order against the user input; the
	/// form-level validators run last. Message order therefore follows
	/// validator declaration order, then field tree order, then form level.
	pub fn validate(&self, form: &FormModel) -> ValidationFeedback {
		let mut feedback = ValidationFeedback::new();
		for field in form.fields() {
			if !field.is_enabled() {
				continue;
			}
			if field.is_required() && field.has_empty_input() {
				let message = field.required_message().unwrap_or(DEFAULT_REQUIRED_MESSAGE);
				feedback.field_error(field.id(), message);
			}
			for validator in field.validators() {
				validator.validate(field, field.user_input(), &mut feedback);
			}
		}
		for validator in form.validators() {
			validator.validate(form, &mut feedback);
		}
		feedback
	}

	/// Validate and, when feedback is empty, commit and invoke the
	/// callback.
	///
	/// The commit copies every enabled field's user input into its binding;
	/// unbound fields just update their in-memory value. The callback runs
	/// exactly once after a successful commit and never on rejection. A
	/// binding failure is fatal: writes already performed are rolled back
	/// before the error is returned, so a failed submit never leaves a
	/// partial commit behind.
	pub fn submit<F>(&self, form: &mut FormModel, callback: F) -> FormResult<SubmitOutcome>
	where
		F: FnOnce(&FormModel),
	{
		form.check_field_ids()?;
		let feedback = self.validate(form);
		if !feedback.is_empty() {
			tracing::debug!(errors = feedback.len(), "submission rejected");
			return Ok(SubmitOutcome::Rejected(feedback));
		}
		self.commit(form)?;
		tracing::debug!("submission committed");
		callback(form);
		Ok(SubmitOutcome::Committed)
	}

	/// Run a full submission cycle: apply input, settle actions, validate,
	/// and commit or reject.
	///
	/// A tree containing duplicate field ids is rejected up front with
	/// [`FormError::DuplicateField`] before any input is applied.
	pub fn process<F>(
		&self,
		form: &mut FormModel,
		raw: &HashMap<String, serde_json::Value>,
		callback: F,
	) -> FormResult<CycleOutcome>
	where
		F: FnOnce(&FormModel),
	{
		self.apply_user_input(form, raw)?;
		let changed = self.run_actions(form)?;
		match self.submit(form, callback)? {
			SubmitOutcome::Committed => Ok(CycleOutcome::Committed { changed }),
			SubmitOutcome::Rejected(feedback) => Ok(CycleOutcome::Rejected { changed, feedback }),
		}
	}

	fn commit(&self, form: &mut FormModel) -> FormResult<()> {
		let ids: Vec<String> = form
			.fields()
			.iter()
			.filter(|field| field.is_enabled() && field.user_input().is_some())
			.map(|field| field.id().to_string())
			.collect();

		// Phase one: binding writes only. Prior values are recorded so a
		// failed write can be undone; the in-memory caches stay untouched
		// until every write has succeeded, so a rolled-back commit leaves
		// caches and bindings agreeing.
		let mut written: Vec<(String, Option<serde_json::Value>)> = Vec::new();
		for id in &ids {
			let mut failure = None;
			{
				let field = form
					.field_mut(id)
					.ok_or_else(|| FormError::UnknownField { field: id.clone() })?;
				let Some(input) = field.user_input().cloned() else {
					continue;
				};
				if let Some(binding) = field.binding_mut() {
					let prior = binding.read().ok();
					match binding.write(&input) {
						Ok(()) => written.push((id.clone(), prior)),
						Err(source) => failure = Some(source),
					}
				}
			}
			if let Some(source) = failure {
				self.rollback(form, &written);
				return Err(FormError::Binding {
					field: id.clone(),
					source,
				});
			}
		}

		// Phase two: all writes landed, update the in-memory values.
		for id in &ids {
			let field = form
				.field_mut(id)
				.ok_or_else(|| FormError::UnknownField { field: id.clone() })?;
			if let Some(input) = field.user_input().cloned() {
				field.set_value(input);
			}
		}
		Ok(())
	}

	/// Best-effort restore of bindings written before a commit failure, in
	/// reverse write order. A prior value of `None` means the key did not
	/// exist before; the trait offers no delete, so that write stands.
	fn rollback(&self, form: &mut FormModel, written: &[(String, Option<serde_json::Value>)]) {
		for (id, prior) in written.iter().rev() {
			let Some(prior) = prior else {
				continue;
			};
			let Some(field) = form.field_mut(id) else {
				continue;
			};
			let Some(binding) = field.binding_mut() else {
				continue;
			};
			if let Err(error) = binding.write(prior) {
				tracing::warn!(field = %id, %error, "rollback write failed");
			}
		}
	}
}

fn enabled_snapshot(form: &FormModel) -> Vec<bool> {
	form.fields().iter().map(|field| field.is_enabled()).collect()
}
