//! The form element tree: text, input fields, and nested sections.

use crate::binding::{Binding, BindingResult};
use crate::field::InputField;

/// A node in the form tree.
///
/// Every concrete element kind is a variant, so the engine and renderers
/// dispatch on the tag instead of inspecting runtime types.
pub enum FormElement {
	Text(Text),
	Input(InputField),
	Section(Section),
}

impl From<Text> for FormElement {
	fn from(text: Text) -> Self {
		FormElement::Text(text)
	}
}

impl From<InputField> for FormElement {
	fn from(field: InputField) -> Self {
		FormElement::Input(field)
	}
}

impl From<Section> for FormElement {
	fn from(section: Section) -> Self {
		FormElement::Section(section)
	}
}

/// A read-only display text, either static or backed by a binding.
///
/// # Examples
///
/// ```
/// use dynaform::element::Text;
///
/// let text = Text::new("Please fill in all required fields.");
/// assert_eq!(text.content().unwrap(), Some("Please fill in all required fields.".to_string()));
/// ```
pub struct Text {
	content: Option<String>,
	binding: Option<Box<dyn Binding>>,
}

impl Text {
	pub fn new(content: impl Into<String>) -> Self {
		Self {
			content: Some(content.into()),
			binding: None,
		}
	}

	/// A text whose content is read through a binding on every access.
	pub fn bound(binding: impl Binding + 'static) -> Self {
		Self {
			content: None,
			binding: Some(Box::new(binding)),
		}
	}

	/// The text to display. Bound texts read through their binding; a bound
	/// non-string value yields `None`.
	pub fn content(&self) -> BindingResult<Option<String>> {
		match &self.binding {
			Some(binding) => Ok(binding.read()?.as_str().map(str::to_string)),
			None => Ok(self.content.clone()),
		}
	}
}

/// An ordered group of form elements. Sections nest arbitrarily deep and
/// are themselves form elements.
///
/// # Examples
///
/// ```
/// use dynaform::element::Section;
/// use dynaform::field::InputField;
///
/// let section = Section::new("Contact")
/// 	.add(InputField::text("name", "Name"))
/// 	.add(Section::new("Address").add(InputField::text("city", "City")));
///
/// assert_eq!(section.fields().len(), 2);
/// assert!(section.field("city").is_some());
/// ```
pub struct Section {
	label: Option<String>,
	elements: Vec<FormElement>,
}

impl Section {
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: Some(label.into()),
			elements: vec![],
		}
	}

	pub fn unlabeled() -> Self {
		Self {
			label: None,
			elements: vec![],
		}
	}

	/// Append an element. Declaration order is the order fields are
	/// validated in and feedback is emitted in.
	pub fn add(mut self, element: impl Into<FormElement>) -> Self {
		self.elements.push(element.into());
		self
	}

	pub fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	pub fn elements(&self) -> &[FormElement] {
		&self.elements
	}

	/// All input fields in this section and its sub-sections, depth-first
	/// in declaration order.
	pub fn fields(&self) -> Vec<&InputField> {
		let mut fields = vec![];
		self.collect_fields(&mut fields);
		fields
	}

	fn collect_fields<'a>(&'a self, out: &mut Vec<&'a InputField>) {
		for element in &self.elements {
			match element {
				FormElement::Input(field) => out.push(field),
				FormElement::Section(section) => section.collect_fields(out),
				FormElement::Text(_) => {}
			}
		}
	}

	/// Mutable depth-first field collection, same order as [`fields`].
	///
	/// [`fields`]: Section::fields
	pub fn fields_mut(&mut self) -> Vec<&mut InputField> {
		let mut fields = vec![];
		self.collect_fields_mut(&mut fields);
		fields
	}

	fn collect_fields_mut<'a>(&'a mut self, out: &mut Vec<&'a mut InputField>) {
		for element in &mut self.elements {
			match element {
				FormElement::Input(field) => out.push(field),
				FormElement::Section(section) => section.collect_fields_mut(out),
				FormElement::Text(_) => {}
			}
		}
	}

	/// Find an input field by id anywhere in the subtree.
	pub fn field(&self, id: &str) -> Option<&InputField> {
		for element in &self.elements {
			match element {
				FormElement::Input(field) if field.id() == id => return Some(field),
				FormElement::Section(section) => {
					if let Some(field) = section.field(id) {
						return Some(field);
					}
				}
				_ => {}
			}
		}
		None
	}

	pub fn field_mut(&mut self, id: &str) -> Option<&mut InputField> {
		for element in &mut self.elements {
			match element {
				FormElement::Input(field) if field.id() == id => return Some(field),
				FormElement::Section(section) => {
					if let Some(field) = section.field_mut(id) {
						return Some(field);
					}
				}
				_ => {}
			}
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn nested_section() -> Section {
		Section::new("Order")
			.add(Text::new("Your order"))
			.add(InputField::text("item", "Item"))
			.add(
				Section::new("Shipping")
					.add(InputField::text("street", "Street"))
					.add(Section::unlabeled().add(InputField::text("city", "City"))),
			)
			.add(InputField::boolean("gift", "Gift wrap"))
	}

	#[test]
	fn test_fields_are_collected_depth_first_in_declaration_order() {
		let section = nested_section();

		let ids: Vec<&str> = section.fields().iter().map(|f| f.id()).collect();
		assert_eq!(ids, vec!["item", "street", "city", "gift"]);
	}

	#[test]
	fn test_field_lookup_descends_into_subsections() {
		let section = nested_section();

		assert!(section.field("city").is_some());
		assert!(section.field("item").is_some());
		assert!(section.field("missing").is_none());
	}

	#[test]
	fn test_field_mut_lookup() {
		let mut section = nested_section();

		section.field_mut("city").unwrap().set_enabled(false);
		assert!(!section.field("city").unwrap().is_enabled());
	}

	#[test]
	fn test_text_elements_are_not_fields() {
		let section = Section::unlabeled().add(Text::new("static"));

		assert!(section.fields().is_empty());
		assert_eq!(section.elements().len(), 1);
	}

	#[test]
	fn test_bound_text_reads_through_binding() {
		use crate::binding::ConstantBinding;

		let text = Text::bound(ConstantBinding::new(serde_json::json!("from binding")));
		assert_eq!(text.content().unwrap(), Some("from binding".to_string()));
	}
}
