//! Bindings link form elements to backing data.
//!
//! A [`Binding`] is a read/write capability over an arbitrary backing value.
//! The engine reads through bindings when refreshing a field and writes
//! through them when committing validated user input.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
	#[error("property path '{path}' not found in backing document")]
	PathNotFound { path: String },
	#[error("cannot write through '{path}': parent is not an object")]
	NotAnObject { path: String },
}

pub type BindingResult<T> = Result<T, BindingError>;

/// Read/write capability over a backing value.
///
/// `read` may fail when the backing object or property path is absent.
/// `write` may be a no-op for read-only bindings such as
/// [`ConstantBinding`].
pub trait Binding {
	fn read(&self) -> BindingResult<serde_json::Value>;
	fn write(&mut self, value: &serde_json::Value) -> BindingResult<()>;
}

/// Binds a field to a dotted property path inside a shared JSON document.
///
/// The document is shared via `Rc<RefCell<_>>` so that many bindings can
/// point into the same session-owned object. Reads fail with
/// [`BindingError::PathNotFound`] when any path segment is absent. Writes
/// insert or overwrite the final key but require every parent segment to
/// already exist as an object.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use dynaform::binding::{Binding, PropertyBinding};
///
/// let doc = Rc::new(RefCell::new(serde_json::json!({"person": {"name": "Ada"}})));
/// let mut binding = PropertyBinding::new(doc.clone(), "person.name");
///
/// assert_eq!(binding.read().unwrap(), serde_json::json!("Ada"));
///
/// binding.write(&serde_json::json!("Grace")).unwrap();
/// assert_eq!(doc.borrow()["person"]["name"], serde_json::json!("Grace"));
/// ```
pub struct PropertyBinding {
	document: Rc<RefCell<serde_json::Value>>,
	path: String,
}

impl PropertyBinding {
	pub fn new(document: Rc<RefCell<serde_json::Value>>, path: impl Into<String>) -> Self {
		Self {
			document,
			path: path.into(),
		}
	}

	pub fn path(&self) -> &str {
		&self.path
	}
}

impl Binding for PropertyBinding {
	fn read(&self) -> BindingResult<serde_json::Value> {
		let document = self.document.borrow();
		let mut current = &*document;
		for segment in self.path.split('.') {
			current = current
				.get(segment)
				.ok_or_else(|| BindingError::PathNotFound {
					path: self.path.clone(),
				})?;
		}
		Ok(current.clone())
	}

	fn write(&mut self, value: &serde_json::Value) -> BindingResult<()> {
		let mut document = self.document.borrow_mut();
		let mut current = &mut *document;
		let mut segments = self.path.split('.').peekable();
		while let Some(segment) = segments.next() {
			if segments.peek().is_none() {
				let object = current
					.as_object_mut()
					.ok_or_else(|| BindingError::NotAnObject {
						path: self.path.clone(),
					})?;
				object.insert(segment.to_string(), value.clone());
				return Ok(());
			}
			current = match current.get_mut(segment) {
				Some(next) if next.is_object() => next,
				Some(_) => {
					return Err(BindingError::NotAnObject {
						path: self.path.clone(),
					});
				}
				None => {
					return Err(BindingError::PathNotFound {
						path: self.path.clone(),
					});
				}
			};
		}
		unreachable!("property path is never empty: split always yields one segment")
	}
}

/// A read-only binding that always yields the same value.
///
/// Writes are accepted and discarded, so a constant-bound field can take
/// part in a commit without failing it.
///
/// # Examples
///
/// ```
/// use dynaform::binding::{Binding, ConstantBinding};
///
/// let mut binding = ConstantBinding::new(serde_json::json!(42));
/// assert_eq!(binding.read().unwrap(), serde_json::json!(42));
///
/// binding.write(&serde_json::json!(7)).unwrap();
/// assert_eq!(binding.read().unwrap(), serde_json::json!(42));
/// ```
pub struct ConstantBinding {
	value: serde_json::Value,
}

impl ConstantBinding {
	pub fn new(value: serde_json::Value) -> Self {
		Self { value }
	}
}

impl Binding for ConstantBinding {
	fn read(&self) -> BindingResult<serde_json::Value> {
		Ok(self.value.clone())
	}

	fn write(&mut self, _value: &serde_json::Value) -> BindingResult<()> {
		Ok(())
	}
}
