//! JSON array to XML conversion.
//!
//! A job postings payload is a bare JSON array. The converter wraps it under
//! [`XmlLayout::item_element`] inside an object and maps that object under
//! [`XmlLayout::document_element`], so `[{"a":1},{"a":2}]` becomes:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <Roots>
//!   <Root>
//!     <a>1</a>
//!   </Root>
//!   <Root>
//!     <a>2</a>
//!   </Root>
//! </Roots>
//! ```
//!
//! Object keys become element names, arrays become repeated siblings named after their key,
//! scalars become text, and `null` becomes an empty element. Keys prefixed with `@` map to
//! attributes and `#text` maps to element text.

mod document;
mod node;

pub use document::*;
pub use node::*;

// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, error::ConvertError};

/// Element names wrapped around the converted array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlLayout {
	/// Name of the document element.
	pub document_element: String,
	/// Name of the element emitted once per array entry.
	pub item_element: String,
}
impl Default for XmlLayout {
	fn default() -> Self {
		Self { document_element: "Roots".into(), item_element: "Root".into() }
	}
}

/// Parses `json` as an array of arbitrary values.
pub fn parse_json_array(json: &str) -> Result<Vec<Value>, ConvertError> {
	serde_json::from_str(json).map_err(|source| ConvertError::Parse { source })
}

/// Maps a parsed array onto an XML document shaped by `layout`.
pub fn array_to_document(
	items: Vec<Value>,
	layout: &XmlLayout,
) -> Result<XmlDocument, ConvertError> {
	let mut wrapper = Map::with_capacity(1);

	wrapper.insert(layout.item_element.clone(), Value::Array(items));

	let root = XmlElement::from_object(&layout.document_element, &wrapper)?;

	Ok(XmlDocument::new(root))
}

/// Converts a JSON array payload into an XML document.
pub fn convert(json: &str, layout: &XmlLayout) -> Result<XmlDocument, ConvertError> {
	array_to_document(parse_json_array(json)?, layout)
}

/// Converts `json` and writes the document to `path`.
///
/// Nothing touches the filesystem unless conversion succeeded.
pub fn export(json: &str, path: &Path, layout: &XmlLayout) -> Result<XmlDocument, ConvertError> {
	let document = convert(json, layout)?;

	document.save(path)?;

	tracing::debug!(
		path = %path.display(),
		items = document.root.children.len(),
		"XML document written."
	);

	Ok(document)
}
