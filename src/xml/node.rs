//! Structural mapping from JSON values onto an XML element tree.

// std
use std::fmt::Write as _;
// crates.io
use serde_json::{Map, Value};
// self
use crate::error::ConvertError;

const ATTRIBUTE_PREFIX: char = '@';
const TEXT_KEY: &str = "#text";

/// XML node produced by the JSON mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlNode {
	/// Element with attributes and ordered children.
	Element(XmlElement),
	/// Character data; escaped on output.
	Text(String),
}

/// XML element with attributes in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
	/// Encoded element name.
	pub name: String,
	/// Attribute `(name, value)` pairs.
	pub attributes: Vec<(String, String)>,
	/// Child nodes.
	pub children: Vec<XmlNode>,
}
impl XmlElement {
	/// Creates an empty element named `name` after encoding it as an XML name.
	pub fn new(name: &str) -> Result<Self, ConvertError> {
		Ok(Self { name: encode_name(name)?, ..Self::default() })
	}

	/// Builds an element named `name` whose content is the mapped JSON object.
	pub fn from_object(name: &str, object: &Map<String, Value>) -> Result<Self, ConvertError> {
		let mut element = Self::new(name)?;

		element.extend_from_object(object)?;

		Ok(element)
	}

	/// Iterates over child elements, skipping text.
	pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
		self.children.iter().filter_map(|child| match child {
			XmlNode::Element(element) => Some(element),
			XmlNode::Text(_) => None,
		})
	}

	/// Concatenated text content of the direct text children.
	pub fn text(&self) -> String {
		self.children
			.iter()
			.filter_map(|child| match child {
				XmlNode::Text(text) => Some(text.as_str()),
				XmlNode::Element(_) => None,
			})
			.collect()
	}

	fn extend_from_object(&mut self, object: &Map<String, Value>) -> Result<(), ConvertError> {
		for (key, value) in object {
			if key == TEXT_KEY {
				if let Some(text) = scalar_text(&self.name, value)? {
					self.children.push(XmlNode::Text(text));

					continue;
				}
			}
			if let Some(attribute) = key.strip_prefix(ATTRIBUTE_PREFIX) {
				if let Some(text) = scalar_text(attribute, value)? {
					self.attributes.push((encode_name(attribute)?, text));

					continue;
				}
			}

			// Structured values under `#text` or `@` keys map like any other property.
			self.push_property(key, value)?;
		}

		Ok(())
	}

	fn push_property(&mut self, key: &str, value: &Value) -> Result<(), ConvertError> {
		match value {
			Value::Array(items) =>
				for item in items {
					self.children.push(XmlNode::Element(array_item(key, item)?));
				},
			other => self.children.push(XmlNode::Element(property(key, other)?)),
		}

		Ok(())
	}
}

fn property(key: &str, value: &Value) -> Result<XmlElement, ConvertError> {
	let mut element = XmlElement::new(key)?;

	match value {
		Value::Null => (),
		Value::Object(object) => element.extend_from_object(object)?,
		Value::Array(_) => element.push_property(key, value)?,
		scalar =>
			if let Some(text) = scalar_text(key, scalar)? {
				element.children.push(XmlNode::Text(text));
			},
	}

	Ok(element)
}

// Arrays nested directly inside arrays keep the key name one level down.
fn array_item(key: &str, item: &Value) -> Result<XmlElement, ConvertError> {
	match item {
		Value::Array(_) => {
			let mut element = XmlElement::new(key)?;

			element.push_property(key, item)?;

			Ok(element)
		},
		other => property(key, other),
	}
}

// Numbers keep their literal form; `arbitrary_precision` stores the digits as written.
fn scalar_text(name: &str, value: &Value) -> Result<Option<String>, ConvertError> {
	let text = match value {
		Value::String(text) => text.clone(),
		Value::Number(number) => number.to_string(),
		Value::Bool(flag) => flag.to_string(),
		Value::Null => String::new(),
		Value::Array(_) | Value::Object(_) => return Ok(None),
	};

	check_chars(name, &text)?;

	Ok(Some(text))
}

/// Rejects characters outside the XML 1.0 `Char` production.
///
/// Such characters cannot be escaped, so a document carrying them is never well-formed.
fn check_chars(name: &str, text: &str) -> Result<(), ConvertError> {
	match text.chars().find(|&ch| !is_xml_char(ch)) {
		Some(ch) =>
			Err(ConvertError::InvalidCharacter { name: name.to_owned(), codepoint: ch.into() }),
		None => Ok(()),
	}
}

fn is_xml_char(ch: char) -> bool {
	matches!(ch,
		'\u{9}'
		| '\u{A}'
		| '\u{D}'
		| '\u{20}'..='\u{D7FF}'
		| '\u{E000}'..='\u{FFFD}'
		| '\u{10000}'..='\u{10FFFF}')
}

/// Encodes `raw` as an XML name, escaping invalid characters as `_xHHHH_`.
///
/// An underscore that would itself read as the start of an escape sequence is escaped too, so
/// the encoding stays reversible.
pub fn encode_name(raw: &str) -> Result<String, ConvertError> {
	if raw.is_empty() {
		return Err(ConvertError::InvalidName { name: raw.to_owned() });
	}

	let mut encoded = String::with_capacity(raw.len());
	let chars = raw.chars().collect::<Vec<_>>();

	for (idx, &ch) in chars.iter().enumerate() {
		let valid = if idx == 0 { is_name_start_char(ch) } else { is_name_char(ch) };

		if valid && !(ch == '_' && looks_like_escape(&chars[idx..])) {
			encoded.push(ch);
		} else {
			let _ = write!(encoded, "_x{:04X}_", ch as u32);
		}
	}

	Ok(encoded)
}

fn looks_like_escape(rest: &[char]) -> bool {
	rest.len() >= 7
		&& rest[1] == 'x'
		&& rest[2..6].iter().all(char::is_ascii_hexdigit)
		&& rest[6] == '_'
}

fn is_name_start_char(ch: char) -> bool {
	matches!(ch,
		'A'..='Z'
		| '_'
		| 'a'..='z'
		| '\u{C0}'..='\u{D6}'
		| '\u{D8}'..='\u{F6}'
		| '\u{F8}'..='\u{2FF}'
		| '\u{370}'..='\u{37D}'
		| '\u{37F}'..='\u{1FFF}'
		| '\u{200C}'..='\u{200D}'
		| '\u{2070}'..='\u{218F}'
		| '\u{2C00}'..='\u{2FEF}'
		| '\u{3001}'..='\u{D7FF}'
		| '\u{F900}'..='\u{FDCF}'
		| '\u{FDF0}'..='\u{FFFD}'
		| '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(ch: char) -> bool {
	is_name_start_char(ch)
		|| matches!(ch,
			'-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}
