//! XML document serialization and file persistence.

// std
use std::{
	fs::{self, File},
	io::{self, Write},
};
// crates.io
use quick_xml::{
	Writer,
	events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
// self
use crate::{
	_prelude::*,
	error::ConvertError,
	xml::{XmlElement, XmlNode},
};

const INDENT_WIDTH: usize = 2;

/// XML document rooted at a single element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlDocument {
	/// Document element.
	pub root: XmlElement,
}
impl XmlDocument {
	/// Wraps a document element.
	pub fn new(root: XmlElement) -> Self {
		Self { root }
	}

	/// Serializes the document with a UTF-8 declaration and two-space indentation.
	pub fn to_bytes(&self) -> Result<Vec<u8>, ConvertError> {
		let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);

		writer
			.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
			.map_err(ConvertError::serialize)?;
		write_element(&mut writer, &self.root)?;

		let mut bytes = writer.into_inner();

		bytes.push(b'\n');

		Ok(bytes)
	}

	/// Writes the document to `path`, creating missing parent directories and replacing any
	/// existing file.
	pub fn save(&self, path: &Path) -> Result<(), ConvertError> {
		let bytes = self.to_bytes()?;

		if let Some(dir) = ensure_parent_exists(path)? {
			tracing::info!(dir = %dir.display(), "Created output directory.");
		}

		let mut tmp_path = path.to_owned();

		tmp_path.set_extension("xml.tmp");

		if let Err(source) = write_synced(&tmp_path, &bytes) {
			let _ = fs::remove_file(&tmp_path);

			return Err(ConvertError::Write { path: tmp_path, source });
		}

		fs::rename(&tmp_path, path).map_err(|source| {
			let _ = fs::remove_file(&tmp_path);

			ConvertError::Write { path: path.to_owned(), source }
		})
	}
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
	let mut file = File::create(path)?;

	file.write_all(bytes)?;
	file.sync_all()
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), ConvertError> {
	let mut start = BytesStart::new(element.name.as_str());

	for (name, value) in &element.attributes {
		start.push_attribute((name.as_str(), value.as_str()));
	}

	if element.children.is_empty() {
		return writer.write_event(Event::Empty(start)).map_err(ConvertError::serialize);
	}

	writer.write_event(Event::Start(start)).map_err(ConvertError::serialize)?;

	for child in &element.children {
		match child {
			XmlNode::Element(inner) => write_element(writer, inner)?,
			XmlNode::Text(text) => writer
				.write_event(Event::Text(BytesText::new(text)))
				.map_err(ConvertError::serialize)?,
		}
	}

	writer
		.write_event(Event::End(BytesEnd::new(element.name.as_str())))
		.map_err(ConvertError::serialize)
}

// Returns the directory that had to be created, if any.
fn ensure_parent_exists(path: &Path) -> Result<Option<&Path>, ConvertError> {
	let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
		return Ok(None);
	};

	if parent.is_dir() {
		return Ok(None);
	}

	fs::create_dir_all(parent)
		.map_err(|source| ConvertError::CreateDir { path: parent.to_owned(), source })?;

	Ok(Some(parent))
}
