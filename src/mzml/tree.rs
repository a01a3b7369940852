//! In-memory element tree for mzML documents
//!
//! The extraction pipeline works on an already-parsed attribute/child tree
//! rather than on the raw event stream: every spectrum is visited as a whole
//! (direct cvParams, then scan, precursor, activation and binary arrays), and
//! the tree gives cheap random access to those sections.
//!
//! The tree is built with a quick-xml pull loop. Element names are stored
//! without namespace prefix, attribute values are unescaped, and text content
//! (the base64 payload of `<binary>`) is kept verbatim.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::error::MzMLError;

/// Input buffer size used when opening mzML files from disk
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

/// A single XML element with its attributes, children and text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MzMLNode {
    /// Local element name (e.g. `spectrum`, `cvParam`)
    pub name: String,

    /// Attributes in document order
    pub attributes: Vec<(String, String)>,

    /// Child elements in document order
    pub children: Vec<MzMLNode>,

    /// Concatenated text content
    pub text: String,
}

impl MzMLNode {
    /// Create an empty element with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder-style child setter
    pub fn with_child(mut self, child: MzMLNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style text setter
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Look up an attribute value by name
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&MzMLNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MzMLNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a path of element names, taking the first match at each level
    ///
    /// `spectrum.descend(&["scanList", "scan"])` returns the first `scan`
    /// of the first `scanList`.
    pub fn descend(&self, path: &[&str]) -> Option<&MzMLNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    fn from_start(start: &BytesStart, decoder: Decoder) -> Result<Self, MzMLError> {
        let name = std::str::from_utf8(start.local_name().as_ref())?.to_string();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.local_name().as_ref())?.to_string();
            let value = attr.decode_and_unescape_value(decoder)?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    /// Parse a complete element tree from a buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, MzMLError> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);

        let mut stack: Vec<MzMLNode> = Vec::new();
        let mut root: Option<MzMLNode> = None;
        let mut buf = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    stack.push(Self::from_start(e, xml_reader.decoder())?);
                }
                Event::Empty(ref e) => {
                    let node = Self::from_start(e, xml_reader.decoder())?;
                    attach(&mut stack, &mut root, node)?;
                }
                Event::End(_) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| MzMLError::structure("unbalanced closing tag"))?;
                    attach(&mut stack, &mut root, node)?;
                }
                Event::Text(ref t) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&t.unescape()?);
                    }
                }
                Event::CData(ref c) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(std::str::from_utf8(c)?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(MzMLError::structure(format!(
                "document ended inside <{}>",
                open.name
            )));
        }

        root.ok_or_else(|| MzMLError::structure("document has no root element"))
    }

    /// Parse an element tree from a string
    pub fn parse_str(xml: &str) -> Result<Self, MzMLError> {
        Self::from_reader(xml.as_bytes())
    }
}

fn attach(
    stack: &mut [MzMLNode],
    root: &mut Option<MzMLNode>,
    node: MzMLNode,
) -> Result<(), MzMLError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(MzMLError::structure("multiple root elements")),
    }
    Ok(())
}

/// A parsed mzML document
///
/// Accepts both the `indexedmzML` wrapper and a bare `mzML` root.
#[derive(Debug, Clone)]
pub struct MzMLDocument {
    root: MzMLNode,
    source_name: Option<String>,
}

impl MzMLDocument {
    /// Wrap an already-built element tree
    pub fn new(root: MzMLNode) -> Self {
        Self {
            root,
            source_name: None,
        }
    }

    /// Read and parse an mzML file from disk
    ///
    /// The file stem is remembered as a fallback document identifier.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MzMLError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_INPUT_BUFFER_SIZE, file);
        let mut document = Self::from_reader(reader)?;
        document.source_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
        Ok(document)
    }

    /// Parse an mzML document from a buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, MzMLError> {
        Ok(Self::new(MzMLNode::from_reader(reader)?))
    }

    /// Parse an mzML document from a string
    pub fn parse_str(xml: &str) -> Result<Self, MzMLError> {
        Self::from_reader(xml.as_bytes())
    }

    /// Set the fallback identifier used when the document carries none
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Fallback identifier (usually the input file stem)
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// The root element as parsed
    pub fn root(&self) -> &MzMLNode {
        &self.root
    }

    /// The `mzML` element
    pub fn mzml(&self) -> Result<&MzMLNode, MzMLError> {
        match self.root.name.as_str() {
            "mzML" => Ok(&self.root),
            "indexedmzML" => self
                .root
                .child("mzML")
                .ok_or_else(|| MzMLError::structure("indexedmzML without an mzML element")),
            other => Err(MzMLError::structure(format!(
                "unexpected root element <{other}>"
            ))),
        }
    }

    /// The `run` element
    pub fn run(&self) -> Result<&MzMLNode, MzMLError> {
        self.mzml()?
            .child("run")
            .ok_or_else(|| MzMLError::structure("mzML without a run element"))
    }
}
