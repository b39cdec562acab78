use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use saphyr_parser::{Event, Marker, Parser, ScalarStyle, ScanError};
use tracing::{debug, trace};

use super::node::{Mapping, Node, NodeRef};
use super::scalar::resolve_plain;
use crate::config::LoaderConfig;
use crate::error::{LoadError, Result};
use crate::utils::file_io::read_file_string;

/// Parses configuration documents into resolved node trees.
///
/// Aliases are dereferenced by sharing the anchored `Rc`, and merge keys are
/// applied as each mapping closes, so the returned tree needs no further
/// resolution.
#[derive(Debug, Clone, Default)]
pub struct DocumentLoader {
	config: LoaderConfig,
}

impl DocumentLoader {
	pub fn new(config: LoaderConfig) -> Self {
		DocumentLoader { config }
	}

	pub fn config(&self) -> &LoaderConfig {
		&self.config
	}

	pub fn load_str(&self, text: &str) -> std::result::Result<NodeRef, LoadError> {
		let mut composer = Composer::new(&self.config, text);
		for item in Parser::new_from_str(text) {
			let (event, span) = item.map_err(|err| scan_error(text, &err))?;
			composer.handle(event, &span.start)?;
		}
		let root = composer.finish();
		debug!(anchors = composer.anchors.len(), "document resolved");
		Ok(root)
	}

	pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<NodeRef> {
		let path = path.as_ref();
		let text = read_file_string(path)?;
		debug!(path = %path.display(), bytes = text.len(), "loading document");
		Ok(self.load_str(&text)?)
	}
}

/// Loads `text` with the default loader settings
pub fn load_str(text: &str) -> std::result::Result<NodeRef, LoadError> {
	DocumentLoader::default().load_str(text)
}

#[derive(Debug, Clone, Copy)]
struct Location {
	line: usize,
	column: usize,
}

impl Location {
	fn of(marker: &Marker) -> Self {
		Location {
			line: marker.line(),
			column: marker.col() + 1,
		}
	}

	fn error(self, message: impl Into<String>) -> LoadError {
		LoadError::parse(self.line, self.column, message)
	}
}

enum PendingKey {
	Key(String, Location),
	Merge(Location),
}

enum Frame {
	Seq {
		anchor: usize,
		items: Vec<NodeRef>,
	},
	Map {
		anchor: usize,
		pending: Option<PendingKey>,
		entries: Mapping,
		merges: Vec<NodeRef>,
	},
}

struct Composer<'a> {
	config: &'a LoaderConfig,
	source: &'a str,
	anchors: HashMap<usize, NodeRef>,
	stack: Vec<Frame>,
	root: Option<NodeRef>,
	documents: usize,
}

impl<'a> Composer<'a> {
	fn new(config: &'a LoaderConfig, source: &'a str) -> Self {
		Composer {
			config,
			source,
			anchors: HashMap::new(),
			stack: Vec::new(),
			root: None,
			documents: 0,
		}
	}

	fn finish(&mut self) -> NodeRef {
		self.root.take().unwrap_or_else(|| Rc::new(Node::Null))
	}

	fn handle(&mut self, event: Event<'_>, marker: &Marker) -> std::result::Result<(), LoadError> {
		let here = Location::of(marker);
		match event {
			Event::DocumentStart(..) => {
				self.documents += 1;
				if self.documents > 1 {
					return Err(here.error("expected a single document, found another"));
				}
			}
			Event::Scalar(value, style, anchor, tag) => {
				let forced_str = tag.as_ref().map_or(false, |t| t.suffix == "str");
				let plain = style == ScalarStyle::Plain && !forced_str;
				let node = if plain {
					resolve_plain(&value)
				} else {
					Node::Str(value.to_string())
				};
				let is_merge = plain && &*value == self.config.merge_key.as_str();
				// float keys keep their written form
				let raw_key = match node {
					Node::Float(_) => Some(value.to_string()),
					_ => None,
				};
				let node = Rc::new(node);
				self.register(anchor, &node);
				self.accept(node, is_merge, raw_key, here)?;
			}
			Event::SequenceStart(anchor, _) => self.stack.push(Frame::Seq {
				anchor,
				items: Vec::new(),
			}),
			Event::MappingStart(anchor, _) => self.stack.push(Frame::Map {
				anchor,
				pending: None,
				entries: Mapping::new(),
				merges: Vec::new(),
			}),
			Event::SequenceEnd => match self.stack.pop() {
				Some(Frame::Seq { anchor, items }) => {
					let node = Rc::new(Node::Seq(items));
					self.register(anchor, &node);
					self.accept(node, false, None, here)?;
				}
				_ => return Err(here.error("unbalanced sequence end")),
			},
			Event::MappingEnd => match self.stack.pop() {
				Some(Frame::Map {
					anchor,
					pending,
					entries,
					merges,
				}) => {
					if pending.is_some() {
						return Err(here.error("mapping ended before the value of its last key"));
					}
					let node = Rc::new(Node::Map(apply_merges(entries, &merges)));
					self.register(anchor, &node);
					self.accept(node, false, None, here)?;
				}
				_ => return Err(here.error("unbalanced mapping end")),
			},
			Event::Alias(id) => {
				let node = match self.anchors.get(&id) {
					Some(node) => Rc::clone(node),
					// anchor exists but its collection is still open
					None => {
						return Err(LoadError::UnresolvedAnchor {
							name: alias_name_at(self.source, marker.index()),
							line: here.line,
							column: here.column,
						})
					}
				};
				trace!(anchor = id, "alias dereferenced");
				self.accept(node, false, None, here)?;
			}
			_ => {}
		}
		Ok(())
	}

	fn register(&mut self, anchor: usize, node: &NodeRef) {
		if anchor > 0 {
			self.anchors.insert(anchor, Rc::clone(node));
		}
	}

	fn accept(
		&mut self,
		node: NodeRef,
		is_merge: bool,
		raw_key: Option<String>,
		here: Location,
	) -> std::result::Result<(), LoadError> {
		let allow_duplicates = self.config.allow_duplicate_keys;
		match self.stack.last_mut() {
			None => {
				if self.root.is_some() {
					return Err(here.error("unexpected content after the document root"));
				}
				self.root = Some(node);
			}
			Some(Frame::Seq { items, .. }) => items.push(node),
			Some(Frame::Map {
				pending,
				entries,
				merges,
				..
			}) => match pending.take() {
				None if is_merge => *pending = Some(PendingKey::Merge(here)),
				None => match raw_key.or_else(|| node.key_text()) {
					Some(key) => *pending = Some(PendingKey::Key(key, here)),
					None => return Err(here.error(format!("mapping keys must be scalars, found a {}", node.type_name()))),
				},
				Some(PendingKey::Merge(at)) => match &*node {
					Node::Map(_) => merges.push(Rc::clone(&node)),
					Node::Seq(sources) if sources.iter().all(|s| s.as_map().is_some()) => {
						merges.extend(sources.iter().cloned())
					}
					other => {
						return Err(at.error(format!(
							"merge value must be a mapping or a sequence of mappings, found a {}",
							other.type_name()
						)))
					}
				},
				Some(PendingKey::Key(key, at)) => {
					if !allow_duplicates && entries.contains_key(&key) {
						return Err(at.error(format!("duplicate key '{}'", key)));
					}
					entries.insert(key, node);
				}
			},
		}
		Ok(())
	}
}

/// Splices merge sources under the explicit entries. Earlier sources win over
/// later ones and explicit keys win over all of them.
fn apply_merges(entries: Mapping, merges: &[NodeRef]) -> Mapping {
	if merges.is_empty() {
		return entries;
	}
	let mut merged = Mapping::new();
	for source in merges {
		if let Node::Map(map) = &**source {
			for (key, value) in map {
				merged.entry(key.clone()).or_insert_with(|| Rc::clone(value));
			}
		}
	}
	for (key, value) in entries {
		merged.insert(key, value);
	}
	merged
}

fn scan_error(source: &str, err: &ScanError) -> LoadError {
	let here = Location::of(err.marker());
	if err.info().contains("unknown anchor") {
		LoadError::UnresolvedAnchor {
			name: alias_name_at(source, err.marker().index()),
			line: here.line,
			column: here.column,
		}
	} else {
		here.error(err.info())
	}
}

/// Reads the alias name starting at a char offset (the `*` itself or just past it)
fn alias_name_at(source: &str, index: usize) -> String {
	let name: String = source
		.chars()
		.skip(index)
		.skip_while(|&c| c == '*')
		.take_while(|&c| !c.is_whitespace() && !matches!(c, ',' | '[' | ']' | '{' | '}'))
		.collect();
	if name.is_empty() {
		"?".to_string()
	} else {
		name
	}
}
