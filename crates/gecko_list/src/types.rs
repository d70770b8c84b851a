//! The code list tree.
//!
//! Nodes live in an arena owned by the [`CodeList`] and are addressed by [`NodeId`]. Ids stay
//! valid for as long as their node exists; removing a node invalidates its id (and the ids of
//! its descendants) and slots are never reused, so a stale id held by an editor resolves to
//! nothing instead of to another node.

use derive_more::derive::Display;
use tracing::{debug, instrument};

use crate::diagnostics::{Diagnostics, Event, MismatchPolicy};
use crate::error::{Error, Result};
use crate::hex::HexCode;
use crate::name::{is_game_id, join_author, placeholder, LEGACY_UNKNOWN_GAME_ID, PLACEHOLDER_PREFIX};

/// Stable handle to a node of a [`CodeList`]
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("#{_0}")]
pub struct NodeId(usize);

/// Payload and metadata of a code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    /// The patch itself
    pub lines: HexCode,
    pub comment: String,
    pub author: String,
    /// Whether the code goes into outputs restricted to enabled codes
    pub enabled: bool,
    /// Values the user is asked for before the code can be used
    pub placeholders: Vec<Placeholder>,
}

/// A value left open in a code's payload, as listed by code databases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Placeholder {
    /// The letters standing for the value in the payload
    pub letter: String,
    /// How the value is entered, as numbered by the database
    pub kind: u32,
    pub comment: String,
    pub args: Vec<String>,
    /// Whether the value repeats for every occurrence
    pub recursive: bool,
}

impl Code {
    /// A disabled code with no comment or author
    pub fn new(lines: impl Into<HexCode>) -> Self {
        Self {
            lines: lines.into(),
            ..Default::default()
        }
    }
}

/// What a node is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A group of nodes
    Category(Vec<NodeId>),
    /// A leaf carrying a patch
    Code(Code),
}

/// A category or a code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeNode {
    pub name: String,
    pub kind: NodeKind,
    parent: Option<NodeId>,
}

impl CodeNode {
    /// The category holding this node, `None` for top level nodes
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_category(&self) -> bool {
        matches!(self.kind, NodeKind::Category(_))
    }

    pub fn as_code(&self) -> Option<&Code> {
        match &self.kind {
            NodeKind::Code(code) => Some(code),
            NodeKind::Category(_) => None,
        }
    }

    pub fn as_code_mut(&mut self) -> Option<&mut Code> {
        match &mut self.kind {
            NodeKind::Code(code) => Some(code),
            NodeKind::Category(_) => None,
        }
    }

    /// Children of a category, empty for codes
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Category(children) => children,
            NodeKind::Code(_) => &[],
        }
    }

    /// The name with the author appended the way serialized forms carry it
    pub fn title(&self) -> String {
        match &self.kind {
            NodeKind::Code(code) => join_author(&self.name, &code.author),
            NodeKind::Category(_) => self.name.clone(),
        }
    }
}

/// A game's list of codes
///
/// ```
/// use gecko_list::{Code, CodeList};
///
/// # fn main() -> gecko_list::error::Result<()> {
/// let mut list = CodeList::new();
/// list.set_game_id("RMCP01")?;
///
/// let items = list.add_category(None, "Items")?;
/// list.add_code(Some(items), "Always Bullet Bill", Code::new("C2000000 00000001"))?;
///
/// assert_eq!(list.codes().count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeList {
    game_id: String,
    pub game_name: String,
    /// Text from an imported INI file that belongs to neither Gecko section
    pub scrap: Option<String>,
    nodes: Vec<Option<CodeNode>>,
    roots: Vec<NodeId>,
}

impl CodeList {
    /// An empty list for an unknown game
    pub fn new() -> Self {
        Self::default()
    }

    /// The game id, empty when unknown
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Set the game id. An empty id marks the game as unknown.
    pub fn set_game_id(&mut self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        if !id.is_empty() && !is_game_id(&id) {
            return Err(Error::InvalidGameId(id));
        }
        self.game_id = id;
        Ok(())
    }

    /// Reconcile the list's game id with one found in imported data.
    ///
    /// An unknown current id is replaced. A differing known id either aborts the import
    /// before anything is changed or records a [`Event::GameIdMismatch`] and keeps the
    /// current id.
    #[instrument(skip(self, diagnostics))]
    pub fn reconcile_game_id(
        &mut self,
        detected: &str,
        policy: MismatchPolicy,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        if !is_game_id(detected) || detected == LEGACY_UNKNOWN_GAME_ID {
            return Ok(());
        }

        if self.game_id.is_empty() || self.game_id == LEGACY_UNKNOWN_GAME_ID {
            self.game_id = detected.to_string();
            return Ok(());
        }

        if self.game_id != detected {
            match policy {
                MismatchPolicy::Abort => {
                    return Err(Error::GameIdMismatch {
                        current: self.game_id.clone(),
                        detected: detected.to_string(),
                    })
                }
                MismatchPolicy::Continue => diagnostics.push(Event::GameIdMismatch {
                    current: self.game_id.clone(),
                    detected: detected.to_string(),
                }),
            }
        }

        Ok(())
    }

    /// Top level nodes in order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Whether the list holds no nodes
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&CodeNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut CodeNode> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Children of a category, or the top level nodes for `None`
    pub fn children(&self, parent: Option<NodeId>) -> Result<&[NodeId]> {
        match parent {
            None => Ok(&self.roots),
            Some(id) => {
                let node = self.get(id).ok_or(Error::NodeNotFound(id))?;
                match &node.kind {
                    NodeKind::Category(children) => Ok(children),
                    NodeKind::Code(_) => Err(Error::NotACategory(id)),
                }
            }
        }
    }

    fn siblings_mut(&mut self, parent: Option<NodeId>) -> Result<&mut Vec<NodeId>> {
        match parent {
            None => Ok(&mut self.roots),
            Some(id) => {
                let node = self.get_mut(id).ok_or(Error::NodeNotFound(id))?;
                match &mut node.kind {
                    NodeKind::Category(children) => Ok(children),
                    NodeKind::Code(_) => Err(Error::NotACategory(id)),
                }
            }
        }
    }

    fn insert(&mut self, parent: Option<NodeId>, name: String, kind: NodeKind) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        self.siblings_mut(parent)?.push(id);
        self.nodes.push(Some(CodeNode { name, kind, parent }));
        Ok(id)
    }

    /// Append an empty category to `parent`, or to the top level for `None`.
    pub fn add_category(&mut self, parent: Option<NodeId>, name: impl Into<String>) -> Result<NodeId> {
        self.insert(parent, name.into(), NodeKind::Category(Vec::new()))
    }

    /// Append a code to `parent`, or to the top level for `None`.
    pub fn add_code(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        code: Code,
    ) -> Result<NodeId> {
        self.insert(parent, name.into(), NodeKind::Code(code))
    }

    /// Remove a node and everything below it.
    pub fn remove(&mut self, id: NodeId) -> Result<CodeNode> {
        let parent = self.get(id).ok_or(Error::NodeNotFound(id))?.parent;
        self.siblings_mut(parent)?.retain(|c| *c != id);

        let mut pending = vec![id];
        let mut removed = None;
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                pending.extend_from_slice(node.children());
                if current == id {
                    removed = Some(node);
                }
            }
        }

        removed.ok_or(Error::NodeNotFound(id))
    }

    /// Depth-first, pre-order walk over every node with its depth (0 for top level).
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            list: self,
            stack: self.roots.iter().rev().map(|id| (0, *id)).collect(),
        }
    }

    /// Every code in document order, categories flattened away
    pub fn codes(&self) -> impl Iterator<Item = (NodeId, &CodeNode, &Code)> {
        self.walk()
            .filter_map(|(_, id, node)| node.as_code().map(|code| (id, node, code)))
    }

    /// Enabled codes in document order
    pub fn enabled_codes(&self) -> impl Iterator<Item = (NodeId, &CodeNode, &Code)> {
        self.codes().filter(|(_, _, code)| code.enabled)
    }

    /// The lowest numbered `Unknown Code N` name not already in use.
    pub fn placeholder_name(&self) -> String {
        let used: Vec<&str> = self
            .walk()
            .map(|(_, _, node)| node.name.as_str())
            .filter(|name| name.starts_with(PLACEHOLDER_PREFIX))
            .collect();

        (1..)
            .map(placeholder)
            .find(|candidate| !used.contains(&candidate.as_str()))
            .unwrap_or_else(|| placeholder(0))
    }

    /// Merge several codes into the first one.
    ///
    /// The first code in `ids` receives the lines of all the others in order and loses its
    /// comment and placeholders; the other codes are removed. Categories and repeated ids
    /// are ignored. Returns the destination, if any code was given.
    #[instrument(skip(self))]
    pub fn merge_codes(&mut self, ids: &[NodeId]) -> Result<Option<NodeId>> {
        let mut destination: Option<NodeId> = None;
        let mut seen: Vec<NodeId> = Vec::with_capacity(ids.len());
        for id in ids {
            if seen.contains(id) {
                continue;
            }
            seen.push(*id);

            let node = self.get(*id).ok_or(Error::NodeNotFound(*id))?;
            let Some(code) = node.as_code() else {
                continue;
            };

            match destination {
                None => {
                    destination = Some(*id);
                    if let Some(code) = self.get_mut(*id).and_then(CodeNode::as_code_mut) {
                        code.comment.clear();
                        code.placeholders.clear();
                    }
                }
                Some(dest) => {
                    let lines = code.lines.clone();
                    if let Some(target) = self.get_mut(dest).and_then(CodeNode::as_code_mut) {
                        target.lines.append(&lines);
                    }
                    debug!("merged {} into {}", id, dest);
                    self.remove(*id)?;
                }
            }
        }
        Ok(destination)
    }

    /// Order the top level: categories alphabetically first, then codes from largest to
    /// smallest payload.
    pub fn sort_by_size(&mut self) {
        let nodes = &self.nodes;
        let node = |id: &NodeId| nodes[id.0].as_ref();

        let (mut categories, mut codes): (Vec<NodeId>, Vec<NodeId>) = self
            .roots
            .iter()
            .copied()
            .partition(|id| node(id).is_some_and(CodeNode::is_category));

        categories.sort_by_key(|id| node(id).map(|n| n.name.clone()));
        codes.sort_by_key(|id| {
            std::cmp::Reverse(
                node(id)
                    .and_then(CodeNode::as_code)
                    .map_or(0, |c| c.lines.byte_len()),
            )
        });

        categories.extend(codes);
        self.roots = categories;
    }

    /// Copy nodes of another list under `parent`.
    ///
    /// Codes given directly are always copied. Below a copied category only enabled codes
    /// are kept, along with the categories leading to them. Returns the new ids of the
    /// copied top nodes.
    pub fn import_from(
        &mut self,
        source: &CodeList,
        ids: &[NodeId],
        parent: Option<NodeId>,
    ) -> Result<Vec<NodeId>> {
        let mut copied = Vec::with_capacity(ids.len());
        for id in ids {
            let node = source.get(*id).ok_or(Error::NodeNotFound(*id))?;
            let new_id = match &node.kind {
                NodeKind::Code(code) => self.add_code(parent, node.name.clone(), code.clone())?,
                NodeKind::Category(_) => self.copy_enabled(source, *id, parent)?,
            };
            copied.push(new_id);
        }
        Ok(copied)
    }

    fn copy_enabled(&mut self, source: &CodeList, id: NodeId, parent: Option<NodeId>) -> Result<NodeId> {
        let node = source.get(id).ok_or(Error::NodeNotFound(id))?;
        let category = self.add_category(parent, node.name.clone())?;
        for child_id in node.children() {
            let Some(child) = source.get(*child_id) else {
                continue;
            };
            match &child.kind {
                NodeKind::Code(code) if code.enabled => {
                    self.add_code(Some(category), child.name.clone(), code.clone())?;
                }
                NodeKind::Code(_) => {}
                NodeKind::Category(_) => {
                    self.copy_enabled(source, *child_id, Some(category))?;
                }
            }
        }
        Ok(category)
    }
}

/// Iterator returned by [`CodeList::walk`]
pub struct Walk<'a> {
    list: &'a CodeList,
    stack: Vec<(usize, NodeId)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, NodeId, &'a CodeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((depth, id)) = self.stack.pop() {
            let Some(node) = self.list.get(id) else {
                continue;
            };
            self.stack
                .extend(node.children().iter().rev().map(|child| (depth + 1, *child)));
            return Some((depth, id, node));
        }
        None
    }
}
