use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::types::{CodeList, NodeId, NodeKind};

struct Nodes<'a> {
    list: &'a CodeList,
    ids: &'a [NodeId],
}

struct Node<'a> {
    list: &'a CodeList,
    id: NodeId,
}

impl Serialize for CodeList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("CodeList", 4)?;
        state.serialize_field("game_id", self.game_id())?;
        state.serialize_field("game_name", &self.game_name)?;
        state.serialize_field("scrap", &self.scrap)?;
        state.serialize_field(
            "nodes",
            &Nodes {
                list: self,
                ids: self.roots(),
            },
        )?;
        state.end()
    }
}

impl Serialize for Nodes<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.ids.len()))?;
        for id in self.ids {
            seq.serialize_element(&Node {
                list: self.list,
                id: *id,
            })?;
        }
        seq.end()
    }
}

impl Serialize for Node<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let Some(node) = self.list.get(self.id) else {
            return serializer.serialize_none();
        };

        match &node.kind {
            NodeKind::Category(children) => {
                let mut state = serializer.serialize_struct("Category", 2)?;
                state.serialize_field("name", &node.name)?;
                state.serialize_field(
                    "children",
                    &Nodes {
                        list: self.list,
                        ids: children,
                    },
                )?;
                state.end()
            }
            NodeKind::Code(code) => {
                let mut state = serializer.serialize_struct("Code", 6)?;
                state.serialize_field("name", &node.name)?;
                state.serialize_field("author", &code.author)?;
                state.serialize_field("enabled", &code.enabled)?;
                state.serialize_field("lines", &code.lines.lines().collect::<Vec<_>>())?;
                state.serialize_field("comment", &code.comment)?;
                state.serialize_field("placeholders", &code.placeholders)?;
                state.end()
            }
        }
    }
}
