//! Block templates offered by the palette and the payload that carries one
//! across a drag-and-drop transfer.

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, Result};
use crate::model::{ActionType, NodeData, NodeKind};

/// Transfer key the palette stores its payload under.
pub const DRAG_PAYLOAD_FORMAT: &str = "application/reactflow";

/// A template being dragged from the palette: which kind of node to create
/// and the data it starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPayload {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub data: NodeData,
}

impl DragPayload {
    pub fn new(kind: NodeKind, data: NodeData) -> Self {
        Self { kind, data }
    }

    /// Serialize for the text transfer channel.
    pub fn to_text(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read a payload back from the transfer channel.
    ///
    /// An empty string means the drop carried nothing from the palette.
    pub fn from_text(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(CanvasError::EmptyPayload);
        }
        serde_json::from_str(text).map_err(CanvasError::InvalidPayload)
    }

    /// Label a node created from this payload gets: `"{Type} Node"`.
    pub fn default_label(&self) -> String {
        format!("{} Node", self.kind)
    }

    /// Data for the node created from this payload. The template's fields are
    /// kept, the label is replaced by [`default_label`](Self::default_label).
    pub fn node_data(&self) -> NodeData {
        NodeData { label: self.default_label(), ..self.data.clone() }
    }
}

/// The palette, in display order.
pub fn default_templates() -> Vec<DragPayload> {
    let action = |label: &str, action| {
        DragPayload::new(NodeKind::Action, NodeData::labeled(label).with_action(action))
    };

    vec![
        DragPayload::new(NodeKind::Trigger, NodeData::labeled("New Lead")),
        action("Send Email", ActionType::SendEmail),
        action("Send SMS", ActionType::SendSms),
        action("Make Call Task", ActionType::MakeCall),
        action("Update Lead", ActionType::UpdateLead),
        action("Assign To", ActionType::AssignTo),
        DragPayload::new(NodeKind::Condition, NodeData::labeled("Check Field")),
        DragPayload::new(NodeKind::Delay, NodeData::labeled("Wait")),
    ]
}
