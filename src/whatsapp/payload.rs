//! Request bodies for the advanced messaging `/messages` endpoint.
//!
//! Every send uses the same [`MessageEnvelope`]. Interactive messages are
//! serialized to JSON first and that string becomes `content.message`; the
//! remote API expects the interactive payload double-encoded this way.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Channel name carried in every envelope.
pub const WHATSAPP_CHANNEL: &str = "whatsapp";

/// Channel-tagged phone number, e.g. `whatsapp:+15550000000`.
///
/// Not validated; the remote API reports malformed addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelAddress(String);

impl ChannelAddress {
    /// Wrap an already tagged address.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Tag an E.164 number with the WhatsApp channel prefix.
    pub fn whatsapp(number: &str) -> Self {
        Self(format!("{WHATSAPP_CHANNEL}:{number}"))
    }

    /// The address as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelAddress {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ChannelAddress {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Outer request body for every send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEnvelope {
    /// Registered WhatsApp sender.
    pub sender_identifier: ChannelAddress,
    /// Recipient address.
    pub recipient_identifier: ChannelAddress,
    /// Always [`WHATSAPP_CHANNEL`].
    pub channel: String,
    /// Message content.
    pub content: EnvelopeContent,
}

/// `content` object of a [`MessageEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeContent {
    /// Plain text, or the JSON-encoded interactive payload.
    pub message: String,
}

impl MessageEnvelope {
    /// Build a WhatsApp envelope around `message`.
    pub fn new(from: &ChannelAddress, to: &ChannelAddress, message: impl Into<String>) -> Self {
        Self {
            sender_identifier: from.clone(),
            recipient_identifier: to.clone(),
            channel: WHATSAPP_CHANNEL.to_owned(),
            content: EnvelopeContent {
                message: message.into(),
            },
        }
    }
}

/// Reply button offered by a button message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyButton {
    /// Identifier echoed back when the button is tapped.
    pub id: String,
    /// Label shown to the recipient.
    pub title: String,
}

impl ReplyButton {
    /// Create a reply button.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Row inside a list section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRow {
    /// Identifier echoed back when the row is selected.
    pub id: String,
    /// Row title.
    pub title: String,
    /// Secondary text under the title.
    pub description: String,
}

impl ListRow {
    /// Create a list row.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Titled group of rows in a list message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSection {
    /// Section heading.
    pub title: String,
    /// Rows in display order.
    pub rows: Vec<ListRow>,
}

impl ListSection {
    /// Create a section.
    pub fn new(title: impl Into<String>, rows: Vec<ListRow>) -> Self {
        Self {
            title: title.into(),
            rows,
        }
    }
}

/// `{"text": ...}` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextObject {
    /// The text.
    pub text: String,
}

/// Message header. Only text headers are produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Header {
    /// `{"type": "text", "text": ...}`
    Text {
        /// Header text.
        text: String,
    },
}

/// Button entry inside `action.buttons`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionButton {
    /// `{"type": "reply", "reply": {"id", "title"}}`
    Reply {
        /// The reply button.
        reply: ReplyButton,
    },
}

/// `action` of a button message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonAction {
    /// Buttons in display order.
    pub buttons: Vec<ActionButton>,
}

/// `action` of a list message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAction {
    /// Label of the button that opens the list.
    pub button: String,
    /// Sections in display order.
    pub sections: Vec<ListSection>,
}

/// Interactive message body, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InteractiveContent {
    /// Quick-reply buttons.
    Button {
        /// Main text.
        body: TextObject,
        /// Header shown above the body.
        header: Header,
        /// Reply buttons.
        action: ButtonAction,
    },
    /// Single-select list.
    List {
        /// Main text.
        body: TextObject,
        /// Header shown above the body.
        header: Header,
        /// Button label and sections.
        action: ListAction,
    },
}

/// Document embedded in `content.message`: `{"interactive": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractiveMessage {
    /// The interactive content.
    pub interactive: InteractiveContent,
}

#[derive(Serialize)]
struct InteractiveRef<'a> {
    interactive: &'a InteractiveContent,
}

impl InteractiveContent {
    /// Button message. An empty `buttons` list is passed through as is.
    pub fn button(header: &str, body: &str, buttons: &[ReplyButton]) -> Self {
        Self::Button {
            body: TextObject {
                text: body.to_owned(),
            },
            header: Header::Text {
                text: header.to_owned(),
            },
            action: ButtonAction {
                buttons: buttons
                    .iter()
                    .cloned()
                    .map(|reply| ActionButton::Reply { reply })
                    .collect(),
            },
        }
    }

    /// List message with `button_label` opening `sections`.
    pub fn list(header: &str, body: &str, button_label: &str, sections: &[ListSection]) -> Self {
        Self::List {
            body: TextObject {
                text: body.to_owned(),
            },
            header: Header::Text {
                text: header.to_owned(),
            },
            action: ListAction {
                button: button_label.to_owned(),
                sections: sections.to_vec(),
            },
        }
    }

    /// Serialize as the string placed in `content.message`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; not expected for these types.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&InteractiveRef { interactive: self })
    }

    /// Parse a `content.message` string produced by [`InteractiveContent::encode`].
    ///
    /// # Errors
    ///
    /// Returns an error if `message` is not an interactive document.
    pub fn decode(message: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<InteractiveMessage>(message).map(|m| m.interactive)
    }
}
