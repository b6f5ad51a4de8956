//! Sample messages sent by the `demo` subcommand.

use crate::whatsapp::{ListRow, ListSection, ReplyButton};

/// Text of the plain demo message.
pub const TEXT_MESSAGE: &str =
    "Hello! This is a simple WhatsApp message sent from Azure Communication Services.";

/// Header of the button demo.
pub const BUTTON_HEADER: &str = "Available Options";

/// Body of the button demo.
pub const BUTTON_BODY: &str = "Please select an option:";

/// Header of the list demo.
pub const LIST_HEADER: &str = "Our Catalog";

/// Body of the list demo.
pub const LIST_BODY: &str = "Select an item for more information:";

/// Label of the button that opens the list demo.
pub const LIST_BUTTON_LABEL: &str = "View Options";

/// Three reply buttons, `option_1` to `option_3`.
pub fn reply_buttons() -> Vec<ReplyButton> {
    vec![
        ReplyButton::new("option_1", "Option 1"),
        ReplyButton::new("option_2", "Option 2"),
        ReplyButton::new("option_3", "Option 3"),
    ]
}

/// Two sections of two rows each.
pub fn list_sections() -> Vec<ListSection> {
    vec![
        ListSection::new(
            "Popular Products",
            vec![
                ListRow::new("product_1", "Product 1", "Description of Product 1"),
                ListRow::new("product_2", "Product 2", "Description of Product 2"),
            ],
        ),
        ListSection::new(
            "Services",
            vec![
                ListRow::new("service_1", "Service 1", "Description of Service 1"),
                ListRow::new("service_2", "Service 2", "Description of Service 2"),
            ],
        ),
    ]
}
