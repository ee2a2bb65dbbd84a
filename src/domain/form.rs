use serde::Serialize;

use super::LinkSlot;

pub const SCHEMA_REFERENCE_URL: &str = "https://schema.org/SpecialAnnouncement";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    HtmlEditor,
    Datetime,
    Checkbox,
    Image,
    Link,
    PageList,
}

/// Describes one input of the announcement edit form.
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl FormField {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            default_value: None,
            help: None,
        }
    }

    fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementForm {
    pub notice: String,
    pub fields: Vec<FormField>,
}

pub fn announcement_form(default_category_url: &str) -> AnnouncementForm {
    let mut fields = vec![
        FormField::new("title", "Title", FieldKind::Text),
        FormField::new("is_global", "Show on every page", FieldKind::Checkbox)
            .with_help("Only one announcement can be global. Saving this one as global clears the flag on all others.".to_string()),
        FormField::new("category", "Category", FieldKind::Text)
            .with_default(default_category_url)
            .with_help("A URL describing the announcement category. Leave blank to use the default.".to_string()),
        FormField::new("short_description", "Short description", FieldKind::Textarea)
            .with_help("Plain text. Markup is removed from the structured data.".to_string()),
        FormField::new("content", "Content", FieldKind::HtmlEditor),
        FormField::new("date_posted", "Date posted", FieldKind::Datetime),
        FormField::new("expires", "Expires", FieldKind::Datetime),
        FormField::new("image_id", "Image", FieldKind::Image),
    ];

    fields.extend(LinkSlot::ALL.iter().map(|slot| {
        FormField::new(&format!("links.{}", slot.as_str()), slot.label(), FieldKind::Link)
            .with_help(format!("Published as \"{}\"", slot.schema_key()))
    }));

    fields.push(FormField::new("page_ids", "Pages", FieldKind::PageList));

    AnnouncementForm {
        notice: format!(
            "Please read {} before completing these fields",
            SCHEMA_REFERENCE_URL
        ),
        fields,
    }
}
