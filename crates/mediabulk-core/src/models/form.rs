use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::content_type::ContentType;
use super::upload::PendingContentRecord;

/// Submitted form input, keyed by field name.
pub type FormValues = BTreeMap<String, JsonValue>;

/// A node of a rendered form: either a single input or a group of nodes
/// (fieldsets, multi-value wrappers, composite widgets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FormNode {
    Input(FormInput),
    Group(FormGroup),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    pub key: String,
    #[serde(rename = "type", default = "default_input_type")]
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `None` when the element does not declare the flag at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormGroup {
    pub key: String,
    #[serde(rename = "type", default = "default_group_type")]
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(default)]
    pub children: Vec<FormNode>,
}

fn default_input_type() -> String {
    "textfield".to_string()
}

fn default_group_type() -> String {
    "container".to_string()
}

impl FormNode {
    pub fn key(&self) -> &str {
        match self {
            FormNode::Input(input) => &input.key,
            FormNode::Group(group) => &group.key,
        }
    }

    pub fn required(&self) -> Option<bool> {
        match self {
            FormNode::Input(input) => input.required,
            FormNode::Group(group) => group.required,
        }
    }

    pub fn parents(&self) -> &[String] {
        match self {
            FormNode::Input(input) => &input.parents,
            FormNode::Group(group) => &group.parents,
        }
    }

    pub fn children(&self) -> &[FormNode] {
        match self {
            FormNode::Input(_) => &[],
            FormNode::Group(group) => &group.children,
        }
    }

    /// Copy of this node with `parents` replaced.
    pub fn with_parents(&self, parents: Vec<String>) -> FormNode {
        let mut node = self.clone();
        match &mut node {
            FormNode::Input(input) => input.parents = parents,
            FormNode::Group(group) => group.parents = parents,
        }
        node
    }

    /// True if this node or any descendant is marked required.
    pub fn any_required(&self) -> bool {
        self.required() == Some(true) || self.children().iter().any(FormNode::any_required)
    }
}

/// The form element of one field: positional metadata plus its widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldWidget {
    pub field_name: String,
    #[serde(default)]
    pub weight: i32,
    /// Type-specific position of the field element; dropped when the field
    /// moves into the shared section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
    pub widget: FormNode,
}

/// A rendered (sub)form: field elements in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormTree {
    pub fields: Vec<FieldWidget>,
}

impl FormTree {
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.field_name.as_str())
    }

    pub fn get(&self, field_name: &str) -> Option<&FieldWidget> {
        self.fields.iter().find(|field| field.field_name == field_name)
    }

    pub fn contains(&self, field_name: &str) -> bool {
        self.get(field_name).is_some()
    }

    /// Copy of this tree without `field_name`.
    pub fn without(&self, field_name: &str) -> FormTree {
        FormTree {
            fields: self
                .fields
                .iter()
                .filter(|field| field.field_name != field_name)
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Which fields a content type exposes in a given form mode, and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDisplay {
    pub content_type: String,
    pub mode: String,
    #[serde(default)]
    pub components: Vec<FormComponent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormComponent {
    pub field_name: String,
    #[serde(default)]
    pub weight: i32,
    pub widget: FormNode,
}

impl FormDisplay {
    pub const DEFAULT_MODE: &'static str = "default";

    /// Storage id, `<content_type>.<mode>`.
    pub fn id(&self) -> String {
        format!("{}.{}", self.content_type, self.mode)
    }

    /// Component field names, in configured order.
    pub fn component_names(&self) -> Vec<String> {
        self.components
            .iter()
            .map(|component| component.field_name.clone())
            .collect()
    }

    /// Render the display's widgets into a form tree ordered by weight.
    pub fn build_form(&self) -> FormTree {
        let mut components: Vec<&FormComponent> = self.components.iter().collect();
        components.sort_by_key(|component| component.weight);

        let fields = components
            .into_iter()
            .map(|component| {
                let widget = if component.widget.parents().is_empty() {
                    component
                        .widget
                        .with_parents(vec![component.field_name.clone()])
                } else {
                    component.widget.clone()
                };
                FieldWidget {
                    field_name: component.field_name.clone(),
                    weight: component.weight,
                    parents: Some(vec![component.field_name.clone()]),
                    widget,
                }
            })
            .collect();

        FormTree { fields }
    }

    /// Copy submitted values for the fields rendered in `form` onto `record`.
    ///
    /// Only components of this display that are present in `form`, have a
    /// submitted value and exist on `content_type` are extracted. Returns the
    /// names of the fields that were set.
    pub fn extract_form_values(
        &self,
        form: &FormTree,
        values: &FormValues,
        content_type: &ContentType,
        record: &mut PendingContentRecord,
    ) -> BTreeSet<String> {
        let mut extracted = BTreeSet::new();
        for component in &self.components {
            let name = component.field_name.as_str();
            if !form.contains(name) || !content_type.has_field(name) {
                continue;
            }
            if let Some(value) = values.get(name) {
                record.set(name, value.clone());
                extracted.insert(name.to_string());
            }
        }
        extracted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldDefinition;
    use serde_json::json;

    fn input(key: &str, required: Option<bool>) -> FormNode {
        FormNode::Input(FormInput {
            key: key.to_string(),
            element_type: "textfield".to_string(),
            title: None,
            required,
            parents: Vec::new(),
            default_value: None,
        })
    }

    fn display() -> FormDisplay {
        FormDisplay {
            content_type: "image".to_string(),
            mode: "bulk".to_string(),
            components: vec![
                FormComponent {
                    field_name: "field_tags".to_string(),
                    weight: 5,
                    widget: input("target_id", Some(true)),
                },
                FormComponent {
                    field_name: "field_credit".to_string(),
                    weight: -1,
                    widget: input("value", None),
                },
            ],
        }
    }

    #[test]
    fn test_build_form_orders_by_weight_and_sets_parents() {
        let form = display().build_form();
        assert_eq!(
            form.field_names().collect::<Vec<_>>(),
            vec!["field_credit", "field_tags"]
        );
        let tags = form.get("field_tags").unwrap();
        assert_eq!(tags.parents, Some(vec!["field_tags".to_string()]));
        assert_eq!(tags.widget.parents(), ["field_tags".to_string()]);
    }

    #[test]
    fn test_component_names_keep_configured_order() {
        assert_eq!(display().component_names(), vec!["field_tags", "field_credit"]);
        assert_eq!(display().id(), "image.bulk");
    }

    #[test]
    fn test_extract_form_values_only_for_rendered_fields() {
        let content_type = ContentType {
            id: "image".to_string(),
            label: "Image".to_string(),
            source_field: "field_media_image".to_string(),
            fields: vec![FieldDefinition {
                name: "field_tags".to_string(),
                label: "Tags".to_string(),
                settings: None,
            }],
        };
        let form = display().build_form().without("field_credit");
        let mut values = FormValues::new();
        values.insert("field_tags".to_string(), json!([{"target_id": 3}]));
        values.insert("field_credit".to_string(), json!("someone"));

        let mut record = PendingContentRecord::new("image", "cat");
        let extracted = display().extract_form_values(&form, &values, &content_type, &mut record);

        assert_eq!(extracted.into_iter().collect::<Vec<_>>(), vec!["field_tags"]);
        assert_eq!(record.get("field_tags"), Some(&json!([{"target_id": 3}])));
        assert!(record.get("field_credit").is_none());
    }

    #[test]
    fn test_form_node_serde_roundtrip_shape() {
        let node: FormNode = serde_json::from_value(json!({
            "kind": "group",
            "key": "widget",
            "children": [{"kind": "input", "key": "value", "required": true}]
        }))
        .unwrap();
        assert!(node.any_required());
        assert_eq!(node.children()[0].key(), "value");
    }
}
