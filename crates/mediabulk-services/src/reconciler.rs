//! Shared field computation and shared subform rewriting.

use std::collections::HashSet;

use mediabulk_core::models::{FieldWidget, FormNode, FormTree};

/// Namespace the shared subform's widgets are submitted under.
pub const SHARED_PARENTS: [&str; 2] = ["fields", "shared"];

/// Fields present in every type's field list, in the first type's order.
///
/// `per_type` holds one `(content type id, field names)` entry per type, in
/// configuration order.
pub fn compute_shared(per_type: &[(String, Vec<String>)]) -> Vec<String> {
    let Some(((_, base), others)) = per_type.split_first() else {
        return Vec::new();
    };

    let others: Vec<HashSet<&str>> = others
        .iter()
        .map(|(_, names)| names.iter().map(String::as_str).collect())
        .collect();

    let mut shared: Vec<String> = Vec::new();
    for name in base {
        if shared.contains(name) {
            continue;
        }
        if others.iter().all(|names| names.contains(name.as_str())) {
            shared.push(name.clone());
        }
    }
    shared
}

/// Rewrite a rendered form for the shared section.
///
/// Fields outside `allowed` are dropped with their whole subtree. Kept fields
/// lose their type-specific `parents`, their widget is re-parented under
/// [`SHARED_PARENTS`] and every `required` flag below it is cleared.
pub fn reconcile_form(form: &FormTree, allowed: &[String]) -> FormTree {
    let fields = form
        .fields
        .iter()
        .filter(|field| allowed.iter().any(|name| *name == field.field_name))
        .map(|field| {
            let mut parents: Vec<String> = SHARED_PARENTS.iter().map(|p| p.to_string()).collect();
            parents.extend(field.widget.parents().iter().cloned());

            FieldWidget {
                field_name: field.field_name.clone(),
                weight: field.weight,
                parents: None,
                widget: force_optional(&field.widget).with_parents(parents),
            }
        })
        .collect();

    FormTree { fields }
}

/// Copy of `node` with every declared `required` flag set to false, at any
/// depth. Undeclared flags stay undeclared.
pub fn force_optional(node: &FormNode) -> FormNode {
    match node {
        FormNode::Input(input) => {
            let mut input = input.clone();
            input.required = input.required.map(|_| false);
            FormNode::Input(input)
        }
        FormNode::Group(group) => {
            let mut group = group.clone();
            group.required = group.required.map(|_| false);
            group.children = group.children.iter().map(force_optional).collect();
            FormNode::Group(group)
        }
    }
}
