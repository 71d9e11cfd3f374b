use crate::common;

use std::collections;

/// Attributes to return from a read (projection expression).
///
/// Names are always referenced through `#proj{i}` placeholders, so reserved words
/// such as `name` or `status` are safe to select.
///
/// ```rust
/// use dynamodb_facade::common::selection;
///
/// let selection = selection::Selection::new(["id", "name"]);
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Selection {
    /// Top-level attribute names to return.
    pub attributes: Vec<String>,
}

impl Selection {
    /// Select the given attributes.
    pub fn new(attributes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Selection> for common::ExpressionInput {
    fn from(selection: Selection) -> Self {
        let operations = selection
            .attributes
            .into_iter()
            .enumerate()
            .map(|(index, attribute)| {
                let placeholder = format!("#proj{index}");
                common::ExpressionInput {
                    expression: placeholder.clone(),
                    expression_attribute_names: collections::HashMap::from([(
                        placeholder,
                        attribute,
                    )]),
                    ..Default::default()
                }
            })
            .collect();
        common::ExpressionInput::merge(", ", operations)
    }
}

/// Compile an optional selection into `(names, projection_expression)`.
pub(crate) fn compile(
    selection: Option<Selection>,
) -> (Option<collections::HashMap<String, String>>, Option<String>) {
    match selection {
        Some(selection) if !selection.attributes.is_empty() => {
            let operation: common::ExpressionInput = selection.into();
            (
                Some(operation.expression_attribute_names),
                Some(operation.expression),
            )
        }
        _ => (None, None),
    }
}
