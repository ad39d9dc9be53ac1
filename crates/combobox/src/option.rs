//! The option data model.
//!
//! A [`DropdownOption`] is immutable once built: builder methods consume and
//! return `self`, and there are no setters. Within one list, options are
//! identified by their `value`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Optional external identifier of an option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionId {
    /// Numeric id, as most JSON APIs return.
    Number(i64),
    /// String id.
    Text(String),
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OptionId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for OptionId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for OptionId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// What an option stands for. Search mode rows render `Query` with a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// A catalogue product.
    Product,
    /// A person.
    User,
    /// A post or article.
    Post,
    /// A help query or canned search.
    Query,
    /// A plain choice.
    Option,
}

/// One selectable entry.
///
/// # Example
///
/// ```rust
/// use combobox::{DropdownOption, OptionKind};
///
/// let opt = DropdownOption::new("eng", "Engineering")
///     .with_category("Departments")
///     .with_kind(OptionKind::Option);
/// assert_eq!(opt.value(), "eng");
/// assert_eq!(opt.label(), "Engineering");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<OptionId>,
    value: String,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<OptionKind>,
}

impl DropdownOption {
    /// Creates an option with the given value and label.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: None,
            value: value.into(),
            label: label.into(),
            category: None,
            kind: None,
        }
    }

    /// Sets the external id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<OptionId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the kind.
    #[must_use]
    pub fn with_kind(mut self, kind: OptionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn id(&self) -> Option<&OptionId> {
        self.id.as_ref()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn kind(&self) -> Option<OptionKind> {
        self.kind
    }
}

/// Drops options whose value already appeared earlier in the list.
pub fn dedup_by_value(options: Vec<DropdownOption>) -> Vec<DropdownOption> {
    let mut seen = HashSet::new();
    options
        .into_iter()
        .filter(|opt| seen.insert(opt.value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first() {
        let opts = vec![
            DropdownOption::new("a", "Apple"),
            DropdownOption::new("b", "Banana"),
            DropdownOption::new("a", "Avocado"),
        ];
        let out = dedup_by_value(opts);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].label(), "Apple");
    }

    #[test]
    fn test_deserialize_with_type_field() {
        let opt: DropdownOption = serde_json::from_str(
            r#"{"id": 7, "value": "7", "label": "Phone", "type": "product"}"#,
        )
        .unwrap();
        assert_eq!(opt.id(), Some(&OptionId::Number(7)));
        assert_eq!(opt.kind(), Some(OptionKind::Product));
        assert_eq!(opt.category(), None);
    }

    #[test]
    fn test_text_id_display() {
        let opt = DropdownOption::new("x", "X").with_id("sku-1");
        assert_eq!(opt.id().unwrap().to_string(), "sku-1");
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let json = serde_json::to_string(&DropdownOption::new("v", "L")).unwrap();
        assert_eq!(json, r#"{"value":"v","label":"L"}"#);
    }
}
