use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Position of an element in document (pre-)order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageElement {
    pub id: ElementId,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
    pub tag: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// One past the last descendant; descendants occupy `id + 1 .. subtree_end`.
    pub subtree_end: usize,
}

impl PageElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Flat, document-ordered view of a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageDocument {
    elements: Vec<PageElement>,
    /// Custom properties declared on `:root` (e.g. `--anim-duration`).
    #[serde(default)]
    root_properties: HashMap<String, String>,
}

impl PageDocument {
    pub(crate) fn from_parts(
        elements: Vec<PageElement>,
        root_properties: HashMap<String, String>,
    ) -> Self {
        Self {
            elements,
            root_properties,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: ElementId) -> Option<&PageElement> {
        self.elements.get(id.0)
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn root_property(&self, name: &str) -> Option<&str> {
        self.root_properties.get(name).map(String::as_str)
    }

    /// Every element carrying `name`, in document order.
    pub fn elements_with_attr<'a>(&'a self, name: &'a str) -> impl Iterator<Item = ElementId> + 'a {
        self.elements
            .iter()
            .filter(move |el| el.has_attr(name))
            .map(|el| el.id)
    }

    /// The element itself or its nearest ancestor carrying `name`.
    pub fn closest_with_attr(&self, id: ElementId, name: &str) -> Option<ElementId> {
        let mut cursor = self.element(id);
        while let Some(el) = cursor {
            if el.has_attr(name) {
                return Some(el.id);
            }
            cursor = el.parent.and_then(|parent| self.element(parent));
        }
        None
    }

    /// Strict descendants of `id` in document order.
    pub fn descendants(&self, id: ElementId) -> &[PageElement] {
        match self.element(id) {
            Some(el) => &self.elements[id.0 + 1..el.subtree_end],
            None => &[],
        }
    }

    pub fn descendants_with_attr<'a>(
        &'a self,
        id: ElementId,
        name: &'a str,
    ) -> impl Iterator<Item = ElementId> + 'a {
        self.descendants(id)
            .iter()
            .filter(move |el| el.has_attr(name))
            .map(|el| el.id)
    }

    pub fn descendants_with_class<'a>(
        &'a self,
        id: ElementId,
        class: &'a str,
    ) -> impl Iterator<Item = ElementId> + 'a {
        self.descendants(id)
            .iter()
            .filter(move |el| el.has_class(class))
            .map(|el| el.id)
    }

    /// Every element with `class`, in document order.
    pub fn elements_with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = ElementId> + 'a {
        self.elements
            .iter()
            .filter(move |el| el.has_class(class))
            .map(|el| el.id)
    }

    /// Lookup by the `id` attribute.
    pub fn by_html_id(&self, html_id: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|el| el.html_id.as_deref() == Some(html_id))
            .map(|el| el.id)
    }

    /// First descendant of `id` with the given tag name.
    pub fn first_descendant_tag(&self, id: ElementId, tag: &str) -> Option<ElementId> {
        self.descendants(id)
            .iter()
            .find(|el| el.tag.eq_ignore_ascii_case(tag))
            .map(|el| el.id)
    }
}
