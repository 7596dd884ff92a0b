use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use crate::css;
use crate::document::{ElementId, PageDocument, PageElement};

/// Parse page markup. Parsing is lenient; malformed markup still yields a
/// document.
pub fn document_from_html(source: &str) -> PageDocument {
    let html = Html::parse_document(source);
    let mut elements = Vec::new();
    flatten(*html.root_element(), None, &mut elements);
    let root_properties = collect_root_properties(&html);
    debug!(
        elements = elements.len(),
        root_properties = root_properties.len(),
        "parsed page document"
    );
    PageDocument::from_parts(elements, root_properties)
}

pub fn document_from_file(path: &Path) -> Result<PageDocument> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read HTML file '{}'", path.display()))?;
    Ok(document_from_html(&source))
}

/// Pre-order walk, so arena order is document order.
fn flatten(node: NodeRef<'_, Node>, parent: Option<ElementId>, out: &mut Vec<PageElement>) {
    let Some(element) = ElementRef::wrap(node) else {
        return;
    };
    let value = element.value();
    let id = ElementId(out.len());
    out.push(PageElement {
        id,
        parent,
        tag: value.name().to_ascii_lowercase(),
        html_id: value.id().map(str::to_string),
        classes: value.classes().map(str::to_string).collect(),
        attributes: value
            .attrs()
            .map(|(name, v)| (name.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
        subtree_end: id.0 + 1,
    });

    for child in node.children() {
        flatten(child, Some(id), out);
    }
    out[id.0].subtree_end = out.len();
}

fn collect_root_properties(document: &Html) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    let Ok(selector) = Selector::parse("style") else {
        return vars;
    };
    for node in document.select(&selector) {
        let source = node.text().collect::<String>();
        css::root_custom_properties(&source, &mut vars);
    }
    vars
}
