//! Root custom properties from `<style>` blocks.
//!
//! Stylesheets are parsed with lightningcss. Only top-level style rules whose
//! selector targets the document element (`:root`, `html`, `html:root`) count;
//! descendant selectors, negations and rules nested in at-rules never apply to
//! the root element and are skipped. Values come back in lightningcss's
//! serialization, so `0.5s` may read as `.5s`.

use std::collections::HashMap;

use lightningcss::printer::PrinterOptions;
use lightningcss::properties::Property;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::traits::ToCss;
use tracing::debug;

const ROOT_SELECTORS: [&str; 3] = [":root", "html", "html:root"];

/// Collect `--*` declarations that land on the document element. Later
/// declarations win, `!important` ones last.
pub fn root_custom_properties(css: &str, into: &mut HashMap<String, String>) {
    let options = ParserOptions {
        error_recovery: true,
        ..ParserOptions::default()
    };
    let sheet = match StyleSheet::parse(css, options) {
        Ok(sheet) => sheet,
        Err(err) => {
            debug!(%err, "unparseable style block skipped");
            return;
        }
    };

    for rule in &sheet.rules.0 {
        let CssRule::Style(style) = rule else {
            continue;
        };
        let selectors = match style.selectors.to_css_string(PrinterOptions::default()) {
            Ok(selectors) => selectors,
            Err(err) => {
                debug!(%err, "unprintable selector skipped");
                continue;
            }
        };
        if !targets_root(&selectors) {
            continue;
        }
        let block = &style.declarations;
        for property in block
            .declarations
            .iter()
            .chain(block.important_declarations.iter())
        {
            if let Some((name, value)) = custom_property(property) {
                into.insert(name, value);
            }
        }
    }
}

fn custom_property(property: &Property<'_>) -> Option<(String, String)> {
    let name = property.property_id().name().to_string();
    if !name.starts_with("--") {
        return None;
    }
    let value = property
        .value_to_css_string(PrinterOptions::default())
        .ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| (name, value.to_string()))
}

/// True when one entry of a serialized selector list is a root selector.
fn targets_root(selectors: &str) -> bool {
    split_selector_list(selectors)
        .into_iter()
        .any(|selector| ROOT_SELECTORS.contains(&selector.to_ascii_lowercase().as_str()))
}

/// Split on commas outside parentheses, so `:is(a, b)` stays whole.
fn split_selector_list(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in list.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(list[start..].trim());
    parts
}
