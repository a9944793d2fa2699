//! Strip rules applied during normalization
//!
//! Every rule sees each JSON object of the dashboard body exactly once,
//! together with where that object sits in its parent. Rules only remove
//! data; none of them invent keys.

use serde_json::{Map, Value};
use std::fmt;

/// Top-level keys the remote service regenerates on every write
pub const SERVER_MANAGED_KEYS: &[&str] = &["version", "id"];

/// Keys of a library panel reference that belong to the dashboard itself
pub const LIBRARY_PANEL_KEYS: &[&str] = &["name", "uid"];

/// Position of an object inside the tree being walked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent<'a> {
    /// The dashboard body itself
    Root,
    /// The value of an object field with this key
    Field(&'a str),
    /// An element (at any nesting) of an array stored under this key
    Element(&'a str),
}

/// A composable normalization step
pub trait StripRule: Send + Sync + fmt::Debug {
    /// Short identifier used in logs and debugging output
    fn name(&self) -> &'static str;

    /// Remove whatever this rule owns from `object`
    fn strip(&self, parent: Parent<'_>, object: &mut Map<String, Value>);
}

/// Removes server-managed top-level fields (`version`, `id`)
#[derive(Debug, Clone)]
pub struct ServerManagedFields {
    keys: Vec<String>,
}

impl ServerManagedFields {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for ServerManagedFields {
    fn default() -> Self {
        Self::new(SERVER_MANAGED_KEYS.iter().copied())
    }
}

impl StripRule for ServerManagedFields {
    fn name(&self) -> &'static str {
        "server-managed-fields"
    }

    fn strip(&self, parent: Parent<'_>, object: &mut Map<String, Value>) {
        if parent != Parent::Root {
            return;
        }
        for key in &self.keys {
            object.remove(key);
        }
    }
}

/// Trims `panels[].libraryPanel` down to its `name` and `uid`
///
/// The service copies the library panel's description, model and metadata
/// into every dashboard that references it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryPanelRefs;

impl StripRule for LibraryPanelRefs {
    fn name(&self) -> &'static str {
        "library-panel-refs"
    }

    fn strip(&self, parent: Parent<'_>, object: &mut Map<String, Value>) {
        if parent != Parent::Element("panels") {
            return;
        }
        if let Some(Value::Object(library_panel)) = object.get_mut("libraryPanel") {
            library_panel.retain(|key, _| LIBRARY_PANEL_KEYS.contains(&key.as_str()));
        }
    }
}

/// Visit every object in `value`, depth first, parents before children
///
/// The visitor may mutate the object; children are walked after the visit,
/// so anything it removes is not descended into.
pub fn walk_objects_mut(
    value: &mut Value,
    visit: &mut dyn FnMut(Parent<'_>, &mut Map<String, Value>),
) {
    walk(value, Parent::Root, visit);
}

fn walk(
    value: &mut Value,
    parent: Parent<'_>,
    visit: &mut dyn FnMut(Parent<'_>, &mut Map<String, Value>),
) {
    match value {
        Value::Object(map) => {
            visit(parent, map);
            for (key, child) in map.iter_mut() {
                let child_parent = match child {
                    Value::Array(_) => Parent::Element(key),
                    _ => Parent::Field(key),
                };
                walk(child, child_parent, visit);
            }
        }
        Value::Array(items) => {
            // Nested arrays keep the key of the outermost field.
            let element_parent = match parent {
                Parent::Field(key) | Parent::Element(key) => Parent::Element(key),
                Parent::Root => Parent::Root,
            };
            for item in items {
                walk(item, element_parent, visit);
            }
        }
        _ => {}
    }
}
