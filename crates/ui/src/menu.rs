//! Menu definitions and the item → target side table.
//!
//! A [`MenuDefinition`] only knows its title and labels. Where an item
//! leads lives in a separate link table keyed by `(menu id, item label)`,
//! so the same definitions can be wired differently in different contexts.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::controller::TextRequest;
use crate::navigation::NavError;

/// Identifier of the root menu
pub const ROOT_MENU: &str = "main";

/// Longest title the title bar can show
pub const TITLE_MAX_CHARS: usize = 15;

/// A named menu with an ordered item list. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuDefinition {
    id: String,
    title: String,
    items: Vec<String>,
}

impl MenuDefinition {
    /// Create a menu. The title is cut to [`TITLE_MAX_CHARS`] characters.
    pub fn new(id: &str, title: &str, items: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.chars().take(TITLE_MAX_CHARS).collect(),
            items: items.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Title bar text
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Item labels, in display order
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the menu has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Every menu the device knows, by identifier.
#[derive(Debug, Clone, Default)]
pub struct MenuSet {
    menus: BTreeMap<String, MenuDefinition>,
}

impl MenuSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a menu, replacing any previous definition with the same id.
    #[must_use]
    pub fn with(mut self, menu: MenuDefinition) -> Self {
        self.menus.insert(menu.id.clone(), menu);
        self
    }

    /// Look up a menu
    pub fn get(&self, id: &str) -> Option<&MenuDefinition> {
        self.menus.get(id)
    }

    /// Whether `id` is defined
    pub fn contains(&self, id: &str) -> bool {
        self.menus.contains_key(id)
    }

    /// Iterate over all menus, ordered by id
    pub fn iter(&self) -> impl Iterator<Item = &MenuDefinition> {
        self.menus.values()
    }
}

/// Where activating an item leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<A> {
    /// Descend into another menu
    Submenu(String),
    /// Ask for text first, then hand the text to the action
    Input {
        /// What to ask for
        request: TextRequest,
        /// Action that receives the entered text
        action: A,
    },
    /// Run a leaf action immediately
    Action(A),
}

/// A validated menu set plus its link table.
#[derive(Debug, Clone)]
pub struct MenuTree<A> {
    menus: MenuSet,
    links: BTreeMap<(String, String), Target<A>>,
}

impl<A> MenuTree<A> {
    /// Start a tree over `menus` with no links.
    pub fn new(menus: MenuSet) -> Self {
        Self {
            menus,
            links: BTreeMap::new(),
        }
    }

    /// Wire `(menu, item)` to `target`.
    #[must_use]
    pub fn link(mut self, menu: &str, item: &str, target: Target<A>) -> Self {
        self.links
            .insert((menu.to_string(), item.to_string()), target);
        self
    }

    /// Check that the tree is usable: the root exists, no menu is empty,
    /// and every link refers to a real menu, item and submenu.
    pub fn validate(&self) -> Result<(), NavError> {
        if !self.menus.contains(ROOT_MENU) {
            return Err(NavError::UnknownMenu);
        }
        if self.menus.iter().any(MenuDefinition::is_empty) {
            return Err(NavError::EmptyMenu);
        }
        for ((menu, item), target) in &self.links {
            let def = self.menus.get(menu).ok_or(NavError::UnknownMenu)?;
            if !def.items().iter().any(|i| i == item) {
                return Err(NavError::UnknownItem);
            }
            if let Target::Submenu(child) = target {
                if !self.menus.contains(child) {
                    return Err(NavError::UnknownMenu);
                }
            }
        }
        Ok(())
    }

    /// The menu definitions
    pub fn menus(&self) -> &MenuSet {
        &self.menus
    }

    /// Target for an item, if it has one
    pub fn target(&self, menu: &str, item: &str) -> Option<&Target<A>> {
        self.links.get(&(menu.to_string(), item.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_cut_to_budget() {
        let m = MenuDefinition::new("x", "A Very Long Menu Title", &["a"]);
        assert_eq!(m.title(), "A Very Long Men");
    }

    #[test]
    fn test_validate_requires_root() {
        let tree: MenuTree<()> = MenuTree::new(MenuSet::new().with(MenuDefinition::new(
            "other",
            "Other",
            &["a"],
        )));
        assert_eq!(tree.validate(), Err(NavError::UnknownMenu));
    }

    #[test]
    fn test_validate_rejects_dangling_submenu() {
        let tree: MenuTree<()> =
            MenuTree::new(MenuSet::new().with(MenuDefinition::new("main", "Main", &["Go"])))
                .link("main", "Go", Target::Submenu("missing".into()));
        assert_eq!(tree.validate(), Err(NavError::UnknownMenu));
    }

    #[test]
    fn test_validate_rejects_link_to_unknown_item() {
        let tree = MenuTree::new(MenuSet::new().with(MenuDefinition::new("main", "Main", &["Go"])))
            .link("main", "Stop", Target::Action(1u8));
        assert_eq!(tree.validate(), Err(NavError::UnknownItem));
    }

    #[test]
    fn test_validate_rejects_empty_menu() {
        let tree: MenuTree<()> = MenuTree::new(
            MenuSet::new()
                .with(MenuDefinition::new("main", "Main", &["Go"]))
                .with(MenuDefinition::new("empty", "Empty", &[])),
        );
        assert_eq!(tree.validate(), Err(NavError::EmptyMenu));
    }
}
