//! Navigation state machine: the current menu plus a bounded stack of
//! parent frames.
//!
//! The parent stack is capped at 8 frames (the device menus are three deep).
//! Entering a submenu when the stack is full is refused with
//! [`NavError::StackFull`] and leaves the state untouched.

use alloc::string::{String, ToString};

use heapless::Vec;

use crate::controller::TextRequest;
use crate::menu::{MenuDefinition, MenuTree, Target, ROOT_MENU};

/// Menu rows visible at once
pub const VISIBLE_ROWS: usize = 6;

/// Maximum number of saved parent frames
pub const MAX_DEPTH: usize = 8;

/// Snapshot of where the user is inside one menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationFrame {
    /// Menu identifier
    pub menu: String,
    /// Highlighted item
    pub selected: usize,
    /// First visible item
    pub scroll: usize,
}

impl NavigationFrame {
    fn top_of(menu: &str) -> Self {
        Self {
            menu: menu.to_string(),
            selected: 0,
            scroll: 0,
        }
    }
}

/// Navigation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavError {
    /// No menu with that identifier
    UnknownMenu,
    /// A link names an item the menu does not have
    UnknownItem,
    /// A menu has no items
    EmptyMenu,
    /// Parent stack is at [`MAX_DEPTH`]
    StackFull,
}

impl core::fmt::Display for NavError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownMenu => write!(f, "unknown menu"),
            Self::UnknownItem => write!(f, "unknown menu item"),
            Self::EmptyMenu => write!(f, "menu has no items"),
            Self::StackFull => write!(f, "navigation stack full"),
        }
    }
}

/// What activating the highlighted item resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation<A> {
    /// The navigator descended into this submenu
    Entered(String),
    /// The item wants text input before running its action
    Input(TextRequest, A),
    /// Leaf action for an external collaborator
    Action(A),
    /// The item is not wired to anything
    Unbound,
}

/// Re-establish `0 <= selected - scroll < VISIBLE_ROWS` after a move.
pub fn scroll_for(selected: usize, scroll: usize) -> usize {
    if selected < scroll {
        selected
    } else if selected.saturating_sub(scroll) >= VISIBLE_ROWS {
        selected.saturating_sub(VISIBLE_ROWS.saturating_sub(1))
    } else {
        scroll
    }
}

/// The menu navigation stack.
#[derive(Debug, Clone)]
pub struct Navigator<A> {
    tree: MenuTree<A>,
    current: NavigationFrame,
    stack: Vec<NavigationFrame, MAX_DEPTH>,
}

impl<A: Clone> Navigator<A> {
    /// Create a navigator at the top of the root menu.
    pub fn new(tree: MenuTree<A>) -> Result<Self, NavError> {
        tree.validate()?;
        Ok(Self {
            tree,
            current: NavigationFrame::top_of(ROOT_MENU),
            stack: Vec::new(),
        })
    }

    /// The current frame
    pub fn current(&self) -> &NavigationFrame {
        &self.current
    }

    /// Definition of the current menu
    pub fn menu(&self) -> Option<&MenuDefinition> {
        self.tree.menus().get(&self.current.menu)
    }

    /// Number of saved parent frames
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether the root menu is showing
    pub fn at_root(&self) -> bool {
        self.stack.is_empty()
    }

    fn item_count(&self) -> usize {
        self.menu().map_or(0, MenuDefinition::len)
    }

    /// Push the current frame and show `child` from its first item.
    pub fn enter(&mut self, child: &str) -> Result<(), NavError> {
        if !self.tree.menus().contains(child) {
            return Err(NavError::UnknownMenu);
        }
        let next = NavigationFrame::top_of(child);
        let parent = core::mem::replace(&mut self.current, next);
        if let Err(parent) = self.stack.push(parent) {
            self.current = parent;
            return Err(NavError::StackFull);
        }
        Ok(())
    }

    /// Restore the parent frame verbatim. At the root this is a no-op and
    /// returns `false`.
    pub fn back(&mut self) -> bool {
        match self.stack.pop() {
            Some(parent) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    /// Move the highlight by `delta`, clamped to the item list.
    pub fn move_by(&mut self, delta: isize) {
        let count = self.item_count();
        if count == 0 {
            return;
        }
        let last = count.saturating_sub(1);
        let selected = self.current.selected.saturating_add_signed(delta).min(last);
        self.current.selected = selected;
        self.current.scroll = scroll_for(selected, self.current.scroll);
    }

    /// Highlight item `index`.
    ///
    /// An out-of-range index is a caller bug: it asserts in debug builds
    /// and is clamped to the last item otherwise.
    pub fn select(&mut self, index: usize) {
        let count = self.item_count();
        debug_assert!(index < count, "selection {index} out of range ({count} items)");
        let selected = index.min(count.saturating_sub(1));
        self.current.selected = selected;
        self.current.scroll = scroll_for(selected, self.current.scroll);
    }

    /// Label of the highlighted item
    pub fn selected_label(&self) -> Option<&str> {
        self.menu()
            .and_then(|m| m.items().get(self.current.selected))
            .map(String::as_str)
    }

    /// Resolve the highlighted item. Submenu targets are entered here;
    /// input requests and leaf actions are returned for the caller.
    pub fn activate(&mut self) -> Result<Activation<A>, NavError> {
        let Some(label) = self.selected_label() else {
            return Ok(Activation::Unbound);
        };
        let target = self.tree.target(&self.current.menu, label).cloned();
        match target {
            Some(Target::Submenu(child)) => {
                self.enter(&child)?;
                Ok(Activation::Entered(child))
            }
            Some(Target::Input { request, action }) => Ok(Activation::Input(request, action)),
            Some(Target::Action(action)) => Ok(Activation::Action(action)),
            None => Ok(Activation::Unbound),
        }
    }
}
