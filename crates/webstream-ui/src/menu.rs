//! Menu stack — screens of activatable items, only the top one visible.

use crate::action::MenuCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    label: String,
    command: MenuCommand,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, command: MenuCommand) -> Self {
        Self {
            label: label.into(),
            command,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn command(&self) -> MenuCommand {
        self.command
    }
}

/// One menu page.  The cursor is always on an item, or 0 when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub title: String,
    items: Vec<MenuItem>,
    selected: usize,
}

impl Screen {
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            title: title.into(),
            items,
            selected: 0,
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.items.get(self.selected)
    }

    /// Replace the items, keeping the cursor where it was if it still fits.
    pub fn set_items(&mut self, items: Vec<MenuItem>) {
        self.items = items;
        self.clamp();
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index;
        self.clamp();
    }

    /// Move the cursor by `delta`, stopping at either end.  Returns true if
    /// the cursor moved.
    pub fn move_by(&mut self, delta: i32) -> bool {
        if self.items.is_empty() || delta == 0 {
            return false;
        }
        let last = self.items.len() - 1;
        let target = if delta < 0 {
            self.selected.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (self.selected + delta as usize).min(last)
        };
        let moved = target != self.selected;
        self.selected = target;
        moved
    }

    fn clamp(&mut self) {
        if self.items.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.items.len() {
            self.selected = self.items.len() - 1;
        }
    }
}

/// Ordered screens, index 0 is the root.  Empty only before the first push.
#[derive(Debug, Default)]
pub struct MenuStack {
    screens: Vec<Screen>,
}

impl MenuStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mut screen: Screen) {
        screen.selected = 0;
        self.screens.push(screen);
    }

    /// Remove the top screen.  No-op (returns false) at depth 1 or below.
    pub fn pop(&mut self) -> bool {
        if self.screens.len() <= 1 {
            return false;
        }
        self.screens.pop();
        true
    }

    pub fn pop_to_root(&mut self) {
        self.screens.truncate(1);
    }

    pub fn current(&self) -> Option<&Screen> {
        self.screens.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Screen> {
        self.screens.last_mut()
    }

    pub fn root(&self) -> Option<&Screen> {
        self.screens.first()
    }

    pub fn root_mut(&mut self) -> Option<&mut Screen> {
        self.screens.first_mut()
    }

    pub fn depth(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn clear(&mut self) {
        self.screens.clear();
    }

    /// Rebuild the root in place: new title and items, cursor clamped.  Any
    /// screens above it are left alone.  Pushes a fresh root if empty.
    pub fn replace_root(&mut self, title: impl Into<String>, items: Vec<MenuItem>) {
        match self.screens.first_mut() {
            Some(root) => {
                root.title = title.into();
                root.set_items(items);
            }
            None => self.push(Screen::new(title, items)),
        }
    }
}
