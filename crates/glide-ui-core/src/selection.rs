use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::keymap;
use std::collections::BTreeSet;

/// Actions produced by selection-capable widgets.
///
/// Widgets never touch the system clipboard. They emit `CopyRequested(String)` and the app decides
/// what to do with the text (see the `clipboard` feature for a ready-made adapter).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionAction {
    None,
    Redraw,
    CopyRequested(String),
}

/// Key bindings for selection interactions.
///
/// - `y` requests copying the current selection
/// - `Space` toggles the row under the cursor
/// - `Ctrl+a` toggles every row on the current page
/// - `Esc` clears the selection
#[derive(Clone, Debug)]
pub struct SelectionBindings {
    pub copy: Vec<KeyEvent>,
    pub toggle: Vec<KeyEvent>,
    pub toggle_all: Vec<KeyEvent>,
    pub clear: Vec<KeyEvent>,
}

impl Default for SelectionBindings {
    fn default() -> Self {
        Self {
            copy: vec![keymap::key_char('y')],
            toggle: vec![keymap::key_char(' ')],
            toggle_all: vec![keymap::key_ctrl('a')],
            clear: vec![KeyEvent::new(KeyCode::Esc)],
        }
    }
}

impl SelectionBindings {
    pub fn is_copy(&self, key: &KeyEvent) -> bool {
        self.copy.iter().any(|p| keymap::key_event_matches(p, key))
    }

    pub fn is_toggle(&self, key: &KeyEvent) -> bool {
        self.toggle.iter().any(|p| keymap::key_event_matches(p, key))
    }

    pub fn is_toggle_all(&self, key: &KeyEvent) -> bool {
        self.toggle_all
            .iter()
            .any(|p| keymap::key_event_matches(p, key))
    }

    pub fn is_clear(&self, key: &KeyEvent) -> bool {
        self.clear.iter().any(|p| keymap::key_event_matches(p, key))
    }
}

/// Stable identity of a row, independent of where sorting or paging puts it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(pub u64);

/// Header checkbox state for a set of rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Indeterminate,
    Checked,
}

impl CheckState {
    pub fn glyph(self) -> &'static str {
        match self {
            CheckState::Unchecked => "[ ]",
            CheckState::Indeterminate => "[-]",
            CheckState::Checked => "[x]",
        }
    }
}

/// Set of selected rows keyed by [`RowId`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowSelection {
    selected: BTreeSet<RowId>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.selected.iter().copied()
    }

    pub fn set(&mut self, id: RowId, on: bool) {
        if on {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
    }

    pub fn toggle(&mut self, id: RowId) {
        let on = !self.is_selected(id);
        self.set(id, on);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Selects all of `ids` unless every one is already selected, in which case they are cleared.
    pub fn toggle_all(&mut self, ids: &[RowId]) {
        let all = self.check_state(ids) == CheckState::Checked;
        for id in ids {
            self.set(*id, !all);
        }
    }

    pub fn check_state(&self, ids: &[RowId]) -> CheckState {
        let n = ids.iter().filter(|id| self.is_selected(**id)).count();
        if n == 0 {
            CheckState::Unchecked
        } else if n == ids.len() {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    /// Drops ids that are no longer present.
    pub fn retain(&mut self, mut present: impl FnMut(RowId) -> bool) {
        self.selected.retain(|id| present(*id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_all_selects_then_clears() {
        let ids = [RowId(1), RowId(2), RowId(3)];
        let mut s = RowSelection::new();
        s.toggle(RowId(2));
        assert_eq!(s.check_state(&ids), CheckState::Indeterminate);
        s.toggle_all(&ids);
        assert_eq!(s.check_state(&ids), CheckState::Checked);
        s.toggle_all(&ids);
        assert!(s.is_empty());
    }

    #[test]
    fn retain_drops_removed_rows() {
        let mut s = RowSelection::new();
        s.set(RowId(1), true);
        s.set(RowId(2), true);
        s.retain(|id| id != RowId(1));
        assert_eq!(s.ids().collect::<Vec<_>>(), vec![RowId(2)]);
    }

    #[test]
    fn default_bindings() {
        let b = SelectionBindings::default();
        assert!(b.is_copy(&keymap::key_char('y')));
        assert!(b.is_toggle(&keymap::key_char(' ')));
        assert!(b.is_toggle_all(&keymap::key_ctrl('a')));
        assert!(b.is_clear(&KeyEvent::new(KeyCode::Esc)));
    }
}
