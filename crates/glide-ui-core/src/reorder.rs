//! Drag-to-reorder for ordered collections.
//!
//! Pointer drag libraries report a drop as "item `active` was released over item `over`". This
//! module turns that report into a move, and offers a keyboard adapter (Alt+arrow) that produces
//! the same reports.
use crate::input::KeyCode;
use crate::input::KeyEvent;

/// A completed drag: `active` was dropped over `over`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragEnd<Id> {
    pub active: Id,
    pub over: Option<Id>,
}

/// A collection whose items can be reordered by id.
pub trait Reorderable {
    type Id: PartialEq + Clone;

    /// Ids of the items participating in sorting, in display order.
    fn sortable_ids(&self) -> Vec<Self::Id>;

    /// Whether `id` may be picked up or used as a drop target.
    fn can_drag(&self, _id: &Self::Id) -> bool {
        true
    }
}

/// Resolves a drag into `(from, to)` positions within `sortable_ids`.
///
/// Returns `None` for drops outside the list, drops onto self, and drags involving an item that
/// cannot be dragged.
pub fn resolve_drag_end<R: Reorderable + ?Sized>(
    list: &R,
    drag: &DragEnd<R::Id>,
) -> Option<(usize, usize)> {
    let over = drag.over.as_ref()?;
    if *over == drag.active {
        return None;
    }
    if !list.can_drag(&drag.active) || !list.can_drag(over) {
        return None;
    }
    let ids = list.sortable_ids();
    let from = ids.iter().position(|id| *id == drag.active)?;
    let to = ids.iter().position(|id| id == over)?;
    Some((from, to))
}

/// Moves the element at `from` to `to`, shifting the elements in between.
pub fn array_move<T>(items: &mut [T], from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
}

/// Keyboard adapter: Alt+Left/Up moves the focused item back one slot, Alt+Right/Down forward.
pub fn keyboard_drag<R: Reorderable + ?Sized>(
    list: &R,
    focused: &R::Id,
    key: &KeyEvent,
) -> Option<DragEnd<R::Id>> {
    if !key.modifiers.alt {
        return None;
    }
    let forward = match key.code {
        KeyCode::Right | KeyCode::Down => true,
        KeyCode::Left | KeyCode::Up => false,
        _ => return None,
    };
    let ids = list.sortable_ids();
    let at = ids.iter().position(|id| id == focused)?;
    let target = if forward {
        ids.iter().skip(at + 1).find(|id| list.can_drag(id))
    } else {
        ids[..at].iter().rev().find(|id| list.can_drag(id))
    };
    let target = target?;
    Some(DragEnd {
        active: focused.clone(),
        over: Some(target.clone()),
    })
}
