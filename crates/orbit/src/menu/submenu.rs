//! Submenu navigation.
//!
//! Only one submenu ring is ever shown. It is addressed by the path of indices that leads from
//! the root items to its parent, and the path length is the navigation depth.

use super::MAX_SUBMENU_DEPTH;
use super::item::{ItemId, MenuItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSubmenu {
    path: Vec<usize>,
    pub hovered: Option<usize>,
}

impl ActiveSubmenu {
    /// Index path from the root items to the parent of the shown ring. Never empty.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Main-ring slot the whole chain hangs off.
    pub fn root_slot(&self) -> usize {
        self.path[0]
    }

    /// Slot of the parent inside the ring one level up.
    pub fn parent_slot(&self) -> usize {
        self.path[self.path.len() - 1]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    pub parent_slot: usize,
    pub depth: usize,
    /// A different submenu was shown before and got replaced.
    pub replaced: bool,
}

#[derive(Debug, Clone)]
pub struct SubmenuStack {
    max_depth: usize,
    active: Option<ActiveSubmenu>,
}

impl Default for SubmenuStack {
    fn default() -> Self {
        Self::new(MAX_SUBMENU_DEPTH)
    }
}

fn children_at<'a>(root: &'a [MenuItem], path: &[usize]) -> Option<&'a [MenuItem]> {
    path.iter()
        .try_fold(root, |items, &i| items.get(i).map(|item| item.children.as_slice()))
}

fn children_at_mut<'a>(root: &'a mut [MenuItem], path: &[usize]) -> Option<&'a mut [MenuItem]> {
    let mut items = root;
    for &i in path {
        items = items.get_mut(i)?.children.as_mut_slice();
    }
    Some(items)
}

fn position_with_children(items: &[MenuItem], id: &ItemId) -> Option<usize> {
    items
        .iter()
        .position(|item| &item.id == id && item.has_submenu())
}

impl SubmenuStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            active: None,
        }
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn depth(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.path.len())
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveSubmenu> {
        self.active.as_ref()
    }

    pub fn set_hovered(&mut self, hovered: Option<usize>) {
        if let Some(active) = &mut self.active {
            active.hovered = hovered;
        }
    }

    /// Items of the shown submenu ring.
    pub fn items<'a>(&self, root: &'a [MenuItem]) -> Option<&'a [MenuItem]> {
        children_at(root, &self.active.as_ref()?.path)
    }

    pub fn items_mut<'a>(&self, root: &'a mut [MenuItem]) -> Option<&'a mut [MenuItem]> {
        children_at_mut(root, &self.active.as_ref()?.path)
    }

    /// Opens the submenu of the item `id`.
    ///
    /// A child of the shown submenu descends one level, refused once `max_depth` is reached.
    /// A main-ring item restarts navigation at depth 1. Items without children and unknown ids
    /// change nothing.
    pub fn open(&mut self, root: &[MenuItem], id: &ItemId) -> Option<Opened> {
        if self.max_depth == 0 {
            return None;
        }

        if let Some(active) = &mut self.active
            && let Some(index) =
                children_at(root, &active.path).and_then(|items| position_with_children(items, id))
        {
            if active.path.len() >= self.max_depth {
                return None;
            }
            active.path.push(index);
            active.hovered = None;
            return Some(Opened {
                parent_slot: index,
                depth: active.path.len(),
                replaced: true,
            });
        }

        let index = position_with_children(root, id)?;
        let replaced = self
            .active
            .replace(ActiveSubmenu {
                path: vec![index],
                hovered: None,
            })
            .is_some_and(|previous| previous.path != [index]);
        Some(Opened {
            parent_slot: index,
            depth: 1,
            replaced,
        })
    }

    /// Closes the shown ring and resets the depth. Returns whether anything was open.
    pub fn close(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Leaves submenu navigation entirely. Closing is flat, there is no partial pop.
    pub fn go_back(&mut self) -> bool {
        self.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(levels: usize) -> Vec<MenuItem> {
        let mut node = MenuItem::new("leaf").with_id("leaf");
        for level in (0..levels).rev() {
            node = MenuItem::new(format!("level {level}"))
                .with_id(format!("l{level}"))
                .with_children(vec![MenuItem::new("sibling"), node]);
        }
        vec![MenuItem::new("plain").with_id("plain"), node]
    }

    #[test]
    fn depth_stops_at_the_maximum() {
        let root = nested(5);
        let mut stack = SubmenuStack::new(3);

        for (level, expected) in [("l0", 1), ("l1", 2), ("l2", 3)] {
            let opened = stack.open(&root, &ItemId::from(level)).unwrap();
            assert_eq!(opened.depth, expected);
            assert_eq!(stack.depth(), expected);
        }

        let before = stack.active().cloned();
        assert_eq!(stack.open(&root, &ItemId::from("l3")), None);
        assert_eq!(stack.depth(), 3);
        assert_eq!(stack.active().cloned(), before);
    }

    #[test]
    fn items_follow_the_path() {
        let root = nested(2);
        let mut stack = SubmenuStack::default();
        assert_eq!(stack.items(&root), None);

        stack.open(&root, &ItemId::from("l0")).unwrap();
        assert_eq!(stack.active().unwrap().path(), &[1]);
        let labels: Vec<_> = stack
            .items(&root)
            .unwrap()
            .iter()
            .map(|i| i.label.as_str())
            .collect();
        assert_eq!(labels, ["sibling", "level 1"]);

        stack.open(&root, &ItemId::from("l1")).unwrap();
        assert_eq!(stack.active().unwrap().path(), &[1, 1]);
        assert_eq!(stack.active().unwrap().root_slot(), 1);
        assert_eq!(stack.items(&root).unwrap()[1].label, "leaf");
    }

    #[test]
    fn leaves_and_unknown_ids_open_nothing() {
        let root = nested(1);
        let mut stack = SubmenuStack::default();
        assert_eq!(stack.open(&root, &ItemId::from("plain")), None);
        assert_eq!(stack.open(&root, &ItemId::from("missing")), None);
        assert!(!stack.is_open());
    }

    #[test]
    fn main_item_restarts_at_depth_one() {
        let mut root = nested(3);
        root.push(
            MenuItem::new("other")
                .with_id("other")
                .with_children(vec![MenuItem::new("x")]),
        );
        let mut stack = SubmenuStack::default();
        stack.open(&root, &ItemId::from("l0")).unwrap();
        stack.open(&root, &ItemId::from("l1")).unwrap();

        let opened = stack.open(&root, &ItemId::from("other")).unwrap();
        assert_eq!(opened.depth, 1);
        assert_eq!(opened.parent_slot, 2);
        assert!(opened.replaced);
    }

    #[test]
    fn close_resets_depth() {
        let root = nested(3);
        let mut stack = SubmenuStack::default();
        stack.open(&root, &ItemId::from("l0")).unwrap();
        stack.open(&root, &ItemId::from("l1")).unwrap();
        assert!(stack.close());
        assert_eq!(stack.depth(), 0);
        assert!(!stack.close());

        let opened = stack.open(&root, &ItemId::from("l0")).unwrap();
        assert_eq!(opened.depth, 1);
        assert!(!opened.replaced);
    }

    #[test]
    fn back_returns_to_the_root() {
        let root = nested(3);
        let mut stack = SubmenuStack::default();
        assert!(!stack.go_back());

        stack.open(&root, &ItemId::from("l0")).unwrap();
        stack.open(&root, &ItemId::from("l1")).unwrap();
        assert!(stack.go_back());
        assert_eq!(stack.depth(), 0);
        assert!(!stack.is_open());
    }

    #[test]
    fn zero_depth_never_opens() {
        let root = nested(1);
        let mut stack = SubmenuStack::new(0);
        assert_eq!(stack.open(&root, &ItemId::from("l0")), None);
    }

    #[test]
    fn items_mut_reaches_the_shown_ring() {
        let mut root = nested(2);
        let mut stack = SubmenuStack::default();
        stack.open(&root, &ItemId::from("l0")).unwrap();
        stack.items_mut(&mut root).unwrap().swap(0, 1);
        assert_eq!(root[1].children[0].label, "level 1");
    }
}
