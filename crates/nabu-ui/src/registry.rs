use std::collections::HashMap;

use nabu_markup::ElementKind;

use crate::widget::WidgetId;

/// Name-indexed lookup over compiled widgets: one map per element kind plus
/// one map across all kinds. A later element with the same name replaces the
/// earlier one in every map it belongs to; the earlier handle stays alive in
/// the arena but can no longer be found by name.
#[derive(Debug)]
pub struct ElementRegistry {
    all: HashMap<String, WidgetId>,
    by_kind: [HashMap<String, WidgetId>; ElementKind::ALL.len()],
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self {
            all: HashMap::new(),
            by_kind: std::array::from_fn(|_| HashMap::new()),
        }
    }

    /// Registers `id` under `name`. Returns the id it displaced from the
    /// global map, if any.
    pub fn insert(&mut self, name: &str, kind: ElementKind, id: WidgetId) -> Option<WidgetId> {
        self.by_kind[kind.index()].insert(name.to_string(), id);
        self.all.insert(name.to_string(), id)
    }

    pub fn get(&self, name: &str) -> Option<WidgetId> {
        self.all.get(name).copied()
    }

    pub fn get_kind(&self, kind: ElementKind, name: &str) -> Option<WidgetId> {
        self.by_kind[kind.index()].get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.all.contains_key(name)
    }

    /// Every `(name, id)` registered for `kind`, in no particular order.
    pub fn iter_kind(&self, kind: ElementKind) -> impl Iterator<Item = (&str, WidgetId)> {
        self.by_kind[kind.index()].iter().map(|(n, id)| (n.as_str(), *id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, WidgetId)> {
        self.all.iter().map(|(n, id)| (n.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn len_kind(&self, kind: ElementKind) -> usize {
        self.by_kind[kind.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty() && self.by_kind.iter().all(HashMap::is_empty)
    }

    /// Calls `unbind` once for every registered id, then empties every map.
    pub fn clear_all(&mut self, mut unbind: impl FnMut(WidgetId)) {
        let mut seen: Vec<WidgetId> = self.all.values().copied().collect();
        for map in &self.by_kind {
            seen.extend(map.values().copied());
        }
        seen.sort_unstable();
        seen.dedup();
        for id in seen {
            unbind(id);
        }
        self.all.clear();
        for map in &mut self.by_kind {
            map.clear();
        }
    }
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}
