/// Catalog ordering
///
/// Two orders over catalog nodes. Both pin the category roots first
/// (creatures before equipment) and always order action nodes by their
/// index, whatever the mode.

use std::cmp::Ordering;

use super::data::{CatalogEntry, Category};

/// Ordering applied to the whole catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Entries by body id ascending
    #[default]
    ById,
    /// Entries by name, ordinal byte comparison
    ByName,
}

impl SortMode {
    pub fn toggled(self) -> Self {
        match self {
            SortMode::ById => SortMode::ByName,
            SortMode::ByName => SortMode::ById,
        }
    }
}

/// A node of the catalog tree as seen by the sorter
#[derive(Debug, Clone, Copy)]
pub enum SortNode<'a> {
    Root(Category),
    Entry(&'a CatalogEntry),
    Action(usize),
}

impl SortNode<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortNode::Root(_) => 0,
            SortNode::Entry(_) => 1,
            SortNode::Action(_) => 2,
        }
    }
}

/// Compare two nodes under `mode`
pub fn compare(mode: SortMode, a: &SortNode<'_>, b: &SortNode<'_>) -> Ordering {
    match (a, b) {
        // root -1 before root -2
        (SortNode::Root(x), SortNode::Root(y)) => y.root_tag().cmp(&x.root_tag()),
        (SortNode::Action(x), SortNode::Action(y)) => x.cmp(y),
        (SortNode::Entry(x), SortNode::Entry(y)) => match mode {
            SortMode::ById => x.id.cmp(&y.id).then(x.category.cmp(&y.category)),
            SortMode::ByName => x
                .name
                .as_bytes()
                .cmp(y.name.as_bytes())
                .then(x.id.cmp(&y.id)),
        },
        _ => a.rank().cmp(&b.rank()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::TypeClass;

    fn entry(id: u32, name: &str) -> CatalogEntry {
        CatalogEntry {
            id,
            category: Category::Creature,
            type_class: TypeClass::Monster,
            name: name.to_string(),
            actions: Vec::new(),
            file_name: None,
        }
    }

    #[test]
    fn test_roots_are_pinned_first() {
        let low = entry(0, "");
        for mode in [SortMode::ById, SortMode::ByName] {
            let creature = SortNode::Root(Category::Creature);
            let equipment = SortNode::Root(Category::Equipment);
            assert_eq!(compare(mode, &creature, &equipment), Ordering::Less);
            assert_eq!(compare(mode, &equipment, &creature), Ordering::Greater);
            assert_eq!(compare(mode, &equipment, &SortNode::Entry(&low)), Ordering::Less);
            assert_eq!(compare(mode, &SortNode::Entry(&low), &creature), Ordering::Greater);
        }
    }

    #[test]
    fn test_by_id() {
        let orc = entry(17, "Orc");
        let bear = entry(212, "Bear");
        assert_eq!(
            compare(SortMode::ById, &SortNode::Entry(&orc), &SortNode::Entry(&bear)),
            Ordering::Less
        );
        assert_eq!(
            compare(SortMode::ByName, &SortNode::Entry(&orc), &SortNode::Entry(&bear)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_by_name_is_ordinal() {
        // ordinal: uppercase sorts before lowercase
        let upper = entry(2, "Zombie");
        let lower = entry(1, "apple");
        assert_eq!(
            compare(SortMode::ByName, &SortNode::Entry(&upper), &SortNode::Entry(&lower)),
            Ordering::Less
        );
    }

    #[test]
    fn test_actions_always_by_index() {
        for mode in [SortMode::ById, SortMode::ByName] {
            assert_eq!(
                compare(mode, &SortNode::Action(12), &SortNode::Action(4)),
                Ordering::Greater
            );
        }
    }

    #[test]
    fn test_by_id_sorts_a_list() {
        let entries = [entry(300, "c"), entry(5, "a"), entry(42, "b")];
        let mut nodes: Vec<SortNode<'_>> = entries.iter().map(SortNode::Entry).collect();
        nodes.push(SortNode::Root(Category::Equipment));
        nodes.push(SortNode::Root(Category::Creature));
        nodes.sort_by(|a, b| compare(SortMode::ById, a, b));

        let labels: Vec<i64> = nodes
            .iter()
            .map(|n| match n {
                SortNode::Root(c) => c.root_tag() as i64,
                SortNode::Entry(e) => e.id as i64,
                SortNode::Action(i) => *i as i64,
            })
            .collect();
        assert_eq!(labels, vec![-1, -2, 5, 42, 300]);
    }
}
