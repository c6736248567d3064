//! Depth-first ordering of the navigation tree.
//!
//! Subpages of `root`, `footer` and `meta` pages are stored in the shared
//! `page` bucket, so a walk that starts in one of those buckets switches to
//! `page` as soon as it descends.

use indexmap::IndexMap;
use nav_source::PageType;

use crate::node::{NavNode, NavTree};

static PAGE_BUCKET: PageType = PageType::Page;

/// Page id and full URL, in navigation order.
pub type OrderEntry<'a> = (u32, &'a str);

/// Walk `tree` pre-order starting at the `(page_type, parent_id)` bucket.
///
/// Siblings keep their stored order. A missing start bucket yields an empty
/// order.
#[must_use]
pub fn linearize<'a>(tree: &'a NavTree, page_type: &PageType, parent_id: u32) -> Vec<OrderEntry<'a>> {
    let mut order = Vec::new();
    let Some((start_type, start)) = tree.bucket(page_type, parent_id) else {
        return order;
    };

    let mut stack: Vec<(&'a PageType, indexmap::map::Values<'a, u32, NavNode>)> =
        vec![(start_type, start.values())];

    while let Some((current_type, siblings)) = stack.last_mut() {
        let current_type: &'a PageType = *current_type;
        let Some(node) = siblings.next() else {
            stack.pop();
            continue;
        };

        order.push((node.page_id, node.full_url.as_str()));

        let grafted = if current_type.grafts_children() {
            tree.bucket(&PAGE_BUCKET, node.page_id)
        } else {
            None
        };
        if let Some((next_type, children)) =
            grafted.or_else(|| tree.bucket(current_type, node.page_id))
        {
            stack.push((next_type, children.values()));
        }
    }

    order
}

/// Linearize every top-level type bucket present in `tree`.
///
/// Buckets appear in the tree's first-seen type order.
#[must_use]
pub fn linearize_all(tree: &NavTree) -> IndexMap<&PageType, Vec<OrderEntry<'_>>> {
    tree.types()
        .map(|page_type| (page_type, linearize(tree, page_type, 0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::node::TreeType;

    fn node(page_id: u32, full_url: &str) -> NavNode {
        NavNode {
            page_id,
            url: String::new(),
            full_url: full_url.to_owned(),
            title: String::new(),
            navigation_title: String::new(),
            has_extra: false,
            no_follow: false,
            hidden: false,
            extra_blocks: None,
            has_children: false,
            tree_type: TreeType::Page,
            redirect: None,
        }
    }

    fn ids(order: &[OrderEntry<'_>]) -> Vec<u32> {
        order.iter().map(|(id, _)| *id).collect()
    }

    fn create_tree() -> NavTree {
        let mut tree = NavTree::new();
        tree.insert(PageType::Page, 0, node(1, "/"));
        tree.insert(PageType::Page, 1, node(2, "/about"));
        tree.insert(PageType::Page, 2, node(4, "/about/team"));
        tree.insert(PageType::Page, 1, node(3, "/contact"));
        tree.insert(PageType::Root, 0, node(5, "/landing"));
        tree.insert(PageType::Page, 5, node(6, "/landing/offer"));
        tree.insert(PageType::Page, 6, node(7, "/landing/offer/terms"));
        tree.insert(PageType::Footer, 0, node(8, "/legal"));
        tree
    }

    #[test]
    fn test_page_walk_pre_order() {
        let tree = create_tree();
        let order = linearize(&tree, &PageType::Page, 0);

        assert_eq!(ids(&order), vec![1, 2, 4, 3]);
        assert_eq!(order[2], (4, "/about/team"));
    }

    #[test]
    fn test_root_children_grafted_from_page_bucket() {
        let tree = create_tree();
        let order = linearize(&tree, &PageType::Root, 0);

        assert_eq!(ids(&order), vec![5, 6, 7]);
    }

    #[test]
    fn test_grafted_children_not_reached_from_page_root() {
        let tree = create_tree();
        let order = linearize(&tree, &PageType::Page, 0);

        assert!(!ids(&order).contains(&6));
    }

    #[test]
    fn test_own_bucket_used_without_page_children() {
        let mut tree = create_tree();
        tree.insert(PageType::Footer, 8, node(9, "/legal/cookies"));

        let order = linearize(&tree, &PageType::Footer, 0);
        assert_eq!(ids(&order), vec![8, 9]);
    }

    #[test]
    fn test_page_bucket_preferred_over_own_bucket() {
        let mut tree = create_tree();
        tree.insert(PageType::Footer, 8, node(9, "/legal/cookies"));
        tree.insert(PageType::Page, 8, node(10, "/legal/privacy"));

        let order = linearize(&tree, &PageType::Footer, 0);
        assert_eq!(ids(&order), vec![8, 10]);
    }

    #[test]
    fn test_other_type_not_grafted() {
        let sidebar = PageType::Other("sidebar".to_owned());
        let mut tree = NavTree::new();
        tree.insert(sidebar.clone(), 0, node(20, "/aside"));
        tree.insert(PageType::Page, 20, node(21, "/aside/one"));
        tree.insert(sidebar.clone(), 20, node(22, "/aside/two"));

        let order = linearize(&tree, &sidebar, 0);
        assert_eq!(ids(&order), vec![20, 22]);
    }

    #[test]
    fn test_missing_bucket_is_empty() {
        let tree = create_tree();
        assert!(linearize(&tree, &PageType::Meta, 0).is_empty());
        assert!(linearize(&NavTree::new(), &PageType::Page, 0).is_empty());
    }

    #[test]
    fn test_deep_tree_does_not_recurse() {
        let mut tree = NavTree::new();
        tree.insert(PageType::Page, 0, node(1, "/"));
        for id in 2..5_000 {
            tree.insert(PageType::Page, id - 1, node(id, "/deep"));
        }

        assert_eq!(linearize(&tree, &PageType::Page, 0).len(), 4_999);
    }

    #[test]
    fn test_linearize_all_per_type() {
        let tree = create_tree();
        let orders = linearize_all(&tree);

        let types: Vec<&PageType> = orders.keys().copied().collect();
        assert_eq!(types, vec![&PageType::Page, &PageType::Root, &PageType::Footer]);
        assert_eq!(ids(&orders[&PageType::Footer]), vec![8]);
    }
}
