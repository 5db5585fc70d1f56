//! Types for the category tree

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Slug of the catch-all category
pub const PROTECTED_SLUG: &str = "other";

/// Title of the catch-all category
pub const PROTECTED_TITLE: &str = "سلعة أخرى";

fn default_true() -> bool {
    true
}

/// A node of the category forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The category ID
    pub id: u64,

    /// Display title
    #[serde(default)]
    pub title: String,

    /// Icon name
    pub icon: Option<String>,

    /// Parent ID; `None` for roots
    pub parent_id: Option<u64>,

    /// URL slug
    pub slug: Option<String>,

    /// Whether ads can be filed under it
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Child categories
    #[serde(default)]
    pub children: Vec<Category>,
}

impl Category {
    /// The catch-all category cannot be edited or deleted from here
    pub fn is_protected(&self) -> bool {
        self.slug.as_deref() == Some(PROTECTED_SLUG) || self.title == PROTECTED_TITLE
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// `GET /admin/categories` returns either a bare array or `{data: [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CategoryList {
    Bare(Vec<Category>),
    Wrapped { data: Vec<Category> },
}

impl From<CategoryList> for Vec<Category> {
    fn from(list: CategoryList) -> Self {
        match list {
            CategoryList::Bare(roots) | CategoryList::Wrapped { data: roots } => roots,
        }
    }
}

/// One row of the flattened tree
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleNode<'a> {
    pub category: &'a Category,
    pub depth: usize,
    pub expanded: bool,
}

impl VisibleNode<'_> {
    pub fn has_children(&self) -> bool {
        self.category.has_children()
    }
}

/// Category forest with per-node expansion state
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    roots: Vec<Category>,
    expanded: HashSet<u64>,
}

impl CategoryTree {
    pub fn new(roots: Vec<Category>) -> Self {
        Self {
            roots,
            expanded: HashSet::new(),
        }
    }

    /// Root categories
    pub fn roots(&self) -> &[Category] {
        &self.roots
    }

    /// Replace the forest, keeping the expansion state
    pub fn replace(&mut self, roots: Vec<Category>) {
        self.roots = roots;
    }

    /// Flip a node between expanded and collapsed
    pub fn toggle(&mut self, id: u64) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn is_expanded(&self, id: u64) -> bool {
        self.expanded.contains(&id)
    }

    /// Depth-first search for `id`
    pub fn find(&self, id: u64) -> Option<&Category> {
        let mut stack: Vec<&Category> = self.roots.iter().collect();
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }

    /// Rows to render: roots, and children of expanded nodes, in tree order
    pub fn visible_nodes(&self) -> Vec<VisibleNode<'_>> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.collect_visible(root, 0, &mut out);
        }
        out
    }

    fn collect_visible<'a>(
        &'a self,
        node: &'a Category,
        depth: usize,
        out: &mut Vec<VisibleNode<'a>>,
    ) {
        let expanded = self.is_expanded(node.id);
        out.push(VisibleNode {
            category: node,
            depth,
            expanded,
        });
        if expanded {
            for child in &node.children {
                self.collect_visible(child, depth + 1, out);
            }
        }
    }

    /// Number of categories in the forest
    pub fn len(&self) -> usize {
        fn count(nodes: &[Category]) -> usize {
            nodes.iter().map(|node| 1 + count(&node.children)).sum()
        }
        count(&self.roots)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Body of the create and update calls
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CategoryForm {
    pub title: String,
    pub icon: String,
    pub parent_id: Option<u64>,
}

impl CategoryForm {
    /// Empty form, optionally under `parent_id`
    pub fn new(parent_id: Option<u64>) -> Self {
        Self {
            parent_id,
            ..Self::default()
        }
    }

    /// Form pre-filled from an existing category
    pub fn from_category(category: &Category) -> Self {
        Self {
            title: category.title.clone(),
            icon: category.icon.clone().unwrap_or_default(),
            parent_id: category.parent_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn forest() -> Vec<Category> {
        serde_json::from_value(json!([
            {
                "id": 1, "title": "Vehicles", "icon": "car", "parent_id": null, "slug": "vehicles",
                "children": [
                    {"id": 5, "title": "Cars", "parent_id": 1, "children": [
                        {"id": 9, "title": "Sedans", "parent_id": 5}
                    ]},
                    {"id": 6, "title": "Bikes", "parent_id": 1, "is_active": false}
                ]
            },
            {"id": 2, "title": "سلعة أخرى", "slug": "misc", "parent_id": null},
            {"id": 3, "title": "Other", "slug": "other", "parent_id": null}
        ]))
        .unwrap()
    }

    #[test]
    fn collapsed_tree_shows_only_roots() {
        let tree = CategoryTree::new(forest());
        let ids: Vec<u64> = tree.visible_nodes().iter().map(|n| n.category.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn expanding_descends_one_level_at_a_time() {
        let mut tree = CategoryTree::new(forest());
        tree.toggle(1);
        let rows: Vec<(u64, usize)> = tree
            .visible_nodes()
            .iter()
            .map(|n| (n.category.id, n.depth))
            .collect();
        assert_eq!(rows, vec![(1, 0), (5, 1), (6, 1), (2, 0), (3, 0)]);

        tree.toggle(5);
        let rows: Vec<u64> = tree.visible_nodes().iter().map(|n| n.category.id).collect();
        assert_eq!(rows, vec![1, 5, 9, 6, 2, 3]);

        tree.toggle(1);
        assert!(!tree.is_expanded(1));
        assert!(tree.is_expanded(5));
        assert_eq!(tree.visible_nodes().len(), 3);
    }

    #[test]
    fn expansion_survives_replace() {
        let mut tree = CategoryTree::new(forest());
        tree.toggle(1);
        tree.replace(forest());
        assert!(tree.is_expanded(1));
        assert_eq!(tree.visible_nodes().len(), 5);
    }

    #[test]
    fn find_reaches_nested_nodes() {
        let tree = CategoryTree::new(forest());
        assert_eq!(tree.find(9).map(|c| c.title.as_str()), Some("Sedans"));
        assert!(tree.find(42).is_none());
        assert!(!tree.find(6).unwrap().is_active);
        assert!(tree.find(5).unwrap().is_active);
    }

    #[test]
    fn catch_all_is_protected_by_slug_or_title() {
        let tree = CategoryTree::new(forest());
        assert!(tree.find(2).unwrap().is_protected());
        assert!(tree.find(3).unwrap().is_protected());
        assert!(!tree.find(1).unwrap().is_protected());
    }

    #[test]
    fn list_accepts_wrapped_shape() {
        let list: CategoryList =
            serde_json::from_value(json!({"data": [{"id": 1, "title": "A"}]})).unwrap();
        let roots: Vec<Category> = list.into();
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn edit_form_blanks_missing_icon() {
        let tree = CategoryTree::new(forest());
        let form = CategoryForm::from_category(tree.find(5).unwrap());
        assert_eq!(form.title, "Cars");
        assert_eq!(form.icon, "");
        assert_eq!(form.parent_id, Some(1));
        assert_eq!(
            serde_json::to_value(CategoryForm::new(Some(5))).unwrap(),
            json!({"title": "", "icon": "", "parent_id": 5})
        );
    }
}
