//! Categories
//!
//! Categories nest one level deep: top-level categories carry children, and
//! children carry none. [`CategoryTree`] keeps every child under the parent its
//! `parent_id` names.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::ids::CategoryId;

/// Category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id
    #[serde(rename = "_id")]
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Category image URL
    #[serde(rename = "categoryImage", default)]
    pub image: String,

    /// Parent category, for child categories
    #[serde(rename = "parentId", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,

    /// URL slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Child categories
    #[serde(default)]
    pub children: Vec<Category>,
}

impl Category {
    /// A top-level category with no children.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: String::new(),
            parent_id: None,
            slug: None,
            children: Vec::new(),
        }
    }

    /// Place this category under `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<CategoryId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Add a child category.
    #[must_use]
    pub fn with_child(mut self, child: Category) -> Self {
        self.children.push(child);
        self
    }
}

/// Two-level category tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTree {
    roots: Vec<Category>,
}

impl CategoryTree {
    /// Build a tree from the gateway's category list.
    ///
    /// The list may be nested, flat, or a mix of both. Every category is
    /// re-homed under the top-level category its `parent_id` names; ones whose
    /// parent cannot be found stay at the top level. Duplicate ids keep their
    /// first occurrence.
    #[must_use]
    pub fn from_categories(categories: Vec<Category>) -> Self {
        let mut flat = Vec::new();
        flatten_into(categories, &mut flat);

        let mut seen: FxHashSet<CategoryId> = FxHashSet::default();
        flat.retain(|category| seen.insert(category.id.clone()));

        let root_ids: FxHashSet<CategoryId> = flat
            .iter()
            .filter(|category| category.parent_id.is_none())
            .map(|category| category.id.clone())
            .collect();

        let (children, mut roots): (Vec<Category>, Vec<Category>) =
            flat.into_iter().partition(|category| {
                category
                    .parent_id
                    .as_ref()
                    .is_some_and(|parent| root_ids.contains(parent))
            });

        for child in children {
            if let Some(parent) = roots
                .iter_mut()
                .find(|root| child.parent_id.as_ref() == Some(&root.id))
            {
                parent.children.push(child);
            }
        }

        Self { roots }
    }

    /// Top-level categories, in gateway order.
    #[must_use]
    pub fn roots(&self) -> &[Category] {
        &self.roots
    }

    /// Iterate over every category, parents before their children.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.roots
            .iter()
            .flat_map(|root| std::iter::once(root).chain(root.children.iter()))
    }

    /// Find a category at either level.
    #[must_use]
    pub fn find(&self, id: &CategoryId) -> Option<&Category> {
        self.iter().find(|category| &category.id == id)
    }

    /// Ids matched when `id` is selected: `id` itself and its direct children.
    #[must_use]
    pub fn selection_ids(&self, id: &CategoryId) -> FxHashSet<CategoryId> {
        let mut ids = FxHashSet::default();
        ids.insert(id.clone());

        if let Some(category) = self.find(id) {
            ids.extend(category.children.iter().map(|child| child.id.clone()));
        }

        ids
    }

    /// Insert a category, or replace the one with the same id.
    ///
    /// The tree is rebuilt afterwards so the category lands under its parent.
    pub fn upsert(&mut self, category: Category) {
        let mut flat = self.flatten();

        match flat.iter_mut().find(|existing| existing.id == category.id) {
            Some(existing) => {
                *existing = Category {
                    children: Vec::new(),
                    ..category
                };
            }
            None => flat.push(Category {
                children: Vec::new(),
                ..category
            }),
        }

        *self = Self::from_categories(flat);
    }

    /// Remove a category, returning it.
    ///
    /// Children of a removed top-level category move to the top level.
    pub fn remove(&mut self, id: &CategoryId) -> Option<Category> {
        let mut flat = self.flatten();
        let index = flat.iter().position(|category| &category.id == id)?;
        let removed = flat.remove(index);

        *self = Self::from_categories(flat);

        Some(removed)
    }

    /// Every category in a flat list, children emptied.
    #[must_use]
    pub fn flatten(&self) -> Vec<Category> {
        let mut flat = Vec::new();
        flatten_into(self.roots.clone(), &mut flat);
        flat
    }

    /// Total number of categories at both levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether the tree has no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether every child sits under the parent its `parent_id` names and
    /// carries no children of its own.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.roots.iter().all(|root| {
            root.children.iter().all(|child| {
                child.parent_id.as_ref() == Some(&root.id) && child.children.is_empty()
            })
        })
    }
}

impl From<Vec<Category>> for CategoryTree {
    fn from(categories: Vec<Category>) -> Self {
        Self::from_categories(categories)
    }
}

fn flatten_into(categories: Vec<Category>, out: &mut Vec<Category>) {
    for mut category in categories {
        let children = std::mem::take(&mut category.children);
        let parent = category.id.clone();

        out.push(category);

        let rehomed = children
            .into_iter()
            .map(|mut child| {
                if child.parent_id.is_none() {
                    child.parent_id = Some(parent.clone());
                }
                child
            })
            .collect();

        flatten_into(rehomed, out);
    }
}
