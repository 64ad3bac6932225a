use std::borrow::Cow;
use std::collections::HashSet;

use super::selection::Selection;
use crate::catalog::{Catalog, Item};

/// A titled group of items ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    /// The id of the subcategory the section came from.
    pub id: &'a str,
    pub title: Cow<'a, str>,
    pub items: Vec<&'a Item>,
}

/// Why a projection came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoFavorites,
    NoContent,
}

/// Derive the sections to render for `selection`.
///
/// The favorites view walks every category and subcategory in catalog order,
/// keeping only favorited items and dropping subcategories left empty. A
/// category view returns that category's subcategories as they are. An
/// unknown category id yields nothing.
pub fn project<'a>(
    catalog: &'a Catalog,
    selection: &Selection,
    favorites: &HashSet<String>,
) -> Vec<Section<'a>> {
    match selection {
        Selection::Favorites => catalog
            .categories()
            .iter()
            .flat_map(|category| {
                category.sub_categories.iter().filter_map(move |sub| {
                    let items: Vec<&Item> = sub
                        .items
                        .iter()
                        .filter(|item| favorites.contains(&item.id))
                        .collect();
                    (!items.is_empty()).then(|| Section {
                        id: sub.id.as_str(),
                        title: Cow::Owned(format!("{} - {}", category.title, sub.title)),
                        items,
                    })
                })
            })
            .collect(),
        Selection::Category(id) => catalog
            .category(id)
            .map(|category| {
                category
                    .sub_categories
                    .iter()
                    .map(|sub| Section {
                        id: sub.id.as_str(),
                        title: Cow::Borrowed(sub.title.as_str()),
                        items: sub.items.iter().collect(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// The placeholder to show when there are no sections at all. Sections
/// without items still render with their titles.
pub fn empty_state(selection: &Selection, sections: &[Section<'_>]) -> Option<EmptyState> {
    if !sections.is_empty() {
        return None;
    }
    Some(if selection.is_favorites() {
        EmptyState::NoFavorites
    } else {
        EmptyState::NoContent
    })
}
