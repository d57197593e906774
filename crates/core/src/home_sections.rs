//! Home Sections
//!
//! Editorial blocks shown on the home page, kept sorted by their `order`.

use serde::{Deserialize, Serialize};

use crate::ids::HomeSectionId;

/// Home page section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeSection {
    /// Section id
    #[serde(rename = "_id")]
    pub id: HomeSectionId,

    /// Heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Body paragraphs
    #[serde(default)]
    pub paragraphs: Vec<String>,

    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Position on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl HomeSection {
    /// Position used for sorting; unset sorts as zero.
    #[must_use]
    pub fn position(&self) -> i64 {
        self.order.unwrap_or_default()
    }
}

/// Sort sections by position, keeping the existing order for ties.
pub fn sort_by_order(sections: &mut [HomeSection]) {
    sections.sort_by_key(HomeSection::position);
}
