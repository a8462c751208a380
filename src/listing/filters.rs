//! Search filters for browsing published listings.

use serde::{Deserialize, Serialize};

/// The three kinds of listings the marketplace publishes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ListingCategory {
    /// Places to stay.
    Accommodations,
    /// Bookable experiences.
    Experiences,
    /// Local guides.
    Guides,
}

impl ListingCategory {
    /// All categories, in display order.
    pub const ALL: &'static [ListingCategory] = &[
        ListingCategory::Accommodations,
        ListingCategory::Experiences,
        ListingCategory::Guides,
    ];
}

/// Filter criteria for one category of search.
///
/// Each variant carries only the criteria that make sense for its
/// category; every criterion is optional, and `None` means "don't
/// filter on this".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum SearchFilters {
    /// Filters for places to stay.
    Accommodations {
        #[serde(skip_serializing_if = "Option::is_none")]
        city: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        property_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_price: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        min_guests: Option<u32>,
    },
    /// Filters for bookable experiences.
    Experiences {
        #[serde(skip_serializing_if = "Option::is_none")]
        city: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        experience_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_price: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    /// Filters for local guides.
    Guides {
        #[serde(skip_serializing_if = "Option::is_none")]
        city: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        speciality: Option<String>,
    },
}

impl SearchFilters {
    /// An accommodations search with no criteria set.
    pub fn accommodations() -> Self {
        SearchFilters::Accommodations {
            city: None,
            property_type: None,
            max_price: None,
            min_guests: None,
        }
    }

    /// An experiences search with no criteria set.
    pub fn experiences() -> Self {
        SearchFilters::Experiences {
            city: None,
            experience_type: None,
            max_price: None,
            language: None,
        }
    }

    /// A guides search with no criteria set.
    pub fn guides() -> Self {
        SearchFilters::Guides {
            city: None,
            language: None,
            speciality: None,
        }
    }

    /// Which category this filter set searches.
    pub fn category(&self) -> ListingCategory {
        match self {
            SearchFilters::Accommodations { .. } => ListingCategory::Accommodations,
            SearchFilters::Experiences { .. } => ListingCategory::Experiences,
            SearchFilters::Guides { .. } => ListingCategory::Guides,
        }
    }

    /// True when no criterion is set, i.e. the search matches everything
    /// in its category.
    pub fn is_empty(&self) -> bool {
        match self {
            SearchFilters::Accommodations {
                city,
                property_type,
                max_price,
                min_guests,
            } => {
                city.is_none()
                    && property_type.is_none()
                    && max_price.is_none()
                    && min_guests.is_none()
            }
            SearchFilters::Experiences {
                city,
                experience_type,
                max_price,
                language,
            } => {
                city.is_none()
                    && experience_type.is_none()
                    && max_price.is_none()
                    && language.is_none()
            }
            SearchFilters::Guides {
                city,
                language,
                speciality,
            } => city.is_none() && language.is_none() && speciality.is_none(),
        }
    }
}
