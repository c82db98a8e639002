//! Population filters: categories, the user's selection, and the static catalog.
//!
//! Option ids are the wire values used by the dashboard (`femme`, `cadres`,
//! `moins_30`, ...). Every category has the neutral id [`NEUTRAL`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Neutral option id: no restriction on this category.
pub const NEUTRAL: &str = "ensemble";

/// The four filterable population dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilterCategory {
    #[serde(rename = "sexe")]
    Sex,
    #[serde(rename = "profession")]
    Occupation,
    #[serde(rename = "age")]
    Age,
    #[serde(rename = "activite")]
    Sector,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 4] = [
        FilterCategory::Sex,
        FilterCategory::Occupation,
        FilterCategory::Age,
        FilterCategory::Sector,
    ];

    /// Wire id of the category.
    pub fn id(self) -> &'static str {
        match self {
            FilterCategory::Sex => "sexe",
            FilterCategory::Occupation => "profession",
            FilterCategory::Age => "age",
            FilterCategory::Sector => "activite",
        }
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when a string names no known filter category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter category '{0}' (expected one of: sexe, profession, age, activite)")]
pub struct UnknownCategory(pub String);

impl FromStr for FilterCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sexe" | "sex" => Ok(FilterCategory::Sex),
            "profession" | "occupation" => Ok(FilterCategory::Occupation),
            "age" => Ok(FilterCategory::Age),
            "activite" | "sector" => Ok(FilterCategory::Sector),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// The filter values currently chosen by the user, one per category.
///
/// Passed by value into the re-weighting step. Values outside the catalog are
/// allowed here; they simply carry no adjustment weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(rename = "sexe")]
    pub sex: String,
    #[serde(rename = "profession")]
    pub occupation: String,
    pub age: String,
    #[serde(rename = "activite")]
    pub sector: String,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            sex: NEUTRAL.to_string(),
            occupation: NEUTRAL.to_string(),
            age: NEUTRAL.to_string(),
            sector: NEUTRAL.to_string(),
        }
    }
}

impl FilterSelection {
    pub fn get(&self, category: FilterCategory) -> &str {
        match category {
            FilterCategory::Sex => &self.sex,
            FilterCategory::Occupation => &self.occupation,
            FilterCategory::Age => &self.age,
            FilterCategory::Sector => &self.sector,
        }
    }

    pub fn set(&mut self, category: FilterCategory, value: impl Into<String>) {
        let value = value.into();
        match category {
            FilterCategory::Sex => self.sex = value,
            FilterCategory::Occupation => self.occupation = value,
            FilterCategory::Age => self.age = value,
            FilterCategory::Sector => self.sector = value,
        }
    }

    /// Builder form of [`FilterSelection::set`].
    pub fn with(mut self, category: FilterCategory, value: impl Into<String>) -> Self {
        self.set(category, value);
        self
    }

    pub fn is_neutral(&self) -> bool {
        FilterCategory::ALL.iter().all(|&c| self.get(c) == NEUTRAL)
    }
}

/// One selectable value within a filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub id: &'static str,
    pub label: &'static str,
}

/// A filter category with its display label and ordered options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterGroup {
    pub category: FilterCategory,
    pub label: &'static str,
    pub options: &'static [FilterOption],
}

const fn opt(id: &'static str, label: &'static str) -> FilterOption {
    FilterOption { id, label }
}

const SEX_OPTIONS: &[FilterOption] = &[
    opt(NEUTRAL, "Ensemble"),
    opt("homme", "Homme"),
    opt("femme", "Femme"),
];

const OCCUPATION_OPTIONS: &[FilterOption] = &[
    opt(NEUTRAL, "Ensemble"),
    opt("cadres", "Cadres"),
    opt("professions_intermediaires", "Professions intermédiaires"),
    opt("employes", "Employés"),
    opt("ouvriers", "Ouvriers"),
];

const AGE_OPTIONS: &[FilterOption] = &[
    opt(NEUTRAL, "Ensemble"),
    opt("moins_30", "Moins de 30 ans"),
    opt("30_39", "30 à 39 ans"),
    opt("40_49", "40 à 49 ans"),
    opt("50_plus", "50 ans ou plus"),
];

const SECTOR_OPTIONS: &[FilterOption] = &[
    opt(NEUTRAL, "Ensemble"),
    opt("industrie", "Industrie"),
    opt("construction", "Construction"),
    opt("commerce", "Commerce"),
    opt("services", "Services"),
    opt("administration", "Administration publique"),
];

const GROUPS: &[FilterGroup] = &[
    FilterGroup {
        category: FilterCategory::Sex,
        label: "Sexe",
        options: SEX_OPTIONS,
    },
    FilterGroup {
        category: FilterCategory::Occupation,
        label: "Professions",
        options: OCCUPATION_OPTIONS,
    },
    FilterGroup {
        category: FilterCategory::Age,
        label: "Âge",
        options: AGE_OPTIONS,
    },
    FilterGroup {
        category: FilterCategory::Sector,
        label: "Activité économique",
        options: SECTOR_OPTIONS,
    },
];

/// Static list of filter groups shown to the user.
#[derive(Debug, Clone, Copy)]
pub struct FilterCatalog {
    groups: &'static [FilterGroup],
}

impl FilterCatalog {
    /// The catalog the dashboard ships with.
    pub const fn standard() -> Self {
        Self { groups: GROUPS }
    }

    pub fn groups(&self) -> &'static [FilterGroup] {
        self.groups
    }

    pub fn group(&self, category: FilterCategory) -> Option<&'static FilterGroup> {
        self.groups.iter().find(|g| g.category == category)
    }

    pub fn contains(&self, category: FilterCategory, id: &str) -> bool {
        self.group(category)
            .is_some_and(|g| g.options.iter().any(|o| o.id == id))
    }

    pub fn option_ids(&self, category: FilterCategory) -> Vec<&'static str> {
        self.group(category)
            .map(|g| g.options.iter().map(|o| o.id).collect())
            .unwrap_or_default()
    }
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
