//! Filter, update and chained-query descriptions for person lookups.
//!
//! These types only describe what to ask the store for; the repository
//! translates them into SQL and the engine does the matching, ordering,
//! limiting and field selection.

/// Conjunction of exact-match conditions. The default filter matches every
/// document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    /// Exact name match.
    pub name: Option<String>,
    /// Matches documents whose food list contains this exact value.
    pub favorite_food: Option<String>,
}

impl PersonFilter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn by_food(food: impl Into<String>) -> Self {
        Self {
            favorite_food: Some(food.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.favorite_food.is_none()
    }
}

/// Field assignments applied by update-by-filter. Unset fields are left
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub favorite_foods: Option<Vec<String>>,
}

impl PersonUpdate {
    pub fn set_age(age: i64) -> Self {
        Self {
            age: Some(age),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.favorite_foods.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Age,
}

impl SortField {
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Age => "age",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Optional fields that a projection can hide. `_id` and `name` are always
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonField {
    Age,
    FavoriteFoods,
}

/// Result of a delete-by-filter call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Chained query: filter, then sort, then limit, then field selection.
///
/// ```
/// use people_core::{PersonField, PersonFilter, PersonQuery, SortField, SortOrder};
///
/// let query = PersonQuery::new(PersonFilter::by_food("burrito"))
///     .sort(SortField::Name, SortOrder::Ascending)
///     .limit(2)
///     .exclude(PersonField::Age);
/// assert_eq!(query.limit, Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonQuery {
    pub filter: PersonFilter,
    pub sort: Option<(SortField, SortOrder)>,
    /// `Some(0)` behaves like no limit.
    pub limit: Option<u32>,
    pub excluded: Vec<PersonField>,
}

impl PersonQuery {
    pub fn new(filter: PersonFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn exclude(mut self, field: PersonField) -> Self {
        if !self.excluded.contains(&field) {
            self.excluded.push(field);
        }
        self
    }

    pub fn hides(&self, field: PersonField) -> bool {
        self.excluded.contains(&field)
    }
}
