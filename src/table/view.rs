//! Sorting, filtering and pagination over a table's rows.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::package::Package;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Descriptions longer than this are cut when displayed.
pub const MAX_DESCRIPTION_LENGTH: usize = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Category,
    Title,
    Description,
    Author,
}

impl SortColumn {
    fn key(self, pkg: &Package) -> &str {
        match self {
            SortColumn::Category => &pkg.category,
            SortColumn::Title => &pkg.title,
            SortColumn::Description => &pkg.description,
            SortColumn::Author => &pkg.author,
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortColumn::Category => write!(f, "category"),
            SortColumn::Title => write!(f, "title"),
            SortColumn::Description => write!(f, "description"),
            SortColumn::Author => write!(f, "author"),
        }
    }
}

impl FromStr for SortColumn {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "category" => Ok(SortColumn::Category),
            "title" => Ok(SortColumn::Title),
            "description" => Ok(SortColumn::Description),
            "author" => Ok(SortColumn::Author),
            _ => anyhow::bail!(
                "Unknown column: {}. Expected category, title, description, or author.",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub page_size: usize,
    pub page_index: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 0,
        }
    }
}

impl Paginator {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Rows of one table plus the view state applied to them.
#[derive(Debug, Clone, Default)]
pub struct DataSource {
    rows: Vec<Package>,
    filter: String,
    sort: Option<Sort>,
    paginator: Paginator,
}

impl DataSource {
    pub fn new(rows: Vec<Package>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Swap in freshly fetched rows. The filter and the page position are
    /// reset; the sort order is kept.
    pub fn replace(&mut self, rows: Vec<Package>) {
        self.rows = rows;
        self.filter.clear();
        self.paginator.reset();
    }

    pub fn rows(&self) -> &[Package] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Case-insensitive substring match against every column.
    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.trim().to_lowercase();
        self.paginator.page_index = 0;
    }

    pub fn sort(&self) -> Option<Sort> {
        self.sort
    }

    pub fn set_sort(&mut self, column: SortColumn, direction: SortDirection) {
        self.sort = Some(Sort { column, direction });
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    pub fn paginator(&self) -> Paginator {
        self.paginator
    }

    pub fn paginator_mut(&mut self) -> &mut Paginator {
        &mut self.paginator
    }

    fn matches(&self, pkg: &Package) -> bool {
        if self.filter.is_empty() {
            return true;
        }
        [
            &pkg.category,
            &pkg.title,
            &pkg.description,
            &pkg.author,
            &pkg.repository,
        ]
        .iter()
        .any(|value| value.to_lowercase().contains(&self.filter))
    }

    /// Rows passing the filter, in sort order.
    pub fn filtered(&self) -> Vec<&Package> {
        let mut rows: Vec<&Package> = self.rows.iter().filter(|pkg| self.matches(pkg)).collect();

        if let Some(sort) = self.sort {
            rows.sort_by(|a, b| {
                let ordering: Ordering = sort.column.key(a).cmp(sort.column.key(b));
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        rows
    }

    pub fn page_count(&self) -> usize {
        let total = self.filtered().len();
        total.div_ceil(self.paginator.page_size.max(1))
    }

    /// Rows on the current page.
    pub fn page(&self) -> Vec<&Package> {
        let size = self.paginator.page_size.max(1);
        self.filtered()
            .into_iter()
            .skip(self.paginator.page_index * size)
            .take(size)
            .collect()
    }

    pub fn go_to_page(&mut self, page_index: usize) -> bool {
        if page_index < self.page_count() {
            self.paginator.page_index = page_index;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.paginator.page_index + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        match self.paginator.page_index.checked_sub(1) {
            Some(index) => self.go_to_page(index),
            None => false,
        }
    }
}

/// Cut `description` to [`MAX_DESCRIPTION_LENGTH`] characters, marking the
/// cut with an ellipsis.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_LENGTH {
        return description.to_string();
    }
    let mut cut: String = description.chars().take(MAX_DESCRIPTION_LENGTH).collect();
    cut.push_str("...");
    cut
}
