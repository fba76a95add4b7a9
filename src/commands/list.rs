use std::fmt;
use std::io::{self, Write};

use anyhow::{Result, bail};
use log::debug;

use crate::{
    package::Package,
    store::DataStore,
    table::{DEFAULT_PAGE_SIZE, DataSource, SortColumn, SortDirection, truncate_description},
};

use super::services::Services;

/// A package collection published by the data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Collection {
    /// Available packages that are not installed
    Marketplace,
    Installed,
    /// User-registered package sources
    External,
    /// Installed packages with an upgrade available
    Upgradeable,
}

impl Collection {
    fn snapshot(self, store: &DataStore) -> Vec<Package> {
        match self {
            Collection::Marketplace => store.marketplace_packages().borrow().clone(),
            Collection::Installed => store.installed_packages().borrow().clone(),
            Collection::External => store.external_packages().borrow().clone(),
            Collection::Upgradeable => store.upgradeable_packages().borrow().clone(),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Marketplace => write!(f, "marketplace"),
            Collection::Installed => write!(f, "installed"),
            Collection::External => write!(f, "external"),
            Collection::Upgradeable => write!(f, "upgradeable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub sort: Option<SortColumn>,
    pub descending: bool,
    pub filter: Option<String>,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort: None,
            descending: false,
            filter: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Print one page of a package collection.
#[tracing::instrument(skip(services, options))]
pub async fn list(services: &Services, collection: Collection, options: &ListOptions) -> Result<()> {
    let store = services.store();
    store.load().await;

    let rows = collection.snapshot(&store);
    debug!("{} package(s) in {}", rows.len(), collection);

    let data = build_view(rows, options)?;
    let stdout = io::stdout();
    print_page(&data, &mut stdout.lock())
}

fn build_view(rows: Vec<Package>, options: &ListOptions) -> Result<DataSource> {
    let mut data = DataSource::new(rows);

    if let Some(column) = options.sort {
        let direction = if options.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        data.set_sort(column, direction);
    }
    if let Some(filter) = &options.filter {
        data.set_filter(filter);
    }
    data.paginator_mut().page_size = options.page_size.max(1);

    let page_index = options.page.saturating_sub(1);
    if page_index > 0 && !data.go_to_page(page_index) {
        bail!(
            "Page {} is out of range; there are {} page(s)",
            options.page,
            data.page_count()
        );
    }

    Ok(data)
}

fn print_page<W: Write>(data: &DataSource, out: &mut W) -> Result<()> {
    let page = data.page();
    if page.is_empty() {
        writeln!(out, "No packages found.")?;
        return Ok(());
    }

    for pkg in &page {
        writeln!(out, "{} [{}] by {}", pkg.title, pkg.category, pkg.author)?;
        if !pkg.description.is_empty() {
            writeln!(out, "    {}", truncate_description(&pkg.description))?;
        }
    }

    writeln!(
        out,
        "Page {} of {} ({} package(s))",
        data.paginator().page_index + 1,
        data.page_count(),
        data.filtered().len()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::test_support::package;

    fn rows(count: usize) -> Vec<Package> {
        (0..count)
            .map(|i| package(&format!("MMM-{:02}", i), "Utility"))
            .collect()
    }

    fn render(data: &DataSource) -> String {
        let mut out = Vec::new();
        print_page(data, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_print_empty() {
        let data = build_view(Vec::new(), &ListOptions::default()).unwrap();
        assert_eq!(render(&data), "No packages found.\n");
    }

    #[test]
    fn test_print_page_with_footer() {
        let options = ListOptions {
            page: 2,
            ..ListOptions::default()
        };
        let data = build_view(rows(15), &options).unwrap();

        let output = render(&data);

        assert!(output.starts_with("MMM-10 [Utility] by example\n    MMM-10 description\n"));
        assert!(!output.contains("MMM-09"));
        assert!(output.ends_with("Page 2 of 2 (15 package(s))\n"));
    }

    #[test]
    fn test_sort_and_filter_options() {
        let options = ListOptions {
            sort: Some(SortColumn::Title),
            descending: true,
            filter: Some("mmm-0".to_string()),
            ..ListOptions::default()
        };
        let data = build_view(rows(12), &options).unwrap();

        let titles: Vec<&str> = data.page().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles.first(), Some(&"MMM-09"));
        assert_eq!(titles.len(), 10);
    }

    #[test]
    fn test_page_out_of_range() {
        let options = ListOptions {
            page: 4,
            ..ListOptions::default()
        };
        let err = build_view(rows(15), &options).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_long_description_is_truncated() {
        let mut pkg = package("MMM-Long", "Utility");
        pkg.description = "d".repeat(120);
        let data = build_view(vec![pkg], &ListOptions::default()).unwrap();

        let output = render(&data);

        assert!(output.contains(&format!("    {}...\n", "d".repeat(75))));
    }
}
