use crate::package::Package;

/// Multi-select over table rows, keyed by package identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    selected: Vec<Package>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, pkg: &Package) -> bool {
        self.selected.iter().any(|s| s.is_same_package(pkg))
    }

    pub fn select(&mut self, pkg: &Package) {
        if !self.is_selected(pkg) {
            self.selected.push(pkg.clone());
        }
    }

    pub fn deselect(&mut self, pkg: &Package) {
        self.selected.retain(|s| !s.is_same_package(pkg));
    }

    pub fn toggle(&mut self, pkg: &Package) {
        if self.is_selected(pkg) {
            self.deselect(pkg);
        } else {
            self.select(pkg);
        }
    }

    /// Select every row, or clear the selection if every row is already
    /// selected.
    pub fn master_toggle<'a>(&mut self, rows: impl IntoIterator<Item = &'a Package>) {
        let rows: Vec<&Package> = rows.into_iter().collect();
        if !rows.is_empty() && rows.iter().all(|row| self.is_selected(row)) {
            self.clear();
        } else {
            for row in rows {
                self.select(row);
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Hand over the selected packages, leaving the selection empty.
    pub fn take(&mut self) -> Vec<Package> {
        std::mem::take(&mut self.selected)
    }

    pub fn selected(&self) -> &[Package] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
