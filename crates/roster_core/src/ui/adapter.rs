//! List adapter mapping an employee snapshot to renderable rows.
//!
//! # Invariants
//! - The adapter never mutates storage; row actions only report ids.
//! - Row background alternates by position parity and carries no meaning.

use crate::model::employee::{Employee, EmployeeId};

/// Cosmetic row background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowBackground {
    /// Even positions.
    Dark,
    /// Odd positions.
    Light,
}

impl RowBackground {
    pub fn for_position(position: usize) -> Self {
        if position % 2 == 0 {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRow {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub background: RowBackground,
}

/// Per-row action reported back to the screen controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit(EmployeeId),
    Delete(EmployeeId),
}

/// Renderer over one immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeListAdapter {
    items: Vec<Employee>,
}

impl EmployeeListAdapter {
    pub fn new(items: Vec<Employee>) -> Self {
        Self { items }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Employee] {
        &self.items
    }

    /// Binds the row at `position`, or `None` when out of range.
    pub fn row(&self, position: usize) -> Option<EmployeeRow> {
        self.items.get(position).map(|item| EmployeeRow {
            id: item.id,
            name: item.name.clone(),
            email: item.email.clone(),
            background: RowBackground::for_position(position),
        })
    }

    pub fn rows(&self) -> Vec<EmployeeRow> {
        (0..self.items.len()).filter_map(|position| self.row(position)).collect()
    }

    /// Edit tap on the row at `position`.
    pub fn edit_action(&self, position: usize) -> Option<RowAction> {
        self.items.get(position).map(|item| RowAction::Edit(item.id))
    }

    /// Delete tap on the row at `position`.
    pub fn delete_action(&self, position: usize) -> Option<RowAction> {
        self.items.get(position).map(|item| RowAction::Delete(item.id))
    }
}

#[cfg(test)]
mod tests {
    use super::{EmployeeListAdapter, RowAction, RowBackground};
    use crate::model::employee::Employee;

    fn adapter() -> EmployeeListAdapter {
        EmployeeListAdapter::new(vec![
            Employee::with_id(4, "Ada", "ada@example.com"),
            Employee::with_id(9, "Grace", "grace@example.com"),
            Employee::with_id(12, "Linus", "linus@example.com"),
        ])
    }

    #[test]
    fn rows_alternate_background_by_position() {
        let backgrounds: Vec<_> = adapter().rows().into_iter().map(|row| row.background).collect();
        assert_eq!(
            backgrounds,
            vec![RowBackground::Dark, RowBackground::Light, RowBackground::Dark]
        );
    }

    #[test]
    fn row_actions_report_record_ids_not_positions() {
        let adapter = adapter();
        assert_eq!(adapter.edit_action(1), Some(RowAction::Edit(9)));
        assert_eq!(adapter.delete_action(2), Some(RowAction::Delete(12)));
        assert_eq!(adapter.delete_action(3), None);
    }

    #[test]
    fn out_of_range_row_is_none() {
        assert!(EmployeeListAdapter::default().row(0).is_none());
        assert_eq!(adapter().row(0).unwrap().name, "Ada");
    }
}
