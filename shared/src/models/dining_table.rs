//! Dining Table Session Model

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};

/// Table occupancy status (桌台状态)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
}

/// Occupancy of a physical table by a POS order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableSession {
    pub table_number: u32,
    pub status: TableStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<i64>,
}

impl TableSession {
    /// An unoccupied table
    pub fn vacant(table_number: u32) -> Self {
        Self {
            table_number,
            status: TableStatus::Available,
            customer_name: None,
            staff_name: None,
            linked_order_id: None,
            opened_at: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.status == TableStatus::Occupied
    }

    /// Seat an order at this table
    pub fn occupy(
        &mut self,
        order_id: impl Into<String>,
        customer_name: impl Into<String>,
        staff_name: Option<String>,
    ) -> Result<(), AppError> {
        if self.is_occupied() {
            return Err(AppError::with_message(
                ErrorCode::TableOccupied,
                format!("Table {} is currently occupied", self.table_number),
            )
            .with_detail("table_number", self.table_number));
        }
        self.status = TableStatus::Occupied;
        self.customer_name = Some(customer_name.into());
        self.staff_name = staff_name;
        self.linked_order_id = Some(order_id.into());
        self.opened_at = Some(crate::util::now_millis());
        Ok(())
    }

    /// Free the table if it is held by `order_id`
    ///
    /// Returns `true` when the table was released.
    pub fn release_for(&mut self, order_id: &str) -> bool {
        if self.linked_order_id.as_deref() != Some(order_id) {
            return false;
        }
        *self = Self::vacant(self.table_number);
        true
    }
}
