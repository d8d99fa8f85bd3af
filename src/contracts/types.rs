//! Core domain types shared by WC, DC, OC and FO.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// `Confirmed`, `RouteReady`, `Assigned` and `Failed` are declared for
/// forward compatibility but no implemented flow produces them — only
/// `Pending -> InProgress -> Delivered` and `Pending -> Cancelled` are
/// reachable today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    RouteReady,
    Assigned,
    InProgress,
    Delivered,
    Cancelled,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::RouteReady => "route_ready",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "route_ready" => Self::RouteReady,
            "assigned" => Self::Assigned,
            "in_progress" => Self::InProgress,
            "delivered" => Self::Delivered,
            "cancelled" => Self::Cancelled,
            "failed" => Self::Failed,
            _ => return None,
        })
    }

    /// `driver_id` must be null iff status is pending/confirmed/cancelled.
    pub fn requires_driver(&self) -> bool {
        matches!(self, Self::InProgress | Self::Delivered)
    }
}

/// A line item snapshot bound to its parent order; never updated once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub total_price: Decimal,
}

/// A line item as requested by the client, before pricing is resolved.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestedItem {
    pub product_name: String,
    pub quantity: i32,
}

/// A priced line item ready to be persisted by `OrderCore::create_order`.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl NewLineItem {
    pub fn total_price(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A fully persisted order with its line items attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub delivery_address: String,
    pub total_amount: Decimal,
    pub driver_id: Option<i64>,
    pub created_at: i64,
    pub items: Vec<LineItem>,
}

/// Authoritative stock row owned by WC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub last_updated: i64,
}

/// Input to `WarehouseCore::check_stock_availability`.
#[derive(Debug, Clone, Deserialize)]
pub struct StockCheckItem {
    pub product_name: String,
    pub quantity: i32,
}

/// Input to `WarehouseCore::update_stock`: a decrement by `product_id`.
#[derive(Debug, Clone)]
pub struct StockUpdateItem {
    pub product_id: i64,
    pub quantity: i32,
}

/// Price-lookup result from `OrderCore::get_order_item_info`.
#[derive(Debug, Clone)]
pub struct PriceInfo {
    pub product_id: i64,
    pub unit_price: Decimal,
}

/// Driver status gating assignability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Offline,
    Available,
    Busy,
    Break,
    Unavailable,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Available => "available",
            Self::Busy => "busy",
            Self::Break => "break",
            Self::Unavailable => "unavailable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "offline" => Self::Offline,
            "available" => Self::Available,
            "busy" => Self::Busy,
            "break" => Self::Break,
            "unavailable" => Self::Unavailable,
            _ => return None,
        })
    }
}

/// A delivery agent, owned by DC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    // derive(Clone) required: DriverService selects a candidate out of a
    // borrowed slice and needs an owned copy after the slice is dropped.
    pub driver_id: i64,
    pub name: String,
    pub phone: String,
    pub license_number: String,
    pub vehicle: String,
    pub status: DriverStatus,
}

/// The driver payload carried on a `DriverFoundEvent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSummary {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub license_number: String,
    pub car: String,
}

impl From<&Driver> for DriverSummary {
    fn from(d: &Driver) -> Self {
        Self {
            id: d.driver_id,
            name: d.name.clone(),
            phone: d.phone.clone(),
            license_number: d.license_number.clone(),
            car: d.vehicle.clone(),
        }
    }
}

/// The bus message DC publishes and OC consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverFoundEvent {
    pub order_id: i64,
    pub driver: Option<DriverSummary>,
    pub success: bool,
    pub message: String,
    pub timestamp: i64,
}

/// Result of FO's UC-2 AssignDriver use case.
#[derive(Debug, Clone, Serialize)]
pub struct AssignDriverResult {
    pub driver_id: Option<i64>,
    pub order_id: i64,
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_round_trips() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::RouteReady,
            OrderStatus::Assigned,
            OrderStatus::InProgress,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Failed,
        ] {
            assert_eq!(OrderStatus::parse(s.as_str()), Some(s));
        }
    }

    #[test]
    fn driver_id_invariant_matches_status() {
        assert!(!OrderStatus::Pending.requires_driver());
        assert!(!OrderStatus::Confirmed.requires_driver());
        assert!(!OrderStatus::Cancelled.requires_driver());
        assert!(OrderStatus::InProgress.requires_driver());
        assert!(OrderStatus::Delivered.requires_driver());
    }

    #[test]
    fn line_item_total_price_is_unit_price_times_quantity() {
        let item = NewLineItem {
            product_id: 1,
            product_name: "laptop".into(),
            unit_price: Decimal::new(100000, 2),
            quantity: 2,
        };
        assert_eq!(item.total_price(), Decimal::new(200000, 2));
    }
}
