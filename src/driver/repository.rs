//! PostgreSQL persistence for the `drivers` table.

use sqlx::{PgPool, Row};

use crate::contracts::types::{Driver, DriverStatus};

pub struct DriverRepository {
    pool: PgPool,
}

struct DriverRow {
    driver_id: i64,
    name: String,
    phone: String,
    license_number: String,
    vehicle: String,
    status: String,
}

impl TryFrom<DriverRow> for Driver {
    type Error = String;

    fn try_from(row: DriverRow) -> Result<Self, Self::Error> {
        let status = DriverStatus::parse(&row.status)
            .ok_or_else(|| format!("unknown driver status {}", row.status))?;
        Ok(Driver {
            driver_id: row.driver_id,
            name: row.name,
            phone: row.phone,
            license_number: row.license_number,
            vehicle: row.vehicle,
            status,
        })
    }
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_available(&self) -> Result<Vec<Driver>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT driver_id, name, phone, license_number, vehicle, status FROM drivers WHERE status = 'available' ORDER BY driver_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|r| {
                DriverRow {
                    driver_id: r.get("driver_id"),
                    name: r.get("name"),
                    phone: r.get("phone"),
                    license_number: r.get("license_number"),
                    vehicle: r.get("vehicle"),
                    status: r.get("status"),
                }
                .try_into()
                .ok()
            })
            .collect())
    }

    pub async fn set_status(&self, driver_id: i64, status: DriverStatus) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE drivers SET status = $1 WHERE driver_id = $2")
            .bind(status.as_str())
            .bind(driver_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
