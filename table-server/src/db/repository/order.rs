//! Order Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Order;
use chrono::Utc;
use shared::{OrderStatus, PaymentStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List orders, newest first (paginated)
    pub async fn find_all(&self, limit: i32, offset: i32) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// List orders in a given status, newest first
    pub async fn find_by_status(&self, status: OrderStatus) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE status = $status ORDER BY created_at DESC")
            .bind(("status", status))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// List orders for a dining table, newest first
    pub async fn find_by_table(&self, table_id: &str) -> RepoResult<Vec<Order>> {
        let table = self.base.link_ref(table_id)?;
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE dining_table = $table ORDER BY created_at DESC")
            .bind(("table", table))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = self.base.parse_id(id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Persist a freshly priced order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Persist a fulfillment status change; stamps confirmed_at /
    /// completed_at and records staff notes when provided
    pub async fn set_status(
        &self,
        id: &str,
        status: OrderStatus,
        staff_notes: Option<String>,
    ) -> RepoResult<Order> {
        let thing = self.base.parse_id(id)?;
        let mut query = String::from("UPDATE $thing SET status = $status, updated_at = $now");
        match status {
            OrderStatus::Confirmed => query.push_str(", confirmed_at = $now"),
            OrderStatus::Completed => query.push_str(", completed_at = $now"),
            _ => {}
        }
        if staff_notes.is_some() {
            query.push_str(", staff_notes = $notes");
        }
        self.base
            .db()
            .query(query)
            .bind(("thing", thing))
            .bind(("status", status))
            .bind(("now", Utc::now()))
            .bind(("notes", staff_notes))
            .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Persist a cancellation (status + reason in one write)
    pub async fn set_cancelled(&self, id: &str, reason: Option<String>) -> RepoResult<Order> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing SET status = $status, cancel_reason = $reason, updated_at = $now")
            .bind(("thing", thing))
            .bind(("status", OrderStatus::Cancelled))
            .bind(("reason", reason))
            .bind(("now", Utc::now()))
            .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Persist a payment status change, optionally recording the provider ref
    pub async fn set_payment(
        &self,
        id: &str,
        payment_status: PaymentStatus,
        payment_ref: Option<String>,
    ) -> RepoResult<Order> {
        let thing = self.base.parse_id(id)?;
        match payment_ref {
            Some(r) => {
                self.base
                    .db()
                    .query("UPDATE $thing SET payment_status = $ps, payment_ref = $ref, updated_at = $now")
                    .bind(("thing", thing))
                    .bind(("ps", payment_status))
                    .bind(("ref", r))
                    .bind(("now", Utc::now()))
                    .await?;
            }
            None => {
                self.base
                    .db()
                    .query("UPDATE $thing SET payment_status = $ps, updated_at = $now")
                    .bind(("thing", thing))
                    .bind(("ps", payment_status))
                    .bind(("now", Utc::now()))
                    .await?;
            }
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Wipe the order table (explicit admin reset; normal flows never delete)
    pub async fn delete_all(&self) -> RepoResult<()> {
        self.base.db().query("DELETE order").await?;
        Ok(())
    }

    /// Count orders created today (order number sequence)
    pub async fn count_today(&self) -> RepoResult<usize> {
        let start_of_day = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        #[derive(serde::Deserialize)]
        struct CountRow {
            count: usize,
        }
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM order WHERE created_at >= $start GROUP ALL")
            .bind(("start", start_of_day))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(|row| row.count).unwrap_or(0))
    }
}
