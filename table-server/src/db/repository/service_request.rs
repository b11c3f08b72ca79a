//! Service Request Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::ServiceRequest;
use chrono::Utc;
use shared::RequestStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "service_request";

#[derive(Clone)]
pub struct ServiceRequestRepository {
    base: BaseRepository,
}

impl ServiceRequestRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List open requests for the staff board, most urgent first
    ///
    /// Priority ranking lives in RequestPriority's Ord impl, so the sort
    /// happens here rather than in the query.
    pub async fn find_open(&self) -> RepoResult<Vec<ServiceRequest>> {
        let mut requests: Vec<ServiceRequest> = self
            .base
            .db()
            .query(
                "SELECT * FROM service_request WHERE status IN ['PENDING', 'IN_PROGRESS'] \
                 ORDER BY created_at ASC",
            )
            .await?
            .take(0)?;
        requests.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.created_at.cmp(&b.created_at)));
        Ok(requests)
    }

    /// List all requests, newest first (paginated)
    pub async fn find_all(&self, limit: i32, offset: i32) -> RepoResult<Vec<ServiceRequest>> {
        let requests: Vec<ServiceRequest> = self
            .base
            .db()
            .query("SELECT * FROM service_request ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// List requests for a dining table, newest first
    pub async fn find_by_table(&self, table_id: &str) -> RepoResult<Vec<ServiceRequest>> {
        let table = self.base.link_ref(table_id)?;
        let requests: Vec<ServiceRequest> = self
            .base
            .db()
            .query("SELECT * FROM service_request WHERE dining_table = $table ORDER BY created_at DESC")
            .bind(("table", table))
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Find request by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ServiceRequest>> {
        let thing = self.base.parse_id(id)?;
        let request: Option<ServiceRequest> = self.base.db().select(thing).await?;
        Ok(request)
    }

    /// Persist a new request
    pub async fn create(&self, request: ServiceRequest) -> RepoResult<ServiceRequest> {
        let created: Option<ServiceRequest> =
            self.base.db().create(TABLE).content(request).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create service request".to_string()))
    }

    /// Persist a status change; stamps completed_at on Completed and
    /// records staff notes when provided
    pub async fn set_status(
        &self,
        id: &str,
        status: RequestStatus,
        staff_notes: Option<String>,
    ) -> RepoResult<ServiceRequest> {
        let thing = self.base.parse_id(id)?;
        let now = Utc::now();
        let mut query = String::from("UPDATE $thing SET status = $status, updated_at = $now");
        if status == RequestStatus::Completed {
            query.push_str(", completed_at = $now");
        }
        if staff_notes.is_some() {
            query.push_str(", staff_notes = $notes");
        }
        self.base
            .db()
            .query(query)
            .bind(("thing", thing))
            .bind(("status", status))
            .bind(("now", now))
            .bind(("notes", staff_notes))
            .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Service request {} not found", id)))
    }
}
