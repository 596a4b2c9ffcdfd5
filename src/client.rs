//! Employee backend HTTP client.

use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::models::employee::{Employee, EmployeePage};
use crate::roster::view::{ListOutcome, ListQuery, Mutation};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

/// Name-lookup endpoint.
///
/// The backend exposes the same lookup under two paths. Both are supported and
/// the choice is left to configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupRoute {
    /// `GET /api/users/{name}`
    Users,
    /// `GET /api/employees/users/{name}`
    EmployeeUsers,
}

impl LookupRoute {
    fn segments(self) -> &'static [&'static str] {
        match self {
            LookupRoute::Users => &["api", "users"],
            LookupRoute::EmployeeUsers => &["api", "employees", "users"],
        }
    }

    /// Get a short label for logs and settings.
    pub fn label(self) -> &'static str {
        match self {
            LookupRoute::Users => "/api/users/{name}",
            LookupRoute::EmployeeUsers => "/api/employees/users/{name}",
        }
    }
}

/// REST client for the employee backend.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct RosterClient {
    client: Client,
    base_url: Url,
}

impl RosterClient {
    /// Create a client from connection settings.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Self::with_client(client, &config.base_url)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| AppError::config(format!("Invalid API base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::config(format!("API base URL '{base_url}' cannot have a path")));
        }

        Ok(Self { client, base_url })
    }

    /// Get the configured base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an endpoint URL below the base URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| AppError::config(format!("API base URL '{}' cannot have a path", self.base_url)))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Fetch one page of employees.
    pub async fn list_page(&self, page: u32, size: u32) -> Result<EmployeePage> {
        let url = self.endpoint(&["api", "employees"])?;
        tracing::debug!("GET {} page={} size={}", url, page, size);

        let body = self
            .client
            .get(url)
            .query(&[("page", page), ("size", size)])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(serde_json::from_slice(&body)?)
    }

    /// Look up a single employee by exact name.
    ///
    /// An empty body, a JSON `null` and a 404 all mean no match.
    pub async fn find_by_name(&self, route: LookupRoute, name: &str) -> Result<Option<Employee>> {
        let segments: Vec<&str> = route.segments().iter().copied().chain([name]).collect();
        let url = self.endpoint(&segments)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.error_for_status()?.bytes().await?;
        decode_optional(&body)
    }

    /// Create an employee. Any 2xx status is success.
    ///
    /// Returns the stored record when the server echoes one back.
    pub async fn create(&self, employee: &Employee) -> Result<Option<Employee>> {
        let url = self.endpoint(&["api", "employees"])?;
        tracing::debug!("POST {}", url);

        let body = self
            .client
            .post(url)
            .json(employee)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(echoed_record(&body))
    }

    /// Replace an employee record by id. Any 2xx status is success.
    pub async fn update(&self, employee: &Employee) -> Result<Option<Employee>> {
        let id = employee.id.to_string();
        let url = self.endpoint(&["api", "employees", &id])?;
        tracing::debug!("PUT {}", url);

        let body = self
            .client
            .put(url)
            .json(employee)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(echoed_record(&body))
    }

    /// Delete an employee by id.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let id = id.to_string();
        let url = self.endpoint(&["api", "employees", &id])?;
        tracing::debug!("DELETE {}", url);

        self.client.delete(url).send().await?.error_for_status()?;
        Ok(())
    }

    /// Run a list query issued by the roster view.
    pub async fn execute_query(&self, query: ListQuery) -> Result<ListOutcome> {
        match query {
            ListQuery::Page { page, size } => self.list_page(page, size).await.map(ListOutcome::Page),
            ListQuery::ByName { route, name } => self.find_by_name(route, &name).await.map(ListOutcome::Found),
        }
    }

    /// Run a write issued by the roster view.
    pub async fn execute_mutation(&self, mutation: Mutation) -> Result<()> {
        match mutation {
            Mutation::Create(employee) => {
                let saved = self.create(&employee).await?;
                tracing::info!("Created employee '{}' (id {:?})", employee.name, saved.map(|e| e.id));
            }
            Mutation::Update(employee) => {
                self.update(&employee).await?;
                tracing::info!("Updated employee {}", employee.id);
            }
            Mutation::Delete(id) => {
                self.delete(id).await?;
                tracing::info!("Deleted employee {}", id);
            }
        }
        Ok(())
    }

    /// Test connection by requesting the smallest possible page.
    ///
    /// Returns the total number of employees the backend reports.
    pub async fn test_connection(&self) -> Result<u64> {
        let page = self.list_page(0, 1).await?;
        Ok(page.total_elements)
    }
}

/// Decode a body that may legitimately be empty.
fn decode_optional(body: &[u8]) -> Result<Option<Employee>> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(None);
    }
    Ok(serde_json::from_slice::<Option<Employee>>(body)?)
}

/// Best-effort decode of a record echoed by a write.
fn echoed_record(body: &[u8]) -> Option<Employee> {
    match decode_optional(body) {
        Ok(employee) => employee,
        Err(e) => {
            tracing::debug!("Ignoring unrecognised write response: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode as AxumStatus,
        response::{IntoResponse, Response},
        routing::get,
    };
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Default)]
    struct Backend {
        employees: Vec<Employee>,
        next_id: i64,
        deleted: Vec<i64>,
    }

    type Shared = Arc<Mutex<Backend>>;

    #[derive(serde::Deserialize)]
    struct PageParams {
        page: usize,
        size: usize,
    }

    async fn list(State(state): State<Shared>, Query(params): Query<PageParams>) -> Json<EmployeePage> {
        let backend = state.lock().unwrap();
        let content = backend
            .employees
            .iter()
            .skip(params.page * params.size)
            .take(params.size)
            .cloned()
            .collect();
        Json(EmployeePage {
            content,
            total_elements: backend.employees.len() as u64,
        })
    }

    async fn create(State(state): State<Shared>, Json(mut emp): Json<Employee>) -> Json<Employee> {
        let mut backend = state.lock().unwrap();
        backend.next_id += 1;
        emp.id = backend.next_id;
        backend.employees.push(emp.clone());
        Json(emp)
    }

    async fn update(State(state): State<Shared>, Path(id): Path<i64>, Json(emp): Json<Employee>) -> Response {
        let mut backend = state.lock().unwrap();
        match backend.employees.iter_mut().find(|e| e.id == id) {
            Some(existing) => {
                *existing = Employee { id, ..emp };
                Json(existing.clone()).into_response()
            }
            None => AxumStatus::NOT_FOUND.into_response(),
        }
    }

    async fn remove(State(state): State<Shared>, Path(id): Path<i64>) -> AxumStatus {
        let mut backend = state.lock().unwrap();
        backend.employees.retain(|e| e.id != id);
        backend.deleted.push(id);
        AxumStatus::NO_CONTENT
    }

    /// `/api/users/{name}` answers a miss with an empty 200.
    async fn users_lookup(State(state): State<Shared>, Path(name): Path<String>) -> Response {
        let backend = state.lock().unwrap();
        match backend.employees.iter().find(|e| e.name == name) {
            Some(emp) => Json(emp.clone()).into_response(),
            None => AxumStatus::OK.into_response(),
        }
    }

    /// `/api/employees/users/{name}` answers a miss with a 404.
    async fn employee_users_lookup(State(state): State<Shared>, Path(name): Path<String>) -> Response {
        let backend = state.lock().unwrap();
        match backend.employees.iter().find(|e| e.name == name) {
            Some(emp) => Json(emp.clone()).into_response(),
            None => AxumStatus::NOT_FOUND.into_response(),
        }
    }

    fn seeded(count: usize) -> Shared {
        let employees = (1..=count as i64)
            .map(|id| Employee {
                id,
                name: format!("Employee {id}"),
                position: "Engineer".to_string(),
                department: "R&D".to_string(),
            })
            .collect();
        Arc::new(Mutex::new(Backend {
            employees,
            next_id: count as i64,
            deleted: Vec::new(),
        }))
    }

    async fn spawn_backend(state: Shared) -> RosterClient {
        let app = Router::new()
            .route("/api/employees", get(list).post(create))
            .route("/api/employees/{id}", axum::routing::put(update).delete(remove))
            .route("/api/users/{name}", get(users_lookup))
            .route("/api/employees/users/{name}", get(employee_users_lookup))
            .route("/broken/api/employees", get(|| async { "<html>not json</html>" }))
            .route("/failing/api/employees", get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }))
            .route(
                "/acked/api/employees",
                axum::routing::post(|| async { (AxumStatus::CREATED, "Employee saved") }),
            )
            .route(
                "/acked/api/employees/{id}",
                axum::routing::put(|| async { Json(serde_json::json!({ "status": "ok" })) }),
            )
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let http = Client::builder().no_proxy().build().unwrap();
        RosterClient::with_client(http, &format!("http://{addr}")).unwrap()
    }

    fn with_base(client: &RosterClient, path: &str) -> RosterClient {
        let http = Client::builder().no_proxy().build().unwrap();
        let base = client.base_url().trim_end_matches('/').to_string();
        RosterClient::with_client(http, &format!("{base}{path}")).unwrap()
    }

    #[tokio::test]
    async fn test_first_page_of_twelve() {
        let client = spawn_backend(seeded(12)).await;

        let page = client.list_page(0, 5).await.unwrap();

        assert_eq!(page.content.len(), 5);
        assert_eq!(page.total_elements, 12);
        assert_eq!(page.content[0].id, 1);
    }

    #[tokio::test]
    async fn test_row_count_is_min_of_size_and_remaining() {
        let client = spawn_backend(seeded(12)).await;

        for (page, size, expected) in [(0, 5, 5), (1, 5, 5), (2, 5, 2), (0, 25, 12), (1, 10, 2), (3, 5, 0)] {
            let result = client.list_page(page, size).await.unwrap();
            assert_eq!(result.content.len(), expected, "page={page} size={size}");
        }
    }

    #[tokio::test]
    async fn test_lookup_hit_on_both_routes() {
        let client = spawn_backend(seeded(3)).await;

        for route in [LookupRoute::Users, LookupRoute::EmployeeUsers] {
            let found = client.find_by_name(route, "Employee 2").await.unwrap();
            assert_eq!(found.map(|e| e.id), Some(2), "{}", route.label());
        }
    }

    #[tokio::test]
    async fn test_lookup_miss_is_none() {
        let client = spawn_backend(seeded(3)).await;

        assert_eq!(client.find_by_name(LookupRoute::Users, "Alice").await.unwrap(), None);
        assert_eq!(
            client.find_by_name(LookupRoute::EmployeeUsers, "Alice").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let state = seeded(2);
        let client = spawn_backend(state.clone()).await;

        let draft = Employee {
            name: "Alice".to_string(),
            position: "Manager".to_string(),
            department: "Sales".to_string(),
            ..Employee::draft()
        };
        let created = client.create(&draft).await.unwrap().unwrap();
        assert_eq!(created.id, 3);

        let edited = Employee {
            position: "Director".to_string(),
            ..created
        };
        let updated = client.update(&edited).await.unwrap().unwrap();
        assert_eq!(updated.position, "Director");

        client.delete(3).await.unwrap();
        let backend = state.lock().unwrap();
        assert_eq!(backend.employees.len(), 2);
        assert_eq!(backend.deleted, vec![3]);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_still_reaches_server() {
        let state = seeded(2);
        let client = spawn_backend(state.clone()).await;

        client.delete(99).await.unwrap();

        assert_eq!(state.lock().unwrap().deleted, vec![99]);
    }

    #[tokio::test]
    async fn test_update_missing_record_is_error() {
        let client = spawn_backend(seeded(1)).await;
        let ghost = Employee {
            id: 42,
            name: "Ghost".to_string(),
            position: "None".to_string(),
            department: "None".to_string(),
        };

        assert!(matches!(client.update(&ghost).await, Err(AppError::Http(_))));
    }

    #[tokio::test]
    async fn test_lookup_name_is_percent_encoded() {
        let state = seeded(0);
        state.lock().unwrap().employees.push(Employee {
            id: 7,
            name: "Ana Lima/Costa".to_string(),
            position: "Analyst".to_string(),
            department: "Finance".to_string(),
        });
        let client = spawn_backend(state).await;

        let found = client.find_by_name(LookupRoute::Users, "Ana Lima/Costa").await.unwrap();
        assert_eq!(found.map(|e| e.id), Some(7));
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let client = spawn_backend(seeded(1)).await;
        let broken = with_base(&client, "/broken");

        assert!(matches!(broken.list_page(0, 5).await, Err(AppError::Json(_))));
    }

    #[tokio::test]
    async fn test_write_succeeds_on_status_regardless_of_body() {
        let client = spawn_backend(seeded(0)).await;
        let acked = with_base(&client, "/acked");
        let record = Employee {
            id: 4,
            name: "Alice".to_string(),
            position: "Engineer".to_string(),
            department: "R&D".to_string(),
        };

        assert_eq!(acked.create(&record).await.unwrap(), None);
        assert_eq!(acked.update(&record).await.unwrap(), None);
        acked.execute_mutation(Mutation::Create(record.clone())).await.unwrap();
        acked.execute_mutation(Mutation::Update(record)).await.unwrap();
    }

    #[test]
    fn test_echoed_record_ignores_foreign_bodies() {
        assert_eq!(echoed_record(b"Employee saved"), None);
        assert_eq!(echoed_record(b"{\"status\":\"ok\"}"), None);
        assert_eq!(echoed_record(b"{\"id\":3}"), None);
        let echoed = echoed_record(b"{\"id\":3,\"name\":\"A\",\"position\":\"B\",\"department\":\"C\"}");
        assert_eq!(echoed.map(|e| e.id), Some(3));
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let client = spawn_backend(seeded(1)).await;
        let failing = with_base(&client, "/failing/");

        assert!(matches!(failing.list_page(0, 5).await, Err(AppError::Http(_))));
    }

    #[tokio::test]
    async fn test_execute_query_dispatches_by_kind() {
        let client = spawn_backend(seeded(12)).await;

        let page = client
            .execute_query(ListQuery::Page { page: 0, size: 5 })
            .await
            .unwrap();
        match page {
            ListOutcome::Page(p) => {
                assert_eq!(p.content.len(), 5);
                assert_eq!(p.total_elements, 12);
            }
            other => panic!("expected page, got {other:?}"),
        }

        let miss = client
            .execute_query(ListQuery::ByName {
                route: LookupRoute::EmployeeUsers,
                name: "Alice".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(miss, ListOutcome::Found(None));
    }

    #[tokio::test]
    async fn test_execute_mutation_round_trip() {
        let state = seeded(0);
        let client = spawn_backend(state.clone()).await;
        let draft = Employee {
            name: "Alice".to_string(),
            position: "Engineer".to_string(),
            department: "R&D".to_string(),
            ..Employee::draft()
        };

        client.execute_mutation(Mutation::Create(draft)).await.unwrap();
        client.execute_mutation(Mutation::Delete(1)).await.unwrap();

        let backend = state.lock().unwrap();
        assert!(backend.employees.is_empty());
        assert_eq!(backend.deleted, vec![1]);
    }

    #[tokio::test]
    async fn test_connection_reports_total() {
        let client = spawn_backend(seeded(4)).await;
        assert_eq!(client.test_connection().await.unwrap(), 4);
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let http = Client::new();
        let client = RosterClient::with_client(http, "http://host:8080/hr/").unwrap();

        let url = client.endpoint(&["api", "users", "Jo Ann"]).unwrap();
        assert_eq!(url.as_str(), "http://host:8080/hr/api/users/Jo%20Ann");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            RosterClient::with_client(Client::new(), "not a url"),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            RosterClient::with_client(Client::new(), "mailto:hr@example.com"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_decode_optional() {
        assert_eq!(decode_optional(b"").unwrap(), None);
        assert_eq!(decode_optional(b"  \n").unwrap(), None);
        assert_eq!(decode_optional(b"null").unwrap(), None);
        assert!(decode_optional(b"{\"id\":1}").is_err());
    }
}
