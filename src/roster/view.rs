//! Roster view model.
//!
//! Holds all state behind the roster screen. Operations never perform I/O:
//! they return an [`Effect`] describing the request to run, and the shell
//! feeds the outcome back through [`RosterView::apply_list`] or
//! [`RosterView::apply_mutation`].

use std::time::{Duration, Instant};

use crate::client::LookupRoute;
use crate::config::RosterConfig;
use crate::error::Result;
use crate::models::employee::{Employee, EmployeePage};

use super::debounce::Debouncer;
use super::draft::Draft;
use super::pagination::Pagination;

/// Shown when a list request fails for any reason.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching employees. Please try again later.";

/// Shown when a name lookup comes back empty.
pub const NOT_FOUND_MESSAGE: &str = "No employee found with that name.";

/// What a list request asks the backend for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListQuery {
    Page { page: u32, size: u32 },
    ByName { route: LookupRoute, name: String },
}

/// A list request stamped with its generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub query: ListQuery,
}

/// Successful list response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    Page(EmployeePage),
    Found(Option<Employee>),
}

/// Write request against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create(Employee),
    Update(Employee),
    Delete(i64),
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Create(_) => MutationKind::Create,
            Mutation::Update(_) => MutationKind::Update,
            Mutation::Delete(id) => MutationKind::Delete(*id),
        }
    }
}

/// Mutation identity reported back with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete(i64),
}

/// I/O the shell must perform on behalf of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchRequest),
    Mutate(Mutation),
}

/// Fetch cycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Error,
}

/// State behind the roster screen.
#[derive(Debug)]
pub struct RosterView {
    employees: Vec<Employee>,
    pagination: Pagination,
    page_size_options: Vec<u32>,

    /// Immediate name query; every change fetches right away.
    search_query: String,
    /// Debounced search text as typed.
    search_data: String,
    debouncer: Debouncer,
    query_lookup: LookupRoute,
    search_lookup: LookupRoute,

    pub draft: Draft,
    alert: Option<String>,

    error_message: Option<String>,
    loading: bool,
    generation: u64,
    active_query: Option<ListQuery>,
}

impl RosterView {
    pub fn new(config: &RosterConfig) -> Self {
        Self {
            employees: Vec::new(),
            pagination: Pagination::new(config.page_size),
            page_size_options: config.page_size_options.clone(),
            search_query: String::new(),
            search_data: String::new(),
            debouncer: Debouncer::new(config.debounce()),
            query_lookup: config.query_lookup,
            search_lookup: config.search_lookup,
            draft: Draft::default(),
            alert: None,
            error_message: None,
            loading: false,
            generation: 0,
            active_query: None,
        }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn page_size_options(&self) -> &[u32] {
        &self.page_size_options
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_data(&self) -> &str {
        &self.search_data
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn status(&self) -> FetchStatus {
        if self.loading {
            FetchStatus::Loading
        } else if self.error_message.is_some() {
            FetchStatus::Error
        } else {
            FetchStatus::Idle
        }
    }

    /// Time until the debounced search fires, if one is pending.
    pub fn debounce_remaining(&self, now: Instant) -> Option<Duration> {
        self.debouncer.remaining(now)
    }

    /// Query driven by page, page size and the immediate search field.
    fn primary_query(&self) -> ListQuery {
        if self.search_query.is_empty() {
            self.page_query()
        } else {
            ListQuery::ByName {
                route: self.query_lookup,
                name: self.search_query.clone(),
            }
        }
    }

    fn page_query(&self) -> ListQuery {
        ListQuery::Page {
            page: self.pagination.page(),
            size: self.pagination.page_size(),
        }
    }

    /// Issue a new list request, superseding any in flight.
    fn fetch(&mut self, query: ListQuery) -> Effect {
        self.generation += 1;
        self.loading = true;
        self.active_query = Some(query.clone());
        tracing::debug!("Fetch #{}: {:?}", self.generation, query);

        Effect::Fetch(FetchRequest {
            generation: self.generation,
            query,
        })
    }

    /// Initial load of the first page.
    pub fn load(&mut self) -> Effect {
        let query = self.primary_query();
        self.fetch(query)
    }

    /// Re-issue the most recent list query.
    pub fn refresh(&mut self) -> Effect {
        let query = self.active_query.clone().unwrap_or_else(|| self.primary_query());
        self.fetch(query)
    }

    /// Apply a list response. Responses from superseded requests are dropped.
    ///
    /// Returns `true` if the response was applied.
    pub fn apply_list(&mut self, generation: u64, result: Result<ListOutcome>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                "Discarding stale response #{} (latest #{})",
                generation,
                self.generation
            );
            return false;
        }
        self.loading = false;

        let page = match result {
            Ok(ListOutcome::Page(page)) => Some(page),
            Ok(ListOutcome::Found(Some(employee))) => Some(EmployeePage::single(employee)),
            Ok(ListOutcome::Found(None)) => {
                self.employees.clear();
                self.pagination.set_total(0);
                self.error_message = Some(NOT_FOUND_MESSAGE.to_string());
                None
            }
            Err(e) => {
                tracing::error!("Error fetching employees: {}", e);
                self.error_message = Some(FETCH_ERROR_MESSAGE.to_string());
                None
            }
        };

        if let Some(page) = page {
            self.pagination.set_total(page.total_elements);
            self.employees = page.content;
            self.error_message = None;
        }
        true
    }

    /// Change the immediate query. Goes back to the first page and fetches.
    pub fn set_search_query(&mut self, query: impl Into<String>) -> Option<Effect> {
        let query = query.into();
        if query == self.search_query {
            return None;
        }
        self.search_query = query;
        self.pagination.reset_page();
        Some(self.load())
    }

    /// Record a keystroke in the debounced search field.
    pub fn set_search_data(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.debouncer.push(text.clone(), now);
        self.search_data = text;
    }

    /// Advance the debounce clock. Fires the lookup once the input settles.
    pub fn tick(&mut self, now: Instant) -> Option<Effect> {
        let value = self.debouncer.poll(now)?;
        let query = if value.is_empty() {
            self.page_query()
        } else {
            ListQuery::ByName {
                route: self.search_lookup,
                name: value,
            }
        };
        Some(self.fetch(query))
    }

    /// Clear both search fields and show the current page again.
    pub fn clear_search(&mut self) -> Effect {
        self.debouncer.cancel();
        self.search_data.clear();
        self.search_query.clear();
        self.pagination.reset_page();
        self.load()
    }

    pub fn set_page(&mut self, page: u32) -> Option<Effect> {
        if self.pagination.set_page(page) {
            Some(self.load())
        } else {
            None
        }
    }

    pub fn set_page_size(&mut self, page_size: u32) -> Option<Effect> {
        if self.pagination.set_page_size(page_size) {
            Some(self.load())
        } else {
            None
        }
    }

    /// Copy a loaded row into the draft and enter edit mode.
    ///
    /// Only the rows on screen are searched. Returns `false` for unknown ids.
    pub fn edit_employee(&mut self, id: i64) -> bool {
        match self.employees.iter().find(|e| e.id == id) {
            Some(employee) => {
                self.draft.edit(employee);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.draft.reset();
    }

    /// Submit the form in its current mode.
    pub fn submit(&mut self) -> Option<Effect> {
        if self.draft.is_editing {
            self.update_employee()
        } else {
            self.add_employee()
        }
    }

    /// Post the draft as a new record. Raises an alert if a field is missing.
    pub fn add_employee(&mut self) -> Option<Effect> {
        match self.draft.validate() {
            Ok(employee) => Some(Effect::Mutate(Mutation::Create(employee))),
            Err(field) => {
                self.alert = Some(field.to_string());
                None
            }
        }
    }

    /// Replace the record being edited.
    pub fn update_employee(&mut self) -> Option<Effect> {
        match self.draft.validate() {
            Ok(employee) => Some(Effect::Mutate(Mutation::Update(employee))),
            Err(field) => {
                self.alert = Some(field.to_string());
                None
            }
        }
    }

    /// Delete by id, whether or not the id is on screen.
    pub fn delete_employee(&mut self, id: i64) -> Effect {
        Effect::Mutate(Mutation::Delete(id))
    }

    /// Apply the result of a mutation. Success re-fetches the current list.
    pub fn apply_mutation(&mut self, kind: MutationKind, result: Result<()>) -> Option<Effect> {
        if let Err(e) = result {
            match kind {
                MutationKind::Create => tracing::error!("Error adding employee: {}", e),
                MutationKind::Update => tracing::error!("Error updating employee: {}", e),
                MutationKind::Delete(id) => tracing::error!("Error deleting employee {}: {}", id, e),
            }
            return None;
        }

        match kind {
            MutationKind::Create | MutationKind::Update => self.draft.reset(),
            MutationKind::Delete(_) => {}
        }
        Some(self.refresh())
    }
}
