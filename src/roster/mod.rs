//! Roster screen state: pagination, debounced search, draft form and the
//! view model that ties them to list requests.

pub mod debounce;
pub mod draft;
pub mod pagination;
pub mod view;

pub use debounce::Debouncer;
pub use draft::{Draft, RequiredField};
pub use pagination::Pagination;
pub use view::{
    Effect, FETCH_ERROR_MESSAGE, FetchRequest, FetchStatus, ListOutcome, ListQuery, Mutation, MutationKind,
    NOT_FOUND_MESSAGE, RosterView,
};
