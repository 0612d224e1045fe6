//! Global state container
//!
//! - `state`: the state struct and its parts
//! - `action`: transitions
//! - `reducer`: pure `(state, action) -> state`
//! - `selectors`: read views, including client-side filtering

pub mod action;
pub mod reducer;
pub mod selectors;
pub mod state;

pub use action::Action;
pub use reducer::reduce;
pub use state::{
    AppState, CategoryPageState, CategoryState, FilterCriteria, FilterUpdate, PagedListing, Route,
    SearchState, MAX_TOTAL_PAGES,
};
