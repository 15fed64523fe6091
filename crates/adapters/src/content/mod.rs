//! Content provider adapters

mod evergreen;
mod newsapi;
mod the_odds_api;
mod thesportsdb;

pub use evergreen::EvergreenNewsProvider;
pub use newsapi::NewsApiProvider;
pub use the_odds_api::{OddsApiOptions, TheOddsApiProvider};
pub use thesportsdb::TheSportsDbProvider;
