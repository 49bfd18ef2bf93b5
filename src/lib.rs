pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod fetch;
pub mod head_to_head;
pub mod logging;
pub mod match_table;
pub mod model;
pub mod predictions;
pub mod query;
pub mod relationships;
pub mod roster;
pub mod statistic;
pub mod store;
pub mod surfaces;
pub mod synthetic;
pub mod timeline;

pub use error::{QueryError, QueryResult};
pub use model::{MatchRecord, Round, Surface};
pub use query::Dashboard;
pub use statistic::Statistic;
pub use timeline::Granularity;
