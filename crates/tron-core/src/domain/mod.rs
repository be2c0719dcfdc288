//! Domain - ドメインモデル（ids, task, interval, classification, errors）

pub mod classification;
pub mod errors;
pub mod ids;
pub mod interval;
pub mod task;

pub use classification::Classification;
pub use errors::{ConfigError, ParseFailure, RemoteError, TronError};
pub use ids::{StageId, TaskId};
pub use interval::{IntervalSpec, IntervalUnit};
pub use task::Task;
