pub mod exec;
pub mod export;
pub mod queries;

pub use exec::exec;
pub use export::exec as export;
pub use queries::ReportQueries;

/// Per-user module activity: for each user, the active-day count of every
/// module the user ever touched, modules in first-match order.
pub type ModuleActivity = Vec<(String, Vec<(String, u64)>)>;

/// Per-user, per-date module activity: for each user, for each date, the
/// matched-file count of every module active that day.
pub type ModuleActivityByDate = Vec<(String, Vec<(String, Vec<(String, u64)>)>)>;
