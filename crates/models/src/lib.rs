pub mod errors;
pub mod db;
pub mod types;
pub mod service;
pub mod service_checklist;
pub mod service_subtask;
pub mod client_service;
pub mod supporting_file;
pub mod audit_log;

#[cfg(test)]
mod tests;
