pub mod admin_service;
pub mod collection_service;
pub mod farmer_service;
pub mod rate_service;
pub mod statement_service;
pub mod summary_service;

pub use admin_service::AdminService;
pub use collection_service::CollectionService;
pub use farmer_service::FarmerService;
pub use rate_service::{round2, Quote, RatePolicy, RateService};
pub use statement_service::StatementService;
pub use summary_service::SummaryService;

use crate::core::errors::DairyError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] DairyError),
    #[error("{0}")]
    Invalid(String),
}
