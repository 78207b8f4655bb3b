#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod results_service;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::{CatalogService, DEFAULT_RECOMMENDATIONS};
pub use error::{
    AppServicesError, ErrorKind, FinishError, Missing, NavigationError, ResultsError,
    StartError, StateConflict, SubmitError,
};
pub use results_service::{Achievement, ResultPeriod, ResultStats, ResultsService};

pub use sessions::{
    QuestionState, QuizSession, ResultProjector, SessionController, SessionEvent,
    SessionProgress, SessionStatus, SessionStore, StoreState,
};
