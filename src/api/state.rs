//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{
    CheckoutProvider, CourseStore, Database, EnrollmentStore, StripeCheckout, UserStore,
};
use crate::services::{
    AuthService, Authenticator, CheckoutHandoff, CourseManager, CourseService, EnrollmentLedger,
    EnrollmentService, PaymentService, UserManager, UserService,
};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub course_service: Arc<dyn CourseService>,
    pub enrollment_service: Arc<dyn EnrollmentService>,
    pub payment_service: Arc<dyn PaymentService>,
    pub database: Arc<Database>,
    pub config: Config,
}

impl AppState {
    /// Wire the full service graph from a database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let provider: Arc<dyn CheckoutProvider> = Arc::new(StripeCheckout::new(&config));
        Self::with_provider(database, config, provider)
    }

    /// Wire the service graph with an explicit checkout provider
    /// (tests substitute a mock here).
    pub fn with_provider(
        database: Arc<Database>,
        config: Config,
        provider: Arc<dyn CheckoutProvider>,
    ) -> Self {
        let db = database.get_connection();

        let users = Arc::new(UserStore::new(db.clone()));
        let courses = Arc::new(CourseStore::new(db.clone()));
        let enrollments = Arc::new(EnrollmentStore::new(db));

        let auth_service = Arc::new(Authenticator::new(users.clone(), config.clone()));
        let user_service = Arc::new(UserManager::new(users.clone()));
        let course_service = Arc::new(CourseManager::new(courses.clone()));
        let enrollment_service = Arc::new(EnrollmentLedger::new(
            enrollments.clone(),
            courses.clone(),
            users,
            provider.clone(),
        ));
        let payment_service = Arc::new(CheckoutHandoff::new(
            courses,
            enrollments,
            provider,
            config.clone(),
        ));

        Self {
            auth_service,
            user_service,
            course_service,
            enrollment_service,
            payment_service,
            database,
            config,
        }
    }

    /// Create application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        course_service: Arc<dyn CourseService>,
        enrollment_service: Arc<dyn EnrollmentService>,
        payment_service: Arc<dyn PaymentService>,
        database: Arc<Database>,
        config: Config,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            course_service,
            enrollment_service,
            payment_service,
            database,
            config,
        }
    }
}
