//! Enrollment service integration tests.
//!
//! These tests use mock repositories and a mock checkout provider to
//! exercise the enrollment rules without a database or network.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use learnhub_api::domain::{Course, Difficulty, Enrollment, Lesson, User, UserRole};
use learnhub_api::errors::AppError;
use learnhub_api::infra::repositories::{
    MockCourseRepository, MockEnrollmentRepository, MockUserRepository,
};
use learnhub_api::infra::{CheckoutSession, MockCheckoutProvider, PaymentState};
use learnhub_api::services::{EnrollmentLedger, EnrollmentService};

fn course(id: Uuid, price: i64, lessons: Vec<Lesson>) -> Course {
    Course {
        id,
        title: "Systems Programming".to_string(),
        slug: "systems-programming".to_string(),
        description: "Low-level fundamentals".to_string(),
        faculty: "R. Hoare".to_string(),
        category: "engineering".to_string(),
        difficulty: Difficulty::Intermediate,
        price,
        thumbnail_url: String::new(),
        lessons,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn lesson(id: Uuid, order: u32) -> Lesson {
    Lesson {
        id,
        title: format!("Lesson {}", order),
        content_html: String::new(),
        video_url: String::new(),
        order,
    }
}

fn enrollment(id: Uuid, user_id: Uuid, course_id: Uuid, is_paid: bool) -> Enrollment {
    Enrollment {
        id,
        user_id,
        course_id,
        is_paid,
        progress: HashMap::new(),
        created_at: Utc::now(),
    }
}

fn paid_session(session_id: &str, user_id: Uuid, course_id: Uuid) -> CheckoutSession {
    CheckoutSession {
        id: session_id.to_string(),
        url: None,
        payment_state: PaymentState::Paid,
        user_id: Some(user_id),
        course_id: Some(course_id),
    }
}

fn ledger(
    enrollments: MockEnrollmentRepository,
    courses: MockCourseRepository,
    users: MockUserRepository,
    provider: MockCheckoutProvider,
) -> EnrollmentLedger {
    EnrollmentLedger::new(
        Arc::new(enrollments),
        Arc::new(courses),
        Arc::new(users),
        Arc::new(provider),
    )
}

// =============================================================================
// Free enrollment
// =============================================================================

#[tokio::test]
async fn free_enrollment_succeeds_for_free_course() {
    let user_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .with(eq(course_id))
        .returning(move |id| Ok(Some(course(id, 0, vec![]))));

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_insert()
        .with(eq(user_id), eq(course_id), eq(false))
        .returning(|user_id, course_id, is_paid| {
            Ok(enrollment(Uuid::new_v4(), user_id, course_id, is_paid))
        });

    let service = ledger(
        enrollments,
        courses,
        MockUserRepository::new(),
        MockCheckoutProvider::new(),
    );

    let created = service.enroll_free(user_id, course_id).await.unwrap();
    assert_eq!(created.user_id, user_id);
    assert_eq!(created.course_id, course_id);
    assert!(!created.is_paid);
}

#[tokio::test]
async fn free_enrollment_on_paid_course_requires_payment() {
    let course_id = Uuid::new_v4();

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .with(eq(course_id))
        .returning(move |id| Ok(Some(course(id, 499, vec![]))));

    let service = ledger(
        MockEnrollmentRepository::new(),
        courses,
        MockUserRepository::new(),
        MockCheckoutProvider::new(),
    );

    let result = service.enroll_free(Uuid::new_v4(), course_id).await;
    assert!(matches!(result, Err(AppError::PaymentRequired)));
}

#[tokio::test]
async fn free_enrollment_on_unknown_course_is_not_found() {
    let mut courses = MockCourseRepository::new();
    courses.expect_find_by_id().returning(|_| Ok(None));

    let service = ledger(
        MockEnrollmentRepository::new(),
        courses,
        MockUserRepository::new(),
        MockCheckoutProvider::new(),
    );

    let result = service.enroll_free(Uuid::new_v4(), Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn duplicate_enrollment_surfaces_conflict() {
    let course_id = Uuid::new_v4();

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .returning(move |id| Ok(Some(course(id, 0, vec![]))));

    // The storage layer reports the unique constraint violation; the
    // service passes it through untouched.
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_insert()
        .returning(|_, _, _| Err(AppError::AlreadyEnrolled));

    let service = ledger(
        enrollments,
        courses,
        MockUserRepository::new(),
        MockCheckoutProvider::new(),
    );

    let result = service.enroll_free(Uuid::new_v4(), course_id).await;
    assert!(matches!(result, Err(AppError::AlreadyEnrolled)));
}

// =============================================================================
// Paid enrollment
// =============================================================================

#[tokio::test]
async fn paid_enrollment_succeeds_with_verified_session() {
    let user_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .with(eq(course_id))
        .returning(move |id| Ok(Some(course(id, 499, vec![]))));

    let mut provider = MockCheckoutProvider::new();
    provider
        .expect_retrieve_session()
        .with(eq("cs_test_ok"))
        .returning(move |id| Ok(paid_session(id, user_id, course_id)));

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_insert()
        .with(eq(user_id), eq(course_id), eq(true))
        .returning(|user_id, course_id, is_paid| {
            Ok(enrollment(Uuid::new_v4(), user_id, course_id, is_paid))
        });

    let service = ledger(enrollments, courses, MockUserRepository::new(), provider);

    let created = service
        .enroll_paid(user_id, course_id, "cs_test_ok".to_string())
        .await
        .unwrap();
    assert!(created.is_paid);
}

#[tokio::test]
async fn paid_enrollment_rejects_unpaid_session() {
    let user_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .returning(move |id| Ok(Some(course(id, 499, vec![]))));

    let mut provider = MockCheckoutProvider::new();
    provider.expect_retrieve_session().returning(move |id| {
        let mut session = paid_session(id, user_id, course_id);
        session.payment_state = PaymentState::Unpaid;
        Ok(session)
    });

    let service = ledger(
        MockEnrollmentRepository::new(),
        courses,
        MockUserRepository::new(),
        provider,
    );

    let result = service
        .enroll_paid(user_id, course_id, "cs_test_open".to_string())
        .await;
    assert!(matches!(result, Err(AppError::PaymentRequired)));
}

#[tokio::test]
async fn paid_enrollment_rejects_session_for_other_user() {
    let user_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .returning(move |id| Ok(Some(course(id, 499, vec![]))));

    // Session paid, but its metadata names a different buyer.
    let mut provider = MockCheckoutProvider::new();
    provider
        .expect_retrieve_session()
        .returning(move |id| Ok(paid_session(id, Uuid::new_v4(), course_id)));

    let service = ledger(
        MockEnrollmentRepository::new(),
        courses,
        MockUserRepository::new(),
        provider,
    );

    let result = service
        .enroll_paid(user_id, course_id, "cs_test_stolen".to_string())
        .await;
    assert!(matches!(result, Err(AppError::PaymentRequired)));
}

#[tokio::test]
async fn paid_enrollment_rejects_session_for_other_course() {
    let user_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .returning(move |id| Ok(Some(course(id, 499, vec![]))));

    let mut provider = MockCheckoutProvider::new();
    provider
        .expect_retrieve_session()
        .returning(move |id| Ok(paid_session(id, user_id, Uuid::new_v4())));

    let service = ledger(
        MockEnrollmentRepository::new(),
        courses,
        MockUserRepository::new(),
        provider,
    );

    let result = service
        .enroll_paid(user_id, course_id, "cs_test_other".to_string())
        .await;
    assert!(matches!(result, Err(AppError::PaymentRequired)));
}

#[tokio::test]
async fn paid_enrollment_on_free_course_is_invalid() {
    let course_id = Uuid::new_v4();

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .returning(move |id| Ok(Some(course(id, 0, vec![]))));

    let service = ledger(
        MockEnrollmentRepository::new(),
        courses,
        MockUserRepository::new(),
        MockCheckoutProvider::new(),
    );

    let result = service
        .enroll_paid(Uuid::new_v4(), course_id, "cs_test".to_string())
        .await;
    assert!(matches!(result, Err(AppError::InvalidCourse)));
}

// =============================================================================
// Lesson progress
// =============================================================================

#[tokio::test]
async fn progress_update_writes_single_lesson() {
    let user_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();
    let enrollment_id = Uuid::new_v4();
    let lesson_id = Uuid::new_v4();

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_by_id()
        .with(eq(enrollment_id))
        .returning(move |id| Ok(Some(enrollment(id, user_id, course_id, false))));
    enrollments
        .expect_set_lesson_progress()
        .with(eq(enrollment_id), eq(lesson_id), eq(true))
        .returning(|_, _, _| Ok(()));

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .with(eq(course_id))
        .returning(move |id| Ok(Some(course(id, 0, vec![lesson(lesson_id, 1)]))));

    let service = ledger(
        enrollments,
        courses,
        MockUserRepository::new(),
        MockCheckoutProvider::new(),
    );

    service
        .update_progress(user_id, enrollment_id, lesson_id, true)
        .await
        .unwrap();
}

#[tokio::test]
async fn repeated_progress_update_converges_on_the_same_state() {
    let user_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();
    let enrollment_id = Uuid::new_v4();
    let lesson_id = Uuid::new_v4();

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_by_id()
        .with(eq(enrollment_id))
        .times(2)
        .returning(move |id| Ok(Some(enrollment(id, user_id, course_id, false))));
    // Both calls reach storage as the identical single-key write.
    enrollments
        .expect_set_lesson_progress()
        .with(eq(enrollment_id), eq(lesson_id), eq(true))
        .times(2)
        .returning(|_, _, _| Ok(()));

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .with(eq(course_id))
        .times(2)
        .returning(move |id| Ok(Some(course(id, 0, vec![lesson(lesson_id, 1)]))));

    let service = ledger(
        enrollments,
        courses,
        MockUserRepository::new(),
        MockCheckoutProvider::new(),
    );

    service
        .update_progress(user_id, enrollment_id, lesson_id, true)
        .await
        .unwrap();
    service
        .update_progress(user_id, enrollment_id, lesson_id, true)
        .await
        .unwrap();
}

#[tokio::test]
async fn progress_update_by_non_owner_is_forbidden() {
    let owner_id = Uuid::new_v4();
    let enrollment_id = Uuid::new_v4();

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_by_id()
        .returning(move |id| Ok(Some(enrollment(id, owner_id, Uuid::new_v4(), false))));

    let service = ledger(
        enrollments,
        MockCourseRepository::new(),
        MockUserRepository::new(),
        MockCheckoutProvider::new(),
    );

    // A different caller, regardless of role.
    let result = service
        .update_progress(Uuid::new_v4(), enrollment_id, Uuid::new_v4(), true)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn progress_update_on_unpaid_enrollment_requires_payment() {
    let user_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();
    let enrollment_id = Uuid::new_v4();
    let lesson_id = Uuid::new_v4();

    // Paid course, but the enrollment was never granted the paid flag.
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_by_id()
        .returning(move |id| Ok(Some(enrollment(id, user_id, course_id, false))));

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .returning(move |id| Ok(Some(course(id, 499, vec![lesson(lesson_id, 1)]))));

    let service = ledger(
        enrollments,
        courses,
        MockUserRepository::new(),
        MockCheckoutProvider::new(),
    );

    let result = service
        .update_progress(user_id, enrollment_id, lesson_id, true)
        .await;
    assert!(matches!(result, Err(AppError::PaymentRequired)));
}

#[tokio::test]
async fn progress_update_for_unknown_lesson_is_invalid() {
    let user_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();
    let enrollment_id = Uuid::new_v4();

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_by_id()
        .returning(move |id| Ok(Some(enrollment(id, user_id, course_id, false))));

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .returning(move |id| Ok(Some(course(id, 0, vec![lesson(Uuid::new_v4(), 1)]))));

    let service = ledger(
        enrollments,
        courses,
        MockUserRepository::new(),
        MockCheckoutProvider::new(),
    );

    let result = service
        .update_progress(user_id, enrollment_id, Uuid::new_v4(), true)
        .await;
    assert!(matches!(result, Err(AppError::InvalidLesson)));
}

#[tokio::test]
async fn progress_update_on_missing_enrollment_is_not_found() {
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments.expect_find_by_id().returning(|_| Ok(None));

    let service = ledger(
        enrollments,
        MockCourseRepository::new(),
        MockUserRepository::new(),
        MockCheckoutProvider::new(),
    );

    let result = service
        .update_progress(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), true)
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

// =============================================================================
// Listings
// =============================================================================

#[tokio::test]
async fn my_enrollments_drop_removed_courses() {
    let user_id = Uuid::new_v4();
    let kept_course_id = Uuid::new_v4();
    let removed_course_id = Uuid::new_v4();

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments.expect_list_by_user().returning(move |user_id| {
        Ok(vec![
            enrollment(Uuid::new_v4(), user_id, kept_course_id, false),
            enrollment(Uuid::new_v4(), user_id, removed_course_id, true),
        ])
    });

    // Only one of the two referenced courses still exists.
    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_many()
        .returning(move |_| Ok(vec![course(kept_course_id, 0, vec![])]));

    let service = ledger(
        enrollments,
        courses,
        MockUserRepository::new(),
        MockCheckoutProvider::new(),
    );

    let views = service.list_mine(user_id).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].course.id, kept_course_id);
    assert_eq!(views[0].enrollment.course_id, kept_course_id);
}

#[tokio::test]
async fn admin_listing_keeps_enrollments_with_missing_context() {
    let user_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments.expect_list_all().returning(move || {
        Ok(vec![
            enrollment(Uuid::new_v4(), user_id, course_id, true),
            enrollment(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), false),
        ])
    });

    let mut users = MockUserRepository::new();
    users.expect_find_many().returning(move |_| {
        Ok(vec![User {
            id: user_id,
            email: "learner@example.com".to_string(),
            password_hash: "hashed".to_string(),
            name: "Learner".to_string(),
            role: UserRole::Learner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }])
    });

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_many()
        .returning(move |_| Ok(vec![course(course_id, 499, vec![])]));

    let service = ledger(enrollments, courses, users, MockCheckoutProvider::new());

    let views = service.list_all().await.unwrap();
    assert_eq!(views.len(), 2);

    let resolved = views
        .iter()
        .find(|v| v.enrollment.user_id == user_id)
        .unwrap();
    assert_eq!(
        resolved.user.as_ref().map(|u| u.email.as_str()),
        Some("learner@example.com")
    );
    assert_eq!(resolved.course_title.as_deref(), Some("Systems Programming"));

    let orphan = views
        .iter()
        .find(|v| v.enrollment.user_id != user_id)
        .unwrap();
    assert!(orphan.user.is_none());
    assert!(orphan.course_title.is_none());
}
