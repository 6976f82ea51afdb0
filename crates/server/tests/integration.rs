mod common;

use std::sync::Arc;

use classroom_core::domain::{
    AssignmentId, ClassId, ClassStatus, EnrollmentStatus, Grade, MaterialId, ModuleId, Progress,
    Role, SubmissionStatus, UserId,
};
use classroom_server::entity::{assignment, enrollment, material, module, progress};
use classroom_server::error::{AppError, ErrorKind};
use classroom_server::repository::{
    ClassChanges, GradeSubmission, NewAssignment, NewModule, SeaOrmClassRepository,
};
use classroom_server::service::ProgressTracker;
use common::{FlakyCacheProgressRepository, TestApp};
use sea_orm::{EntityTrait, PaginatorTrait};

async fn enrollment_rows(app: &TestApp) -> u64 {
    enrollment::Entity::find()
        .count(&app.db)
        .await
        .expect("count enrollments")
}

async fn listed_progress(app: &TestApp, user_id: UserId, class_id: ClassId) -> f64 {
    app.state
        .overview
        .list_classes(Some(user_id))
        .await
        .expect("list classes")
        .into_iter()
        .find(|listing| listing.class.id == class_id)
        .map(|listing| listing.progress)
        .expect("class should be listed")
}

#[tokio::test]
async fn test_progress_follows_completed_modules() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let student = app.user("Student", Role::User).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;
    let modules = app.syllabus(teacher.id, class.id, 2, 2).await;
    assert_eq!(modules.len(), 4);

    let tracker = &app.state.progress;
    for &(material_id, module_id) in &modules[..2] {
        tracker
            .track(student.id, class.id, material_id, module_id)
            .await
            .expect("tracking should succeed");
    }
    let progress = tracker
        .compute(student.id, class.id)
        .await
        .expect("compute progress");
    assert_eq!(progress.percentage(), 50.0);

    let (material_id, module_id) = modules[2];
    let tracked = tracker
        .track(student.id, class.id, material_id, module_id)
        .await
        .expect("tracking should succeed");
    assert_eq!(tracked.percentage(), 75.0);
    assert_eq!(tracked.progress.completed(), 3);
    assert_eq!(tracked.progress.total(), 4);

    // Completing the same module again must not count twice.
    let (material_id, module_id) = modules[0];
    let tracked = tracker
        .track(student.id, class.id, material_id, module_id)
        .await
        .expect("re-tracking should succeed");
    assert_eq!(tracked.percentage(), 75.0);

    let rows = progress::Entity::find()
        .count(&app.db)
        .await
        .expect("count progress rows");
    assert_eq!(rows, 3);
}

#[tokio::test]
async fn test_progress_of_empty_class_is_zero() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let student = app.user("Student", Role::User).await;
    let class = app.class(teacher.id, "Empty", ClassStatus::Public).await;

    let progress = app
        .state
        .progress
        .report(student.id, class.id)
        .await
        .expect("report progress");

    assert_eq!(progress.total(), 0);
    assert_eq!(progress.percentage(), 0.0);
}

#[tokio::test]
async fn test_progress_report_for_missing_class() {
    let app = TestApp::new().await;
    let student = app.user("Student", Role::User).await;

    let err = app
        .state
        .progress
        .report(student.id, ClassId::from(404))
        .await
        .expect_err("missing class should fail");

    assert!(matches!(err, AppError::ClassNotFound));
}

#[tokio::test]
async fn test_tracking_rejects_broken_module_chain() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let student = app.user("Student", Role::User).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;
    let other = app.class(teacher.id, "Go 101", ClassStatus::Public).await;
    let modules = app.syllabus(teacher.id, class.id, 1, 1).await;
    let foreign = app.syllabus(teacher.id, other.id, 1, 1).await;

    let cases = [
        (class.id, modules[0].0, ModuleId::from(9999)),
        (class.id, MaterialId::from(9999), modules[0].1),
        (class.id, foreign[0].0, foreign[0].1),
        (ClassId::from(9999), modules[0].0, modules[0].1),
    ];

    for (class_id, material_id, module_id) in cases {
        let err = app
            .state
            .progress
            .track(student.id, class_id, material_id, module_id)
            .await
            .expect_err("broken chain should be rejected");
        assert!(matches!(err, AppError::InvalidReference(_)), "got {err:?}");
    }

    let rows = progress::Entity::find()
        .count(&app.db)
        .await
        .expect("count progress rows");
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn test_stale_cache_heals_on_next_tracking() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let student = app.user("Student", Role::User).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;
    let modules = app.syllabus(teacher.id, class.id, 1, 2).await;

    let flaky = FlakyCacheProgressRepository::new(app.db.clone());
    let tracker = ProgressTracker::new(
        Arc::new(SeaOrmClassRepository::new(app.db.clone())),
        Arc::new(flaky.clone()),
    );

    flaky.set_failing(true);
    let (material_id, module_id) = modules[0];
    tracker
        .track(student.id, class.id, material_id, module_id)
        .await
        .expect_err("cache write failure should surface");

    // The module row survived; only the cached aggregate is missing.
    assert_eq!(
        tracker
            .compute(student.id, class.id)
            .await
            .expect("compute")
            .percentage(),
        50.0
    );
    assert_eq!(listed_progress(&app, student.id, class.id).await, 0.0);
    let overview = app
        .state
        .overview
        .overview(Some(student.id), class.id)
        .await
        .expect("overview");
    assert_eq!(overview.progress, 50.0);

    flaky.set_failing(false);
    let (material_id, module_id) = modules[1];
    tracker
        .track(student.id, class.id, material_id, module_id)
        .await
        .expect("tracking should succeed");

    assert_eq!(listed_progress(&app, student.id, class.id).await, 100.0);
    let overview = app
        .state
        .overview
        .overview(Some(student.id), class.id)
        .await
        .expect("overview");
    assert_eq!(overview.progress, 100.0);
}

#[tokio::test]
async fn test_concurrent_tracking_leaves_cache_current() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let student = app.user("Student", Role::User).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;
    let modules = app.syllabus(teacher.id, class.id, 1, 3).await;

    let tracker = &app.state.progress;
    let (first, second) = tokio::join!(
        tracker.track(student.id, class.id, modules[0].0, modules[0].1),
        tracker.track(student.id, class.id, modules[1].0, modules[1].1),
    );
    first.expect("first tracking should succeed");
    second.expect("second tracking should succeed");

    let expected = Progress::new(2, 3).expect("counts are consistent").percentage();
    assert_eq!(listed_progress(&app, student.id, class.id).await, expected);
    assert_eq!(
        tracker
            .compute(student.id, class.id)
            .await
            .expect("compute")
            .percentage(),
        expected
    );
}

#[tokio::test]
async fn test_second_enrollment_is_rejected() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let student = app.user("Student", Role::User).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;

    app.state
        .enrollments
        .enroll(student.id, class.id)
        .await
        .expect("first enrollment should succeed");
    let err = app
        .state
        .enrollments
        .enroll(student.id, class.id)
        .await
        .expect_err("second enrollment should fail");

    assert!(matches!(err, AppError::AlreadyEnrolled));
    assert_eq!(enrollment_rows(&app).await, 1);
}

#[tokio::test]
async fn test_concurrent_enrollment_has_one_winner() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let student = app.user("Student", Role::User).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;

    let manager = &app.state.enrollments;
    let (first, second) = tokio::join!(
        manager.enroll(student.id, class.id),
        manager.enroll(student.id, class.id),
    );

    let results = [first, second];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(AppError::AlreadyEnrolled)))
    );
    assert_eq!(enrollment_rows(&app).await, 1);
}

#[tokio::test]
async fn test_enrolling_in_missing_class() {
    let app = TestApp::new().await;
    let student = app.user("Student", Role::User).await;

    let err = app
        .state
        .enrollments
        .enroll(student.id, ClassId::from(404))
        .await
        .expect_err("missing class should fail");

    assert!(matches!(err, AppError::ClassNotFound));
    assert_eq!(enrollment_rows(&app).await, 0);
}

#[tokio::test]
async fn test_teacher_adds_and_removes_student() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let alice = app.user("Alice", Role::User).await;
    let bob = app.user("Bob", Role::User).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Draft).await;
    let manager = &app.state.enrollments;

    let enrollment = manager
        .add_student(teacher.id, class.id, alice.id)
        .await
        .expect("owner can add a student");
    assert_eq!(enrollment.status, EnrollmentStatus::Active);
    assert_eq!(enrollment.user_id, alice.id);

    let err = manager
        .add_student(teacher.id, class.id, alice.id)
        .await
        .expect_err("duplicate add should fail");
    assert!(matches!(err, AppError::AlreadyEnrolled));

    let err = manager
        .add_student(teacher.id, class.id, UserId::new())
        .await
        .expect_err("unknown student should fail");
    assert!(matches!(err, AppError::NotFound(_)));

    let roster = manager
        .roster(teacher.id, class.id)
        .await
        .expect("roster");
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].name, "Alice");

    let outside = manager
        .not_enrolled(teacher.id, class.id)
        .await
        .expect("not enrolled listing");
    let names: Vec<_> = outside.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Bob"]);
    assert_eq!(outside[0].id, bob.id);

    manager
        .remove_student(teacher.id, class.id, alice.id)
        .await
        .expect("owner can remove a student");
    assert_eq!(enrollment_rows(&app).await, 0);
}

#[tokio::test]
async fn test_remove_student_errors_are_indistinguishable() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let intruder = app.user("Intruder", Role::Teacher).await;
    let alice = app.user("Alice", Role::User).await;
    let bob = app.user("Bob", Role::User).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;
    let manager = &app.state.enrollments;

    manager
        .enroll(alice.id, class.id)
        .await
        .expect("enrollment should succeed");

    let not_owner = manager
        .remove_student(intruder.id, class.id, alice.id)
        .await
        .expect_err("non-owner removal should fail");
    let not_enrolled = manager
        .remove_student(teacher.id, class.id, bob.id)
        .await
        .expect_err("removing a non-enrolled student should fail");

    assert_eq!(not_owner.kind(), ErrorKind::NotFound);
    assert_eq!(not_owner.kind(), not_enrolled.kind());
    assert_eq!(not_owner.to_string(), not_enrolled.to_string());
    assert_eq!(enrollment_rows(&app).await, 1);
}

#[tokio::test]
async fn test_toggle_visibility_is_an_involution() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Draft).await;
    let classes = &app.state.classes;

    let once = classes
        .toggle_visibility(teacher.id, class.id)
        .await
        .expect("first toggle");
    assert_eq!(once.status, ClassStatus::Public);

    let twice = classes
        .toggle_visibility(teacher.id, class.id)
        .await
        .expect("second toggle");
    assert_eq!(twice.status, ClassStatus::Draft);
}

#[tokio::test]
async fn test_class_mutations_are_owner_scoped() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let intruder = app.user("Intruder", Role::Teacher).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;
    let classes = &app.state.classes;

    let err = classes
        .toggle_visibility(intruder.id, class.id)
        .await
        .expect_err("non-owner toggle should fail");
    assert!(matches!(err, AppError::NotFoundOrUnauthorized(_)));

    let changes = ClassChanges {
        title: "Hijacked".to_string(),
        description: String::new(),
        image: None,
        video: None,
        status: ClassStatus::Draft,
    };
    let err = classes
        .update(intruder.id, class.id, changes.clone())
        .await
        .expect_err("non-owner update should fail");
    assert!(matches!(err, AppError::NotFoundOrUnauthorized(_)));

    let err = classes
        .delete(intruder.id, class.id)
        .await
        .expect_err("non-owner delete should fail");
    assert!(matches!(err, AppError::NotFoundOrUnauthorized(_)));

    let overview = app
        .state
        .overview
        .overview(None, class.id)
        .await
        .expect("class is untouched");
    assert_eq!(overview.class.title, "Rust 101");
    assert_eq!(overview.class.status, ClassStatus::Public);

    let updated = classes
        .update(teacher.id, class.id, changes)
        .await
        .expect("owner update");
    assert_eq!(updated.title, "Hijacked");
    assert_eq!(updated.status, ClassStatus::Draft);
}

#[tokio::test]
async fn test_deleting_class_cascades() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let student = app.user("Student", Role::User).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;
    let modules = app.syllabus(teacher.id, class.id, 1, 1).await;

    app.state
        .enrollments
        .enroll(student.id, class.id)
        .await
        .expect("enroll");
    app.state
        .progress
        .track(student.id, class.id, modules[0].0, modules[0].1)
        .await
        .expect("track");

    app.state
        .classes
        .delete(teacher.id, class.id)
        .await
        .expect("owner delete");

    assert_eq!(enrollment_rows(&app).await, 0);
    let rows = progress::Entity::find()
        .count(&app.db)
        .await
        .expect("count progress rows");
    assert_eq!(rows, 0);

    let err = app
        .state
        .overview
        .overview(None, class.id)
        .await
        .expect_err("deleted class is gone");
    assert!(matches!(err, AppError::ClassNotFound));
}

#[tokio::test]
async fn test_owned_class_totals() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let other = app.user("Other", Role::Teacher).await;
    let student = app.user("Student", Role::User).await;
    let full = app.class(teacher.id, "Full", ClassStatus::Public).await;
    let empty = app.class(teacher.id, "Empty", ClassStatus::Draft).await;
    app.class(other.id, "Not mine", ClassStatus::Public).await;
    app.syllabus(teacher.id, full.id, 2, 3).await;
    app.state
        .enrollments
        .enroll(student.id, full.id)
        .await
        .expect("enroll");

    let owned = app
        .state
        .classes
        .list_owned(teacher.id)
        .await
        .expect("list owned");

    assert_eq!(owned.len(), 2);
    assert_eq!(owned[0].class.id, full.id);
    assert_eq!(owned[0].materials_total, 2);
    assert_eq!(owned[0].modules_total, 6);
    assert_eq!(owned[0].student_enrolled_total, 1);
    assert_eq!(owned[1].class.id, empty.id);
    assert_eq!(owned[1].materials_total, 0);
    assert_eq!(owned[1].modules_total, 0);
    assert_eq!(owned[1].student_enrolled_total, 0);
}

#[tokio::test]
async fn test_overview_for_non_enrolled_caller() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let student = app.user("Student", Role::User).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;
    let modules = app.syllabus(teacher.id, class.id, 2, 2).await;

    let overview = app
        .state
        .overview
        .overview(Some(student.id), class.id)
        .await
        .expect("overview");

    assert_eq!(overview.enrollment_status, EnrollmentStatus::NotEnrolled);
    assert_eq!(overview.progress, 0.0);
    assert_eq!(overview.materials.len(), 2);
    let flattened: Vec<_> = overview
        .materials
        .iter()
        .flat_map(|tree| tree.modules.iter().map(move |m| (tree.material.id, m.id)))
        .collect();
    assert_eq!(flattened, modules);
    assert_eq!(overview.materials[0].modules[0].attachments, vec!["m1-1.pdf"]);
}

#[tokio::test]
async fn test_overview_progress_follows_syllabus_changes() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let student = app.user("Student", Role::User).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;
    let modules = app.syllabus(teacher.id, class.id, 1, 1).await;
    let (material_id, module_id) = modules[0];

    app.state
        .enrollments
        .enroll(student.id, class.id)
        .await
        .expect("enroll");
    app.state
        .progress
        .track(student.id, class.id, material_id, module_id)
        .await
        .expect("track");

    let overview = app
        .state
        .overview
        .overview(Some(student.id), class.id)
        .await
        .expect("overview");
    assert_eq!(overview.enrollment_status, EnrollmentStatus::Active);
    assert_eq!(overview.progress, 100.0);

    app.state
        .syllabus
        .create_module(
            teacher.id,
            class.id,
            material_id,
            NewModule {
                title: "Module 1.2".to_string(),
                content: "Lifetimes".to_string(),
                attachments: Vec::new(),
                videos: Vec::new(),
            },
        )
        .await
        .expect("owner adds a module");

    let overview = app
        .state
        .overview
        .overview(Some(student.id), class.id)
        .await
        .expect("overview");
    assert_eq!(overview.progress, 50.0);
    assert_eq!(overview.materials[0].modules.len(), 2);

    // The catalog keeps the value saved by the last tracking call.
    assert_eq!(listed_progress(&app, student.id, class.id).await, 100.0);

    let anonymous = app
        .state
        .overview
        .overview(None, class.id)
        .await
        .expect("anonymous overview");
    assert_eq!(anonymous.enrollment_status, EnrollmentStatus::NotEnrolled);
    assert_eq!(anonymous.progress, 0.0);
}

#[tokio::test]
async fn test_class_listing_is_annotated_per_caller() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let student = app.user("Student", Role::User).await;
    let first = app.class(teacher.id, "First", ClassStatus::Public).await;
    let second = app.class(teacher.id, "Second", ClassStatus::Draft).await;
    let modules = app.syllabus(teacher.id, second.id, 1, 2).await;

    app.state
        .enrollments
        .enroll(student.id, second.id)
        .await
        .expect("enroll");
    app.state
        .progress
        .track(student.id, second.id, modules[1].0, modules[1].1)
        .await
        .expect("track");

    let listing = app
        .state
        .overview
        .list_classes(Some(student.id))
        .await
        .expect("list classes");
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].class.id, first.id);
    assert_eq!(listing[0].enrollment_status, EnrollmentStatus::NotEnrolled);
    assert_eq!(listing[0].progress, 0.0);
    assert_eq!(listing[1].class.id, second.id);
    assert_eq!(listing[1].enrollment_status, EnrollmentStatus::Active);
    assert_eq!(listing[1].progress, 50.0);

    let anonymous = app
        .state
        .overview
        .list_classes(None)
        .await
        .expect("anonymous listing");
    assert!(
        anonymous
            .iter()
            .all(|l| l.enrollment_status == EnrollmentStatus::NotEnrolled && l.progress == 0.0)
    );
}

#[tokio::test]
async fn test_submission_is_graded_once() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let intruder = app.user("Intruder", Role::Teacher).await;
    let student = app.user("Student", Role::User).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;
    let coursework = &app.state.coursework;

    let assignment = coursework
        .create_assignment(
            teacher.id,
            class.id,
            NewAssignment {
                title: "Ownership".to_string(),
                description: "Explain moves".to_string(),
                due_date: None,
            },
        )
        .await
        .expect("owner creates assignment");

    let submission = coursework
        .submit(student.id, assignment.id, "https://example.com/hw1".to_string())
        .await
        .expect("first submission");
    assert_eq!(submission.status, SubmissionStatus::Submitted);
    assert_eq!(submission.grade, None);

    let err = coursework
        .submit(student.id, assignment.id, "https://example.com/hw1-v2".to_string())
        .await
        .expect_err("second submission should fail");
    assert!(matches!(err, AppError::AlreadySubmitted));

    let grading = |status| GradeSubmission {
        grade: Grade::new(88).expect("valid grade"),
        feedback: Some("Solid work".to_string()),
        status,
    };

    let err = coursework
        .grade(intruder.id, submission.id, grading(SubmissionStatus::Graded))
        .await
        .expect_err("non-owner grading should fail");
    assert!(matches!(err, AppError::NotFoundOrUnauthorized(_)));

    let err = coursework
        .grade(teacher.id, submission.id, grading(SubmissionStatus::Submitted))
        .await
        .expect_err("grading must move to a graded state");
    assert!(matches!(err, AppError::Validation { .. }));

    let graded = coursework
        .grade(teacher.id, submission.id, grading(SubmissionStatus::Graded))
        .await
        .expect("owner grades");
    assert_eq!(graded.status, SubmissionStatus::Graded);
    assert_eq!(graded.grade.map(Grade::value), Some(88));
    assert!(graded.graded_at.is_some());

    let err = coursework
        .grade(teacher.id, submission.id, grading(SubmissionStatus::Revision))
        .await
        .expect_err("grading happens once");
    assert!(matches!(err, AppError::NotFoundOrUnauthorized(_)));

    let seen = coursework
        .submission(student.id, submission.id)
        .await
        .expect("student sees own submission");
    assert_eq!(seen.feedback.as_deref(), Some("Solid work"));

    let err = coursework
        .submission(teacher.id, submission.id)
        .await
        .expect_err("others cannot read the submission");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_submission_requires_existing_assignment() {
    let app = TestApp::new().await;
    let student = app.user("Student", Role::User).await;

    let err = app
        .state
        .coursework
        .submit(
            student.id,
            AssignmentId::from(77),
            "https://example.com/hw".to_string(),
        )
        .await
        .expect_err("missing assignment should fail");

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_owned_inserts_write_nothing_for_other_teachers() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let intruder = app.user("Intruder", Role::Teacher).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;
    let other = app.class(intruder.id, "Go 101", ClassStatus::Public).await;
    let modules = app.syllabus(teacher.id, class.id, 1, 1).await;
    let foreign = app.syllabus(intruder.id, other.id, 1, 1).await;
    let new_module = || NewModule {
        title: "Injected".to_string(),
        content: "Should not land".to_string(),
        attachments: Vec::new(),
        videos: Vec::new(),
    };

    let err = app
        .state
        .syllabus
        .create_material(intruder.id, class.id, "Injected".to_string())
        .await
        .expect_err("non-owner cannot add materials");
    assert!(matches!(err, AppError::NotFoundOrUnauthorized(_)));

    let err = app
        .state
        .syllabus
        .create_module(intruder.id, class.id, modules[0].0, new_module())
        .await
        .expect_err("non-owner cannot add modules");
    assert!(matches!(err, AppError::NotFoundOrUnauthorized(_)));

    // The owner still cannot hang a module under a material of another class.
    let err = app
        .state
        .syllabus
        .create_module(teacher.id, class.id, foreign[0].0, new_module())
        .await
        .expect_err("material outside the class should be rejected");
    assert!(matches!(err, AppError::NotFoundOrUnauthorized(_)));

    let err = app
        .state
        .coursework
        .create_assignment(
            intruder.id,
            class.id,
            NewAssignment {
                title: "Injected".to_string(),
                description: "Should not land".to_string(),
                due_date: None,
            },
        )
        .await
        .expect_err("non-owner cannot add assignments");
    assert!(matches!(err, AppError::NotFoundOrUnauthorized(_)));

    let err = app
        .state
        .syllabus
        .create_material(teacher.id, ClassId::from(404), "Orphan".to_string())
        .await
        .expect_err("missing class should be rejected");
    assert!(matches!(err, AppError::NotFoundOrUnauthorized(_)));

    assert_eq!(
        material::Entity::find().count(&app.db).await.expect("count materials"),
        2
    );
    assert_eq!(
        module::Entity::find().count(&app.db).await.expect("count modules"),
        2
    );
    assert_eq!(
        assignment::Entity::find()
            .count(&app.db)
            .await
            .expect("count assignments"),
        0
    );
}

#[tokio::test]
async fn test_assignments_are_listed_and_reviewed() {
    let app = TestApp::new().await;
    let teacher = app.user("Teacher", Role::Teacher).await;
    let intruder = app.user("Intruder", Role::Teacher).await;
    let alice = app.user("Alice", Role::User).await;
    let bob = app.user("Bob", Role::User).await;
    let class = app.class(teacher.id, "Rust 101", ClassStatus::Public).await;
    let coursework = &app.state.coursework;

    let mut created = Vec::new();
    for title in ["Ownership", "Borrowing"] {
        let assignment = coursework
            .create_assignment(
                teacher.id,
                class.id,
                NewAssignment {
                    title: title.to_string(),
                    description: format!("{title} essay"),
                    due_date: None,
                },
            )
            .await
            .expect("owner creates assignment");
        assert_eq!(assignment.creator_id, teacher.id);
        assert_eq!(assignment.class_id, class.id);
        created.push(assignment.id);
    }

    let listed = coursework
        .class_assignments(class.id)
        .await
        .expect("students can list assignments");
    let titles: Vec<_> = listed.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Ownership", "Borrowing"]);

    let err = coursework
        .class_assignments(ClassId::from(404))
        .await
        .expect_err("missing class should fail");
    assert!(matches!(err, AppError::ClassNotFound));

    let submission = coursework
        .submit(alice.id, created[0], "https://example.com/alice".to_string())
        .await
        .expect("alice submits");

    let details = coursework
        .assignment_details(alice.id, created[0])
        .await
        .expect("alice reads the assignment");
    assert_eq!(details.assignment.title, "Ownership");
    assert_eq!(details.submission.map(|s| s.id), Some(submission.id));

    let details = coursework
        .assignment_details(bob.id, created[0])
        .await
        .expect("bob reads the assignment");
    assert!(details.submission.is_none());

    let err = coursework
        .assignment_details(bob.id, AssignmentId::from(404))
        .await
        .expect_err("missing assignment should fail");
    assert!(matches!(err, AppError::NotFound(_)));

    let owned = coursework
        .owned_class_assignments(teacher.id, class.id)
        .await
        .expect("owner lists assignments");
    assert_eq!(owned.len(), 2);
    let err = coursework
        .owned_class_assignments(intruder.id, class.id)
        .await
        .expect_err("non-owner listing should fail");
    assert!(matches!(err, AppError::NotFoundOrUnauthorized(_)));

    let review = coursework
        .review_assignment(teacher.id, created[0])
        .await
        .expect("owner reviews submissions");
    assert_eq!(review.submissions.len(), 1);
    assert_eq!(review.submissions[0].student_name, "Alice");
    assert_eq!(review.submissions[0].submission.status, SubmissionStatus::Submitted);

    let not_owner = coursework
        .review_assignment(intruder.id, created[0])
        .await
        .expect_err("non-owner review should fail");
    let missing = coursework
        .review_assignment(teacher.id, AssignmentId::from(404))
        .await
        .expect_err("missing assignment review should fail");
    assert_eq!(not_owner.to_string(), missing.to_string());
    assert_eq!(not_owner.kind(), ErrorKind::NotFound);
}

