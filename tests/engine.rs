use std::sync::{Arc, Mutex};

use rust_grading_engine::config::AppConfig;
use rust_grading_engine::models::{
    disputes::{entities::DisputeStatus, requests::SubmitDisputeRequest},
    grades::{
        entities::{Grade, GradeStatus, RubricGrade},
        requests::{
            ExportFormat, GradeBulkUpdate, GradeCreateData, GradeExportRequest, GradeFilter,
            GradeUpdateData,
        },
    },
    reviews::{
        entities::{ReviewDecision, ReviewStatus},
        requests::{GradeReviewRequest, ReviewDecisionRequest},
    },
    rubrics::entities::{Criterion, Level, Rubric, RubricMode},
    templates::requests::CreateTemplateRequest,
    users::entities::{Permission, UserRole, permissions_for},
};
use rust_grading_engine::runtime::prepare_engine;
use rust_grading_engine::services::statistics::compute_statistics;
use rust_grading_engine::services::GradingEngine;
use rust_grading_engine::{ErrorKind, GradingError};

async fn engine() -> GradingEngine {
    prepare_engine(&AppConfig::default()).await.unwrap()
}

fn data(submission_id: &str, student_id: &str, score: f64, max_score: f64) -> GradeCreateData {
    GradeCreateData {
        submission_id: submission_id.to_string(),
        assignment_id: "hw1".to_string(),
        student_id: student_id.to_string(),
        score,
        max_score,
        feedback: "graded".to_string(),
        ..Default::default()
    }
}

async fn grade(engine: &GradingEngine, submission_id: &str, score: f64, max_score: f64) -> Grade {
    engine
        .grades
        .create(data(submission_id, submission_id, score, max_score), "ta1")
        .await
        .unwrap()
}

#[tokio::test]
async fn statistics_for_three_scores() {
    let engine = engine().await;
    for (i, score) in [95.0, 70.0, 82.0].into_iter().enumerate() {
        grade(&engine, &format!("s{i}"), score, 100.0).await;
    }

    let stats = engine.statistics.assignment_statistics("hw1").await.unwrap();
    assert_eq!(stats.average_score, 82.33);
    assert_eq!(stats.median_score, 82.0);
    assert_eq!(stats.grade_distribution.len(), 3);
    assert_eq!(stats.grade_distribution["A (90-100%)"], 1);
    assert_eq!(stats.grade_distribution["B (80-89%)"], 1);
    assert_eq!(stats.grade_distribution["C (70-79%)"], 1);
    assert_eq!(stats.grading_progress.percentage, 100.0);
}

#[tokio::test]
async fn statistics_are_order_independent() {
    let engine = engine().await;
    for (i, (score, max)) in [(12.5, 20.0), (47.0, 50.0), (3.0, 10.0), (88.8, 100.0), (61.2, 80.0)]
        .into_iter()
        .enumerate()
    {
        grade(&engine, &format!("s{i}"), score, max).await;
    }

    let mut grades = engine.grades.list(&GradeFilter::for_assignment("hw1")).await.unwrap();
    let forward = compute_statistics(&grades);
    grades.reverse();
    assert_eq!(compute_statistics(&grades), forward);
    grades.rotate_left(2);
    assert_eq!(compute_statistics(&grades), forward);

    assert_eq!(compute_statistics(&[]).total_grades, 0);
    assert_eq!(compute_statistics(&[]).average_score, 0.0);
}

#[tokio::test]
async fn create_get_round_trip_with_rubric() {
    let engine = engine().await;
    let rubric = Rubric {
        id: "r1".to_string(),
        name: "Essay".to_string(),
        description: None,
        mode: RubricMode::Matrix,
        criteria: vec![
            Criterion {
                id: "thesis".to_string(),
                title: "Thesis".to_string(),
                description: String::new(),
                weight: 1.0,
                levels: vec![
                    Level {
                        id: "weak".to_string(),
                        label: "Weak".to_string(),
                        points: 2.0,
                    },
                    Level {
                        id: "strong".to_string(),
                        label: "Strong".to_string(),
                        points: 5.0,
                    },
                ],
            },
            Criterion {
                id: "style".to_string(),
                title: "Style".to_string(),
                description: String::new(),
                weight: 1.0,
                levels: vec![
                    Level {
                        id: "ok".to_string(),
                        label: "Ok".to_string(),
                        points: 3.0,
                    },
                    Level {
                        id: "great".to_string(),
                        label: "Great".to_string(),
                        points: 5.0,
                    },
                ],
            },
        ],
    };
    rubric.validate().unwrap();
    let (rubric_grades, total) = rubric
        .score_selections(&[("thesis", "strong"), ("style", "ok")])
        .unwrap();
    assert_eq!(total, 8.0);

    let mut create = data("essay-1", "u1", total, rubric.total_points());
    create.rubric_id = Some(rubric.id.clone());
    create.rubric_grades = rubric_grades;
    let created = engine.grades.create(create, "prof").await.unwrap();

    assert_eq!(engine.grades.get(&created.id).await.unwrap(), created);
    assert_eq!(created.max_score, 10.0);

    // 修改明细但不同步分数会被拒绝
    let err = engine
        .grades
        .update(
            GradeUpdateData {
                id: created.id.clone(),
                rubric_grades: Some(vec![RubricGrade {
                    criterion_id: "thesis".to_string(),
                    level_id: "weak".to_string(),
                    points_awarded: 2.0,
                    feedback: String::new(),
                }]),
                ..Default::default()
            },
            "prof",
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn review_workflow() {
    let engine = engine().await;
    let g1 = grade(&engine, "s1", 60.0, 100.0).await;
    let request = |reason: &str| GradeReviewRequest {
        grade_id: g1.id.clone(),
        reason: reason.to_string(),
        requested_by: "ta1".to_string(),
    };

    let review = engine.reviews.request_review(&request("miscount")).await.unwrap();
    let err: GradingError = engine
        .reviews
        .request_review(&request("again"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let pending = engine
        .grades
        .list(&GradeFilter {
            status: Some(GradeStatus::Pending),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);

    let decision = ReviewDecisionRequest {
        decision: ReviewDecision::Approved,
        reviewed_by: "prof".to_string(),
    };
    let decided = engine.reviews.decide(&review.id, &decision).await.unwrap();
    assert_eq!(decided.status, ReviewStatus::Approved);

    let err = engine.reviews.decide(&review.id, &decision).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(engine.reviews.get(&review.id).await.unwrap(), decided);
}

#[tokio::test]
async fn dispute_workflow() {
    let engine = engine().await;
    let g1 = grade(&engine, "s1", 60.0, 100.0).await;
    let dispute = engine
        .disputes
        .submit(&SubmitDisputeRequest {
            grade_id: g1.id.clone(),
            student_id: "s1".to_string(),
            reason: "partial credit missing".to_string(),
        })
        .await
        .unwrap();

    engine.disputes.start_review(&dispute.id, "prof").await.unwrap();
    let resolved = engine
        .disputes
        .resolve(&dispute.id, "score raised", "prof")
        .await
        .unwrap();
    assert_eq!(resolved.status, DisputeStatus::Resolved);
    assert_eq!(
        engine
            .disputes
            .start_review(&dispute.id, "prof")
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::InvalidState
    );
}

#[tokio::test]
async fn bulk_update_reports_per_record_failures() {
    let engine = engine().await;
    let g1 = grade(&engine, "s1", 10.0, 1000.0).await;
    let g2 = grade(&engine, "s2", 10.0, 100.0).await;
    let g3 = grade(&engine, "s3", 10.0, 1000.0).await;

    let result = engine
        .grades
        .bulk_update(
            &GradeBulkUpdate {
                grade_ids: vec![g1.id.clone(), g2.id.clone(), g3.id.clone()],
                score: Some(999.0),
                ..Default::default()
            },
            "prof",
        )
        .await
        .unwrap();

    assert_eq!(result.succeeded_ids(), vec![g1.id.as_str(), g3.id.as_str()]);
    assert_eq!(result.failed.len(), 1);
    let failure = result.failure_for(&g2.id).unwrap();
    assert_eq!(failure.kind, ErrorKind::Validation);
    assert_eq!(failure.code, "E001");
}

#[tokio::test]
async fn trends_for_student() {
    let engine = engine().await;
    for (i, score) in [70.0, 75.0, 75.0, 60.0].into_iter().enumerate() {
        let mut d = data(&format!("s{i}"), "u7", score, 100.0);
        d.assignment_id = format!("hw{i}");
        engine.grades.create(d, "ta1").await.unwrap();
        // 保证评分时间严格递增
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let trends = engine.student_trends("u7", None).await.unwrap();
    let scores = |grades: &[Grade]| grades.iter().map(|g| g.score).collect::<Vec<_>>();
    assert_eq!(scores(&trends.improving), vec![75.0]);
    assert_eq!(scores(&trends.stable), vec![75.0]);
    assert_eq!(scores(&trends.declining), vec![60.0]);
    assert_eq!(trends.stable[0].assignment_id, "hw2");
}

#[tokio::test]
async fn templates_and_events() {
    let engine = engine().await;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let subscription = {
        let seen = seen.clone();
        engine.subscribe(move |event| seen.lock().unwrap().push(event.name()))
    };

    let g1 = grade(&engine, "s1", 5.0, 10.0).await;
    let template = engine
        .templates
        .create_template(CreateTemplateRequest {
            name: "Late but complete".to_string(),
            course_id: "course-1".to_string(),
            template: GradeCreateData {
                score: 8.0,
                max_score: 10.0,
                feedback: "Late penalty applied".to_string(),
                ..Default::default()
            },
        })
        .await
        .unwrap();
    let result = engine
        .templates
        .apply(&template.id, &[g1.id.clone()], "prof")
        .await
        .unwrap();
    assert!(result.is_complete_success());

    engine.grades.delete(&g1.id).await.unwrap();
    subscription.unsubscribe();
    grade(&engine, "s2", 1.0, 10.0).await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec!["grade.created", "grade.updated", "grade.deleted"]
    );
}

#[tokio::test]
async fn notifications_and_grader_locks() {
    let engine = engine().await;
    engine.locks.request("hw1", "ta1").unwrap();
    assert_eq!(
        engine.locks.request("hw1", "ta2").unwrap_err().kind(),
        ErrorKind::Conflict
    );

    let g1 = grade(&engine, "s1", 6.0, 10.0).await;
    engine
        .grades
        .update(
            GradeUpdateData {
                id: g1.id.clone(),
                score: Some(7.0),
                ..Default::default()
            },
            "ta1",
        )
        .await
        .unwrap();
    engine.locks.release("hw1", "ta1").unwrap();
    assert!(engine.locks.holder("hw1").is_none());

    assert_eq!(engine.notifications.unread_count("s1").await.unwrap(), 2);
    let inbox = engine.notifications.list("s1").await.unwrap();
    for notification in &inbox {
        engine.notifications.mark_read(&notification.id).await.unwrap();
    }
    assert_eq!(engine.notifications.unread_count("s1").await.unwrap(), 0);
}

#[test]
fn grading_permissions_by_role() {
    let grader = permissions_for(UserRole::Grader);
    assert!(grader.contains(&Permission::GradeAssignments));
    assert!(!grader.contains(&Permission::ManageUsers));

    let student = permissions_for(UserRole::Student);
    assert!(!student.contains(&Permission::GradeAssignments));
    assert!(permissions_for(UserRole::Admin).is_superset(&grader));
}

#[tokio::test]
async fn csv_export_through_engine() {
    let engine = engine().await;
    grade(&engine, "s1", 7.0, 10.0).await;
    let bytes = engine
        .grades
        .export(&GradeExportRequest {
            format: ExportFormat::Csv,
            include_feedback: true,
            assignment_id: Some("hw1".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("graded"));
}
