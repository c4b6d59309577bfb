//! 评分导入
//!
//! 源文件由调用方解析成行，每行是列名到字符串值的映射。

use std::collections::HashMap;

use tracing::{info, warn};

use super::GradeService;
use crate::errors::{GradingError, Result};
use crate::models::grades::{
    entities::Grade,
    requests::{GradeCreateData, GradeFilter, GradeImportRequest, GradeUpdateData},
    responses::{ImportRowError, ImportSummary},
};

/// 映射后的导入行
#[derive(Debug, Clone)]
struct ImportRow {
    row_num: usize,
    student_id: String,
    submission_id: Option<String>,
    score: f64,
    feedback: Option<String>,
}

fn column<'a>(record: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    record
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// 按字段映射解析一行，行号从 1 开始
fn parse_row(
    request: &GradeImportRequest,
    row_num: usize,
    record: &HashMap<String, String>,
) -> std::result::Result<ImportRow, String> {
    let mapping = &request.field_mapping;

    let student_id = column(record, &mapping.student_id)
        .ok_or_else(|| format!("缺少学生ID列: {}", mapping.student_id))?
        .to_string();

    let raw_score = column(record, &mapping.score)
        .ok_or_else(|| format!("缺少分数列: {}", mapping.score))?;
    let score: f64 = raw_score
        .parse()
        .map_err(|_| format!("分数格式无效: {raw_score}"))?;

    let feedback = mapping
        .feedback
        .as_deref()
        .and_then(|col| record.get(col))
        .map(|v| v.trim().to_string());
    let submission_id = mapping
        .submission_id
        .as_deref()
        .and_then(|col| column(record, col))
        .map(str::to_string);

    Ok(ImportRow {
        row_num,
        student_id,
        submission_id,
        score,
        feedback,
    })
}

pub async fn import_grades(
    service: &GradeService,
    request: &GradeImportRequest,
    graded_by: &str,
) -> Result<ImportSummary> {
    if request.assignment_id.trim().is_empty() {
        return Err(GradingError::validation("导入需要指定作业"));
    }
    if !request.max_score.is_finite() || request.max_score <= 0.0 {
        return Err(GradingError::validation("满分必须大于 0"));
    }
    let limit = service.config().max_import_rows;
    if request.source_records.len() > limit {
        return Err(GradingError::validation(format!(
            "单次导入最多支持 {limit} 行"
        )));
    }

    // 该作业下已有的评分，按学生索引
    let mut existing: HashMap<String, Grade> = service
        .list(&GradeFilter::for_assignment(&request.assignment_id))
        .await?
        .into_iter()
        .map(|g| (g.student_id.clone(), g))
        .collect();

    let mut summary = ImportSummary::default();

    for (index, record) in request.source_records.iter().enumerate() {
        let row = match parse_row(request, index + 1, record) {
            Ok(row) => row,
            Err(message) => {
                summary.failed.push(ImportRowError {
                    row: index + 1,
                    message,
                });
                continue;
            }
        };

        if let Some(current) = existing.get(&row.student_id) {
            if !request.update_existing {
                summary.skipped += 1;
                continue;
            }

            let patch = GradeUpdateData {
                id: current.id.clone(),
                score: Some(row.score),
                max_score: Some(request.max_score),
                feedback: row.feedback.clone(),
                reason: Some("imported".to_string()),
                ..Default::default()
            };
            match service.update(patch, graded_by).await {
                Ok(grade) => {
                    summary.updated += 1;
                    existing.insert(row.student_id.clone(), grade);
                }
                Err(e) => summary.failed.push(ImportRowError {
                    row: row.row_num,
                    message: e.message().to_string(),
                }),
            }
            continue;
        }

        let data = GradeCreateData {
            submission_id: row
                .submission_id
                .clone()
                .unwrap_or_else(|| format!("{}:{}", request.assignment_id, row.student_id)),
            assignment_id: request.assignment_id.clone(),
            student_id: row.student_id.clone(),
            score: row.score,
            max_score: request.max_score,
            feedback: row.feedback.clone().unwrap_or_default(),
            ..Default::default()
        };
        match service.create(data, graded_by).await {
            Ok(grade) => {
                summary.applied += 1;
                existing.insert(row.student_id.clone(), grade);
            }
            Err(e) => summary.failed.push(ImportRowError {
                row: row.row_num,
                message: e.message().to_string(),
            }),
        }
    }

    if !summary.failed.is_empty() {
        warn!("{} rows failed during grade import", summary.failed.len());
    }
    info!(
        "Grade import for assignment {}: {} applied, {} updated, {} skipped",
        request.assignment_id, summary.applied, summary.updated, summary.skipped
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::super::test_support::{create_data, service, service_with};
    use crate::config::GradingConfig;
    use crate::errors::ErrorKind;
    use crate::models::grades::requests::{FieldMapping, GradeFilter, GradeImportRequest};

    fn record(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn request(records: Vec<HashMap<String, String>>, update_existing: bool) -> GradeImportRequest {
        GradeImportRequest {
            source_records: records,
            assignment_id: "a1".to_string(),
            max_score: 100.0,
            field_mapping: FieldMapping {
                student_id: "Student".to_string(),
                score: "Points".to_string(),
                feedback: Some("Comment".to_string()),
                submission_id: None,
            },
            update_existing,
        }
    }

    #[tokio::test]
    async fn test_import_applies_skips_and_reports() {
        let service = service();
        service.create(create_data("s-old", "u1", 10.0), "t1").await.unwrap();

        let records = vec![
            record(&[("Student", "u1"), ("Points", "80")]),
            record(&[("Student", "u2"), ("Points", "75.5"), ("Comment", "nice")]),
            record(&[("Student", "u3"), ("Points", "abc")]),
            record(&[("Points", "50")]),
            record(&[("Student", "u4"), ("Points", "120")]),
        ];
        let summary = service.import(&request(records, false), "t9").await.unwrap();

        assert_eq!(summary.applied, 1);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.skipped, 1);
        let failed_rows: Vec<usize> = summary.failed.iter().map(|f| f.row).collect();
        assert_eq!(failed_rows, vec![3, 4, 5]);

        let u2 = service.list(&GradeFilter::for_student("u2")).await.unwrap();
        assert_eq!(u2.len(), 1);
        assert_eq!(u2[0].score, 75.5);
        assert_eq!(u2[0].feedback, "nice");
        assert_eq!(u2[0].submission_id, "a1:u2");
        assert_eq!(u2[0].graded_by, "t9");
    }

    #[tokio::test]
    async fn test_import_updates_existing() {
        let service = service();
        let old = service.create(create_data("s-old", "u1", 10.0), "t1").await.unwrap();

        let records = vec![record(&[("Student", "u1"), ("Points", "64")])];
        let summary = service.import(&request(records, true), "t1").await.unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.applied, 0);

        let grade = service.get(&old.id).await.unwrap();
        assert_eq!(grade.score, 64.0);
        assert_eq!(service.history(&old.id).await.unwrap()[0].reason, "imported");
    }

    #[tokio::test]
    async fn test_import_row_limit() {
        let (service, _) = service_with(GradingConfig {
            max_import_rows: 1,
            ..Default::default()
        });
        let records = vec![
            record(&[("Student", "u1"), ("Points", "1")]),
            record(&[("Student", "u2"), ("Points", "2")]),
        ];
        let err = service.import(&request(records, false), "t1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
