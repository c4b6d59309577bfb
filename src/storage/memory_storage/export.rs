//! 评分导出
//!
//! 支持 CSV 与 XLSX；PDF 需由远端后端生成。

use rust_xlsxwriter::{Format, Workbook};
use tracing::{debug, error};

use super::MemoryStorage;
use crate::errors::{GradingError, Result};
use crate::models::grades::{
    entities::Grade,
    requests::{ExportFormat, GradeExportRequest, GradeFilter},
};

/// 根据导出选项生成表头
fn header_row(request: &GradeExportRequest) -> Vec<String> {
    let mut header = vec!["id".to_string(), "submission_id".to_string()];
    header.push("assignment_id".to_string());
    if request.include_student_info {
        header.push("student_id".to_string());
    }
    header.extend(
        ["score", "max_score", "percentage", "graded_by", "graded_at"]
            .iter()
            .map(|s| s.to_string()),
    );
    if request.include_feedback {
        header.push("feedback".to_string());
    }
    if request.include_rubric_details {
        header.push("rubric_id".to_string());
        header.push("rubric_grades".to_string());
    }
    header
}

fn data_row(request: &GradeExportRequest, grade: &Grade) -> Vec<String> {
    let mut row = vec![
        grade.id.clone(),
        grade.submission_id.clone(),
        grade.assignment_id.clone(),
    ];
    if request.include_student_info {
        row.push(grade.student_id.clone());
    }
    row.push(grade.score.to_string());
    row.push(grade.max_score.to_string());
    row.push(grade.percentage().to_string());
    row.push(grade.graded_by.clone());
    row.push(grade.graded_at.to_rfc3339());
    if request.include_feedback {
        row.push(grade.feedback.clone());
    }
    if request.include_rubric_details {
        row.push(grade.rubric_id.clone().unwrap_or_default());
        // 形如 criterion:level=points;...
        let details = grade
            .rubric_grades
            .iter()
            .map(|r| format!("{}:{}={}", r.criterion_id, r.level_id, r.points_awarded))
            .collect::<Vec<_>>()
            .join(";");
        row.push(details);
    }
    row
}

fn export_csv(request: &GradeExportRequest, grades: &[Grade]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // 写入表头
    wtr.write_record(header_row(request)).map_err(|e| {
        error!("CSV 写入失败: {}", e);
        GradingError::serialization(format!("CSV 写入失败: {e}"))
    })?;

    // 写入数据
    for grade in grades {
        wtr.write_record(data_row(request, grade)).map_err(|e| {
            error!("CSV 写入失败: {}", e);
            GradingError::serialization(format!("CSV 写入失败: {e}"))
        })?;
    }

    wtr.into_inner().map_err(|e| {
        error!("CSV 生成失败: {}", e);
        GradingError::serialization(format!("CSV 生成失败: {e}"))
    })
}

fn export_xlsx(request: &GradeExportRequest, grades: &[Grade]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // 表头格式
    let header_format = Format::new().set_bold();

    for (col, header) in header_row(request).iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| {
                error!("XLSX 写入失败: {}", e);
                GradingError::serialization(format!("XLSX 写入失败: {e}"))
            })?;
    }

    for (row, grade) in grades.iter().enumerate() {
        let row = (row + 1) as u32;
        for (col, value) in data_row(request, grade).iter().enumerate() {
            worksheet
                .write_string(row, col as u16, value)
                .map_err(|e| GradingError::serialization(format!("XLSX 写入失败: {e}")))?;
        }
    }

    workbook.save_to_buffer().map_err(|e| {
        error!("XLSX 生成失败: {}", e);
        GradingError::serialization(format!("XLSX 生成失败: {e}"))
    })
}

impl MemoryStorage {
    pub async fn export_grades_impl(&self, request: &GradeExportRequest) -> Result<Vec<u8>> {
        if request.format == ExportFormat::Pdf {
            return Err(GradingError::validation(
                "内存存储不支持 PDF 导出，请使用远端后端",
            ));
        }
        if request.course_id.is_some() {
            // 评分记录不含课程信息，课程筛选只能由远端后端处理
            debug!("Ignoring course filter in in-memory export");
        }

        let filter = GradeFilter {
            assignment_id: request.assignment_id.clone(),
            ..Default::default()
        };
        let mut grades = self.list_grades_impl(&filter).await?;
        if let Some(range) = &request.date_range {
            grades.retain(|g| range.contains(g.graded_at));
        }
        debug!("Exporting {} grades as {:?}", grades.len(), request.format);

        match request.format {
            ExportFormat::Excel => export_xlsx(request, &grades),
            _ => export_csv(request, &grades),
        }
    }
}
