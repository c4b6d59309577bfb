use crate::models::grades::{requests::GradeCreateData, responses::GradeValidationReport};
use crate::utils::validate::{create_data_errors, create_data_warnings};

/// 只校验不落库
pub fn validate_grade_data(data: &GradeCreateData) -> GradeValidationReport {
    let errors = create_data_errors(data);
    GradeValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings: create_data_warnings(data),
    }
}
