use tracing::debug;

use super::GradeService;
use crate::errors::Result;
use crate::models::grades::{entities::Grade, requests::GradeFilter};

pub async fn list_grades(service: &GradeService, filter: &GradeFilter) -> Result<Vec<Grade>> {
    let mut grades = service.storage().list_grades(filter).await?;

    for grade in &grades {
        service.remember(grade);
    }

    // 后端不保证顺序
    grades.sort_by(|a, b| b.graded_at.cmp(&a.graded_at));
    debug!("Listed {} grades", grades.len());
    Ok(grades)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{create_data, service};
    use crate::models::grades::requests::GradeFilter;

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let service = service();
        let first = service.create(create_data("s1", "u1", 40.0), "t1").await.unwrap();
        let second = service.create(create_data("s2", "u2", 90.0), "t2").await.unwrap();
        let mut other = create_data("s3", "u1", 70.0);
        other.assignment_id = "a2".to_string();
        service.create(other, "t1").await.unwrap();

        let a1 = service.list(&GradeFilter::for_assignment("a1")).await.unwrap();
        assert_eq!(a1.len(), 2);
        assert!(a1[0].graded_at >= a1[1].graded_at);
        assert!(a1.iter().any(|g| g.id == first.id));
        assert!(a1.iter().any(|g| g.id == second.id));

        let by_grader = GradeFilter {
            graded_by: Some("t2".to_string()),
            ..Default::default()
        };
        let graded = service.list(&by_grader).await.unwrap();
        assert_eq!(graded.len(), 1);
        assert_eq!(graded[0].id, second.id);

        let high = GradeFilter {
            score_min: Some(60.0),
            ..Default::default()
        };
        assert_eq!(service.list(&high).await.unwrap().len(), 2);
        assert_eq!(service.list(&GradeFilter::for_student("u1")).await.unwrap().len(), 2);
    }
}
