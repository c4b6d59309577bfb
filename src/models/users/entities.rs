use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Admin,     // 管理员
    Professor, // 教授
    Grader,    // 助教 / 阅卷人
    Student,   // 学生
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const PROFESSOR: &'static str = "professor";
    pub const GRADER: &'static str = "grader";
    pub const STUDENT: &'static str = "student";

    pub fn all_roles() -> &'static [UserRole] {
        &[
            UserRole::Admin,
            UserRole::Professor,
            UserRole::Grader,
            UserRole::Student,
        ]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: admin, professor, grader, student"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
            UserRole::Professor => write!(f, "{}", UserRole::PROFESSOR),
            UserRole::Grader => write!(f, "{}", UserRole::GRADER),
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "professor" => Ok(UserRole::Professor),
            // 旧接口里助教叫 ta
            "grader" | "ta" => Ok(UserRole::Grader),
            "student" => Ok(UserRole::Student),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 权限
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum Permission {
    Read,
    Write,
    Delete,
    Admin,
    ManageUsers,
    ManageCourses,
    ManageAssignments,
    ManageRubrics,
    GradeAssignments,
    ViewGrades,
    SubmitAssignments,
    ViewCourses,
    ManageExams,
    ViewReports,
    ManageAiModels,
    ViewSecurityLogs,
    ManagePlagiarism,
    ManageCollaboration,
    ViewCalendar,
}

// 资源操作
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum ResourceAction {
    Read,
    Write,
    Delete,
}

/// 角色对应的权限集合
///
/// 纯函数，没有全局可变状态，策略可以直接单元测试。
pub fn permissions_for(role: UserRole) -> BTreeSet<Permission> {
    use Permission::*;

    let permissions: &[Permission] = match role {
        UserRole::Admin => &[
            Read,
            Write,
            Delete,
            Admin,
            ManageUsers,
            ManageCourses,
            ManageAssignments,
            ManageRubrics,
            GradeAssignments,
            ViewGrades,
            SubmitAssignments,
            ViewCourses,
            ManageExams,
            ViewReports,
            ManageAiModels,
            ViewSecurityLogs,
            ManagePlagiarism,
            ManageCollaboration,
            ViewCalendar,
        ],
        UserRole::Professor => &[
            Read,
            Write,
            ManageCourses,
            ManageAssignments,
            ManageRubrics,
            GradeAssignments,
            ViewGrades,
            ViewCourses,
            ManageExams,
            ViewReports,
            ViewSecurityLogs,
            ManagePlagiarism,
            ManageCollaboration,
            ViewCalendar,
        ],
        UserRole::Grader => &[
            Read,
            GradeAssignments,
            ViewGrades,
            ViewCourses,
            ManageCollaboration,
            ViewCalendar,
        ],
        UserRole::Student => &[
            Read,
            SubmitAssignments,
            ViewGrades,
            ViewCourses,
            ViewCalendar,
        ],
    };

    permissions.iter().copied().collect()
}

pub fn has_permission(role: UserRole, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

/// 是否可以评分（管理员、教授、助教）
pub fn can_grade(role: UserRole) -> bool {
    has_permission(role, Permission::GradeAssignments)
}

/// 资源级访问控制：需要同时具备资源权限和操作权限
pub fn can_access(role: UserRole, resource: &str, action: ResourceAction) -> bool {
    let permissions = permissions_for(role);

    let action_permission = match action {
        ResourceAction::Read => Permission::Read,
        ResourceAction::Write => Permission::Write,
        ResourceAction::Delete => Permission::Delete,
    };

    let resource_permission = match resource {
        "users" => Permission::ManageUsers,
        "courses" => Permission::ManageCourses,
        "assignments" => Permission::ManageAssignments,
        "rubrics" => Permission::ManageRubrics,
        "grades" => Permission::ViewGrades,
        "exams" => Permission::ManageExams,
        "reports" => Permission::ViewReports,
        "ai" => Permission::ManageAiModels,
        "security" => Permission::ViewSecurityLogs,
        "plagiarism" => Permission::ManagePlagiarism,
        "collaboration" => Permission::ManageCollaboration,
        "calendar" => Permission::ViewCalendar,
        // 未登记的资源只要求可读
        _ => return permissions.contains(&Permission::Read),
    };

    permissions.contains(&resource_permission) && permissions.contains(&action_permission)
}
