//! 阅卷锁
//!
//! 同一作业同一时间只允许一名阅卷人持有锁，仅在进程内生效，
//! 不阻止其他路径直接写评分。

use chrono::{DateTime, Utc};
use dashmap::{DashMap, mapref::entry::Entry};
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::{GradingError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraderLock {
    pub assignment_id: String,
    pub grader_id: String,
    pub acquired_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct GraderLockService {
    locks: DashMap<String, GraderLock>,
}

impl GraderLockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// 申请作业锁，本人重复申请直接返回已有的锁
    pub fn request(&self, assignment_id: &str, grader_id: &str) -> Result<GraderLock> {
        if grader_id.trim().is_empty() {
            return Err(GradingError::validation("阅卷人不能为空"));
        }
        match self.locks.entry(assignment_id.to_string()) {
            Entry::Occupied(entry) => {
                let lock = entry.get();
                if lock.grader_id == grader_id {
                    return Ok(lock.clone());
                }
                Err(GradingError::conflict(format!(
                    "作业 {} 正由 {} 阅卷",
                    assignment_id, lock.grader_id
                )))
            }
            Entry::Vacant(entry) => {
                let lock = GraderLock {
                    assignment_id: assignment_id.to_string(),
                    grader_id: grader_id.to_string(),
                    acquired_at: Utc::now(),
                };
                entry.insert(lock.clone());
                info!("Grader {} locked assignment {}", grader_id, assignment_id);
                Ok(lock)
            }
        }
    }

    /// 释放作业锁，只有持有者可以释放
    pub fn release(&self, assignment_id: &str, grader_id: &str) -> Result<()> {
        match self
            .locks
            .remove_if(assignment_id, |_, lock| lock.grader_id == grader_id)
        {
            Some(_) => {
                debug!("Grader {} released assignment {}", grader_id, assignment_id);
                Ok(())
            }
            None => Err(GradingError::invalid_state(format!(
                "{} 未持有作业 {} 的阅卷锁",
                grader_id, assignment_id
            ))),
        }
    }

    pub fn holder(&self, assignment_id: &str) -> Option<GraderLock> {
        self.locks.get(assignment_id).map(|l| l.value().clone())
    }
}
