//! 评分变更事件
//!
//! 订阅者在发布方线程内按订阅顺序同步回调，`Subscription` 被 drop 时自动退订。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use crate::models::{
    disputes::entities::GradeDispute,
    grades::entities::{Grade, GradeHistory},
    reviews::entities::GradeReview,
};

/// 进程内变更通知
#[derive(Debug, Clone, PartialEq)]
pub enum GradeEvent {
    Created(Grade),
    Updated {
        grade: Grade,
        history: Option<GradeHistory>,
    },
    Deleted {
        id: String,
        assignment_id: String,
    },
    ReviewRequested(GradeReview),
    ReviewDecided(GradeReview),
    DisputeSubmitted(GradeDispute),
    DisputeReviewStarted(GradeDispute),
    DisputeResolved(GradeDispute),
}

impl GradeEvent {
    /// 事件名称，用于日志
    pub fn name(&self) -> &'static str {
        match self {
            GradeEvent::Created(_) => "grade.created",
            GradeEvent::Updated { .. } => "grade.updated",
            GradeEvent::Deleted { .. } => "grade.deleted",
            GradeEvent::ReviewRequested(_) => "review.requested",
            GradeEvent::ReviewDecided(_) => "review.decided",
            GradeEvent::DisputeSubmitted(_) => "dispute.submitted",
            GradeEvent::DisputeReviewStarted(_) => "dispute.review_started",
            GradeEvent::DisputeResolved(_) => "dispute.resolved",
        }
    }
}

pub type Listener = Arc<dyn Fn(&GradeEvent) + Send + Sync>;

type ListenerMap = RwLock<BTreeMap<u64, Listener>>;

#[derive(Default)]
pub struct EventBus {
    listeners: Arc<ListenerMap>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册监听器
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&GradeEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.insert(id, Arc::new(listener));
        }
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// 同步通知所有监听器
    pub fn publish(&self, event: &GradeEvent) {
        // 先复制快照，允许监听器在回调中退订
        let snapshot: Vec<Listener> = match self.listeners.read() {
            Ok(listeners) => listeners.values().cloned().collect(),
            Err(_) => {
                tracing::error!("Event listener registry lock poisoned");
                return;
            }
        };
        tracing::debug!("Publishing {} to {} listeners", event.name(), snapshot.len());
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().map(|l| l.len()).unwrap_or(0)
    }
}

/// 订阅句柄
#[must_use = "dropping the subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerMap>,
}

impl Subscription {
    /// 显式退订
    pub fn unsubscribe(self) {
        // Drop 中完成
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade()
            && let Ok(mut listeners) = listeners.write()
        {
            listeners.remove(&self.id);
        }
    }
}
