//! Cooperative single-threaded scheduler
//!
//! Models the two host drivers the game needs: a one-shot animation frame
//! request (re-requested every frame, like a display refresh callback) and a
//! fixed-period interval timer. Both are cancellable by id. Nothing runs on
//! its own: the host calls [`Scheduler::poll`] and dispatches the returned
//! ids.

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u32);

/// What kind of recurrence a task has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Fires once on the first poll after the request time, then is gone
    AnimationFrame,
    /// Fires every `period_ms` until cancelled
    Interval { period_ms: u64 },
}

#[derive(Debug, Clone)]
struct Task {
    id: TaskId,
    kind: TaskKind,
    due_ms: u64,
}

/// Pending tasks, ordered by creation
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    next_id: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    fn alloc_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Request a callback on the next frame
    pub fn request_animation_frame(&mut self, now_ms: u64) -> TaskId {
        let id = self.alloc_id();
        self.tasks.push(Task {
            id,
            kind: TaskKind::AnimationFrame,
            due_ms: now_ms,
        });
        id
    }

    /// Start a repeating timer, first firing one period from now
    pub fn set_interval(&mut self, now_ms: u64, period_ms: u64) -> TaskId {
        let period_ms = period_ms.max(1);
        let id = self.alloc_id();
        self.tasks.push(Task {
            id,
            kind: TaskKind::Interval { period_ms },
            due_ms: now_ms + period_ms,
        });
        id
    }

    /// Cancel a task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Cancel everything
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Number of live tasks
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn kind_of(&self, id: TaskId) -> Option<TaskKind> {
        self.tasks.iter().find(|t| t.id == id).map(|t| t.kind)
    }

    /// Collect every firing due at `now_ms`, earliest first.
    ///
    /// Intervals that fell behind fire once per elapsed period. Animation
    /// frames are consumed; a frame requested at `t` only fires on a poll
    /// later than `t`, so re-requests made while dispatching wait for the
    /// next frame.
    pub fn poll(&mut self, now_ms: u64) -> Vec<TaskId> {
        let mut fired: Vec<(u64, TaskId)> = Vec::new();

        for task in &mut self.tasks {
            match task.kind {
                TaskKind::AnimationFrame => {
                    if task.due_ms < now_ms {
                        fired.push((task.due_ms, task.id));
                    }
                }
                TaskKind::Interval { period_ms } => {
                    while task.due_ms <= now_ms {
                        fired.push((task.due_ms, task.id));
                        task.due_ms += period_ms;
                    }
                }
            }
        }

        self.tasks
            .retain(|t| !(t.kind == TaskKind::AnimationFrame && t.due_ms < now_ms));

        fired.sort_by_key(|&(due, _)| due);
        fired.into_iter().map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_frame_fires_once() {
        let mut sched = Scheduler::new();
        let id = sched.request_animation_frame(0);
        assert_eq!(sched.poll(16), vec![id]);
        assert!(sched.poll(32).is_empty());
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_frame_needs_later_poll() {
        let mut sched = Scheduler::new();
        let id = sched.request_animation_frame(16);
        assert!(sched.poll(16).is_empty());
        assert_eq!(sched.poll(17), vec![id]);
    }

    #[test]
    fn test_interval_catches_up() {
        let mut sched = Scheduler::new();
        let id = sched.set_interval(0, 1000);
        assert!(sched.poll(999).is_empty());
        assert_eq!(sched.poll(1000), vec![id]);
        assert_eq!(sched.poll(3500), vec![id, id]);
        assert!(sched.is_pending(id));
    }

    #[test]
    fn test_cancel_stops_firing() {
        let mut sched = Scheduler::new();
        let frame = sched.request_animation_frame(0);
        let timer = sched.set_interval(0, 1000);
        assert!(sched.cancel(frame));
        assert!(sched.cancel(timer));
        assert!(!sched.cancel(timer));
        assert!(sched.poll(10_000).is_empty());
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_rerequested_frame_waits_for_next_poll() {
        let mut sched = Scheduler::new();
        sched.request_animation_frame(0);
        let fired = sched.poll(16);
        assert_eq!(fired.len(), 1);
        let next = sched.request_animation_frame(16);
        assert_eq!(sched.kind_of(next), Some(TaskKind::AnimationFrame));
        assert_eq!(sched.poll(33), vec![next]);
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut sched = Scheduler::new();
        let timer = sched.set_interval(0, 1000);
        let frame = sched.request_animation_frame(1500);
        assert_eq!(sched.poll(2000), vec![timer, frame, timer]);
    }
}
