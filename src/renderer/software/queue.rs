//! Bounded FIFO of portal tasks.
//!
//! Storage lives inline (`SmallVec` whose inline size equals the bound), so
//! a frame never touches the heap. Entries are never recycled: the bound is
//! on tasks *per frame*, which is finite because column ranges only narrow
//! as they pass through portals.

use smallvec::SmallVec;

use crate::{renderer::RenderError, world::SectorId};

/// Maximum number of tasks one frame may enqueue.
pub const QUEUE_CAPACITY: usize = 256;

/// One unit of traversal work: resolve `sector` in columns `x0 ..= x1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Task {
    pub sector: SectorId,
    pub x0: i32,
    pub x1: i32,
}

impl Task {
    /// Whole-screen task rooted at `sector`.
    pub fn full(sector: SectorId, width: usize) -> Self {
        Self {
            sector,
            x0: 0,
            x1: width as i32 - 1,
        }
    }

    #[inline]
    pub fn contains(&self, other: &Task) -> bool {
        self.x0 <= other.x0 && other.x1 <= self.x1
    }
}

pub struct TaskQueue {
    tasks: SmallVec<[Task; QUEUE_CAPACITY]>,
    front: usize,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self {
            tasks: SmallVec::new(),
            front: 0,
        }
    }
}

impl TaskQueue {
    pub fn push(&mut self, task: Task) -> Result<(), RenderError> {
        if self.tasks.len() == QUEUE_CAPACITY {
            return Err(RenderError::QueueOverflow {
                capacity: QUEUE_CAPACITY,
            });
        }
        self.tasks.push(task);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Task> {
        let task = self.tasks.get(self.front).copied()?;
        self.front += 1;
        Some(task)
    }

    /// Tasks waiting to be processed.
    #[inline]
    pub fn pending(&self) -> usize {
        self.tasks.len() - self.front
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(sector: SectorId) -> Task {
        Task {
            sector,
            x0: 0,
            x1: 9,
        }
    }

    #[test]
    fn fifo_order() {
        let mut q = TaskQueue::default();
        q.push(task(3)).unwrap();
        q.push(task(1)).unwrap();
        assert_eq!(q.pending(), 2);
        assert_eq!(q.pop().map(|t| t.sector), Some(3));
        q.push(task(2)).unwrap();
        assert_eq!(q.pop().map(|t| t.sector), Some(1));
        assert_eq!(q.pop().map(|t| t.sector), Some(2));
        assert_eq!(q.pop(), None);
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn overflow_is_an_error_not_a_panic() {
        let mut q = TaskQueue::default();
        for i in 0..QUEUE_CAPACITY {
            q.push(task(i as SectorId)).unwrap();
        }
        // popping does not free slots within a frame
        q.pop();
        assert_eq!(
            q.push(task(0)),
            Err(RenderError::QueueOverflow {
                capacity: QUEUE_CAPACITY
            })
        );
        assert!(!q.tasks.spilled());
    }

    #[test]
    fn containment() {
        let parent = Task::full(0, 400);
        assert_eq!(parent.x1, 399);
        assert!(parent.contains(&Task {
            sector: 1,
            x0: 66,
            x1: 333
        }));
        assert!(!Task { sector: 1, x0: 10, x1: 20 }.contains(&parent));
    }
}
