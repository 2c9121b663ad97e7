use std::{
    collections::VecDeque,
    sync::{Arc, Condvar, Mutex},
};

struct QueueState<T> {
    tasks: VecDeque<T>,
    stopped: bool,
}

struct InnerTaskQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

impl<T> InnerTaskQueue<T> {
    fn new() -> InnerTaskQueue<T> {
        InnerTaskQueue {
            state: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                stopped: false,
            }),
            available: Condvar::new(),
        }
    }

    fn len(&self) -> usize {
        self.state.lock().unwrap().tasks.len()
    }

    fn push(&self, task: T) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.stopped {
            return false;
        }
        state.tasks.push_back(task);
        self.available.notify_one();
        true
    }

    fn recv(&self) -> Option<T> {
        let mut state = self.state.lock().unwrap();
        loop {
            if state.stopped {
                return None;
            }
            match state.tasks.pop_front() {
                Some(task) => return Some(task),
                None => state = self.available.wait(state).unwrap(),
            }
        }
    }

    fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        state.stopped = true;
        self.available.notify_all();
    }
}

/// An unbounded FIFO queue shared between task submitters and worker threads.
///
/// A pushed task is handed to exactly one receiver. Once [`TaskQueue::stop`] is
/// called, receivers return `None` even while tasks are still queued and
/// further pushes are refused.
pub struct TaskQueue<T> {
    inner: Arc<InnerTaskQueue<T>>,
}

impl<T> TaskQueue<T> {
    pub fn new() -> TaskQueue<T> {
        TaskQueue {
            inner: Arc::new(InnerTaskQueue::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Append a task and wake one waiting receiver.
    /// Returns `false` if the queue has been stopped.
    pub fn push(&self, task: T) -> bool {
        self.inner.push(task)
    }

    /// Take the oldest task, blocking while the queue is empty.
    /// Returns `None` once the queue has been stopped.
    pub fn recv(&self) -> Option<T> {
        self.inner.recv()
    }

    /// Stop the queue and wake every waiting receiver.
    pub fn stop(&self) {
        self.inner.stop();
    }
}

impl<T> Clone for TaskQueue<T> {
    fn clone(&self) -> TaskQueue<T> {
        TaskQueue {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{thread::sleep, time::Duration};

    use super::*;

    #[test]
    fn test_fifo_order() {
        let queue = TaskQueue::new();
        assert_eq!(queue.len(), 0);
        assert!(queue.push(1));
        assert!(queue.push(2));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.recv(), Some(1));
        assert_eq!(queue.recv(), Some(2));
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_recv_blocks_until_push() {
        let queue = TaskQueue::new();

        let receiver = queue.clone();
        let waiting = std::thread::spawn(move || receiver.recv());

        sleep(Duration::from_millis(200));
        assert!(!waiting.is_finished());

        queue.push(7);
        assert_eq!(waiting.join().unwrap(), Some(7));
    }

    #[test]
    fn test_stop_wakes_blocked_receivers() {
        let queue: TaskQueue<i32> = TaskQueue::new();

        let waiting = (0..4)
            .map(|_| {
                let receiver = queue.clone();
                std::thread::spawn(move || receiver.recv())
            })
            .collect::<Vec<_>>();

        sleep(Duration::from_millis(200));
        assert!(waiting.iter().all(|handle| !handle.is_finished()));

        queue.stop();
        for handle in waiting {
            assert_eq!(handle.join().unwrap(), None);
        }
    }

    #[test]
    fn test_stop_abandons_pending_tasks() {
        let queue = TaskQueue::new();
        queue.push(1);
        queue.push(2);
        queue.stop();

        assert_eq!(queue.recv(), None);
        assert!(!queue.push(3));
    }
}
