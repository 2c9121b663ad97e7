mod task_queue;
pub(crate) use task_queue::TaskQueue;
