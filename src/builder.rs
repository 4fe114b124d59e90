use crate::{PanicHandler, ThreadPool};
use std::{any::Any, num::NonZeroUsize, sync::Arc};

#[derive(Default)]
pub struct ThreadPoolBuilder {
    threads: Option<NonZeroUsize>,
    panic_handler: Option<PanicHandler>,
}

impl ThreadPoolBuilder {
    /// Number of operating system threads, fixed for the pool's lifetime
    pub fn threads(mut self, val: NonZeroUsize) -> Self {
        self.threads = Some(val);
        self
    }

    /// Panic handler for job panics caught at the worker boundary
    pub fn panic_handler(
        mut self,
        f: impl Fn(Box<dyn Any + Send>) + Send + Sync + 'static,
    ) -> Self {
        self.panic_handler = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> ThreadPool {
        let threads = self.threads.unwrap_or_else(default_thread_count);
        ThreadPool::new(threads, self.panic_handler)
    }
}

fn default_thread_count() -> NonZeroUsize {
    num_cpus::get().try_into().expect("can't define num cpus")
}
