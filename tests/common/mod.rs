use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

pub mod test_helpers {
    use super::*;

    pub fn setup_test_logger() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    /// Shared invocation counter for operations handed to the executor
    #[derive(Clone, Default)]
    pub struct CallCounter(Arc<AtomicU32>);

    impl CallCounter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Records a call and returns its 1-based number
        pub fn hit(&self) -> u32 {
            self.0.fetch_add(1, Ordering::SeqCst) + 1
        }

        pub fn count(&self) -> u32 {
            self.0.load(Ordering::SeqCst)
        }
    }
}
