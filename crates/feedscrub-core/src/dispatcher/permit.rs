//! Permit pool bounding how many feed pipelines run at once.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::error::FeedError;

/// Fixed-size pool of pipeline slots. Cheap to clone; clones share the slots.
#[derive(Debug, Clone)]
pub struct PermitPool {
    semaphore: Arc<Semaphore>,
    size: usize,
}

/// One held slot. The slot returns to the pool when this is dropped.
#[derive(Debug)]
pub struct FeedPermit {
    _permit: OwnedSemaphorePermit,
}

impl PermitPool {
    /// Create a pool with `size` slots (at least one).
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Slots free right now.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Slots currently held.
    pub fn in_use(&self) -> usize {
        self.size.saturating_sub(self.available())
    }

    /// Waits for a free slot. Fails with [`FeedError::Cancelled`] as soon as
    /// `cancel` fires, even if a slot is free.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<FeedPermit, FeedError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FeedError::Cancelled),
            permit = Arc::clone(&self.semaphore).acquire_owned() => permit
                .map(|p| FeedPermit { _permit: p })
                .map_err(|_| FeedError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn acquire_and_release() {
        let pool = PermitPool::new(2);
        let cancel = CancellationToken::new();
        assert_eq!(pool.available(), 2);
        let a = pool.acquire(&cancel).await.unwrap();
        let b = pool.acquire(&cancel).await.unwrap();
        assert_eq!(pool.in_use(), 2);
        assert_eq!(pool.available(), 0);
        drop(a);
        assert_eq!(pool.available(), 1);
        drop(b);
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn zero_size_is_clamped() {
        assert_eq!(PermitPool::new(0).size(), 1);
    }

    #[tokio::test]
    async fn exhausted_pool_blocks_until_release() {
        let pool = PermitPool::new(1);
        let cancel = CancellationToken::new();
        let held = pool.acquire(&cancel).await.unwrap();

        let waiter = {
            let pool = pool.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { pool.acquire(&cancel).await.map(|_| ()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(held);
        waiter.await.unwrap().unwrap();
        assert_eq!(pool.available(), 1);
    }

    #[tokio::test]
    async fn cancel_interrupts_waiting_acquire() {
        let pool = PermitPool::new(1);
        let cancel = CancellationToken::new();
        let _held = pool.acquire(&cancel).await.unwrap();

        let waiter = {
            let pool = pool.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { pool.acquire(&cancel).await.map(|_| ()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
        let res = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("acquire should fail fast")
            .unwrap();
        assert!(matches!(res, Err(FeedError::Cancelled)));
    }

    #[tokio::test]
    async fn cancelled_token_fails_even_with_free_slots() {
        let pool = PermitPool::new(3);
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(pool.acquire(&cancel).await, Err(FeedError::Cancelled)));
        assert_eq!(pool.available(), 3);
    }
}
