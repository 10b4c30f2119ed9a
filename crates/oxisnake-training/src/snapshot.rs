//! Single-slot handoff of the best genome to a display thread.
//!
//! The training loop [`publish`](BestSlot::publish)es a [`BestSnapshot`] after
//! each evaluated generation, overwriting whatever was there. A consumer
//! [`take`](BestSlot::take)s the latest snapshot when it is ready for one.
//! Nothing queues: a slow consumer simply skips generations.
//!
//! Snapshots are immutable and shared through [`Arc`], so the lock is held only
//! long enough to swap a pointer and a reader never sees a half-written genome.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{genetic::Individual, network::NeuralNetwork};

/// The best genome of one generation.
#[derive(Debug, Clone)]
pub struct BestSnapshot {
    pub generation: usize,
    pub fitness: f64,
    pub network: Arc<NeuralNetwork>,
}

impl BestSnapshot {
    #[must_use]
    pub fn new(generation: usize, individual: &Individual) -> Self {
        Self {
            generation,
            fitness: individual.fitness(),
            network: Arc::clone(individual.network()),
        }
    }
}

/// A mailbox holding at most one [`BestSnapshot`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use oxisnake_training::{network::NeuralNetwork, snapshot::{BestSlot, BestSnapshot}};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let network = Arc::new(NeuralNetwork::random(&[44, 4], &mut Pcg32::seed_from_u64(0)).unwrap());
/// let slot = BestSlot::new();
/// slot.publish(BestSnapshot { generation: 0, fitness: 1.0, network: Arc::clone(&network) });
/// slot.publish(BestSnapshot { generation: 1, fitness: 2.0, network });
///
/// assert_eq!(slot.take().unwrap().generation, 1);
/// assert!(slot.take().is_none());
/// ```
#[derive(Debug, Default)]
pub struct BestSlot {
    slot: Mutex<Option<Arc<BestSnapshot>>>,
}

impl BestSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored snapshot.
    pub fn publish(&self, snapshot: BestSnapshot) {
        *self.lock() = Some(Arc::new(snapshot));
    }

    /// Removes and returns the stored snapshot, if any.
    #[must_use]
    pub fn take(&self) -> Option<Arc<BestSnapshot>> {
        self.lock().take()
    }

    /// Returns the stored snapshot without removing it.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<BestSnapshot>> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<BestSnapshot>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
