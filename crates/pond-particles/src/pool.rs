//! Shared particle free list

use crate::particle::Particle;

/// Recycles particle storage across every emitter.
///
/// Particles move in and out of the pool by value, so a particle can never
/// sit in the pool twice.
#[derive(Debug, Default)]
pub struct ParticlePool {
    free: Vec<Particle>,
    allocated: usize,
    returned: usize,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop a free particle, or allocate one when the pool is empty
    pub fn take(&mut self) -> Particle {
        match self.free.pop() {
            Some(p) => p,
            None => {
                self.allocated += 1;
                Particle::default()
            }
        }
    }

    pub fn give_back(&mut self, particle: Particle) {
        self.returned += 1;
        self.free.push(particle);
    }

    /// Particles waiting to be reused
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Particles ever created by this pool
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Particles ever returned to this pool
    pub fn returned(&self) -> usize {
        self.returned
    }
}
