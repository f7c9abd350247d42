//! Deterministic RNG streams segregated by engine domain.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

/// Bundle of independent streams so that, for example, extra minigame ticks
/// never shift which fish the next cast selects.
#[derive(Debug, Clone)]
pub struct RngBundle {
    selection: CountingRng<ChaCha20Rng>,
    minigame: CountingRng<ChaCha20Rng>,
    economy: CountingRng<ChaCha20Rng>,
    world: CountingRng<ChaCha20Rng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            selection: CountingRng::new(derive_stream_seed(seed, b"selection")),
            minigame: CountingRng::new(derive_stream_seed(seed, b"minigame")),
            economy: CountingRng::new(derive_stream_seed(seed, b"economy")),
            world: CountingRng::new(derive_stream_seed(seed, b"world")),
        }
    }

    /// Catch selection draws.
    pub fn selection(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.selection
    }

    /// Reeling physics: mood swings and target prompts.
    pub fn minigame(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.minigame
    }

    /// Weights, golden/shiny rolls, bite delays and double hooks.
    pub fn economy(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.economy
    }

    /// Scheduler rolls: weather, events, market, crates, tips, bounties.
    pub fn world(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.world
    }

    /// Draw counts per stream, in `[selection, minigame, economy, world]` order.
    #[must_use]
    pub const fn draws(&self) -> [u64; 4] {
        [
            self.selection.draws,
            self.minigame.draws,
            self.economy.draws,
            self.world.draws,
        ]
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
