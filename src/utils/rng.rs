use rand::{rngs::StdRng, SeedableRng};

/// Random source for random turns and playouts. An explicit seed always
/// wins; without one, debug builds use a fixed seed so runs repeat.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => default_rng(),
    }
}

#[cfg(debug_assertions)]
fn default_rng() -> StdRng {
    const SEED: u64 = 63;
    StdRng::seed_from_u64(SEED)
}

#[cfg(not(debug_assertions))]
fn default_rng() -> StdRng {
    StdRng::from_os_rng()
}
