use crate::*;
pub use random::*;

mod random;

/// Produces the mine set of a game once the first revealed cell is known.
pub trait MineGenerator {
    fn generate(self, config: &GameConfig) -> Result<MineLayout>;
}

