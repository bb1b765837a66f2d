pub mod powerups;
pub mod score;
pub mod wave;

pub use powerups::DropTable;
pub use score::ScoreSystem;
pub use wave::{WaveAction, WaveDirector};
