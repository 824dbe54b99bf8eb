//! skill-ladder - bulk skill-rating engine
//!
//! This crate rates competitive events for large populations of
//! participants. Games are partitioned into participant-disjoint "waves"
//! so thousands of updates can run sequentially, in parallel, or
//! pipelined - all three bit-identical - over a flat, grow-only backing
//! store, with five Weng-Lin rating models behind one compute contract.

pub mod batch;
pub mod config;
pub mod error;
mod executor;
pub mod ladder;
pub mod model;
mod normalize;
pub mod partition;
pub mod store;
pub mod types;

// Re-export commonly used types and traits
pub use batch::{BatchOutcome, BatchProcessor, CancelHandle};
pub use config::{EngineConfig, ExecutionStrategy};
pub use error::{RatingError, Result};
pub use ladder::Ladder;
pub use model::predict::{predict_draw, predict_rank, predict_win};
pub use model::{
    BradleyTerryFull, BradleyTerryPart, ModelParams, PlackettLuce, RatingModel,
    ThurstoneMostellerFull, ThurstoneMostellerPart,
};
pub use partition::{partition_waves, WavePlan};
pub use store::{BackingStore, EntityRegistry, RatingView};
pub use types::{BatchSummary, EntityId, FastRating, Game, GameReport, GameState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
