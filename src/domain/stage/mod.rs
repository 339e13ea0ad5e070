//! Stage module - The fixed handshake sequence and what each step looks like.
//!
//! - `Stage` - the seven ordered handshake steps
//! - `StageCatalog` - static descriptive metadata for every stage
//! - `RenderState` - display flags derived purely from the current stage

mod catalog;
mod render_state;
mod stage;

pub use catalog::{Direction, StageCatalog, StageMetadata};
pub use render_state::RenderState;
pub use stage::Stage;
