//! Actor Model: message-passing concurrency for the bar.
//!
//! - **Widget threads**: one per widget, supervised, each publishing into
//!   its own slot and sending a dirty signal
//! - **Render Actor**: drains dirty signals, snapshots every slot, renders
//!   the template, writes one line
//! - **Pipeline relays**: carry lines to lemonbar and clicks to the shell
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  Dirty(tag)  ┌──────────────┐  line   ┌──────────┐
//! │ widget-clock │ ───────────▶ │              │ ──────▶ │ lemonbar │
//! ├──────────────┤              │ Render Actor │         └────┬─────┘
//! │ widget-vol   │ ───────────▶ │              │              │ clicks
//! ├──────────────┤              └──────┬───────┘              ▼
//! │ widget-bspc  │ ───────────▶        │ snapshot        ┌──────────┐
//! └──────┬───────┘                     ▼                 │    sh    │
//!        │ store            ┌─────────────────────┐      └──────────┘
//!        └────────────────▶ │ tag → Slot (RwLock) │
//!                           └─────────────────────┘
//! ```

mod compositor;
pub mod layering;
mod messages;
mod pipeline;
mod renderer;
mod sink;
mod supervisor;

pub use compositor::{Compositor, RunningBar};
pub use messages::{CompositorMessage, RenderStats};
pub use pipeline::{forward_lines, relay_lines, OutputPipeline, PipelineConfig};
pub use renderer::{RendererActor, SlotMap};
pub use sink::{LineSink, WriterSink};
pub use supervisor::{spawn_widget, supervise, WidgetExit, WidgetThread};
