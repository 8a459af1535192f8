pub mod period;
pub mod ranking;
pub mod streak;
pub mod patterns;
pub mod fun_facts;
pub mod aggregator;
pub mod enrich;
pub mod pipeline;
pub mod timeline;
pub mod slides;
pub mod sequencer;
pub mod share;
pub mod session;

pub use period::{date_range, today_local};
pub use aggregator::{Aggregator, CreditsIndex};
pub use pipeline::{PipelineOutcome, SummaryPipeline};
pub use timeline::{RevealStep, Timeline, TimelineCursor};
pub use slides::{render, Slide, SlideView};
pub use sequencer::{SequencerEvent, SequencerState, SlideSequencer, Transition};
pub use share::{format_share_text, Clipboard, NativeShare, ShareError, ShareOutcome, Sharer};
pub use session::WrappedSession;
