pub mod carousel;
pub mod catalog;
pub mod coalesce;
pub mod config;
pub mod contact;
pub mod counter;
pub mod cursor;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod modal;
pub mod policy;
pub mod reload;
pub mod strategy;
pub mod tilt;
pub mod tween;
pub mod watcher;

pub use carousel::{resolve_drag, Carousel, DragOutcome, AUTO_ADVANCE_MS, DRAG_THRESHOLD_PX};
pub use catalog::{ProjectEntry, FALLBACK_PROJECT_IMAGE, PROJECT_CATALOG};
pub use coalesce::{Coalescer, FrameGate};
pub use config::{
    AnimationConfig, CarouselConfig, ContactConfig, CounterConfig, CursorConfig, DevReloadConfig,
    MediaConfig, PortfolioConfig, RevealConfig, SiteConfig, TweenRevealConfig,
    SITE_CONFIG_ELEMENT_ID,
};
pub use contact::{
    is_plausible_email, ContactMessage, ContactTransport, SubmitControl, SubmitController,
    FAILURE_MESSAGE, SENDING_LABEL, SIMULATED_SEND_MS, SUCCESS_MESSAGE, SUCCESS_MESSAGE_MS,
};
pub use counter::{
    format_counter, parse_counter_target, CounterAnimation, CounterFrame, COUNTER_DURATION_MS,
    COUNTER_TICK_MS, DEFAULT_COUNTER_SUFFIX,
};
pub use cursor::{
    CursorLook, Follower, HoverState, Point, CURSOR_DURATION_S, FOLLOWER_DURATION_S,
};
pub use error::{ConfigError, ContactError, CounterError, MarginError, SubmitError};
pub use filter::{partition, split_categories, Filter, FilterBar, FILTER_ALL};
pub use geometry::{visible_ratio, MarginLength, Rect, RootMargin};
pub use modal::{
    ImageLoad, ImageStage, ModalClick, ModalContent, ModalState, BODY_OVERFLOW_LOCKED,
    BODY_OVERFLOW_UNLOCKED,
};
pub use policy::TriggerPolicy;
pub use reload::{
    is_reload_signal, should_enable, DevReloadMode, PollFingerprint, ReloadPoller,
    RELOAD_MESSAGE,
};
pub use strategy::{Capabilities, RenderStrategy, StrategyPreference};
pub use tilt::{tilt_for_pointer, Tilt, TILT_PERSPECTIVE_PX};
pub use tween::{Ease, TweenSpec};
pub use watcher::{
    TargetId, VisibilitySample, VisibilityWatcher, WatchBatch, WatchEvent, WatchOptions,
    THRESHOLD_EPSILON,
};
