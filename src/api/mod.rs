mod announcement;
mod config_validation;
mod coordinator;
mod coordinator_config;
mod highlight_controller;
mod interaction_coordinator;
mod legend_synchronizer;
mod navigation_controller;
mod navigation_key_resolver;
mod observer_registry;
mod overlay_shapes;
mod pointer_coordinator;
mod scene_cache;
mod timer_scheduler;
mod tooltip_content;
mod tooltip_controller;
mod tooltip_placement;

pub use announcement::{AnnouncementFormatter, DefaultAnnouncementFormatter};
pub use coordinator::InteractionCoordinator;
pub use coordinator_config::CoordinatorConfig;
pub use pointer_coordinator::DocumentPointerEvent;
pub use scene_cache::SceneCache;
pub use tooltip_content::{TooltipContent, TooltipErrorRange, TooltipItem};
pub use tooltip_placement::{TooltipAnchorSource, TooltipPlacement};
