//! Collaborator widgets: small state machines around page furniture.

pub mod accordion;
pub mod floating_actions;
pub mod marquee;
pub mod modal;
pub mod sidebar;
pub mod solar_system;

pub use accordion::Accordion;
pub use floating_actions::{FloatingActions, ScrollMetrics, ScrollProgress};
pub use marquee::Marquee;
pub use modal::Modal;
pub use sidebar::{MobileSidebar, SidebarFollowUp};
pub use solar_system::{ConnectionLine, SolarMarkup, SolarSystem, connection_lines};
