//! Page decoration runtime.
//!
//! Every component is a deterministic state machine driven through the host
//! capability traits in [`host`]. Nothing here touches a browser; a
//! [`host::HeadlessHost`] runs the whole page in memory.
//!
//! ```text
//! Page
//!   ├── RevealScheduler   (visibility → transition timing, stagger)
//!   ├── WindowedCarousel  (paging, breakpoints, auto-advance)
//!   └── widgets           (accordion, modal, sidebar, floating actions,
//!                          connection lines, marquee)
//! ```

pub mod animation;
pub mod carousel;
pub mod host;
pub mod page;
pub mod widgets;

pub use animation::{EasingFunction, RevealScheduler};
pub use carousel::{Breakpoints, CarouselState, WindowedCarousel};
pub use host::HeadlessHost;
pub use page::{Control, Key, Page, PageEvent, PageHost};
pub use vitrine_ir::ElementId;
