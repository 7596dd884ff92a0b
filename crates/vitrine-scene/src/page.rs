//! Composition root: one page, every component, one event entry point.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vitrine_config::VitrineConfig;
use vitrine_ir::PageDocument;

use crate::animation::{RevealDefaults, RevealScheduler};
use crate::carousel::{Breakpoints, CarouselSettings, WindowedCarousel};
use crate::host::{
    CarouselSurface, ConnectionSurface, IntersectionEntry, LayoutQuery, Navigator, RevealSurface,
    TimerHandle, TimerHost, Viewport, VisibilityObserver, WidgetSurface,
};
use crate::widgets::{
    Accordion, FloatingActions, Marquee, MobileSidebar, Modal, ScrollMetrics, SidebarFollowUp,
    SolarMarkup, SolarSystem,
};

pub const CAROUSEL_WRAPPER_ID: &str = "logosWrapper";
pub const CAROUSEL_SLIDE_CLASS: &str = "logo-slide";
pub const ACCORDION_CLASS: &str = "accord";
pub const MODAL_OVERLAY_ID: &str = "modalOverlay";
pub const SIDEBAR_ID: &str = "mobileSidebar";
pub const MENU_TOGGLE_ID: &str = "mobileMenuToggle";
pub const FLOATING_ACTIONS_ID: &str = "floating-actions";
pub const SOLAR_SYSTEM_CLASS: &str = "solar-system";
pub const CENTER_LOGO_CLASS: &str = "center-logo";
pub const PLANET_CLASS: &str = "tech-planet";
pub const CONNECTION_LINES_ID: &str = "connectionLines";
pub const MARQUEE_ID: &str = "scrollWrapper";

/// Everything a full page needs from its host.
pub trait PageHost:
    TimerHost
    + Viewport
    + LayoutQuery
    + VisibilityObserver
    + RevealSurface
    + CarouselSurface
    + WidgetSurface
    + ConnectionSurface
    + Navigator
{
}

impl<T: ?Sized> PageHost for T where
    T: TimerHost
        + Viewport
        + LayoutQuery
        + VisibilityObserver
        + RevealSurface
        + CarouselSurface
        + WidgetSurface
        + ConnectionSurface
        + Navigator
{
}

/// Clickable controls the page listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "control", content = "index", rename_all = "snake_case")]
pub enum Control {
    CarouselNext,
    CarouselPrev,
    CarouselIndicator(usize),
    AccordionHeader(usize),
    ModalOpen,
    ModalClose,
    ModalOverlay,
    MenuToggle,
    SidebarClose,
    SidebarOverlay,
    SidebarNavLink,
    SidebarGetStarted,
    ScrollTop,
    Call,
    WhatsApp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageEvent {
    Intersections(Vec<IntersectionEntry>),
    /// The host viewport has already changed size.
    Resize,
    /// The host is about to paint; moving layout may need redrawing.
    AnimationFrame,
    Scroll(ScrollMetrics),
    TimerFired(TimerHandle),
    Click(Control),
    KeyDown(Key),
    FormSubmit,
    MarqueePress,
    /// Pointer or touch released over the marquee.
    MarqueeRelease,
}

#[derive(Debug)]
pub struct Page {
    reveal: RevealScheduler,
    carousel: WindowedCarousel,
    accordion: Accordion,
    modal: Modal,
    sidebar: MobileSidebar,
    floating: FloatingActions,
    solar: SolarSystem,
    marquee: Marquee,
}

impl Page {
    /// Build every component from the document. Missing markup leaves the
    /// matching component inert rather than failing.
    pub fn mount<H: PageHost + ?Sized>(
        document: &PageDocument,
        config: &VitrineConfig,
        host: &mut H,
    ) -> Self {
        let defaults = RevealDefaults::from_config(&config.animation).with_page_overrides(document);
        let reveal = RevealScheduler::initialize(document, &defaults, host);

        let breakpoints = Breakpoints::from_config(&config.slider);
        let settings = CarouselSettings::from_config(&config.slider);
        let carousel = match document.by_html_id(CAROUSEL_WRAPPER_ID) {
            Some(wrapper) => {
                let slides = document
                    .descendants_with_class(wrapper, CAROUSEL_SLIDE_CLASS)
                    .count();
                WindowedCarousel::initialize(slides, breakpoints, settings, host)
            }
            None => {
                debug!("no carousel wrapper, carousel is inert");
                WindowedCarousel::inert(breakpoints, settings)
            }
        };

        let accordion_items = document.elements_with_class(ACCORDION_CLASS).count();
        let accordion = Accordion::mount(accordion_items, host);
        let modal = Modal::mount(document.by_html_id(MODAL_OVERLAY_ID).is_some());
        let sidebar = MobileSidebar::mount(
            document.by_html_id(SIDEBAR_ID).is_some()
                && document.by_html_id(MENU_TOGGLE_ID).is_some(),
            &config.page,
        );
        let floating = FloatingActions::mount(
            document.by_html_id(FLOATING_ACTIONS_ID).is_some(),
            &config.page,
        );

        let mut solar = SolarSystem::mount(solar_markup(document), &config.page);
        solar.refresh(host);
        let marquee = Marquee::mount(document.by_html_id(MARQUEE_ID).is_some(), &config.page);

        info!(
            reveal = reveal.entries().len(),
            carousel_slides = carousel.state().map_or(0, |state| state.total()),
            accordion_items,
            connection_lines = solar.lines().len(),
            "page mounted"
        );

        Self {
            reveal,
            carousel,
            accordion,
            modal,
            sidebar,
            floating,
            solar,
            marquee,
        }
    }

    pub fn dispatch<H: PageHost + ?Sized>(&mut self, event: PageEvent, host: &mut H) {
        match event {
            PageEvent::Intersections(batch) => self.reveal.on_intersections(&batch, host),
            PageEvent::Resize => {
                self.carousel.on_resize(host);
                let width = host.viewport_width();
                self.sidebar.on_resize(width, host);
                self.solar.on_resize(host);
            }
            PageEvent::AnimationFrame => self.solar.refresh(host),
            PageEvent::Scroll(metrics) => self.floating.on_scroll(metrics, host),
            PageEvent::TimerFired(handle) => self.on_timer(handle, host),
            PageEvent::Click(control) => self.on_click(control, host),
            PageEvent::KeyDown(Key::Escape) => {
                self.modal.close(host);
                self.sidebar.on_escape(host);
            }
            PageEvent::KeyDown(Key::Other) => {}
            PageEvent::FormSubmit => self.modal.submit(host),
            PageEvent::MarqueePress => self.marquee.press(host),
            PageEvent::MarqueeRelease => self.marquee.release(host),
        }
    }

    fn on_timer<H: PageHost + ?Sized>(&mut self, handle: TimerHandle, host: &mut H) {
        if self.carousel.on_timer(handle, host)
            || self.floating.on_timer(handle)
            || self.solar.on_timer(handle, host)
            || self.marquee.on_timer(handle, host)
        {
            return;
        }
        if let Some(SidebarFollowUp::OpenModal) = self.sidebar.on_timer(handle, host) {
            self.modal.open(host);
        }
    }

    fn on_click<H: PageHost + ?Sized>(&mut self, control: Control, host: &mut H) {
        match control {
            Control::CarouselNext => self.carousel.next(host),
            Control::CarouselPrev => self.carousel.prev(host),
            Control::CarouselIndicator(index) => self.carousel.goto_index(index, host),
            Control::AccordionHeader(index) => self.accordion.toggle(index, host),
            Control::ModalOpen => self.modal.open(host),
            Control::ModalClose | Control::ModalOverlay => self.modal.close(host),
            Control::MenuToggle => self.sidebar.open(host),
            Control::SidebarClose | Control::SidebarOverlay => self.sidebar.close(host),
            Control::SidebarNavLink => self.sidebar.on_nav_link(host),
            Control::SidebarGetStarted => self.sidebar.on_get_started(host),
            Control::ScrollTop => self.floating.scroll_to_top(host),
            Control::Call => self.floating.call(host),
            Control::WhatsApp => self.floating.whatsapp(host),
        }
    }

    pub fn reveal(&self) -> &RevealScheduler {
        &self.reveal
    }

    pub fn carousel(&self) -> &WindowedCarousel {
        &self.carousel
    }

    pub fn accordion(&self) -> &Accordion {
        &self.accordion
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn sidebar(&self) -> &MobileSidebar {
        &self.sidebar
    }

    pub fn floating_actions(&self) -> &FloatingActions {
        &self.floating
    }

    pub fn solar_system(&self) -> &SolarSystem {
        &self.solar
    }

    pub fn marquee(&self) -> &Marquee {
        &self.marquee
    }
}

/// The first system container and centre logo; planets anywhere count.
fn solar_markup(document: &PageDocument) -> Option<SolarMarkup> {
    document.by_html_id(CONNECTION_LINES_ID)?;
    Some(SolarMarkup {
        system: document.elements_with_class(SOLAR_SYSTEM_CLASS).next()?,
        center: document.elements_with_class(CENTER_LOGO_CLASS).next()?,
        planets: document.elements_with_class(PLANET_CLASS).collect(),
    })
}
