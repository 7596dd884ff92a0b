use std::time::Duration;

use anyhow::{Context, Result};
use vitrine_config::VitrineConfig;
use vitrine_ir::{ElementId, document_from_html};
use vitrine_scene::host::{ObserverOptions, Rect, SurfaceWrite, WidgetTarget};
use vitrine_scene::widgets::ScrollMetrics;
use vitrine_scene::{Control, HeadlessHost, Key, Page, PageEvent};

const PAGE: &str = r##"
<html>
<body class="page">
    <button id="mobileMenuToggle">menu</button>
    <aside id="mobileSidebar">
        <button id="sidebarClose">x</button>
        <nav class="mobile-nav"><a href="#faq">FAQ</a></nav>
        <button id="mobileOpenModalBtn">Get started</button>
    </aside>
    <div id="mobileOverlay"></div>

    <div class="accord"><h3>One</h3><p>a</p></div>
    <div class="accord"><h3>Two</h3><p>b</p></div>
    <div class="accord"><h3>Three</h3><p>c</p></div>

    <button id="openModalBtn">Book a demo</button>
    <div id="modalOverlay">
        <button id="modalCloseBtn">x</button>
        <form id="demoForm"></form>
    </div>

    <div class="solar-system">
        <div id="connectionLines"></div>
        <div class="center-logo">core</div>
        <div class="tech-planet">a</div>
        <div class="tech-planet">b</div>
    </div>

    <div id="scrollWrapper"><div class="card">quote</div></div>

    <div id="floating-actions"></div>
</body>
</html>
"##;

fn mount(width: u32) -> (Page, HeadlessHost) {
    let document = document_from_html(PAGE);
    let mut host = HeadlessHost::new(width, 800, ObserverOptions::default());
    let page = Page::mount(&document, &VitrineConfig::default(), &mut host);
    (page, host)
}

fn advance(page: &mut Page, host: &mut HeadlessHost, ms: u64) {
    host.run_for(Duration::from_millis(ms), |host, handle| {
        page.dispatch(PageEvent::TimerFired(handle), host);
    });
}

fn click(page: &mut Page, host: &mut HeadlessHost, control: Control) {
    page.dispatch(PageEvent::Click(control), host);
}

/// System, centre and planet ids in document order.
fn solar_ids() -> Result<(ElementId, ElementId, Vec<ElementId>)> {
    let document = document_from_html(PAGE);
    let system = document
        .elements_with_class("solar-system")
        .next()
        .context("no system")?;
    let center = document
        .elements_with_class("center-logo")
        .next()
        .context("no centre")?;
    Ok((system, center, document.elements_with_class("tech-planet").collect()))
}

#[test]
fn accordion_keeps_one_item_open() {
    let (mut page, mut host) = mount(1280);
    assert!(host.widget(WidgetTarget::AccordionItem(0)));

    click(&mut page, &mut host, Control::AccordionHeader(2));
    assert!(!host.widget(WidgetTarget::AccordionItem(0)));
    assert!(host.widget(WidgetTarget::AccordionItem(2)));
    assert_eq!(page.accordion().open_item(), Some(2));

    click(&mut page, &mut host, Control::AccordionHeader(2));
    assert_eq!(page.accordion().open_item(), None);
}

#[test]
fn modal_close_paths() {
    let (mut page, mut host) = mount(1280);
    let closers = [
        PageEvent::Click(Control::ModalClose),
        PageEvent::Click(Control::ModalOverlay),
        PageEvent::KeyDown(Key::Escape),
        PageEvent::FormSubmit,
    ];
    for closer in closers {
        click(&mut page, &mut host, Control::ModalOpen);
        assert!(host.widget(WidgetTarget::ModalOverlay));
        page.dispatch(closer, &mut host);
        assert!(!host.widget(WidgetTarget::ModalOverlay));
        assert!(!page.modal().is_open());
    }

    click(&mut page, &mut host, Control::ModalOpen);
    page.dispatch(PageEvent::KeyDown(Key::Other), &mut host);
    assert!(page.modal().is_open());
}

#[test]
fn sidebar_close_paths() {
    let (mut page, mut host) = mount(375);
    for closer in [Control::SidebarClose, Control::SidebarOverlay] {
        click(&mut page, &mut host, Control::MenuToggle);
        assert!(host.widget(WidgetTarget::Sidebar));
        assert!(host.widget(WidgetTarget::MenuOpen));
        click(&mut page, &mut host, closer);
        assert!(!host.widget(WidgetTarget::Sidebar));
        assert!(!host.widget(WidgetTarget::SidebarOverlay));
    }

    click(&mut page, &mut host, Control::MenuToggle);
    page.dispatch(PageEvent::KeyDown(Key::Escape), &mut host);
    assert!(!page.sidebar().is_open());
}

#[test]
fn nav_link_closes_sidebar_after_delay() {
    let (mut page, mut host) = mount(375);
    click(&mut page, &mut host, Control::MenuToggle);
    click(&mut page, &mut host, Control::SidebarNavLink);

    advance(&mut page, &mut host, 299);
    assert!(page.sidebar().is_open());
    advance(&mut page, &mut host, 1);
    assert!(!page.sidebar().is_open());
    assert!(!host.widget(WidgetTarget::MenuOpen));
}

#[test]
fn get_started_hands_off_to_modal() {
    let (mut page, mut host) = mount(375);
    click(&mut page, &mut host, Control::MenuToggle);
    click(&mut page, &mut host, Control::SidebarGetStarted);
    assert!(!page.sidebar().is_open());
    assert!(!page.modal().is_open());

    advance(&mut page, &mut host, 300);
    assert!(page.modal().is_open());
    assert!(host.widget(WidgetTarget::ModalOverlay));
}

#[test]
fn widening_viewport_closes_sidebar() {
    let (mut page, mut host) = mount(375);
    click(&mut page, &mut host, Control::MenuToggle);

    host.resize(768, 800);
    page.dispatch(PageEvent::Resize, &mut host);
    assert!(page.sidebar().is_open());

    host.resize(1024, 800);
    page.dispatch(PageEvent::Resize, &mut host);
    assert!(!page.sidebar().is_open());
}

#[test]
fn scroll_progress_is_throttled() -> Result<()> {
    let (mut page, mut host) = mount(1280);
    let metrics = |scroll_y| ScrollMetrics {
        scroll_y,
        scroll_height: 3000.0,
        viewport_height: 1000.0,
    };

    page.dispatch(PageEvent::Scroll(metrics(1000.0)), &mut host);
    let first = host.scroll_progress().context("no progress written")?;
    assert!(host.widget(WidgetTarget::ScrollTopButton));

    // Dropped: still inside the 100 ms window.
    page.dispatch(PageEvent::Scroll(metrics(2000.0)), &mut host);
    assert_eq!(host.scroll_progress(), Some(first));

    advance(&mut page, &mut host, 100);
    page.dispatch(PageEvent::Scroll(metrics(100.0)), &mut host);
    let progress = page
        .floating_actions()
        .last()
        .context("no progress recorded")?;
    assert!((progress.percent - 5.0).abs() < 1e-9);
    assert!(!host.widget(WidgetTarget::ScrollTopButton));
    Ok(())
}

#[test]
fn headless_scroll_metrics_drive_progress() -> Result<()> {
    let (mut page, mut host) = mount(1280);
    host.scroll_to(400.0);
    let metrics = host.scroll_metrics();
    page.dispatch(PageEvent::Scroll(metrics), &mut host);
    // No layout: the document is exactly one viewport tall.
    let progress = page
        .floating_actions()
        .last()
        .context("no progress recorded")?;
    assert_eq!(progress.percent, 0.0);
    assert!(progress.show_scroll_top);
    Ok(())
}

#[test]
fn floating_buttons_navigate() {
    let (mut page, mut host) = mount(1280);
    host.scroll_to(900.0);

    click(&mut page, &mut host, Control::ScrollTop);
    assert_eq!(host.viewport_rect().y, 0.0);

    click(&mut page, &mut host, Control::Call);
    click(&mut page, &mut host, Control::WhatsApp);
    assert_eq!(
        host.links(),
        ["tel:+919999999999", "https://wa.me/9199999999999"]
    );
    assert!(host.writes().contains(&SurfaceWrite::OpenLink {
        href: "https://wa.me/9199999999999".to_string(),
        new_tab: true,
    }));
}

#[test]
fn marquee_pauses_until_resume_delay() {
    let (mut page, mut host) = mount(1280);
    page.dispatch(PageEvent::MarqueePress, &mut host);
    assert!(host.widget(WidgetTarget::MarqueePaused));

    page.dispatch(PageEvent::MarqueeRelease, &mut host);
    advance(&mut page, &mut host, 2999);
    assert!(page.marquee().is_paused());

    advance(&mut page, &mut host, 1);
    assert!(!page.marquee().is_paused());
    assert!(!host.widget(WidgetTarget::MarqueePaused));
}

#[test]
fn connection_lines_follow_debounced_resize() -> Result<()> {
    let (mut page, mut host) = mount(1280);
    assert!(host.connection_lines().is_empty());

    let (system, center, planets) = solar_ids()?;
    host.set_layout(system, Rect::new(0.0, 0.0, 400.0, 400.0));
    host.set_layout(center, Rect::new(150.0, 150.0, 100.0, 100.0));
    host.set_layout(planets[0], Rect::new(330.0, 180.0, 40.0, 40.0));
    host.set_layout(planets[1], Rect::new(180.0, 0.0, 40.0, 40.0));

    host.resize(1024, 800);
    page.dispatch(PageEvent::Resize, &mut host);
    advance(&mut page, &mut host, 50);
    page.dispatch(PageEvent::Resize, &mut host);
    advance(&mut page, &mut host, 99);
    assert!(host.connection_lines().is_empty());

    advance(&mut page, &mut host, 1);
    let lines = host.connection_lines();
    assert_eq!(lines.len(), 2);
    assert_eq!((lines[0].left, lines[0].top), (200.0, 200.0));
    assert!((lines[0].length - 150.0).abs() < 1e-9);
    assert!(lines[0].angle_deg.abs() < 1e-9);
    assert!((lines[1].length - 180.0).abs() < 1e-9);
    assert!((lines[1].angle_deg + 90.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn animation_frame_redraws_moving_planets() -> Result<()> {
    let (mut page, mut host) = mount(1280);
    let (system, center, planets) = solar_ids()?;
    host.set_layout(system, Rect::new(0.0, 0.0, 400.0, 400.0));
    host.set_layout(center, Rect::new(150.0, 150.0, 100.0, 100.0));
    host.set_layout(planets[0], Rect::new(330.0, 180.0, 40.0, 40.0));

    page.dispatch(PageEvent::AnimationFrame, &mut host);
    assert_eq!(host.connection_lines().len(), 1);

    host.set_layout(planets[0], Rect::new(180.0, 330.0, 40.0, 40.0));
    page.dispatch(PageEvent::AnimationFrame, &mut host);
    let lines = host.connection_lines();
    assert!((lines[0].angle_deg - 90.0).abs() < 1e-9);
    assert_eq!(page.solar_system().lines(), lines);
    Ok(())
}

#[test]
fn bare_page_leaves_widgets_inert() {
    let document = document_from_html("<html><body></body></html>");
    let mut host = HeadlessHost::new(375, 800, ObserverOptions::default());
    let mut page = Page::mount(&document, &VitrineConfig::default(), &mut host);

    for control in [
        Control::AccordionHeader(0),
        Control::ModalOpen,
        Control::MenuToggle,
        Control::SidebarGetStarted,
        Control::ScrollTop,
        Control::Call,
        Control::WhatsApp,
    ] {
        click(&mut page, &mut host, control);
    }
    page.dispatch(PageEvent::MarqueePress, &mut host);
    page.dispatch(PageEvent::MarqueeRelease, &mut host);
    page.dispatch(PageEvent::AnimationFrame, &mut host);
    page.dispatch(
        PageEvent::Scroll(ScrollMetrics {
            scroll_y: 500.0,
            scroll_height: 2000.0,
            viewport_height: 800.0,
        }),
        &mut host,
    );
    assert!(host.writes().is_empty());
    assert_eq!(host.live_timers(), 0);
}
