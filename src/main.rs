use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitrine_config::VitrineConfig;
use vitrine_ir::{PageDocument, document_from_file, document_from_html};
use vitrine_scene::host::{ObserverOptions, Rect};
use vitrine_scene::page::{CENTER_LOGO_CLASS, PLANET_CLASS, SOLAR_SYSTEM_CLASS};
use vitrine_scene::{Control, HeadlessHost, Page, PageEvent};

const SAMPLE_PAGE: &str = include_str!("../assets/sample_page.html");

/// Vertical distance between animated blocks in the synthetic layout.
const BLOCK_PITCH: f64 = 360.0;
const BLOCK_HEIGHT: f64 = 240.0;
const SCROLL_STEP: f64 = 400.0;
/// Orbit radius of the synthetic solar system layout.
const ORBIT: f64 = 140.0;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = VitrineConfig::load();
    if let Some(path) = std::env::args().nth(1) {
        config.demo.page = Some(path.into());
    }

    let document = match &config.demo.page {
        Some(path) => document_from_file(path)?,
        None => document_from_html(SAMPLE_PAGE),
    };

    let mut host = HeadlessHost::new(
        config.demo.viewport_width,
        config.demo.viewport_height,
        ObserverOptions::from_config(&config.animation),
    );
    lay_out(&document, &mut host);
    let mut page = Page::mount(&document, &config, &mut host);

    scroll_through(&mut page, &mut host);

    page.dispatch(PageEvent::Click(Control::CarouselNext), &mut host);
    page.dispatch(PageEvent::Click(Control::AccordionHeader(1)), &mut host);
    advance(&mut page, &mut host, Duration::from_millis(5000));

    page.dispatch(PageEvent::Click(Control::MenuToggle), &mut host);
    page.dispatch(PageEvent::Click(Control::SidebarGetStarted), &mut host);
    advance(&mut page, &mut host, Duration::from_millis(config.page.sidebar_close_delay_ms));
    page.dispatch(PageEvent::FormSubmit, &mut host);

    page.dispatch(PageEvent::MarqueePress, &mut host);
    page.dispatch(PageEvent::MarqueeRelease, &mut host);
    advance(&mut page, &mut host, Duration::from_millis(config.page.marquee_resume_ms));

    page.dispatch(PageEvent::Click(Control::Call), &mut host);
    page.dispatch(PageEvent::Click(Control::WhatsApp), &mut host);

    host.resize(375, config.demo.viewport_height);
    page.dispatch(PageEvent::Resize, &mut host);
    advance(&mut page, &mut host, Duration::from_millis(config.slider.resize_debounce_ms));
    page.dispatch(PageEvent::Click(Control::ScrollTop), &mut host);

    let revealed = page
        .reveal()
        .entries()
        .iter()
        .filter(|entry| host.in_view(entry.target))
        .count();
    let progress: Vec<_> = page
        .reveal()
        .entries()
        .iter()
        .filter_map(|entry| host.reveal_progress(entry.target))
        .collect();
    let summary = serde_json::json!({
        "elapsed_ms": host.now().as_millis() as u64,
        "reveal": {
            "elements": page.reveal().entries().len(),
            "in_view": revealed,
            "still_observed": page.reveal().observed_count(),
            "eased_progress": progress,
        },
        "carousel": {
            "state": page.carousel().state(),
            "indicators": host.indicator_count(),
            "highlighted": host.highlighted(),
            "translation": host.translation(),
        },
        "accordion_open": page.accordion().open_item(),
        "modal_open": page.modal().is_open(),
        "sidebar_open": page.sidebar().is_open(),
        "scroll": page.floating_actions().last(),
        "marquee_paused": page.marquee().is_paused(),
        "connection_lines": host.connection_lines(),
        "links_followed": host.links(),
        "surface_writes": host.writes().len(),
        "live_timers": host.live_timers(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Stack every animated element in document order below the fold.
fn lay_out(document: &PageDocument, host: &mut HeadlessHost) {
    let width = host.viewport_rect().width;
    for (i, id) in document.elements_with_attr("data-animate").enumerate() {
        let top = 120.0 + BLOCK_PITCH * i as f64;
        host.set_layout(id, Rect::new(0.0, top, width, BLOCK_HEIGHT));
    }

    // Planets sit evenly on a circle around the centre logo.
    let (Some(system), Some(center)) = (
        document.elements_with_class(SOLAR_SYSTEM_CLASS).next(),
        document.elements_with_class(CENTER_LOGO_CLASS).next(),
    ) else {
        return;
    };
    let (cx, cy) = (width / 2.0, 200.0);
    host.set_layout(system, Rect::new(0.0, 0.0, width, 400.0));
    host.set_layout(center, Rect::new(cx - 40.0, cy - 40.0, 80.0, 80.0));
    let planets: Vec<_> = document.elements_with_class(PLANET_CLASS).collect();
    for (i, planet) in planets.iter().enumerate() {
        let theta = std::f64::consts::TAU * i as f64 / planets.len() as f64;
        let (px, py) = (cx + ORBIT * theta.cos(), cy + ORBIT * theta.sin());
        host.set_layout(*planet, Rect::new(px - 24.0, py - 24.0, 48.0, 48.0));
    }
}

fn advance(page: &mut Page, host: &mut HeadlessHost, by: Duration) {
    host.run_for(by, |host, handle| {
        page.dispatch(PageEvent::TimerFired(handle), host);
    });
}

fn deliver_intersections(page: &mut Page, host: &mut HeadlessHost) {
    let batch = host.take_intersections();
    if !batch.is_empty() {
        page.dispatch(PageEvent::Intersections(batch), host);
    }
}

/// Scroll to the bottom and back to the top, one throttle window per step.
fn scroll_through(page: &mut Page, host: &mut HeadlessHost) {
    let metrics = host.scroll_metrics();
    let max_scroll = (metrics.scroll_height - metrics.viewport_height).max(0.0);
    let step_pause = Duration::from_millis(120);

    let mut stops = Vec::new();
    let mut y = 0.0;
    while y < max_scroll {
        stops.push(y);
        y += SCROLL_STEP;
    }
    stops.push(max_scroll);
    stops.push(0.0);

    for y in stops {
        host.scroll_to(y);
        deliver_intersections(page, host);
        let metrics = host.scroll_metrics();
        page.dispatch(PageEvent::Scroll(metrics), host);
        advance(page, host, step_pause);
    }
    info!(max_scroll, "scrolled through page");
}
