use std::time::Duration;

use anyhow::{Context, Result};
use vitrine_config::VitrineConfig;
use vitrine_ir::document_from_html;
use vitrine_scene::host::ObserverOptions;
use vitrine_scene::{Control, HeadlessHost, Page, PageEvent};

fn logo_page(slides: usize) -> String {
    let slides: String = (0..slides)
        .map(|i| format!(r#"<div class="logo-slide">logo {i}</div>"#))
        .collect();
    format!(
        r#"<html><body>
            <div id="logosWrapper">{slides}</div>
            <button id="prevBtn"></button>
            <button id="nextBtn"></button>
        </body></html>"#
    )
}

fn mount(slides: usize, width: u32) -> (Page, HeadlessHost) {
    let document = document_from_html(&logo_page(slides));
    let mut host = HeadlessHost::new(width, 800, ObserverOptions::default());
    let page = Page::mount(&document, &VitrineConfig::default(), &mut host);
    (page, host)
}

fn advance(page: &mut Page, host: &mut HeadlessHost, ms: u64) {
    host.run_for(Duration::from_millis(ms), |host, handle| {
        page.dispatch(PageEvent::TimerFired(handle), host);
    });
}

fn current(page: &Page) -> Result<usize> {
    Ok(page.carousel().state().context("carousel is inert")?.current())
}

#[test]
fn resize_to_mobile_rebuilds_indicators_and_clamps() -> Result<()> {
    let (mut page, mut host) = mount(18, 1280);
    assert_eq!(host.indicator_count(), 13);
    assert_eq!(host.translation(), Some("translateX(0%)"));

    page.dispatch(PageEvent::Click(Control::CarouselIndicator(12)), &mut host);
    assert_eq!(current(&page)?, 12);
    assert_eq!(host.highlighted(), Some(12));
    assert_eq!(host.translation(), Some("translateX(-200%)"));

    host.resize(375, 800);
    page.dispatch(PageEvent::Resize, &mut host);
    // Nothing changes until the debounce window closes.
    assert_eq!(host.indicator_count(), 13);
    advance(&mut page, &mut host, 250);

    assert_eq!(host.indicator_count(), 18);
    let state = page.carousel().state().context("carousel is inert")?;
    assert_eq!(state.per_view(), 1);
    assert!(state.current() <= 17);
    assert_eq!(host.highlighted(), Some(state.current()));
    Ok(())
}

#[test]
fn resize_storm_applies_once() -> Result<()> {
    let (mut page, mut host) = mount(18, 1280);
    host.clear_writes();
    for width in [1100, 900, 700, 500] {
        host.resize(width, 800);
        page.dispatch(PageEvent::Resize, &mut host);
        advance(&mut page, &mut host, 100);
    }
    assert_eq!(host.indicator_count(), 13);
    advance(&mut page, &mut host, 250);
    assert_eq!(host.indicator_count(), 18);
    let rebuilds = host
        .writes()
        .iter()
        .filter(|write| matches!(write, vitrine_scene::host::SurfaceWrite::Indicators { .. }))
        .count();
    assert_eq!(rebuilds, 1);
    Ok(())
}

#[test]
fn one_live_auto_timer_after_manual_paging() -> Result<()> {
    let (mut page, mut host) = mount(18, 1280);
    assert_eq!(host.live_timers(), 1);

    let controls = [
        Control::CarouselNext,
        Control::CarouselNext,
        Control::CarouselPrev,
        Control::CarouselIndicator(7),
        Control::CarouselPrev,
        Control::CarouselIndicator(40),
        Control::CarouselNext,
    ];
    for control in controls {
        page.dispatch(PageEvent::Click(control), &mut host);
        assert_eq!(host.live_timers(), 1);
        let handle = page.carousel().auto_timer().context("no auto timer")?;
        assert!(host.is_live(handle));
    }
    // Index 40 clamps to 12, then next wraps.
    assert_eq!(current(&page)?, 0);
    Ok(())
}

#[test]
fn auto_tick_advances_without_rearming() -> Result<()> {
    let (mut page, mut host) = mount(18, 1280);
    let before = page.carousel().auto_timer().context("no auto timer")?;
    advance(&mut page, &mut host, 5000);
    assert_eq!(current(&page)?, 1);
    assert_eq!(page.carousel().auto_timer(), Some(before));
    advance(&mut page, &mut host, 10_000);
    assert_eq!(current(&page)?, 3);
    assert_eq!(host.live_timers(), 1);
    Ok(())
}

#[test]
fn manual_paging_restarts_interval() -> Result<()> {
    let (mut page, mut host) = mount(18, 1280);
    advance(&mut page, &mut host, 4000);
    page.dispatch(PageEvent::Click(Control::CarouselNext), &mut host);
    assert_eq!(current(&page)?, 1);

    advance(&mut page, &mut host, 1500);
    assert_eq!(current(&page)?, 1);
    advance(&mut page, &mut host, 3500);
    assert_eq!(current(&page)?, 2);
    Ok(())
}

#[test]
fn auto_advance_wraps_at_last_offset() -> Result<()> {
    let (mut page, mut host) = mount(18, 1280);
    page.dispatch(PageEvent::Click(Control::CarouselIndicator(12)), &mut host);
    advance(&mut page, &mut host, 5000);
    assert_eq!(current(&page)?, 0);
    assert_eq!(host.translation(), Some("translateX(0%)"));
    Ok(())
}

#[test]
fn fewer_slides_than_window() -> Result<()> {
    let (mut page, mut host) = mount(4, 1280);
    assert_eq!(host.indicator_count(), 1);
    page.dispatch(PageEvent::Click(Control::CarouselNext), &mut host);
    page.dispatch(PageEvent::Click(Control::CarouselPrev), &mut host);
    assert_eq!(current(&page)?, 0);
    Ok(())
}

#[test]
fn missing_wrapper_is_inert() {
    let document = document_from_html("<html><body><p>no carousel</p></body></html>");
    let mut host = HeadlessHost::new(1280, 800, ObserverOptions::default());
    let mut page = Page::mount(&document, &VitrineConfig::default(), &mut host);

    assert!(page.carousel().is_inert());
    page.dispatch(PageEvent::Click(Control::CarouselNext), &mut host);
    page.dispatch(PageEvent::Resize, &mut host);
    assert_eq!(host.live_timers(), 0);
    assert!(host.translation().is_none());
}

#[test]
fn empty_wrapper_is_inert() {
    let (page, host) = mount(0, 1280);
    assert!(page.carousel().is_inert());
    assert_eq!(host.live_timers(), 0);
    assert_eq!(host.indicator_count(), 0);
}
