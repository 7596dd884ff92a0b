use crate::host::{WidgetSurface, WidgetTarget};

/// FAQ accordion where at most one item is open.
#[derive(Debug, Default)]
pub struct Accordion {
    count: usize,
    open: Option<usize>,
}

impl Accordion {
    /// The first item starts open. Zero items is inert.
    pub fn mount<H: WidgetSurface + ?Sized>(count: usize, host: &mut H) -> Self {
        let mut accordion = Self { count, open: None };
        if count > 0 {
            accordion.open = Some(0);
            host.set_active(WidgetTarget::AccordionItem(0), true);
        }
        accordion
    }

    pub fn open_item(&self) -> Option<usize> {
        self.open
    }

    /// Close every other item, then flip `index`.
    pub fn toggle<H: WidgetSurface + ?Sized>(&mut self, index: usize, host: &mut H) {
        if index >= self.count {
            return;
        }
        match self.open {
            Some(current) if current == index => {
                self.open = None;
                host.set_active(WidgetTarget::AccordionItem(index), false);
            }
            previous => {
                if let Some(previous) = previous {
                    host.set_active(WidgetTarget::AccordionItem(previous), false);
                }
                self.open = Some(index);
                host.set_active(WidgetTarget::AccordionItem(index), true);
            }
        }
    }
}
