use ahash::HashMap;
use egui::Rect;

use crate::content::{ContentElement, PointerEvents};

/// The content elements owned by one window.
#[derive(Clone, Debug, Default)]
pub struct Document {
    elements: HashMap<String, ContentElement>,
}

impl Document {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains_slot(&self, slot: &str) -> bool {
        self.elements.contains_key(slot)
    }

    pub fn query_slot(&self, slot: &str) -> Option<&ContentElement> {
        self.elements.get(slot)
    }

    /// Slots currently owned, sorted.
    pub fn slots(&self) -> Vec<&str> {
        let mut slots: Vec<&str> = self.elements.keys().map(String::as_str).collect();
        slots.sort_unstable();
        slots
    }

    /// Returns the element back if the slot is already taken.
    pub(super) fn attach(&mut self, element: ContentElement) -> Result<(), ContentElement> {
        if self.elements.contains_key(&element.slot) {
            return Err(element);
        }
        self.elements.insert(element.slot.clone(), element);
        Ok(())
    }

    pub(super) fn detach(&mut self, slot: &str) -> Option<ContentElement> {
        self.elements.remove(slot)
    }

    pub(super) fn drain(&mut self) -> Vec<ContentElement> {
        self.elements.drain().map(|(_, element)| element).collect()
    }

    pub(super) fn set_content_rect(&mut self, slot: &str, rect: Rect) -> bool {
        match self.elements.get_mut(slot) {
            Some(element) => {
                element.rect = Some(rect);
                true
            }
            None => false,
        }
    }

    fn set_pointer_events(&mut self, mode: PointerEvents) {
        for element in self.elements.values_mut() {
            element.pointer_events = mode;
        }
    }

    /// Stop embedded content from capturing the pointer.
    pub fn disable_content_pointer_events(&mut self) {
        self.set_pointer_events(PointerEvents::None);
    }

    pub fn enable_content_pointer_events(&mut self) {
        self.set_pointer_events(PointerEvents::Auto);
    }

    pub fn pointer_events_disabled(&self) -> bool {
        !self.elements.is_empty()
            && self
                .elements
                .values()
                .all(|element| element.pointer_events == PointerEvents::None)
    }
}
