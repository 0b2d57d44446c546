//! Active-section tracking for the navigation bar.
//!
//! On every scroll the navigator adds a fixed lookahead to the scroll offset
//! and scans the sections from last to first, picking the first one whose
//! top boundary is at or above that position. The result is published through
//! a single-writer cell that any number of [`ActiveSection`] readers share.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use tracing::debug;

use crate::motion::timing::lerp;
use crate::{Error, Result};

/// Scroll range over which the navigation backdrop fades in
const BACKDROP_FADE_PX: f64 = 100.0;
const BACKDROP_MAX_OPACITY: f64 = 0.95;
const BACKDROP_MAX_BLUR: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub label: String,
    /// Top edge in document coordinates; `None` until measured
    pub boundary_top: Option<f64>,
}

impl Section {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            boundary_top: None,
        }
    }

    pub fn at(mut self, boundary_top: f64) -> Self {
        self.boundary_top = Some(boundary_top);
        self
    }
}

/// Read-only view of the highlighted section
#[derive(Debug, Clone)]
pub struct ActiveSection {
    index: Rc<Cell<usize>>,
    ids: Rc<[String]>,
}

impl ActiveSection {
    #[inline]
    pub fn index(&self) -> usize {
        self.index.get()
    }

    pub fn id(&self) -> &str {
        &self.ids[self.index.get()]
    }

    pub fn is(&self, id: &str) -> bool {
        self.id() == id
    }
}

/// Where a navigation action wants the page to scroll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationRequest {
    pub section: usize,
    pub target_y: f64,
}

/// Navigation bar background derived from the scroll offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavBackdrop {
    pub opacity: f64,
    pub blur: f64,
}

impl NavBackdrop {
    /// Transparent at the top of the page, frosted after the first 100px
    pub fn at(scroll_y: f64) -> Self {
        let t = if scroll_y.is_nan() {
            0.0
        } else {
            (scroll_y / BACKDROP_FADE_PX).clamp(0.0, 1.0)
        };
        Self {
            opacity: lerp(0.0, BACKDROP_MAX_OPACITY, t),
            blur: lerp(0.0, BACKDROP_MAX_BLUR, t),
        }
    }
}

#[derive(Debug)]
pub struct ScrollSpyNavigator {
    sections: Vec<Section>,
    offset: f64,
    cursor: Rc<Cell<usize>>,
    ids: Rc<[String]>,
    menu_open: bool,
}

impl ScrollSpyNavigator {
    /// Build a navigator over sections in document order
    pub fn new(sections: Vec<Section>, offset: f64) -> Result<Self> {
        if sections.is_empty() {
            return Err(Error::EmptyPage);
        }
        let mut seen = HashSet::new();
        for section in &sections {
            if !seen.insert(section.id.as_str()) {
                return Err(Error::DuplicateSection(section.id.clone()));
            }
        }
        let ids: Rc<[String]> = sections.iter().map(|s| s.id.clone()).collect();

        Ok(Self {
            sections,
            offset: if offset.is_finite() { offset } else { 0.0 },
            cursor: Rc::new(Cell::new(0)),
            ids,
            menu_open: false,
        })
    }

    /// A reader handle for the active section
    pub fn cursor(&self) -> ActiveSection {
        ActiveSection {
            index: self.cursor.clone(),
            ids: self.ids.clone(),
        }
    }

    pub fn active_index(&self) -> usize {
        self.cursor.get()
    }

    pub fn active_id(&self) -> &str {
        &self.sections[self.cursor.get()].id
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Update a section's measured top edge after a layout change
    pub fn set_boundary(&mut self, id: &str, boundary_top: Option<f64>) -> Result<()> {
        let index = self
            .index_of(id)
            .ok_or_else(|| Error::UnknownSection(id.to_string()))?;
        self.sections[index].boundary_top = boundary_top.filter(|top| top.is_finite());
        Ok(())
    }

    /// The section that a given scroll position selects, if any
    pub fn resolve(&self, scroll_position: f64) -> Option<usize> {
        self.sections
            .iter()
            .rposition(|s| matches!(s.boundary_top, Some(top) if top <= scroll_position))
    }

    /// Handle a scroll event. Returns the new index when the highlight moved.
    pub fn on_scroll(&mut self, scroll_y: f64) -> Option<usize> {
        if scroll_y.is_nan() {
            return None;
        }
        let index = self.resolve(scroll_y + self.offset)?;
        if index == self.cursor.get() {
            return None;
        }
        self.cursor.set(index);
        debug!(section = %self.sections[index].id, scroll_y, "Active section changed");
        Some(index)
    }

    /// Navigate to a section. The overlay menu is always closed afterwards,
    /// even when the section is unknown or not yet measured.
    pub fn scroll_to_section(&mut self, id: &str) -> Option<NavigationRequest> {
        self.menu_open = false;
        let section = self.index_of(id)?;
        let target_y = self.sections[section].boundary_top?;
        debug!(section = id, target_y, "Navigating to section");
        Some(NavigationRequest { section, target_y })
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn navigator() -> ScrollSpyNavigator {
        ScrollSpyNavigator::new(
            vec![
                Section::new("hero", "Home").at(0.0),
                Section::new("about", "About").at(800.0),
                Section::new("experience", "Experience").at(2000.0),
            ],
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_to_first_section() {
        let nav = navigator();
        assert_eq!(nav.active_id(), "hero");
        assert_eq!(nav.cursor().id(), "hero");
    }

    #[test]
    fn test_reference_positions() {
        let mut nav = navigator();
        nav.on_scroll(850.0);
        assert_eq!(nav.active_id(), "about");
        nav.on_scroll(100.0);
        assert_eq!(nav.active_id(), "hero");
        nav.on_scroll(2500.0);
        assert_eq!(nav.active_id(), "experience");
        assert_eq!(nav.on_scroll(-50.0), None);
        assert_eq!(nav.active_id(), "experience");
    }

    #[test]
    fn test_offset_is_added_to_scroll() {
        let mut nav = ScrollSpyNavigator::new(
            vec![Section::new("hero", "Home").at(0.0), Section::new("about", "About").at(800.0)],
            100.0,
        )
        .unwrap();
        nav.on_scroll(699.0);
        assert_eq!(nav.active_id(), "hero");
        nav.on_scroll(700.0);
        assert_eq!(nav.active_id(), "about");
    }

    #[test]
    fn test_boundary_equality_counts() {
        let mut nav = navigator();
        assert_eq!(nav.on_scroll(800.0), Some(1));
    }

    #[test]
    fn test_overlapping_boundaries_pick_lowest_section() {
        let mut nav = ScrollSpyNavigator::new(
            vec![
                Section::new("a", "A").at(0.0),
                Section::new("b", "B").at(500.0),
                Section::new("c", "C").at(500.0),
            ],
            0.0,
        )
        .unwrap();
        nav.on_scroll(500.0);
        assert_eq!(nav.active_id(), "c");
    }

    #[test]
    fn test_unmeasured_sections_are_skipped() {
        let mut nav = navigator();
        nav.set_boundary("about", None).unwrap();
        nav.on_scroll(900.0);
        assert_eq!(nav.active_id(), "hero");
    }

    #[test]
    fn test_readers_follow_writer() {
        let mut nav = navigator();
        let reader = nav.cursor();
        nav.on_scroll(2100.0);
        assert!(reader.is("experience"));
        assert_eq!(reader.index(), 2);
    }

    #[test]
    fn test_rejects_bad_configuration() {
        assert!(matches!(
            ScrollSpyNavigator::new(Vec::new(), 100.0),
            Err(Error::EmptyPage)
        ));
        let dup = vec![Section::new("a", "A"), Section::new("a", "Again")];
        assert!(matches!(
            ScrollSpyNavigator::new(dup, 100.0),
            Err(Error::DuplicateSection(id)) if id == "a"
        ));
        assert!(matches!(
            navigator().set_boundary("missing", Some(1.0)),
            Err(Error::UnknownSection(_))
        ));
    }

    #[test]
    fn test_navigation_always_closes_menu() {
        let mut nav = navigator();
        nav.toggle_menu();
        let request = nav.scroll_to_section("experience");
        assert_eq!(
            request,
            Some(NavigationRequest {
                section: 2,
                target_y: 2000.0
            })
        );
        assert!(!nav.is_menu_open());

        nav.toggle_menu();
        assert_eq!(nav.scroll_to_section("nowhere"), None);
        assert!(!nav.is_menu_open());

        assert_eq!(nav.scroll_to_section("hero").map(|r| r.target_y), Some(0.0));
        assert!(!nav.is_menu_open());
    }

    #[test]
    fn test_backdrop_fades_in_over_first_hundred_px() {
        assert_eq!(NavBackdrop::at(-20.0), NavBackdrop { opacity: 0.0, blur: 0.0 });
        let half = NavBackdrop::at(50.0);
        assert!((half.opacity - 0.475).abs() < 1e-9);
        assert!((half.blur - 5.0).abs() < 1e-9);
        assert_eq!(NavBackdrop::at(400.0).opacity, 0.95);
    }

    proptest! {
        #[test]
        fn prop_selects_greatest_boundary_not_past_position(
            mut tops in prop::collection::vec(0.0f64..10_000.0, 1..12),
            position in -500.0f64..12_000.0,
        ) {
            tops.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let sections = tops
                .iter()
                .enumerate()
                .map(|(i, top)| Section::new(format!("s{i}"), "S").at(*top))
                .collect();
            let mut nav = ScrollSpyNavigator::new(sections, 0.0).unwrap();
            let before = nav.active_index();
            nav.on_scroll(position);

            match tops.iter().rposition(|top| *top <= position) {
                Some(expected) => {
                    prop_assert!(tops[nav.active_index()] <= position);
                    prop_assert_eq!(nav.active_index(), expected);
                }
                None => prop_assert_eq!(nav.active_index(), before),
            }
        }
    }
}
