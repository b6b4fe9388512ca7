use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use crate::cards::TARGET_ATTRIBUTE;
use crate::config::{BrowserConfig, HeroAction};
use crate::dom::element_by_id;
use crate::error::BrowserError;
use crate::events::FilterBus;
use crate::feature_store::FeatureStore;
use crate::filter::FilterState;
use crate::navigation::open_target;
use crate::console_warn;

/// The page's search box, selectors and buttons.
pub struct Controls {
    document: Document,
    search: HtmlInputElement,
    selectors: Vec<(String, HtmlSelectElement)>,
    fit_button: Option<HtmlElement>,
    hero: Vec<(HeroAction, HtmlElement)>,
}

impl Controls {
    // Only the search box is required; other controls are skipped when the
    // page does not have them.
    pub fn bind(document: &Document, config: &BrowserConfig) -> Result<Self, BrowserError> {
        let search = element_by_id(document, &config.elements.search)?;

        let selectors = config
            .selectors
            .iter()
            .filter_map(|binding| match element_by_id::<HtmlSelectElement>(document, &binding.element) {
                Ok(select) => Some((binding.field.clone(), select)),
                Err(err) => {
                    console_warn!("Skipping {} selector: {}", binding.field, err);
                    None
                }
            })
            .collect();

        let fit_button = element_by_id(document, &config.elements.fit_button).ok();

        let hero = config
            .hero_actions
            .iter()
            .filter_map(|action| {
                element_by_id::<HtmlElement>(document, &action.button)
                    .ok()
                    .map(|button| (action.clone(), button))
            })
            .collect();

        Ok(Controls {
            document: document.clone(),
            search,
            selectors,
            fit_button,
            hero,
        })
    }

    pub fn read_state(&self) -> FilterState {
        self.selectors
            .iter()
            .fold(FilterState::new(&self.search.value()), |state, (field, select)| {
                state.with_selection(field, &select.value())
            })
    }

    /// Refills every selector with the values present in the store.
    pub fn populate_selectors(&self, store: &FeatureStore) {
        for (field, select) in &self.selectors {
            if let Err(err) = fill_select(select, store.facet(field)) {
                console_warn!("Could not populate {} selector: {}", field, err);
            }
        }
    }

    /// Every control publishes the current filter state on the bus. The fit
    /// button publishes and then calls `on_fit`.
    pub fn wire<F>(self: &Rc<Self>, bus: &Rc<FilterBus>, on_fit: F) -> Result<(), BrowserError>
    where
        F: Fn() + 'static,
    {
        listen(&self.search, "input", self.publisher(bus))?;
        for (_, select) in &self.selectors {
            listen(select, "change", self.publisher(bus))?;
        }

        if let Some(button) = &self.fit_button {
            let controls = Rc::clone(self);
            let bus = Rc::clone(bus);
            listen(button, "click", move |_| {
                bus.publish(&controls.read_state());
                on_fit();
            })?;
        }

        for (action, button) in &self.hero {
            let controls = Rc::clone(self);
            let bus = Rc::clone(bus);
            let action = action.clone();
            listen(button, "click", move |event: Event| {
                event.prevent_default();
                if let Some(preset) = &action.preset {
                    controls.search.set_value(preset);
                }
                bus.publish(&controls.read_state());
                controls.scroll_to(&action.section);
            })?;
        }
        Ok(())
    }

    fn publisher(self: &Rc<Self>, bus: &Rc<FilterBus>) -> impl FnMut(Event) + 'static {
        let controls = Rc::clone(self);
        let bus = Rc::clone(bus);
        move |_| {
            bus.publish(&controls.read_state());
        }
    }

    fn scroll_to(&self, section: &str) {
        let Some(target) = self.document.get_element_by_id(section) else {
            console_warn!("No section #{} to scroll to", section);
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        target.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

/// One click listener on the grid opens whichever card was clicked.
pub fn wire_card_clicks(grid: &HtmlElement) -> Result<(), BrowserError> {
    listen(grid, "click", |event: Event| {
        let Some(target) = card_target(&event) else {
            return;
        };
        if let Err(err) = open_target(&target) {
            console_warn!("Could not open {}: {}", target, err);
        }
    })
}

/// Target of the card containing the clicked element, if any.
pub fn card_target(event: &Event) -> Option<String> {
    let clicked = event.target()?.dyn_into::<Element>().ok()?;
    let card = clicked.closest(".card").ok()??;
    card.get_attribute(TARGET_ATTRIBUTE)
}

fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), BrowserError>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Controls live as long as the page
    closure.forget();
    Ok(())
}

// Keeps placeholder options (empty value) and the current choice if it is
// still offered.
pub fn fill_select(select: &HtmlSelectElement, values: &[String]) -> Result<(), BrowserError> {
    let previous = select.value();
    let options = select.options();
    for i in (0..options.length()).rev() {
        let is_placeholder = options
            .get_with_index(i)
            .and_then(|el| el.dyn_into::<HtmlOptionElement>().ok())
            .map(|option| option.value().is_empty())
            .unwrap_or(false);
        if !is_placeholder {
            select.remove_with_index(i as i32);
        }
    }
    for value in values {
        let option = HtmlOptionElement::new_with_text_and_value(value, value)?;
        select.add_with_html_option_element(&option)?;
    }
    if values.iter().any(|v| *v == previous) {
        select.set_value(&previous);
    }
    Ok(())
}
