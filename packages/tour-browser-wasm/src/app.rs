use std::cell::RefCell;
use std::rc::Rc;

use tour_models::TourProperties;
use wasm_bindgen::JsValue;

use crate::cards::CardGrid;
use crate::config::BrowserConfig;
use crate::controls::{wire_card_clicks, Controls};
use crate::dom;
use crate::error::BrowserError;
use crate::events::FilterBus;
use crate::feature_store::{fetch_feature_store, FeatureStore};
use crate::filter::FilterState;
use crate::navigation::{open_target, resolve_target};
use crate::pipeline;
use crate::tour_map::{event_feature_index, event_lng_lat, TourMap};
use crate::{console_error, console_log, console_warn};

pub const LOADING_STATUS: &str = "Loading tours…";
pub const LOAD_FAILED_STATUS: &str = "Could not load tours";

// Application state for one page. Built once at startup; the feature store
// is swapped as a whole when a fetch succeeds.
pub struct App {
    config: BrowserConfig,
    store: RefCell<Rc<FeatureStore>>,
    cards: CardGrid,
    map: TourMap,
    controls: Rc<Controls>,
    bus: Rc<FilterBus>,
}

impl App {
    pub fn mount(config: BrowserConfig) -> Result<Rc<Self>, BrowserError> {
        let document = dom::document()?;
        let cards = CardGrid::new(&document, &config.elements.grid, &config.elements.count)?;
        let controls = Rc::new(Controls::bind(&document, &config)?);
        let map = TourMap::create(&config.elements.map, &config.map)?;

        let app = Rc::new(App {
            config,
            store: RefCell::new(Rc::new(FeatureStore::default())),
            cards,
            map,
            controls,
            bus: Rc::new(FilterBus::new()),
        });

        // A single subscriber redraws both views
        let weak = Rc::downgrade(&app);
        app.bus.subscribe(move |state| {
            if let Some(app) = weak.upgrade() {
                app.redraw(state);
            }
        });

        let on_fit = {
            let app = Rc::clone(&app);
            move || app.fit_visible()
        };
        app.controls.wire(&app.bus, on_fit)?;
        wire_card_clicks(app.cards.grid())?;
        app.wire_map();

        Ok(app)
    }

    pub fn store(&self) -> Rc<FeatureStore> {
        Rc::clone(&self.store.borrow())
    }

    fn replace_store(&self, store: FeatureStore) {
        *self.store.borrow_mut() = Rc::new(store);
    }

    pub fn redraw(&self, state: &FilterState) {
        let store = self.store();
        let plan = pipeline::plan(&store, state, &self.config);
        if let Err(err) = self.cards.render(&plan.cards) {
            console_error!("Could not render tour cards: {}", err);
        }
        if let Err(err) = self.map.render(plan.map_data) {
            console_error!("Could not render tour map: {}", err);
        }
    }

    /// Publishes the current control state, redrawing both views.
    pub fn refresh(&self) {
        self.bus.publish(&self.controls.read_state());
    }

    pub fn fit_visible(&self) {
        let store = self.store();
        let visible = store.filter(&self.controls.read_state(), &self.config.text_fields);
        self.map.fit(visible.iter().map(|v| v.feature));
    }

    pub fn fit_all(&self) {
        let store = self.store();
        self.map.fit(store.features());
    }

    // Fetches the data file once. Failure only updates the status label.
    pub async fn load(self: Rc<Self>) {
        self.cards.set_status(LOADING_STATUS);
        let url = self.config.data_url.clone();
        match fetch_feature_store(&url, &self.config.selector_fields()).await {
            Ok(store) => {
                console_log!("Loaded {} tours from {}", store.len(), url);
                self.replace_store(store);
                self.controls.populate_selectors(&self.store());
                self.refresh();
                self.fit_all();
            }
            Err(err) => {
                console_error!("Failed to load tours from {}: {}", url, err);
                self.cards.set_status(LOAD_FAILED_STATUS);
            }
        }
    }

    fn properties_for(&self, event: &JsValue) -> Option<TourProperties> {
        let index = event_feature_index(event)?;
        self.store().get(index).map(|f| f.properties.clone())
    }

    fn wire_map(self: &Rc<Self>) {
        let app = Rc::clone(self);
        self.map.on_load(move || {
            if let Err(err) = app.map.install_layers() {
                console_error!("Could not add tour layers: {}", err);
                return;
            }
            app.fit_all();
        });

        let app = Rc::clone(self);
        self.map.on_tour_event("mouseenter", move |_| app.map.set_cursor("pointer"));

        let app = Rc::clone(self);
        self.map.on_tour_event("mousemove", move |event| {
            if let Some(properties) = app.properties_for(&event) {
                app.map.show_hover(&event_lng_lat(&event), &properties);
            }
        });

        let app = Rc::clone(self);
        self.map.on_tour_event("mouseleave", move |_| {
            app.map.set_cursor("");
            app.map.hide_hover();
        });

        let app = Rc::clone(self);
        self.map.on_tour_event("click", move |event| {
            let Some(properties) = app.properties_for(&event) else {
                return;
            };
            app.map.show_details(&event_lng_lat(&event), &properties);
            if let Some(url) = resolve_target(&properties, &app.config.detail_page_prefix) {
                if let Err(err) = open_target(&url) {
                    console_warn!("Could not open {}: {}", url, err);
                }
            }
        });
    }
}
