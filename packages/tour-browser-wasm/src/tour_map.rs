use std::cell::RefCell;

use js_sys::{Array, Reflect};
use serde::Serialize;
use serde_json::{json, Value};
use tour_models::{
    bounds, escape_html, format_number, Bounds, Direction, TourFeature, TourProperties,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::cards::display_title;
use crate::config::{DirectionColors, MapConfig};
use crate::error::BrowserError;
use crate::feature_store::VisibleTour;
use crate::mapbox::{self, MapboxMap, Popup};
use crate::{console_log, console_warn};

pub const SOURCE_ID: &str = "tours";
pub const LINE_LAYER_ID: &str = "tours-lines";
pub const POINT_LAYER_ID: &str = "tours-points";
pub const DIRECTION_CLASS_PROPERTY: &str = "direction_class";

/// GeoJSON handed to the map source: one feature per visible tour with
/// geometry, its store index as `id` and a normalized direction class.
pub fn source_data(visible: &[VisibleTour<'_>]) -> Value {
    let features: Vec<Value> = visible
        .iter()
        .filter(|v| v.feature.geometry.is_some())
        .map(|v| {
            let mut feature = v.feature.to_geojson(Some(v.index));
            let class = Direction::from_properties(&v.feature.properties);
            feature["properties"][DIRECTION_CLASS_PROPERTY] = json!(class.as_str());
            feature
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

pub fn empty_source_data() -> Value {
    json!({ "type": "FeatureCollection", "features": [] })
}

// Unknown and missing directions fall through to the ascent color
pub fn color_expression(colors: &DirectionColors) -> Value {
    json!([
        "match",
        ["get", DIRECTION_CLASS_PROPERTY],
        Direction::Descent.as_str(),
        colors.descent,
        Direction::Traverse.as_str(),
        colors.traverse,
        colors.ascent
    ])
}

pub fn line_layer(config: &MapConfig) -> Value {
    json!({
        "id": LINE_LAYER_ID,
        "type": "line",
        "source": SOURCE_ID,
        "filter": ["match", ["geometry-type"], ["LineString", "MultiLineString"], true, false],
        "layout": { "line-join": "round", "line-cap": "round" },
        "paint": {
            "line-color": color_expression(&config.colors),
            "line-width": config.line_width,
        },
    })
}

pub fn point_layer(config: &MapConfig) -> Value {
    json!({
        "id": POINT_LAYER_ID,
        "type": "circle",
        "source": SOURCE_ID,
        "filter": ["match", ["geometry-type"], ["Point", "MultiPoint"], true, false],
        "paint": {
            "circle-color": color_expression(&config.colors),
            "circle-radius": config.point_radius,
            "circle-stroke-width": 1.5,
            "circle-stroke-color": "#ffffff",
        },
    })
}

pub fn hover_html(properties: &TourProperties) -> String {
    format!("<strong>{}</strong>", escape_html(&display_title(properties)))
}

/// Rich popup: title, region, vertical gain, distance and GPX link.
pub fn popup_html(properties: &TourProperties) -> String {
    let mut html = format!(
        "<div class=\"tour-popup\"><strong>{}</strong>",
        escape_html(&display_title(properties))
    );
    if let Some(region) = &properties.region {
        html.push_str(&format!("<br>{}", escape_html(region)));
    }
    let mut stats = Vec::new();
    if let Some(vert) = properties.vert_m {
        stats.push(format!("{} m vert", format_number(vert)));
    }
    if let Some(distance) = properties.distance_km {
        stats.push(format!("{} km", format_number(distance)));
    }
    if !stats.is_empty() {
        html.push_str(&format!("<br>{}", stats.join(" · ")));
    }
    if let Some(gpx) = &properties.gpx {
        html.push_str(&format!(
            "<br><a href=\"{}\" download>Download GPX</a>",
            escape_html(gpx)
        ));
    }
    html.push_str("</div>");
    html
}

pub fn fit_options(config: &MapConfig) -> Value {
    json!({
        "padding": config.fit_padding,
        "duration": config.fit_duration_ms,
        "maxZoom": config.fit_max_zoom,
    })
}

/// Layer ids passed to `map.on(event, layerIds, listener)`.
pub fn tour_layer_ids() -> Array {
    [LINE_LAYER_ID, POINT_LAYER_ID]
        .iter()
        .map(|id| JsValue::from_str(id))
        .collect()
}

fn to_js(value: &Value) -> Result<JsValue, BrowserError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

/// Store index of the first feature under the pointer, if any.
pub fn event_feature_index(event: &JsValue) -> Option<usize> {
    let features = Reflect::get(event, &JsValue::from_str("features")).ok()?;
    let first = features.dyn_into::<Array>().ok()?.get(0);
    if first.is_undefined() {
        return None;
    }
    let id = Reflect::get(&first, &JsValue::from_str("id")).ok()?.as_f64()?;
    (id >= 0.0 && id.fract() == 0.0).then(|| id as usize)
}

pub fn event_lng_lat(event: &JsValue) -> JsValue {
    Reflect::get(event, &JsValue::from_str("lngLat")).unwrap_or(JsValue::UNDEFINED)
}

// The styled map: one GeoJSON source and two layers that are created once;
// each render only swaps the source data.
pub struct TourMap {
    map: MapboxMap,
    config: MapConfig,
    pending: RefCell<Option<Value>>,
    hover: RefCell<Option<Popup>>,
}

impl TourMap {
    pub fn create(container_id: &str, config: &MapConfig) -> Result<Self, BrowserError> {
        if let Some(token) = &config.access_token {
            mapbox::set_access_token(token)?;
        }
        let options = json!({
            "container": container_id,
            "style": config.style,
            "center": config.center,
            "zoom": config.zoom,
        });
        let map = MapboxMap::new(&to_js(&options)?)?;
        Ok(TourMap {
            map,
            config: config.clone(),
            pending: RefCell::new(None),
            hover: RefCell::new(None),
        })
    }

    /// Adds the source and both layers. Called from the map's `load` event;
    /// data rendered before that point is applied here.
    pub fn install_layers(&self) -> Result<(), BrowserError> {
        let data = self.pending.borrow_mut().take().unwrap_or_else(empty_source_data);
        let source = json!({ "type": "geojson", "data": data });
        self.map.add_source(SOURCE_ID, &to_js(&source)?)?;
        self.map.add_layer(&to_js(&line_layer(&self.config))?)?;
        self.map.add_layer(&to_js(&point_layer(&self.config))?)?;
        console_log!("Tour map layers installed");
        Ok(())
    }

    /// Replaces whatever the map shows with `data`.
    pub fn render(&self, data: Value) -> Result<(), BrowserError> {
        match self.map.get_source(SOURCE_ID) {
            Some(source) => source.set_data(&to_js(&data)?)?,
            None => *self.pending.borrow_mut() = Some(data),
        }
        Ok(())
    }

    /// Animates the viewport to contain the features. Nothing happens for an
    /// empty or geometry-less set.
    pub fn fit<'a, I>(&self, features: I)
    where
        I: IntoIterator<Item = &'a TourFeature>,
    {
        let Some(b) = bounds(features) else {
            return;
        };
        if let Err(err) = self.fit_bounds(&b) {
            console_warn!("Could not fit map to tours: {}", err);
        }
    }

    fn fit_bounds(&self, b: &Bounds) -> Result<(), BrowserError> {
        let corners = to_js(&json!(b.corners()))?;
        let options = to_js(&fit_options(&self.config))?;
        self.map.fit_bounds(&corners, &options)?;
        Ok(())
    }

    pub fn show_hover(&self, lng_lat: &JsValue, properties: &TourProperties) {
        let mut hover = self.hover.borrow_mut();
        if hover.is_none() {
            let options = json!({ "closeButton": false, "closeOnClick": false, "offset": 10 });
            match to_js(&options).and_then(|o| Ok(Popup::new(&o)?)) {
                Ok(popup) => *hover = Some(popup),
                Err(err) => {
                    console_warn!("Could not create hover popup: {}", err);
                    return;
                }
            }
        }
        if let Some(popup) = hover.as_ref() {
            popup
                .set_lng_lat(lng_lat)
                .set_html(&hover_html(properties))
                .add_to(&self.map);
        }
    }

    pub fn hide_hover(&self) {
        if let Some(popup) = self.hover.borrow().as_ref() {
            popup.remove();
        }
    }

    pub fn show_details(&self, lng_lat: &JsValue, properties: &TourProperties) {
        let options = json!({ "offset": 12, "maxWidth": "280px" });
        match to_js(&options).and_then(|o| Ok(Popup::new(&o)?)) {
            Ok(popup) => {
                popup
                    .set_lng_lat(lng_lat)
                    .set_html(&popup_html(properties))
                    .add_to(&self.map);
            }
            Err(err) => console_warn!("Could not create tour popup: {}", err),
        }
    }

    pub fn set_cursor(&self, cursor: &str) {
        let canvas = self.map.get_canvas();
        if canvas.style().set_property("cursor", cursor).is_err() {
            console_warn!("Could not set map cursor");
        }
    }

    pub fn on_load<F>(&self, handler: F)
    where
        F: FnMut() + 'static,
    {
        let closure = Closure::<dyn FnMut()>::new(handler);
        self.map.on("load", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Registers `handler` once for `event` over both tour layers, so an
    /// event on overlapping features is delivered a single time.
    pub fn on_tour_event<F>(&self, event: &str, handler: F)
    where
        F: FnMut(JsValue) + 'static,
    {
        let closure = Closure::<dyn FnMut(JsValue)>::new(handler);
        self.map
            .on_layers(event, &tour_layer_ids(), closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
