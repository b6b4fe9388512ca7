// Bindings to the parts of Mapbox GL JS the tour map uses. The page loads
// `mapbox-gl.js`, which defines the global `mapboxgl` namespace.
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Map)]
    pub type MapboxMap;

    #[wasm_bindgen(catch, constructor, js_namespace = mapboxgl, js_class = "Map")]
    pub fn new(options: &JsValue) -> Result<MapboxMap, JsValue>;

    #[wasm_bindgen(method, catch, js_name = addSource)]
    pub fn add_source(this: &MapboxMap, id: &str, source: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getSource)]
    pub fn get_source(this: &MapboxMap, id: &str) -> Option<GeoJsonSource>;

    #[wasm_bindgen(method, catch, js_name = addLayer)]
    pub fn add_layer(this: &MapboxMap, layer: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method)]
    pub fn on(this: &MapboxMap, event: &str, listener: &js_sys::Function);

    // `map.on(event, layerIds, listener)`, one listener across several layers
    #[wasm_bindgen(method, js_name = on)]
    pub fn on_layers(
        this: &MapboxMap,
        event: &str,
        layer_ids: &js_sys::Array,
        listener: &js_sys::Function,
    );

    #[wasm_bindgen(method, catch, js_name = fitBounds)]
    pub fn fit_bounds(this: &MapboxMap, bounds: &JsValue, options: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getCanvas)]
    pub fn get_canvas(this: &MapboxMap) -> web_sys::HtmlElement;

    #[wasm_bindgen(js_namespace = mapboxgl, js_name = GeoJSONSource)]
    pub type GeoJsonSource;

    #[wasm_bindgen(method, catch, js_name = setData)]
    pub fn set_data(this: &GeoJsonSource, data: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Popup)]
    pub type Popup;

    #[wasm_bindgen(catch, constructor, js_namespace = mapboxgl, js_class = "Popup")]
    pub fn new(options: &JsValue) -> Result<Popup, JsValue>;

    #[wasm_bindgen(method, js_name = setLngLat)]
    pub fn set_lng_lat(this: &Popup, lng_lat: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setHTML)]
    pub fn set_html(this: &Popup, html: &str) -> Popup;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Popup, map: &MapboxMap) -> Popup;

    #[wasm_bindgen(method)]
    pub fn remove(this: &Popup) -> Popup;
}

/// Sets `mapboxgl.accessToken` before the first map is created.
pub fn set_access_token(token: &str) -> Result<(), JsValue> {
    let namespace = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))?;
    if namespace.is_undefined() {
        return Err(JsValue::from_str("mapboxgl is not loaded"));
    }
    js_sys::Reflect::set(&namespace, &JsValue::from_str("accessToken"), &JsValue::from_str(token))?;
    Ok(())
}
