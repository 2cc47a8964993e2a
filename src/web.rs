//! Browser bindings.
//!
//! Exposes [`WorldMap`] to JavaScript. Connections and settings cross the
//! boundary as plain JS objects with the same field names as the Rust types.

use crate::animation::AnimationClock;
use crate::geo::{Connection, Endpoint};
use crate::map::WorldMap;
use crate::settings::MapSettings;
use wasm_bindgen::prelude::*;

fn settings_from_js(settings: JsValue) -> Result<MapSettings, JsValue> {
    if settings.is_undefined() || settings.is_null() {
        return Ok(MapSettings::default());
    }
    let settings: MapSettings = serde_wasm_bindgen::from_value(settings)?;
    settings
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(settings)
}

fn endpoint(is_end: bool) -> Endpoint {
    if is_end {
        Endpoint::End
    } else {
        Endpoint::Start
    }
}

/// A world map plus the clock its animation runs on.
#[wasm_bindgen]
pub struct WorldMapHandle {
    map: WorldMap,
    clock: AnimationClock,
}

#[wasm_bindgen]
impl WorldMapHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(connections: JsValue, settings: JsValue) -> Result<WorldMapHandle, JsValue> {
        let connections: Vec<Connection> = serde_wasm_bindgen::from_value(connections)?;
        let settings = settings_from_js(settings)?;
        log::debug!("WorldMapHandle: created with {} connections", connections.len());

        Ok(Self {
            map: WorldMap::new(connections, settings),
            clock: AnimationClock::new(),
        })
    }

    #[wasm_bindgen(js_name = setConnections)]
    pub fn set_connections(&mut self, connections: JsValue) -> Result<(), JsValue> {
        let connections: Vec<Connection> = serde_wasm_bindgen::from_value(connections)?;
        self.map.set_connections(connections);
        self.clock.restart();
        Ok(())
    }

    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&mut self, settings: JsValue) -> Result<(), JsValue> {
        self.map.set_settings(settings_from_js(settings)?);
        self.clock.restart();
        Ok(())
    }

    /// SVG `viewBox` shared by the overlay and the dotted background.
    #[wasm_bindgen(js_name = viewBox)]
    pub fn view_box(&self) -> String {
        self.map.settings().canvas.view_box()
    }

    pub fn projected(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.map.projected())?)
    }

    pub fn labels(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.map.labels())?)
    }

    /// SVG path data for every arc, in connection order.
    #[wasm_bindgen(js_name = pathData)]
    pub fn path_data(&self) -> Vec<String> {
        self.map.paths().iter().map(|p| p.to_svg_path()).collect()
    }

    pub fn schedule(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.map.schedule())?)
    }

    /// Animated state at an explicit time in seconds.
    #[wasm_bindgen(js_name = frameState)]
    pub fn frame_state(&self, time: f64) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.map.frame_state(time))?)
    }

    /// Animated state at the handle's own clock; call once per animation frame.
    pub fn tick(&self) -> Result<JsValue, JsValue> {
        self.frame_state(self.clock.elapsed_seconds())
    }

    #[wasm_bindgen(js_name = hoverText)]
    pub fn hover_text(&self, index: usize, is_end: bool) -> String {
        self.map.hover_text(index, endpoint(is_end))
    }
}
