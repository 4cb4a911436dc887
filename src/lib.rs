pub mod app;
pub mod model;

#[cfg(target_arch = "wasm32")]
use crate::model::config::AppConfig;
#[cfg(target_arch = "wasm32")]
use crate::model::world::World;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser host binding. The page drives [`Simulation::tick`] from its
/// animation-frame callback and draws from [`Simulation::snapshot_json`].
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct Simulation {
    world: World,
    paused: bool,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl Simulation {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Simulation {
        console_error_panic_hook::set_once();

        let mut config = AppConfig::default();
        config.world.seed = Some(seed);
        Simulation {
            world: World::new(config),
            paused: false,
        }
    }

    /// One step, unless paused.
    pub fn tick(&mut self) {
        if !self.paused {
            self.world.update();
        }
    }

    pub fn reset(&mut self) {
        self.world.reset();
    }

    pub fn jolt(&mut self) {
        self.world.jolt();
    }

    pub fn set_temperature(&mut self, t: f64) {
        self.world.set_temperature(t);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn get_stats(&self) -> js_sys::Object {
        let report = self.world.report();
        let obj = js_sys::Object::new();
        let fields: [(&str, JsValue); 8] = [
            ("step", JsValue::from_f64(report.step as f64)),
            ("phase", JsValue::from_str(report.phase.name())),
            ("temperature", JsValue::from_f64(report.temperature)),
            ("freeParticles", JsValue::from_f64(report.free_particles as f64)),
            ("totalClusters", JsValue::from_f64(report.total_clusters as f64)),
            ("phaseClusters", JsValue::from_f64(report.phase_clusters as f64)),
            ("totalSites", JsValue::from_f64(report.total_sites as f64)),
            ("complete", JsValue::from_bool(report.complete)),
        ];
        for (key, value) in fields {
            let _ = js_sys::Reflect::set(&obj, &JsValue::from_str(key), &value);
        }
        obj
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        crystallite_io::to_json(&self.world.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
