#![allow(dead_code)]

use mapmode::{
    demos::DemoKind,
    prelude::*,
};
use std::path::PathBuf;

pub fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

pub fn engine_for(demo: &mapmode::core::mode::DemoSpec) -> HeadlessEngine {
    HeadlessEngine::new(demo.options.camera.to_camera(), Point::new(1024.0, 768.0))
}

/// A demo controller whose engine has finished loading
pub fn start(kind: DemoKind) -> ModeController<HeadlessEngine> {
    let demo = kind.build(&fixtures()).unwrap();
    start_with(demo)
}

pub fn start_with(demo: mapmode::core::mode::DemoSpec) -> ModeController<HeadlessEngine> {
    let engine = engine_for(&demo);
    let mut controller = ModeController::new(engine, demo, PageControls::all()).unwrap();
    controller.engine_mut().finish_loading();
    controller.pump().unwrap();
    assert!(controller.is_ready());
    controller
}

pub fn assert_close(a: LatLng, b: LatLng) {
    assert!(
        (a.lat - b.lat).abs() < 1e-6 && (a.lng - b.lng).abs() < 1e-6,
        "{:?} != {:?}",
        a,
        b
    );
}
