//! Headless replay of scripted interactions

use anyhow::{Context, Result};
use mapmode::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One scripted user action; positions are geographic
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Click { lat: f64, lng: f64 },
    Hover { lat: f64, lng: f64 },
    Page { action: PageAction },
    Nav { button: NavButton },
    FollowLink,
    /// Delivers callbacks a deferring engine has held back
    Flush,
}

/// What the map looked like after a step
#[derive(Debug, Serialize)]
pub struct Report {
    pub step: usize,
    pub outcomes: Vec<String>,
    pub mode: String,
    pub generation: u64,
    pub center: [f64; 2],
    pub zoom: f64,
    pub layers: Vec<String>,
    pub popup: Option<String>,
}

pub fn load(path: &Path) -> Result<Vec<Step>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing script {}", path.display()))
}

pub fn replay(demo: DemoSpec, steps: &[Step]) -> Result<Vec<Report>> {
    let engine = HeadlessEngine::new(demo.options.camera.to_camera(), Point::new(1024.0, 768.0))
        .with_hit_radius(demo.options.interaction.hit_radius);
    let mut controller = ModeController::new(engine, demo, PageControls::all())?;
    controller.engine_mut().finish_loading();
    controller.pump()?;

    let mut reports = Vec::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        let outcomes = apply(&mut controller, step)
            .with_context(|| format!("step {} ({:?})", i, step))?;
        reports.push(report(&controller, i, outcomes));
    }
    Ok(reports)
}

fn apply(controller: &mut ModeController<HeadlessEngine>, step: &Step) -> Result<Vec<InteractionOutcome>> {
    let outcomes = match *step {
        Step::Click { lat, lng } => {
            let point = controller.engine().pixel_of(&LatLng::new(lat, lng));
            let events = controller.engine().click(point);
            events
                .iter()
                .map(|event| controller.handle_event(event))
                .collect::<mapmode::Result<Vec<_>>>()?
        }
        Step::Hover { lat, lng } => {
            let point = controller.engine().pixel_of(&LatLng::new(lat, lng));
            let events = controller.engine_mut().pointer_move(point);
            events
                .iter()
                .map(|event| controller.handle_event(event))
                .collect::<mapmode::Result<Vec<_>>>()?
        }
        Step::Page { action } => vec![controller.page_action(action)?],
        Step::Nav { button } => vec![controller.press_nav(button)?],
        Step::FollowLink => vec![controller.activate_popup_link()?],
        Step::Flush => {
            controller.engine_mut().flush_callbacks();
            controller.pump()?
        }
    };
    Ok(outcomes)
}

fn report(controller: &ModeController<HeadlessEngine>, step: usize, outcomes: Vec<InteractionOutcome>) -> Report {
    let camera = controller.engine().camera();
    Report {
        step,
        outcomes: outcomes.iter().map(|o| format!("{:?}", o)).collect(),
        mode: controller.mode().to_string(),
        generation: controller.state().generation,
        center: camera.center.to_lng_lat(),
        zoom: camera.zoom,
        layers: controller.engine().layer_ids(),
        popup: controller.popup().map(|p| p.text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapmode::demos::DemoKind;
    use std::path::PathBuf;

    fn fixtures() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../fixtures")
    }

    #[test]
    fn test_parse_steps() {
        let steps: Vec<Step> = serde_json::from_str(
            r#"[
                { "step": "click", "lat": 36.7, "lng": -119.4 },
                { "step": "page", "action": { "legends": true } },
                { "step": "nav", "button": "home" },
                { "step": "follow_link" }
            ]"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 4);
        assert!(matches!(steps[1], Step::Page { action: PageAction::Legends(true) }));
        assert!(matches!(steps[2], Step::Nav { button: NavButton::Home }));
    }

    #[test]
    fn test_replay_polygon_round_trip() {
        let demo = DemoKind::Polygon.build(&fixtures()).unwrap();
        let steps = vec![
            Step::Click { lat: 36.7, lng: -119.4 },
            Step::Page { action: PageAction::Back },
        ];
        let reports = replay(demo, &steps).unwrap();

        assert_eq!(reports[0].outcomes, vec!["Handled"]);
        assert_eq!(reports[0].mode, "drill-down");
        assert_eq!(reports[0].zoom, 6.0);
        assert_eq!(reports[1].mode, "overview");
        assert_eq!(reports[1].generation, 2);
        assert_eq!(reports[1].layers, vec!["us-states-layer"]);
    }
}
