use crate::{
    background::tasks::{Completion, CompletionQueue, Ticket},
    core::{
        config::TransitionStyle,
        geo::LatLng,
        mode::{DemoSpec, HandlerAction, HomeControl, Legend, Mode, ViewState},
        viewport::Camera,
    },
    data::geojson::Feature,
    input::{
        events::{Cursor, InteractionEvent},
        handler::HandlerRegistry,
    },
    traits::{MapControl, MapEngine, SourceSpec},
    ui::{
        controls::{ControlAction, NavButton, NavigationControl},
        page::{PageAction, PageControls, PageElement},
        popup::{Popup, PopupPresenter, PopupTemplate},
    },
    MapError, Result,
};
use serde_json::Value;

/// What became of an interaction, page action or completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    Handled,
    /// Resolved to zero features; nothing changed
    NotFound,
    /// Cluster expansion lookup failed; nothing changed
    LookupFailed,
    /// Completion issued before the latest mode transition; dropped
    Stale,
    /// Already in the requested state, or the affordance is not shown
    NoOp,
    /// No handler is registered for this kind and layer in the current mode
    Unbound,
    /// A lookup was issued and has not completed yet
    Pending,
}

/// Owns the view state of one demo and drives the engine between modes
pub struct ModeController<E: MapEngine> {
    engine: E,
    demo: DemoSpec,
    state: ViewState,
    handlers: HandlerRegistry<HandlerAction>,
    presenter: PopupPresenter,
    /// Interaction that opened the current click popup
    popup_trigger: Option<InteractionEvent>,
    hover_popup: bool,
    navigation: Option<NavigationControl>,
    page: PageControls,
    completions: CompletionQueue,
}

impl<E: MapEngine> ModeController<E> {
    /// Wires the demo to `engine`; fails if a required page element is missing.
    ///
    /// Nothing touches the map until the engine reports its load, see [`pump`](Self::pump).
    pub fn new(mut engine: E, demo: DemoSpec, page: PageControls) -> Result<Self> {
        page.require(&demo.page_elements)?;

        let mut completions = CompletionQueue::new();
        let sender = completions.sender();
        let ticket = completions.ticket();
        engine.on_load(Box::new(move || sender.send(Completion::Loaded { ticket })));

        let navigation = demo.navigation.map(NavigationControl::new);
        let mut controller = Self {
            engine,
            demo,
            state: ViewState::default(),
            handlers: HandlerRegistry::new(),
            presenter: PopupPresenter::new(),
            popup_trigger: None,
            hover_popup: false,
            navigation,
            page,
            completions,
        };
        controller.pump()?;
        Ok(controller)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn demo(&self) -> &DemoSpec {
        &self.demo
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn is_ready(&self) -> bool {
        self.state.ready
    }

    pub fn navigation(&self) -> Option<&NavigationControl> {
        self.navigation.as_ref()
    }

    pub fn page(&self) -> &PageControls {
        &self.page
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.presenter.current()
    }

    /// Legends of the active mode, empty while the legend toggle is off
    pub fn visible_legends(&self) -> &[Legend] {
        match self.demo.mode_spec(self.state.mode) {
            Some(spec) if self.state.legends_visible => &spec.legends,
            _ => &[],
        }
    }

    /// Applies every completion delivered so far
    pub fn pump(&mut self) -> Result<Vec<InteractionOutcome>> {
        Ok(self
            .pump_tickets()?
            .into_iter()
            .map(|(_, outcome)| outcome)
            .collect())
    }

    /// Like [`pump`](Self::pump), keeping each outcome's ticket
    fn pump_tickets(&mut self) -> Result<Vec<(Ticket, InteractionOutcome)>> {
        let (current, stale) = self.completions.drain();
        let mut outcomes = Vec::with_capacity(current.len() + stale.len());

        for completion in stale {
            #[cfg(feature = "debug")]
            log::warn!(
                "dropping completion from generation {} (now {})",
                completion.ticket().generation,
                self.completions.generation()
            );
            outcomes.push((completion.ticket(), InteractionOutcome::Stale));
        }

        let mut current = current.into_iter();
        while let Some(completion) = current.next() {
            let ticket = completion.ticket();
            let outcome = match completion {
                Completion::Loaded { .. } => {
                    if let Err(e) = self.on_map_loaded() {
                        self.completions.requeue(current);
                        return Err(e);
                    }
                    InteractionOutcome::Handled
                }
                Completion::ClusterExpansion { center, result, .. } => match result {
                    Ok(zoom) => {
                        self.engine.move_camera(
                            Camera::new(center, zoom),
                            self.demo.options.interaction.transition,
                        );
                        InteractionOutcome::Handled
                    }
                    Err(e) => {
                        #[cfg(feature = "debug")]
                        log::warn!("cluster expansion lookup failed: {}", e);
                        #[cfg(not(feature = "debug"))]
                        let _ = e;
                        InteractionOutcome::LookupFailed
                    }
                },
            };
            outcomes.push((ticket, outcome));
        }

        Ok(outcomes)
    }

    fn on_map_loaded(&mut self) -> Result<()> {
        if self.state.ready {
            return Ok(());
        }

        let overview = &self.demo.overview;
        let source = SourceSpec {
            data: overview.dataset.clone(),
            cluster: self.demo.options.clustering,
        };
        self.engine.add_source(&self.demo.source_id, source)?;
        for layer in &overview.layers {
            self.engine.add_layer(layer)?;
        }
        if let Some(camera) = overview.camera.resolve(&overview.dataset, None) {
            self.engine.move_camera(camera, TransitionStyle::Jump);
        }
        if let Some(navigation) = self.navigation.as_mut() {
            navigation.on_add(&mut self.engine);
        }

        self.register_handlers(Mode::Overview);
        self.sync_home(false);
        self.state.ready = true;

        #[cfg(feature = "debug")]
        log::info!(
            "{} demo loaded: {} features, layers {:?}",
            self.demo.name,
            self.demo.overview.dataset.len(),
            self.engine.layer_ids()
        );
        Ok(())
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.state.ready {
            Ok(())
        } else {
            Err(MapError::NotReady)
        }
    }

    /// Switches to the drill-down mode around the trigger's location
    pub fn enter_drill_down(&mut self, trigger: &InteractionEvent) -> Result<InteractionOutcome> {
        self.ensure_ready()?;
        if self.state.mode == Mode::DrillDown {
            return Ok(InteractionOutcome::NoOp);
        }
        if trigger.features.is_empty() {
            #[cfg(feature = "debug")]
            log::debug!("drill-down trigger on '{}' hit no feature", trigger.layer_id);
            return Ok(InteractionOutcome::NotFound);
        }

        self.apply_mode(Mode::Overview, Mode::DrillDown, Some(trigger.lng_lat))?;
        Ok(InteractionOutcome::Handled)
    }

    /// Restores the overview layers, data and framing
    pub fn return_to_overview(&mut self) -> Result<InteractionOutcome> {
        self.ensure_ready()?;
        if self.state.mode == Mode::Overview {
            return Ok(InteractionOutcome::NoOp);
        }

        self.apply_mode(Mode::DrillDown, Mode::Overview, None)?;
        Ok(InteractionOutcome::Handled)
    }

    /// Detaches `from` and attaches `to` in a fixed order
    fn apply_mode(&mut self, from: Mode, to: Mode, trigger: Option<LatLng>) -> Result<()> {
        let (Some(old), Some(new)) = (self.demo.mode_spec(from), self.demo.mode_spec(to)) else {
            return Err(MapError::Config(format!(
                "{} demo has no {} mode",
                self.demo.name, to
            )));
        };

        self.state.generation = self.completions.advance();
        self.presenter.dismiss(&mut self.engine);
        self.popup_trigger = None;
        self.hover_popup = false;

        for layer in &old.layers {
            self.engine.remove_layer(&layer.id)?;
        }
        self.engine
            .set_source_data(&self.demo.source_id, &new.dataset)?;
        for layer in &new.layers {
            self.engine.add_layer(layer)?;
        }
        if let Some(camera) = new.camera.resolve(&new.dataset, trigger) {
            self.engine
                .move_camera(camera, self.demo.options.interaction.transition);
        }
        let show_home = new.show_home;

        self.sync_home(show_home);
        self.deregister_handlers(from);
        self.register_handlers(to);
        self.state.mode = to;

        #[cfg(feature = "debug")]
        log::debug!(
            "{} -> {} (generation {})",
            from,
            to,
            self.state.generation
        );
        Ok(())
    }

    fn register_handlers(&mut self, mode: Mode) {
        let Some(spec) = self.demo.mode_spec(mode) else {
            return;
        };
        for binding in &spec.handlers {
            self.engine.on(binding.kind, &binding.layer_id);
            self.handlers
                .register(binding.kind, &binding.layer_id, binding.action.clone());
        }
    }

    fn deregister_handlers(&mut self, mode: Mode) {
        let Some(spec) = self.demo.mode_spec(mode) else {
            return;
        };
        for binding in &spec.handlers {
            self.engine.off(binding.kind, &binding.layer_id);
            self.handlers.deregister(binding.kind, &binding.layer_id);
        }
    }

    fn sync_home(&mut self, show: bool) {
        match self.demo.home {
            HomeControl::Navigation => {
                if let Some(navigation) = self.navigation.as_mut() {
                    if show {
                        navigation.show_home();
                    } else {
                        navigation.hide_home();
                    }
                    if navigation.is_attached() {
                        self.engine
                            .add_control(navigation.root(), navigation.config().position);
                    }
                }
            }
            HomeControl::BackButton => self.page.set_visible(PageElement::BackButton, show),
            HomeControl::None => {}
        }
    }

    /// Runs the handler bound to the event's kind and layer
    pub fn handle_event(&mut self, event: &InteractionEvent) -> Result<InteractionOutcome> {
        self.ensure_ready()?;
        let Some(action) = self.handlers.get(event.kind, &event.layer_id).cloned() else {
            return Ok(InteractionOutcome::Unbound);
        };

        match action {
            HandlerAction::PointerCursor => {
                self.engine.set_cursor(Cursor::Pointer);
                Ok(InteractionOutcome::Handled)
            }
            HandlerAction::ResetCursor => {
                self.engine.set_cursor(Cursor::Default);
                if self.hover_popup {
                    self.presenter.dismiss(&mut self.engine);
                    self.hover_popup = false;
                }
                Ok(InteractionOutcome::Handled)
            }
            HandlerAction::HoverPopup(template) => {
                self.engine.set_cursor(Cursor::Pointer);
                Ok(self.open_popup(&template, event, true))
            }
            HandlerAction::ClickPopup(template) => Ok(self.open_popup(&template, event, false)),
            HandlerAction::DrillDown => self.enter_drill_down(event),
            HandlerAction::ZoomToFeature { zoom } => {
                let Some(center) = event.features.first().and_then(Feature::anchor) else {
                    return Ok(InteractionOutcome::NotFound);
                };
                self.engine.move_camera(
                    Camera::new(center, zoom),
                    self.demo.options.interaction.transition,
                );
                Ok(InteractionOutcome::Handled)
            }
            HandlerAction::ExpandCluster => self.expand_cluster(event),
        }
    }

    fn open_popup(
        &mut self,
        template: &PopupTemplate,
        event: &InteractionEvent,
        hover: bool,
    ) -> InteractionOutcome {
        let Some(feature) = event.features.first() else {
            return InteractionOutcome::NotFound;
        };
        if self
            .presenter
            .present(&mut self.engine, template, feature, Some(event.lng_lat))
            .is_none()
        {
            return InteractionOutcome::NotFound;
        }

        self.hover_popup = hover;
        self.popup_trigger = (!hover).then(|| event.clone());
        InteractionOutcome::Handled
    }

    fn expand_cluster(&mut self, event: &InteractionEvent) -> Result<InteractionOutcome> {
        let Some(feature) = event.features.first() else {
            return Ok(InteractionOutcome::NotFound);
        };
        let (Some(cluster_id), Some(center)) = (
            feature.property("cluster_id").and_then(Value::as_u64),
            feature.anchor(),
        ) else {
            #[cfg(feature = "debug")]
            log::warn!("clicked feature on '{}' is not a cluster", event.layer_id);
            return Ok(InteractionOutcome::LookupFailed);
        };

        let ticket = self.completions.ticket();
        let sender = self.completions.sender();
        self.engine.cluster_expansion_zoom(
            &self.demo.source_id,
            cluster_id,
            Box::new(move |result| {
                sender.send(Completion::ClusterExpansion {
                    ticket,
                    center,
                    result,
                })
            }),
        );

        // Engines that answer inline have already delivered the result
        let outcome = self
            .pump_tickets()?
            .into_iter()
            .find(|(delivered, _)| *delivered == ticket)
            .map_or(InteractionOutcome::Pending, |(_, outcome)| outcome);
        Ok(outcome)
    }

    /// Close button of the open popup
    pub fn close_popup(&mut self) -> InteractionOutcome {
        if !self.presenter.is_open() {
            return InteractionOutcome::NoOp;
        }
        self.presenter.dismiss(&mut self.engine);
        self.popup_trigger = None;
        self.hover_popup = false;
        InteractionOutcome::Handled
    }

    /// Follows the link of the open click popup into drill-down
    pub fn activate_popup_link(&mut self) -> Result<InteractionOutcome> {
        self.ensure_ready()?;
        let has_link = self
            .presenter
            .current()
            .map_or(false, |popup| popup.link.is_some());
        match self.popup_trigger.clone() {
            Some(trigger) if has_link => self.enter_drill_down(&trigger),
            _ => Ok(InteractionOutcome::NoOp),
        }
    }

    /// Clicks a navigation button; home goes back to the overview
    pub fn press_nav(&mut self, button: NavButton) -> Result<InteractionOutcome> {
        self.ensure_ready()?;
        let Some(navigation) = self.navigation.as_mut() else {
            return Ok(InteractionOutcome::NoOp);
        };

        match navigation.press(button, &mut self.engine) {
            Some(ControlAction::Home) => self.return_to_overview(),
            Some(_) => Ok(InteractionOutcome::Handled),
            None => Ok(InteractionOutcome::NoOp),
        }
    }

    /// Applies a page widget click
    pub fn page_action(&mut self, action: PageAction) -> Result<InteractionOutcome> {
        self.ensure_ready()?;
        self.page.record(action)?;

        match action {
            PageAction::MaxBounds(true) => {
                self.engine.set_max_bounds(self.demo.options.max_bounds());
                self.state.max_bounds = true;
            }
            PageAction::MaxBounds(false) => {
                self.engine.set_max_bounds(None);
                let center = self.engine.camera().center;
                self.engine.move_camera(
                    Camera::new(center, self.demo.options.camera.zoom),
                    TransitionStyle::Jump,
                );
                self.state.max_bounds = false;
            }
            PageAction::Legends(visible) => self.state.legends_visible = visible,
            PageAction::Back => return self.return_to_overview(),
        }
        Ok(InteractionOutcome::Handled)
    }

    /// Removes everything the controller attached
    pub fn teardown(&mut self) -> Result<()> {
        if !self.state.ready {
            return Ok(());
        }

        self.presenter.dismiss(&mut self.engine);
        let mode = self.state.mode;
        self.deregister_handlers(mode);
        if let Some(spec) = self.demo.mode_spec(mode) {
            for layer in &spec.layers {
                self.engine.remove_layer(&layer.id)?;
            }
        }
        self.engine.remove_source(&self.demo.source_id)?;
        if let Some(navigation) = self.navigation.as_mut() {
            navigation.on_remove(&mut self.engine);
        }
        self.state.ready = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::geo::Point, data::geojson::FeatureCollection, demos::DemoKind,
        engine::headless::HeadlessEngine,
    };
    use std::path::PathBuf;

    fn clustering() -> ModeController<HeadlessEngine> {
        let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let demo = DemoKind::Clustering.build(&fixtures).unwrap();
        let engine = HeadlessEngine::new(demo.options.camera.to_camera(), Point::new(1024.0, 768.0));
        ModeController::new(engine, demo, PageControls::all()).unwrap()
    }

    #[test]
    fn test_failed_load_keeps_later_completions() {
        let mut controller = clustering();
        let source_id = controller.demo.source_id.clone();
        // Occupy the source id so the load fails
        controller
            .engine_mut()
            .add_source(&source_id, SourceSpec::geojson(FeatureCollection::default()))
            .unwrap();

        let sender = controller.completions.sender();
        let loaded = controller.completions.ticket();
        let expansion = controller.completions.ticket();
        sender.send(Completion::Loaded { ticket: loaded });
        sender.send(Completion::ClusterExpansion {
            ticket: expansion,
            center: LatLng::new(40.7, -74.0),
            result: Ok(8.0),
        });

        assert!(matches!(controller.pump(), Err(MapError::Source(_))));
        assert!(!controller.is_ready());
        assert_eq!(controller.completions.pending(), 1);

        assert_eq!(controller.pump().unwrap(), vec![InteractionOutcome::Handled]);
        assert_eq!(controller.engine().camera().zoom, 8.0);
    }

    #[test]
    fn test_pump_before_any_completion_is_empty() {
        let mut controller = clustering();
        assert!(controller.pump().unwrap().is_empty());
        assert!(!controller.is_ready());
    }
}
