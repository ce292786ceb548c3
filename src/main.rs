//! Meadow Gallery entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HashChangeEvent, KeyboardEvent, PointerEvent};

    use meadow_gallery::audio::AudioManager;
    use meadow_gallery::config::{GalleryConfig, ItemId};
    use meadow_gallery::scene::{FrameInput, Scene, SceneEvent};

    /// App instance holding all state
    struct App {
        scene: Scene,
        audio: AudioManager,
        input: FrameInput,
        /// rAF timestamp of the first frame (ms)
        start_time: f64,
        last_time: f64,
        /// Simulated seconds, shared by every entry point this frame
        now: f64,
        events: Vec<SceneEvent>,
        /// Set on the frame the scream fades to silence
        scream_finished: bool,
    }

    impl App {
        fn new(seed: u64) -> Self {
            Self {
                scene: Scene::new(GalleryConfig::sample(), seed),
                audio: AudioManager::new(),
                input: FrameInput::default(),
                start_time: 0.0,
                last_time: 0.0,
                now: 0.0,
                events: Vec::new(),
                scream_finished: false,
            }
        }

        fn set_viewport(&mut self, w: f32, h: f32) {
            self.input.viewport = Vec2::new(w, h);
        }

        fn set_pointer(&mut self, x: f32, y: f32) {
            self.input.pointer_px = Vec2::new(x, y);
            let vp = self.input.viewport;
            if vp.x > 0.0 && vp.y > 0.0 {
                self.input.pointer_ndc = Vec2::new(
                    x / vp.x * 2.0 - 1.0,
                    -(y / vp.y * 2.0 - 1.0),
                );
            }
        }

        /// Advance the scene one frame and present its events
        fn update(&mut self, time: f64) {
            if self.start_time == 0.0 {
                self.start_time = time;
                self.last_time = time;
            }
            let elapsed = (time - self.start_time) / 1000.0;
            let dt = ((time - self.last_time) / 1000.0).min(0.1) as f32;
            self.last_time = time;
            self.now = elapsed;

            let input = self.input;
            self.scene.advance(elapsed, dt, &input, &mut self.events);
            self.scream_finished = self.audio.advance(dt as f64);
        }
    }

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    /// Apply everything the scene reported this frame to the DOM and audio
    fn present_events(app: &mut App) {
        let doc = document();
        let events = std::mem::take(&mut app.events);
        for ev in events {
            match ev {
                SceneEvent::SelectionChanged(id) => {
                    update_info_panel(&doc, id);
                    sync_hash(app, id);
                }
                SceneEvent::Startle => {
                    app.audio.play_scream();
                    show_scare_overlay(&doc);
                }
                SceneEvent::RevealText(id) => {
                    set_class(&doc, &format!("panel-{}", id.0), "info-panel visible");
                }
                SceneEvent::RevealVideo(_, url) => show_video_overlay(&doc, &url),
                SceneEvent::StormSpawned(a) => {
                    spawn_popup_element(&doc, app, a.id, a.x, a.y, a.image);
                    app.audio.play_popup();
                }
                SceneEvent::StormCleared => clear_popup_elements(&doc),
                SceneEvent::MinerArmed => {
                    show_miner_window(&doc);
                    app.audio.play_popup();
                }
                SceneEvent::MinerDodged { x, y } => move_miner_window(&doc, x, y),
                SceneEvent::MinerDismissed => hide_miner_window(&doc),
            }
        }

        // The scare overlay drops on its own once the scream has faded out;
        // clicking it is only a shortcut
        if app.scream_finished {
            app.scream_finished = false;
            set_class(&doc, "scare-overlay", "scare hidden");
        }

        // Progress bar tracks the miner every frame while visible
        if app.scene.miner.visible() {
            if let Some(el) = doc.get_element_by_id("miner-progress") {
                let pct = app.scene.miner.progress();
                let _ = el
                    .unchecked_ref::<web_sys::HtmlElement>()
                    .style()
                    .set_property("width", &format!("{pct}%"));
            }
        }
    }

    fn set_class(doc: &Document, id: &str, class: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }

    fn update_info_panel(doc: &Document, id: Option<ItemId>) {
        // Reveal happens later; selection change only hides the old panel
        if let Some(el) = doc.query_selector(".info-panel.visible").ok().flatten() {
            let _ = el.set_attribute("class", "info-panel");
        }
        if id.is_none() {
            hide_video_overlay(doc);
        }
    }

    /// Selection drives the URL, not the other way round (hashchange is the
    /// only route input)
    fn sync_hash(app: &App, id: Option<ItemId>) {
        let Some(window) = web_sys::window() else { return };
        let hash = match id.and_then(|id| app.scene.config().get(id)) {
            Some(item) => format!("#/item/{}", item.slug),
            None => String::new(),
        };
        let _ = window.location().set_hash(&hash);
    }

    fn show_scare_overlay(doc: &Document) {
        set_class(doc, "scare-overlay", "scare visible");
    }

    fn show_video_overlay(doc: &Document, url: &str) {
        if let Some(el) = doc.get_element_by_id("video-overlay") {
            el.set_inner_html(&format!(
                "<video src=\"{url}\" autoplay loop controls></video>"
            ));
            let _ = el.set_attribute("class", "video visible");
        }
    }

    fn hide_video_overlay(doc: &Document) {
        if let Some(el) = doc.get_element_by_id("video-overlay") {
            el.set_inner_html("");
            let _ = el.set_attribute("class", "video hidden");
        }
    }

    fn spawn_popup_element(doc: &Document, app: &App, id: u32, x: f32, y: f32, image: u32) {
        let Some(layer) = doc.get_element_by_id("popup-layer") else {
            return;
        };
        let Ok(el) = doc.create_element("div") else {
            return;
        };
        let _ = el.set_attribute("class", "storm-popup");
        let _ = el.set_attribute("data-popup-id", &id.to_string());

        let src = app
            .scene
            .config()
            .popup_images
            .get(image as usize)
            .map(String::as_str)
            .unwrap_or("assets/popups/default.png");
        el.set_inner_html(&format!("<img src=\"{src}\" alt=\"\">"));

        let style = el.unchecked_ref::<web_sys::HtmlElement>().style();
        let _ = style.set_property("left", &format!("{x}%"));
        let _ = style.set_property("top", &format!("{y}%"));
        let _ = layer.append_child(&el);
    }

    fn clear_popup_elements(doc: &Document) {
        // One DOM write so every popup vanishes in the same paint
        if let Some(layer) = doc.get_element_by_id("popup-layer") {
            layer.set_inner_html("");
        }
    }

    fn show_miner_window(doc: &Document) {
        if let Some(el) = doc.get_element_by_id("miner-window") {
            let _ = el.set_attribute("class", "miner visible");
        }
        move_miner_window(doc, 50.0, 40.0);
    }

    fn move_miner_window(doc: &Document, x: f32, y: f32) {
        if let Some(el) = doc.get_element_by_id("miner-window") {
            let style = el.unchecked_ref::<web_sys::HtmlElement>().style();
            let _ = style.set_property("left", &format!("{x}%"));
            let _ = style.set_property("top", &format!("{y}%"));
        }
    }

    fn hide_miner_window(doc: &Document) {
        set_class(doc, "miner-window", "miner hidden");
    }

    /// Read the current route: `#/item/<slug>` selects, anything else clears
    fn slug_from_hash() -> Option<String> {
        let hash = web_sys::window()?.location().hash().ok()?;
        hash.strip_prefix("#/item/").map(str::to_owned)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Meadow Gallery starting...");

        let window = web_sys::window().expect("no window");
        let doc = window.document().expect("no document");

        if let Some(loading) = doc.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed)));
        app.borrow_mut().set_viewport(
            window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32,
            window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32,
        );

        log::info!("Scene initialized with seed: {}", seed);

        // Deep link: apply the route the page loaded with
        if let Some(slug) = slug_from_hash() {
            let mut a = app.borrow_mut();
            let now = a.now;
            let mut events = Vec::new();
            a.scene.select_slug(Some(&slug), now, &mut events);
            a.events.extend(events);
        }

        setup_input_handlers(app.clone());
        request_animation_frame(app);

        log::info!("Meadow Gallery running!");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let doc = window.document().unwrap();

        // Pointer move: camera parallax + miner dodging
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut a = app.borrow_mut();
                a.set_pointer(event.client_x() as f32, event.client_y() as f32);
                let input = a.input;
                let now = a.now;
                let mut events = std::mem::take(&mut a.events);
                a.scene.pointer_move(&input, now, &mut events);
                a.events = events;
            });
            let _ = window
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Background music may only start from a user-activation gesture;
        // pointer moves don't count, presses do
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                app.borrow_mut().audio.unlock();
            });
            let _ = window
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Hovered frames swell slightly; delegation on elements carrying
        // data-item-slug, anything else clears the hover
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let slug = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest("[data-item-slug]").ok().flatten())
                    .and_then(|el| el.get_attribute("data-item-slug"));
                let mut a = app.borrow_mut();
                let id = slug.as_deref().and_then(|s| a.scene.config().find_by_slug(s));
                a.scene.set_hover(id);
            });
            let _ = doc
                .add_event_listener_with_callback("pointerover", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Route changes select items
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: HashChangeEvent| {
                let slug = slug_from_hash();
                let mut a = app.borrow_mut();
                // Skip if the hash already matches the active selection; the
                // sync after a click fires hashchange too
                let active_slug = a
                    .scene
                    .selection
                    .active()
                    .and_then(|id| a.scene.config().get(id))
                    .map(|item| item.slug.clone());
                if slug == active_slug {
                    return;
                }
                let now = a.now;
                let mut events = std::mem::take(&mut a.events);
                a.scene.select_slug(slug.as_deref(), now, &mut events);
                a.events = events;
            });
            let _ = window
                .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keys: Escape closes the video overlay (deselects), M toggles mute
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                a.audio.unlock();
                match event.key().as_str() {
                    "Escape" => {
                        let now = a.now;
                        let mut events = std::mem::take(&mut a.events);
                        a.scene.select(None, now, &mut events);
                        a.events = events;
                    }
                    "m" | "M" => {
                        let muted = !a.audio.muted();
                        a.audio.set_muted(muted);
                        log::info!("audio muted: {muted}");
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Clicking the scare overlay skips ahead of the automatic fade-out
        if let Some(overlay) = doc.get_element_by_id("scare-overlay") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                set_class(&document(), "scare-overlay", "scare hidden");
            });
            let _ =
                overlay.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Miner close button; the scene decides whether it works
        if let Some(btn) = doc.get_element_by_id("miner-close") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                let now = a.now;
                let mut events = std::mem::take(&mut a.events);
                if !a.scene.dismiss_miner(now, &mut events) {
                    log::info!("nice try");
                }
                a.events = events;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Frame clicks select items: elements carry data-item-slug
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                let Some(target) = event.target() else { return };
                let Some(el) = target.dyn_ref::<Element>() else {
                    return;
                };
                let slug = el
                    .closest("[data-item-slug]")
                    .ok()
                    .flatten()
                    .and_then(|e| e.get_attribute("data-item-slug"));
                let mut a = app.borrow_mut();
                let now = a.now;
                let mut events = std::mem::take(&mut a.events);
                match slug {
                    Some(slug) => a.scene.select_slug(Some(&slug), now, &mut events),
                    // Pointer miss deselects
                    None => a.scene.select(None, now, &mut events),
                }
                a.events = events;
            });
            let _ = doc.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Viewport resize keeps pointer math honest
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let window = web_sys::window().unwrap();
                let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                app.borrow_mut().set_viewport(w as f32, h as f32);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.update(time);
            present_events(&mut a);
        }
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use meadow_gallery::config::{GalleryConfig, ItemId};
    use meadow_gallery::scene::{FrameInput, Scene, SceneEvent};

    env_logger::init();
    log::info!("Meadow Gallery (native) starting...");
    log::info!("Headless demo - run with `trunk serve` for the web version");

    let mut scene = Scene::new(GalleryConfig::sample(), 42);
    log::info!("meadow holds {} animated entities", scene.scenery.entity_count());
    let mut events = Vec::new();
    let input = FrameInput {
        pointer_ndc: Vec2::new(0.2, -0.1),
        pointer_px: Vec2::new(1150.0, 590.0),
        viewport: Vec2::new(1920.0, 1080.0),
    };

    // Scripted walkthrough: two selections, then sit through the storm
    let dt = 1.0 / 60.0;
    let mut elapsed = 0.0f64;
    let mut spawned = 0u32;

    scene.select(Some(ItemId(0)), elapsed, &mut events);
    while elapsed < 45.0 {
        if (elapsed - 3.0).abs() < dt / 2.0 {
            scene.select(Some(ItemId(1)), elapsed, &mut events);
        }
        scene.advance(elapsed, dt as f32, &input, &mut events);
        for ev in events.drain(..) {
            match ev {
                SceneEvent::StormSpawned(_) => spawned += 1,
                SceneEvent::StormCleared => {
                    log::info!("storm cleared after {spawned} popups at t={elapsed:.1}s");
                }
                other => log::info!("t={elapsed:.1}s {other:?}"),
            }
        }
        elapsed += dt;
    }

    let pose = scene.camera_pose();
    log::info!("final camera position: {:?}", pose.position);
}
