//! WASM bridge for Jumpstart Canvas: exposes the layered canvas to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. JavaScript owns a
//! `JumpstartCanvas`; the frame loop, resize and pointer listeners hold only
//! weak references to it.
//!
//! JS callbacks live in their own slots rather than inside the core canvas,
//! so they can be swapped (and `start`/`stop` called) from inside a running
//! callback without a re-entrant borrow.

mod host;

pub use host::{CanvasSurface, FrameLoop, WebHost};

use js_sys::{Array, Function, Reflect};
use jumpstart_core::{
    CanvasConfig, InitOutcome, LayeredCanvas, LoopControl, Point, PointerKind,
};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::MouseEvent;

type SharedCanvas = Rc<RefCell<LayeredCanvas<WebHost>>>;

// ─── JS callback slots ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Setup,
    Update,
    Draw,
    Resize,
    MouseDown,
    MouseUp,
    MouseMove,
}

impl Slot {
    const ALL: [Slot; 7] = [
        Slot::Setup,
        Slot::Update,
        Slot::Draw,
        Slot::Resize,
        Slot::MouseDown,
        Slot::MouseUp,
        Slot::MouseMove,
    ];

    /// Key of the slot in the constructor's option object.
    fn option_key(self) -> &'static str {
        match self {
            Slot::Setup => "setup",
            Slot::Update => "update",
            Slot::Draw => "draw",
            Slot::Resize => "resize",
            Slot::MouseDown => "mouseDown",
            Slot::MouseUp => "mouseUp",
            Slot::MouseMove => "mouseMove",
        }
    }

    fn for_pointer(kind: PointerKind) -> Self {
        match kind {
            PointerKind::Down => Slot::MouseDown,
            PointerKind::Up => Slot::MouseUp,
            PointerKind::Move => Slot::MouseMove,
        }
    }
}

/// One optional JS function per [`Slot`], indexed by the slot's position in
/// [`Slot::ALL`].
#[derive(Default)]
struct JsHandlers {
    slots: [Option<Function>; Slot::ALL.len()],
}

impl JsHandlers {
    fn slot(&self, slot: Slot) -> &Option<Function> {
        &self.slots[slot as usize]
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Function> {
        &mut self.slots[slot as usize]
    }

    fn get(&self, slot: Slot) -> Option<Function> {
        self.slot(slot).clone()
    }

    /// Pick callback functions out of a constructor option object.
    fn from_options(options: &JsValue) -> Self {
        let mut handlers = Self::default();
        if !options.is_object() {
            return handlers;
        }
        for slot in Slot::ALL {
            if let Ok(value) = Reflect::get(options, &JsValue::from_str(slot.option_key()))
                && let Ok(f) = value.dyn_into::<Function>()
            {
                *handlers.slot_mut(slot) = Some(f);
            }
        }
        handlers
    }
}

type SharedHandlers = Rc<RefCell<JsHandlers>>;

/// Invoke a JS callback if one is registered. Exceptions are logged, not
/// propagated.
fn call(handlers: &SharedHandlers, slot: Slot, args: &[JsValue]) {
    let Some(f) = handlers.borrow().get(slot) else {
        return;
    };
    let args: Array = args.iter().collect();
    if let Err(e) = f.apply(&JsValue::NULL, &args) {
        log::warn!("{} callback threw: {e:?}", slot.option_key());
    }
}

/// Point every core callback at its JS slot.
fn forward_callbacks(canvas: &mut LayeredCanvas<WebHost>, handlers: &SharedHandlers) {
    let js = Rc::clone(handlers);
    canvas.on_setup(move |width, height| call(&js, Slot::Setup, &[width.into(), height.into()]));

    let js = Rc::clone(handlers);
    canvas.on_update(move |width, height, delta| {
        call(&js, Slot::Update, &[width.into(), height.into(), delta.into()]);
    });

    let js = Rc::clone(handlers);
    canvas.on_draw(move |width, height, delta, fore, mid, bg| {
        call(
            &js,
            Slot::Draw,
            &[
                width.into(),
                height.into(),
                delta.into(),
                JsValue::from(fore.clone()),
                JsValue::from(mid.clone()),
                JsValue::from(bg.clone()),
            ],
        );
    });

    let js = Rc::clone(handlers);
    canvas.on_resize(move || call(&js, Slot::Resize, &[]));

    for kind in PointerKind::ALL {
        let js = Rc::clone(handlers);
        let slot = Slot::for_pointer(kind);
        canvas.on_pointer(kind, move |pos| call(&js, slot, &[pos.x.into(), pos.y.into()]));
    }
}

/// Run `f` against the canvas if it is still alive and not already borrowed.
fn with_canvas(
    weak: &Weak<RefCell<LayeredCanvas<WebHost>>>,
    f: impl FnOnce(&mut LayeredCanvas<WebHost>),
) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    match inner.try_borrow_mut() {
        Ok(mut canvas) => f(&mut canvas),
        Err(_) => log::warn!("canvas busy; event dropped"),
    };
}

/// Scalar options from the constructor's option object. Function-valued
/// keys vanish in `JSON.stringify`, leaving only the scalars.
fn read_config(options: &JsValue) -> CanvasConfig {
    if options.is_undefined() || options.is_null() {
        return CanvasConfig::default();
    }
    let json = match js_sys::JSON::stringify(options) {
        Ok(s) => String::from(s),
        Err(e) => {
            log::warn!("canvas options not serializable: {e:?}; using defaults");
            return CanvasConfig::default();
        }
    };
    CanvasConfig::from_json(&json).unwrap_or_else(|e| {
        log::warn!("{e}; using defaults");
        CanvasConfig::default()
    })
}

fn config_to_json(config: &CanvasConfig) -> String {
    serde_json::to_string(config).unwrap_or_else(|e| {
        log::warn!("failed to serialize canvas config: {e}");
        "{}".to_string()
    })
}

// ─── JS-facing wrapper ──────────────────────────────────────────────────

/// Three stacked `<canvas>` layers inside a host element, plus a
/// `requestAnimationFrame` update/draw loop.
#[wasm_bindgen]
pub struct JumpstartCanvas {
    inner: SharedCanvas,
    control: LoopControl<FrameLoop>,
    /// Copy of the canvas config, readable while the canvas is borrowed.
    config: Cell<CanvasConfig>,
    handlers: SharedHandlers,
    listening: Cell<bool>,
}

#[wasm_bindgen]
impl JumpstartCanvas {
    /// `new JumpstartCanvas(id, { setup, update, draw, resize, mouseDown,
    /// mouseUp, mouseMove, active, framerateTarget, deltaCap })`.
    /// Every option is optional.
    #[wasm_bindgen(constructor)]
    pub fn new(id: &str, options: JsValue) -> Result<JumpstartCanvas, JsValue> {
        install_console_hooks();
        let host = WebHost::from_window()
            .ok_or_else(|| JsValue::from_str("JumpstartCanvas needs a browser window"))?;
        let config = read_config(&options);
        let handlers = JsHandlers::from_options(&options);
        Ok(Self::build(host, id, config, handlers))
    }

    /// Deprecated positional constructor kept for older callers; prefer
    /// `new JumpstartCanvas(id, options)`.
    #[wasm_bindgen(js_name = withHandlers)]
    #[allow(clippy::too_many_arguments)]
    pub fn with_handlers(
        id: &str,
        setup: Option<Function>,
        update: Option<Function>,
        draw: Option<Function>,
        resize: Option<Function>,
        mouse_down: Option<Function>,
        mouse_up: Option<Function>,
        mouse_move: Option<Function>,
    ) -> Result<JumpstartCanvas, JsValue> {
        install_console_hooks();
        let host = WebHost::from_window()
            .ok_or_else(|| JsValue::from_str("JumpstartCanvas needs a browser window"))?;
        let handlers = JsHandlers {
            slots: [setup, update, draw, resize, mouse_down, mouse_up, mouse_move],
        };
        Ok(Self::build(host, id, CanvasConfig::default(), handlers))
    }

    /// Create and attach the layers, run setup, and start the loop if
    /// active. Does nothing if the host element is missing.
    pub fn init(&self) {
        let outcome = match self.inner.try_borrow_mut() {
            Ok(mut canvas) => canvas.initialize(),
            Err(_) => {
                log::warn!("init() called from inside a callback; ignored");
                return;
            }
        };
        if outcome == InitOutcome::Attached && !self.listening.replace(true) {
            self.attach_listeners();
        }
    }

    pub fn start(&self) {
        self.control.start();
    }

    pub fn stop(&self) {
        self.control.stop();
    }

    /// Advance one frame regardless of whether the loop is running.
    #[wasm_bindgen(js_name = animateSingleFrame)]
    pub fn animate_single_frame(&self) {
        with_canvas(&Rc::downgrade(&self.inner), |canvas| {
            canvas.step_once();
        });
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.control.is_active()
    }

    /// Frames per second; `0` or less removes the cap.
    #[wasm_bindgen(js_name = setFramerateTarget)]
    pub fn set_framerate_target(&self, fps: f64) {
        with_canvas(&Rc::downgrade(&self.inner), |canvas| {
            canvas.set_framerate_target(fps);
            self.config.set(*canvas.config());
        });
    }

    #[wasm_bindgen(js_name = setDeltaCap)]
    pub fn set_delta_cap(&self, cap_ms: f64) {
        with_canvas(&Rc::downgrade(&self.inner), |canvas| {
            canvas.set_delta_cap(cap_ms);
            self.config.set(*canvas.config());
        });
    }

    /// Current scalar options as JSON, e.g. `{"active":true,...}`.
    /// `active` reports whether the loop is running now.
    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> String {
        config_to_json(&self.config.get().with_active(self.control.is_active()))
    }

    // ─── Callback registration ──────────────────────────────────────────

    #[wasm_bindgen(js_name = onSetup)]
    pub fn on_setup(&self, f: Function) {
        self.set_handler(Slot::Setup, f);
    }

    #[wasm_bindgen(js_name = onUpdate)]
    pub fn on_update(&self, f: Function) {
        self.set_handler(Slot::Update, f);
    }

    #[wasm_bindgen(js_name = onDraw)]
    pub fn on_draw(&self, f: Function) {
        self.set_handler(Slot::Draw, f);
    }

    #[wasm_bindgen(js_name = onResize)]
    pub fn on_resize(&self, f: Function) {
        self.set_handler(Slot::Resize, f);
    }

    #[wasm_bindgen(js_name = onMouseDown)]
    pub fn on_mouse_down(&self, f: Function) {
        self.set_handler(Slot::MouseDown, f);
    }

    #[wasm_bindgen(js_name = onMouseUp)]
    pub fn on_mouse_up(&self, f: Function) {
        self.set_handler(Slot::MouseUp, f);
    }

    #[wasm_bindgen(js_name = onMouseMove)]
    pub fn on_mouse_move(&self, f: Function) {
        self.set_handler(Slot::MouseMove, f);
    }
}

impl JumpstartCanvas {
    fn build(host: WebHost, id: &str, config: CanvasConfig, handlers: JsHandlers) -> Self {
        let frames = host.frames().clone();
        let handlers = Rc::new(RefCell::new(handlers));

        let mut canvas = LayeredCanvas::new(host, id, config);
        forward_callbacks(&mut canvas, &handlers);
        let control = canvas.control();
        let config = Cell::new(*canvas.config());
        let inner = Rc::new(RefCell::new(canvas));

        let weak = Rc::downgrade(&inner);
        frames.install(move || {
            with_canvas(&weak, |canvas| {
                canvas.tick();
            });
        });

        Self {
            inner,
            control,
            config,
            handlers,
            listening: Cell::new(false),
        }
    }

    fn set_handler(&self, slot: Slot, f: Function) {
        *self.handlers.borrow_mut().slot_mut(slot) = Some(f);
    }

    /// `resize` on the window, pointer events on the foreground layer.
    /// Listeners live as long as the page.
    fn attach_listeners(&self) {
        let Ok(canvas) = self.inner.try_borrow() else {
            return;
        };
        let window = canvas.host().window().clone();
        let Some(foreground) = canvas.surfaces().map(|s| s.foreground().canvas.clone()) else {
            return;
        };
        drop(canvas);

        let weak = Rc::downgrade(&self.inner);
        let on_resize = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            with_canvas(&weak, |canvas| canvas.handle_resize());
        }) as Box<dyn FnMut(web_sys::Event)>);
        if let Err(e) =
            window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        {
            log::warn!("failed to listen for resize: {e:?}");
        }
        on_resize.forget();

        for kind in PointerKind::ALL {
            let weak = Rc::downgrade(&self.inner);
            let listener = Closure::wrap(Box::new(move |event: web_sys::Event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let client = Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
                with_canvas(&weak, |canvas| canvas.handle_pointer(kind, client));
            }) as Box<dyn FnMut(web_sys::Event)>);
            if let Err(e) = foreground.add_event_listener_with_callback(
                kind.event_type(),
                listener.as_ref().unchecked_ref(),
            ) {
                log::warn!("failed to listen for {}: {e:?}", kind.event_type());
            }
            listener.forget();
        }
    }
}

// ─── Console logging and panic hook ─────────────────────────────────────

fn install_console_hooks() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            let _ = console_log::init_with_level(log::Level::Info);
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Jumpstart Canvas WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn option_keys_match_js_names() {
        let keys: Vec<&str> = Slot::ALL.iter().map(|s| s.option_key()).collect();
        assert_eq!(
            keys,
            vec![
                "setup",
                "update",
                "draw",
                "resize",
                "mouseDown",
                "mouseUp",
                "mouseMove"
            ]
        );
    }

    #[test]
    fn pointer_kinds_map_to_mouse_slots() {
        assert_eq!(Slot::for_pointer(PointerKind::Down), Slot::MouseDown);
        assert_eq!(Slot::for_pointer(PointerKind::Up), Slot::MouseUp);
        assert_eq!(Slot::for_pointer(PointerKind::Move), Slot::MouseMove);
    }

    #[test]
    fn slots_index_in_declaration_order() {
        for (i, slot) in Slot::ALL.iter().enumerate() {
            assert_eq!(*slot as usize, i);
        }
    }

    #[test]
    fn config_json_reports_every_option() {
        let config = CanvasConfig::default().with_active(false).with_framerate_target(30.0);
        assert_eq!(
            config_to_json(&config),
            r#"{"active":false,"framerateTarget":30.0,"deltaCap":1000.0}"#
        );
    }

    #[test]
    fn empty_handlers_have_no_slots() {
        let handlers = JsHandlers::default();
        assert!(Slot::ALL.iter().all(|slot| handlers.get(*slot).is_none()));
    }
}
