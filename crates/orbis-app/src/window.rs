//! Window creation and event handling via winit.
//!
//! [`App`] implements winit's [`ApplicationHandler`]: it owns the GPU
//! context, the globe scene and the collaborators, and drives one frame per
//! redraw.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use orbis_assets::{TextureChannel, TextureLoader, TextureSet, TextureSource};
use orbis_config::{CliArgs, Config};
use orbis_globe::{Category, CursorHint, Item, ItemCatalog, Scene};
use orbis_input::PointerState;
use orbis_render::{GlobeRenderer, RenderContext, SurfaceError, init_render_context_blocking};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{CursorIcon, Fullscreen, Window, WindowAttributes, WindowId};

use crate::clock::{FrameClock, frame_interval};
use crate::items::load_or_builtin;
use crate::store::{AppStore, CursorTracker};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
        .with_fullscreen(config.window.fullscreen.then_some(Fullscreen::Borderless(None)))
}

/// Keyboard shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ToggleCategory,
    /// Close the detail view, clearing the selection.
    Deselect,
    /// Re-read `config.ron` and apply shading, effects and items.
    ReloadConfig,
}

pub fn key_action(key: &Key) -> Option<KeyAction> {
    match key {
        Key::Named(NamedKey::Tab) => Some(KeyAction::ToggleCategory),
        Key::Named(NamedKey::Escape) => Some(KeyAction::Deselect),
        Key::Named(NamedKey::F5) => Some(KeyAction::ReloadConfig),
        _ => None,
    }
}

pub fn cursor_icon(hint: CursorHint) -> CursorIcon {
    match hint {
        CursorHint::Pointer => CursorIcon::Pointer,
        CursorHint::Default => CursorIcon::Default,
    }
}

/// Category named in the config, or the default when it does not parse.
pub fn start_category(config: &Config) -> Category {
    match config.data.start_category.parse() {
        Ok(category) => category,
        Err(err) => {
            warn!(error = %err, "falling back to default category");
            Category::default()
        }
    }
}

/// Where a reload reads `config.ron`, and the CLI flags re-applied on top.
pub struct ReloadSource {
    pub config_dir: PathBuf,
    pub args: CliArgs,
}

/// GPU-side state, created once the window exists.
struct Gpu {
    window: Arc<Window>,
    ctx: RenderContext,
    renderer: GlobeRenderer,
}

pub struct App {
    config: Config,
    reload: Option<ReloadSource>,
    items: ItemCatalog,
    store: AppStore,
    cursor: CursorTracker,
    scene: Scene,
    pointer: PointerState,
    clock: FrameClock,
    gpu: Option<Gpu>,
    loader: Option<TextureLoader>,
    textures: TextureSet,
    next_frame: Instant,
}

impl App {
    pub fn new(config: Config, items: Vec<Item>) -> Self {
        let store = AppStore::new(start_category(&config));
        let scene = Scene::new(&config);
        let pointer = PointerState::new(config.camera.drag_threshold_px);
        Self {
            config,
            reload: None,
            items: ItemCatalog::new(items),
            store,
            cursor: CursorTracker::default(),
            scene,
            pointer,
            clock: FrameClock::new(),
            gpu: None,
            loader: None,
            textures: TextureSet::new(),
            next_frame: Instant::now(),
        }
    }

    pub fn with_reload(mut self, source: ReloadSource) -> Self {
        self.reload = Some(source);
        self
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) {
        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let ctx = match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(ctx) => ctx,
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let (width, height) = ctx.size();
        self.scene.resize(width, height);
        let renderer = GlobeRenderer::new(&ctx, &self.config.render, &self.config.effects, &self.scene);
        info!(width, height, format = ?ctx.surface_format, "renderer ready");

        self.start_texture_loads();
        window.request_redraw();
        self.gpu = Some(Gpu {
            window,
            ctx,
            renderer,
        });
    }

    /// Queue every globe texture. Without a loader the globe goes straight
    /// to the realistic material with neutral textures.
    fn start_texture_loads(&mut self) {
        let source = TextureSource::from_config(&self.config.textures);
        let loader = TextureLoader::with_threads(self.config.textures.loader_threads).and_then(|mut loader| {
            loader.submit_all(&source)?;
            Ok(loader)
        });
        match loader {
            Ok(loader) => self.loader = Some(loader),
            Err(e) => {
                warn!("Texture loading unavailable, using neutral textures: {e}");
                self.scene.globe.textures_resolved();
            }
        }
    }

    /// Collect finished decodes and upload the set once it is complete.
    fn poll_textures(&mut self) {
        let Some(loader) = &mut self.loader else {
            return;
        };
        for result in loader.poll() {
            self.textures.record(result);
        }
        if !self.textures.is_complete() {
            return;
        }
        self.loader = None;
        let failed: Vec<TextureChannel> = self.textures.failed_channels().collect();
        if !failed.is_empty() {
            warn!(?failed, "globe textures incomplete, neutral fallbacks in use");
        }

        if let Some(gpu) = &mut self.gpu {
            for channel in TextureChannel::ALL {
                let image = self.textures.take(channel);
                if let Err(e) = gpu
                    .renderer
                    .upload_texture(&gpu.ctx.device, &gpu.ctx.queue, channel, &image)
                {
                    warn!(%channel, error = %e, "texture rejected, keeping neutral fallback");
                }
            }
        }
        self.scene.globe.textures_resolved();
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(gpu) = &mut self.gpu {
            gpu.ctx.resize(width, height);
            gpu.renderer.resize(&gpu.ctx.device, width, height);
        }
        self.scene.resize(width, height);
        debug!(width, height, "surface resized");
    }

    fn handle_key(&mut self, action: KeyAction) {
        match action {
            KeyAction::ToggleCategory => self.store.toggle_category(),
            KeyAction::Deselect => self.store.deselect(),
            KeyAction::ReloadConfig => self.reload_config(),
        }
    }

    /// Re-read the config file. A missing, malformed or invalid file keeps
    /// the running config.
    fn reload_config(&mut self) {
        let Some(source) = &self.reload else {
            warn!("no config directory, reload skipped");
            return;
        };
        let mut config = match self.config.reload(&source.config_dir) {
            Ok(Some(config)) => config,
            Ok(None) => {
                info!("config unchanged");
                return;
            }
            Err(e) => {
                warn!(error = %e, "config reload failed");
                return;
            }
        };
        config.apply_cli_overrides(&source.args);
        if config == self.config {
            info!("config unchanged");
            return;
        }
        if let Err(e) = config.validate() {
            warn!(error = %e, "reloaded config rejected");
            return;
        }
        self.apply_config(config);
    }

    fn apply_config(&mut self, config: Config) {
        self.scene.apply_shading(&config);
        if let Some(gpu) = &mut self.gpu {
            gpu.renderer
                .set_effects(&gpu.ctx.device, &gpu.ctx.queue, &config.effects);
        }
        if config.data.items_path != self.config.data.items_path {
            self.items.replace(load_or_builtin(&config.data.items_path));
        }
        self.config = config;
        info!("config reloaded");
    }

    /// One frame: textures, input, collaborator sync, animation, render.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.tick();
        self.poll_textures();

        let pointer = self.pointer.frame();
        self.pointer.clear_transients();
        self.scene.handle_pointer(&pointer, &mut self.store, &mut self.cursor);
        self.scene
            .sync(&self.items, self.store.category(), self.store.selected());
        self.scene.update(dt, &mut self.store);

        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if let Some(hint) = self.cursor.take_change() {
            gpu.window.set_cursor(cursor_icon(hint));
        }
        match gpu.renderer.render(&gpu.ctx, &mut self.scene) {
            Ok(()) => {}
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, shutting down");
                event_loop.exit();
            }
            Err(e) => warn!("Skipped frame: {e}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_none() {
            self.init_gpu(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(gpu) = &self.gpu {
                    let size = gpu.window.inner_size();
                    debug!(scale_factor, "scale factor changed");
                    self.resize(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => self.pointer.on_cursor_moved(position.x, position.y),
            WindowEvent::CursorEntered { .. } => self.pointer.on_cursor_entered(),
            WindowEvent::CursorLeft { .. } => self.pointer.on_cursor_left(),
            WindowEvent::MouseInput { state, button, .. } => self.pointer.on_button(button, state),
            WindowEvent::MouseWheel { delta, .. } => self.pointer.on_scroll(delta),
            WindowEvent::PinchGesture { delta, .. } => self.pointer.on_pinch(delta),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && let Some(action) = key_action(&event.logical_key)
                {
                    self.handle_key(action);
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        match frame_interval(self.config.render.target_fps) {
            None => {
                event_loop.set_control_flow(ControlFlow::Poll);
                gpu.window.request_redraw();
            }
            Some(interval) => {
                let now = Instant::now();
                if now >= self.next_frame {
                    gpu.window.request_redraw();
                    self.next_frame = now + interval;
                }
                event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
            }
        }
    }
}

/// Create the event loop and run until the window closes.
#[instrument(skip_all)]
pub fn run(config: Config, items: Vec<Item>, reload: ReloadSource) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, items).with_reload(reload);
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use winit::keyboard::SmolStr;

    use super::*;
    use crate::items::builtin_items;

    #[test]
    fn test_window_attributes_follow_config() {
        let mut config = Config::default();
        config.window.title = "Globe".to_string();
        config.window.fullscreen = true;
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Globe");
        assert!(attrs.fullscreen.is_some());

        config.window.fullscreen = false;
        assert!(window_attributes_from_config(&config).fullscreen.is_none());
    }

    #[test]
    fn test_key_actions() {
        assert_eq!(key_action(&Key::Named(NamedKey::Tab)), Some(KeyAction::ToggleCategory));
        assert_eq!(key_action(&Key::Named(NamedKey::Escape)), Some(KeyAction::Deselect));
        assert_eq!(key_action(&Key::Named(NamedKey::F5)), Some(KeyAction::ReloadConfig));
        assert_eq!(key_action(&Key::Character(SmolStr::new("a"))), None);
    }

    #[test]
    fn test_cursor_icons() {
        assert_eq!(cursor_icon(CursorHint::Pointer), CursorIcon::Pointer);
        assert_eq!(cursor_icon(CursorHint::Default), CursorIcon::Default);
    }

    #[test]
    fn test_start_category_from_config() {
        let mut config = Config::default();
        config.data.start_category = "radio".to_string();
        assert_eq!(start_category(&config), Category::Radio);
        config.data.start_category = "polka".to_string();
        assert_eq!(start_category(&config), Category::Instruments);
    }

    #[test]
    fn test_headless_app_state() {
        let mut config = Config::default();
        config.data.start_category = "radio".to_string();
        let app = App::new(config, builtin_items());
        assert!(app.gpu.is_none());
        assert_eq!(app.store().category(), Category::Radio);
        assert!(app.scene().globe.markers().is_empty());
    }

    #[test]
    fn test_keys_drive_store() {
        let mut app = App::new(Config::default(), builtin_items());
        app.handle_key(KeyAction::ToggleCategory);
        assert_eq!(app.store().category(), Category::Radio);
        app.handle_key(KeyAction::Deselect);
        assert!(app.store().selected().is_none());
    }

    fn reloadable(dir: &std::path::Path) -> App {
        App::new(Config::default(), builtin_items()).with_reload(ReloadSource {
            config_dir: dir.to_path_buf(),
            args: CliArgs::default(),
        })
    }

    #[test]
    fn test_reload_applies_shading_and_items() {
        let tmp = tempfile::tempdir().unwrap();
        let items_path = tmp.path().join("items.ron");
        std::fs::write(
            &items_path,
            r#"[(id: "fado", name: "Fado", coordinate: (lat: 38.7, lng: -9.1), category: radio)]"#,
        )
        .unwrap();

        let mut edited = Config::default();
        edited.shading.exposure = 1.4;
        edited.data.items_path = items_path;
        edited.save(tmp.path()).unwrap();

        let mut app = reloadable(tmp.path());
        let revision = app.items.revision();
        app.handle_key(KeyAction::ReloadConfig);
        assert_eq!(app.scene().shading.params.exposure, 1.4);
        assert_eq!(app.items.items().len(), 1);
        assert_ne!(app.items.revision(), revision);

        // Same file again: nothing to do.
        let revision = app.items.revision();
        app.handle_key(KeyAction::ReloadConfig);
        assert_eq!(app.items.revision(), revision);
    }

    #[test]
    fn test_invalid_reload_keeps_running_config() {
        let tmp = tempfile::tempdir().unwrap();
        let mut broken = Config::default();
        broken.camera.damping = 0.0;
        broken.shading.exposure = 3.0;
        broken.save(tmp.path()).unwrap();

        let mut app = reloadable(tmp.path());
        app.handle_key(KeyAction::ReloadConfig);
        assert_eq!(app.config, Config::default());
        assert_eq!(app.scene().shading.params.exposure, 1.1);
    }

    #[test]
    fn test_reload_without_file_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = reloadable(&tmp.path().join("missing"));
        app.handle_key(KeyAction::ReloadConfig);
        assert_eq!(app.config, Config::default());

        let mut bare = App::new(Config::default(), builtin_items());
        bare.handle_key(KeyAction::ReloadConfig);
        assert_eq!(bare.items.items().len(), 15);
    }
}
