//! Application main loop

use anyhow::Result;
use app_core::{Action, AppConfig, CatalogWorker, ViewConfig, ViewStateController};
use app_ui::{load_image_file, EguiFrame, Renderer, Shell, Theme};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

/// Events sent into the event loop from other threads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppEvent {
    /// egui asked for a repaint after `delay`
    Repaint { delay: Duration },
}

/// When the next frame should be drawn. The loop sleeps until then.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RepaintSchedule {
    next: Option<Instant>,
}

impl RepaintSchedule {
    /// Keep the earliest of the pending and the requested deadline
    fn request(&mut self, delay: Duration, now: Instant) {
        let Some(at) = now.checked_add(delay) else {
            return;
        };
        self.next = Some(self.next.map_or(at, |next| next.min(at)));
    }

    /// True when a frame is due; the deadline is consumed
    fn take_due(&mut self, now: Instant) -> bool {
        match self.next {
            Some(at) if at <= now => {
                self.next = None;
                true
            }
            _ => false,
        }
    }

    fn control_flow(&self) -> ControlFlow {
        match self.next {
            Some(at) => ControlFlow::WaitUntil(at),
            None => ControlFlow::Wait,
        }
    }
}

/// Main application state for the event loop
struct App {
    config: AppConfig,

    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    egui_ctx: egui::Context,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,

    shell: Shell,
    controller: ViewStateController,
    worker: Option<CatalogWorker>,
    repaint: RepaintSchedule,
}

impl App {
    fn new(config: AppConfig, proxy: EventLoopProxy<AppEvent>) -> Result<Self> {
        let egui_ctx = egui::Context::default();

        // Repaint requests from any thread wake the event loop
        egui_ctx.set_request_repaint_callback(move |info| {
            if proxy.send_event(AppEvent::Repaint { delay: info.delay }).is_err() {
                tracing::trace!("Event loop gone, repaint request dropped");
            }
        });

        let (catalog, loader) = app_core::connect(&config.catalog)?;
        let repaint_ctx = egui_ctx.clone();
        let worker = CatalogWorker::spawn(
            catalog,
            loader,
            Some(Arc::new(move || repaint_ctx.request_repaint())),
        )?;

        Ok(Self {
            controller: ViewStateController::new(ViewConfig::from(&config)),
            shell: Shell::new(Theme::from_config(&config.theme)),
            config,

            window: None,
            renderer: None,
            egui_ctx,
            egui_state: None,
            egui_renderer: None,

            worker: Some(worker),
            repaint: RepaintSchedule::default(),
        })
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_config = &self.config.window;
        let window_attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(window_config.width, window_config.height))
            .with_resizable(window_config.resizable);

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        // Initialize renderer
        let renderer = pollster::block_on(Renderer::new(window.clone()))?;

        // Initialize egui
        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );
        let egui_renderer = renderer.create_egui_renderer();

        // Apply theme
        self.shell.theme().apply(&self.egui_ctx);

        if let Some(path) = &window_config.welcome_background {
            match load_image_file(&self.egui_ctx, path) {
                Ok(texture) => self.shell.set_background(Some(texture)),
                Err(e) => tracing::warn!("Welcome background {:?} not loaded: {}", path, e),
            }
        }

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);

        Ok(())
    }

    /// Route UI actions to the controller and queue resulting work
    fn dispatch(&mut self, actions: Vec<Action>) {
        for action in actions {
            let Some(request) = self.controller.handle(action) else {
                continue;
            };
            match &self.worker {
                Some(worker) => worker.submit_fetch(request),
                None => tracing::error!(ticket = ?request.ticket, "No worker to run fetch"),
            }
        }

        if let Some(worker) = &self.worker {
            worker.submit_thumbnails(self.controller.take_thumbnail_requests());
        }
    }

    fn render(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Apply finished background work before drawing
        if let Some(worker) = &self.worker {
            worker.pump(&mut self.controller);
        }

        let Some(egui_state) = self.egui_state.as_mut() else {
            return;
        };

        let raw_input = egui_state.take_egui_input(&window);
        let shell = &mut self.shell;
        let controller = &self.controller;
        let mut actions = Vec::new();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            actions = shell.show(ctx, controller);
        });

        egui_state.handle_platform_output(&window, full_output.platform_output);

        // Spinners and animations ask for the next frame through the delay
        if let Some(viewport) = full_output.viewport_output.get(&egui::ViewportId::ROOT) {
            if viewport.repaint_delay.is_zero() {
                window.request_redraw();
            } else {
                self.repaint.request(viewport.repaint_delay, Instant::now());
            }
        }

        if !actions.is_empty() {
            self.dispatch(actions);
            window.request_redraw();
        }

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let (Some(renderer), Some(egui_renderer)) = (self.renderer.as_mut(), self.egui_renderer.as_mut()) else {
            return;
        };

        let frame = EguiFrame {
            primitives: &primitives,
            textures_delta: &full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
            clear: self.shell.theme().clear_color(),
        };

        match renderer.render_egui(egui_renderer, frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.handle_device_lost();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::debug!("Surface timeout, skipping frame");
            }
            Err(e) => {
                tracing::error!("Surface error: {:?}", e);
            }
        }
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                tracing::error!("Failed to initialize window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            let response = egui_state.on_window_event(window, &event);
            if response.repaint {
                window.request_redraw();
            }
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested");
                // In-flight requests finish on their own threads and are discarded
                self.worker = None;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize((size.width, size.height));
                }
            }

            WindowEvent::RedrawRequested => {
                self.render();
            }

            _ => {}
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Repaint { delay } => self.repaint.request(delay, Instant::now()),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.repaint.take_due(Instant::now()) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(self.repaint.control_flow());
    }
}

/// Run the application
pub fn run(config: AppConfig) -> Result<()> {
    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, event_loop.create_proxy())?;
    event_loop.run_app(&mut app)?;

    tracing::info!("Meal Explorer exiting");
    Ok(())
}
