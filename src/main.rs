#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use fep_release_manager::app::{self, events::UserEvent, file_dialog::NativeDialogService};
use fep_release_manager::app::{commands, helpers::lock_state, state::AppState};
use fep_release_manager::web_assets;
use std::sync::{Arc, Mutex};
use tao::{
    event::{Event, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
    window::WindowBuilder,
};
use tracing_subscriber::EnvFilter;
use wry::{FileDropEvent, WebViewBuilder};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();

    let initial_state = AppState::default();
    let (width, height) = initial_state.config.window_size;
    let (pos_x, pos_y) = initial_state.config.window_position;

    let window = WindowBuilder::new()
        .with_title("FEP Release Manager")
        .with_inner_size(tao::dpi::LogicalSize::new(width, height))
        .with_position(tao::dpi::LogicalPosition::new(pos_x, pos_y))
        .with_min_inner_size(tao::dpi::LogicalSize::new(800, 550))
        .build(&event_loop)
        .context("Failed to build window")?;
    let window = Arc::new(window);

    let proxy = event_loop.create_proxy();
    let state = Arc::new(Mutex::new(initial_state));
    let dialog_service = Arc::new(NativeDialogService);

    let ipc_handler_state = state.clone();
    let ipc_handler_proxy = proxy.clone();
    let ipc_handler = move |message: String| {
        app::handle_ipc_message(
            message,
            dialog_service.clone(),
            ipc_handler_proxy.clone(),
            ipc_handler_state.clone(),
        );
    };

    let drop_handler_state = state.clone();
    let drop_handler_proxy = proxy.clone();
    let file_drop_handler = move |event: FileDropEvent| {
        match event {
            FileDropEvent::Hovered { .. } => {
                let _ = drop_handler_proxy.send_event(UserEvent::DragStateChanged(true));
            }
            FileDropEvent::Dropped { paths, .. } => {
                let _ = drop_handler_proxy.send_event(UserEvent::DragStateChanged(false));
                if let Some(path) = paths.into_iter().next() {
                    commands::open_directory(
                        path,
                        drop_handler_proxy.clone(),
                        drop_handler_state.clone(),
                    );
                }
            }
            FileDropEvent::Cancelled => {
                let _ = drop_handler_proxy.send_event(UserEvent::DragStateChanged(false));
            }
            _ => (),
        }
        true
    };

    let html = web_assets::index_html().context("UI assets are missing from the binary")?;
    let webview = WebViewBuilder::new(&*window)
        .with_html(html)
        .with_devtools(cfg!(debug_assertions))
        .with_ipc_handler(ipc_handler)
        .with_file_drop_handler(file_drop_handler)
        .build()
        .context("Failed to build WebView")?;

    let state_for_events = state.clone();
    let window_for_events = window.clone();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(StartCause::Init) => {
                tracing::info!("Application initialized.");
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    tracing::info!("Close requested. Saving final window state...");
                    let mut state_guard = lock_state(&state_for_events);
                    let scale = window_for_events.scale_factor();
                    let size = window_for_events.inner_size().to_logical::<f64>(scale);
                    state_guard.config.window_size = (size.width, size.height);
                    if let Ok(position) = window_for_events.outer_position() {
                        let position = position.to_logical::<f64>(scale);
                        state_guard.config.window_position = (position.x, position.y);
                    }
                    state_guard.persist_config();
                    *control_flow = ControlFlow::Exit;
                }
                _ => (),
            },
            Event::UserEvent(user_event) => {
                app::handle_user_event(user_event, &webview);
            }
            _ => (),
        }
    })
}
