mod logger;
mod vulkan;
mod window;

use anyhow::Result;
use log::{debug, error};
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;

use crate::logger::init_log;
use crate::vulkan::config::Config;
use crate::vulkan::context::VulkanContext;
use crate::window::AppWindow;

fn main() -> Result<()> {
    if let Err(err) = run() {
        error!("Oops! Something went wrong: {err}");
        for cause in err.chain().skip(1) {
            error!("Caused by: {cause}");
        }
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    init_log()?;
    let config = Config::default();

    let event_loop = EventLoop::new()?;
    debug!("Creating window...");
    let window = AppWindow::new(&event_loop, &config)?;
    info_success!("Window created!");

    let mut context = VulkanContext::new(&window, &config)?;
    debug!(
        "Queues ready (graphics: {:?}, present: {:?}).",
        context.device().graphics_queue(),
        context.device().present_queue(),
    );
    info_success!(
        "Vulkan context ready on `{}` ({:?}, {:?}).",
        context.device_name(),
        context.surface_config().present_mode,
        context.surface_config().extent,
    );

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => {
                elwt.exit();
                context.destroy();
            }
            _ => {}
        },
        _ => {}
    })?;

    Ok(())
}
