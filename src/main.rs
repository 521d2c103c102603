use stardrift::app::App;
use stardrift::error::RunError;
use stardrift::scene::SceneConfig;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> Result<(), RunError> {
    env_logger::init();

    let scene = SceneConfig::new().build()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(scene);
    event_loop.run_app(&mut app)?;
    Ok(())
}
