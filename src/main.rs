//! Quadsim entry point
//!
//! Window, surface and font setup belong to the platform layer, which is not
//! part of this crate. The native binary runs the simulation headless, driving
//! it with a scripted event stream and tessellating every frame.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use quadsim::input::{InputEvent, InputState, Key, MouseButton};
    use quadsim::renderer::{VertexCanvas, draw_world};
    use quadsim::{Session, SimConfig, SimError, World, tick};

    /// Scripted stand-in for a polled platform event queue
    fn scripted_events(frame: u32, center: Vec2) -> Vec<InputEvent> {
        let mut events = Vec::new();
        match frame {
            120 => events.push(InputEvent::KeyDown(Key::Right)),
            180 | 200 => events.push(InputEvent::KeyDown(Key::Space)),
            240 => events.push(InputEvent::MouseDown(MouseButton::Left)),
            300 => {
                events.push(InputEvent::MouseUp(MouseButton::Left));
                events.push(InputEvent::MouseDown(MouseButton::Right));
            }
            360 => events.push(InputEvent::MouseUp(MouseButton::Right)),
            420 => events.push(InputEvent::KeyDown(Key::Equals)),
            480 => events.push(InputEvent::KeyDown(Key::Left)),
            _ => {}
        }
        if (240..360).contains(&frame) {
            let angle = frame as f32 * 0.05;
            events.push(InputEvent::MouseMotion(center + Vec2::from_angle(angle) * 150.0));
        }
        events
    }

    pub fn run() -> Result<(), SimError> {
        let config = match std::env::args().nth(1) {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };

        let mut world = World::populated(&config)?;
        let mut session = Session::default();
        let mut input = InputState::new();
        let mut canvas = VertexCanvas::new();
        let center = world.arena().center();

        log::info!("Running {} frames with {} bodies", config.frames, world.len());

        for frame in 0..config.frames {
            input.handle_all(scripted_events(frame, center));
            if input.quit_requested() {
                break;
            }

            let stats = tick(&mut world, &mut session, &input.take_frame());

            canvas.clear();
            draw_world(&world, &session, &mut canvas);

            if let Some(stats) = stats.filter(|_| frame % 60 == 0) {
                log::info!(
                    "Frame {}: {} bodies, {} mode, {} tests, {} resolutions, {} vertices",
                    frame,
                    world.len(),
                    stats.strategy.as_str(),
                    stats.tests,
                    stats.resolutions,
                    canvas.triangles.len() + canvas.lines.len()
                );
            }
        }

        log::info!("Finished with {} bodies", world.len());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Quadsim (native, headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("Startup failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web build is driven by its host page; nothing to do here
}
