//! SW3D terminal demo: grid floor, cube, tetrahedron.
//!
//! Controls:
//!   - WASD / arrow keys: rotate the cube
//!   - E/R: roll
//!   - M: toggle wireframe/solid
//!   - G: toggle axis gizmos
//!   - Space: toggle selection highlight
//!   - P: pause the idle spin
//!   - +/-: zoom
//!   - Q/ESC: quit

use sw3d_core::error::Result;
use sw3d_terminal::TerminalApp;

fn main() -> Result<()> {
    env_logger::init();

    println!("SW3D Terminal Renderer - loading...");
    let mut app = TerminalApp::demo()?;

    println!("Starting (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    app.run()
}
