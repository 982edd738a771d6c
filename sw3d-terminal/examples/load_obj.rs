//! Render a Wavefront OBJ file in the terminal.
//!
//! Usage: cargo run --example load_obj -- path/to/model.obj

use sw3d_core::error::Result;
use sw3d_core::obj::load_obj;
use sw3d_terminal::TerminalApp;

fn main() -> Result<()> {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: load_obj <path/to/model.obj>");
        std::process::exit(2);
    };

    let mesh = load_obj(&path)?;
    println!(
        "Loaded '{}': {} vertices, {} faces, {} edges",
        mesh.name(),
        mesh.vertices().len(),
        mesh.faces().len(),
        mesh.edges().len()
    );
    std::thread::sleep(std::time::Duration::from_secs(1));

    TerminalApp::viewer(mesh)?.run()
}
