//! Heart Containers entry point
//!
//! On the web the widget is driven by `platform::WebWidget`. Natively this
//! binary renders a character file once and prints the markup, which is handy
//! for checking attribute paths and unit sizes.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    if let Err(e) = native::run(std::env::args().skip(1).collect()) {
        log::error!("{}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use heart_containers::settings::keys;
    use heart_containers::{
        HeartContainers, MemoryStore, MemorySurface, RenderData, StaticActor,
        consts::ELEMENT_ID,
    };
    use serde_json::{Value, json};

    const USAGE: &str = "usage: heart-containers <character.json> [unit-size] [--json]";

    pub fn run(args: Vec<String>) -> heart_containers::Result<()> {
        let as_json = args.iter().any(|a| a == "--json");
        let mut positional = args.iter().filter(|a| !a.starts_with("--"));

        let Some(path) = positional.next() else {
            println!("{USAGE}");
            return Ok(());
        };
        let text = std::fs::read_to_string(path)?;
        let character: Value = serde_json::from_str(&text)?;
        log::info!("Loaded character from {}", path);

        let mut app = HeartContainers::new(
            MemoryStore::new(),
            StaticActor(Some(character)),
            MemorySurface::new(),
        );
        app.on_initialize()?;
        if let Some(size) = positional.next() {
            app.set_setting(keys::UNIT_SIZE, json!(size))?;
        }

        if as_json {
            println!("{}", app.render_data()?.to_json());
            return Ok(());
        }

        if !app.on_ready()? {
            println!("{}", heart_containers::template::render(&RenderData::NoActor));
            return Ok(());
        }
        if let Some(markup) = app.surface().markup(ELEMENT_ID) {
            println!("{markup}");
        }
        Ok(())
    }
}
