//=========================================================================
// Demo Runner
//
// Opens the demo window with default settings. Log level via RUST_LOG.
//=========================================================================

use aetheric_demos::EngineBuilder;

fn main() {
    env_logger::init();

    // Script panics are caught and reported as failed scripts; keep the
    // panic message in the log stream instead of raw stderr.
    std::panic::set_hook(Box::new(|info| {
        log::error!(target: "panic", "{}", info);
    }));

    EngineBuilder::new().build().run();
}
