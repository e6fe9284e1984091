//=========================================================================
// Labels Demo
//=========================================================================
//
// Endless script that cycles a centred label through three stanzas,
// recolouring it between stanzas.
//
//=========================================================================

//=== External Dependencies ===============================================

use rand::Rng;

//=== Internal Dependencies ===============================================

use super::DemoUnit;
use crate::core::script::{Coroutine, CoroutineState, ScheduledScript, ScriptResult, Yielder};
use crate::core::services::{
    Color, Drawable, DrawableId, Label, Services, Shared, TextAlignment, Vec2,
};

//=== Constants ===========================================================

const STANZAS: [&str; 3] = [
    "Open Sans\nAaBbCcDdEeFfGgHhIi\nJjKkLlMmNnOoPpQqRr\nSsTtUuVvWwXxYyZz",
    "Grumpy wizards make\ntoxic brew for the\nevil Queen and Jack.",
    "The quick brown fox jumps\nover the lazy dog.",
];

/// Vertical anchor as a fraction of screen height, by newline count - 1.
const Y_OFFSETS: [f32; 3] = [0.55, 0.63, 0.71];

const STANZA_MS: u64 = 3000;
const FONT: &str = "OpenSans-Light.ttf";
const FONT_SIZE: u32 = 60;

//=== Script Body =========================================================

fn anchor(stanza: &str, width: f32, height: f32) -> Vec2 {
    let breaks = stanza.matches('\n').count();
    let row = breaks.saturating_sub(1).min(Y_OFFSETS.len() - 1);
    Vec2::new(width * 0.5, height * Y_OFFSETS[row])
}

async fn cycle(
    y: Yielder<()>,
    label: Shared<Label>,
    services: Services,
    width: f32,
    height: f32,
) -> ScriptResult {
    let mut index = 0;
    loop {
        let stanza = STANZAS[index];
        {
            let mut label = label.borrow_mut();
            label.set_position(anchor(stanza, width, height));
            label.set_text(stanza);
        }
        y.wait(STANZA_MS).await;

        index = (index + 1) % STANZAS.len();
        let color = {
            let mut rng = services.rng();
            Color::rgba(rng.gen(), rng.gen(), rng.gen(), 255)
        };
        label.borrow_mut().set_color(color);
        y.wait(0).await;
    }
}

//=== Labels ==============================================================

/// Cycling multi-line text.
pub struct Labels {
    services: Services,
    label: Shared<Label>,
    label_id: DrawableId,
    script: Option<ScheduledScript>,
}

impl Labels {
    pub fn new(services: &Services, width: f32, height: f32) -> Self {
        let label = Label::new()
            .with_alignment(TextAlignment::Center)
            .with_font(FONT)
            .with_font_size(FONT_SIZE)
            .into_shared();
        let label_id = label.borrow().id();
        services.render_queue().add(Drawable::from(&label));

        let body_label = Shared::clone(&label);
        let body_services = services.clone();
        let script = ScheduledScript::start(Coroutine::new(move |y, _| {
            cycle(y, body_label, body_services, width, height)
        }));

        Self {
            services: services.clone(),
            label,
            label_id,
            script: Some(script),
        }
    }

    pub fn text(&self) -> String {
        self.label.borrow().text().to_owned()
    }

    pub fn color(&self) -> Color {
        self.label.borrow().color()
    }
}

impl DemoUnit for Labels {
    fn update(&mut self, dt: f64) {
        if let Some(script) = self.script.as_mut() {
            script.update(dt);
        }
    }

    fn deinit(&mut self) {
        self.script = None;
        self.services.render_queue().erase(self.label_id);
    }

    fn script_state(&self) -> Option<&CoroutineState> {
        self.script.as_ref().map(|s| s.state())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
